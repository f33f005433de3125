// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! The file resource handle.
//!
//! [`FileHandle`] wraps a native open file and forwards every operation
//! directly; the only added behavior is error translation and the
//! [`FileInfo`] view of file metadata.

use std::borrow::Cow;
use std::fs::Metadata;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use async_trait::async_trait;
use tokio::fs::File;
use tokio::io::{AsyncReadExt, AsyncSeekExt, AsyncWriteExt};

use crate::error::{CompatError, Result};
use crate::resource::IoHandle;

pub use std::io::SeekFrom;

/// What a directory entry or stat result refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    /// Regular file.
    File,
    /// Directory.
    Dir,
    /// Symbolic link (only from `lstat`/`read_dir`).
    Symlink,
    /// Anything else (sockets, devices, fifos).
    Other,
}

/// Portable file metadata.
#[derive(Debug, Clone)]
pub struct FileInfo {
    /// Entry kind.
    pub kind: FileKind,
    /// Size in bytes.
    pub size: u64,
    /// Last modification time, milliseconds since the epoch.
    pub mtime_ms: Option<f64>,
    /// Last access time, milliseconds since the epoch.
    pub atime_ms: Option<f64>,
    /// Creation time, milliseconds since the epoch.
    pub birthtime_ms: Option<f64>,
    /// Permission bits (unix only).
    pub mode: u32,
    /// Owning user id (unix only).
    pub uid: u32,
    /// Owning group id (unix only).
    pub gid: u32,
    /// Hard link count (unix only).
    pub nlink: u64,
    /// Device id (unix only).
    pub dev: u64,
    /// Inode number (unix only).
    pub ino: u64,
    /// Preferred block size (unix only).
    pub blksize: u64,
    /// Allocated 512-byte blocks (unix only).
    pub blocks: u64,
}

impl FileInfo {
    /// Build from native metadata.
    pub fn from_metadata(metadata: &Metadata) -> Self {
        fn to_ms(time: std::io::Result<SystemTime>) -> Option<f64> {
            time.ok()
                .and_then(|t| t.duration_since(SystemTime::UNIX_EPOCH).ok())
                .map(|d| d.as_secs_f64() * 1000.0)
        }

        let kind = if metadata.is_file() {
            FileKind::File
        } else if metadata.is_dir() {
            FileKind::Dir
        } else if metadata.file_type().is_symlink() {
            FileKind::Symlink
        } else {
            FileKind::Other
        };

        #[cfg(unix)]
        use std::os::unix::fs::MetadataExt;

        Self {
            kind,
            size: metadata.len(),
            mtime_ms: to_ms(metadata.modified()),
            atime_ms: to_ms(metadata.accessed()),
            birthtime_ms: to_ms(metadata.created()),

            #[cfg(unix)]
            mode: metadata.mode(),
            #[cfg(not(unix))]
            mode: 0,

            #[cfg(unix)]
            uid: metadata.uid(),
            #[cfg(not(unix))]
            uid: 0,

            #[cfg(unix)]
            gid: metadata.gid(),
            #[cfg(not(unix))]
            gid: 0,

            #[cfg(unix)]
            nlink: metadata.nlink(),
            #[cfg(not(unix))]
            nlink: 0,

            #[cfg(unix)]
            dev: metadata.dev(),
            #[cfg(not(unix))]
            dev: 0,

            #[cfg(unix)]
            ino: metadata.ino(),
            #[cfg(not(unix))]
            ino: 0,

            #[cfg(unix)]
            blksize: metadata.blksize(),
            #[cfg(not(unix))]
            blksize: 4096,

            #[cfg(unix)]
            blocks: metadata.blocks(),
            #[cfg(not(unix))]
            blocks: 0,
        }
    }

    /// Whether this is a regular file.
    pub fn is_file(&self) -> bool {
        self.kind == FileKind::File
    }

    /// Whether this is a directory.
    pub fn is_dir(&self) -> bool {
        self.kind == FileKind::Dir
    }

    /// Whether this is a symbolic link.
    pub fn is_symlink(&self) -> bool {
        self.kind == FileKind::Symlink
    }
}

/// An open file.
///
/// Created through [`OpenFlags::open`](crate::OpenFlags::open). Dropping the
/// handle closes the file.
#[derive(Debug)]
pub struct FileHandle {
    inner: File,
    path: PathBuf,
}

impl FileHandle {
    pub(crate) fn new(inner: File, path: impl Into<PathBuf>) -> Self {
        Self {
            inner,
            path: path.into(),
        }
    }

    /// The path this handle was opened with.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read into `buf`, returning the number of bytes read (0 at EOF).
    pub async fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        self.inner
            .read(buf)
            .await
            .map_err(|e| CompatError::io("read", &self.path, e))
    }

    /// Read exactly `buf.len()` bytes.
    pub async fn read_exact(&mut self, buf: &mut [u8]) -> Result<()> {
        self.inner
            .read_exact(buf)
            .await
            .map(|_| ())
            .map_err(|e| CompatError::io("read", &self.path, e))
    }

    /// Write from `buf`, returning the number of bytes written.
    pub async fn write(&mut self, buf: &[u8]) -> Result<usize> {
        self.inner
            .write(buf)
            .await
            .map_err(|e| CompatError::io("write", &self.path, e))
    }

    /// Write all of `buf`.
    pub async fn write_all(&mut self, buf: &[u8]) -> Result<()> {
        self.inner
            .write_all(buf)
            .await
            .map_err(|e| CompatError::io("write", &self.path, e))
    }

    /// Move the file cursor, returning the new position from the start.
    pub async fn seek(&mut self, pos: SeekFrom) -> Result<u64> {
        self.inner
            .seek(pos)
            .await
            .map_err(|e| CompatError::io("seek", &self.path, e))
    }

    /// Metadata of the open file.
    pub async fn stat(&self) -> Result<FileInfo> {
        let metadata = self
            .inner
            .metadata()
            .await
            .map_err(|e| CompatError::io("stat", &self.path, e))?;
        Ok(FileInfo::from_metadata(&metadata))
    }

    /// Flush data and metadata to disk.
    pub async fn sync_all(&mut self) -> Result<()> {
        self.inner
            .sync_all()
            .await
            .map_err(|e| CompatError::io("sync", &self.path, e))
    }

    /// Flush data (not necessarily metadata) to disk.
    pub async fn sync_data(&mut self) -> Result<()> {
        self.inner
            .sync_data()
            .await
            .map_err(|e| CompatError::io("syncData", &self.path, e))
    }

    /// Truncate or extend the file to `len` bytes.
    pub async fn truncate(&mut self, len: u64) -> Result<()> {
        self.inner
            .set_len(len)
            .await
            .map_err(|e| CompatError::io("truncate", &self.path, e))
    }

    /// Unwrap into the native file.
    pub async fn into_std(self) -> std::fs::File {
        self.inner.into_std().await
    }
}

#[async_trait]
impl IoHandle for FileHandle {
    fn handle_name(&self) -> Cow<'static, str> {
        "fsFile".into()
    }

    async fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        FileHandle::read(self, buf).await
    }

    async fn write(&mut self, buf: &[u8]) -> Result<usize> {
        FileHandle::write(self, buf).await
    }

    async fn shutdown(&mut self) -> Result<()> {
        self.inner
            .flush()
            .await
            .map_err(|e| CompatError::io("flush", &self.path, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::OpenFlags;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_write_read_round_trip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("data.bin");
        let payload: Vec<u8> = (0u8..=255).collect();

        let mut file = OpenFlags::write_only().open(&path).await.unwrap();
        file.write_all(&payload).await.unwrap();
        file.sync_all().await.unwrap();
        drop(file);

        let mut file = OpenFlags::read_only().open(&path).await.unwrap();
        let mut read_back = vec![0u8; payload.len()];
        file.read_exact(&mut read_back).await.unwrap();
        assert_eq!(read_back, payload);

        // EOF
        let mut buf = [0u8; 1];
        assert_eq!(file.read(&mut buf).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_seek_and_stat() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("seek.txt");

        let mut flags = OpenFlags::write_only();
        flags.read = true;
        let mut file = flags.open(&path).await.unwrap();
        file.write_all(b"0123456789").await.unwrap();

        let pos = file.seek(SeekFrom::Start(4)).await.unwrap();
        assert_eq!(pos, 4);
        let mut buf = [0u8; 2];
        file.read_exact(&mut buf).await.unwrap();
        assert_eq!(&buf, b"45");

        let info = file.stat().await.unwrap();
        assert!(info.is_file());
        assert_eq!(info.size, 10);
    }

    #[tokio::test]
    async fn test_truncate_via_handle() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("trunc.txt");

        let mut file = OpenFlags::write_only().open(&path).await.unwrap();
        file.write_all(b"abcdefgh").await.unwrap();
        file.truncate(3).await.unwrap();

        let info = file.stat().await.unwrap();
        assert_eq!(info.size, 3);
    }

    #[tokio::test]
    async fn test_append_positions_at_end() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("log.txt");

        let mut first = OpenFlags::append_only().open(&path).await.unwrap();
        first.write_all(b"one\n").await.unwrap();
        drop(first);

        let mut second = OpenFlags::append_only().open(&path).await.unwrap();
        second.write_all(b"two\n").await.unwrap();
        drop(second);

        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text, "one\ntwo\n");
    }
}

// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Path-addressed filesystem operations.
//!
//! Each function forwards to the corresponding native call and translates
//! the error path. Options structs default to the conservative behavior
//! (no recursion, no implicit creation).

use std::path::{Path, PathBuf};

use crate::error::{CompatError, Result};
use crate::fs::file::{FileInfo, FileKind};
use crate::fs::open_options::OpenFlags;

/// Options for [`write_file`].
#[derive(Debug, Clone, Copy)]
pub struct WriteFileOptions {
    /// Append instead of replacing.
    pub append: bool,
    /// Create the file if missing.
    pub create: bool,
    /// Fail if the file already exists.
    pub create_new: bool,
    /// Permission bits applied on creation (unix only).
    pub mode: Option<u32>,
}

impl Default for WriteFileOptions {
    fn default() -> Self {
        Self {
            append: false,
            create: true,
            create_new: false,
            mode: None,
        }
    }
}

/// Options for [`remove`].
#[derive(Debug, Clone, Copy, Default)]
pub struct RemoveOptions {
    /// Remove directories and their contents.
    pub recursive: bool,
}

/// Options for [`mkdir`].
#[derive(Debug, Clone, Copy, Default)]
pub struct MkdirOptions {
    /// Create missing parent directories.
    pub recursive: bool,
    /// Permission bits for created directories (unix only).
    pub mode: Option<u32>,
}

/// A single directory entry.
#[derive(Debug, Clone)]
pub struct DirEntry {
    /// File name without the leading path.
    pub name: String,
    /// Entry kind (symlinks are not followed).
    pub kind: FileKind,
}

// ============================================================================
// Reading and writing
// ============================================================================

/// Read the entire contents of a file.
pub async fn read_file(path: impl AsRef<Path>) -> Result<Vec<u8>> {
    let path = path.as_ref();
    tokio::fs::read(path)
        .await
        .map_err(|e| CompatError::io("readFile", path, e))
}

/// Read a file as UTF-8 text.
pub async fn read_text_file(path: impl AsRef<Path>) -> Result<String> {
    let path = path.as_ref();
    tokio::fs::read_to_string(path)
        .await
        .map_err(|e| CompatError::io("readTextFile", path, e))
}

/// Write `data` to a file, honoring [`WriteFileOptions`].
pub async fn write_file(
    path: impl AsRef<Path>,
    data: &[u8],
    options: WriteFileOptions,
) -> Result<()> {
    let path = path.as_ref();
    let flags = OpenFlags {
        read: false,
        write: !options.append,
        append: options.append,
        truncate: !options.append,
        create: options.create,
        create_new: options.create_new,
        mode: options.mode,
    };
    let mut file = flags.open(path).await?;
    file.write_all(data).await
}

/// Write UTF-8 text to a file with the default options.
pub async fn write_text_file(path: impl AsRef<Path>, text: &str) -> Result<()> {
    write_file(path, text.as_bytes(), WriteFileOptions::default()).await
}

/// Copy a file, returning the number of bytes copied.
pub async fn copy_file(from: impl AsRef<Path>, to: impl AsRef<Path>) -> Result<u64> {
    let from = from.as_ref();
    tokio::fs::copy(from, to)
        .await
        .map_err(|e| CompatError::io("copyFile", from, e))
}

// ============================================================================
// Directory and path manipulation
// ============================================================================

/// Rename (move) a file or directory.
pub async fn rename(from: impl AsRef<Path>, to: impl AsRef<Path>) -> Result<()> {
    let from = from.as_ref();
    tokio::fs::rename(from, to)
        .await
        .map_err(|e| CompatError::io("rename", from, e))
}

/// Remove a file or directory.
///
/// Without `recursive`, a non-empty directory fails with the translated
/// native error.
pub async fn remove(path: impl AsRef<Path>, options: RemoveOptions) -> Result<()> {
    let path = path.as_ref();
    let metadata = tokio::fs::symlink_metadata(path)
        .await
        .map_err(|e| CompatError::io("remove", path, e))?;

    let result = if metadata.is_dir() {
        if options.recursive {
            tokio::fs::remove_dir_all(path).await
        } else {
            tokio::fs::remove_dir(path).await
        }
    } else {
        tokio::fs::remove_file(path).await
    };
    result.map_err(|e| CompatError::io("remove", path, e))
}

/// Create a directory.
pub async fn mkdir(path: impl AsRef<Path>, options: MkdirOptions) -> Result<()> {
    let path = path.as_ref();
    let result = if options.recursive {
        tokio::fs::create_dir_all(path).await
    } else {
        tokio::fs::create_dir(path).await
    };
    result.map_err(|e| CompatError::io("mkdir", path, e))?;

    #[cfg(unix)]
    if let Some(mode) = options.mode {
        use std::fs::Permissions;
        use std::os::unix::fs::PermissionsExt;
        tokio::fs::set_permissions(path, Permissions::from_mode(mode))
            .await
            .map_err(|e| CompatError::io("mkdir", path, e))?;
    }

    Ok(())
}

/// List a directory, sorted by name.
pub async fn read_dir(path: impl AsRef<Path>) -> Result<Vec<DirEntry>> {
    let path = path.as_ref();
    let mut reader = tokio::fs::read_dir(path)
        .await
        .map_err(|e| CompatError::io("readDir", path, e))?;

    let mut entries = Vec::new();
    while let Some(entry) = reader
        .next_entry()
        .await
        .map_err(|e| CompatError::io("readDir", path, e))?
    {
        let file_type = entry
            .file_type()
            .await
            .map_err(|e| CompatError::io("readDir", path, e))?;
        let kind = if file_type.is_symlink() {
            FileKind::Symlink
        } else if file_type.is_file() {
            FileKind::File
        } else if file_type.is_dir() {
            FileKind::Dir
        } else {
            FileKind::Other
        };
        entries.push(DirEntry {
            name: entry.file_name().to_string_lossy().into_owned(),
            kind,
        });
    }
    entries.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(entries)
}

// ============================================================================
// Metadata
// ============================================================================

/// Metadata of a path, following symlinks.
pub async fn stat(path: impl AsRef<Path>) -> Result<FileInfo> {
    let path = path.as_ref();
    let metadata = tokio::fs::metadata(path)
        .await
        .map_err(|e| CompatError::io("stat", path, e))?;
    Ok(FileInfo::from_metadata(&metadata))
}

/// Metadata of a path without following symlinks.
pub async fn lstat(path: impl AsRef<Path>) -> Result<FileInfo> {
    let path = path.as_ref();
    let metadata = tokio::fs::symlink_metadata(path)
        .await
        .map_err(|e| CompatError::io("lstat", path, e))?;
    Ok(FileInfo::from_metadata(&metadata))
}

/// Resolve a path to its canonical absolute form.
pub async fn realpath(path: impl AsRef<Path>) -> Result<PathBuf> {
    let path = path.as_ref();
    tokio::fs::canonicalize(path)
        .await
        .map_err(|e| CompatError::io("realPath", path, e))
}

/// Read the target of a symbolic link.
pub async fn read_link(path: impl AsRef<Path>) -> Result<PathBuf> {
    let path = path.as_ref();
    tokio::fs::read_link(path)
        .await
        .map_err(|e| CompatError::io("readLink", path, e))
}

/// Create a symbolic link at `link` pointing to `target`.
#[cfg(unix)]
pub async fn symlink(target: impl AsRef<Path>, link: impl AsRef<Path>) -> Result<()> {
    let link = link.as_ref();
    tokio::fs::symlink(target, link)
        .await
        .map_err(|e| CompatError::io("symlink", link, e))
}

/// Change permission bits of a path.
#[cfg(unix)]
pub async fn chmod(path: impl AsRef<Path>, mode: u32) -> Result<()> {
    use std::fs::Permissions;
    use std::os::unix::fs::PermissionsExt;

    let path = path.as_ref();
    tokio::fs::set_permissions(path, Permissions::from_mode(mode))
        .await
        .map_err(|e| CompatError::io("chmod", path, e))
}

/// Truncate or extend a file to `len` bytes.
pub async fn truncate(path: impl AsRef<Path>, len: u64) -> Result<()> {
    let path = path.as_ref();
    let file = tokio::fs::OpenOptions::new()
        .write(true)
        .open(path)
        .await
        .map_err(|e| CompatError::io("truncate", path, e))?;
    file.set_len(len)
        .await
        .map_err(|e| CompatError::io("truncate", path, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_write_read_text_round_trip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("note.txt");

        write_text_file(&path, "salt spray").await.unwrap();
        assert_eq!(read_text_file(&path).await.unwrap(), "salt spray");
    }

    #[tokio::test]
    async fn test_write_file_append() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("log.txt");

        write_text_file(&path, "a").await.unwrap();
        let append = WriteFileOptions {
            append: true,
            ..Default::default()
        };
        write_file(&path, b"b", append).await.unwrap();
        assert_eq!(read_text_file(&path).await.unwrap(), "ab");
    }

    #[tokio::test]
    async fn test_write_file_create_new_refuses_overwrite() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("once.txt");

        let exclusive = WriteFileOptions {
            create_new: true,
            ..Default::default()
        };
        write_file(&path, b"first", exclusive).await.unwrap();
        let err = write_file(&path, b"second", exclusive).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::AlreadyExists);
    }

    #[tokio::test]
    async fn test_mkdir_read_dir_remove() {
        let dir = tempdir().unwrap();
        let nested = dir.path().join("a/b/c");

        let recursive = MkdirOptions {
            recursive: true,
            ..Default::default()
        };
        mkdir(&nested, recursive).await.unwrap();
        write_text_file(nested.join("f.txt"), "x").await.unwrap();

        let entries = read_dir(dir.path().join("a/b")).await.unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].name, "c");
        assert_eq!(entries[0].kind, FileKind::Dir);

        // Non-recursive removal of a non-empty directory fails.
        let err = remove(dir.path().join("a"), RemoveOptions::default())
            .await
            .unwrap_err();
        assert_ne!(err.kind(), ErrorKind::NotFound);

        remove(dir.path().join("a"), RemoveOptions { recursive: true })
            .await
            .unwrap();
        let err = stat(dir.path().join("a")).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_copy_rename() {
        let dir = tempdir().unwrap();
        let src = dir.path().join("src.txt");
        write_text_file(&src, "cargo").await.unwrap();

        let copied = dir.path().join("copy.txt");
        let n = copy_file(&src, &copied).await.unwrap();
        assert_eq!(n, 5);

        let moved = dir.path().join("moved.txt");
        rename(&copied, &moved).await.unwrap();
        assert_eq!(read_text_file(&moved).await.unwrap(), "cargo");
        assert_eq!(
            stat(&copied).await.unwrap_err().kind(),
            ErrorKind::NotFound
        );
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_symlink_stat_lstat() {
        let dir = tempdir().unwrap();
        let target = dir.path().join("target.txt");
        write_text_file(&target, "body").await.unwrap();

        let link = dir.path().join("alias");
        symlink(&target, &link).await.unwrap();

        assert!(stat(&link).await.unwrap().is_file());
        assert!(lstat(&link).await.unwrap().is_symlink());
        assert_eq!(read_link(&link).await.unwrap(), target);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_chmod() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempdir().unwrap();
        let path = dir.path().join("perm.txt");
        write_text_file(&path, "x").await.unwrap();

        chmod(&path, 0o640).await.unwrap();
        let mode = std::fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o640);
    }

    #[tokio::test]
    async fn test_truncate_path() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("t.txt");
        write_text_file(&path, "0123456789").await.unwrap();

        truncate(&path, 4).await.unwrap();
        assert_eq!(read_text_file(&path).await.unwrap(), "0123");
    }

    #[tokio::test]
    async fn test_realpath_resolves_dots() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("real.txt");
        write_text_file(&path, "x").await.unwrap();

        let indirect = dir.path().join(".").join("real.txt");
        let resolved = realpath(&indirect).await.unwrap();
        assert_eq!(resolved.file_name().unwrap(), "real.txt");
        assert!(resolved.is_absolute());
    }
}

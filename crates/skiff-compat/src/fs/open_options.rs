// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Declarative file-open flags.
//!
//! [`OpenFlags`] is the portable description of how a file should be opened:
//! six booleans plus an optional unix mode. [`OpenFlags::validate`] rejects
//! the combinations that have no meaning before anything reaches the OS, and
//! [`OpenFlags::to_std`] maps the rest onto the native open flags.

use std::path::Path;

use crate::error::{CompatError, Result};
use crate::fs::file::FileHandle;

/// Portable open-mode description.
///
/// The default is read-only. Flags mirror the source surface one-to-one:
/// `create_new` means exclusive creation, `append` positions every write at
/// the end of the file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpenFlags {
    /// Open for reading.
    pub read: bool,
    /// Open for writing, positioned at the start.
    pub write: bool,
    /// Open for writing, positioned at the end.
    pub append: bool,
    /// Truncate to zero length on open.
    pub truncate: bool,
    /// Create the file if it does not exist.
    pub create: bool,
    /// Create the file, failing if it already exists.
    pub create_new: bool,
    /// Permission bits applied when the file is created (unix only).
    pub mode: Option<u32>,
}

impl Default for OpenFlags {
    fn default() -> Self {
        Self {
            read: true,
            write: false,
            append: false,
            truncate: false,
            create: false,
            create_new: false,
            mode: None,
        }
    }
}

impl OpenFlags {
    /// Read-only access to an existing file.
    pub fn read_only() -> Self {
        Self::default()
    }

    /// Create-or-truncate write access, the usual "save a file" mode.
    pub fn write_only() -> Self {
        Self {
            read: false,
            write: true,
            truncate: true,
            create: true,
            ..Self::default()
        }
    }

    /// Create-if-missing append access, the usual "log to a file" mode.
    pub fn append_only() -> Self {
        Self {
            read: false,
            append: true,
            create: true,
            ..Self::default()
        }
    }

    /// Reject combinations with no defined meaning.
    ///
    /// The rules, applied in order:
    /// - at least one of `read`, `write`, `append` must be set;
    /// - `truncate` requires `write`;
    /// - `append` and `truncate` are mutually exclusive;
    /// - `create` and `create_new` require `write` or `append`.
    pub fn validate(&self) -> Result<()> {
        const OP: &str = "open";
        if !self.read && !self.write && !self.append {
            return Err(CompatError::invalid_input(
                OP,
                "one of 'read', 'write' or 'append' is required",
            ));
        }
        if self.truncate && !self.write {
            return Err(CompatError::invalid_input(OP, "'truncate' requires 'write'"));
        }
        if self.truncate && self.append {
            return Err(CompatError::invalid_input(
                OP,
                "'truncate' and 'append' are mutually exclusive",
            ));
        }
        if (self.create || self.create_new) && !(self.write || self.append) {
            return Err(CompatError::invalid_input(
                OP,
                "'create' and 'createNew' require 'write' or 'append'",
            ));
        }
        Ok(())
    }

    /// Map onto native [`std::fs::OpenOptions`], validating first.
    pub fn to_std(&self) -> Result<std::fs::OpenOptions> {
        self.validate()?;

        let mut options = std::fs::OpenOptions::new();
        options
            .read(self.read)
            .write(self.write)
            .append(self.append)
            .truncate(self.truncate)
            .create(self.create)
            .create_new(self.create_new);

        #[cfg(unix)]
        if let Some(mode) = self.mode {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(mode);
        }

        Ok(options)
    }

    /// Open `path` with these flags.
    pub async fn open(&self, path: impl AsRef<Path>) -> Result<FileHandle> {
        let path = path.as_ref();
        let options = tokio::fs::OpenOptions::from(self.to_std()?);
        let file = options
            .open(path)
            .await
            .map_err(|e| CompatError::io("open", path, e))?;
        Ok(FileHandle::new(file, path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn flags(
        read: bool,
        write: bool,
        append: bool,
        truncate: bool,
        create: bool,
        create_new: bool,
    ) -> OpenFlags {
        OpenFlags {
            read,
            write,
            append,
            truncate,
            create,
            create_new,
            mode: None,
        }
    }

    /// Reference table for the interesting rows of the flag matrix.
    #[test]
    fn test_reference_table() {
        //                 read   write  append trunc  create new    valid
        let table = [
            (flags(true, false, false, false, false, false), true), // plain read
            (flags(true, true, false, false, false, false), true),  // read/write
            (flags(false, true, false, true, true, false), true),   // save-file
            (flags(false, false, true, false, true, false), true),  // log-append
            (flags(false, true, false, false, false, true), true),  // exclusive create
            (flags(true, false, true, false, false, false), true),  // read + append
            (flags(false, false, false, false, false, false), false), // no capability
            (flags(false, false, false, false, true, false), false), // create w/o write
            (flags(true, false, false, false, false, true), false), // createNew w/o write
            (flags(true, false, false, true, false, false), false), // truncate w/o write
            (flags(false, false, true, true, false, false), false), // truncate w/o write (append)
            (flags(false, true, true, true, true, false), false),   // truncate + append
        ];
        for (row, expected) in table {
            assert_eq!(row.validate().is_ok(), expected, "row: {row:?}");
        }
    }

    /// Every combination either validates or fails per the documented rules;
    /// the exhaustive sweep guards against rule drift.
    #[test]
    fn test_all_combinations_match_rules() {
        for bits in 0..64u8 {
            let row = flags(
                bits & 1 != 0,
                bits & 2 != 0,
                bits & 4 != 0,
                bits & 8 != 0,
                bits & 16 != 0,
                bits & 32 != 0,
            );
            let capability = row.read || row.write || row.append;
            let truncate_ok = !row.truncate || (row.write && !row.append);
            let create_ok = !(row.create || row.create_new) || row.write || row.append;
            let expected = capability && truncate_ok && create_ok;
            assert_eq!(row.validate().is_ok(), expected, "row: {row:?}");
        }
    }

    #[test]
    fn test_invalid_combination_kind() {
        let err = flags(false, false, false, true, false, false)
            .validate()
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
    }

    #[tokio::test]
    async fn test_create_new_rejects_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("exclusive.txt");
        tokio::fs::write(&path, b"present").await.unwrap();

        let mut exclusive = OpenFlags::write_only();
        exclusive.truncate = false;
        exclusive.create_new = true;

        let err = exclusive.open(&path).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::AlreadyExists);
    }

    #[tokio::test]
    async fn test_read_only_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = OpenFlags::read_only()
            .open(dir.path().join("absent.txt"))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_mode_applied_on_creation() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("locked.txt");

        let mut restricted = OpenFlags::write_only();
        restricted.mode = Some(0o600);
        restricted.open(&path).await.unwrap();

        let mode = std::fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }
}

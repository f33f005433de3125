// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! File system surface: open flags, file handles, and path operations.

pub mod file;
pub mod open_options;
pub mod ops;

pub use file::{FileHandle, FileInfo, FileKind, SeekFrom};
pub use open_options::OpenFlags;
pub use ops::{DirEntry, MkdirOptions, RemoveOptions, WriteFileOptions};

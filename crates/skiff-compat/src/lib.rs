// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! # skiff-compat
//!
//! A portability layer presenting the I/O surface an edge-function runtime
//! expects — files, TCP, TLS, child processes, filesystem watching — on top
//! of the native platform. Every operation delegates the real work to the OS
//! (through tokio and friends) and contributes exactly two things of its own:
//!
//! - a uniform, declarative call shape ([`OpenFlags`], [`Command`], option
//!   structs), and
//! - a uniform error path: every failure is translated into a fixed
//!   vocabulary of [`ErrorKind`]s, at every call site.
//!
//! ## Quick start
//!
//! ```rust,ignore
//! use skiff_compat::fs::{ops, OpenFlags};
//!
//! #[tokio::main]
//! async fn main() -> skiff_compat::Result<()> {
//!     ops::write_text_file("greeting.txt", "hello").await?;
//!
//!     let mut file = OpenFlags::read_only().open("greeting.txt").await?;
//!     let info = file.stat().await?;
//!     assert_eq!(info.size, 5);
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod fs;
pub mod net;
pub mod process;
pub mod resource;
pub mod watch;

// Re-exports
pub use error::{CompatError, ErrorKind, Result};
pub use fs::{FileHandle, FileInfo, OpenFlags};
pub use process::{Child, Command, ExitStatus, Output, Stdio};
pub use resource::{IoHandle, ResourceId, ResourceTable};
pub use watch::{FsEvent, FsEventKind, FsWatcher};

/// Version of the portability layer.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

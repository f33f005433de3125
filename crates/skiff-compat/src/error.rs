// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Error translation for the portability layer.
//!
//! Native failures are classified into a fixed vocabulary of [`ErrorKind`]s.
//! The raw OS error code is consulted first; when an error carries no OS
//! code, classification falls back to [`std::io::ErrorKind`]. Every public
//! operation of this crate routes its error through this module, so callers
//! can match on one kind set regardless of which subsystem failed.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for portability-layer operations.
pub type Result<T> = std::result::Result<T, CompatError>;

/// The fixed error-kind vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(missing_docs)] // variant names are the documentation
pub enum ErrorKind {
    NotFound,
    PermissionDenied,
    ConnectionRefused,
    ConnectionReset,
    ConnectionAborted,
    NotConnected,
    AddrInUse,
    AddrNotAvailable,
    BrokenPipe,
    AlreadyExists,
    InvalidInput,
    InvalidData,
    TimedOut,
    Interrupted,
    WriteZero,
    UnexpectedEof,
    WouldBlock,
    BadResource,
    Busy,
    NotSupported,
    Other,
}

impl ErrorKind {
    /// Classify a raw OS error code.
    ///
    /// The table is total: codes without a dedicated row map to [`Other`].
    ///
    /// [`Other`]: ErrorKind::Other
    pub fn from_raw_os_error(code: i32) -> Self {
        use nix::libc as c;
        match code {
            c::ENOENT => Self::NotFound,
            c::EEXIST => Self::AlreadyExists,
            c::EBADF => Self::BadResource,
            c::EACCES | c::EPERM => Self::PermissionDenied,
            c::ECONNREFUSED => Self::ConnectionRefused,
            c::ECONNRESET => Self::ConnectionReset,
            c::ECONNABORTED => Self::ConnectionAborted,
            c::ENOTCONN => Self::NotConnected,
            c::EADDRINUSE => Self::AddrInUse,
            c::EADDRNOTAVAIL => Self::AddrNotAvailable,
            c::EPIPE => Self::BrokenPipe,
            c::EINVAL => Self::InvalidInput,
            c::ETIMEDOUT => Self::TimedOut,
            c::EINTR => Self::Interrupted,
            // EWOULDBLOCK aliases EAGAIN on every platform we target.
            c::EAGAIN => Self::WouldBlock,
            c::EBUSY | c::ETXTBSY => Self::Busy,
            _ if code == c::EOPNOTSUPP || code == c::ENOTSUP => Self::NotSupported,
            _ => Self::Other,
        }
    }

    /// Classify a [`std::io::ErrorKind`], for errors without an OS code.
    pub fn from_io_kind(kind: io::ErrorKind) -> Self {
        match kind {
            io::ErrorKind::NotFound => Self::NotFound,
            io::ErrorKind::PermissionDenied => Self::PermissionDenied,
            io::ErrorKind::ConnectionRefused => Self::ConnectionRefused,
            io::ErrorKind::ConnectionReset => Self::ConnectionReset,
            io::ErrorKind::ConnectionAborted => Self::ConnectionAborted,
            io::ErrorKind::NotConnected => Self::NotConnected,
            io::ErrorKind::AddrInUse => Self::AddrInUse,
            io::ErrorKind::AddrNotAvailable => Self::AddrNotAvailable,
            io::ErrorKind::BrokenPipe => Self::BrokenPipe,
            io::ErrorKind::AlreadyExists => Self::AlreadyExists,
            io::ErrorKind::InvalidInput => Self::InvalidInput,
            io::ErrorKind::InvalidData => Self::InvalidData,
            io::ErrorKind::TimedOut => Self::TimedOut,
            io::ErrorKind::Interrupted => Self::Interrupted,
            io::ErrorKind::WriteZero => Self::WriteZero,
            io::ErrorKind::UnexpectedEof => Self::UnexpectedEof,
            io::ErrorKind::WouldBlock => Self::WouldBlock,
            io::ErrorKind::Unsupported => Self::NotSupported,
            _ => Self::Other,
        }
    }

    /// Stable string form of the kind, e.g. `"NotFound"`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NotFound => "NotFound",
            Self::PermissionDenied => "PermissionDenied",
            Self::ConnectionRefused => "ConnectionRefused",
            Self::ConnectionReset => "ConnectionReset",
            Self::ConnectionAborted => "ConnectionAborted",
            Self::NotConnected => "NotConnected",
            Self::AddrInUse => "AddrInUse",
            Self::AddrNotAvailable => "AddrNotAvailable",
            Self::BrokenPipe => "BrokenPipe",
            Self::AlreadyExists => "AlreadyExists",
            Self::InvalidInput => "InvalidInput",
            Self::InvalidData => "InvalidData",
            Self::TimedOut => "TimedOut",
            Self::Interrupted => "Interrupted",
            Self::WriteZero => "WriteZero",
            Self::UnexpectedEof => "UnexpectedEof",
            Self::WouldBlock => "WouldBlock",
            Self::BadResource => "BadResource",
            Self::Busy => "Busy",
            Self::NotSupported => "NotSupported",
            Self::Other => "Other",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classify an [`io::Error`], preferring its raw OS code.
fn classify(err: &io::Error) -> ErrorKind {
    match err.raw_os_error() {
        Some(code) => ErrorKind::from_raw_os_error(code),
        None => ErrorKind::from_io_kind(err.kind()),
    }
}

/// Errors produced by the portability layer.
#[derive(Debug, Error)]
pub enum CompatError {
    /// A path-addressed operation failed.
    #[error("{op} '{}': {source}", .path.display())]
    Io {
        /// Translated kind.
        kind: ErrorKind,
        /// Operation name, e.g. `"open"`.
        op: &'static str,
        /// The path involved.
        path: PathBuf,
        /// Underlying native error.
        source: io::Error,
    },

    /// A handle- or socket-level operation failed.
    #[error("{op}: {source}")]
    Stream {
        /// Translated kind.
        kind: ErrorKind,
        /// Operation name, e.g. `"read"`.
        op: &'static str,
        /// Underlying native error.
        source: io::Error,
    },

    /// The resource id is unknown or already closed.
    #[error("{op}: bad resource id")]
    BadResource {
        /// Operation name.
        op: &'static str,
    },

    /// The arguments are rejected before reaching the OS.
    #[error("{op}: {message}")]
    InvalidInput {
        /// Operation name.
        op: &'static str,
        /// What was wrong.
        message: String,
    },

    /// Input material (certificates, keys) could not be understood.
    #[error("{op}: {message}")]
    InvalidData {
        /// Operation name.
        op: &'static str,
        /// What was wrong.
        message: String,
    },

    /// Filesystem watch backend failure.
    #[error("watch: {0}")]
    Watch(String),
}

impl CompatError {
    /// The translated [`ErrorKind`] of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Io { kind, .. } | Self::Stream { kind, .. } => *kind,
            Self::BadResource { .. } => ErrorKind::BadResource,
            Self::InvalidInput { .. } => ErrorKind::InvalidInput,
            Self::InvalidData { .. } => ErrorKind::InvalidData,
            Self::Watch(_) => ErrorKind::Other,
        }
    }

    /// Translate a native error from a path-addressed operation.
    pub fn io(op: &'static str, path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            kind: classify(&source),
            op,
            path: path.into(),
            source,
        }
    }

    /// Translate a native error from a stream or handle operation.
    pub fn stream(op: &'static str, source: io::Error) -> Self {
        Self::Stream {
            kind: classify(&source),
            op,
            source,
        }
    }

    /// An unknown or closed resource id.
    pub fn bad_resource(op: &'static str) -> Self {
        Self::BadResource { op }
    }

    /// Arguments rejected before reaching the OS.
    pub fn invalid_input(op: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidInput {
            op,
            message: message.into(),
        }
    }

    /// Unparseable input material.
    pub fn invalid_data(op: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidData {
            op,
            message: message.into(),
        }
    }
}

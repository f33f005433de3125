// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Error types for the skiff CLI.

use thiserror::Error;

/// Result type for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;

/// Errors surfaced by CLI commands.
#[derive(Debug, Error)]
pub enum CliError {
    /// Portability-layer failure.
    #[error("{0}")]
    Compat(#[from] skiff_compat::CompatError),

    /// Configuration file failure.
    #[error("{0}")]
    Jsonc(#[from] skiff_jsonc::JsoncError),

    /// OS keychain failure.
    #[error("keychain error: {0}")]
    Keychain(#[from] keyring::Error),

    /// Plain IO failure outside the portability layer.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Bundling failure.
    #[error("bundle error: {0}")]
    Bundle(String),

    /// The running binary and the release metadata disagree.
    #[error("version mismatch: running {running} but release metadata declares {declared}")]
    VersionMismatch {
        /// Version of the running binary.
        running: String,
        /// Version found in the metadata file.
        declared: String,
    },

    /// General error with message.
    #[error("{0}")]
    Other(String),
}

// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! # skiff
//!
//! A lightweight deploy CLI for edge functions, plus the pieces it is built
//! from:
//!
//! - [`runtime`] — the request/response handler loop used by `skiff serve`
//!   and by handler programs (see the `demos/` directory)
//! - [`token_store`] — access-token storage, OS keychain backed with an
//!   in-memory fallback
//!
//! The underlying I/O portability layer lives in the `skiff-compat` crate,
//! and JSONC configuration support in `skiff-jsonc`.
//!
//! ## Writing a handler
//!
//! ```rust,ignore
//! use skiff::runtime::{serve, Handler, ServeOptions};
//!
//! struct Hello;
//!
//! #[async_trait::async_trait]
//! impl Handler for Hello {
//!     async fn handle(&self, _request: Request<Incoming>) -> Response<Full<Bytes>> {
//!         Response::new(Full::new(Bytes::from_static(b"Hello, World!\n")))
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let options = ServeOptions { addr: "127.0.0.1:8000".into() };
//!     serve(&options, std::sync::Arc::new(Hello)).await?;
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod runtime;
pub mod token_store;

// Re-exports
pub use error::{CliError, Result};

/// Version of the skiff CLI.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

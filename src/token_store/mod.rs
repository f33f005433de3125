// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Access-token storage.
//!
//! Tokens live in the OS keychain by default. When the token is injected
//! through the environment (CI, containers without a keychain), an
//! in-memory store is used instead and nothing touches the OS.

mod keychain;
mod memory;

pub use keychain::KeychainStore;
pub use memory::MemoryStore;

use crate::error::Result;

/// Environment variable that overrides the keychain.
pub const TOKEN_ENV_VAR: &str = "SKIFF_ACCESS_TOKEN";

/// Keychain service name under which the token is filed.
pub const SERVICE: &str = "skiff";

/// Uniform interface over the places a token can live.
pub trait TokenStore: Send + Sync {
    /// The stored token, if any.
    fn get(&self) -> Result<Option<String>>;

    /// Store (or replace) the token.
    fn store(&self, token: &str) -> Result<()>;

    /// Delete the token. Deleting an absent token is not an error.
    fn remove(&self) -> Result<()>;
}

/// Pick the store for this invocation: the environment wins, the keychain
/// is the default.
pub fn provider() -> Box<dyn TokenStore> {
    match std::env::var(TOKEN_ENV_VAR) {
        Ok(token) if !token.is_empty() => Box::new(MemoryStore::with_token(token)),
        _ => Box::new(KeychainStore::new(SERVICE)),
    }
}

// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Process-local token storage.

use parking_lot::RwLock;

use crate::error::Result;
use crate::token_store::TokenStore;

/// Token storage that lives and dies with the process.
///
/// Used when the token comes from the environment, so nothing is written to
/// the OS secret store.
#[derive(Default)]
pub struct MemoryStore {
    token: RwLock<Option<String>>,
}

impl MemoryStore {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store seeded with a token.
    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: RwLock::new(Some(token.into())),
        }
    }
}

impl TokenStore for MemoryStore {
    fn get(&self) -> Result<Option<String>> {
        Ok(self.token.read().clone())
    }

    fn store(&self, token: &str) -> Result<()> {
        *self.token.write() = Some(token.to_string());
        Ok(())
    }

    fn remove(&self) -> Result<()> {
        *self.token.write() = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_get_remove() {
        let store = MemoryStore::new();
        assert_eq!(store.get().unwrap(), None);

        store.store("tk_123").unwrap();
        assert_eq!(store.get().unwrap().as_deref(), Some("tk_123"));

        store.remove().unwrap();
        assert_eq!(store.get().unwrap(), None);

        // Removing again is fine.
        store.remove().unwrap();
    }

    #[test]
    fn test_seeded_store() {
        let store = MemoryStore::with_token("from-env");
        assert_eq!(store.get().unwrap().as_deref(), Some("from-env"));
    }
}

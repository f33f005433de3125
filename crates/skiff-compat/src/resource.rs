// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Uniform resource handles.
//!
//! Open files, sockets and pipes all present the same minimal surface
//! through [`IoHandle`], and can be registered in a [`ResourceTable`] that
//! hands out numeric ids. The table owns registered handles; closing an id
//! removes the entry and shuts the handle down. Operating on an unknown or
//! already-closed id is a [`BadResource`] error, never a panic.
//!
//! [`BadResource`]: crate::ErrorKind::BadResource

use std::borrow::Cow;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::sync::Mutex as AsyncMutex;

use crate::error::{CompatError, Result};

/// Numeric id of a registered resource.
pub type ResourceId = u32;

/// The uniform read/write/shutdown surface of a wrapped native handle.
///
/// Implementations forward each call directly to the underlying handle and
/// translate only the error path.
#[async_trait]
pub trait IoHandle: Send + Sync + std::fmt::Debug {
    /// Short name of the handle type, e.g. `"fsFile"` or `"tcpStream"`.
    fn handle_name(&self) -> Cow<'static, str>;

    /// Read into `buf`, returning the number of bytes read (0 at EOF).
    async fn read(&mut self, buf: &mut [u8]) -> Result<usize>;

    /// Write from `buf`, returning the number of bytes written.
    async fn write(&mut self, buf: &[u8]) -> Result<usize>;

    /// Flush and shut down the write side, where the handle has one.
    async fn shutdown(&mut self) -> Result<()> {
        Ok(())
    }
}

/// A registered handle as stored in the table: shared, with interior
/// locking so concurrent callers serialize their reads and writes.
pub type SharedHandle = Arc<AsyncMutex<Box<dyn IoHandle>>>;

struct ResourceEntry {
    name: Cow<'static, str>,
    handle: SharedHandle,
}

/// Table mapping [`ResourceId`]s to registered handles.
///
/// Ids increase monotonically and are never reused within a table.
#[derive(Default)]
pub struct ResourceTable {
    next_id: AtomicU32,
    entries: Mutex<HashMap<ResourceId, ResourceEntry>>,
}

impl ResourceTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handle, returning its id.
    pub fn add(&self, handle: Box<dyn IoHandle>) -> ResourceId {
        let rid = self.next_id.fetch_add(1, Ordering::Relaxed);
        let entry = ResourceEntry {
            name: handle.handle_name(),
            handle: Arc::new(AsyncMutex::new(handle)),
        };
        self.entries.lock().insert(rid, entry);
        rid
    }

    /// Look up a registered handle.
    pub fn get(&self, rid: ResourceId) -> Result<SharedHandle> {
        self.entries
            .lock()
            .get(&rid)
            .map(|entry| Arc::clone(&entry.handle))
            .ok_or_else(|| CompatError::bad_resource("get"))
    }

    /// Name of a registered handle.
    pub fn name(&self, rid: ResourceId) -> Result<Cow<'static, str>> {
        self.entries
            .lock()
            .get(&rid)
            .map(|entry| entry.name.clone())
            .ok_or_else(|| CompatError::bad_resource("name"))
    }

    /// Snapshot of `(id, name)` for every live resource, ordered by id.
    pub fn entries(&self) -> Vec<(ResourceId, String)> {
        let mut list: Vec<_> = self
            .entries
            .lock()
            .iter()
            .map(|(rid, entry)| (*rid, entry.name.to_string()))
            .collect();
        list.sort_unstable_by_key(|(rid, _)| *rid);
        list
    }

    /// Number of live resources.
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    /// Whether the table holds no live resources.
    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    /// Remove a handle from the table without shutting it down.
    pub fn take(&self, rid: ResourceId) -> Result<SharedHandle> {
        self.entries
            .lock()
            .remove(&rid)
            .map(|entry| entry.handle)
            .ok_or_else(|| CompatError::bad_resource("take"))
    }

    /// Shut down and remove a handle. A second close of the same id fails
    /// with `BadResource`.
    pub async fn close(&self, rid: ResourceId) -> Result<()> {
        let entry = self
            .entries
            .lock()
            .remove(&rid)
            .ok_or_else(|| CompatError::bad_resource("close"))?;
        let mut handle = entry.handle.lock().await;
        handle.shutdown().await
    }
}

// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Filesystem watching.
//!
//! Wraps the platform's change-notification backend and forwards events over
//! a channel. The watcher unsubscribes when dropped.

use std::path::{Path, PathBuf};

use notify::{RecursiveMode, Watcher};
use tokio::sync::mpsc;

use crate::error::{CompatError, Result};

/// Coarse classification of a change event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FsEventKind {
    /// A path was created.
    Create,
    /// Contents or metadata changed.
    Modify,
    /// A path was removed.
    Remove,
    /// A path was read (only reported by some backends).
    Access,
    /// Anything the backend could not classify.
    Other,
}

/// One filesystem change notification.
#[derive(Debug, Clone)]
pub struct FsEvent {
    /// What happened.
    pub kind: FsEventKind,
    /// The paths involved.
    pub paths: Vec<PathBuf>,
}

impl FsEvent {
    fn from_notify(event: notify::Event) -> Self {
        let kind = match event.kind {
            notify::EventKind::Create(_) => FsEventKind::Create,
            notify::EventKind::Modify(_) => FsEventKind::Modify,
            notify::EventKind::Remove(_) => FsEventKind::Remove,
            notify::EventKind::Access(_) => FsEventKind::Access,
            _ => FsEventKind::Other,
        };
        Self {
            kind,
            paths: event.paths,
        }
    }
}

/// An active filesystem watch over one or more paths.
#[derive(Debug)]
pub struct FsWatcher {
    receiver: mpsc::UnboundedReceiver<Result<FsEvent>>,
    // Keep the backend alive; dropping it cancels the watch.
    _watcher: notify::RecommendedWatcher,
}

impl FsWatcher {
    /// Start watching `paths`.
    pub fn new<P: AsRef<Path>>(paths: &[P], recursive: bool) -> Result<Self> {
        let (sender, receiver) = mpsc::unbounded_channel();

        let mut watcher =
            notify::recommended_watcher(move |result: notify::Result<notify::Event>| {
                let message = match result {
                    Ok(event) => Ok(FsEvent::from_notify(event)),
                    Err(e) => Err(CompatError::Watch(e.to_string())),
                };
                // The receiver may be gone; nothing to do then.
                let _ = sender.send(message);
            })
            .map_err(|e| CompatError::Watch(e.to_string()))?;

        let mode = if recursive {
            RecursiveMode::Recursive
        } else {
            RecursiveMode::NonRecursive
        };
        for path in paths {
            watcher
                .watch(path.as_ref(), mode)
                .map_err(|e| CompatError::Watch(e.to_string()))?;
        }

        Ok(Self {
            receiver,
            _watcher: watcher,
        })
    }

    /// Wait for the next event. `None` means the backend shut down.
    pub async fn recv(&mut self) -> Option<Result<FsEvent>> {
        self.receiver.recv().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_file_creation_is_observed() {
        let dir = tempdir().unwrap();
        let mut watcher = FsWatcher::new(&[dir.path()], true).unwrap();

        let target = dir.path().join("fresh.txt");
        std::fs::write(&target, b"new").unwrap();

        // Backends may coalesce or split events; accept the first one that
        // names our file.
        let deadline = Duration::from_secs(5);
        let observed = tokio::time::timeout(deadline, async {
            while let Some(event) = watcher.recv().await {
                let event = event.unwrap();
                if event.paths.iter().any(|p| p.ends_with("fresh.txt")) {
                    return true;
                }
            }
            false
        })
        .await
        .expect("no event within deadline");
        assert!(observed);
    }

    #[test]
    fn test_watching_missing_path_fails() {
        let err = FsWatcher::new(&[PathBuf::from("/no/such/dir/at/all")], false).unwrap_err();
        assert!(matches!(err, CompatError::Watch(_)));
    }
}

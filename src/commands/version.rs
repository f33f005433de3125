// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Version command implementation.
//!
//! `--check` guards releases: the version recorded in the release metadata
//! file must match the binary, otherwise the command fails.

use std::path::Path;

use owo_colors::OwoColorize;
use serde::Deserialize;

use skiff::error::{CliError, Result};
use skiff::VERSION;

use crate::cli::{Cli, VersionArgs};

#[derive(Debug, Deserialize)]
struct ReleaseMetadata {
    version: String,
}

pub async fn run(args: &VersionArgs, cli: &Cli) -> Result<()> {
    if !cli.quiet {
        println!("skiff {VERSION}");
    }

    if let Some(path) = &args.check {
        check_release_file(path)?;
        if !cli.quiet {
            println!("{} {}", "Release metadata matches:".green(), path.display());
        }
    }
    Ok(())
}

/// Fail unless the metadata file declares exactly the running version.
fn check_release_file(path: &Path) -> Result<()> {
    let metadata: ReleaseMetadata = skiff_jsonc::read_file_as(path)?;
    if metadata.version != VERSION {
        return Err(CliError::VersionMismatch {
            running: VERSION.to_string(),
            declared: metadata.version,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_matching_version_passes() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("release.jsonc");
        std::fs::write(
            &path,
            format!("{{\n  // cut by CI\n  \"version\": \"{VERSION}\",\n}}\n"),
        )
        .unwrap();

        check_release_file(&path).unwrap();
    }

    #[test]
    fn test_mismatch_fails() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("release.jsonc");
        std::fs::write(&path, "{ \"version\": \"0.0.0-stale\" }").unwrap();

        let err = check_release_file(&path).unwrap_err();
        match err {
            CliError::VersionMismatch { declared, .. } => {
                assert_eq!(declared, "0.0.0-stale");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_missing_file_fails() {
        assert!(check_release_file(Path::new("/no/such/release.jsonc")).is_err());
    }
}

// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Serve command implementation.
//!
//! Serves a directory of static assets through the handler loop, which is
//! also how handler programs exercise their code locally before deploying.

use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use http_body_util::Full;
use hyper::body::Incoming;
use hyper::header::{self, HeaderValue};
use hyper::{Request, Response, StatusCode};
use owo_colors::OwoColorize;

use skiff::error::Result;
use skiff::runtime::{self, Handler, ServeOptions};
use skiff_compat::error::ErrorKind;
use skiff_compat::fs::ops;
use skiff_compat::watch::FsWatcher;

use crate::cli::{Cli, ServeArgs};

pub async fn run(args: &ServeArgs, cli: &Cli) -> Result<()> {
    let root = ops::realpath(&args.root).await?;

    if args.watch {
        let mut watcher = FsWatcher::new(&[root.clone()], true)?;
        tokio::spawn(async move {
            while let Some(event) = watcher.recv().await {
                match event {
                    Ok(event) => {
                        tracing::info!(kind = ?event.kind, paths = ?event.paths, "file change")
                    }
                    Err(e) => tracing::warn!("watch error: {e}"),
                }
            }
        });
    }

    if !cli.quiet {
        println!("{} {}", "Serving".green().bold(), root.display());
    }

    let options = ServeOptions {
        addr: args.addr.clone(),
    };
    runtime::serve(&options, Arc::new(StaticHandler::new(root))).await
}

/// Handler mapping request paths onto files under a root directory.
pub struct StaticHandler {
    root: PathBuf,
}

impl StaticHandler {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Resolve a request path and load the file behind it.
    async fn load(&self, request_path: &str) -> (StatusCode, &'static str, Vec<u8>) {
        let relative = request_path.trim_start_matches('/');
        let relative = if relative.is_empty() {
            "index.html"
        } else {
            relative
        };

        let candidate = Path::new(relative);
        if candidate
            .components()
            .any(|c| matches!(c, Component::ParentDir))
        {
            return (
                StatusCode::FORBIDDEN,
                "text/plain; charset=utf-8",
                b"forbidden\n".to_vec(),
            );
        }

        let mut full = self.root.join(candidate);
        if let Ok(info) = ops::stat(&full).await {
            if info.is_dir() {
                full.push("index.html");
            }
        }

        match ops::read_file(&full).await {
            Ok(body) => (StatusCode::OK, content_type(&full), body),
            Err(e) => match e.kind() {
                ErrorKind::NotFound => (
                    StatusCode::NOT_FOUND,
                    "text/plain; charset=utf-8",
                    b"not found\n".to_vec(),
                ),
                ErrorKind::PermissionDenied => (
                    StatusCode::FORBIDDEN,
                    "text/plain; charset=utf-8",
                    b"forbidden\n".to_vec(),
                ),
                _ => {
                    tracing::error!(path = %full.display(), error = %e, "read failed");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "text/plain; charset=utf-8",
                        b"internal error\n".to_vec(),
                    )
                }
            },
        }
    }
}

#[async_trait]
impl Handler for StaticHandler {
    async fn handle(&self, request: Request<Incoming>) -> Response<Full<Bytes>> {
        let (status, mime, body) = self.load(request.uri().path()).await;
        let mut response = Response::new(Full::new(Bytes::from(body)));
        *response.status_mut() = status;
        response
            .headers_mut()
            .insert(header::CONTENT_TYPE, HeaderValue::from_static(mime));
        response
    }
}

/// Content type by file extension; everything unknown is a download.
fn content_type(path: &Path) -> &'static str {
    match path.extension().and_then(|e| e.to_str()) {
        Some("html") | Some("htm") => "text/html; charset=utf-8",
        Some("css") => "text/css; charset=utf-8",
        Some("js") | Some("mjs") => "text/javascript; charset=utf-8",
        Some("json") => "application/json",
        Some("txt") => "text/plain; charset=utf-8",
        Some("svg") => "image/svg+xml",
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("wasm") => "application/wasm",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_load_existing_file() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("app.js"), b"export {}").unwrap();

        let handler = StaticHandler::new(dir.path());
        let (status, mime, body) = handler.load("/app.js").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(mime, "text/javascript; charset=utf-8");
        assert_eq!(body, b"export {}");
    }

    #[tokio::test]
    async fn test_load_missing_file_is_404() {
        let dir = tempdir().unwrap();
        let handler = StaticHandler::new(dir.path());
        let (status, _, _) = handler.load("/absent.html").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_root_falls_back_to_index() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("index.html"), b"<h1>hi</h1>").unwrap();

        let handler = StaticHandler::new(dir.path());
        let (status, mime, body) = handler.load("/").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(mime, "text/html; charset=utf-8");
        assert_eq!(body, b"<h1>hi</h1>");
    }

    #[tokio::test]
    async fn test_directory_request_serves_its_index() {
        let dir = tempdir().unwrap();
        std::fs::create_dir(dir.path().join("docs")).unwrap();
        std::fs::write(dir.path().join("docs/index.html"), b"docs").unwrap();

        let handler = StaticHandler::new(dir.path());
        let (status, _, body) = handler.load("/docs").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, b"docs");
    }

    #[tokio::test]
    async fn test_parent_traversal_is_forbidden() {
        let dir = tempdir().unwrap();
        let handler = StaticHandler::new(dir.path());
        let (status, _, _) = handler.load("/../etc/passwd").await;
        assert_eq!(status, StatusCode::FORBIDDEN);
    }

    #[test]
    fn test_content_types() {
        assert_eq!(content_type(Path::new("a.json")), "application/json");
        assert_eq!(
            content_type(Path::new("a.unknown")),
            "application/octet-stream"
        );
    }
}

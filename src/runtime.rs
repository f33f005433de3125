// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! The handler event loop.
//!
//! Wires a request/response [`Handler`] to a TCP listen loop: accept a
//! connection, run the HTTP/1 protocol over it, hand each request to the
//! handler, write the response back. Connections are served concurrently,
//! one task each, and the loop drains on ctrl-c.

use std::convert::Infallible;
use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use http_body_util::Full;
use hyper::body::Incoming;
use hyper::service::service_fn;
use hyper::{Request, Response};
use hyper_util::rt::TokioIo;
use owo_colors::OwoColorize;
use skiff_compat::net::{TcpListener, TcpStream};

use crate::error::Result;

/// A request/response edge function.
///
/// Handlers are infallible by construction: anything that can go wrong is
/// expressed as an error response.
#[async_trait]
pub trait Handler: Send + Sync + 'static {
    /// Produce the response for one request.
    async fn handle(&self, request: Request<Incoming>) -> Response<Full<Bytes>>;
}

/// Options for [`serve`].
#[derive(Debug, Clone)]
pub struct ServeOptions {
    /// Address to listen on, e.g. `"127.0.0.1:8000"`.
    pub addr: String,
}

impl Default for ServeOptions {
    fn default() -> Self {
        Self {
            addr: "127.0.0.1:8000".to_string(),
        }
    }
}

/// Bind, announce the address, and run the loop until ctrl-c.
pub async fn serve(options: &ServeOptions, handler: Arc<dyn Handler>) -> Result<()> {
    let listener = TcpListener::bind(options.addr.as_str()).await?;
    let addr = listener.local_addr()?;
    println!("{} http://{}/", "Listening on".green().bold(), addr);
    serve_on(listener, handler, shutdown_signal()).await
}

/// Run the accept loop on an existing listener until `shutdown` resolves.
///
/// Split out from [`serve`] so callers (and tests) can control the listener
/// and the shutdown condition.
pub async fn serve_on(
    listener: TcpListener,
    handler: Arc<dyn Handler>,
    shutdown: impl Future<Output = ()> + Send,
) -> Result<()> {
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            _ = &mut shutdown => {
                tracing::info!("shutdown requested, leaving accept loop");
                break;
            }
            accepted = listener.accept() => {
                let (stream, remote) = accepted?;
                tracing::debug!(%remote, "connection accepted");
                let handler = Arc::clone(&handler);
                tokio::spawn(async move {
                    if let Err(e) = serve_connection(stream, handler).await {
                        tracing::debug!(%remote, error = %e, "connection closed with error");
                    }
                });
            }
        }
    }
    Ok(())
}

async fn serve_connection(
    stream: TcpStream,
    handler: Arc<dyn Handler>,
) -> std::result::Result<(), hyper::Error> {
    let io = TokioIo::new(stream.into_inner());
    let service = service_fn(move |request| {
        let handler = Arc::clone(&handler);
        async move { Ok::<_, Infallible>(handler.handle(request).await) }
    });
    hyper::server::conn::http1::Builder::new()
        .serve_connection(io, service)
        .await
}

async fn shutdown_signal() {
    // Without a ctrl-c handler there is no graceful stop; log it and serve
    // until the process is killed.
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("could not install ctrl-c handler: {e}");
        std::future::pending::<()>().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct EchoPath;

    #[async_trait]
    impl Handler for EchoPath {
        async fn handle(&self, request: Request<Incoming>) -> Response<Full<Bytes>> {
            let body = format!("path={}", request.uri().path());
            Response::new(Full::new(Bytes::from(body)))
        }
    }

    async fn request_over_loopback(path: &str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let (stop, stopped) = tokio::sync::oneshot::channel::<()>();
        let server = tokio::spawn(serve_on(listener, Arc::new(EchoPath), async move {
            let _ = stopped.await;
        }));

        let mut client = TcpStream::connect(addr).await.unwrap();
        let request = format!("GET {path} HTTP/1.1\r\nhost: localhost\r\nconnection: close\r\n\r\n");
        client.write_all(request.as_bytes()).await.unwrap();

        let mut response = Vec::new();
        loop {
            let mut chunk = [0u8; 1024];
            let n = client.read(&mut chunk).await.unwrap();
            if n == 0 {
                break;
            }
            response.extend_from_slice(&chunk[..n]);
        }

        stop.send(()).unwrap();
        server.await.unwrap().unwrap();
        String::from_utf8(response).unwrap()
    }

    #[tokio::test]
    async fn test_serve_round_trip() {
        let response = request_over_loopback("/greet").await;
        assert!(response.starts_with("HTTP/1.1 200 OK"), "got: {response}");
        assert!(response.ends_with("path=/greet"), "got: {response}");
    }

    #[tokio::test]
    async fn test_serve_stops_on_shutdown() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let (stop, stopped) = tokio::sync::oneshot::channel::<()>();
        let server = tokio::spawn(serve_on(listener, Arc::new(EchoPath), async move {
            let _ = stopped.await;
        }));

        stop.send(()).unwrap();
        server.await.unwrap().unwrap();
    }
}

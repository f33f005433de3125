// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! TCP listen/connect surface.
//!
//! Thin wrappers over the native socket types. Each call forwards directly
//! and translates the error path; no buffering, no protocol.

pub mod tls;

use std::borrow::Cow;
use std::net::SocketAddr;

use async_trait::async_trait;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::ToSocketAddrs;

use crate::error::{CompatError, Result};
use crate::resource::IoHandle;

/// A listening TCP socket.
#[derive(Debug)]
pub struct TcpListener {
    inner: tokio::net::TcpListener,
}

impl TcpListener {
    /// Bind to `addr` and start listening.
    pub async fn bind(addr: impl ToSocketAddrs) -> Result<Self> {
        let inner = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|e| CompatError::stream("listen", e))?;
        Ok(Self { inner })
    }

    /// Accept one connection.
    pub async fn accept(&self) -> Result<(TcpStream, SocketAddr)> {
        let (stream, remote) = self
            .inner
            .accept()
            .await
            .map_err(|e| CompatError::stream("accept", e))?;
        Ok((TcpStream { inner: stream }, remote))
    }

    /// The locally bound address.
    pub fn local_addr(&self) -> Result<SocketAddr> {
        self.inner
            .local_addr()
            .map_err(|e| CompatError::stream("localAddr", e))
    }
}

/// A connected TCP stream.
#[derive(Debug)]
pub struct TcpStream {
    inner: tokio::net::TcpStream,
}

impl TcpStream {
    /// Connect to `addr`.
    pub async fn connect(addr: impl ToSocketAddrs) -> Result<Self> {
        let inner = tokio::net::TcpStream::connect(addr)
            .await
            .map_err(|e| CompatError::stream("connect", e))?;
        Ok(Self { inner })
    }

    /// Read into `buf`, returning the number of bytes read (0 at EOF).
    pub async fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        self.inner
            .read(buf)
            .await
            .map_err(|e| CompatError::stream("read", e))
    }

    /// Write from `buf`, returning the number of bytes written.
    pub async fn write(&mut self, buf: &[u8]) -> Result<usize> {
        self.inner
            .write(buf)
            .await
            .map_err(|e| CompatError::stream("write", e))
    }

    /// Write all of `buf`.
    pub async fn write_all(&mut self, buf: &[u8]) -> Result<()> {
        self.inner
            .write_all(buf)
            .await
            .map_err(|e| CompatError::stream("write", e))
    }

    /// Shut down the write half. The peer observes EOF; reads here continue
    /// to work until the peer closes its side.
    pub async fn shutdown_write(&mut self) -> Result<()> {
        self.inner
            .shutdown()
            .await
            .map_err(|e| CompatError::stream("shutdown", e))
    }

    /// The peer's address.
    pub fn peer_addr(&self) -> Result<SocketAddr> {
        self.inner
            .peer_addr()
            .map_err(|e| CompatError::stream("peerAddr", e))
    }

    /// The local address.
    pub fn local_addr(&self) -> Result<SocketAddr> {
        self.inner
            .local_addr()
            .map_err(|e| CompatError::stream("localAddr", e))
    }

    /// Enable or disable Nagle's algorithm.
    pub fn set_nodelay(&self, nodelay: bool) -> Result<()> {
        self.inner
            .set_nodelay(nodelay)
            .map_err(|e| CompatError::stream("setNoDelay", e))
    }

    /// Unwrap into the native stream.
    pub fn into_inner(self) -> tokio::net::TcpStream {
        self.inner
    }
}

#[async_trait]
impl IoHandle for TcpStream {
    fn handle_name(&self) -> Cow<'static, str> {
        "tcpStream".into()
    }

    async fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        TcpStream::read(self, buf).await
    }

    async fn write(&mut self, buf: &[u8]) -> Result<usize> {
        TcpStream::write(self, buf).await
    }

    async fn shutdown(&mut self) -> Result<()> {
        self.shutdown_write().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[tokio::test]
    async fn test_loopback_round_trip() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let server = tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await.unwrap();
            let mut buf = [0u8; 5];
            let mut read = 0;
            while read < buf.len() {
                let n = stream.read(&mut buf[read..]).await.unwrap();
                assert!(n > 0);
                read += n;
            }
            stream.write_all(b"pong!").await.unwrap();
        });

        let mut client = TcpStream::connect(addr).await.unwrap();
        client.set_nodelay(true).unwrap();
        client.write_all(b"ping!").await.unwrap();

        let mut buf = [0u8; 5];
        let mut read = 0;
        while read < buf.len() {
            let n = client.read(&mut buf[read..]).await.unwrap();
            assert!(n > 0);
            read += n;
        }
        assert_eq!(&buf, b"pong!");
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_shutdown_write_signals_eof() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let server = tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await.unwrap();
            let mut buf = Vec::new();
            loop {
                let mut chunk = [0u8; 16];
                let n = stream.read(&mut chunk).await.unwrap();
                if n == 0 {
                    break;
                }
                buf.extend_from_slice(&chunk[..n]);
            }
            buf
        });

        let mut client = TcpStream::connect(addr).await.unwrap();
        client.write_all(b"last words").await.unwrap();
        client.shutdown_write().await.unwrap();

        let received = server.await.unwrap();
        assert_eq!(received, b"last words");
    }

    #[tokio::test]
    async fn test_connect_refused_kind() {
        // Bind then drop to get a port that is very likely unbound.
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let err = TcpStream::connect(addr).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ConnectionRefused);
    }
}

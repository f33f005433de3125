// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! TLS client and server handshakes over [`TcpStream`](super::TcpStream).
//!
//! Certificate verification and the record protocol belong to rustls; this
//! module only builds the configs, runs the handshake, and translates the
//! error path into the crate's vocabulary.

use std::borrow::Cow;
use std::sync::Arc;

use async_trait::async_trait;
use rustls::pki_types::{CertificateDer, PrivateKeyDer, ServerName};
use rustls::{ClientConfig, RootCertStore, ServerConfig};
use tokio::io::{AsyncReadExt, AsyncWriteExt};

use crate::error::{CompatError, Result};
use crate::net::TcpStream;
use crate::resource::IoHandle;

/// Client-side TLS configuration.
#[derive(Clone)]
pub struct TlsConnector {
    config: Arc<ClientConfig>,
}

impl TlsConnector {
    /// Connector trusting the bundled webpki roots.
    pub fn new() -> Self {
        Self::with_root_store(default_root_store())
    }

    /// Connector trusting the bundled roots plus extra PEM certificates.
    pub fn with_extra_roots(pem: &[u8]) -> Result<Self> {
        let mut roots = default_root_store();
        for cert in parse_certs("connectTls", pem)? {
            roots
                .add(cert)
                .map_err(|e| CompatError::invalid_data("connectTls", e.to_string()))?;
        }
        Ok(Self::with_root_store(roots))
    }

    fn with_root_store(roots: RootCertStore) -> Self {
        let config = ClientConfig::builder()
            .with_root_certificates(roots)
            .with_no_client_auth();
        Self {
            config: Arc::new(config),
        }
    }

    /// Run the client handshake on an established TCP connection.
    ///
    /// `server_name` is the DNS name (or IP) presented for certificate
    /// verification and SNI.
    pub async fn connect(&self, server_name: &str, tcp: TcpStream) -> Result<TlsStream> {
        let name = ServerName::try_from(server_name.to_owned()).map_err(|_| {
            CompatError::invalid_input("connectTls", format!("invalid server name '{server_name}'"))
        })?;
        let connector = tokio_rustls::TlsConnector::from(Arc::clone(&self.config));
        let stream = connector
            .connect(name, tcp.into_inner())
            .await
            .map_err(|e| CompatError::stream("connectTls", e))?;
        Ok(TlsStream {
            inner: tokio_rustls::TlsStream::Client(stream),
        })
    }
}

impl Default for TlsConnector {
    fn default() -> Self {
        Self::new()
    }
}

/// Server-side TLS configuration.
#[derive(Clone)]
pub struct TlsAcceptor {
    inner: tokio_rustls::TlsAcceptor,
}

impl std::fmt::Debug for TlsAcceptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TlsAcceptor").finish_non_exhaustive()
    }
}

impl TlsAcceptor {
    /// Build from a PEM certificate chain and a PEM private key.
    pub fn from_pem(cert_pem: &[u8], key_pem: &[u8]) -> Result<Self> {
        const OP: &str = "acceptTls";

        let certs = parse_certs(OP, cert_pem)?;
        if certs.is_empty() {
            return Err(CompatError::invalid_data(
                OP,
                "no certificates found in PEM input",
            ));
        }

        let key: PrivateKeyDer<'static> = rustls_pemfile::private_key(&mut &key_pem[..])
            .map_err(|e| CompatError::invalid_data(OP, e.to_string()))?
            .ok_or_else(|| CompatError::invalid_data(OP, "no private key found in PEM input"))?;

        let config = ServerConfig::builder()
            .with_no_client_auth()
            .with_single_cert(certs, key)
            .map_err(|e| CompatError::invalid_data(OP, e.to_string()))?;

        Ok(Self {
            inner: tokio_rustls::TlsAcceptor::from(Arc::new(config)),
        })
    }

    /// Run the server handshake on an accepted TCP connection.
    pub async fn accept(&self, tcp: TcpStream) -> Result<TlsStream> {
        let stream = self
            .inner
            .accept(tcp.into_inner())
            .await
            .map_err(|e| CompatError::stream("acceptTls", e))?;
        Ok(TlsStream {
            inner: tokio_rustls::TlsStream::Server(stream),
        })
    }
}

/// An encrypted stream, client- or server-side.
#[derive(Debug)]
pub struct TlsStream {
    inner: tokio_rustls::TlsStream<tokio::net::TcpStream>,
}

impl TlsStream {
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

    /// Send the TLS close-notify and shut down the write half.
    pub async fn shutdown_write(&mut self) -> Result<()> {
        self.inner
            .shutdown()
            .await
            .map_err(|e| CompatError::stream("shutdown", e))
    }
}

#[async_trait]
impl IoHandle for TlsStream {
    fn handle_name(&self) -> Cow<'static, str> {
        "tlsStream".into()
    }

    async fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        TlsStream::read(self, buf).await
    }

    async fn write(&mut self, buf: &[u8]) -> Result<usize> {
        TlsStream::write(self, buf).await
    }

    async fn shutdown(&mut self) -> Result<()> {
        self.shutdown_write().await
    }
}

fn default_root_store() -> RootCertStore {
    let mut roots = RootCertStore::empty();
    roots.extend(webpki_roots::TLS_SERVER_ROOTS.iter().cloned());
    roots
}

fn parse_certs(op: &'static str, pem: &[u8]) -> Result<Vec<CertificateDer<'static>>> {
    rustls_pemfile::certs(&mut &pem[..])
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| CompatError::invalid_data(op, e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::net::TcpListener;

    #[tokio::test]
    async fn test_invalid_server_name_is_rejected() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let _server = tokio::spawn(async move {
            let _ = listener.accept().await;
        });

        let tcp = TcpStream::connect(addr).await.unwrap();
        let err = TlsConnector::new()
            .connect("not a hostname", tcp)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
    }

    #[test]
    fn test_acceptor_rejects_garbage_pem() {
        let err = TlsAcceptor::from_pem(b"not pem at all", b"also not pem").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidData);
    }

    #[test]
    fn test_acceptor_requires_a_key() {
        // A certificate-shaped PEM block with no key block.
        let cert_only = b"-----BEGIN CERTIFICATE-----\nMIIB\n-----END CERTIFICATE-----\n";
        let err = TlsAcceptor::from_pem(cert_only, b"").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidData);
    }
}

//! TLS connection metadata.
//!
//! The static fetch strategy gets the peer certificate from reqwest, but not the
//! negotiated protocol version. This module opens a separate, read-only TLS
//! handshake to the target to learn it:
//! - TCP connect and handshake are each bounded by their own timeout
//! - certificates are verified against the webpki roots, never overridden
//! - nothing is written on the connection after the handshake
//!
//! Uses `tokio-rustls` for the handshake and `x509-parser` for certificates.

mod extract;

use std::sync::Arc;
use std::time::Duration;

use log::debug;
use rustls::crypto::ring::default_provider;
use rustls::pki_types::ServerName;
use thiserror::Error;
use tokio::net::TcpStream;
use tokio_rustls::rustls::{ClientConfig, RootCertStore};
use tokio_rustls::TlsConnector;

use crate::config::{TCP_CONNECT_TIMEOUT_SECS, TLS_HANDSHAKE_TIMEOUT_SECS};

pub use extract::{issuer_from_der, normalize_protocol};

/// Failure of the TLS probe. Never fails a scan; the fields stay absent.
#[derive(Error, Debug)]
pub enum TlsProbeError {
    #[error("invalid server name '{0}'")]
    InvalidServerName(String),

    #[error("TCP connect to {0} failed: {1}")]
    Connect(String, String),

    #[error("TCP connect to {0} timed out")]
    ConnectTimeout(String),

    #[error("TLS handshake with {0} failed: {1}")]
    Handshake(String, String),

    #[error("TLS handshake with {0} timed out")]
    HandshakeTimeout(String),
}

/// What the handshake revealed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TlsProbe {
    /// Normalized protocol version, e.g. "TLSv1.3"
    pub protocol: Option<String>,
    /// Issuer of the leaf certificate
    pub issuer: Option<String>,
}

/// Performs a TLS handshake with `host:port` and reports the negotiated
/// protocol and the leaf certificate issuer.
pub async fn probe_tls(host: &str, port: u16) -> Result<TlsProbe, TlsProbeError> {
    let target = format!("{host}:{port}");
    debug!("Probing TLS parameters of {target}");

    let mut root_store = RootCertStore::empty();
    root_store.extend(webpki_roots::TLS_SERVER_ROOTS.iter().cloned());
    let config = ClientConfig::builder_with_provider(Arc::new(default_provider()))
        .with_safe_default_protocol_versions()
        .map_err(|e| TlsProbeError::Handshake(target.clone(), e.to_string()))?
        .with_root_certificates(root_store)
        .with_no_client_auth();

    // IPv6 literals arrive bracketed from url::Url::host_str
    let bare_host = host.trim_start_matches('[').trim_end_matches(']');
    let server_name = ServerName::try_from(bare_host.to_string())
        .map_err(|_| TlsProbeError::InvalidServerName(host.to_string()))?;

    let sock = match tokio::time::timeout(
        Duration::from_secs(TCP_CONNECT_TIMEOUT_SECS),
        TcpStream::connect((bare_host, port)),
    )
    .await
    {
        Ok(Ok(sock)) => sock,
        Ok(Err(e)) => return Err(TlsProbeError::Connect(target, e.to_string())),
        Err(_) => return Err(TlsProbeError::ConnectTimeout(target)),
    };

    let connector = TlsConnector::from(Arc::new(config));
    let tls_stream = match tokio::time::timeout(
        Duration::from_secs(TLS_HANDSHAKE_TIMEOUT_SECS),
        connector.connect(server_name, sock),
    )
    .await
    {
        Ok(Ok(stream)) => stream,
        Ok(Err(e)) => return Err(TlsProbeError::Handshake(target, e.to_string())),
        Err(_) => return Err(TlsProbeError::HandshakeTimeout(target)),
    };

    let connection = tls_stream.get_ref().1;
    let protocol = connection
        .protocol_version()
        .map(|v| normalize_protocol(&format!("{v:?}")));
    let issuer = connection
        .peer_certificates()
        .and_then(|certs| certs.first())
        .and_then(|leaf| issuer_from_der(leaf.as_ref()));

    debug!("TLS probe of {target}: protocol {protocol:?}, issuer {issuer:?}");
    Ok(TlsProbe { protocol, issuer })
}

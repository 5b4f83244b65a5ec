//! Application initialization and resource setup.
//!
//! This module provides functions to initialize the shared resources of a run:
//! - the TLS crypto provider
//! - the logger
//! - the identifying HTTP client

mod client;
mod logger;

use rustls::crypto::{ring::default_provider, CryptoProvider};

// Re-export public API
pub use client::init_client;
pub use logger::init_logger_with;

/// Initializes the crypto provider for TLS operations.
///
/// Must run before the TLS probe opens its first connection. Installing twice
/// is harmless, so the result is ignored.
pub fn init_crypto_provider() {
    let _ = CryptoProvider::install_default(default_provider());
}

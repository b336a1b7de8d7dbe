//! TLS client configuration
//!
//! Thin builder over an OpenSSL connector. Only the client side exists
//! here; this crate never accepts connections.

use openssl::ssl::{SslConnector, SslMethod, SslVerifyMode};

/// TLS errors
#[derive(Debug, thiserror::Error)]
pub enum TlsError {
    #[error("OpenSSL error: {0}")]
    OpenSsl(#[from] openssl::error::ErrorStack),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("handshake failed: {0}")]
    HandshakeFailed(String),
}

/// TLS configuration (immutable after building)
#[derive(Clone, Debug)]
pub struct TlsConfig {
    pub(crate) connector: SslConnector,
    pub(crate) servername: String,
    pub(crate) verify_peer: bool,
}

impl TlsConfig {
    /// Create a new client configuration builder
    pub fn client() -> TlsConfigBuilder {
        TlsConfigBuilder {
            servername: None,
            verify_peer: true,
        }
    }
}

/// Client configuration builder
pub struct TlsConfigBuilder {
    servername: Option<String>,
    verify_peer: bool,
}

impl TlsConfigBuilder {
    /// Set the SNI servername, also used for certificate verification
    pub fn servername(mut self, name: impl Into<String>) -> Self {
        self.servername = Some(name.into());
        self
    }

    /// Enable/disable peer certificate verification (on by default)
    pub fn verify_peer(mut self, verify: bool) -> Self {
        self.verify_peer = verify;
        self
    }

    /// Build the TLS configuration
    pub fn build(self) -> Result<TlsConfig, TlsError> {
        let servername = self
            .servername
            .ok_or_else(|| TlsError::InvalidConfig("servername is required".to_string()))?;

        let mut builder = SslConnector::builder(SslMethod::tls_client())?;
        if !self.verify_peer {
            builder.set_verify(SslVerifyMode::NONE);
        }

        Ok(TlsConfig {
            connector: builder.build(),
            servername,
            verify_peer: self.verify_peer,
        })
    }
}

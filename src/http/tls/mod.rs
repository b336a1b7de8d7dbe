//! TLS support for the encrypted transport

pub mod config;
pub mod session;

pub use config::{TlsConfig, TlsConfigBuilder, TlsError};
pub use session::TlsTransport;

//! Deferred HTTP/1.x exchanges
//!
//! # Architecture
//!
//! The layers compose by injection around one pure core:
//!
//! - `parser` turns a complete raw response into a classified [`Outcome`];
//!   it is the only place protocol edge cases live
//! - `transport` abstracts plaintext and TLS sockets behind one trait
//! - `future` runs the exchange on a worker thread and hands back a handle
//!   whose resolution is the single blocking point
//!
//! A [`Request`] is configured, submitted once, and resolved once.

pub mod future;
pub mod headers;
pub mod parser;
pub mod request;
pub mod response;
pub mod tls;
pub mod transport;

pub use future::ResponseFuture;
pub use headers::{HeaderPair, Headers};
pub use parser::parse_response;
pub use request::{Method, Payload, Request};
pub use response::{Outcome, TransportError};
pub use transport::{connect, Connection, Interest, PlainTransport, Transport};

use std::time::Duration;

/// Result type for request configuration and resolution
pub type Result<T> = std::result::Result<T, Error>;

/// Configuration and resolution errors
///
/// Transport- and parse-level conditions never surface here from
/// `resolve()`; only `resolve_or_err()` converts an error-classified
/// [`Outcome`] into [`Error::Failed`].
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid URI: {0}")]
    InvalidUri(#[from] url::ParseError),

    #[error("unsupported URI scheme: {0}")]
    UnsupportedScheme(String),

    #[error("URI has no host: {0}")]
    MissingHost(String),

    #[error("unsupported method: {0}")]
    UnsupportedMethod(String),

    #[error("request failed: {0}")]
    Failed(Outcome),
}

/// CRLF line ending
pub const CRLF: &str = "\r\n";

/// Continuation unwraps tolerated before the parser gives up
pub const MAX_CONTINUATIONS: usize = 8;

/// Default exchange deadline
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(300);

//! Exchange outcomes
//!
//! The tagged result a resolved request produces. Exactly one of: a
//! well-formed HTTP response, a malformed-response fallback with the raw
//! bytes preserved, or a transport-level failure. Every variant carries
//! enough to classify the result without inspecting raw bytes.

use bytes::Bytes;
use std::fmt;
use std::time::Duration;

use super::headers::Headers;

/// Transport-level failure: the exchange never produced a response.
///
/// Produced by the transport and runtime layers, not the parser.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    #[error("timed out after {0:?}")]
    Timeout(Duration),

    #[error("connect failed: {0}")]
    Connect(String),

    #[error("I/O failed: {0}")]
    Io(String),

    #[error("connection closed before any response bytes arrived")]
    Closed,
}

static NO_HEADERS: Headers = Headers::new();

/// Classified outcome of one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// A well-formed response and its HTTP status code.
    Http {
        code: u16,
        body: Bytes,
        headers: Headers,
    },
    /// The raw bytes did not match HTTP framing; kept for diagnostics.
    Malformed { raw: Bytes },
    /// The exchange never completed.
    Transport(TransportError),
}

impl Outcome {
    /// HTTP status code, when one was parsed.
    pub fn code(&self) -> Option<u16> {
        match self {
            Outcome::Http { code, .. } => Some(*code),
            _ => None,
        }
    }

    /// Whether this outcome is a failure.
    ///
    /// HTTP codes use the conventional 4xx/5xx ranges; malformed and
    /// transport outcomes always count as failures.
    pub fn is_error(&self) -> bool {
        match self {
            Outcome::Http { code, .. } => *code >= 400,
            Outcome::Malformed { .. } | Outcome::Transport(_) => true,
        }
    }

    /// Whether the request died waiting on the transport.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Outcome::Transport(TransportError::Timeout(_)))
    }

    /// Response body; for malformed outcomes the original raw bytes.
    pub fn body(&self) -> &[u8] {
        match self {
            Outcome::Http { body, .. } => body,
            Outcome::Malformed { raw } => raw,
            Outcome::Transport(_) => &[],
        }
    }

    /// Parsed headers; empty for anything but a well-formed response.
    pub fn headers(&self) -> &Headers {
        match self {
            Outcome::Http { headers, .. } => headers,
            _ => &NO_HEADERS,
        }
    }

    /// Split into body and headers, discarding the status.
    pub fn into_parts(self) -> (Bytes, Headers) {
        match self {
            Outcome::Http { body, headers, .. } => (body, headers),
            Outcome::Malformed { raw } => (raw, Headers::new()),
            Outcome::Transport(_) => (Bytes::new(), Headers::new()),
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Http { code, .. } => write!(f, "HTTP {}", code),
            Outcome::Malformed { raw } => write!(f, "malformed response ({} bytes)", raw.len()),
            Outcome::Transport(err) => write!(f, "{}", err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn http(code: u16) -> Outcome {
        Outcome::Http {
            code,
            body: Bytes::from_static(b"body"),
            headers: Headers::new(),
        }
    }

    #[test]
    fn test_http_error_classification() {
        assert!(!http(200).is_error());
        assert!(!http(204).is_error());
        assert!(!http(302).is_error());
        assert!(http(404).is_error());
        assert!(http(500).is_error());
    }

    #[test]
    fn test_malformed_and_transport_are_errors() {
        assert!(Outcome::Malformed {
            raw: Bytes::from_static(b"junk")
        }
        .is_error());
        assert!(Outcome::Transport(TransportError::Closed).is_error());
    }

    #[test]
    fn test_timeout_classification() {
        let timeout = Outcome::Transport(TransportError::Timeout(Duration::from_secs(1)));
        assert!(timeout.is_timeout());
        assert!(timeout.is_error());

        assert!(!Outcome::Transport(TransportError::Closed).is_timeout());
        assert!(!http(504).is_timeout());
    }

    #[test]
    fn test_malformed_body_exposes_raw() {
        let outcome = Outcome::Malformed {
            raw: Bytes::from_static(b"not http"),
        };
        assert_eq!(outcome.body(), b"not http");
        assert!(outcome.headers().is_empty());
        assert_eq!(outcome.code(), None);
    }

    #[test]
    fn test_into_parts() {
        let mut headers = Headers::new();
        headers.append("X-A", "1");
        let outcome = Outcome::Http {
            code: 200,
            body: Bytes::from_static(b"hello"),
            headers,
        };

        let (body, headers) = outcome.into_parts();
        assert_eq!(&body[..], b"hello");
        assert_eq!(headers.get("X-A"), Some("1"));
    }

    #[test]
    fn test_display() {
        assert_eq!(http(503).to_string(), "HTTP 503");
        assert_eq!(
            Outcome::Transport(TransportError::Closed).to_string(),
            "connection closed before any response bytes arrived"
        );
    }
}

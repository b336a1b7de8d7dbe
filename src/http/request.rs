//! Request descriptors
//!
//! The configuration object a caller builds before handing an exchange to
//! the runtime. Setters validate immediately; nothing is deferred to send
//! time. Submission consumes the descriptor, so reconfiguration after it
//! has been handed over is unrepresentable.

use std::fmt;
use std::time::Duration;
use url::Url;

use super::headers::{HeaderPair, Headers};
use super::{Error, Result, CRLF, DEFAULT_TIMEOUT};

/// Supported request methods.
///
/// The process-wide whitelist is this enum; anything else is rejected at
/// configuration time by [`Method::parse`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Method {
    #[default]
    Get,
    Post,
    Put,
}

impl Method {
    /// Parse method from string
    pub fn parse(s: &str) -> Result<Self> {
        match s {
            "GET" => Ok(Method::Get),
            "POST" => Ok(Method::Post),
            "PUT" => Ok(Method::Put),
            _ => Err(Error::UnsupportedMethod(s.to_string())),
        }
    }

    /// Convert method to string
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Request body: raw text, or ordered form pairs encoded at send time.
///
/// Pair order is preserved through encoding; duplicate keys are permitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payload {
    Raw(String),
    Form(Vec<(String, String)>),
}

impl Payload {
    /// Bytes as they go on the wire.
    pub fn encode(&self) -> Vec<u8> {
        match self {
            Payload::Raw(text) => text.clone().into_bytes(),
            Payload::Form(pairs) => {
                let mut enc = url::form_urlencoded::Serializer::new(String::new());
                for (name, value) in pairs {
                    enc.append_pair(name, value);
                }
                enc.finish().into_bytes()
            }
        }
    }

    fn is_form(&self) -> bool {
        matches!(self, Payload::Form(_))
    }
}

impl From<String> for Payload {
    fn from(text: String) -> Self {
        Payload::Raw(text)
    }
}

impl From<&str> for Payload {
    fn from(text: &str) -> Self {
        Payload::Raw(text.to_string())
    }
}

impl From<Vec<(String, String)>> for Payload {
    fn from(pairs: Vec<(String, String)>) -> Self {
        Payload::Form(pairs)
    }
}

/// A configured request, submitted exactly once.
#[derive(Debug, Clone)]
pub struct Request {
    url: Url,
    method: Method,
    payload: Option<Payload>,
    headers: Headers,
    timeout: Duration,
}

impl Request {
    /// Parse and validate the target URI.
    ///
    /// Only `http` and `https` URIs with a host are accepted; anything else
    /// is a configuration error here, not a failure at send time.
    pub fn new(uri: &str) -> Result<Self> {
        let url = Url::parse(uri)?;
        match url.scheme() {
            "http" | "https" => {}
            other => return Err(Error::UnsupportedScheme(other.to_string())),
        }
        if url.host_str().is_none() {
            return Err(Error::MissingHost(uri.to_string()));
        }

        Ok(Request {
            url,
            method: Method::default(),
            payload: None,
            headers: Headers::new(),
            timeout: DEFAULT_TIMEOUT,
        })
    }

    /// The full target URI
    pub fn uri(&self) -> &str {
        self.url.as_str()
    }

    pub(crate) fn url(&self) -> &Url {
        &self.url
    }

    pub fn method(&self) -> Method {
        self.method
    }

    pub fn set_method(&mut self, method: Method) {
        self.method = method;
    }

    /// String-accepting method setter; unsupported names fail immediately.
    pub fn set_method_str(&mut self, method: &str) -> Result<()> {
        self.method = Method::parse(method)?;
        Ok(())
    }

    pub fn payload(&self) -> Option<&Payload> {
        self.payload.as_ref()
    }

    /// Set the request payload: a raw string or ordered form pairs.
    pub fn set_data(&mut self, payload: impl Into<Payload>) {
        self.payload = Some(payload.into());
    }

    /// Append a header. Duplicates are preserved in insertion order.
    pub fn add_header(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.headers.append(name, value);
    }

    /// All headers, or with `filter` only those whose name matches
    /// case-insensitively, in insertion order.
    pub fn headers(&self, filter: Option<&str>) -> Vec<&HeaderPair> {
        match filter {
            Some(name) => self.headers.matching(name),
            None => self.headers.iter().collect(),
        }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Overall deadline for the exchange, resolution included.
    pub fn set_timeout(&mut self, timeout: Duration) {
        self.timeout = timeout;
    }

    /// Serialize to HTTP/1.1 wire format.
    ///
    /// Caller headers are written first, in order. `Host`, a form
    /// `Content-Type`, `Content-Length`, and `Connection: close` are
    /// derived only when the caller did not supply them.
    pub fn to_wire(&self) -> Vec<u8> {
        let body = self
            .payload
            .as_ref()
            .map(Payload::encode)
            .unwrap_or_default();

        let mut target = self.url.path().to_string();
        if let Some(query) = self.url.query() {
            target.push('?');
            target.push_str(query);
        }

        let mut buf = Vec::with_capacity(256 + body.len());
        buf.extend_from_slice(self.method.as_str().as_bytes());
        buf.push(b' ');
        buf.extend_from_slice(target.as_bytes());
        buf.extend_from_slice(b" HTTP/1.1");
        buf.extend_from_slice(CRLF.as_bytes());

        for pair in self.headers.iter() {
            if let Some(value) = &pair.value {
                buf.extend_from_slice(pair.name.as_bytes());
                buf.extend_from_slice(b": ");
                buf.extend_from_slice(value.as_bytes());
                buf.extend_from_slice(CRLF.as_bytes());
            }
        }

        if !self.headers.contains("Host") {
            let host = self.url.host_str().unwrap_or_default();
            match self.url.port() {
                Some(port) => {
                    buf.extend_from_slice(format!("Host: {}:{}", host, port).as_bytes())
                }
                None => buf.extend_from_slice(format!("Host: {}", host).as_bytes()),
            }
            buf.extend_from_slice(CRLF.as_bytes());
        }

        if self.payload.as_ref().is_some_and(Payload::is_form)
            && !self.headers.contains("Content-Type")
        {
            buf.extend_from_slice(b"Content-Type: application/x-www-form-urlencoded");
            buf.extend_from_slice(CRLF.as_bytes());
        }

        if !body.is_empty() && !self.headers.contains("Content-Length") {
            buf.extend_from_slice(format!("Content-Length: {}", body.len()).as_bytes());
            buf.extend_from_slice(CRLF.as_bytes());
        }

        if !self.headers.contains("Connection") {
            buf.extend_from_slice(b"Connection: close");
            buf.extend_from_slice(CRLF.as_bytes());
        }

        buf.extend_from_slice(CRLF.as_bytes());
        buf.extend_from_slice(&body);

        buf
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(uri: &str) -> Request {
        Request::new(uri).unwrap()
    }

    #[test]
    fn test_defaults() {
        let req = request("http://example.com/");

        assert_eq!(req.method(), Method::Get);
        assert!(req.payload().is_none());
        assert!(req.headers(None).is_empty());
        assert_eq!(req.timeout(), Duration::from_secs(300));
    }

    #[test]
    fn test_method_whitelist() {
        let mut req = request("http://example.com/");

        assert!(req.set_method_str("POST").is_ok());
        assert_eq!(req.method(), Method::Post);
        assert_eq!(req.method().as_str(), "POST");

        let err = req.set_method_str("DELETE").unwrap_err();
        assert!(matches!(err, Error::UnsupportedMethod(m) if m == "DELETE"));
        // Failed setter leaves the previous method in place.
        assert_eq!(req.method(), Method::Post);
    }

    #[test]
    fn test_invalid_uri_rejected_up_front() {
        assert!(matches!(
            Request::new("ftp://example.com/"),
            Err(Error::UnsupportedScheme(_))
        ));
        assert!(matches!(
            Request::new("not a uri"),
            Err(Error::InvalidUri(_))
        ));
        assert!(matches!(
            Request::new("unix:/run/sock"),
            Err(Error::UnsupportedScheme(_))
        ));
    }

    #[test]
    fn test_header_filter_case_insensitive() {
        let mut req = request("http://example.com/");
        req.add_header("Accept-Language", "en");
        req.add_header("X-Foo", "1");
        req.add_header("accept-language", "fr");

        let matched = req.headers(Some("Accept-Language"));
        assert_eq!(matched.len(), 2);
        assert_eq!(matched[0].value.as_deref(), Some("en"));
        assert_eq!(matched[1].value.as_deref(), Some("fr"));

        assert_eq!(req.headers(None).len(), 3);
    }

    #[test]
    fn test_wire_request_line_and_derived_headers() {
        let mut req = request("http://example.com/search?q=rust");
        req.add_header("Accept", "text/plain");

        let wire = String::from_utf8(req.to_wire()).unwrap();
        assert!(wire.starts_with("GET /search?q=rust HTTP/1.1\r\n"));
        assert!(wire.contains("Accept: text/plain\r\n"));
        assert!(wire.contains("Host: example.com\r\n"));
        assert!(wire.contains("Connection: close\r\n"));
        assert!(wire.ends_with("\r\n\r\n"));
    }

    #[test]
    fn test_wire_host_includes_explicit_port() {
        let req = request("http://example.com:8080/");

        let wire = String::from_utf8(req.to_wire()).unwrap();
        assert!(wire.contains("Host: example.com:8080\r\n"));
    }

    #[test]
    fn test_wire_caller_host_not_duplicated() {
        let mut req = request("http://example.com/");
        req.add_header("Host", "override.example");

        let wire = String::from_utf8(req.to_wire()).unwrap();
        assert!(wire.contains("Host: override.example\r\n"));
        assert!(!wire.contains("Host: example.com"));
    }

    #[test]
    fn test_wire_raw_payload() {
        let mut req = request("http://example.com/submit");
        req.set_method(Method::Put);
        req.set_data("payload text");

        let wire = String::from_utf8(req.to_wire()).unwrap();
        assert!(wire.starts_with("PUT /submit HTTP/1.1\r\n"));
        assert!(wire.contains("Content-Length: 12\r\n"));
        assert!(wire.ends_with("\r\n\r\npayload text"));
    }

    #[test]
    fn test_wire_form_payload() {
        let mut req = request("http://example.com/login");
        req.set_method(Method::Post);
        req.set_data(vec![
            ("user".to_string(), "jo".to_string()),
            ("note".to_string(), "a b&c".to_string()),
        ]);

        let wire = String::from_utf8(req.to_wire()).unwrap();
        assert!(wire.contains("Content-Type: application/x-www-form-urlencoded\r\n"));
        assert!(wire.ends_with("\r\n\r\nuser=jo&note=a+b%26c"));
    }

    #[test]
    fn test_form_encoding_preserves_pair_order() {
        let payload = Payload::Form(vec![
            ("z".to_string(), "1".to_string()),
            ("a".to_string(), "2".to_string()),
            ("z".to_string(), "3".to_string()),
        ]);

        assert_eq!(payload.encode(), b"z=1&a=2&z=3");
    }

    #[test]
    fn test_duplicate_headers_written_in_order() {
        let mut req = request("http://example.com/");
        req.add_header("X-Tag", "first");
        req.add_header("X-Tag", "second");

        let wire = String::from_utf8(req.to_wire()).unwrap();
        let first = wire.find("X-Tag: first").unwrap();
        let second = wire.find("X-Tag: second").unwrap();
        assert!(first < second);
    }
}

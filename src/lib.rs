//! courier - deferred HTTP requests over plaintext or encrypted sockets
//!
//! Configure a [`Request`], send it, and resolve the returned future when
//! the answer matters:
//!
//! ```no_run
//! use courier::Request;
//!
//! let mut request = Request::new("http://example.com/status").unwrap();
//! request.add_header("Accept", "text/plain");
//!
//! let future = request.send();
//! // ... other work, other requests in flight ...
//! let outcome = future.resolve();
//!
//! if !outcome.is_error() {
//!     println!("{} bytes", outcome.body().len());
//! }
//! ```

pub mod http;

pub use http::{
    Error, HeaderPair, Headers, Method, Outcome, Payload, Request, ResponseFuture, Result,
    TransportError,
};

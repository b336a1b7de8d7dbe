//! Deferred resolution
//!
//! One worker thread per submitted request; the returned future is the
//! single suspension point. A timeout resolves to a transport-classified
//! outcome instead of blocking forever, and there is no explicit cancel.

use bytes::Bytes;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;
use tracing::debug;

use super::headers::Headers;
use super::parser::parse_response;
use super::request::Request;
use super::response::{Outcome, TransportError};
use super::transport;
use super::{Error, Result};

/// Handle for a request in flight.
pub struct ResponseFuture {
    rx: mpsc::Receiver<Outcome>,
    timeout: Duration,
    worker: Option<thread::JoinHandle<()>>,
}

impl Request {
    /// Hand the descriptor to the runtime.
    ///
    /// The descriptor is consumed; reconfiguration after submission is
    /// unrepresentable. Any number of requests may be in flight at once.
    pub fn send(self) -> ResponseFuture {
        let timeout = self.timeout();
        let (tx, rx) = mpsc::channel();

        let worker = thread::spawn(move || {
            let outcome = run_exchange(&self);
            // The receiver may already have given up on us.
            let _ = tx.send(outcome);
        });

        ResponseFuture {
            rx,
            timeout,
            worker: Some(worker),
        }
    }
}

/// Drive one complete exchange and classify the result.
fn run_exchange(request: &Request) -> Outcome {
    let wire = request.to_wire();
    debug!(uri = request.uri(), bytes = wire.len(), "sending request");

    let mut conn = match transport::connect(request.url(), request.timeout()) {
        Ok(conn) => conn,
        Err(err) => return Outcome::Transport(err),
    };

    let raw = match conn.write_all(&wire) {
        Ok(()) => conn.read_to_close(),
        Err(err) => Err(err),
    };
    conn.close();

    match raw {
        Ok(raw) => parse_response(&raw),
        Err(err) => Outcome::Transport(err),
    }
}

impl ResponseFuture {
    /// Block until the exchange completes, fails, or the timeout elapses.
    ///
    /// Never panics and never raises: HTTP-level and parse-level conditions
    /// are encoded in the returned [`Outcome`], and an elapsed timeout
    /// resolves to a timeout-classified transport outcome.
    pub fn resolve(mut self) -> Outcome {
        let outcome = match self.rx.recv_timeout(self.timeout) {
            Ok(outcome) => outcome,
            Err(mpsc::RecvTimeoutError::Timeout) => {
                Outcome::Transport(TransportError::Timeout(self.timeout))
            }
            Err(mpsc::RecvTimeoutError::Disconnected) => {
                Outcome::Transport(TransportError::Io("worker exited without a result".to_string()))
            }
        };

        // Reap a finished worker; one still draining its own deadline is
        // left to exit on its own.
        if let Some(worker) = self.worker.take() {
            if worker.is_finished() {
                let _ = worker.join();
            }
        }

        outcome
    }

    /// Like [`ResponseFuture::resolve`], but an error-classified outcome is
    /// raised as [`Error::Failed`] carrying the full status; success returns
    /// body and headers only.
    pub fn resolve_or_err(self) -> Result<(Bytes, Headers)> {
        let outcome = self.resolve();
        if outcome.is_error() {
            return Err(Error::Failed(outcome));
        }
        Ok(outcome.into_parts())
    }
}

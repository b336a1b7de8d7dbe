//! Transport capability layer
//!
//! One trait over the two socket flavours, so the exchange driver cannot
//! tell plaintext and TLS apart. [`Connection`] owns a boxed transport plus
//! the deadline the whole exchange must finish by; every blocking step
//! polls against the time remaining and classifies expiry as a timeout.

use bytes::Bytes;
use socket2::{Domain, Protocol, Socket, Type};
use std::fmt;
use std::io::{self, Read, Write};
use std::net::{Shutdown, SocketAddr, TcpStream, ToSocketAddrs};
use std::os::fd::{AsRawFd, RawFd};
use std::time::{Duration, Instant};
use tracing::{debug, trace};
use url::Url;

use super::response::TransportError;
use super::tls::{TlsConfig, TlsTransport};

/// Readiness interest for [`Transport::poll`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interest {
    Read,
    Write,
}

/// Socket capability consumed by the exchange driver.
pub trait Transport: Send {
    /// Wait until the socket is ready for `interest`, or `timeout` elapses.
    /// Returns false on expiry.
    fn poll(&self, interest: Interest, timeout: Duration) -> io::Result<bool>;

    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize>;

    fn write(&mut self, buf: &[u8]) -> io::Result<usize>;

    fn close(&mut self) -> io::Result<()>;
}

/// Poll a raw fd for readiness.
pub(crate) fn poll_fd(fd: RawFd, interest: Interest, timeout: Duration) -> io::Result<bool> {
    use libc::{poll, pollfd, POLLIN, POLLOUT};

    let mut pfd = pollfd {
        fd,
        events: match interest {
            Interest::Read => POLLIN,
            Interest::Write => POLLOUT,
        },
        revents: 0,
    };

    let timeout_ms = timeout.as_millis().min(i32::MAX as u128) as i32;
    let result = unsafe { poll(&mut pfd as *mut pollfd, 1, timeout_ms) };

    if result < 0 {
        return Err(io::Error::last_os_error());
    }
    Ok(result > 0)
}

/// Plaintext TCP transport
pub struct PlainTransport {
    stream: TcpStream,
}

impl PlainTransport {
    pub fn new(stream: TcpStream) -> Self {
        PlainTransport { stream }
    }
}

impl Transport for PlainTransport {
    fn poll(&self, interest: Interest, timeout: Duration) -> io::Result<bool> {
        poll_fd(self.stream.as_raw_fd(), interest, timeout)
    }

    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.stream.read(buf)
    }

    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.stream.write(buf)
    }

    fn close(&mut self) -> io::Result<()> {
        self.stream.shutdown(Shutdown::Both)
    }
}

/// One live exchange: a transport plus the deadline it must finish by.
pub struct Connection {
    transport: Box<dyn Transport>,
    timeout: Duration,
    deadline: Instant,
}

impl fmt::Debug for Connection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Connection")
            .field("timeout", &self.timeout)
            .field("deadline", &self.deadline)
            .finish()
    }
}

impl Connection {
    pub fn new(transport: Box<dyn Transport>, timeout: Duration) -> Self {
        Connection {
            transport,
            timeout,
            deadline: Instant::now() + timeout,
        }
    }

    fn remaining(&self) -> Result<Duration, TransportError> {
        let now = Instant::now();
        if now >= self.deadline {
            return Err(TransportError::Timeout(self.timeout));
        }
        Ok(self.deadline - now)
    }

    /// Write the full request, polling for writability against the deadline.
    pub fn write_all(&mut self, wire: &[u8]) -> Result<(), TransportError> {
        let mut written = 0;

        while written < wire.len() {
            let remaining = self.remaining()?;
            if !self
                .transport
                .poll(Interest::Write, remaining)
                .map_err(io_error)?
            {
                return Err(TransportError::Timeout(self.timeout));
            }

            let n = self.transport.write(&wire[written..]).map_err(io_error)?;
            if n == 0 {
                return Err(TransportError::Closed);
            }
            written += n;
        }

        Ok(())
    }

    /// Read until the peer closes the connection.
    ///
    /// Requests carry `Connection: close`, so everything received up to EOF
    /// is the complete raw response.
    pub fn read_to_close(&mut self) -> Result<Bytes, TransportError> {
        let mut raw = Vec::with_capacity(8192);
        let mut chunk = [0u8; 4096];

        loop {
            let remaining = self.remaining()?;
            if !self
                .transport
                .poll(Interest::Read, remaining)
                .map_err(io_error)?
            {
                return Err(TransportError::Timeout(self.timeout));
            }

            match self.transport.read(&mut chunk) {
                Ok(0) => break,
                Ok(n) => raw.extend_from_slice(&chunk[..n]),
                Err(e) => return Err(io_error(e)),
            }
        }

        if raw.is_empty() {
            return Err(TransportError::Closed);
        }

        trace!(bytes = raw.len(), "raw response received");
        Ok(Bytes::from(raw))
    }

    /// Best-effort shutdown; the exchange result is already decided.
    pub fn close(&mut self) {
        let _ = self.transport.close();
    }
}

fn io_error(err: io::Error) -> TransportError {
    TransportError::Io(err.to_string())
}

/// Establish a connection for `url`, plaintext or TLS by scheme.
pub fn connect(url: &Url, timeout: Duration) -> Result<Connection, TransportError> {
    let host = url
        .host_str()
        .ok_or_else(|| TransportError::Connect("URI has no host".to_string()))?;
    let port = url.port_or_known_default().unwrap_or(80);

    let addr = (host, port)
        .to_socket_addrs()
        .map_err(|e| TransportError::Connect(e.to_string()))?
        .next()
        .ok_or_else(|| TransportError::Connect(format!("no address for {}", host)))?;

    let stream =
        open_stream(addr, timeout).map_err(|e| TransportError::Connect(e.to_string()))?;
    debug!(host, port, tls = (url.scheme() == "https"), "connected");

    let transport: Box<dyn Transport> = if url.scheme() == "https" {
        let config = TlsConfig::client()
            .servername(host)
            .build()
            .map_err(|e| TransportError::Connect(e.to_string()))?;
        Box::new(
            TlsTransport::connect(stream, config)
                .map_err(|e| TransportError::Connect(e.to_string()))?,
        )
    } else {
        Box::new(PlainTransport::new(stream))
    };

    Ok(Connection::new(transport, timeout))
}

/// TCP setup goes through socket2 so options land before any bytes move.
fn open_stream(addr: SocketAddr, timeout: Duration) -> io::Result<TcpStream> {
    let socket = Socket::new(Domain::for_address(addr), Type::STREAM, Some(Protocol::TCP))?;
    socket.set_nodelay(true)?;
    socket.connect_timeout(&addr.into(), timeout)?;
    socket.set_nonblocking(false)?;
    Ok(socket.into())
}

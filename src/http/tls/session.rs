//! TLS transport
//!
//! Implements the [`Transport`] trait over an OpenSSL stream so the
//! exchange driver cannot tell plaintext and encrypted sockets apart.

use openssl::ssl::SslStream;
use std::io::{self, Read, Write};
use std::net::{Shutdown, TcpStream};
use std::os::fd::AsRawFd;
use std::time::Duration;
use tracing::debug;

use super::config::{TlsConfig, TlsError};
use crate::http::transport::{poll_fd, Interest, Transport};

/// Encrypted transport over TCP
pub struct TlsTransport {
    stream: SslStream<TcpStream>,
}

impl TlsTransport {
    /// Perform the client handshake.
    pub fn connect(tcp: TcpStream, config: TlsConfig) -> Result<Self, TlsError> {
        let mut ssl = config.connector.configure()?;
        if !config.verify_peer {
            ssl.set_verify_hostname(false);
        }

        let stream = ssl
            .connect(&config.servername, tcp)
            .map_err(|e| TlsError::HandshakeFailed(e.to_string()))?;
        debug!(servername = config.servername.as_str(), "TLS session established");

        Ok(TlsTransport { stream })
    }
}

impl Transport for TlsTransport {
    fn poll(&self, interest: Interest, timeout: Duration) -> io::Result<bool> {
        // Plaintext already decrypted inside the SSL buffer counts as ready.
        if interest == Interest::Read && self.stream.ssl().pending() > 0 {
            return Ok(true);
        }
        poll_fd(self.stream.get_ref().as_raw_fd(), interest, timeout)
    }

    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.stream.read(buf)
    }

    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.stream.write(buf)
    }

    fn close(&mut self) -> io::Result<()> {
        let _ = self.stream.shutdown();
        self.stream.get_mut().shutdown(Shutdown::Both)
    }
}

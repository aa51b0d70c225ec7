//! Connection Handler
//!
//! Owns the byte stream to the cache server.

use std::cell::Cell;
use std::io::{BufReader, Read, Write};
use std::marker::PhantomData;
use std::net::{Shutdown, TcpStream, ToSocketAddrs};
use std::time::Duration;

use crate::config::ClientConfig;
use crate::error::{CacheError, Result};
use crate::protocol::{read_response, write_request, Request, Response};

/// Exclusive handle on one server connection
///
/// Every I/O method takes `&mut self`, so a request and the reply that
/// answers it can never interleave with another call on the same
/// connection. The marker field makes the type `!Sync`; sharing it across
/// threads requires wrapping it in a lock.
pub struct Connection<S: Read + Write = TcpStream> {
    /// Buffered reader over the stream; writes bypass the buffer
    reader: BufReader<S>,

    /// Peer address for logging
    peer_addr: String,

    _exclusive: PhantomData<Cell<()>>,
}

impl Connection<TcpStream> {
    /// Dial the server named in `config`
    ///
    /// Applies nodelay and the configured socket timeouts.
    pub fn connect(config: &ClientConfig) -> Result<Self> {
        let addr = config.server_addr();
        let stream = dial(config).map_err(|source| CacheError::Connection {
            addr: addr.clone(),
            source,
        })?;

        stream.set_nodelay(config.nodelay)?;
        if config.read_timeout_ms > 0 {
            stream.set_read_timeout(Some(Duration::from_millis(config.read_timeout_ms)))?;
        }
        if config.write_timeout_ms > 0 {
            stream.set_write_timeout(Some(Duration::from_millis(config.write_timeout_ms)))?;
        }

        let peer_addr = stream
            .peer_addr()
            .map(|a| a.to_string())
            .unwrap_or(addr);

        tracing::debug!("Connected to {}", peer_addr);
        Ok(Self::with_peer(stream, peer_addr))
    }

    /// Shut down both halves of the socket
    ///
    /// Dropping the connection also closes it; this only makes the close
    /// explicit and reports any error from it.
    pub fn close(self) -> Result<()> {
        tracing::debug!("Closing connection to {}", self.peer_addr);
        match self.reader.get_ref().shutdown(Shutdown::Both) {
            Ok(()) => Ok(()),
            // Peer already went away
            Err(e) if e.kind() == std::io::ErrorKind::NotConnected => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

impl<S: Read + Write> Connection<S> {
    /// Wrap an already established stream
    pub fn new(stream: S) -> Self {
        Self::with_peer(stream, "unknown".to_string())
    }

    /// Wrap a stream, recording the peer address for log output
    pub fn with_peer(stream: S, peer_addr: impl Into<String>) -> Self {
        Self {
            reader: BufReader::new(stream),
            peer_addr: peer_addr.into(),
            _exclusive: PhantomData,
        }
    }

    /// Encode and write one request
    pub fn send(&mut self, request: &Request) -> Result<()> {
        write_request(self.reader.get_mut(), request).map_err(|e| {
            tracing::warn!("Error writing to {}: {}", self.peer_addr, e);
            e
        })
    }

    /// Block until one complete response frame has been read
    pub fn receive(&mut self) -> Result<Response> {
        read_response(&mut self.reader).map_err(|e| {
            tracing::warn!("Error reading from {}: {}", self.peer_addr, e);
            e
        })
    }

    /// Send a request and read the reply that answers it
    pub fn round_trip(&mut self, request: &Request) -> Result<Response> {
        self.send(request)?;
        self.receive()
    }

    /// Get the peer address string
    pub fn peer_addr(&self) -> &str {
        &self.peer_addr
    }

    /// Borrow the underlying stream
    pub fn get_ref(&self) -> &S {
        self.reader.get_ref()
    }

    /// Unwrap the underlying stream, discarding any buffered input
    pub fn into_inner(self) -> S {
        self.reader.into_inner()
    }
}

fn dial(config: &ClientConfig) -> std::io::Result<TcpStream> {
    if config.connect_timeout_ms == 0 {
        return TcpStream::connect((config.host.as_str(), config.port));
    }

    let timeout = Duration::from_millis(config.connect_timeout_ms);
    let mut last_err = None;
    for addr in (config.host.as_str(), config.port).to_socket_addrs()? {
        match TcpStream::connect_timeout(&addr, timeout) {
            Ok(stream) => return Ok(stream),
            Err(e) => last_err = Some(e),
        }
    }

    Err(last_err.unwrap_or_else(|| {
        std::io::Error::new(
            std::io::ErrorKind::AddrNotAvailable,
            "host resolved to no addresses",
        )
    }))
}

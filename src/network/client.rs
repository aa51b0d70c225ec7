//! Cache Client
//!
//! Binds each operation to its request encoding and to the way its reply
//! is interpreted.

use std::io::{Read, Write};
use std::net::TcpStream;

use crate::config::ClientConfig;
use crate::error::Result;
use crate::protocol::{Command, Operation, Request, Response};

use super::Connection;

/// How a decoded reply is handed back for one operation
fn interpreter_for(operation: Operation) -> fn(Response) -> Response {
    match operation {
        Operation::Get => keep_response,
        Operation::Set | Operation::Del => discard_value,
    }
}

fn keep_response(response: Response) -> Response {
    response
}

/// Acknowledgements carry no meaningful value; only failures survive
fn discard_value(response: Response) -> Response {
    match response {
        Response::Value(_) => Response::Empty,
        other => other,
    }
}

/// Client for the cache server
///
/// Holds one connection for its whole lifetime. The connection is closed
/// when the client is dropped, whatever the outcome of the last call.
pub struct Client<S: Read + Write = TcpStream> {
    connection: Connection<S>,
}

impl Client<TcpStream> {
    /// Connect to the server described by `config`
    pub fn connect(config: &ClientConfig) -> Result<Self> {
        Ok(Self::new(Connection::connect(config)?))
    }
}

impl<S: Read + Write> Client<S> {
    pub fn new(connection: Connection<S>) -> Self {
        Self { connection }
    }

    /// Run a caller-supplied command
    ///
    /// Unknown operation names fail with `InvalidOperation` before
    /// anything is written to the connection.
    pub fn run(&mut self, command: &Command) -> Result<Response> {
        let request = Request::from_command(command)?;
        self.execute(&request)
    }

    /// Send a request and interpret its reply
    ///
    /// `Response::Failure` is returned as data, not as an error.
    pub fn execute(&mut self, request: &Request) -> Result<Response> {
        let interpret = interpreter_for(request.operation());
        let response = self.connection.round_trip(request)?;
        tracing::debug!(
            "{} {:?} -> {}",
            request.operation(),
            String::from_utf8_lossy(request.key()),
            describe(&response)
        );
        Ok(interpret(response))
    }

    /// Fetch the value stored under `key`
    pub fn get(&mut self, key: impl Into<Vec<u8>>) -> Result<Response> {
        self.execute(&Request::fetch(key))
    }

    /// Store `value` under `key`
    pub fn set(&mut self, key: impl Into<Vec<u8>>, value: impl Into<Vec<u8>>) -> Result<Response> {
        self.execute(&Request::store(key, value))
    }

    /// Delete `key`
    pub fn del(&mut self, key: impl Into<Vec<u8>>) -> Result<Response> {
        self.execute(&Request::delete(key))
    }

    pub fn connection(&self) -> &Connection<S> {
        &self.connection
    }

    pub fn into_connection(self) -> Connection<S> {
        self.connection
    }
}

fn describe(response: &Response) -> String {
    match response {
        Response::Empty => "empty".to_string(),
        Response::Value(value) => format!("value ({} bytes)", value.len()),
        Response::Failure(message) => format!("failure: {}", String::from_utf8_lossy(message)),
    }
}

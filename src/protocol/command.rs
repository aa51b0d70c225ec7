//! Command definitions
//!
//! Represents the operations a client can issue and the requests that
//! carry them onto the wire.

use std::fmt;
use std::str::FromStr;

use crate::error::CacheError;

/// Operation names accepted from the command source
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Get,
    Set,
    Del,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Get => "get",
            Operation::Set => "set",
            Operation::Del => "del",
        }
    }
}

impl FromStr for Operation {
    type Err = CacheError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "get" => Ok(Operation::Get),
            "set" => Ok(Operation::Set),
            "del" => Ok(Operation::Del),
            other => Err(CacheError::InvalidOperation(other.to_string())),
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Command descriptor as supplied by the caller
///
/// The operation name is kept as text until it is turned into a
/// [`Request`], so an unknown name surfaces as `InvalidOperation` at that
/// point rather than while the descriptor is being assembled.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Command {
    pub operation: String,
    pub key: String,
    pub value: String,
}

impl Command {
    pub fn new(
        operation: impl Into<String>,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self {
            operation: operation.into(),
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Tag bytes identifying each request kind
pub const TAG_FETCH: u8 = b'G';
pub const TAG_STORE: u8 = b'S';
pub const TAG_DELETE: u8 = b'D';

/// A request ready to be encoded
///
/// Keys and values are raw bytes; their lengths are byte counts and no
/// delimiter validation is performed on them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    /// Fetch the value stored under a key
    Fetch { key: Vec<u8> },

    /// Store a key-value pair
    Store { key: Vec<u8>, value: Vec<u8> },

    /// Delete a key
    Delete { key: Vec<u8> },
}

impl Request {
    pub fn fetch(key: impl Into<Vec<u8>>) -> Self {
        Request::Fetch { key: key.into() }
    }

    pub fn store(key: impl Into<Vec<u8>>, value: impl Into<Vec<u8>>) -> Self {
        Request::Store {
            key: key.into(),
            value: value.into(),
        }
    }

    pub fn delete(key: impl Into<Vec<u8>>) -> Self {
        Request::Delete { key: key.into() }
    }

    /// Build a request from a caller-supplied descriptor
    ///
    /// The value is only used by `set`.
    pub fn from_command(command: &Command) -> Result<Self, CacheError> {
        let request = match command.operation.parse::<Operation>()? {
            Operation::Get => Request::fetch(command.key.as_bytes()),
            Operation::Set => Request::store(command.key.as_bytes(), command.value.as_bytes()),
            Operation::Del => Request::delete(command.key.as_bytes()),
        };
        Ok(request)
    }

    /// The operation this request carries
    pub fn operation(&self) -> Operation {
        match self {
            Request::Fetch { .. } => Operation::Get,
            Request::Store { .. } => Operation::Set,
            Request::Delete { .. } => Operation::Del,
        }
    }

    /// Leading tag byte on the wire
    pub fn tag(&self) -> u8 {
        match self {
            Request::Fetch { .. } => TAG_FETCH,
            Request::Store { .. } => TAG_STORE,
            Request::Delete { .. } => TAG_DELETE,
        }
    }

    pub fn key(&self) -> &[u8] {
        match self {
            Request::Fetch { key } | Request::Store { key, .. } | Request::Delete { key } => key,
        }
    }
}

//! Response definitions
//!
//! Represents one decoded reply frame from the server.

use std::borrow::Cow;

use bytes::Bytes;

use crate::error::{CacheError, Result};

/// A decoded response
///
/// A zero length on the wire always decodes to `Empty`: an empty value
/// and an empty error message cannot be told apart from a bare
/// acknowledgement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Response {
    /// Acknowledgement with nothing to return
    Empty,

    /// Payload of a successful fetch
    Value(Bytes),

    /// Error message reported by the server (e.g. key not found), kept as
    /// the raw bytes that were sent
    Failure(Bytes),
}

impl Response {
    pub fn is_empty(&self) -> bool {
        matches!(self, Response::Empty)
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, Response::Failure(_))
    }

    /// Borrow the value payload, if any
    pub fn value(&self) -> Option<&Bytes> {
        match self {
            Response::Value(value) => Some(value),
            _ => None,
        }
    }

    /// Server error message as text, if this is a failure
    ///
    /// Invalid UTF-8 is replaced for display; the raw bytes stay in the
    /// variant.
    pub fn failure_message(&self) -> Option<Cow<'_, str>> {
        match self {
            Response::Failure(message) => Some(String::from_utf8_lossy(message)),
            _ => None,
        }
    }

    /// Convert into a `Result` for callers that want to use `?`
    ///
    /// `Failure` becomes `CacheError::ServerFailure`.
    pub fn into_value(self) -> Result<Option<Bytes>> {
        match self {
            Response::Empty => Ok(None),
            Response::Value(value) => Ok(Some(value)),
            Response::Failure(message) => Err(CacheError::ServerFailure(
                String::from_utf8_lossy(&message).into_owned(),
            )),
        }
    }
}

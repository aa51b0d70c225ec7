//! Protocol codec
//!
//! Encoding of requests and decoding of response frames.
//!
//! ## Wire Format
//!
//! ### Request Format
//! ```text
//! G<klen> <key>
//! S<klen> <vlen> <key><value>
//! D<klen> <key>
//! ```
//! Lengths are ASCII decimal byte counts. There is no trailing newline and
//! no separator between key and value; the lengths alone delimit them.
//!
//! ### Response Format
//! ```text
//! ┌──────────────┬─────┬──────────────────────────┐
//! │ Len (signed) │ ' ' │   Payload (|Len| bytes)  │
//! └──────────────┴─────┴──────────────────────────┘
//! ```
//! - `Len > 0`: payload is the value
//! - `Len < 0`: payload is the server's error message
//! - `Len == 0`: no payload follows

use std::io::{BufRead, Cursor, ErrorKind, Read, Write};

use bytes::{BufMut, Bytes, BytesMut};

use super::{Request, Response};
use crate::error::{CacheError, Result};

/// Longest accepted length token, excluding the terminating space
/// (`i64::MIN` has 20 characters)
pub const MAX_LENGTH_TOKEN: usize = 20;

/// Maximum response payload size (16 MB)
pub const MAX_PAYLOAD_SIZE: usize = 16 * 1024 * 1024;

// =============================================================================
// Request Encoding
// =============================================================================

/// Encode a request to its exact wire bytes
pub fn encode_request(request: &Request) -> Bytes {
    let mut buf = BytesMut::with_capacity(encoded_len(request));
    buf.put_u8(request.tag());

    match request {
        Request::Fetch { key } | Request::Delete { key } => {
            put_decimal(&mut buf, key.len());
            buf.put_u8(b' ');
            buf.put_slice(key);
        }
        Request::Store { key, value } => {
            put_decimal(&mut buf, key.len());
            buf.put_u8(b' ');
            put_decimal(&mut buf, value.len());
            buf.put_u8(b' ');
            buf.put_slice(key);
            buf.put_slice(value);
        }
    }

    buf.freeze()
}

/// Write a request to a stream
///
/// The whole frame goes out in a single `write_all` followed by a flush.
pub fn write_request<W: Write>(writer: &mut W, request: &Request) -> Result<()> {
    let bytes = encode_request(request);
    tracing::trace!(
        "Sending {} request ({} bytes on the wire)",
        request.operation(),
        bytes.len()
    );
    writer.write_all(&bytes)?;
    writer.flush()?;
    Ok(())
}

fn put_decimal(buf: &mut BytesMut, n: usize) {
    buf.put_slice(n.to_string().as_bytes());
}

/// Upper bound on the encoded size, used to size the buffer once
fn encoded_len(request: &Request) -> usize {
    // tag + up to two 20-digit lengths + two spaces
    let header = 1 + 2 * (MAX_LENGTH_TOKEN + 1);
    match request {
        Request::Fetch { key } | Request::Delete { key } => header + key.len(),
        Request::Store { key, value } => header + key.len() + value.len(),
    }
}

// =============================================================================
// Response Decoding
// =============================================================================

/// Read exactly one response frame from a stream
///
/// Single pass: the length token is read first, then the payload it
/// declares (skipped entirely when the length is zero). Bytes after the
/// frame are left unread.
pub fn read_response<R: BufRead>(reader: &mut R) -> Result<Response> {
    let len = read_length(reader)?;

    if len == 0 {
        tracing::trace!("Received empty response");
        return Ok(Response::Empty);
    }

    let size = usize::try_from(len.unsigned_abs()).unwrap_or(usize::MAX);
    if size > MAX_PAYLOAD_SIZE {
        tracing::warn!("Response declares {} payload bytes (max {})", size, MAX_PAYLOAD_SIZE);
        return Err(CacheError::Protocol(format!(
            "Response payload too large: {} bytes (max {})",
            size, MAX_PAYLOAD_SIZE
        )));
    }

    let payload = read_payload(reader, size)?;

    if len > 0 {
        tracing::trace!("Received value response ({} bytes)", size);
        Ok(Response::Value(Bytes::from(payload)))
    } else {
        tracing::trace!(
            "Received failure response: {}",
            String::from_utf8_lossy(&payload)
        );
        Ok(Response::Failure(Bytes::from(payload)))
    }
}

/// Decode a response from a complete buffer
///
/// Each call works on its own cursor, so decoding the same buffer twice
/// yields the same response.
pub fn decode_response(bytes: &[u8]) -> Result<Response> {
    let mut cursor = Cursor::new(bytes);
    read_response(&mut cursor)
}

/// Read the signed length token, consuming its terminating space
fn read_length<R: BufRead>(reader: &mut R) -> Result<i64> {
    let mut token = Vec::with_capacity(MAX_LENGTH_TOKEN + 1);
    reader
        .by_ref()
        .take(MAX_LENGTH_TOKEN as u64 + 1)
        .read_until(b' ', &mut token)?;

    if token.last() != Some(&b' ') {
        let reason = if token.len() > MAX_LENGTH_TOKEN {
            format!("length token exceeds {} bytes", MAX_LENGTH_TOKEN)
        } else {
            format!(
                "stream ended before length terminator ({} bytes read)",
                token.len()
            )
        };
        tracing::warn!("Malformed response frame: {}", reason);
        return Err(CacheError::Protocol(reason));
    }

    let text = std::str::from_utf8(&token)
        .map_err(|_| CacheError::Protocol("length token is not valid UTF-8".to_string()))?;

    text.trim().parse::<i64>().map_err(|e| {
        tracing::warn!("Malformed length token {:?}: {}", text, e);
        CacheError::Protocol(format!("invalid length token {:?}: {}", text, e))
    })
}

/// Read exactly `size` payload bytes
fn read_payload<R: Read>(reader: &mut R, size: usize) -> Result<Vec<u8>> {
    let mut payload = vec![0u8; size];
    reader.read_exact(&mut payload).map_err(|e| {
        if e.kind() == ErrorKind::UnexpectedEof {
            CacheError::TruncatedPayload {
                expected: size,
                source: e,
            }
        } else {
            CacheError::Io(e)
        }
    })?;
    Ok(payload)
}

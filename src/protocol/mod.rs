//! Protocol Module
//!
//! Defines the length-prefixed text protocol spoken with the cache server.
//!
//! ## Requests
//! - `G<klen> <key>`               - fetch a value
//! - `S<klen> <vlen> <key><value>` - store a value
//! - `D<klen> <key>`               - delete a key
//!
//! ## Responses
//! `<len> <payload>` where `len` is a signed decimal:
//! - positive: `len` bytes of value follow
//! - negative: `-len` bytes of error message follow
//! - zero: nothing follows

mod command;
mod response;
mod codec;

pub use command::{Command, Operation, Request, TAG_DELETE, TAG_FETCH, TAG_STORE};
pub use response::Response;
pub use codec::{
    decode_response, encode_request, read_response, write_request, MAX_LENGTH_TOKEN,
    MAX_PAYLOAD_SIZE,
};

//! Network Module
//!
//! TCP connection handling and the client built on it.
//!
//! ## Model
//! - One connection per client, opened once and closed on drop
//! - One outstanding request at a time; the reply is read to completion
//!   before the call returns
//! - No retries, pooling or pipelining

mod connection;
mod client;

pub use connection::Connection;
pub use client::Client;

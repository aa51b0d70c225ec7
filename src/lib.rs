//! # kvcache
//!
//! A minimal client for a key-value cache server speaking a
//! length-prefixed text protocol over TCP:
//! - Three operations: get, set, del
//! - One request and one reply per call, read to completion
//! - Server-side errors returned as data, not as local faults
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │              Command (op, key, value)       │
//! └─────────────────────┬───────────────────────┘
//!                       │
//! ┌─────────────────────▼───────────────────────┐
//! │                   Client                    │
//! │      (operation → encode / interpret)       │
//! └─────────────────────┬───────────────────────┘
//!                       │
//!          ┌────────────┴────────────┐
//!          ▼                         ▼
//!   ┌─────────────┐          ┌──────────────┐
//!   │   Encoder   │          │   Decoder    │
//!   │  G / S / D  │          │ <len> <data> │
//!   └──────┬──────┘          └──────▲───────┘
//!          │       Connection       │
//!          └────────────────────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod protocol;
pub mod network;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{CacheError, Result};
pub use config::ClientConfig;
pub use network::{Client, Connection};
pub use protocol::{Command, Request, Response};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of kvcache
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

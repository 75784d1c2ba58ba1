//! Object identity for the plumb object store.
//!
//! Every stored object is named by the SHA-1 digest of its framed bytes
//! (`"<kind> <len>\0<payload>"`). This crate provides the `ObjectId` type,
//! the streaming `Hasher` that produces it, and hex encoding/decoding.

mod error;
pub mod hex;
mod oid;
pub mod hasher;

pub use error::HashError;
pub use oid::ObjectId;

/// Length of a raw object id in bytes (160 bits).
pub const DIGEST_LEN: usize = 20;

/// Length of a hex-encoded object id.
pub const HEX_LEN: usize = DIGEST_LEN * 2;

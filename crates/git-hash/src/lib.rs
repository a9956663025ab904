//! Object identity for the object graph layer.
//!
//! This crate provides the 20-byte `ObjectId`, the abbreviated `Prefix`
//! used for lookup-by-prefix, git-compatible content hashing, hex
//! encoding/decoding and the OID collections used by the walker.

mod error;
pub mod hex;
mod oid;
mod prefix;
pub mod hasher;
pub mod collections;

pub use error::HashError;
pub use oid::ObjectId;
pub use prefix::Prefix;

/// Length of a raw SHA-1 digest in bytes.
pub const RAW_LEN: usize = 20;
/// Length of a SHA-1 digest in hex characters.
pub const HEX_LEN: usize = 40;
/// Shortest accepted abbreviation, in hex characters.
pub const MIN_PREFIX_LEN: usize = 4;

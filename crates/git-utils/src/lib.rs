//! Foundation utilities shared by the object graph crates.
//!
//! Identity signatures with git timestamps, and the glob matcher used to
//! expand reference patterns such as `refs/heads/*`.

pub mod date;
pub mod error;
pub mod wildmatch;

// Re-export core types at crate root for convenience
pub use bstr::{BStr, BString, ByteSlice, ByteVec};
pub use error::UtilError;

pub type Result<T> = std::result::Result<T, UtilError>;

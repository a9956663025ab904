use std::fmt;
use std::str::FromStr;

use crate::hex::{decode_into, hex_to_string};
use crate::{HashError, Prefix, HEX_LEN, RAW_LEN};

/// A git object identifier: the SHA-1 of an object's canonical bytes.
///
/// Ordering and equality are byte-wise, which matches the ordering of the
/// lowercase hex form.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId([u8; RAW_LEN]);

impl ObjectId {
    /// The null OID (all zeros).
    pub const NULL: Self = Self([0u8; RAW_LEN]);

    /// Create an ObjectId from exactly 20 raw bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, HashError> {
        let arr: [u8; RAW_LEN] = bytes.try_into().map_err(|_| HashError::InvalidHashLength {
            expected: RAW_LEN,
            actual: bytes.len(),
        })?;
        Ok(Self(arr))
    }

    /// Create an ObjectId from arbitrary raw bytes. Longer input is
    /// truncated to 20 bytes, shorter input is zero padded.
    pub fn from_raw(bytes: &[u8]) -> Self {
        let mut arr = [0u8; RAW_LEN];
        let n = bytes.len().min(RAW_LEN);
        arr[..n].copy_from_slice(&bytes[..n]);
        Self(arr)
    }

    /// Create an ObjectId from exactly 40 hex characters (either case).
    pub fn from_hex(hex: &str) -> Result<Self, HashError> {
        if hex.len() != HEX_LEN {
            return Err(HashError::InvalidHexLength {
                expected: HEX_LEN,
                actual: hex.len(),
            });
        }
        let mut bytes = [0u8; RAW_LEN];
        decode_into(hex.as_bytes(), &mut bytes)?;
        Ok(Self(bytes))
    }

    /// Get the raw bytes of the hash.
    pub fn as_bytes(&self) -> &[u8; RAW_LEN] {
        &self.0
    }

    /// Check if this is the null (all-zeros) OID.
    pub fn is_null(&self) -> bool {
        self.0.iter().all(|&b| b == 0)
    }

    /// A valid identifier is one that is not all zeros.
    pub fn is_valid(&self) -> bool {
        !self.is_null()
    }

    /// Get the hex string representation (lowercase).
    pub fn to_hex(&self) -> String {
        hex_to_string(&self.0)
    }

    /// Abbreviated hex form of `len` characters, clamped to `4..=40`.
    pub fn to_short_hex(&self, len: usize) -> String {
        let mut hex = self.to_hex();
        hex.truncate(len.clamp(crate::MIN_PREFIX_LEN, HEX_LEN));
        hex
    }

    pub fn first_byte(&self) -> u8 {
        self.0[0]
    }

    /// Check if this OID's hex representation starts with the given hex prefix.
    pub fn starts_with_hex(&self, prefix: &str) -> bool {
        self.to_hex().starts_with(&prefix.to_ascii_lowercase())
    }

    /// Does `prefix` abbreviate this identifier?
    pub fn has_prefix(&self, prefix: &Prefix) -> bool {
        prefix.matches(self)
    }

    /// Path form: the first byte as a directory segment, `"xx/xxxx..."`.
    pub fn loose_path(&self) -> String {
        let hex = self.to_hex();
        format!("{}/{}", &hex[..2], &hex[2..])
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ObjectId({})", &self.to_hex()[..8])
    }
}

impl FromStr for ObjectId {
    type Err = HashError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl From<[u8; RAW_LEN]> for ObjectId {
    fn from(bytes: [u8; RAW_LEN]) -> Self {
        Self(bytes)
    }
}

impl AsRef<[u8]> for ObjectId {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

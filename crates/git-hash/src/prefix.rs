use std::fmt;
use std::str::FromStr;

use crate::hex::{decode_into, hex_to_string};
use crate::{HashError, ObjectId, HEX_LEN, MIN_PREFIX_LEN, RAW_LEN};

/// An abbreviated object identifier, between 4 and 40 hex digits.
///
/// Prefixes are only ever used to look objects up; they are never storage
/// keys. Odd lengths are kept at nibble precision, so `abcde` matches
/// `abcde…` but not `abcdf…`.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Prefix {
    bytes: [u8; RAW_LEN],
    hex_len: usize,
}

impl Prefix {
    /// Parse an abbreviation. Input longer than 40 characters is truncated
    /// to 40; fewer than 4 characters is rejected.
    pub fn from_hex(hex: &str) -> Result<Self, HashError> {
        let bytes = hex.as_bytes();
        let hex_len = bytes.len().min(HEX_LEN);
        if let Some((position, character)) = hex
            .char_indices()
            .take_while(|(i, _)| *i < hex_len)
            .find(|(_, c)| !c.is_ascii_hexdigit())
        {
            return Err(HashError::InvalidHex { position, character });
        }
        if hex_len < MIN_PREFIX_LEN {
            return Err(HashError::PrefixTooShort {
                minimum: MIN_PREFIX_LEN,
                actual: hex_len,
            });
        }
        let mut out = [0u8; RAW_LEN];
        decode_into(&bytes[..hex_len], &mut out)?;
        Ok(Self {
            bytes: out,
            hex_len,
        })
    }

    /// Build a prefix from raw bytes, truncated to 20 bytes.
    pub fn from_raw(raw: &[u8]) -> Result<Self, HashError> {
        let n = raw.len().min(RAW_LEN);
        if n * 2 < MIN_PREFIX_LEN {
            return Err(HashError::PrefixTooShort {
                minimum: MIN_PREFIX_LEN,
                actual: n * 2,
            });
        }
        let mut bytes = [0u8; RAW_LEN];
        bytes[..n].copy_from_slice(&raw[..n]);
        Ok(Self {
            bytes,
            hex_len: n * 2,
        })
    }

    /// Number of significant hex digits.
    pub fn hex_len(&self) -> usize {
        self.hex_len
    }

    /// A prefix of all 40 digits names exactly one identifier.
    pub fn is_full(&self) -> bool {
        self.hex_len == HEX_LEN
    }

    /// False when every significant digit is zero.
    pub fn is_valid(&self) -> bool {
        self.bytes.iter().any(|&b| b != 0)
    }

    /// The full identifier, when this prefix has all 40 digits.
    pub fn to_object_id(&self) -> Option<ObjectId> {
        self.is_full().then(|| ObjectId::from(self.bytes))
    }

    /// Does `oid` start with this prefix?
    pub fn matches(&self, oid: &ObjectId) -> bool {
        let whole = self.hex_len / 2;
        let raw = oid.as_bytes();
        if raw[..whole] != self.bytes[..whole] {
            return false;
        }
        self.hex_len % 2 == 0 || (raw[whole] & 0xf0) == self.bytes[whole]
    }

    /// Smallest and largest identifiers carrying this prefix, for range
    /// scans over ordered stores.
    pub fn range(&self) -> (ObjectId, ObjectId) {
        let mut high = self.bytes;
        let whole = self.hex_len / 2;
        if self.hex_len % 2 == 1 {
            high[whole] |= 0x0f;
        }
        let tail = whole + self.hex_len % 2;
        for b in &mut high[tail..] {
            *b = 0xff;
        }
        (ObjectId::from(self.bytes), ObjectId::from(high))
    }

    pub fn to_hex(&self) -> String {
        let mut hex = hex_to_string(&self.bytes);
        hex.truncate(self.hex_len);
        hex
    }
}

impl From<ObjectId> for Prefix {
    fn from(oid: ObjectId) -> Self {
        Self {
            bytes: *oid.as_bytes(),
            hex_len: HEX_LEN,
        }
    }
}

impl FromStr for Prefix {
    type Err = HashError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl fmt::Display for Prefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for Prefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Prefix({})", self.to_hex())
    }
}

use crate::HashError;

/// Lookup table: ASCII byte → nibble value (255 = invalid).
const HEX_DECODE: [u8; 256] = {
    let mut table = [255u8; 256];
    let mut i = 0u8;
    loop {
        match i {
            b'0'..=b'9' => table[i as usize] = i - b'0',
            b'a'..=b'f' => table[i as usize] = i - b'a' + 10,
            b'A'..=b'F' => table[i as usize] = i - b'A' + 10,
            _ => {}
        }
        if i == 255 {
            break;
        }
        i += 1;
    }
    table
};

const HEX_ENCODE: &[u8; 16] = b"0123456789abcdef";

/// Decode a single hex digit, or `None` if `c` is not one.
pub fn nibble(c: u8) -> Option<u8> {
    match HEX_DECODE[c as usize] {
        255 => None,
        v => Some(v),
    }
}

/// Hex-encode `bytes` to a new lowercase `String`.
pub fn hex_to_string(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() * 2);
    for &b in bytes {
        out.push(HEX_ENCODE[(b >> 4) as usize] as char);
        out.push(HEX_ENCODE[(b & 0x0f) as usize] as char);
    }
    out
}

/// Decode hex digits into `buf`, two digits per byte. An odd trailing
/// digit fills the high nibble of its byte. `buf` must hold at least
/// `(hex.len() + 1) / 2` bytes; bytes past the decoded digits are left as is.
pub fn decode_into(hex: &[u8], buf: &mut [u8]) -> Result<(), HashError> {
    let needed = (hex.len() + 1) / 2;
    if buf.len() < needed {
        return Err(HashError::InvalidHexLength {
            expected: buf.len() * 2,
            actual: hex.len(),
        });
    }
    for (position, &c) in hex.iter().enumerate() {
        let v = nibble(c).ok_or(HashError::InvalidHex {
            position,
            character: c as char,
        })?;
        if position % 2 == 0 {
            buf[position / 2] = v << 4;
        } else {
            buf[position / 2] |= v;
        }
    }
    Ok(())
}

/// Decode an even-length hex string to a new `Vec<u8>`.
pub fn hex_to_bytes(hex: &str) -> Result<Vec<u8>, HashError> {
    if hex.len() % 2 != 0 {
        return Err(HashError::InvalidHexLength {
            expected: hex.len() + 1,
            actual: hex.len(),
        });
    }
    let mut buf = vec![0u8; hex.len() / 2];
    decode_into(hex.as_bytes(), &mut buf)?;
    Ok(buf)
}

/// Check whether every character of `s` is a hex digit.
pub fn is_hex(s: &str) -> bool {
    s.bytes().all(|b| nibble(b).is_some())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_decode_roundtrip() {
        let bytes = [0xde, 0xad, 0xbe, 0xef, 0x00, 0xff];
        let hex = hex_to_string(&bytes);
        assert_eq!(hex, "deadbeef00ff");
        assert_eq!(hex_to_bytes(&hex).unwrap(), bytes);
    }

    #[test]
    fn decode_mixed_case() {
        let decoded = hex_to_bytes("DeAdBeEf").unwrap();
        assert_eq!(decoded, [0xde, 0xad, 0xbe, 0xef]);
    }

    #[test]
    fn decode_invalid_char() {
        let err = hex_to_bytes("deadgoof").unwrap_err();
        match err {
            HashError::InvalidHex {
                position: 4,
                character: 'g',
            } => {}
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn decode_odd_length_into_nibble() {
        let mut buf = [0u8; 2];
        decode_into(b"abc", &mut buf).unwrap();
        assert_eq!(buf, [0xab, 0xc0]);
    }

    #[test]
    fn decode_into_short_buffer() {
        let mut buf = [0u8; 1];
        assert!(matches!(
            decode_into(b"abc", &mut buf),
            Err(HashError::InvalidHexLength { .. })
        ));
    }

    #[test]
    fn is_hex_checks() {
        assert!(is_hex("0123456789abcdefABCDEF"));
        assert!(!is_hex("xyz"));
        assert!(is_hex(""));
    }
}

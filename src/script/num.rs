//! Script Number Encoding
//!
//! Bitcoin script numbers are little-endian, sign-magnitude, and must use the
//! shortest representation: the sign lives in the high bit of the last byte,
//! and an extra `0x00` / `0x80` byte is appended only when the magnitude
//! already occupies that bit. Zero is the empty vector.

/// Largest operand CHECKLOCKTIMEVERIFY accepts (5-byte script number)
pub const MAX_LOCKTIME_OPERAND: i64 = (1 << 39) - 1;

/// Maximum operand length for CHECKLOCKTIMEVERIFY / CHECKSEQUENCEVERIFY
pub const LOCKTIME_OPERAND_LEN: usize = 5;

/// Encode `n` in minimal script-number form
pub fn encode(n: i64) -> Vec<u8> {
    if n == 0 {
        return Vec::new();
    }

    let negative = n < 0;
    let mut abs = n.unsigned_abs();
    let mut out = Vec::with_capacity(9);
    while abs > 0 {
        out.push((abs & 0xff) as u8);
        abs >>= 8;
    }

    // Magnitude uses the sign bit: spend one more byte to carry the sign
    let last = out.len() - 1;
    if out[last] & 0x80 != 0 {
        out.push(if negative { 0x80 } else { 0x00 });
    } else if negative {
        out[last] |= 0x80;
    }
    out
}

/// Decode a minimally-encoded script number of at most `max_len` bytes.
///
/// Returns `None` for over-long or non-minimal encodings, which a standard
/// interpreter would reject.
pub fn decode(bytes: &[u8], max_len: usize) -> Option<i64> {
    if bytes.len() > max_len || bytes.len() > 8 {
        return None;
    }
    let Some(&last) = bytes.last() else {
        return Some(0);
    };

    if last & 0x7f == 0 && (bytes.len() == 1 || bytes[bytes.len() - 2] & 0x80 == 0) {
        return None;
    }

    let mut value: i64 = 0;
    for (i, byte) in bytes.iter().enumerate() {
        value |= (*byte as i64) << (8 * i);
    }

    if last & 0x80 != 0 {
        let sign_bit = 0x80_i64 << (8 * (bytes.len() - 1));
        Some(-(value & !sign_bit))
    } else {
        Some(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_zero_is_empty() {
        assert!(encode(0).is_empty());
    }

    #[test]
    fn test_encode_small_values() {
        assert_eq!(encode(1), vec![0x01]);
        assert_eq!(encode(-1), vec![0x81]);
        assert_eq!(encode(16), vec![0x10]);
        assert_eq!(encode(127), vec![0x7f]);
        assert_eq!(encode(-127), vec![0xff]);
    }

    #[test]
    fn test_encode_sign_bit_boundary() {
        // 0x80 would read as negative zero without the padding byte
        assert_eq!(encode(128), vec![0x80, 0x00]);
        assert_eq!(encode(-128), vec![0x80, 0x80]);
        assert_eq!(encode(255), vec![0xff, 0x00]);
        assert_eq!(encode(256), vec![0x00, 0x01]);
        assert_eq!(encode(32767), vec![0xff, 0x7f]);
        assert_eq!(encode(32768), vec![0x00, 0x80, 0x00]);
        assert_eq!(encode(-32768), vec![0x00, 0x80, 0x80]);
    }

    #[test]
    fn test_encode_timestamps() {
        assert_eq!(encode(1468194353), vec![0x31, 0xde, 0x82, 0x57]);
        assert_eq!(encode(0x8000_0000), vec![0x00, 0x00, 0x00, 0x80, 0x00]);
        assert_eq!(encode(u32::MAX as i64), vec![0xff, 0xff, 0xff, 0xff, 0x00]);
        assert_eq!(
            encode(MAX_LOCKTIME_OPERAND),
            vec![0xff, 0xff, 0xff, 0xff, 0x7f]
        );
        assert_eq!(encode(MAX_LOCKTIME_OPERAND + 1).len(), 6);
    }

    #[test]
    fn test_decode_inverts_encode() {
        for n in [
            0,
            1,
            -1,
            127,
            128,
            -128,
            255,
            256,
            -32768,
            500_000_000,
            1468194353,
            MAX_LOCKTIME_OPERAND,
        ] {
            assert_eq!(decode(&encode(n), LOCKTIME_OPERAND_LEN), Some(n), "n = {n}");
        }
    }

    #[test]
    fn test_decode_rejects_non_minimal() {
        assert_eq!(decode(&[0x00], 4), None);
        assert_eq!(decode(&[0x80], 4), None);
        assert_eq!(decode(&[0x01, 0x00], 4), None);
        assert_eq!(decode(&[0x01, 0x80], 4), None);
        // Padding needed because the previous byte has its high bit set
        assert_eq!(decode(&[0xff, 0x00], 4), Some(255));
    }

    #[test]
    fn test_decode_rejects_too_long() {
        let six = encode(MAX_LOCKTIME_OPERAND + 1);
        assert_eq!(decode(&six, LOCKTIME_OPERAND_LEN), None);
        assert_eq!(decode(&[0x01, 0x02, 0x03, 0x04, 0x05], 4), None);
    }
}

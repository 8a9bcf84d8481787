//! MIDI variable-length quantity encoding

use crate::error::{Error, Result};

/// Largest value representable in four 7-bit groups
pub const MAX_VALUE: u32 = 0x0FFF_FFFF;

/// Maximum encoded length in bytes
pub const MAX_LEN: usize = 4;

/// Continuation flag carried by every byte except the last
const CONTINUATION: u8 = 0x80;

/// Check that a value fits in a VLQ, naming the field on failure
pub fn check(field: &'static str, value: u32) -> Result<()> {
    if value > MAX_VALUE {
        return Err(Error::range(field, value, MAX_VALUE as i64));
    }
    Ok(())
}

/// Append the VLQ form of `value` to `buf`
///
/// Groups are emitted most significant first, leading zero groups are
/// suppressed and the lowest group is always written.
pub fn write(buf: &mut Vec<u8>, value: u32) -> Result<()> {
    check("delta time", value)?;

    for shift in [21u32, 14, 7] {
        if value >> shift != 0 {
            buf.push(((value >> shift) & 0x7F) as u8 | CONTINUATION);
        }
    }
    buf.push((value & 0x7F) as u8);
    Ok(())
}

/// Encode a value into a fresh 1-4 byte vector
pub fn encode(value: u32) -> Result<Vec<u8>> {
    let mut buf = Vec::with_capacity(MAX_LEN);
    write(&mut buf, value)?;
    Ok(buf)
}

/// Decode a VLQ from the front of `data`
///
/// Returns the value and the number of bytes consumed, or `None` if the
/// input ends mid-quantity or runs past four bytes.
pub fn decode(data: &[u8]) -> Option<(u32, usize)> {
    let mut value = 0u32;
    for (i, &byte) in data.iter().take(MAX_LEN).enumerate() {
        value = (value << 7) | (byte & 0x7F) as u32;
        if byte & CONTINUATION == 0 {
            return Some((value, i + 1));
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_byte() {
        assert_eq!(encode(0).unwrap(), vec![0x00]);
        assert_eq!(encode(0x40).unwrap(), vec![0x40]);
        assert_eq!(encode(127).unwrap(), vec![0x7F]);
    }

    #[test]
    fn test_group_boundaries() {
        assert_eq!(encode(128).unwrap(), vec![0x81, 0x00]);
        assert_eq!(encode(0x2000).unwrap(), vec![0xC0, 0x00]);
        assert_eq!(encode(0x3FFF).unwrap(), vec![0xFF, 0x7F]);
        assert_eq!(encode(0x4000).unwrap(), vec![0x81, 0x80, 0x00]);
        assert_eq!(encode(0x1F_FFFF).unwrap(), vec![0xFF, 0xFF, 0x7F]);
        assert_eq!(encode(0x20_0000).unwrap(), vec![0x81, 0x80, 0x80, 0x00]);
        assert_eq!(encode(MAX_VALUE).unwrap(), vec![0xFF, 0xFF, 0xFF, 0x7F]);
    }

    #[test]
    fn test_rejects_oversized() {
        assert!(matches!(
            encode(MAX_VALUE + 1),
            Err(Error::InvalidRange { max, .. }) if max == MAX_VALUE as i64
        ));
    }

    #[test]
    fn test_write_appends() {
        let mut buf = vec![0xAA];
        write(&mut buf, 96).unwrap();
        write(&mut buf, 200).unwrap();
        assert_eq!(buf, vec![0xAA, 0x60, 0x81, 0x48]);
    }

    fn assert_round_trip(value: u32) {
        let bytes = encode(value).unwrap();
        assert_eq!(decode(&bytes), Some((value, bytes.len())), "value {:#x}", value);
    }

    #[test]
    fn test_decode_round_trip_sweep() {
        // Every value congruent to 0..=3 modulo 0x3FF across the whole range
        for base in (0..=MAX_VALUE).step_by(0x3FF) {
            for offset in 0..=3 {
                if let Some(value) = base.checked_add(offset).filter(|&v| v <= MAX_VALUE) {
                    assert_round_trip(value);
                }
            }
        }
    }

    #[test]
    fn test_decode_round_trip_group_edges() {
        for bits in [7u32, 14, 21, 28] {
            let edge = 1u32 << bits;
            for value in [edge - 2, edge - 1, edge, edge + 1] {
                if value <= MAX_VALUE {
                    assert_round_trip(value);
                }
            }
        }
        assert_round_trip(0);
        assert_round_trip(1);
    }

    #[test]
    fn test_minimal_length() {
        for (value, len) in [
            (0, 1),
            (0x7F, 1),
            (0x80, 2),
            (0x3FFF, 2),
            (0x4000, 3),
            (0x1F_FFFF, 3),
            (0x20_0000, 4),
            (MAX_VALUE, 4),
        ] {
            assert_eq!(encode(value).unwrap().len(), len, "value {:#x}", value);
        }
    }

    #[test]
    fn test_decode_truncated() {
        assert_eq!(decode(&[]), None);
        assert_eq!(decode(&[0x81]), None);
        assert_eq!(decode(&[0xFF, 0xFF, 0xFF, 0xFF, 0x7F]), None);
        assert_eq!(decode(&[0x81, 0x00, 0x55]), Some((128, 2)));
    }
}

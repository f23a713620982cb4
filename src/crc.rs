//! Table-free CCITT CRC-16 used for frame integrity.
//!
//! Polynomial `0x1021`, initial value `0xffff`, no reflection, no final
//! XOR. The checksum is computed bit by bit so no 512-byte lookup table has
//! to live in flash; at link payload sizes the cost is negligible.
//!
//! The transport layer appends `crc16_ccitt` over header plus payload to
//! every outgoing frame and recomputes it on receive; a frame is valid iff
//! both values match.
//!
//! ```
//! use rflink433::crc::crc16_ccitt;
//!
//! // Standard check value for this CRC variant.
//! assert_eq!(crc16_ccitt(b"123456789"), 0x29b1);
//! ```

const CRC_POLY: u16 = 0x1021;

/// Computes the CCITT CRC-16 over `data`.
///
/// Pure function: no state, no error conditions. `crc16_ccitt(&[])` is the
/// initial value `0xffff`.
pub fn crc16_ccitt(data: &[u8]) -> u16 {
    let mut crc: u16 = 0xffff;
    for byte in data {
        crc = crc16_ccitt_update(crc, *byte);
    }
    crc
}

/// Folds one byte into a running CRC accumulator.
///
/// Start from `0xffff` and feed bytes in wire order to get the same result
/// as [`crc16_ccitt`] over the whole range.
pub fn crc16_ccitt_update(crc: u16, byte: u8) -> u16 {
    let mut crc = crc ^ ((byte as u16) << 8);
    for _ in 0..8 {
        if crc & 0x8000 != 0 {
            crc = (crc << 1) ^ CRC_POLY;
        } else {
            crc <<= 1;
        }
    }
    crc
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_check_value() {
        assert_eq!(crc16_ccitt(b"123456789"), 0x29b1);
    }

    #[test]
    fn test_empty_input_is_initial_value() {
        assert_eq!(crc16_ccitt(&[]), 0xffff);
    }

    #[test]
    fn test_deterministic() {
        let data = [0x12, 0x34, 0xab, 0xcd, 0x00, 0xff];
        assert_eq!(crc16_ccitt(&data), crc16_ccitt(&data));
    }

    #[test]
    fn test_single_bit_flips_change_the_checksum() {
        let data = *b"steering+throttle";
        let reference = crc16_ccitt(&data);
        for i in 0..data.len() {
            for bit in 0..8 {
                let mut flipped = data;
                flipped[i] ^= 1 << bit;
                assert_ne!(
                    crc16_ccitt(&flipped),
                    reference,
                    "flip of byte {} bit {} went undetected",
                    i,
                    bit
                );
            }
        }
    }

    #[test]
    fn test_incremental_update_matches_one_shot() {
        let data = [0xde, 0xad, 0xbe, 0xef];
        let mut crc = 0xffff;
        for byte in data {
            crc = crc16_ccitt_update(crc, byte);
        }
        assert_eq!(crc, crc16_ccitt(&data));
    }
}

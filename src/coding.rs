//! Line coding for the bit-banged link: raw bytes or balanced 4b5b symbols.
//!
//! Every byte on the wire travels as one *wire word*: a `1` framing bit, a
//! `0` spacer, then the coded byte, MSB first. The framing pair guarantees a
//! falling edge at the head of every word, which the receiver uses to
//! re-center its sampling phase once per byte.
//!
//! ## Modes
//!
//! - [`LineCoding::Raw`]: the byte goes out untouched after the framing
//!   pair; a word occupies a 10-tick slot. Cheapest, but long runs of
//!   identical bits let the receiver's clock drift within a word.
//! - [`LineCoding::Balanced4b5b`]: each nibble maps to one of 16 five-bit
//!   codes picked from the 32 possible so that runs of identical bits stay
//!   short and every code contains edges; a word occupies a 12-tick slot.
//!   This is the mode to use over real RF, where the receiver's data slicer
//!   needs transitions to hold its level.
//!
//! ## Decoding
//!
//! The inverse table maps the 16 invalid 5-bit patterns to `0` and flags
//! nothing: line corruption is caught by the frame CRC, not by the symbol
//! layer. Lookups are masked to five bits so a corrupt sampled word can
//! never index outside the table.
//!
//! The mode is fixed per link at configuration time and both peers must
//! agree on it; the per-mode strobe/sync/word tick counts returned here are
//! what the state machines in [`crate::link`] count against.

/// 5-bit codes for each nibble value, chosen for short runs and guaranteed
/// edges within every code.
static ENCODE_4B5B: [u8; 16] = [
    0x05, 0x06, 0x09, 0x0a, 0x0b, 0x0c, 0x0d, 0x0e, 0x11, 0x12, 0x13, 0x14, 0x15, 0x16, 0x19,
    0x1a,
];

/// Inverse of [`ENCODE_4B5B`]; the 16 patterns that are not valid codes
/// decode to 0.
static DECODE_5B4B: [u8; 32] = [
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07,
    0x00, 0x00, 0x08, 0x09, 0x0a, 0x0b, 0x0c, 0x0d, 0x00, 0x00, 0x0e, 0x0f, 0x00, 0x00, 0x00,
    0x00, 0x00,
];

/// Maps a nibble (low four bits) to its 5-bit line code.
pub const fn encode_nibble(nibble: u8) -> u8 {
    ENCODE_4B5B[(nibble & 0x0f) as usize]
}

/// Maps a 5-bit line code back to its nibble.
///
/// Invalid codes return the sentinel `0` without raising an error; frame
/// integrity is the CRC's job.
pub const fn decode_code(code: u8) -> u8 {
    DECODE_5B4B[(code & 0x1f) as usize]
}

/// Wire coding mode of a link, fixed at configuration time.
#[derive(PartialEq, Eq, Clone, Copy, Default, Debug)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub enum LineCoding {
    /// Framing pair plus the raw byte; 10-tick word slots.
    Raw,
    /// Framing pair plus two 5-bit nibble codes; 12-tick word slots.
    #[default]
    Balanced4b5b,
}

impl LineCoding {
    /// Builds the wire word for `byte`: framing `1`, spacer `0`, coded byte.
    ///
    /// Bit `word_ticks - 1` is the framing bit; the transmitter streams the
    /// word from that bit down to bit 0, one bit per tick.
    pub const fn wire_word(self, byte: u8) -> u16 {
        match self {
            LineCoding::Raw => 0x200 | byte as u16,
            LineCoding::Balanced4b5b => {
                0x800 | ((encode_nibble(byte >> 4) as u16) << 5) | encode_nibble(byte) as u16
            }
        }
    }

    /// Recovers the byte from a sampled word body.
    ///
    /// The receiver consumes the framing bit while word-syncing, so `raw`
    /// holds the `word_ticks - 1` bits after it: the spacer and the coded
    /// byte. Anything beyond the coded bits is masked off.
    pub const fn decode_word(self, raw: u16) -> u8 {
        match self {
            LineCoding::Raw => raw as u8,
            LineCoding::Balanced4b5b => {
                (decode_code((raw >> 5) as u8) << 4) | decode_code(raw as u8)
            }
        }
    }

    /// The all-zero wire word closing every frame: framing pair only.
    pub const fn leadout_word(self) -> u16 {
        match self {
            LineCoding::Raw => 0x200,
            LineCoding::Balanced4b5b => 0x800,
        }
    }

    /// Ticks in one wire-word slot (framing pair plus coded byte).
    pub const fn word_ticks(self) -> u8 {
        match self {
            LineCoding::Raw => 10,
            LineCoding::Balanced4b5b => 12,
        }
    }

    /// Ticks in the sync window: half driven high, half low.
    pub const fn sync_ticks(self) -> u8 {
        match self {
            LineCoding::Raw => 10,
            LineCoding::Balanced4b5b => 12,
        }
    }

    /// Ticks of alternating output preceding sync, letting the receiver's
    /// gain control settle.
    pub const fn strobe_ticks(self) -> u8 {
        match self {
            LineCoding::Raw => 20,
            LineCoding::Balanced4b5b => 24,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nibble_codes_round_trip() {
        for nibble in 0..16u8 {
            let code = encode_nibble(nibble);
            assert_eq!(decode_code(code), nibble, "nibble {:#x}", nibble);
        }
    }

    #[test]
    fn test_invalid_codes_decode_to_sentinel() {
        let valid: [u8; 16] = core::array::from_fn(|n| encode_nibble(n as u8));
        let mut invalid = 0;
        for code in 0..32u8 {
            if !valid.contains(&code) {
                assert_eq!(decode_code(code), 0, "code {:#07b}", code);
                invalid += 1;
            }
        }
        assert_eq!(invalid, 16);
    }

    #[test]
    fn test_codes_are_distinct_and_have_edges() {
        for a in 0..16u8 {
            let code = encode_nibble(a);
            assert!(code > 0x00 && code < 0x1f, "code {:#x} lacks edges", code);
            for b in (a + 1)..16u8 {
                assert_ne!(code, encode_nibble(b));
            }
        }
    }

    #[test]
    fn test_balanced_wire_word_layout() {
        // 0xab: high nibble 0xa -> 0x13, low nibble 0xb -> 0x14.
        let word = LineCoding::Balanced4b5b.wire_word(0xab);
        assert_eq!(word, 0x0800 | (0x13 << 5) | 0x14);
        // Framing pair at the top of the 12-bit slot.
        assert_eq!(word >> 10, 0b10);
    }

    #[test]
    fn test_raw_wire_word_layout() {
        let word = LineCoding::Raw.wire_word(0x5a);
        assert_eq!(word, 0x025a);
        assert_eq!(word >> 8, 0b10);
    }

    #[test]
    fn test_word_body_round_trips() {
        for &byte in &[0x00, 0x01, 0x55, 0x7f, 0x80, 0xab, 0xff] {
            let balanced = LineCoding::Balanced4b5b;
            assert_eq!(balanced.decode_word(balanced.wire_word(byte) & 0x7ff), byte);
            let raw = LineCoding::Raw;
            assert_eq!(raw.decode_word(raw.wire_word(byte) & 0x1ff), byte);
        }
    }

    #[test]
    fn test_leadout_decodes_to_zero() {
        for coding in [LineCoding::Raw, LineCoding::Balanced4b5b] {
            let body = coding.leadout_word() & ((1 << (coding.word_ticks() - 1)) - 1);
            assert_eq!(coding.decode_word(body), 0);
        }
    }

    #[test]
    fn test_timing_relations() {
        for coding in [LineCoding::Raw, LineCoding::Balanced4b5b] {
            assert_eq!(coding.strobe_ticks(), 2 * coding.sync_ticks());
            assert_eq!(coding.strobe_ticks() % 2, 0);
            assert!(coding.word_ticks() >= coding.sync_ticks());
        }
        assert_eq!(LineCoding::Raw.word_ticks(), 10);
        assert_eq!(LineCoding::Balanced4b5b.word_ticks(), 12);
    }
}

use std::iter::once;
use std::sync::LazyLock;

use bitvec::prelude::*;
use itertools::Itertools;
use regex::Regex;

use crate::error::{BitsError, BitsResult};

static NON_HEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^0-9A-Fa-f]").unwrap());

/// Read-only MSB-first view over the bytes of a hex transmission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BitSource {
    bits: BitVec<u8, Msb0>,
    start: usize,
}

impl BitSource {
    /// An odd digit count gets a zero nibble in front so every digit lands in a
    /// whole byte; `start` then skips that half-byte.
    pub fn from_hex(raw: &str) -> BitsResult<Self> {
        let hex = raw.trim();
        if let Some(m) = NON_HEX.find(hex) {
            let found = m.as_str().chars().next().unwrap_or_default();
            let leading = raw.len() - raw.trim_start().len();
            return Err(BitsError::InvalidHex { offset: leading + m.start(), found });
        }

        let pad = hex.len() % 2;
        let bytes = once(0).take(pad)
            .chain(hex.chars().filter_map(|c| c.to_digit(16)).map(|d| d as u8))
            .tuples()
            .map(|(hi, lo)| hi << 4 | lo)
            .collect::<Vec<u8>>();

        Ok(BitSource {bits: BitVec::from_vec(bytes), start: 4 * pad})
    }

    /// First bit of the transmission proper.
    pub fn start(&self) -> usize {self.start}

    pub fn len(&self) -> usize {self.bits.len()}

    pub fn is_empty(&self) -> bool {self.bits.is_empty()}

    pub fn flag(&self, index: usize) -> BitsResult<bool> {
        self.bits.get(index).map(|bit| *bit).ok_or_else(|| self.truncated(index))
    }

    pub fn bit_at(&self, index: usize) -> BitsResult<u8> {
        self.flag(index).map(u8::from)
    }

    /// Unsigned big-endian field of `width` bits, `1 ..= 32`. A short read
    /// reports the first bit missing from the stream.
    pub fn read(&self, index: usize, width: usize) -> BitsResult<u32> {
        debug_assert!((1 ..= 32).contains(&width));
        self.bits.get(index .. index + width)
            .map(|field| field.load_be::<u32>())
            .ok_or_else(|| self.truncated(self.len().max(index)))
    }

    fn truncated(&self, index: usize) -> BitsError {
        BitsError::Truncated {index, len: self.len()}
    }
}

impl From<BitVec<u8, Msb0>> for BitSource {
    fn from(bits: BitVec<u8, Msb0>) -> Self {
        BitSource {bits, start: 0}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_digits_unpack_msb_first() {
        let bits = BitSource::from_hex("D2FE28").unwrap();
        assert_eq!(bits.len(), 24);
        assert_eq!(bits.start(), 0);
        let rendered = (0 .. bits.len()).map(|ix| bits.bit_at(ix).unwrap()).join("");
        assert_eq!(rendered, "110100101111111000101000");
    }

    #[test]
    fn lowercase_and_surrounding_whitespace_are_accepted() {
        let upper = BitSource::from_hex("C200B40A82").unwrap();
        let lower = BitSource::from_hex("  c200b40a82\n").unwrap();
        assert_eq!(upper, lower);
    }

    #[test]
    fn invalid_character_reports_offset() {
        assert_eq!(
            BitSource::from_hex("2Z"),
            Err(BitsError::InvalidHex {offset: 1, found: 'Z'})
        );
        assert_eq!(
            BitSource::from_hex("ab é"),
            Err(BitsError::InvalidHex {offset: 2, found: ' '})
        );
    }

    #[test]
    fn invalid_character_offset_counts_leading_whitespace() {
        assert_eq!(
            BitSource::from_hex("  D2G"),
            Err(BitsError::InvalidHex {offset: 4, found: 'G'})
        );
        assert_eq!(
            BitSource::from_hex("\tx"),
            Err(BitsError::InvalidHex {offset: 1, found: 'x'})
        );
    }

    #[test]
    fn odd_digit_count_skips_padding_half_byte() {
        let bits = BitSource::from_hex("ABC").unwrap();
        assert_eq!(bits.len(), 16);
        assert_eq!(bits.start(), 4);
        assert_eq!(bits.read(bits.start(), 12).unwrap(), 0xABC);
        assert_eq!(bits.read(0, 4).unwrap(), 0);
    }

    #[test]
    fn fields_read_big_endian() {
        let bits = BitSource::from_hex("38006F45291200").unwrap();
        assert_eq!(bits.read(0, 3).unwrap(), 1);
        assert_eq!(bits.read(3, 3).unwrap(), 6);
        assert!(!bits.flag(6).unwrap());
        assert_eq!(bits.read(7, 15).unwrap(), 27);
    }

    #[test]
    fn reading_past_the_end_is_truncation() {
        let bits = BitSource::from_hex("F0").unwrap();
        assert_eq!(bits.bit_at(7), Ok(0));
        assert_eq!(bits.bit_at(8), Err(BitsError::Truncated {index: 8, len: 8}));
        assert_eq!(bits.read(5, 4), Err(BitsError::Truncated {index: 8, len: 8}));
        assert_eq!(bits.read(0, 32), Err(BitsError::Truncated {index: 8, len: 8}));
        assert_eq!(bits.read(12, 3), Err(BitsError::Truncated {index: 12, len: 8}));
    }

    #[test]
    fn empty_input_is_an_empty_stream() {
        let bits = BitSource::from_hex("\n").unwrap();
        assert!(bits.is_empty());
        assert!(bits.flag(0).is_err());
    }
}

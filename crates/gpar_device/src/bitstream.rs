//! The device-wide configuration bit array and its text form.

use crate::error::BitstreamError;
use bitvec::vec::BitVec;
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;
use std::str::FromStr;

/// A fixed-length sequence of configuration bits, indexed absolutely.
///
/// Every access is bounds-checked; the length never changes after creation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Bitstream {
    bits: BitVec,
}

impl Bitstream {
    /// Creates an all-zero bitstream of `len` bits.
    pub fn new(len: usize) -> Self {
        Self {
            bits: BitVec::repeat(false, len),
        }
    }

    /// Number of bits.
    pub fn len(&self) -> usize {
        self.bits.len()
    }

    /// Returns `true` for a zero-length bitstream.
    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    /// Number of set bits.
    pub fn count_ones(&self) -> usize {
        self.bits.count_ones()
    }

    /// Reads one bit.
    pub fn get(&self, index: usize) -> Result<bool, BitstreamError> {
        self.bits
            .get(index)
            .map(|bit| *bit)
            .ok_or(BitstreamError::OutOfRange {
                index,
                len: self.len(),
            })
    }

    /// Writes one bit.
    pub fn set(&mut self, index: usize, value: bool) -> Result<(), BitstreamError> {
        let len = self.len();
        match self.bits.get_mut(index) {
            Some(mut bit) => {
                *bit = value;
                Ok(())
            }
            None => Err(BitstreamError::OutOfRange { index, len }),
        }
    }

    /// Reads a `width`-bit little-endian field starting at `base`.
    pub fn read_field(&self, base: usize, width: usize) -> Result<u64, BitstreamError> {
        debug_assert!(width <= 64);
        let mut value = 0u64;
        for i in 0..width {
            if self.get(base + i)? {
                value |= 1 << i;
            }
        }
        Ok(value)
    }

    /// Writes the low `width` bits of `value` little-endian starting at `base`.
    pub fn write_field(
        &mut self,
        base: usize,
        width: usize,
        value: u64,
    ) -> Result<(), BitstreamError> {
        debug_assert!(width <= 64);
        for i in 0..width {
            self.set(base + i, (value >> i) & 1 == 1)?;
        }
        Ok(())
    }

    /// Iterates over the bits in order.
    pub fn iter(&self) -> impl Iterator<Item = bool> + '_ {
        self.bits.iter().by_vals()
    }

    /// Renders the bitstream as text.
    pub fn to_text(&self, format: TextFormat) -> String {
        let mut out = String::new();
        match format {
            TextFormat::Indexed => {
                out.push_str("index\t\tvalue\t\tcomment\n");
                for (i, bit) in self.iter().enumerate() {
                    let _ = writeln!(out, "{i}\t\t{}\t\t//", u8::from(bit));
                }
            }
            TextFormat::Bits => {
                for bit in self.iter() {
                    out.push(if bit { '1' } else { '0' });
                    out.push('\n');
                }
            }
        }
        out
    }

    /// Parses either text form, auto-detected from the first line.
    pub fn parse_text(text: &str, expected_len: usize) -> Result<Self, BitstreamError> {
        let mut lines = text
            .lines()
            .enumerate()
            .map(|(i, line)| (i + 1, line.trim()))
            .filter(|(_, line)| !line.is_empty())
            .peekable();

        let indexed = lines
            .peek()
            .is_some_and(|(_, line)| line.starts_with("index"));
        if indexed {
            lines.next();
        }

        let mut bits = BitVec::with_capacity(expected_len);
        for (line_no, line) in lines {
            let value = if indexed {
                let mut fields = line.split_whitespace();
                let index = fields.next().and_then(|f| f.parse::<usize>().ok());
                if index != Some(bits.len()) {
                    return Err(BitstreamError::Parse {
                        line: line_no,
                        message: format!("expected index {}", bits.len()),
                    });
                }
                fields.next().unwrap_or("")
            } else {
                line
            };
            let bit = match value {
                "0" => false,
                "1" => true,
                other => {
                    return Err(BitstreamError::Parse {
                        line: line_no,
                        message: format!("'{other}' is not a bit value"),
                    })
                }
            };
            bits.push(bit);
        }

        if bits.len() != expected_len {
            return Err(BitstreamError::Length {
                expected: expected_len,
                found: bits.len(),
            });
        }
        Ok(Self { bits })
    }
}

/// The persisted text form of a bitstream.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextFormat {
    /// A header, then `index<TAB><TAB>value<TAB><TAB>//` per bit.
    #[default]
    Indexed,
    /// One `0` or `1` per line.
    Bits,
}

impl FromStr for TextFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "indexed" => Ok(TextFormat::Indexed),
            "bits" => Ok(TextFormat::Bits),
            other => Err(format!(
                "unknown bitstream format '{other}' (expected indexed or bits)"
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_is_zeroed() {
        let bits = Bitstream::new(16);
        assert_eq!(bits.len(), 16);
        assert_eq!(bits.count_ones(), 0);
        assert!(!Bitstream::new(1).is_empty());
    }

    #[test]
    fn get_set_bounds() {
        let mut bits = Bitstream::new(8);
        bits.set(7, true).unwrap();
        assert!(bits.get(7).unwrap());
        assert_eq!(
            bits.set(8, true),
            Err(BitstreamError::OutOfRange { index: 8, len: 8 })
        );
        assert!(bits.get(100).is_err());
    }

    #[test]
    fn fields_are_little_endian() {
        let mut bits = Bitstream::new(16);
        bits.write_field(3, 5, 0b10110).unwrap();
        assert!(!bits.get(3).unwrap());
        assert!(bits.get(4).unwrap());
        assert!(bits.get(7).unwrap());
        assert_eq!(bits.read_field(3, 5).unwrap(), 0b10110);
        assert!(bits.write_field(14, 4, 0).is_err());
    }

    #[test]
    fn indexed_text_layout() {
        let mut bits = Bitstream::new(3);
        bits.set(1, true).unwrap();
        let text = bits.to_text(TextFormat::Indexed);
        assert_eq!(
            text,
            "index\t\tvalue\t\tcomment\n0\t\t0\t\t//\n1\t\t1\t\t//\n2\t\t0\t\t//\n"
        );
        assert_eq!(Bitstream::parse_text(&text, 3).unwrap(), bits);
    }

    #[test]
    fn bits_text_roundtrip() {
        let mut bits = Bitstream::new(5);
        bits.set(0, true).unwrap();
        bits.set(4, true).unwrap();
        let text = bits.to_text(TextFormat::Bits);
        assert_eq!(text, "1\n0\n0\n0\n1\n");
        assert_eq!(Bitstream::parse_text(&text, 5).unwrap(), bits);
    }

    #[test]
    fn parse_rejects_wrong_length() {
        assert_eq!(
            Bitstream::parse_text("0\n1\n", 3),
            Err(BitstreamError::Length {
                expected: 3,
                found: 2
            })
        );
    }

    #[test]
    fn parse_rejects_bad_values_and_order() {
        assert!(matches!(
            Bitstream::parse_text("0\n2\n", 2),
            Err(BitstreamError::Parse { line: 2, .. })
        ));
        let text = "index\t\tvalue\t\tcomment\n0\t\t0\t\t//\n2\t\t1\t\t//\n";
        assert!(matches!(
            Bitstream::parse_text(text, 2),
            Err(BitstreamError::Parse { line: 3, .. })
        ));
    }

    #[test]
    fn format_from_str() {
        assert_eq!("bits".parse::<TextFormat>(), Ok(TextFormat::Bits));
        assert_eq!("indexed".parse::<TextFormat>(), Ok(TextFormat::Indexed));
        assert!("hex".parse::<TextFormat>().is_err());
    }
}

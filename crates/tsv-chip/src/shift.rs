//! DQ shift field encoding.
//!
//! Each repaired DQ lane carries a 2-bit shift setting selecting which TSV
//! it actually drives, relative to its nominal position:
//!
//! ```text
//! 00 — on the nominal TSV
//! 01 — one TSV to the left
//! 10 — one TSV to the right
//! 11 — two TSVs to the right (the last lane of a block may land on the
//!      next block's left spare — a borrow)
//! ```

use std::fmt;

/// One DQ lane's shift setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Shift {
    /// Drive the nominal TSV.
    Zero = 0b00,
    /// One TSV to the left.
    Left1 = 0b01,
    /// One TSV to the right.
    Right1 = 0b10,
    /// Two TSVs to the right.
    Right2 = 0b11,
}

impl Shift {
    /// Signed TSV offset applied to the lane's nominal position.
    #[must_use]
    pub const fn offset(self) -> i32 {
        match self {
            Self::Zero => 0,
            Self::Left1 => -1,
            Self::Right1 => 1,
            Self::Right2 => 2,
        }
    }

    /// Raw 2-bit field value.
    #[must_use]
    pub const fn encoding(self) -> u8 {
        self as u8
    }

    /// Decode a 2-bit field value (upper bits ignored).
    #[must_use]
    pub const fn from_encoding(bits: u8) -> Self {
        match bits & 0b11 {
            0b01 => Self::Left1,
            0b10 => Self::Right1,
            0b11 => Self::Right2,
            _ => Self::Zero,
        }
    }
}

impl fmt::Display for Shift {
    /// Renders the raw field value, matching the per-lane repair digest.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.encoding())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encoding_roundtrip() {
        for bits in 0..4u8 {
            assert_eq!(Shift::from_encoding(bits).encoding(), bits);
        }
    }

    #[test]
    fn offsets_match_field_values() {
        assert_eq!(Shift::Zero.offset(), 0);
        assert_eq!(Shift::Left1.offset(), -1);
        assert_eq!(Shift::Right1.offset(), 1);
        assert_eq!(Shift::Right2.offset(), 2);
    }
}

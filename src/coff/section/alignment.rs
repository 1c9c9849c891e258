use strum::FromRepr;

use super::SectionCharacteristics;

/// The alignment requested for a section's data, stored as a 4-bit number in bits 20 to 23 of
/// the section characteristics. A value `v` means `1 << (v - 1)` bytes.
///
/// Only meaningful for object files.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Ord, PartialOrd, FromRepr)]
#[repr(u8)]
pub enum SectionAlignment {
    Align1Bytes = 1,
    Align2Bytes,
    Align4Bytes,
    Align8Bytes,
    Align16Bytes,
    Align32Bytes,
    Align64Bytes,
    Align128Bytes,
    Align256Bytes,
    Align512Bytes,
    Align1024Bytes,
    Align2048Bytes,
    Align4096Bytes,
    Align8192Bytes,
}

impl SectionAlignment {
    const SHIFT: u32 = SectionCharacteristics::ALIGN_MASK.trailing_zeros();

    /// Extracts the alignment from a raw characteristics word. Returns [`None`] if no alignment
    /// is given (nibble 0) or the nibble holds the undefined value 15.
    #[inline]
    pub const fn from_characteristics(raw: u32) -> Option<Self> {
        Self::from_repr(Self::nibble_of(raw))
    }

    /// The 4-bit value stored in the characteristics.
    #[inline]
    pub const fn nibble_of(raw: u32) -> u8 {
        ((raw & SectionCharacteristics::ALIGN_MASK) >> Self::SHIFT) as u8
    }

    /// The base-2 logarithm of the alignment.
    #[inline]
    pub const fn bit(self) -> u32 {
        self as u32 - 1
    }

    /// The alignment in bytes.
    #[inline]
    pub const fn bytes(self) -> u32 {
        1 << self.bit()
    }

    /// The alignment in its characteristics position, ready to be combined with flags.
    #[inline]
    pub const fn to_characteristics(self) -> u32 {
        (self as u32) << Self::SHIFT
    }

    /// The smallest alignment of at least `bytes` bytes, or [`None`] if `bytes` is larger than
    /// 8192.
    pub fn at_least(bytes: u32) -> Option<Self> {
        let bit = bytes.max(1).checked_next_power_of_two()?.trailing_zeros();
        Self::from_repr(u8::try_from(bit + 1).ok()?)
    }
}

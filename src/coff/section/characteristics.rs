use std::fmt;

use bitflags::{Bits, bitflags};

/// The flags of a section header, without the alignment nibble.
///
/// Bits 20 to 23 hold the section alignment as a number rather than as flags; see
/// [`SectionAlignment`](super::SectionAlignment).
#[derive(Clone, Copy, Eq, PartialEq, Hash)]
#[repr(transparent)]
pub struct SectionCharacteristics(u32);

bitflags! {
    impl SectionCharacteristics: u32 {
        /// The section should not be padded to the next boundary. Obsolete, replaced by the
        /// alignment nibble.
        const TYPE_NO_PAD = 0x0000_0008;

        /// The section contains executable code.
        const CNT_CODE = 0x0000_0020;

        /// The section contains initialized data.
        const CNT_INITIALIZED_DATA = 0x0000_0040;

        /// The section contains uninitialized data.
        const CNT_UNINITIALIZED_DATA = 0x0000_0080;

        /// Reserved for future use.
        const LNK_OTHER = 0x0000_0100;

        /// The section contains comments or other information, such as `.drectve`.
        const LNK_INFO = 0x0000_0200;

        /// The section will not become part of the image.
        const LNK_REMOVE = 0x0000_0800;

        /// The section contains COMDAT data.
        const LNK_COMDAT = 0x0000_1000;

        /// The section contains data referenced through the global pointer.
        const GPREL = 0x0000_8000;

        /// Reserved for future use.
        const MEM_PURGEABLE = 0x0002_0000;

        /// Reserved for future use. Shares its value with `MEM_PURGEABLE`.
        const MEM_16BIT = 0x0002_0000;

        /// Reserved for future use.
        const MEM_LOCKED = 0x0004_0000;

        /// Reserved for future use.
        const MEM_PRELOAD = 0x0008_0000;

        /// The section contains extended relocations: the real count is stored in the first
        /// relocation record.
        const LNK_NRELOC_OVFL = 0x0100_0000;

        /// The section can be discarded as needed.
        const MEM_DISCARDABLE = 0x0200_0000;

        /// The section cannot be cached.
        const MEM_NOT_CACHED = 0x0400_0000;

        /// The section is not pageable.
        const MEM_NOT_PAGED = 0x0800_0000;

        /// The section can be shared in memory.
        const MEM_SHARED = 0x1000_0000;

        /// The section can be executed as code.
        const MEM_EXECUTE = 0x2000_0000;

        /// The section can be read.
        const MEM_READ = 0x4000_0000;

        /// The section can be written to.
        const MEM_WRITE = 0x8000_0000;
    }
}

impl SectionCharacteristics {
    /// The bits of the characteristics word that hold the alignment nibble.
    pub const ALIGN_MASK: u32 = 0x00F0_0000;

    /// Returns the flags of a raw characteristics word, with the alignment nibble cleared.
    #[inline]
    pub const fn from_raw(raw: u32) -> Self {
        Self::from_bits_retain(raw & !Self::ALIGN_MASK)
    }
}

impl fmt::Debug for SectionCharacteristics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            f.write_fmt(format_args!("{:#x}", <u32 as Bits>::EMPTY))
        } else {
            fmt::Display::fmt(self, f)
        }
    }
}

impl fmt::Display for SectionCharacteristics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        bitflags::parser::to_writer(self, f)
    }
}

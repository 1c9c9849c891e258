use std::fmt;

use bitflags::{Bits, bitflags};

/// The file-level characteristics bitset of a [`CoffHeader`](super::CoffHeader).
#[derive(Clone, Copy, Eq, PartialEq, Hash)]
#[repr(transparent)]
pub struct CoffCharacteristics(u16);

bitflags! {
    impl CoffCharacteristics: u16 {
        /// Image only. The file does not contain base relocations and must therefore be loaded at
        /// its preferred base address.
        const RELOCS_STRIPPED = 1;

        /// Image only. The image file is valid and can be run.
        const EXECUTABLE_IMAGE = 1 << 1;

        /// COFF line numbers have been removed. Deprecated and should be zero.
        const LINE_NUMS_STRIPPED = 1 << 2;

        /// COFF symbol table entries for local symbols have been removed. Deprecated and should
        /// be zero.
        const LOCAL_SYMS_STRIPPED = 1 << 3;

        /// Obsolete. Aggressively trim working set.
        const AGGRESSIVE_WS_TRIM = 1 << 4;

        /// Application can handle > 2-GB addresses.
        const LARGE_ADDRESS_AWARE = 1 << 5;

        /// Reserved for future use.
        const RESERVED = 1 << 6;

        /// Little endian. Deprecated and should be zero.
        const BYTES_REVERSED_LO = 1 << 7;

        /// Machine is based on a 32-bit-word architecture.
        const MACHINE_32BIT = 1 << 8;

        /// Debugging information is removed from the image file.
        const DEBUG_STRIPPED = 1 << 9;

        /// If the image is on removable media, fully load it and copy it to the swap file.
        const REMOVABLE_RUN_FROM_SWAP = 1 << 10;

        /// If the image is on network media, fully load it and copy it to the swap file.
        const NET_RUN_FROM_SWAP = 1 << 11;

        /// The image file is a system file, not a user program.
        const SYSTEM = 1 << 12;

        /// The image file is a dynamic-link library (DLL).
        const DLL = 1 << 13;

        /// The file should be run only on a uniprocessor machine.
        const UP_SYSTEM_ONLY = 1 << 14;

        /// Big endian. Deprecated and should be zero.
        const BYTES_REVERSED_HI = 1 << 15;
    }
}

impl fmt::Debug for CoffCharacteristics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            f.write_fmt(format_args!("{:#x}", <u16 as Bits>::EMPTY))
        } else {
            fmt::Display::fmt(self, f)
        }
    }
}

impl fmt::Display for CoffCharacteristics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        bitflags::parser::to_writer(self, f)
    }
}

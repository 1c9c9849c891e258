use std::fmt;

use bon::bon;
use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout, LittleEndian, U16, U32};

use crate::coff::name::{self, NAME_SIZE};

/// In `winnt.h`, it's `IMAGE_SECTION_HEADER`. One 40-byte row of the section table.
#[doc(alias("IMAGE_SECTION_HEADER"))]
#[derive(Copy, Clone, Eq, PartialEq, Hash, FromBytes, IntoBytes, Immutable, KnownLayout)]
#[repr(C)]
pub struct SectionHeader {
    #[doc(alias("Name"))]
    name: [u8; NAME_SIZE],

    #[doc(alias("VirtualSize"))]
    virtual_size: U32<LittleEndian>,

    #[doc(alias("VirtualAddress"))]
    virtual_address: U32<LittleEndian>,

    #[doc(alias("SizeOfRawData"))]
    size_of_raw_data: U32<LittleEndian>,

    #[doc(alias("PointerToRawData"))]
    pointer_to_raw_data: U32<LittleEndian>,

    #[doc(alias("PointerToRelocations"))]
    pointer_to_relocations: U32<LittleEndian>,

    #[doc(alias("PointerToLinenumbers"))]
    pointer_to_line_numbers: U32<LittleEndian>,

    #[doc(alias("NumberOfRelocations"))]
    number_of_relocations: U16<LittleEndian>,

    #[doc(alias("NumberOfLinenumbers"))]
    number_of_line_numbers: U16<LittleEndian>,

    #[doc(alias("Characteristics"))]
    characteristics: U32<LittleEndian>,
}

#[bon]
impl SectionHeader {
    /// Builds a section header record. The name field is taken as is; use
    /// [`name::inline`] or [`name::section_long_name`] to encode it.
    #[builder]
    pub fn new(
        #[builder(default)] name: [u8; NAME_SIZE],
        #[builder(default)] virtual_size: u32,
        #[builder(default)] virtual_address: u32,
        #[builder(default)] size_of_raw_data: u32,
        #[builder(default)] pointer_to_raw_data: u32,
        #[builder(default)] pointer_to_relocations: u32,
        #[builder(default)] pointer_to_line_numbers: u32,
        #[builder(default)] number_of_relocations: u16,
        #[builder(default)] number_of_line_numbers: u16,
        #[builder(default)] characteristics: u32,
    ) -> Self {
        Self {
            name,
            virtual_size: U32::new(virtual_size),
            virtual_address: U32::new(virtual_address),
            size_of_raw_data: U32::new(size_of_raw_data),
            pointer_to_raw_data: U32::new(pointer_to_raw_data),
            pointer_to_relocations: U32::new(pointer_to_relocations),
            pointer_to_line_numbers: U32::new(pointer_to_line_numbers),
            number_of_relocations: U16::new(number_of_relocations),
            number_of_line_numbers: U16::new(number_of_line_numbers),
            characteristics: U32::new(characteristics),
        }
    }
}

impl SectionHeader {
    pub const SIZE: usize = size_of::<Self>();

    /// The undecoded name field. See [`NameRef::section`](crate::coff::name::NameRef::section).
    #[inline]
    pub const fn raw_name(&self) -> &[u8; NAME_SIZE] {
        &self.name
    }

    #[inline]
    pub const fn virtual_size(&self) -> u32 {
        self.virtual_size.get()
    }

    #[inline]
    pub const fn virtual_address(&self) -> u32 {
        self.virtual_address.get()
    }

    #[inline]
    pub const fn size_of_raw_data(&self) -> u32 {
        self.size_of_raw_data.get()
    }

    #[inline]
    pub const fn pointer_to_raw_data(&self) -> u32 {
        self.pointer_to_raw_data.get()
    }

    #[inline]
    pub const fn pointer_to_relocations(&self) -> u32 {
        self.pointer_to_relocations.get()
    }

    #[inline]
    pub const fn pointer_to_line_numbers(&self) -> u32 {
        self.pointer_to_line_numbers.get()
    }

    /// The 16-bit relocation count as stored. See
    /// [`Section::number_of_relocations`](super::Section::number_of_relocations) for the decoded
    /// count.
    #[inline]
    pub const fn number_of_relocations(&self) -> u16 {
        self.number_of_relocations.get()
    }

    #[inline]
    pub const fn number_of_line_numbers(&self) -> u16 {
        self.number_of_line_numbers.get()
    }

    /// The whole characteristics word, alignment nibble included.
    #[inline]
    pub const fn characteristics(&self) -> u32 {
        self.characteristics.get()
    }
}

impl fmt::Debug for SectionHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SectionHeader")
            .field("Name", &name::to_string(self.raw_name()))
            .field("VirtualSize", &self.virtual_size())
            .field("VirtualAddress", &self.virtual_address())
            .field("SizeOfRawData", &self.size_of_raw_data())
            .field("PointerToRawData", &self.pointer_to_raw_data())
            .field("PointerToRelocations", &self.pointer_to_relocations())
            .field("PointerToLinenumbers", &self.pointer_to_line_numbers())
            .field("NumberOfRelocations", &self.number_of_relocations())
            .field("NumberOfLinenumbers", &self.number_of_line_numbers())
            .field("Characteristics", &format_args!("{:#010X}", self.characteristics()))
            .finish()
    }
}

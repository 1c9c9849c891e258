use bon::bon;
use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout, LittleEndian, U16, U32};

use super::{CoffCharacteristics, Machine};
use crate::coff::SYMBOL_SIZE;

/// In `winnt.h`, it's `IMAGE_FILE_HEADER`. The COFF file header.
///
/// ## Position in an object file
///
/// The header is the first 20 bytes of the file. It is followed by an optional header of
/// [`size_of_optional_header`](Self::size_of_optional_header) bytes (normally none in object
/// files) and then the section table.
#[doc(alias("IMAGE_FILE_HEADER"))]
#[derive(Clone, Copy, Debug, Eq, PartialEq, FromBytes, IntoBytes, KnownLayout, Immutable)]
#[repr(C)]
pub struct CoffHeader {
    #[doc(alias("Machine"))]
    machine: U16<LittleEndian>,

    #[doc(alias("NumberOfSections"))]
    number_of_sections: U16<LittleEndian>,

    #[doc(alias("TimeDateStamp"))]
    time_date_stamp: U32<LittleEndian>,

    #[doc(alias("PointerToSymbolTable"))]
    pointer_to_symbol_table: U32<LittleEndian>,

    #[doc(alias("NumberOfSymbols"))]
    number_of_symbols: U32<LittleEndian>,

    #[doc(alias("SizeOfOptionalHeader"))]
    size_of_optional_header: U16<LittleEndian>,

    #[doc(alias("Characteristics"))]
    characteristics: U16<LittleEndian>,
}

#[bon]
impl CoffHeader {
    /// Builds a header record. Every field the caller does not set is zero.
    #[builder]
    pub fn new(
        #[builder(default = Machine::Unknown as u16)] machine: u16,
        #[builder(default)] number_of_sections: u16,
        #[builder(default)] time_date_stamp: u32,
        #[builder(default)] pointer_to_symbol_table: u32,
        #[builder(default)] number_of_symbols: u32,
        #[builder(default)] size_of_optional_header: u16,
        #[builder(default = CoffCharacteristics::empty())] characteristics: CoffCharacteristics,
    ) -> Self {
        Self {
            machine: U16::new(machine),
            number_of_sections: U16::new(number_of_sections),
            time_date_stamp: U32::new(time_date_stamp),
            pointer_to_symbol_table: U32::new(pointer_to_symbol_table),
            number_of_symbols: U32::new(number_of_symbols),
            size_of_optional_header: U16::new(size_of_optional_header),
            characteristics: U16::new(characteristics.bits()),
        }
    }
}

impl CoffHeader {
    /// The size of the header record in bytes.
    pub const SIZE: usize = size_of::<Self>();

    /// The architecture type of the computer. Use [`Machine::from_repr`] to interpret it; any
    /// other value may also appear.
    #[inline]
    pub const fn machine(&self) -> u16 {
        self.machine.get()
    }

    /// The number of sections. This indicates the size of the section table, which immediately
    /// follows the headers.
    #[inline]
    pub const fn number_of_sections(&self) -> u16 {
        self.number_of_sections.get()
    }

    /// The low 32 bits of the number of seconds since the Unix epoch at which the file was
    /// created.
    #[inline]
    pub const fn time_date_stamp(&self) -> u32 {
        self.time_date_stamp.get()
    }

    /// The file offset of the symbol table, or zero if no symbol table is present.
    #[inline]
    pub const fn pointer_to_symbol_table(&self) -> u32 {
        self.pointer_to_symbol_table.get()
    }

    /// The number of 18-byte slots in the symbol table, aux slots included.
    #[inline]
    pub const fn number_of_symbols(&self) -> u32 {
        self.number_of_symbols.get()
    }

    /// The size of the optional header, in bytes. This value should be zero for object files.
    #[inline]
    pub const fn size_of_optional_header(&self) -> u16 {
        self.size_of_optional_header.get()
    }

    #[inline]
    pub const fn characteristics(&self) -> CoffCharacteristics {
        CoffCharacteristics::from_bits_retain(self.characteristics.get())
    }

    /// The file offset of the first section header.
    #[inline]
    pub const fn section_table_offset(&self) -> usize {
        Self::SIZE + self.size_of_optional_header() as usize
    }

    /// The file offset of the string table, which immediately follows the symbol table.
    ///
    /// Returns [`None`] if the offset overflows.
    pub fn string_table_offset(&self) -> Option<usize> {
        (self.number_of_symbols() as usize)
            .checked_mul(SYMBOL_SIZE)?
            .checked_add(self.pointer_to_symbol_table() as usize)
    }
}

#[cfg(test)]
mod tests {
    use zerocopy::{FromBytes, IntoBytes};

    use super::CoffHeader;
    use crate::coff::{CoffCharacteristics, Machine};

    #[test]
    fn layout() {
        assert_eq!(CoffHeader::SIZE, 20);

        let header = CoffHeader::builder()
            .machine(Machine::Amd64 as u16)
            .number_of_sections(2)
            .time_date_stamp(0x0102_0304)
            .pointer_to_symbol_table(0x100)
            .number_of_symbols(7)
            .characteristics(CoffCharacteristics::LARGE_ADDRESS_AWARE)
            .build();

        assert_eq!(
            header.as_bytes(),
            [
                0x64, 0x86, // Machine
                0x02, 0x00, // NumberOfSections
                0x04, 0x03, 0x02, 0x01, // TimeDateStamp
                0x00, 0x01, 0x00, 0x00, // PointerToSymbolTable
                0x07, 0x00, 0x00, 0x00, // NumberOfSymbols
                0x00, 0x00, // SizeOfOptionalHeader
                0x20, 0x00, // Characteristics
            ]
        );
        assert_eq!(CoffHeader::read_from_bytes(header.as_bytes()).ok(), Some(header));
    }

    #[test]
    fn derived_offsets() {
        let header = CoffHeader::builder()
            .size_of_optional_header(0xE0)
            .pointer_to_symbol_table(0x400)
            .number_of_symbols(3)
            .build();

        assert_eq!(header.section_table_offset(), 20 + 0xE0);
        assert_eq!(header.string_table_offset(), Some(0x400 + 3 * 18));
    }

    #[test]
    fn defaults_are_zero() {
        assert_eq!(CoffHeader::builder().build().as_bytes(), [0; 20]);
    }
}

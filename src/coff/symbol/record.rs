use std::fmt;

use bon::bon;
use zerocopy::{FromBytes, I16, Immutable, IntoBytes, KnownLayout, LittleEndian, U16, U32};

use crate::coff::name::{self, NAME_SIZE};

/// In `winnt.h`, it's `IMAGE_SYMBOL`. One 18-byte slot of the symbol table.
///
/// Aux slots share the size but not the layout; their bytes only mean something relative to
/// the symbol that owns them.
#[doc(alias("IMAGE_SYMBOL"))]
#[derive(Copy, Clone, Eq, PartialEq, Hash, FromBytes, IntoBytes, Immutable, KnownLayout)]
#[repr(C)]
pub struct SymbolRecord {
    #[doc(alias("ShortName", "LongName"))]
    name: [u8; NAME_SIZE],

    #[doc(alias("Value"))]
    value: U32<LittleEndian>,

    #[doc(alias("SectionNumber"))]
    section_number: I16<LittleEndian>,

    #[doc(alias("Type"))]
    symbol_type: U16<LittleEndian>,

    #[doc(alias("StorageClass"))]
    storage_class: u8,

    #[doc(alias("NumberOfAuxSymbols"))]
    number_of_aux_symbols: u8,
}

#[bon]
impl SymbolRecord {
    /// Builds a symbol record. The name field is taken as is; use [`name::inline`] or
    /// [`name::symbol_long_name`] to encode it.
    #[builder]
    pub fn new(
        #[builder(default)] name: [u8; NAME_SIZE],
        #[builder(default)] value: u32,
        #[builder(default)] section_number: i16,
        #[builder(default)] symbol_type: u16,
        #[builder(default)] storage_class: u8,
        #[builder(default)] number_of_aux_symbols: u8,
    ) -> Self {
        Self {
            name,
            value: U32::new(value),
            section_number: I16::new(section_number),
            symbol_type: U16::new(symbol_type),
            storage_class,
            number_of_aux_symbols,
        }
    }
}

impl SymbolRecord {
    pub const SIZE: usize = size_of::<Self>();

    /// The undecoded name field. See [`NameRef::symbol`](crate::coff::name::NameRef::symbol).
    #[inline]
    pub const fn raw_name(&self) -> &[u8; NAME_SIZE] {
        &self.name
    }

    #[inline]
    pub const fn value(&self) -> u32 {
        self.value.get()
    }

    #[inline]
    pub const fn section_number(&self) -> i16 {
        self.section_number.get()
    }

    #[inline]
    pub const fn symbol_type(&self) -> u16 {
        self.symbol_type.get()
    }

    #[inline]
    pub const fn storage_class(&self) -> u8 {
        self.storage_class
    }

    #[inline]
    pub const fn number_of_aux_symbols(&self) -> u8 {
        self.number_of_aux_symbols
    }
}

impl fmt::Debug for SymbolRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SymbolRecord")
            .field("Name", &name::to_string(self.raw_name()))
            .field("Value", &self.value())
            .field("SectionNumber", &self.section_number())
            .field("Type", &format_args!("{:#06X}", self.symbol_type()))
            .field("StorageClass", &self.storage_class())
            .field("NumberOfAuxSymbols", &self.number_of_aux_symbols())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use zerocopy::IntoBytes;

    use super::SymbolRecord;
    use crate::coff::name;

    #[test]
    fn layout() {
        assert_eq!(SymbolRecord::SIZE, 18);

        let record = SymbolRecord::builder()
            .name(name::symbol_long_name(0x1234))
            .value(0x10)
            .section_number(-2)
            .symbol_type(0x20)
            .storage_class(2)
            .number_of_aux_symbols(1)
            .build();

        assert_eq!(
            record.as_bytes(),
            [
                0, 0, 0, 0, 0x34, 0x12, 0, 0, // Name
                0x10, 0, 0, 0, // Value
                0xFE, 0xFF, // SectionNumber
                0x20, 0x00, // Type
                0x02, // StorageClass
                0x01, // NumberOfAuxSymbols
            ]
        );
        assert_eq!(record.section_number(), -2);
    }
}

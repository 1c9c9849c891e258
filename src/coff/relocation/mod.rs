mod kind;

use std::fmt;

use bon::bon;
pub use kind::{Amd64RelocationType, I386RelocationType};
use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout, LittleEndian, U16, U32};

/// In `winnt.h`, it's `IMAGE_RELOCATION`. A 10-byte fix-up record of a section.
///
/// The symbol it refers to is not resolved when the file is decoded; use
/// [`Coff::relocation_target`](crate::coff::Coff::relocation_target).
#[doc(alias("IMAGE_RELOCATION"))]
#[derive(Copy, Clone, Eq, PartialEq, Hash, FromBytes, IntoBytes, Immutable, KnownLayout)]
#[repr(C)]
pub struct Relocation {
    #[doc(alias("VirtualAddress"))]
    virtual_address: U32<LittleEndian>,

    #[doc(alias("SymbolTableIndex"))]
    symbol_table_index: U32<LittleEndian>,

    #[doc(alias("Type"))]
    kind: U16<LittleEndian>,
}

#[bon]
impl Relocation {
    #[builder]
    pub fn new(
        #[builder(default)] virtual_address: u32,
        #[builder(default)] symbol_table_index: u32,
        #[builder(default)] kind: u16,
    ) -> Self {
        Self {
            virtual_address: U32::new(virtual_address),
            symbol_table_index: U32::new(symbol_table_index),
            kind: U16::new(kind),
        }
    }
}

impl Relocation {
    pub const SIZE: usize = size_of::<Self>();

    /// The offset of the item to which the relocation is applied, relative to the start of the
    /// section in an object file.
    ///
    /// In the first record of a section with extended relocations, this is the real relocation
    /// count instead.
    #[inline]
    pub const fn virtual_address(&self) -> u32 {
        self.virtual_address.get()
    }

    /// A zero-based index into the symbol table, aux slots included.
    #[inline]
    pub const fn symbol_table_index(&self) -> u32 {
        self.symbol_table_index.get()
    }

    /// The machine specific relocation type, such as [`Amd64RelocationType`] or
    /// [`I386RelocationType`].
    #[inline]
    pub const fn kind(&self) -> u16 {
        self.kind.get()
    }
}

impl fmt::Debug for Relocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Relocation")
            .field("VirtualAddress", &format_args!("{:#X}", self.virtual_address()))
            .field("SymbolTableIndex", &self.symbol_table_index())
            .field("Type", &format_args!("{:#06X}", self.kind()))
            .finish()
    }
}

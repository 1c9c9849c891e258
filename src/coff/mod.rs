//! Decoding of COFF object files into an entity graph.
//!
//! [`Coff::parse`] validates every offset it follows against the input, so any byte slice can be
//! passed to it. The input is copied once into shared storage. Sections and symbols hold ranges
//! into that copy, so the decoded [`Coff`] does not borrow the input and its size stays in
//! proportion to it however many names or sections overlap.

mod blob;
mod error;
mod header;
pub mod name;
mod relocation;
mod section;
mod string_table;
mod symbol;

use std::fmt;

use blob::Blob;
pub use error::CoffError;
pub use header::{CoffCharacteristics, CoffHeader, Machine};
pub use relocation::{Amd64RelocationType, I386RelocationType, Relocation};
pub use section::{RawData, Section, SectionAlignment, SectionCharacteristics, SectionHeader};
pub use string_table::StringTable;
pub use symbol::{
    SectionNumber, StorageClass, Symbol, SymbolBaseType, SymbolDerivedType, SymbolRecord, Symbols,
};
use tracing::{debug, trace, warn};
use zerocopy::FromBytes;

use crate::read::ReadRecordExt;

pub const HEADER_SIZE: usize = CoffHeader::SIZE;
pub const SECTION_SIZE: usize = SectionHeader::SIZE;
pub const RELOCATION_SIZE: usize = Relocation::SIZE;
pub const SYMBOL_SIZE: usize = SymbolRecord::SIZE;

/// A decoded COFF file.
#[derive(Clone, Eq, PartialEq)]
pub struct Coff {
    header: CoffHeader,
    sections: Vec<Section>,
    symbols: Vec<Symbol>,
}

impl Coff {
    /// Decodes the header, the section table with each section's data and relocations, and the
    /// symbol table with resolved names.
    ///
    /// # Errors
    ///
    /// Returns [`CoffError::MalformedFormat`] if any record, table or name lies outside `bytes`,
    /// and [`CoffError::InvalidLongName`] if a section's long name offset does not parse.
    pub fn parse(bytes: &[u8]) -> Result<Self, CoffError> {
        let header = bytes.record_at::<CoffHeader>("file header", 0)?;

        debug!(?header);

        let string_table_offset =
            header
                .string_table_offset()
                .ok_or(CoffError::MalformedFormat {
                    what: "symbol table",
                    offset: header.pointer_to_symbol_table() as usize,
                    length: usize::MAX,
                    size: bytes.len(),
                })?;

        let blob = Blob::from(bytes);
        let strings = StringTable::new(&blob, string_table_offset);

        Ok(Self {
            sections: read_sections(&blob, &header, &strings)?,
            symbols: read_symbols(&blob, &header, &strings)?,
            header,
        })
    }

    #[inline]
    pub const fn header(&self) -> &CoffHeader {
        &self.header
    }

    /// The machine type, if it is one this crate knows about.
    #[inline]
    pub const fn machine(&self) -> Option<Machine> {
        Machine::from_repr(self.header.machine())
    }

    #[inline]
    pub fn number_of_sections(&self) -> usize {
        self.sections.len()
    }

    /// Returns the section at the one-based `index`.
    ///
    /// # Errors
    ///
    /// Returns [`CoffError::IndexOutOfRange`] unless `index` is in `1..=number_of_sections()`.
    pub fn section(&self, index: usize) -> Result<&Section, CoffError> {
        index
            .checked_sub(1)
            .and_then(|index| self.sections.get(index))
            .ok_or_else(|| {
                CoffError::index_out_of_range("section", index, 1, self.sections.len())
            })
    }

    /// Iterates over the sections along with their one-based index.
    pub fn sections(
        &self,
    ) -> impl ExactSizeIterator<Item = (usize, &Section)> + DoubleEndedIterator + Clone {
        self.sections
            .iter()
            .enumerate()
            .map(|(index, section)| (index + 1, section))
    }

    /// Returns the first section called `name`.
    pub fn find_section(&self, name: &str) -> Option<&Section> {
        self.sections
            .iter()
            .find(|section| section.name_bytes() == name.as_bytes())
    }

    /// The number of slots in the symbol table, aux slots included.
    #[inline]
    pub fn number_of_symbols(&self) -> usize {
        self.symbols.len()
    }

    /// Returns the slot at the zero-based `index`, which may be an aux slot.
    ///
    /// # Errors
    ///
    /// Returns [`CoffError::IndexOutOfRange`] unless `index` is in `0..number_of_symbols()`.
    pub fn symbol(&self, index: usize) -> Result<&Symbol, CoffError> {
        self.symbols
            .get(index)
            .ok_or_else(|| CoffError::index_out_of_range("symbol", index, 0, self.symbols.len()))
    }

    /// Iterates over the symbols that are not aux slots, along with their table index.
    #[inline]
    pub fn symbols(&self) -> Symbols<'_> {
        Symbols::new(&self.symbols)
    }

    /// Every slot of the symbol table in order, aux slots included.
    #[inline]
    pub fn symbol_table(&self) -> &[Symbol] {
        &self.symbols
    }

    /// Returns the aux slots that follow the symbol at `index`. The slice is cut short if the
    /// symbol's aux count runs past the end of the table, and is empty if `index` is itself an
    /// aux slot.
    ///
    /// # Errors
    ///
    /// Returns [`CoffError::IndexOutOfRange`] unless `index` is in `0..number_of_symbols()`.
    pub fn aux_records(&self, index: usize) -> Result<&[Symbol], CoffError> {
        let symbol = self.symbol(index)?;
        if symbol.is_aux() {
            return Ok(&[]);
        }

        let count = usize::from(symbol.number_of_aux_symbols());
        let start = index + 1;
        let end = start.saturating_add(count).min(self.symbols.len());
        Ok(&self.symbols[start..end])
    }

    /// Returns the first symbol called `name`, skipping aux slots.
    pub fn find_symbol(&self, name: &str) -> Option<&Symbol> {
        self.symbols()
            .map(|(_, symbol)| symbol)
            .find(|symbol| symbol.name_bytes() == name.as_bytes())
    }

    /// Looks up the symbol a relocation refers to.
    ///
    /// # Errors
    ///
    /// Returns [`CoffError::IndexOutOfRange`] if the relocation's symbol index is past the end
    /// of the symbol table.
    pub fn relocation_target(&self, relocation: &Relocation) -> Result<&Symbol, CoffError> {
        self.symbol(relocation.symbol_table_index() as usize)
    }
}

impl fmt::Debug for Coff {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Coff")
            .field("header", &self.header)
            .field("sections", &self.sections)
            .field("symbols", &self.symbols.len())
            .finish()
    }
}

fn read_sections(
    blob: &Blob,
    header: &CoffHeader,
    strings: &StringTable,
) -> Result<Vec<Section>, CoffError> {
    let offset = header.section_table_offset();
    let count = usize::from(header.number_of_sections());

    debug!(offset, count, "Reading section table");

    blob.bytes_at("section table", offset, count * SECTION_SIZE)?;

    (0..count)
        .map(|index| Section::read_from(blob, offset + index * SECTION_SIZE, strings))
        .collect()
}

fn read_symbols(
    blob: &Blob,
    header: &CoffHeader,
    strings: &StringTable,
) -> Result<Vec<Symbol>, CoffError> {
    let offset = header.pointer_to_symbol_table() as usize;
    let count = header.number_of_symbols() as usize;

    debug!(offset, count, strings = strings.start(), "Reading symbol table");

    if count == 0 {
        return Ok(Vec::new());
    }

    let length = count
        .checked_mul(SYMBOL_SIZE)
        .ok_or(CoffError::MalformedFormat {
            what: "symbol table",
            offset,
            length: usize::MAX,
            size: blob.len(),
        })?;

    let table = blob.bytes_at("symbol table", offset, length)?;
    let records = <[SymbolRecord]>::ref_from_bytes(table).map_err(|_| {
        CoffError::MalformedFormat {
            what: "symbol table",
            offset,
            length,
            size: blob.len(),
        }
    })?;

    let mut symbols = Vec::with_capacity(count);
    let mut aux_remaining = 0usize;

    for (index, record) in records.iter().enumerate() {
        let aux = aux_remaining > 0;
        if aux {
            aux_remaining -= 1;
        } else {
            aux_remaining = usize::from(record.number_of_aux_symbols());
            if index + aux_remaining >= count {
                warn!(
                    index,
                    aux = aux_remaining,
                    count,
                    "Symbol aux records run past the end of the symbol table"
                );
            }
        }

        let symbol = Symbol::read_from(blob, offset + index * SYMBOL_SIZE, aux, strings)?;
        trace!(index, name = %symbol.name(), aux, "Read symbol");
        symbols.push(symbol);
    }

    Ok(symbols)
}

mod record;
mod section_number;
mod storage_class;
mod symbol_type;

use std::{borrow::Cow, iter::FusedIterator, ops::Range};

pub use record::SymbolRecord;
pub use section_number::SectionNumber;
pub use storage_class::StorageClass;
pub use symbol_type::{SymbolBaseType, SymbolDerivedType};

use crate::{
    coff::{CoffError, StringTable, blob::Blob, name::NameRef},
    read::ReadRecordExt,
};

/// A decoded slot of the symbol table.
///
/// Aux slots are decoded too, so that indices stay aligned with the table; their fields are
/// continuation data of the preceding symbol and only [`record`](Self::record) is meaningful.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Symbol {
    blob: Blob,
    name: Range<usize>,
    record: SymbolRecord,
    aux: bool,
}

impl Symbol {
    const TYPE_MASK: u16 = 0xF;
    const TYPE_SHIFT: u16 = 4;

    /// Decodes the slot at `offset` in `blob` and resolves its name. An aux slot whose name
    /// bytes do not resolve gets an empty name, since aux bytes are not a name.
    pub(crate) fn read_from(
        blob: &Blob,
        offset: usize,
        aux: bool,
        strings: &StringTable,
    ) -> Result<Self, CoffError> {
        let record = blob.record_at::<SymbolRecord>("symbol", offset)?;

        let name = match NameRef::symbol(record.raw_name()) {
            NameRef::Inline(bytes) => offset..offset + bytes.len(),
            NameRef::StringTable(string) => match strings.range(string) {
                Ok(range) => range,
                Err(_) if aux => 0..0,
                Err(error) => return Err(error),
            },
        };

        Ok(Self {
            blob: blob.clone(),
            name,
            record,
            aux,
        })
    }

    /// The resolved name. Invalid UTF-8 is replaced.
    #[inline]
    pub fn name(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(self.name_bytes())
    }

    /// The bytes of the resolved name, without padding or terminator.
    #[inline]
    pub fn name_bytes(&self) -> &[u8] {
        self.blob.slice(&self.name)
    }

    #[inline]
    pub const fn record(&self) -> &SymbolRecord {
        &self.record
    }

    /// Whether this slot is an aux record of a preceding symbol.
    #[inline]
    pub const fn is_aux(&self) -> bool {
        self.aux
    }

    #[inline]
    pub const fn value(&self) -> u32 {
        self.record.value()
    }

    /// The signed section number as stored. See [`section_reference`](Self::section_reference).
    #[inline]
    pub const fn section_number(&self) -> i16 {
        self.record.section_number()
    }

    #[inline]
    pub fn section_reference(&self) -> SectionNumber {
        SectionNumber::from(self.section_number())
    }

    #[inline]
    pub const fn symbol_type(&self) -> u16 {
        self.record.symbol_type()
    }

    /// The low nibble of the type. See [`SymbolBaseType`].
    #[inline]
    pub const fn base_type(&self) -> u16 {
        self.symbol_type() & Self::TYPE_MASK
    }

    /// The type above the base nibble. See [`SymbolDerivedType`].
    #[inline]
    pub const fn derived_type(&self) -> u16 {
        self.symbol_type() >> Self::TYPE_SHIFT
    }

    /// Whether the derived type marks this symbol as a function.
    #[inline]
    pub fn is_function(&self) -> bool {
        SymbolDerivedType::from_repr(self.derived_type()) == Some(SymbolDerivedType::Function)
    }

    /// The raw storage class. See [`StorageClass`].
    #[inline]
    pub const fn storage_class(&self) -> u8 {
        self.record.storage_class()
    }

    #[inline]
    pub const fn number_of_aux_symbols(&self) -> u8 {
        self.record.number_of_aux_symbols()
    }
}

/// An iterator over the symbols of a table that skips aux slots.
///
/// Yields the raw table index along with each symbol, starting at 0 and advancing by one plus
/// the aux count of the symbol just yielded.
#[derive(Clone, Debug)]
pub struct Symbols<'coff> {
    table: &'coff [Symbol],
    index: usize,
}

impl<'coff> Symbols<'coff> {
    pub(crate) const fn new(table: &'coff [Symbol]) -> Self {
        Self { table, index: 0 }
    }
}

impl<'coff> Iterator for Symbols<'coff> {
    type Item = (usize, &'coff Symbol);

    fn next(&mut self) -> Option<Self::Item> {
        let index = self.index;
        let symbol = self.table.get(index)?;
        self.index = index
            .saturating_add(1)
            .saturating_add(usize::from(symbol.number_of_aux_symbols()));
        Some((index, symbol))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.table.len().saturating_sub(self.index);
        (remaining.min(1), Some(remaining))
    }
}

impl FusedIterator for Symbols<'_> {}

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use zerocopy::IntoBytes;

    use super::{SectionNumber, StorageClass, Symbol, SymbolRecord, Symbols};
    use crate::coff::{CoffError, StringTable, blob::Blob, name};

    /// Decodes `record` from a blob holding only that record, followed by `strings`.
    fn decode(record: SymbolRecord, aux: bool, strings: &[u8]) -> Result<Symbol, CoffError> {
        let mut bytes = record.as_bytes().to_vec();
        bytes.extend_from_slice(strings);
        let blob = Blob::from(bytes.as_slice());
        Symbol::read_from(&blob, 0, aux, &StringTable::new(&blob, SymbolRecord::SIZE))
    }

    fn symbol(name: &str, aux: u8) -> Symbol {
        let record = SymbolRecord::builder()
            .name(name::inline(name).unwrap())
            .number_of_aux_symbols(aux)
            .build();
        decode(record, false, &[]).unwrap()
    }

    fn aux() -> Symbol {
        decode(SymbolRecord::builder().build(), true, &[]).unwrap()
    }

    #[test]
    fn decodes_fields() {
        let record = SymbolRecord::builder()
            .name(*b"main\0\0\0\0")
            .value(0x40)
            .section_number(1)
            .symbol_type(0x20)
            .storage_class(StorageClass::External as u8)
            .build();
        let symbol = decode(record, false, &[]).unwrap();

        assert_eq!(symbol.name(), "main");
        assert_eq!(symbol.value(), 0x40);
        assert_eq!(symbol.section_reference(), SectionNumber::Index(1));
        assert_eq!(symbol.base_type(), 0);
        assert_eq!(symbol.derived_type(), 2);
        assert!(symbol.is_function());
        assert_eq!(
            StorageClass::from_repr(symbol.storage_class()),
            Some(StorageClass::External)
        );
        assert!(!symbol.is_aux());
    }

    #[test]
    fn long_name() {
        let record = SymbolRecord::builder()
            .name(name::symbol_long_name(4))
            .build();

        let symbol = decode(record, false, b"\x10\0\0\0long_symbol\0").unwrap();

        assert_eq!(symbol.name(), "long_symbol");
    }

    #[test]
    fn unresolvable_name() {
        let record = SymbolRecord::builder()
            .name(name::symbol_long_name(0x100))
            .build();

        assert!(matches!(
            decode(record, false, &[]),
            Err(CoffError::MalformedFormat { .. })
        ));

        let aux = decode(record, true, &[]).unwrap();
        assert_eq!(aux.name(), "");
        assert!(aux.is_aux());
    }

    #[test]
    fn invalid_utf8_is_replaced() {
        let record = SymbolRecord::builder().name(*b"ab\xFFc\0\0\0\0").build();
        let symbol = decode(record, false, &[]).unwrap();

        assert_eq!(symbol.name_bytes(), b"ab\xFFc");
        assert_eq!(symbol.name(), "ab\u{FFFD}c");
    }

    #[rstest]
    fn aux_slots_are_skipped(#[values(0, 1, 2, 5)] count: u8) {
        let mut table = vec![symbol(".file", count)];
        table.extend((0..count).map(|_| aux()));
        table.push(symbol("next", 0));

        let indices = Symbols::new(&table)
            .map(|(index, _)| index)
            .collect::<Vec<_>>();

        assert_eq!(indices, [0, 1 + usize::from(count)]);
    }

    #[test]
    fn aux_count_past_end_stops() {
        let table = [symbol("a", 0), symbol("b", 200), aux()];
        let mut symbols = Symbols::new(&table);

        assert_eq!(symbols.next().map(|(index, _)| index), Some(0));
        assert_eq!(symbols.next().map(|(index, _)| index), Some(1));
        assert_eq!(symbols.next(), None);
        assert_eq!(symbols.next(), None);
    }

    #[test]
    fn restartable() {
        let table = [symbol("a", 1), aux(), symbol("b", 0)];
        let symbols = Symbols::new(&table);

        let first = symbols.clone().map(|(_, symbol)| symbol.name()).collect::<Vec<_>>();
        let second = symbols.map(|(_, symbol)| symbol.name()).collect::<Vec<_>>();

        assert_eq!(first, ["a", "b"]);
        assert_eq!(first, second);
    }
}

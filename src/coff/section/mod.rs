mod alignment;
mod characteristics;
mod header;
mod raw_data;

use std::{borrow::Cow, fmt, ops::Range};

pub use alignment::SectionAlignment;
pub use characteristics::SectionCharacteristics;
pub use header::SectionHeader;
pub use raw_data::RawData;
use tracing::trace;
use zerocopy::FromBytes;

use crate::{
    coff::{CoffError, Relocation, StringTable, blob::Blob, name::NameRef},
    read::ReadRecordExt,
};

/// A decoded section: its header, resolved name, initialized data and relocations.
///
/// The name, data and relocations are views into the decoded file's bytes rather than copies.
#[derive(Clone, Eq, PartialEq)]
pub struct Section {
    blob: Blob,
    name: Range<usize>,
    header: SectionHeader,
    raw_data: Option<RawData>,
    relocations: Range<usize>,
}

impl Section {
    /// Decodes the section header at `offset` in `blob` along with everything it points to.
    pub(crate) fn read_from(
        blob: &Blob,
        offset: usize,
        strings: &StringTable,
    ) -> Result<Self, CoffError> {
        let header = blob.record_at::<SectionHeader>("section header", offset)?;

        let name = match NameRef::section(header.raw_name())? {
            NameRef::Inline(bytes) => offset..offset + bytes.len(),
            NameRef::StringTable(string) => strings.range(string)?,
        };

        trace!(name = %String::from_utf8_lossy(blob.slice(&name)), offset, "Reading section");

        let raw_data = match header.pointer_to_raw_data() {
            0 => None,
            pointer => {
                let start = pointer as usize;
                let length = header.size_of_raw_data() as usize;
                blob.bytes_at("section raw data", start, length)?;
                Some(RawData::new(blob.clone(), start..start + length))
            }
        };

        Ok(Self {
            relocations: read_relocations(blob, &header)?,
            blob: blob.clone(),
            name,
            header,
            raw_data,
        })
    }

    /// The resolved name. Long names are looked up in the string table; invalid UTF-8 is
    /// replaced.
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
    pub const fn header(&self) -> &SectionHeader {
        &self.header
    }

    #[inline]
    pub const fn virtual_size(&self) -> u32 {
        self.header.virtual_size()
    }

    #[inline]
    pub const fn virtual_address(&self) -> u32 {
        self.header.virtual_address()
    }

    #[inline]
    pub const fn size_of_raw_data(&self) -> u32 {
        self.header.size_of_raw_data()
    }

    #[inline]
    pub const fn pointer_to_raw_data(&self) -> u32 {
        self.header.pointer_to_raw_data()
    }

    #[inline]
    pub const fn pointer_to_relocations(&self) -> u32 {
        self.header.pointer_to_relocations()
    }

    #[inline]
    pub const fn pointer_to_line_numbers(&self) -> u32 {
        self.header.pointer_to_line_numbers()
    }

    /// The number of decoded relocations. This differs from the stored count for sections with
    /// extended relocations.
    #[inline]
    pub fn number_of_relocations(&self) -> usize {
        self.relocation_table().len()
    }

    #[inline]
    pub const fn number_of_line_numbers(&self) -> u16 {
        self.header.number_of_line_numbers()
    }

    /// The section flags, with the alignment nibble masked out.
    #[inline]
    pub const fn characteristics(&self) -> SectionCharacteristics {
        SectionCharacteristics::from_raw(self.header.characteristics())
    }

    /// The characteristics word as stored, alignment nibble included.
    #[inline]
    pub const fn raw_characteristics(&self) -> u32 {
        self.header.characteristics()
    }

    #[inline]
    pub const fn alignment(&self) -> Option<SectionAlignment> {
        SectionAlignment::from_characteristics(self.header.characteristics())
    }

    /// The base-2 logarithm of the alignment, if one is set.
    #[inline]
    pub fn alignment_bit(&self) -> Option<u32> {
        self.alignment().map(SectionAlignment::bit)
    }

    /// The alignment in bytes, if one is set.
    #[inline]
    pub fn alignment_bytes(&self) -> Option<u32> {
        self.alignment().map(SectionAlignment::bytes)
    }

    /// The initialized data of the section, or [`None`] if the section has no file data (such as
    /// `.bss`).
    #[inline]
    pub const fn raw_data(&self) -> Option<&RawData> {
        self.raw_data.as_ref()
    }

    /// Returns the relocation at the zero-based `index`.
    #[inline]
    pub fn relocation(&self, index: usize) -> Option<&Relocation> {
        self.relocation_table().get(index)
    }

    /// Iterates over the relocations along with their zero-based index.
    pub fn relocations(
        &self,
    ) -> impl ExactSizeIterator<Item = (usize, &Relocation)> + DoubleEndedIterator + Clone {
        self.relocation_table().iter().enumerate()
    }

    /// The relocation records, in table order.
    pub fn relocation_table(&self) -> &[Relocation] {
        <[Relocation]>::ref_from_bytes(self.blob.slice(&self.relocations)).unwrap_or(&[])
    }
}

impl fmt::Debug for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Section")
            .field("name", &self.name())
            .field("characteristics", &self.characteristics())
            .field("alignment", &self.alignment())
            .field("raw_data", &self.raw_data)
            .field("relocations", &self.number_of_relocations())
            .finish_non_exhaustive()
    }
}

fn read_relocations(blob: &[u8], header: &SectionHeader) -> Result<Range<usize>, CoffError> {
    let mut offset = header.pointer_to_relocations() as usize;
    let mut count = usize::from(header.number_of_relocations());

    let extended = SectionCharacteristics::from_raw(header.characteristics())
        .contains(SectionCharacteristics::LNK_NRELOC_OVFL);

    if extended && count == usize::from(u16::MAX) {
        // The count includes the record that holds it.
        let first = blob.record_at::<Relocation>("extended relocation count", offset)?;
        count = first.virtual_address().saturating_sub(1) as usize;
        offset += Relocation::SIZE;
    }

    if count == 0 {
        return Ok(0..0);
    }

    let length = count
        .checked_mul(Relocation::SIZE)
        .ok_or(CoffError::MalformedFormat {
            what: "relocation table",
            offset,
            length: usize::MAX,
            size: blob.len(),
        })?;

    blob.bytes_at("relocation table", offset, length)?;

    Ok(offset..offset + length)
}

#[cfg(test)]
mod tests {
    use zerocopy::IntoBytes;

    use super::{Section, SectionAlignment, SectionCharacteristics, SectionHeader};
    use crate::coff::{CoffError, Relocation, StringTable, blob::Blob, name};

    fn read(bytes: &[u8], strings: usize) -> Result<Section, CoffError> {
        let blob = Blob::from(bytes);
        Section::read_from(&blob, 0, &StringTable::new(&blob, strings))
    }

    fn relocation(virtual_address: u32) -> Relocation {
        Relocation::builder()
            .virtual_address(virtual_address)
            .symbol_table_index(1)
            .kind(4)
            .build()
    }

    #[test]
    fn decodes_data_and_relocations() {
        let mut blob = SectionHeader::builder()
            .name(*b".text\0\0\0")
            .size_of_raw_data(3)
            .pointer_to_raw_data(40)
            .pointer_to_relocations(43)
            .number_of_relocations(2)
            .characteristics(0x6050_0020)
            .build()
            .as_bytes()
            .to_vec();
        blob.extend_from_slice(&[0x55, 0x48, 0xC3]);
        blob.extend_from_slice(relocation(0x10).as_bytes());
        blob.extend_from_slice(relocation(0x20).as_bytes());

        let section = read(&blob, blob.len()).unwrap();

        assert_eq!(section.name(), ".text");
        assert_eq!(section.name_bytes(), b".text");
        assert_eq!(
            section.raw_data().map(|data| &**data),
            Some([0x55, 0x48, 0xC3].as_slice())
        );
        assert_eq!(section.number_of_relocations(), 2);
        assert_eq!(section.relocation(1).map(Relocation::virtual_address), Some(0x20));
        assert_eq!(section.relocation(2), None);
        assert_eq!(
            section
                .relocations()
                .map(|(index, relocation)| (index, relocation.virtual_address()))
                .collect::<Vec<_>>(),
            [(0, 0x10), (1, 0x20)]
        );
        assert_eq!(
            section.characteristics(),
            SectionCharacteristics::CNT_CODE
                | SectionCharacteristics::MEM_EXECUTE
                | SectionCharacteristics::MEM_READ
        );
        assert_eq!(section.raw_characteristics(), 0x6050_0020);
        assert_eq!(section.alignment(), Some(SectionAlignment::Align16Bytes));
        assert_eq!(section.alignment_bytes(), Some(16));
        assert_eq!(section.alignment_bit(), Some(4));
    }

    #[test]
    fn no_raw_data_without_pointer() {
        let header = SectionHeader::builder()
            .name(*b".bss\0\0\0\0")
            .size_of_raw_data(0x100)
            .characteristics(SectionCharacteristics::CNT_UNINITIALIZED_DATA.bits())
            .build();

        let section = read(header.as_bytes(), 40).unwrap();

        assert_eq!(section.raw_data(), None);
        assert_eq!(section.alignment(), None);
        assert_eq!(section.relocations().len(), 0);
    }

    #[test]
    fn extended_relocation_count() {
        let mut blob = SectionHeader::builder()
            .name(*b".data\0\0\0")
            .pointer_to_relocations(40)
            .number_of_relocations(u16::MAX)
            .characteristics(SectionCharacteristics::LNK_NRELOC_OVFL.bits())
            .build()
            .as_bytes()
            .to_vec();
        // The placeholder counts itself.
        blob.extend_from_slice(relocation(4).as_bytes());
        for virtual_address in [0x100, 0x200, 0x300] {
            blob.extend_from_slice(relocation(virtual_address).as_bytes());
        }

        let section = read(&blob, blob.len()).unwrap();

        assert_eq!(section.header().number_of_relocations(), u16::MAX);
        assert_eq!(section.number_of_relocations(), 3);
        assert_eq!(section.relocation(0).map(Relocation::virtual_address), Some(0x100));
    }

    #[test]
    fn long_name_resolves_from_string_table() {
        let mut blob = SectionHeader::builder()
            .name(name::section_long_name(4))
            .build()
            .as_bytes()
            .to_vec();
        let strings_start = blob.len();
        blob.extend_from_slice(b"\x15\0\0\0.debug$Symbols\0");

        let section = read(&blob, strings_start).unwrap();

        assert_eq!(section.name(), ".debug$Symbols");
    }

    #[test]
    fn views_share_the_file_bytes() {
        let mut blob = SectionHeader::builder()
            .name(*b".rdata\0\0")
            .size_of_raw_data(8)
            .pointer_to_raw_data(40)
            .build()
            .as_bytes()
            .to_vec();
        blob.extend_from_slice(&[7; 8]);
        let blob = Blob::from(blob.as_slice());
        let strings = StringTable::new(&blob, blob.len());

        let first = Section::read_from(&blob, 0, &strings).unwrap();
        let second = Section::read_from(&blob, 0, &strings).unwrap();

        let (first_data, second_data) = (first.raw_data().unwrap(), second.raw_data().unwrap());
        assert_eq!(first_data.as_ptr(), second_data.as_ptr());
        assert_eq!(first_data.as_ptr(), blob[40..].as_ptr());
        assert_eq!(first.name_bytes().as_ptr(), blob.as_ptr());
    }

    #[test]
    fn raw_data_past_end_is_malformed() {
        let header = SectionHeader::builder()
            .size_of_raw_data(0x10)
            .pointer_to_raw_data(0x20)
            .build();

        assert_eq!(
            read(header.as_bytes(), 40),
            Err(CoffError::MalformedFormat {
                what: "section raw data",
                offset: 0x20,
                length: 0x10,
                size: 40,
            })
        );
    }

    #[test]
    fn relocations_past_end_are_malformed() {
        let header = SectionHeader::builder()
            .pointer_to_relocations(40)
            .number_of_relocations(1)
            .build();

        assert!(matches!(
            read(header.as_bytes(), 40),
            Err(CoffError::MalformedFormat {
                what: "relocation table",
                ..
            })
        ));
    }
}

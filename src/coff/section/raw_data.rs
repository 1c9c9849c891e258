use std::{fmt, ops::Deref, ops::Range};

use crate::coff::blob::Blob;

/// The initialized data of a section: a view into the decoded file's bytes.
#[derive(Clone, Eq, PartialEq)]
pub struct RawData {
    blob: Blob,
    range: Range<usize>,
}

impl RawData {
    pub(crate) const fn new(blob: Blob, range: Range<usize>) -> Self {
        Self { blob, range }
    }

    /// Returns the byte at `offset`, or [`None`] if it is past the end of the data.
    #[inline]
    pub fn byte(&self, offset: usize) -> Option<u8> {
        self.get(offset).copied()
    }

    /// The position of the data within the decoded file.
    #[inline]
    pub fn file_range(&self) -> Range<usize> {
        self.range.clone()
    }
}

impl Deref for RawData {
    type Target = [u8];

    #[inline]
    fn deref(&self) -> &Self::Target {
        self.blob.slice(&self.range)
    }
}

impl AsRef<[u8]> for RawData {
    #[inline]
    fn as_ref(&self) -> &[u8] {
        self
    }
}

impl fmt::Debug for RawData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RawData")
            .field("size", &self.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::RawData;
    use crate::coff::blob::Blob;

    #[test]
    fn byte_access() {
        let data = RawData::new(Blob::from([0x00, 0xC3, 0x90, 0xFF].as_slice()), 1..3);
        assert_eq!(data.len(), 2);
        assert_eq!(data.byte(0), Some(0xC3));
        assert_eq!(data.byte(1), Some(0x90));
        assert_eq!(data.byte(2), None);
        assert_eq!(&*data, [0xC3, 0x90]);
        assert_eq!(data.file_range(), 1..3);
    }

    #[test]
    fn debug_shows_size() {
        let data = RawData::new(Blob::from([0; 24].as_slice()), 0..24);
        assert_eq!(format!("{data:?}"), "RawData { size: 24, .. }");
    }
}

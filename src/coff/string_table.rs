use std::ops::Range;

use memchr::memchr_iter;

use crate::{coff::CoffError, read::ReadRecordExt};

/// The string table holding names longer than eight bytes.
///
/// It begins immediately after the symbol table. Its leading size field is not consulted: an
/// offset is resolved by reading a NUL-terminated string from `start + offset` within the blob.
///
/// The terminators from `start` onwards are located once, so resolving an offset does not rescan
/// the table no matter how many names point into the same string.
#[derive(Clone, Debug)]
pub struct StringTable<'data> {
    data: &'data [u8],
    start: usize,
    terminators: Vec<usize>,
}

impl<'data> StringTable<'data> {
    pub fn new(data: &'data [u8], start: usize) -> Self {
        let terminators = data
            .get(start..)
            .map(|table| memchr_iter(0, table).map(|end| start + end).collect())
            .unwrap_or_default();

        Self {
            data,
            start,
            terminators,
        }
    }

    #[inline]
    pub const fn start(&self) -> usize {
        self.start
    }

    /// Returns the bytes of the string at `offset`, without the NUL terminator.
    ///
    /// # Errors
    ///
    /// Returns [`CoffError::MalformedFormat`] if the offset lies outside the blob or the string
    /// is not terminated before the end of the blob.
    pub fn get(&self, offset: u32) -> Result<&'data [u8], CoffError> {
        let range = self.range(offset)?;
        Ok(&self.data[range])
    }

    /// Returns the position of the string at `offset` within the blob, without the NUL
    /// terminator.
    ///
    /// # Errors
    ///
    /// Returns [`CoffError::MalformedFormat`] if the offset lies outside the blob or the string
    /// is not terminated before the end of the blob.
    pub fn range(&self, offset: u32) -> Result<Range<usize>, CoffError> {
        let position = self
            .start
            .checked_add(offset as usize)
            .ok_or(CoffError::MalformedFormat {
                what: "string table entry",
                offset: self.start,
                length: offset as usize,
                size: self.data.len(),
            })?;

        let rest = self.data.bytes_at(
            "string table entry",
            position,
            self.data.len().saturating_sub(position),
        )?;

        let next = self
            .terminators
            .partition_point(|&terminator| terminator < position);

        self.terminators
            .get(next)
            .map(|&end| position..end)
            .ok_or(CoffError::MalformedFormat {
                what: "unterminated string table entry",
                offset: position,
                length: rest.len() + 1,
                size: self.data.len(),
            })
    }
}

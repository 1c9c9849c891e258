use zerocopy::{FromBytes, Immutable, KnownLayout};

use crate::{codec::LeField, coff::CoffError};

/// Extends a byte blob with bounds-checked reads of fixed-layout records.
///
/// Every method names what is being read so that a failure can report it, and every offset
/// computation is checked, so a corrupt offset yields [`CoffError::MalformedFormat`] rather than
/// a panic.
pub trait ReadRecordExt {
    /// Returns `length` bytes starting at `offset`.
    ///
    /// # Errors
    ///
    /// Returns [`CoffError::MalformedFormat`] if `offset + length` exceeds the blob.
    fn bytes_at(&self, what: &'static str, offset: usize, length: usize)
    -> Result<&[u8], CoffError>;

    /// Reads a record of type `T` starting at `offset`.
    ///
    /// # Errors
    ///
    /// Returns [`CoffError::MalformedFormat`] if the record does not fit in the blob.
    #[inline]
    fn record_at<T>(&self, what: &'static str, offset: usize) -> Result<T, CoffError>
    where
        T: FromBytes + KnownLayout + Immutable,
    {
        let bytes = self.bytes_at(what, offset, size_of::<T>())?;
        T::read_from_bytes(bytes).map_err(|_| CoffError::MalformedFormat {
            what,
            offset,
            length: size_of::<T>(),
            size: bytes.len(),
        })
    }

    /// Reads a little-endian integer starting at `offset`.
    ///
    /// # Errors
    ///
    /// Returns [`CoffError::MalformedFormat`] if the field does not fit in the blob.
    #[inline]
    fn field_at<T: LeField>(&self, what: &'static str, offset: usize) -> Result<T, CoffError> {
        let bytes = self.bytes_at(what, offset, T::WIDTH)?;
        let mut field = T::Bytes::default();
        field.as_mut().copy_from_slice(bytes);
        Ok(crate::codec::read::<T>(&field))
    }
}

impl ReadRecordExt for [u8] {
    fn bytes_at(
        &self,
        what: &'static str,
        offset: usize,
        length: usize,
    ) -> Result<&[u8], CoffError> {
        offset
            .checked_add(length)
            .and_then(|end| self.get(offset..end))
            .ok_or(CoffError::MalformedFormat {
                what,
                offset,
                length,
                size: self.len(),
            })
    }
}

#[cfg(test)]
mod tests {
    use zerocopy::{LittleEndian, U16};

    use super::ReadRecordExt;
    use crate::coff::CoffError;

    #[test]
    fn reads_within_bounds() {
        let blob = [1, 2, 3, 4, 5];
        assert_eq!(blob.bytes_at("test", 1, 3), Ok(&blob[1..4]));
        assert_eq!(blob.field_at::<u16>("test", 3), Ok(0x0504));
        assert_eq!(
            blob.record_at::<U16<LittleEndian>>("test", 0).map(U16::get),
            Ok(0x0201)
        );
    }

    #[test]
    fn out_of_bounds_is_malformed() {
        let blob = [0; 4];
        assert_eq!(
            blob.field_at::<u32>("symbol", 1),
            Err(CoffError::MalformedFormat {
                what: "symbol",
                offset: 1,
                length: 4,
                size: 4,
            })
        );
        assert!(blob.bytes_at("raw data", usize::MAX, 2).is_err());
        assert!(blob.bytes_at("raw data", 4, 0).is_ok());
    }
}

mod error;

use std::{fmt, ops::Range};

use bon::bon;
pub use error::BufferError;
use tracing::trace;

use crate::codec::{self, LeField};

pub const DEFAULT_PAGE_ALIGNMENT: usize = 1 << 16;

/// A growable byte buffer for assembling binary output.
///
/// The buffer tracks a logical size, which only grows through [`grow`](Self::grow),
/// [`align`](Self::align) and the `append` family, and a reserved capacity that is always a
/// multiple of the page alignment. Random-access writes are checked against the logical size and
/// never extend it. A failed operation leaves the committed bytes unchanged.
#[derive(Eq, PartialEq)]
pub struct Buffer {
    data: Vec<u8>,
    reserved: usize,
    page_alignment: usize,
}

#[bon]
impl Buffer {
    /// Creates an empty buffer whose reservations are rounded up to `page_alignment` bytes,
    /// which defaults to [`DEFAULT_PAGE_ALIGNMENT`].
    ///
    /// # Errors
    ///
    /// Returns [`BufferError::InvalidArgument`] if `page_alignment` is not a power of 2.
    #[builder]
    pub fn new(
        #[builder(default = DEFAULT_PAGE_ALIGNMENT)] page_alignment: usize,
    ) -> Result<Self, BufferError> {
        Self::with_page_alignment(page_alignment)
    }
}

impl Buffer {
    /// Creates an empty buffer with the given page alignment.
    ///
    /// # Errors
    ///
    /// Returns [`BufferError::InvalidArgument`] if `page_alignment` is not a power of 2.
    pub const fn with_page_alignment(page_alignment: usize) -> Result<Self, BufferError> {
        if !page_alignment.is_power_of_two() {
            return Err(BufferError::InvalidArgument {
                argument: "buffer page alignment",
                value: page_alignment,
            });
        }

        Ok(Self {
            data: Vec::new(),
            reserved: 0,
            page_alignment,
        })
    }

    /// The logical size of the buffer.
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[inline]
    pub const fn reserved(&self) -> usize {
        self.reserved
    }

    #[inline]
    pub const fn page_alignment(&self) -> usize {
        self.page_alignment
    }

    /// Ensures the buffer can hold at least `bytes` bytes without reallocating.
    ///
    /// The reservation is rounded up to the next multiple of the page alignment. Existing bytes
    /// are preserved, and nothing happens if enough capacity is already reserved.
    ///
    /// # Errors
    ///
    /// Returns [`BufferError::OutOfMemory`] if the allocation fails.
    pub fn reserve(&mut self, bytes: usize) -> Result<&mut Self, BufferError> {
        if bytes <= self.reserved {
            return Ok(self);
        }

        let reserved = bytes
            .checked_next_multiple_of(self.page_alignment)
            .ok_or(BufferError::OutOfMemory)?;

        self.data
            .try_reserve_exact(reserved - self.data.len())
            .map_err(|_| BufferError::OutOfMemory)?;

        trace!(from = self.reserved, to = reserved, "Reserved buffer capacity");
        self.reserved = reserved;

        Ok(self)
    }

    /// Extends the logical size by `bytes`. The new bytes are zeroed, but callers are expected
    /// to overwrite them.
    ///
    /// # Errors
    ///
    /// Returns [`BufferError::OutOfMemory`] if the allocation fails.
    pub fn grow(&mut self, bytes: usize) -> Result<&mut Self, BufferError> {
        self.extend_with(bytes, 0)?;
        Ok(self)
    }

    /// Pads the buffer with `fill` up to the next multiple of `boundary`.
    ///
    /// # Errors
    ///
    /// Returns [`BufferError::ValueOutOfRange`] if `fill` does not fit in a byte,
    /// [`BufferError::InvalidArgument`] if `boundary` is not a power of 2 and
    /// [`BufferError::OutOfMemory`] if the allocation fails. The fill is checked first.
    pub fn align(&mut self, boundary: usize, fill: u64) -> Result<&mut Self, BufferError> {
        let fill = narrow::<u8>(fill)?;

        if !boundary.is_power_of_two() {
            return Err(BufferError::InvalidArgument {
                argument: "alignment",
                value: boundary,
            });
        }

        let aligned = self
            .len()
            .checked_next_multiple_of(boundary)
            .ok_or(BufferError::OutOfMemory)?;

        self.extend_with(aligned - self.len(), fill)?;
        Ok(self)
    }

    /// Overwrites the byte at `address`.
    ///
    /// # Errors
    ///
    /// Returns [`BufferError::OutOfRange`] if `address` is past the logical size and
    /// [`BufferError::ValueOutOfRange`] if `value` is greater than 255.
    pub fn set8(&mut self, address: usize, value: u64) -> Result<&mut Self, BufferError> {
        self.set_field::<u8>(address, value)
    }

    /// Overwrites the little-endian 16-bit word at `address`.
    ///
    /// # Errors
    ///
    /// Returns [`BufferError::OutOfRange`] if the word does not lie within the logical size and
    /// [`BufferError::ValueOutOfRange`] if `value` is greater than 65535.
    pub fn set16(&mut self, address: usize, value: u64) -> Result<&mut Self, BufferError> {
        self.set_field::<u16>(address, value)
    }

    /// Overwrites the little-endian 32-bit word at `address`.
    ///
    /// # Errors
    ///
    /// Returns [`BufferError::OutOfRange`] if the word does not lie within the logical size and
    /// [`BufferError::ValueOutOfRange`] if `value` does not fit in 32 bits.
    pub fn set32(&mut self, address: usize, value: u64) -> Result<&mut Self, BufferError> {
        self.set_field::<u32>(address, value)
    }

    /// # Errors
    ///
    /// Returns [`BufferError::OutOfRange`] if `address` is past the logical size.
    pub fn get8(&self, address: usize) -> Result<u8, BufferError> {
        self.get_field(address)
    }

    /// # Errors
    ///
    /// Returns [`BufferError::OutOfRange`] if the word does not lie within the logical size.
    pub fn get16(&self, address: usize) -> Result<u16, BufferError> {
        self.get_field(address)
    }

    /// Reads the little-endian 32-bit word at `address`.
    ///
    /// # Errors
    ///
    /// Returns [`BufferError::OutOfRange`] if the word does not lie within the logical size.
    pub fn get32(&self, address: usize) -> Result<u32, BufferError> {
        self.get_field(address)
    }

    /// Writes `string` followed by a NUL terminator at `address`.
    ///
    /// # Errors
    ///
    /// Returns [`BufferError::OutOfRange`] if the string and its terminator do not fit within the
    /// logical size.
    pub fn set_string(&mut self, address: usize, string: &str) -> Result<&mut Self, BufferError> {
        let range = self.range(address, string.len() + 1)?;
        let (text, terminator) = self.data[range].split_at_mut(string.len());
        text.copy_from_slice(string.as_bytes());
        terminator[0] = 0;
        Ok(self)
    }

    /// Copies `bytes` into the buffer at `address`.
    ///
    /// # Errors
    ///
    /// Returns [`BufferError::OutOfRange`] if the bytes do not fit within the logical size.
    pub fn set_raw(&mut self, address: usize, bytes: &[u8]) -> Result<&mut Self, BufferError> {
        let range = self.range(address, bytes.len())?;
        self.data[range].copy_from_slice(bytes);
        Ok(self)
    }

    /// # Errors
    ///
    /// Returns [`BufferError::ValueOutOfRange`] if `value` is greater than 255 and
    /// [`BufferError::OutOfMemory`] if the allocation fails.
    pub fn append8(&mut self, value: u64) -> Result<&mut Self, BufferError> {
        self.append_field::<u8>(value)
    }

    /// # Errors
    ///
    /// Returns [`BufferError::ValueOutOfRange`] if `value` is greater than 65535 and
    /// [`BufferError::OutOfMemory`] if the allocation fails.
    pub fn append16(&mut self, value: u64) -> Result<&mut Self, BufferError> {
        self.append_field::<u16>(value)
    }

    /// # Errors
    ///
    /// Returns [`BufferError::ValueOutOfRange`] if `value` does not fit in 32 bits and
    /// [`BufferError::OutOfMemory`] if the allocation fails.
    pub fn append32(&mut self, value: u64) -> Result<&mut Self, BufferError> {
        self.append_field::<u32>(value)
    }

    /// Appends `string` followed by a NUL terminator.
    ///
    /// # Errors
    ///
    /// Returns [`BufferError::OutOfMemory`] if the allocation fails.
    pub fn append_string(&mut self, string: &str) -> Result<&mut Self, BufferError> {
        let address = self.len();
        self.grow(string.len() + 1)?;
        self.set_string(address, string)
    }

    /// # Errors
    ///
    /// Returns [`BufferError::OutOfMemory`] if the allocation fails.
    pub fn append_raw(&mut self, bytes: &[u8]) -> Result<&mut Self, BufferError> {
        let address = self.len();
        self.grow(bytes.len())?;
        self.set_raw(address, bytes)
    }

    /// The finished bytes, `[0, len)`.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    #[inline]
    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }

    fn extend_with(&mut self, bytes: usize, fill: u8) -> Result<(), BufferError> {
        let size = self
            .len()
            .checked_add(bytes)
            .ok_or(BufferError::OutOfMemory)?;
        self.reserve(size)?;
        self.data.resize(size, fill);
        Ok(())
    }

    fn range(&self, address: usize, length: usize) -> Result<Range<usize>, BufferError> {
        address
            .checked_add(length)
            .filter(|&end| end <= self.len())
            .map(|end| address..end)
            .ok_or(BufferError::OutOfRange {
                address,
                length,
                size: self.len(),
            })
    }

    fn set_field<T>(&mut self, address: usize, value: u64) -> Result<&mut Self, BufferError>
    where
        T: LeField + TryFrom<u64>,
    {
        let range = self.range(address, T::WIDTH)?;
        let value = narrow::<T>(value)?;
        let mut field = T::Bytes::default();
        codec::write::<T>(&mut field, value);
        self.data[range].copy_from_slice(field.as_ref());
        Ok(self)
    }

    fn get_field<T: LeField>(&self, address: usize) -> Result<T, BufferError> {
        codec::read_at::<T>(&self.data, address).ok_or(BufferError::OutOfRange {
            address,
            length: T::WIDTH,
            size: self.len(),
        })
    }

    fn append_field<T>(&mut self, value: u64) -> Result<&mut Self, BufferError>
    where
        T: LeField + TryFrom<u64>,
    {
        // Validate before growing so a rejected value leaves the size untouched
        narrow::<T>(value)?;
        let address = self.len();
        self.grow(T::WIDTH)?;
        self.set_field::<T>(address, value)
    }
}

impl Default for Buffer {
    fn default() -> Self {
        Self {
            data: Vec::new(),
            reserved: 0,
            page_alignment: DEFAULT_PAGE_ALIGNMENT,
        }
    }
}

impl Clone for Buffer {
    /// Clones the committed bytes along with the reservation. If the reservation cannot be
    /// allocated, the clone reserves only its committed bytes and grows from there.
    fn clone(&self) -> Self {
        let mut data = Vec::new();
        let reserved = match data.try_reserve_exact(self.reserved) {
            Ok(()) => self.reserved,
            Err(_) => self.data.len(),
        };
        data.extend_from_slice(&self.data);

        Self {
            data,
            reserved,
            page_alignment: self.page_alignment,
        }
    }
}

impl AsRef<[u8]> for Buffer {
    #[inline]
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}

impl fmt::Debug for Buffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Buffer")
            .field("size", &self.len())
            .field("reserved", &self.reserved)
            .field("page_alignment", &self.page_alignment)
            .finish_non_exhaustive()
    }
}

fn narrow<T>(value: u64) -> Result<T, BufferError>
where
    T: LeField + TryFrom<u64>,
{
    T::try_from(value).map_err(|_| BufferError::ValueOutOfRange {
        value,
        max: u64::MAX >> (u64::BITS as usize - T::WIDTH * 8),
    })
}

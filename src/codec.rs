//! Unaligned little-endian field access.
//!
//! Every COFF field is a packed byte array whose length decides how it is decoded. Rather than
//! inspecting the array length at runtime, the width is carried by the integer type: reading a
//! `u16` always consumes a `[u8; 2]`, reading an `i32` always consumes a `[u8; 4]`.

/// An integer that is stored as a fixed-width little-endian byte array.
pub trait LeField: Copy {
    /// The on-disk representation of the field.
    type Bytes: AsRef<[u8]> + AsMut<[u8]> + Copy + Default;

    /// The width of the field in bytes.
    const WIDTH: usize = size_of::<Self::Bytes>();

    fn from_le_field(bytes: Self::Bytes) -> Self;

    fn to_le_field(self) -> Self::Bytes;
}

macro_rules! impl_le_field {
    ($($int:ty),*) => {
        $(
            impl LeField for $int {
                type Bytes = [u8; size_of::<$int>()];

                #[inline]
                fn from_le_field(bytes: Self::Bytes) -> Self {
                    <$int>::from_le_bytes(bytes)
                }

                #[inline]
                fn to_le_field(self) -> Self::Bytes {
                    self.to_le_bytes()
                }
            }
        )*
    };
}

impl_le_field!(u8, u16, u32, i8, i16, i32);

/// Decodes a field. Signed types are sign-extended.
#[inline]
pub fn read<T: LeField>(field: &T::Bytes) -> T {
    T::from_le_field(*field)
}

/// Encodes `value` into `field`.
#[inline]
pub fn write<T: LeField>(field: &mut T::Bytes, value: T) {
    *field = value.to_le_field();
}

/// Decodes a field of type `T` starting at `offset` in `bytes`.
///
/// Returns [`None`] if `offset + T::WIDTH` overflows or lies past the end of `bytes`.
pub fn read_at<T: LeField>(bytes: &[u8], offset: usize) -> Option<T> {
    let end = offset.checked_add(T::WIDTH)?;
    let mut field = T::Bytes::default();
    field.as_mut().copy_from_slice(bytes.get(offset..end)?);
    Some(read::<T>(&field))
}

/// Encodes `value` at `offset` in `bytes`.
///
/// Returns [`None`] without touching `bytes` if the field would not fit.
pub fn write_at<T: LeField>(bytes: &mut [u8], offset: usize, value: T) -> Option<()> {
    let end = offset.checked_add(T::WIDTH)?;
    bytes
        .get_mut(offset..end)?
        .copy_from_slice(value.to_le_field().as_ref());
    Some(())
}

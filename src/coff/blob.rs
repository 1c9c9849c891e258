use std::{fmt, ops::Range, sync::Arc};

use derive_more::Deref;

/// The decoded file's bytes, copied once and shared by every entity that refers into them.
///
/// Names, raw data and relocation tables are kept as ranges into this copy, so the memory held by
/// a decoded file is bounded by the size of its input however many entries share a range.
#[derive(Clone, Eq, PartialEq, Deref)]
#[deref(forward)]
pub(crate) struct Blob(Arc<[u8]>);

impl Blob {
    /// Returns the bytes of `range`, which was validated against this blob when it was decoded.
    #[inline]
    pub(crate) fn slice(&self, range: &Range<usize>) -> &[u8] {
        self.get(range.clone()).unwrap_or_default()
    }

    /// Whether `self` and `other` share the same storage.
    #[cfg(test)]
    pub(crate) fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl From<&[u8]> for Blob {
    fn from(bytes: &[u8]) -> Self {
        Self(Arc::from(bytes))
    }
}

impl fmt::Debug for Blob {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Blob")
            .field("size", &self.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::Blob;

    #[test]
    fn clones_share_storage() {
        let blob = Blob::from([1, 2, 3, 4].as_slice());
        let clone = blob.clone();

        assert!(blob.ptr_eq(&clone));
        assert_eq!(clone.slice(&(1..3)), [2, 3]);
        assert!(!blob.ptr_eq(&Blob::from([1, 2, 3, 4].as_slice())));
    }

    #[test]
    fn out_of_range_slice_is_empty() {
        let blob = Blob::from([0; 4].as_slice());
        assert_eq!(blob.slice(&(2..9)), []);
    }
}

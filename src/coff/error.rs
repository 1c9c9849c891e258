use std::ops::RangeInclusive;

use thiserror::Error;

#[derive(Debug, Error, Clone, Eq, PartialEq)]
pub enum CoffError {
    #[error("{kind} index {index} out of range: {}", describe_valid(.valid))]
    IndexOutOfRange {
        kind: &'static str,
        index: usize,
        /// The valid indices, or [`None`] if the table is empty.
        valid: Option<RangeInclusive<usize>>,
    },
    #[error(
        "Malformed COFF: {what} at offset {offset:#X} with length {length} exceeds the {size} byte blob"
    )]
    MalformedFormat {
        what: &'static str,
        offset: usize,
        length: usize,
        size: usize,
    },
    #[error("Malformed COFF: section name {name:?} does not hold a valid string table offset")]
    InvalidLongName { name: String },
}

impl CoffError {
    /// An index error for a table of `count` entries whose first index is `first`.
    pub(crate) fn index_out_of_range(
        kind: &'static str,
        index: usize,
        first: usize,
        count: usize,
    ) -> Self {
        Self::IndexOutOfRange {
            kind,
            index,
            valid: count.checked_sub(1).map(|last| first..=first + last),
        }
    }
}

fn describe_valid(valid: &Option<RangeInclusive<usize>>) -> String {
    match valid {
        Some(valid) => format!("expected [{}, {}]", valid.start(), valid.end()),
        None => "the table is empty".to_owned(),
    }
}

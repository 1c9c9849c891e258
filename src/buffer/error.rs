use thiserror::Error;

#[derive(Debug, Error, Clone, Copy, Eq, PartialEq)]
pub enum BufferError {
    #[error("Address {address} with length {length} is out of range for a buffer of {size} bytes")]
    OutOfRange {
        address: usize,
        length: usize,
        size: usize,
    },
    #[error("Value {value} out of range [0, {max}]")]
    ValueOutOfRange { value: u64, max: u64 },
    #[error("The {argument} must be a power of 2, got {value}")]
    InvalidArgument {
        argument: &'static str,
        value: usize,
    },
    #[error("Out of memory")]
    OutOfMemory,
}

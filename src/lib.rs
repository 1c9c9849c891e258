//! Decoding of COFF object files, and a growable byte buffer for assembling them.
//!
//! ```
//! use coffkit::{buffer::Buffer, coff::Coff};
//!
//! let mut buffer = Buffer::default();
//! buffer.grow(20)?;
//!
//! let coff = Coff::parse(buffer.as_bytes())?;
//! assert_eq!(coff.number_of_sections(), 0);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod buffer;
pub mod codec;
pub mod coff;
mod read;

pub use buffer::{Buffer, BufferError};
pub use coff::{Coff, CoffError};

//! The 8-byte name field shared by section headers and symbols.
//!
//! A name of up to eight bytes is stored inline, NUL padded (an eight byte name has no
//! terminator). Longer names live in the string table and the field holds their offset instead:
//!
//! * section headers write `/` followed by the offset in ASCII decimal, or `//` followed by the
//!   offset in base 64 once it no longer fits in seven decimal digits;
//! * symbols write four zero bytes followed by the offset as a little-endian `u32`.

use memchr::memchr;

use crate::{codec, coff::CoffError};

pub const NAME_SIZE: usize = 8;

const MAX_DECIMAL_OFFSET: u32 = 9_999_999;

const BASE64_DIGITS: &[u8; 64] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+/";

/// Where a name field says the name is.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum NameRef<'a> {
    /// The name is stored in the field itself.
    Inline(&'a [u8]),
    /// The name is a NUL-terminated string at this offset into the string table.
    StringTable(u32),
}

impl<'a> NameRef<'a> {
    /// Interprets the name field of a section header.
    ///
    /// # Errors
    ///
    /// Returns [`CoffError::InvalidLongName`] if the field starts with `/` but the rest is not a
    /// valid offset.
    pub fn section(field: &'a [u8; NAME_SIZE]) -> Result<Self, CoffError> {
        let name = trim_nul(field);

        let Some(encoded) = name.strip_prefix(b"/") else {
            return Ok(Self::Inline(name));
        };

        let offset = match encoded.strip_prefix(b"/") {
            Some(digits) => parse_base64(digits),
            None => parse_decimal(encoded),
        };

        offset
            .map(Self::StringTable)
            .ok_or_else(|| CoffError::InvalidLongName {
                name: String::from_utf8_lossy(name).into_owned(),
            })
    }

    /// Interprets the name field of a symbol.
    pub fn symbol(field: &'a [u8; NAME_SIZE]) -> Self {
        let (zeroes, offset) = field.split_at(NAME_SIZE / 2);
        if zeroes.iter().all(|&byte| byte == 0) {
            codec::read_at::<u32>(offset, 0).map_or(Self::Inline(&[]), Self::StringTable)
        } else {
            Self::Inline(trim_nul(field))
        }
    }
}

/// Encodes `name` inline, returning [`None`] if it is longer than eight bytes.
pub fn inline(name: &str) -> Option<[u8; NAME_SIZE]> {
    let bytes = name.as_bytes();
    let mut field = [0; NAME_SIZE];
    field.get_mut(..bytes.len())?.copy_from_slice(bytes);
    Some(field)
}

/// Encodes a string table offset in the section header form.
pub fn section_long_name(offset: u32) -> [u8; NAME_SIZE] {
    let mut field = [0; NAME_SIZE];

    if offset <= MAX_DECIMAL_OFFSET {
        let digits = offset.to_string();
        field[0] = b'/';
        field[1..=digits.len()].copy_from_slice(digits.as_bytes());
    } else {
        field[..2].copy_from_slice(b"//");
        let mut remaining = offset;
        for slot in field[2..].iter_mut().rev() {
            *slot = BASE64_DIGITS[(remaining % 64) as usize];
            remaining /= 64;
        }
    }

    field
}

/// Encodes a string table offset in the symbol form.
pub const fn symbol_long_name(offset: u32) -> [u8; NAME_SIZE] {
    let [a, b, c, d] = offset.to_le_bytes();
    [0, 0, 0, 0, a, b, c, d]
}

/// Decodes name bytes, replacing invalid UTF-8 rather than rejecting the file.
pub fn to_string(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}

fn trim_nul(field: &[u8]) -> &[u8] {
    memchr(0, field).map_or(field, |end| &field[..end])
}

fn parse_decimal(digits: &[u8]) -> Option<u32> {
    if digits.is_empty() || !digits.iter().all(u8::is_ascii_digit) {
        return None;
    }

    digits.iter().try_fold(0u32, |offset, &digit| {
        offset.checked_mul(10)?.checked_add(u32::from(digit - b'0'))
    })
}

fn parse_base64(digits: &[u8]) -> Option<u32> {
    if digits.is_empty() {
        return None;
    }

    digits.iter().try_fold(0u32, |offset, &digit| {
        let value = memchr(digit, BASE64_DIGITS)?;
        offset.checked_mul(64)?.checked_add(value as u32)
    })
}

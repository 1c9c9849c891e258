/// Where a symbol's value lives, decoded from its signed 16-bit section number.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum SectionNumber {
    /// `IMAGE_SYM_UNDEFINED`: the symbol is defined elsewhere, or is a common symbol whose value
    /// is its size.
    #[doc(alias("IMAGE_SYM_UNDEFINED"))]
    Undefined,
    /// `IMAGE_SYM_ABSOLUTE`: the value is an absolute value, not an address.
    #[doc(alias("IMAGE_SYM_ABSOLUTE"))]
    Absolute,
    /// `IMAGE_SYM_DEBUG`: the symbol carries debugging or type information.
    #[doc(alias("IMAGE_SYM_DEBUG"))]
    Debug,
    /// A one-based index into the section table.
    Index(u16),
    /// Any other negative value.
    Other(i16),
}

impl SectionNumber {
    pub const UNDEFINED: i16 = 0;
    pub const ABSOLUTE: i16 = -1;
    pub const DEBUG: i16 = -2;
}

impl From<i16> for SectionNumber {
    fn from(raw: i16) -> Self {
        match raw {
            Self::UNDEFINED => Self::Undefined,
            Self::ABSOLUTE => Self::Absolute,
            Self::DEBUG => Self::Debug,
            1.. => Self::Index(raw.unsigned_abs()),
            _ => Self::Other(raw),
        }
    }
}

impl From<SectionNumber> for i16 {
    fn from(number: SectionNumber) -> Self {
        match number {
            SectionNumber::Undefined => SectionNumber::UNDEFINED,
            SectionNumber::Absolute => SectionNumber::ABSOLUTE,
            SectionNumber::Debug => SectionNumber::DEBUG,
            SectionNumber::Index(index) => index as i16,
            SectionNumber::Other(raw) => raw,
        }
    }
}

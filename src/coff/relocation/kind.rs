use strum::{Display, FromRepr};

/// Relocation types for [`Machine::Amd64`](crate::coff::Machine::Amd64).
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, FromRepr, Display)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[repr(u16)]
pub enum Amd64RelocationType {
    /// The relocation is ignored.
    Absolute = 0x0000,
    /// The 64-bit VA of the relocation target.
    Addr64 = 0x0001,
    /// The 32-bit VA of the relocation target.
    Addr32 = 0x0002,
    /// The 32-bit address without an image base (RVA).
    #[strum(serialize = "ADDR32NB")]
    Addr32Nb = 0x0003,
    /// The 32-bit relative address from the byte following the relocation.
    Rel32 = 0x0004,
    /// The 32-bit address relative to byte distance 1 from the relocation.
    #[strum(serialize = "REL32_1")]
    Rel32_1 = 0x0005,
    #[strum(serialize = "REL32_2")]
    Rel32_2 = 0x0006,
    #[strum(serialize = "REL32_3")]
    Rel32_3 = 0x0007,
    #[strum(serialize = "REL32_4")]
    Rel32_4 = 0x0008,
    #[strum(serialize = "REL32_5")]
    Rel32_5 = 0x0009,
    /// The 16-bit section index of the section that contains the target.
    Section = 0x000A,
    /// The 32-bit offset of the target from the beginning of its section.
    #[strum(serialize = "SECREL")]
    SecRel = 0x000B,
    /// A 7-bit unsigned offset from the base of the section that contains the target.
    #[strum(serialize = "SECREL7")]
    SecRel7 = 0x000C,
    /// CLR tokens.
    Token = 0x000D,
    /// A 32-bit signed span-dependent value emitted into the object.
    #[strum(serialize = "SREL32")]
    SRel32 = 0x000E,
    /// A pair that must immediately follow every span-dependent value.
    Pair = 0x000F,
    /// A 32-bit signed span-dependent value that is applied at link time.
    #[strum(serialize = "SSPAN32")]
    SSpan32 = 0x0010,
}

/// Relocation types for [`Machine::I386`](crate::coff::Machine::I386).
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, FromRepr, Display)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[repr(u16)]
pub enum I386RelocationType {
    Absolute = 0x0000,
    /// Not supported.
    #[strum(serialize = "DIR16")]
    Dir16 = 0x0001,
    /// Not supported.
    #[strum(serialize = "REL16")]
    Rel16 = 0x0002,
    /// The target's 32-bit VA.
    #[strum(serialize = "DIR32")]
    Dir32 = 0x0006,
    /// The target's 32-bit RVA.
    #[strum(serialize = "DIR32NB")]
    Dir32Nb = 0x0007,
    /// Not supported.
    #[strum(serialize = "SEG12")]
    Seg12 = 0x0009,
    Section = 0x000A,
    #[strum(serialize = "SECREL")]
    SecRel = 0x000B,
    Token = 0x000C,
    #[strum(serialize = "SECREL7")]
    SecRel7 = 0x000D,
    /// The 32-bit relative displacement to the target.
    #[strum(serialize = "REL32")]
    Rel32 = 0x0014,
}

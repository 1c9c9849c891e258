use strum::{Display, FromRepr};

/// The kind of definition a symbol represents. `IMAGE_SYM_CLASS_*` in `winnt.h`.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, FromRepr, Display)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[repr(u8)]
pub enum StorageClass {
    Null = 0,
    Automatic = 1,
    /// Defined in this file when the section number is non-zero, otherwise an external
    /// reference.
    External = 2,
    /// The value is the offset of the symbol within its section. A zero value with a section
    /// number names the section itself.
    Static = 3,
    Register = 4,
    ExternalDef = 5,
    Label = 6,
    UndefinedLabel = 7,
    MemberOfStruct = 8,
    Argument = 9,
    StructTag = 10,
    MemberOfUnion = 11,
    UnionTag = 12,
    TypeDefinition = 13,
    UndefinedStatic = 14,
    EnumTag = 15,
    MemberOfEnum = 16,
    RegisterParam = 17,
    BitField = 18,
    /// A `.bb` or `.eb` record.
    Block = 100,
    /// A `.bf`, `.ef` or `.lf` record.
    Function = 101,
    EndOfStruct = 102,
    /// The source file name. Followed by aux records holding the name.
    File = 103,
    Section = 104,
    WeakExternal = 105,
    ClrToken = 107,
    /// A special symbol that marks the end of a function, stored as `-1`.
    EndOfFunction = 0xFF,
}

use strum::FromRepr;

/// The low nibble of a symbol's type. Microsoft tools set it to [`Null`](Self::Null).
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, FromRepr)]
#[repr(u16)]
pub enum SymbolBaseType {
    Null = 0,
    Void,
    Char,
    Short,
    Int,
    Long,
    Float,
    Double,
    Struct,
    Union,
    Enum,
    /// A member of an enumeration.
    Moe,
    Byte,
    Word,
    Uint,
    Dword,
}

/// The derived part of a symbol's type, stored above the base type nibble.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, FromRepr)]
#[repr(u16)]
pub enum SymbolDerivedType {
    Null = 0,
    Pointer,
    /// Microsoft tools mark functions with this, giving a type of `0x20`.
    Function,
    Array,
}

//! Built-in YANG type names.

use core::fmt;

/// The closed set of YANG built-in types.
///
/// Built-in names are never prefix-qualified; a `prefix:name` type reference
/// always denotes a typedef, even when the local name matches one of these.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BuiltinType {
    Binary,
    Bits,
    Boolean,
    Decimal64,
    Empty,
    Enumeration,
    Int8,
    Int16,
    Int32,
    Int64,
    Uint8,
    Uint16,
    Uint32,
    Uint64,
    String,
    Identityref,
    InstanceIdentifier,
    Leafref,
    Union,
}

impl BuiltinType {
    /// Match an unprefixed type name against the built-in set.
    ///
    /// Exact match or nothing; typedef names that merely resemble a built-in
    /// (`"int"`, `"string2"`) stay typedefs.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "binary" => Self::Binary,
            "bits" => Self::Bits,
            "boolean" => Self::Boolean,
            "decimal64" => Self::Decimal64,
            "empty" => Self::Empty,
            "enumeration" => Self::Enumeration,
            "int8" => Self::Int8,
            "int16" => Self::Int16,
            "int32" => Self::Int32,
            "int64" => Self::Int64,
            "uint8" => Self::Uint8,
            "uint16" => Self::Uint16,
            "uint32" => Self::Uint32,
            "uint64" => Self::Uint64,
            "string" => Self::String,
            "identityref" => Self::Identityref,
            "instance-identifier" => Self::InstanceIdentifier,
            "leafref" => Self::Leafref,
            "union" => Self::Union,
            _ => return None,
        })
    }

    /// The canonical name of the type.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Binary => "binary",
            Self::Bits => "bits",
            Self::Boolean => "boolean",
            Self::Decimal64 => "decimal64",
            Self::Empty => "empty",
            Self::Enumeration => "enumeration",
            Self::Int8 => "int8",
            Self::Int16 => "int16",
            Self::Int32 => "int32",
            Self::Int64 => "int64",
            Self::Uint8 => "uint8",
            Self::Uint16 => "uint16",
            Self::Uint32 => "uint32",
            Self::Uint64 => "uint64",
            Self::String => "string",
            Self::Identityref => "identityref",
            Self::InstanceIdentifier => "instance-identifier",
            Self::Leafref => "leafref",
            Self::Union => "union",
        }
    }

    /// All built-in types, in canonical-name order.
    #[must_use]
    pub fn all() -> &'static [BuiltinType] {
        &[
            Self::Binary,
            Self::Bits,
            Self::Boolean,
            Self::Decimal64,
            Self::Empty,
            Self::Enumeration,
            Self::Int8,
            Self::Int16,
            Self::Int32,
            Self::Int64,
            Self::Uint8,
            Self::Uint16,
            Self::Uint32,
            Self::Uint64,
            Self::String,
            Self::Identityref,
            Self::InstanceIdentifier,
            Self::Leafref,
            Self::Union,
        ]
    }
}

impl fmt::Display for BuiltinType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

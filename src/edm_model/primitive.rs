use serde::{Deserialize, Serialize};
use std::fmt;

/// Scalar kinds a caller can declare on a property descriptor.
///
/// This is the caller-side vocabulary; [`primitive_kind`] maps it onto the
/// EDM primitive vocabulary surfaced by the built model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScalarKind {
    String,
    Bool,
    I8,
    U8,
    I16,
    U16,
    I32,
    U32,
    I64,
    U64,
    F32,
    F64,
    Decimal,
    /// Date without a time component. Normalized to [`PrimitiveKind::DateTimeOffset`]
    /// in the model because the target store compares full date-times.
    Date,
    DateTime,
    Duration,
    Guid,
    Binary,
}

/// EDM primitive kinds surfaced in the built model and on bound constants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PrimitiveKind {
    Binary,
    Boolean,
    Byte,
    SByte,
    DateTimeOffset,
    Decimal,
    Double,
    Duration,
    Guid,
    Int16,
    Int32,
    Int64,
    Single,
    String,
}

impl fmt::Display for PrimitiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Edm.{:?}", self)
    }
}

/// Map a declared scalar kind to the EDM primitive kind it surfaces as.
///
/// Unsigned widths map to the next signed width that can hold them, except
/// `U8` which has a dedicated EDM kind and `U64` which is capped at `Int64`.
pub fn primitive_kind(scalar: ScalarKind) -> PrimitiveKind {
    match scalar {
        ScalarKind::String => PrimitiveKind::String,
        ScalarKind::Bool => PrimitiveKind::Boolean,
        ScalarKind::I8 => PrimitiveKind::SByte,
        ScalarKind::U8 => PrimitiveKind::Byte,
        ScalarKind::I16 => PrimitiveKind::Int16,
        ScalarKind::U16 => PrimitiveKind::Int32,
        ScalarKind::I32 => PrimitiveKind::Int32,
        ScalarKind::U32 => PrimitiveKind::Int64,
        ScalarKind::I64 => PrimitiveKind::Int64,
        ScalarKind::U64 => PrimitiveKind::Int64,
        ScalarKind::F32 => PrimitiveKind::Single,
        ScalarKind::F64 => PrimitiveKind::Double,
        ScalarKind::Decimal => PrimitiveKind::Decimal,
        ScalarKind::Date => PrimitiveKind::DateTimeOffset,
        ScalarKind::DateTime => PrimitiveKind::DateTimeOffset,
        ScalarKind::Duration => PrimitiveKind::Duration,
        ScalarKind::Guid => PrimitiveKind::Guid,
        ScalarKind::Binary => PrimitiveKind::Binary,
    }
}

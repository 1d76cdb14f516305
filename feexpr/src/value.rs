//! Typed literal constant values.
//!
//! A literal carries its value together with the kind (storage width tag) of
//! its type. Values use arbitrary-precision payloads so that folding done by
//! earlier phases never has to worry about host integer widths.
use bigdecimal::BigDecimal;
use num_bigint::BigInt;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use strum::{EnumDiscriminants, EnumIs};

/// Default kind tag for integer and real literals.
pub const DEFAULT_KIND: u8 = 4;

/// Scalar literal constant value.
#[derive(Debug, Clone, PartialEq, EnumIs, EnumDiscriminants)]
#[strum_discriminants(name(ValueCategory))]
#[strum_discriminants(derive(EnumIs, Hash))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum LiteralValue {
    /// Integer constant of the given kind.
    Int { value: BigInt, kind: u8 },
    /// Real constant of the given kind.
    Real { value: BigDecimal, kind: u8 },
    /// Logical constant.
    Logical(bool),
    /// Character constant.
    Character(String),
}

impl LiteralValue {
    /// The integer payload, when this is an integer constant.
    pub fn as_int(&self) -> Option<&BigInt> {
        match self {
            LiteralValue::Int { value, .. } => Some(value),
            _ => None,
        }
    }

}

impl From<i64> for LiteralValue {
    fn from(value: i64) -> Self {
        LiteralValue::Int {
            value: value.into(),
            kind: DEFAULT_KIND,
        }
    }
}

impl From<i32> for LiteralValue {
    fn from(value: i32) -> Self {
        LiteralValue::Int {
            value: value.into(),
            kind: DEFAULT_KIND,
        }
    }
}

impl From<bool> for LiteralValue {
    fn from(value: bool) -> Self {
        LiteralValue::Logical(value)
    }
}

impl From<&str> for LiteralValue {
    fn from(value: &str) -> Self {
        LiteralValue::Character(value.to_owned())
    }
}

impl std::fmt::Display for LiteralValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LiteralValue::Int { value, .. } => write!(f, "{}", value),
            LiteralValue::Real { value, .. } => write!(f, "{}", value),
            LiteralValue::Logical(true) => write!(f, ".true."),
            LiteralValue::Logical(false) => write!(f, ".false."),
            LiteralValue::Character(s) => write!(f, "'{}'", s),
        }
    }
}

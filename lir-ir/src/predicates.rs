//! Comparison predicates
//!
//! Both enumerations are integer-backed with explicit discriminants. The
//! ordinals are part of the public contract: passes may persist them or
//! compare them numerically, so a variant's value never changes and new
//! variants are only ever appended.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use crate::error::IrError;

/// IntPredicate specifies a comparison operation to perform between two
/// integer values.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum IntPredicate {
    /// equal
    Eq = 0,
    /// not equal
    Ne = 1,
    /// unsigned greater than
    Ugt = 2,
    /// unsigned greater or equal
    Uge = 3,
    /// unsigned less than
    Ult = 4,
    /// unsigned less or equal
    Ule = 5,
    /// signed greater than
    Sgt = 6,
    /// signed greater or equal
    Sge = 7,
    /// signed less than
    Slt = 8,
    /// signed less or equal
    Sle = 9,
}

impl IntPredicate {
    /// All predicates in ordinal order
    pub const ALL: [IntPredicate; 10] = [
        IntPredicate::Eq,
        IntPredicate::Ne,
        IntPredicate::Ugt,
        IntPredicate::Uge,
        IntPredicate::Ult,
        IntPredicate::Ule,
        IntPredicate::Sgt,
        IntPredicate::Sge,
        IntPredicate::Slt,
        IntPredicate::Sle,
    ];

    pub fn ordinal(self) -> u8 {
        self as u8
    }

    pub fn from_ordinal(ordinal: u8) -> Option<Self> {
        Self::ALL.get(usize::from(ordinal)).copied()
    }

    pub fn mnemonic(self) -> &'static str {
        match self {
            IntPredicate::Eq => "eq",
            IntPredicate::Ne => "ne",
            IntPredicate::Ugt => "ugt",
            IntPredicate::Uge => "uge",
            IntPredicate::Ult => "ult",
            IntPredicate::Ule => "ule",
            IntPredicate::Sgt => "sgt",
            IntPredicate::Sge => "sge",
            IntPredicate::Slt => "slt",
            IntPredicate::Sle => "sle",
        }
    }

    pub fn is_signed(self) -> bool {
        matches!(self, IntPredicate::Sgt | IntPredicate::Sge | IntPredicate::Slt | IntPredicate::Sle)
    }

    pub fn is_unsigned(self) -> bool {
        matches!(self, IntPredicate::Ugt | IntPredicate::Uge | IntPredicate::Ult | IntPredicate::Ule)
    }
}

impl fmt::Display for IntPredicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.mnemonic())
    }
}

impl FromStr for IntPredicate {
    type Err = IrError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|pred| pred.mnemonic() == s)
            .ok_or_else(|| IrError::UnknownPredicate { kind: "integer", text: s.to_string() })
    }
}

/// FloatPredicate specifies a comparison operation to perform between two
/// floating point values.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum FloatPredicate {
    /// no comparison, always returns false
    False = 0,
    /// ordered and equal
    Oeq = 1,
    /// ordered and greater than
    Ogt = 2,
    /// ordered and greater than or equal
    Oge = 3,
    /// ordered and less than
    Olt = 4,
    /// ordered and less than or equal
    Ole = 5,
    /// ordered and not equal
    One = 6,
    /// ordered (no nans)
    Ord = 7,
    /// unordered or equal
    Ueq = 8,
    /// unordered or greater than
    Ugt = 9,
    /// unordered or greater than or equal
    Uge = 10,
    /// unordered or less than
    Ult = 11,
    /// unordered or less than or equal
    Ule = 12,
    /// unordered or not equal
    Une = 13,
    /// unordered (either nans)
    Uno = 14,
    /// no comparison, always returns true
    True = 15,
}

impl FloatPredicate {
    /// All predicates in ordinal order
    pub const ALL: [FloatPredicate; 16] = [
        FloatPredicate::False,
        FloatPredicate::Oeq,
        FloatPredicate::Ogt,
        FloatPredicate::Oge,
        FloatPredicate::Olt,
        FloatPredicate::Ole,
        FloatPredicate::One,
        FloatPredicate::Ord,
        FloatPredicate::Ueq,
        FloatPredicate::Ugt,
        FloatPredicate::Uge,
        FloatPredicate::Ult,
        FloatPredicate::Ule,
        FloatPredicate::Une,
        FloatPredicate::Uno,
        FloatPredicate::True,
    ];

    pub fn ordinal(self) -> u8 {
        self as u8
    }

    pub fn from_ordinal(ordinal: u8) -> Option<Self> {
        Self::ALL.get(usize::from(ordinal)).copied()
    }

    pub fn mnemonic(self) -> &'static str {
        match self {
            FloatPredicate::False => "false",
            FloatPredicate::Oeq => "oeq",
            FloatPredicate::Ogt => "ogt",
            FloatPredicate::Oge => "oge",
            FloatPredicate::Olt => "olt",
            FloatPredicate::Ole => "ole",
            FloatPredicate::One => "one",
            FloatPredicate::Ord => "ord",
            FloatPredicate::Ueq => "ueq",
            FloatPredicate::Ugt => "ugt",
            FloatPredicate::Uge => "uge",
            FloatPredicate::Ult => "ult",
            FloatPredicate::Ule => "ule",
            FloatPredicate::Une => "une",
            FloatPredicate::Uno => "uno",
            FloatPredicate::True => "true",
        }
    }

    /// Ordered predicates yield false when either operand is a NaN.
    pub fn is_ordered(self) -> bool {
        matches!(
            self,
            FloatPredicate::Oeq
                | FloatPredicate::Ogt
                | FloatPredicate::Oge
                | FloatPredicate::Olt
                | FloatPredicate::Ole
                | FloatPredicate::One
                | FloatPredicate::Ord
        )
    }

    /// Unordered predicates yield true when either operand is a NaN.
    pub fn is_unordered(self) -> bool {
        matches!(
            self,
            FloatPredicate::Ueq
                | FloatPredicate::Ugt
                | FloatPredicate::Uge
                | FloatPredicate::Ult
                | FloatPredicate::Ule
                | FloatPredicate::Une
                | FloatPredicate::Uno
        )
    }
}

impl fmt::Display for FloatPredicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.mnemonic())
    }
}

impl FromStr for FloatPredicate {
    type Err = IrError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|pred| pred.mnemonic() == s)
            .ok_or_else(|| IrError::UnknownPredicate { kind: "floating point", text: s.to_string() })
    }
}

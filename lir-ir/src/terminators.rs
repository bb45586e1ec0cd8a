//! Terminators
//!
//! The instructions that end a basic block and transfer control. They are
//! values like everything else in a function body but are never part of
//! the [`Instruction`](crate::Instruction) set.

use lir_common::IrType;
use std::fmt;
use crate::values::{Value, ValueKind, ValueRef};

#[derive(Debug, Clone)]
pub enum Terminator {
    /// Return: ret <Type> <Val> or ret void
    Ret(Option<ValueRef>),

    /// Unconditional branch: br label <Target>
    Br { target: String },

    /// Conditional branch: br i1 <Cond>, label <IfTrue>, label <IfFalse>
    CondBr {
        cond: ValueRef,
        if_true: String,
        if_false: String,
    },

    /// Unreachable
    Unreachable,
}

impl Terminator {
    pub fn ret(value: ValueRef) -> Self {
        Terminator::Ret(Some(value))
    }

    pub fn ret_void() -> Self {
        Terminator::Ret(None)
    }

    pub fn br(target: &str) -> Self {
        Terminator::Br { target: target.to_string() }
    }

    pub fn cond_br(cond: ValueRef, if_true: &str, if_false: &str) -> Self {
        Terminator::CondBr {
            cond,
            if_true: if_true.to_string(),
            if_false: if_false.to_string(),
        }
    }

    pub fn operands(&self) -> Vec<&ValueRef> {
        match self {
            Terminator::Ret(Some(value)) => vec![value],
            Terminator::CondBr { cond, .. } => vec![cond],
            Terminator::Ret(None) | Terminator::Br { .. } | Terminator::Unreachable => Vec::new(),
        }
    }

    /// Labels control may continue at, in textual order. A conditional
    /// branch with identical targets yields the label once.
    pub fn successors(&self) -> Vec<&str> {
        match self {
            Terminator::Ret(_) | Terminator::Unreachable => Vec::new(),
            Terminator::Br { target } => vec![target.as_str()],
            Terminator::CondBr { if_true, if_false, .. } if if_true == if_false => {
                vec![if_true.as_str()]
            }
            Terminator::CondBr { if_true, if_false, .. } => {
                vec![if_true.as_str(), if_false.as_str()]
            }
        }
    }
}

impl Value for Terminator {
    fn ty(&self) -> IrType {
        IrType::Void
    }

    fn kind(&self) -> ValueKind {
        ValueKind::Terminator
    }
}

impl fmt::Display for Terminator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Terminator::Ret(Some(value)) => write!(f, "ret {} {value}", value.ty()),
            Terminator::Ret(None) => write!(f, "ret void"),
            Terminator::Br { target } => write!(f, "br label %{target}"),
            Terminator::CondBr { cond, if_true, if_false } => {
                write!(f, "br {} {cond}, label %{if_true}, label %{if_false}", cond.ty())
            }
            Terminator::Unreachable => write!(f, "unreachable"),
        }
    }
}

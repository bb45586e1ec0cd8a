//! IR Operations
//!
//! Fieldless mirrors of the instruction variants, used wherever a pass needs
//! to talk about an instruction kind without holding an instruction: tables,
//! dispatch, and the mnemonic boundary a parser goes through.

use serde::{Deserialize, Serialize};
use std::fmt;
use crate::error::IrError;

/// LangRef grouping of non-terminator instructions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    /// http://llvm.org/docs/LangRef.html#binaryops
    Binary,
    /// http://llvm.org/docs/LangRef.html#bitwiseops
    Bitwise,
    /// http://llvm.org/docs/LangRef.html#memoryops
    Memory,
    /// http://llvm.org/docs/LangRef.html#otherops
    Other,
}

/// Every instruction kind the IR can represent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Opcode {
    // Binary
    Add, Fadd, Sub, Fsub, Mul, Fmul,
    Udiv, Sdiv, Fdiv, Urem, Srem, Frem,

    // Bitwise
    Shl, Lshr, Ashr, And, Or, Xor,

    // Memory
    Alloca, Load, Store, Getelementptr,

    // Other
    Icmp, Fcmp, Phi,
}

/// Instruction mnemonics that exist in the LLVM language but have no node
/// kind here. A parser must refuse them rather than drop them.
const UNSUPPORTED_MNEMONICS: &[&str] = &[
    // vector
    "extractelement", "insertelement", "shufflevector",
    // aggregate
    "extractvalue", "insertvalue",
    // memory
    "fence", "cmpxchg", "atomicrmw",
    // conversion
    "trunc", "zext", "sext", "fptrunc", "fpext", "fptoui", "fptosi",
    "uitofp", "sitofp", "ptrtoint", "inttoptr", "bitcast", "addrspacecast",
    // other
    "select", "call", "va_arg", "landingpad",
];

const TERMINATOR_MNEMONICS: &[&str] = &[
    "ret", "br", "switch", "indirectbr", "invoke", "resume", "unreachable",
];

impl Opcode {
    pub const ALL: [Opcode; 25] = [
        Opcode::Add, Opcode::Fadd, Opcode::Sub, Opcode::Fsub, Opcode::Mul, Opcode::Fmul,
        Opcode::Udiv, Opcode::Sdiv, Opcode::Fdiv, Opcode::Urem, Opcode::Srem, Opcode::Frem,
        Opcode::Shl, Opcode::Lshr, Opcode::Ashr, Opcode::And, Opcode::Or, Opcode::Xor,
        Opcode::Alloca, Opcode::Load, Opcode::Store, Opcode::Getelementptr,
        Opcode::Icmp, Opcode::Fcmp, Opcode::Phi,
    ];

    pub fn mnemonic(self) -> &'static str {
        match self {
            Opcode::Add => "add",
            Opcode::Fadd => "fadd",
            Opcode::Sub => "sub",
            Opcode::Fsub => "fsub",
            Opcode::Mul => "mul",
            Opcode::Fmul => "fmul",
            Opcode::Udiv => "udiv",
            Opcode::Sdiv => "sdiv",
            Opcode::Fdiv => "fdiv",
            Opcode::Urem => "urem",
            Opcode::Srem => "srem",
            Opcode::Frem => "frem",
            Opcode::Shl => "shl",
            Opcode::Lshr => "lshr",
            Opcode::Ashr => "ashr",
            Opcode::And => "and",
            Opcode::Or => "or",
            Opcode::Xor => "xor",
            Opcode::Alloca => "alloca",
            Opcode::Load => "load",
            Opcode::Store => "store",
            Opcode::Getelementptr => "getelementptr",
            Opcode::Icmp => "icmp",
            Opcode::Fcmp => "fcmp",
            Opcode::Phi => "phi",
        }
    }

    pub fn category(self) -> Category {
        match self {
            Opcode::Add | Opcode::Fadd | Opcode::Sub | Opcode::Fsub | Opcode::Mul | Opcode::Fmul
            | Opcode::Udiv | Opcode::Sdiv | Opcode::Fdiv | Opcode::Urem | Opcode::Srem
            | Opcode::Frem => Category::Binary,
            Opcode::Shl | Opcode::Lshr | Opcode::Ashr | Opcode::And | Opcode::Or
            | Opcode::Xor => Category::Bitwise,
            Opcode::Alloca | Opcode::Load | Opcode::Store
            | Opcode::Getelementptr => Category::Memory,
            Opcode::Icmp | Opcode::Fcmp | Opcode::Phi => Category::Other,
        }
    }

    /// Operates on floating point (or vector of floating point) operands
    pub fn is_float_op(self) -> bool {
        matches!(
            self,
            Opcode::Fadd | Opcode::Fsub | Opcode::Fmul | Opcode::Fdiv | Opcode::Frem | Opcode::Fcmp
        )
    }

    /// Operates on integer (or vector of integer) operands
    pub fn is_integer_op(self) -> bool {
        match self.category() {
            Category::Binary => !self.is_float_op(),
            Category::Bitwise => true,
            Category::Memory => false,
            Category::Other => self == Opcode::Icmp,
        }
    }

    /// Instructions that are executed for their side effect and yield no value
    pub fn is_effect(self) -> bool {
        self == Opcode::Store
    }

    /// Resolve an instruction mnemonic.
    ///
    /// Recognised-but-unmodelled LLVM instructions and terminators get their
    /// own errors so that a front end can say what went wrong.
    pub fn from_mnemonic(mnemonic: &str) -> Result<Self, IrError> {
        if let Some(op) = Self::ALL.iter().copied().find(|op| op.mnemonic() == mnemonic) {
            return Ok(op);
        }

        let mnemonic = mnemonic.to_string();
        if UNSUPPORTED_MNEMONICS.contains(&mnemonic.as_str()) {
            Err(IrError::UnsupportedInstruction { mnemonic })
        } else if TERMINATOR_MNEMONICS.contains(&mnemonic.as_str()) {
            Err(IrError::NotAnInstruction { mnemonic })
        } else {
            Err(IrError::UnknownInstruction { mnemonic })
        }
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.mnemonic())
    }
}

/// The eighteen binary and bitwise kinds, the ones sharing the
/// `(Type, Op1, Op2)` shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BinaryOp {
    Add, Fadd, Sub, Fsub, Mul, Fmul,
    Udiv, Sdiv, Fdiv, Urem, Srem, Frem,
    Shl, Lshr, Ashr, And, Or, Xor,
}

impl BinaryOp {
    pub const ALL: [BinaryOp; 18] = [
        BinaryOp::Add, BinaryOp::Fadd, BinaryOp::Sub, BinaryOp::Fsub, BinaryOp::Mul, BinaryOp::Fmul,
        BinaryOp::Udiv, BinaryOp::Sdiv, BinaryOp::Fdiv, BinaryOp::Urem, BinaryOp::Srem, BinaryOp::Frem,
        BinaryOp::Shl, BinaryOp::Lshr, BinaryOp::Ashr, BinaryOp::And, BinaryOp::Or, BinaryOp::Xor,
    ];

    pub fn opcode(self) -> Opcode {
        match self {
            BinaryOp::Add => Opcode::Add,
            BinaryOp::Fadd => Opcode::Fadd,
            BinaryOp::Sub => Opcode::Sub,
            BinaryOp::Fsub => Opcode::Fsub,
            BinaryOp::Mul => Opcode::Mul,
            BinaryOp::Fmul => Opcode::Fmul,
            BinaryOp::Udiv => Opcode::Udiv,
            BinaryOp::Sdiv => Opcode::Sdiv,
            BinaryOp::Fdiv => Opcode::Fdiv,
            BinaryOp::Urem => Opcode::Urem,
            BinaryOp::Srem => Opcode::Srem,
            BinaryOp::Frem => Opcode::Frem,
            BinaryOp::Shl => Opcode::Shl,
            BinaryOp::Lshr => Opcode::Lshr,
            BinaryOp::Ashr => Opcode::Ashr,
            BinaryOp::And => Opcode::And,
            BinaryOp::Or => Opcode::Or,
            BinaryOp::Xor => Opcode::Xor,
        }
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.opcode().mnemonic())
    }
}

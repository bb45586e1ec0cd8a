//! LLVM-style SSA Intermediate Representation
//!
//! This crate defines the in-memory node model that a parser, verifier,
//! optimizer and code generator build on.
//!
//! ## Architecture
//!
//! The crate is structured as follows:
//! - `values` - The `Value` capability and leaf operands
//! - `predicates` - Integer and floating point comparison predicates
//! - `ops` - Opcodes, categories and the mnemonic boundary
//! - `instructions` - Non-terminator instructions
//! - `terminators` - Block terminators
//! - `blocks` - Basic blocks and predecessor computation
//! - `verify` - Checks the invariants constructors leave unchecked

// Public exports - clean API surface
pub use self::error::IrError;
pub use self::values::{Constant, Global, Local, Param, Value, ValueKind, ValueRef};
pub use self::predicates::{FloatPredicate, IntPredicate};
pub use self::ops::{BinaryOp, Category, Opcode};
pub use self::instructions::{
    AllocaInst, BinaryInst, FcmpInst, GepInst, IcmpInst, Instruction, LoadInst, PhiInst, StoreInst,
};
pub use self::terminators::Terminator;
pub use self::blocks::{predecessors, BasicBlock, Slot};
pub use self::verify::{verify_instruction, Verifier, VerifyError, VerifyOptions};
pub use lir_common::IrType;

mod error;
mod values;
mod predicates;
mod ops;
mod instructions;
mod terminators;
mod blocks;
pub mod verify;

#[cfg(test)]
mod tests;

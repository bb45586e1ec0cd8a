//! Errors raised at the textual boundary of the IR
//!
//! Building nodes never fails. These errors come from turning text
//! (mnemonics, predicate names) into node kinds, and from binding a
//! forward-declared name to its definition.

use lir_common::IrType;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IrError {
    #[error("unsupported instruction kind '{mnemonic}'")]
    UnsupportedInstruction { mnemonic: String },

    #[error("'{mnemonic}' is a terminator, not an instruction")]
    NotAnInstruction { mnemonic: String },

    #[error("unknown instruction '{mnemonic}'")]
    UnknownInstruction { mnemonic: String },

    #[error("unknown {kind} predicate '{text}'")]
    UnknownPredicate { kind: &'static str, text: String },

    #[error("%{name} is already bound to a definition")]
    AlreadyBound { name: String },

    #[error("%{name} was declared as {expected} but its definition has type {found}")]
    BindingTypeMismatch {
        name: String,
        expected: IrType,
        found: IrType,
    },
}

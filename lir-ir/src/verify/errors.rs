//! Verifier error types

use lir_common::IrType;
use thiserror::Error;
use crate::ops::Opcode;
use crate::values::ValueKind;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum VerifyError {
    #[error("{opcode}: {operand} has type {found}, expected {expected}")]
    OperandTypeMismatch {
        opcode: Opcode,
        operand: String,
        expected: IrType,
        found: IrType,
    },

    #[error("{opcode}: type {ty} is not {expected}")]
    InvalidOperandType {
        opcode: Opcode,
        ty: IrType,
        expected: &'static str,
    },

    #[error("{opcode}: alignment {align} is not a power of two")]
    InvalidAlignment { opcode: Opcode, align: u32 },

    #[error("alloca: element count must be at least 1, got {num_elems}")]
    InvalidElementCount { num_elems: u32 },

    #[error("getelementptr: empty index list")]
    EmptyIndexList,

    #[error("phi in %{block} has an entry for %{label}, which is not a predecessor")]
    UnresolvedPredecessor { block: String, label: String },

    #[error("phi in %{block} has no entry for predecessor %{label}")]
    MissingPhiEntry { block: String, label: String },

    #[error("{opcode} yields no value but is bound to %{name}")]
    NamedEffect { opcode: Opcode, name: String },

    #[error("{opcode}: operand is a {kind:?} definition, not a reference to one")]
    DefinitionAsOperand { opcode: Opcode, kind: ValueKind },

    #[error("%{name} is defined more than once")]
    DuplicateDefinition { name: String },

    #[error("%{name} is used but never defined")]
    UnboundLocal { name: String },

    #[error("block label %{label} is used by more than one block")]
    DuplicateBlockLabel { label: String },

    #[error("block %{block} has no terminator")]
    MissingTerminator { block: String },

    #[error("block %{block} branches to unknown block %{target}")]
    UnknownSuccessor { block: String, target: String },
}

impl VerifyError {
    /// Stable diagnostic code
    pub fn code(&self) -> &'static str {
        match self {
            VerifyError::OperandTypeMismatch { .. } => "operand-type-mismatch",
            VerifyError::InvalidOperandType { .. } => "invalid-operand-type",
            VerifyError::InvalidAlignment { .. } => "invalid-alignment",
            VerifyError::InvalidElementCount { .. } => "invalid-element-count",
            VerifyError::EmptyIndexList => "empty-index-list",
            VerifyError::UnresolvedPredecessor { .. } => "unresolved-predecessor",
            VerifyError::MissingPhiEntry { .. } => "missing-phi-entry",
            VerifyError::NamedEffect { .. } => "named-effect",
            VerifyError::DefinitionAsOperand { .. } => "definition-as-operand",
            VerifyError::DuplicateDefinition { .. } => "duplicate-definition",
            VerifyError::UnboundLocal { .. } => "unbound-local",
            VerifyError::DuplicateBlockLabel { .. } => "duplicate-block-label",
            VerifyError::MissingTerminator { .. } => "missing-terminator",
            VerifyError::UnknownSuccessor { .. } => "unknown-successor",
        }
    }
}

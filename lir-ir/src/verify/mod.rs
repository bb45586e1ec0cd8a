//! IR Verifier
//!
//! Node constructors accept ill-formed data on purpose. This pass is where
//! it gets rejected: operand/type agreement, alignment, element counts,
//! index lists, φ entries against the actual control-flow edges, names
//! used but never defined, and the basic shape of each block.

mod errors;
mod options;

pub use errors::VerifyError;
pub use options::VerifyOptions;

use lir_common::{Diagnostic, ErrorReporter, IrSite, IrType};
use log::debug;
use std::collections::BTreeSet;
use crate::blocks::{predecessors, BasicBlock};
use crate::instructions::Instruction;
use crate::ops::Opcode;
use crate::values::ValueRef;

fn expect_type(errors: &mut Vec<VerifyError>, opcode: Opcode, operand: &str, expected: &IrType, value: &ValueRef) {
    let found = value.ty();
    if &found != expected {
        errors.push(VerifyError::OperandTypeMismatch {
            opcode,
            operand: operand.to_string(),
            expected: expected.clone(),
            found,
        });
    }
}

fn check_bound(errors: &mut Vec<VerifyError>, value: &ValueRef) {
    if let Some(local) = value.as_local() {
        if !local.is_bound() {
            errors.push(VerifyError::UnboundLocal { name: local.name().to_string() });
        }
    }
}

fn check_align(errors: &mut Vec<VerifyError>, opcode: Opcode, align: u32) {
    if align != 0 && !align.is_power_of_two() {
        errors.push(VerifyError::InvalidAlignment { opcode, align });
    }
}

/// Check one instruction in isolation. Returns every problem found, in
/// the order the fields appear in the instruction.
pub fn verify_instruction(inst: &Instruction, options: &VerifyOptions) -> Vec<VerifyError> {
    let mut errors = Vec::new();
    let opcode = inst.opcode();

    for operand in inst.operands() {
        check_bound(&mut errors, operand);
    }

    if options.check_operand_kinds {
        for operand in inst.operands() {
            let kind = operand.kind();
            if kind.is_node() {
                errors.push(VerifyError::DefinitionAsOperand { opcode, kind });
            }
        }
    }

    match inst {
        Instruction::Alloca(alloca) => {
            if alloca.num_elems() < 1 {
                errors.push(VerifyError::InvalidElementCount { num_elems: alloca.num_elems() });
            }
            check_align(&mut errors, opcode, alloca.align());
        }
        Instruction::Load(load) => {
            expect_type(&mut errors, opcode, "address", &IrType::ptr_to(load.ty().clone()), load.addr());
            check_align(&mut errors, opcode, load.align());
        }
        Instruction::Store(store) => {
            expect_type(&mut errors, opcode, "stored value", store.ty(), store.val());
            expect_type(&mut errors, opcode, "address", &IrType::ptr_to(store.ty().clone()), store.addr());
            check_align(&mut errors, opcode, store.align());
        }
        Instruction::Getelementptr(gep) => {
            expect_type(&mut errors, opcode, "base pointer", &IrType::ptr_to(gep.ty().clone()), gep.ptr());
            if gep.indices().is_empty() && !options.allow_empty_gep {
                errors.push(VerifyError::EmptyIndexList);
            }
        }
        Instruction::Icmp(cmp) => {
            let ty = cmp.operand_type();
            if !ty.is_int_or_int_vector() && !ty.is_ptr_or_ptr_vector() {
                errors.push(VerifyError::InvalidOperandType {
                    opcode,
                    ty: ty.clone(),
                    expected: "an integer, pointer, or vector of them",
                });
            }
            expect_type(&mut errors, opcode, "first operand", ty, cmp.op1());
            expect_type(&mut errors, opcode, "second operand", ty, cmp.op2());
        }
        Instruction::Fcmp(cmp) => {
            let ty = cmp.operand_type();
            if !ty.is_float_or_float_vector() {
                errors.push(VerifyError::InvalidOperandType {
                    opcode,
                    ty: ty.clone(),
                    expected: "a floating point type or vector of them",
                });
            }
            expect_type(&mut errors, opcode, "first operand", ty, cmp.op1());
            expect_type(&mut errors, opcode, "second operand", ty, cmp.op2());
        }
        Instruction::Phi(phi) => {
            for (label, value) in phi.iter() {
                expect_type(&mut errors, opcode, &format!("value from %{label}"), phi.ty(), value);
            }
        }
        other => {
            if let Some(binary) = other.as_binary() {
                let ty = binary.ty();
                if opcode.is_float_op() && !ty.is_float_or_float_vector() {
                    errors.push(VerifyError::InvalidOperandType {
                        opcode,
                        ty: ty.clone(),
                        expected: "a floating point type or vector of them",
                    });
                } else if opcode.is_integer_op() && !ty.is_int_or_int_vector() {
                    errors.push(VerifyError::InvalidOperandType {
                        opcode,
                        ty: ty.clone(),
                        expected: "an integer type or vector of them",
                    });
                }
                expect_type(&mut errors, opcode, "first operand", ty, binary.op1());
                expect_type(&mut errors, opcode, "second operand", ty, binary.op2());
            }
        }
    }

    errors
}

/// Walks blocks and records what it finds as diagnostics
pub struct Verifier {
    options: VerifyOptions,
    reporter: ErrorReporter,
}

impl Verifier {
    pub fn new(options: VerifyOptions) -> Self {
        Self {
            options,
            reporter: ErrorReporter::new(),
        }
    }

    pub fn options(&self) -> &VerifyOptions {
        &self.options
    }

    pub fn reporter(&self) -> &ErrorReporter {
        &self.reporter
    }

    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.reporter.into_diagnostics()
    }

    fn report(&mut self, err: VerifyError, site: IrSite) {
        debug!("{site}: {err}");
        self.reporter.error(err.code(), err.to_string(), site);
    }

    /// Verify the blocks of one function body. Returns true if no errors
    /// were reported by this call.
    pub fn verify_blocks(&mut self, blocks: &[BasicBlock]) -> bool {
        let before = self.reporter.error_count();
        let preds = predecessors(blocks);
        let mut labels: BTreeSet<&str> = BTreeSet::new();
        for block in blocks {
            if !labels.insert(block.label()) {
                let err = VerifyError::DuplicateBlockLabel { label: block.label().to_string() };
                self.report(err, IrSite::block(block.label()));
            }
        }
        let mut defined: BTreeSet<&str> = BTreeSet::new();

        for block in blocks {
            for (index, slot) in block.slots().iter().enumerate() {
                if let Some(name) = &slot.name {
                    if !defined.insert(name.as_str()) {
                        let err = VerifyError::DuplicateDefinition { name: name.clone() };
                        self.report(err, IrSite::new(block.label(), index));
                    }
                }
            }

            for target in block.successors() {
                if !labels.contains(target) {
                    let err = VerifyError::UnknownSuccessor {
                        block: block.label().to_string(),
                        target: target.to_string(),
                    };
                    self.report(err, IrSite::block(block.label()));
                }
            }

            let block_preds = preds.get(block.label()).map_or(&[][..], Vec::as_slice);
            self.verify_block(block, block_preds);
        }

        let errors = self.reporter.error_count() - before;
        debug!("verified {} blocks: {} errors", blocks.len(), errors);
        errors == 0
    }

    /// Verify one block given the labels of its predecessors
    pub fn verify_block(&mut self, block: &BasicBlock, preds: &[String]) {
        let label = block.label();
        debug!("verifying %{label} ({} instructions, {} predecessors)", block.slots().len(), preds.len());

        for (index, slot) in block.slots().iter().enumerate() {
            let site = IrSite::new(label, index);

            for err in verify_instruction(&slot.inst, &self.options) {
                self.report(err, site.clone());
            }

            if let (Some(name), false) = (&slot.name, slot.inst.produces_value()) {
                let err = VerifyError::NamedEffect { opcode: slot.inst.opcode(), name: name.clone() };
                self.report(err, site.clone());
            }

            if let Instruction::Phi(phi) = slot.inst.as_ref() {
                for pred in preds {
                    if phi.incoming(pred).is_none() {
                        let err = VerifyError::MissingPhiEntry {
                            block: label.to_string(),
                            label: pred.clone(),
                        };
                        self.report(err, site.clone());
                    }
                }
                for incoming in phi.labels() {
                    if !preds.iter().any(|pred| pred == incoming) {
                        let err = VerifyError::UnresolvedPredecessor {
                            block: label.to_string(),
                            label: incoming.to_string(),
                        };
                        self.report(err, site.clone());
                    }
                }
            }
        }

        if let Some(terminator) = block.terminator() {
            let mut errors = Vec::new();
            for operand in terminator.operands() {
                check_bound(&mut errors, operand);
            }
            for err in errors {
                self.report(err, IrSite::block(label));
            }
        }

        if self.options.require_terminator && !block.has_terminator() {
            let err = VerifyError::MissingTerminator { block: label.to_string() };
            self.report(err, IrSite::block(label));
        }
    }
}

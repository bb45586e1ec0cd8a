//! Basic Block Management
//!
//! Defines basic blocks - straight-line instruction sequences ending in
//! exactly one terminator. A block owns its instructions; operands
//! elsewhere refer to them through shared links.

use lir_common::IrType;
use log::trace;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use crate::error::IrError;
use crate::instructions::Instruction;
use crate::terminators::Terminator;
use crate::values::{Local, Value, ValueKind, ValueRef};

/// An instruction placed in a block, with the result name the block gave it
#[derive(Debug, Clone)]
pub struct Slot {
    pub name: Option<String>,
    pub inst: Arc<Instruction>,
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.name {
            Some(name) if self.inst.produces_value() => write!(f, "%{name} = {}", self.inst),
            _ => write!(f, "{}", self.inst),
        }
    }
}

/// Basic Block - a sequence of instructions with a single entry and exit
#[derive(Debug, Clone)]
pub struct BasicBlock {
    label: String,
    slots: Vec<Slot>,
    terminator: Option<Terminator>,
}

impl BasicBlock {
    pub fn new(label: &str) -> Self {
        Self {
            label: label.to_string(),
            slots: Vec::new(),
            terminator: None,
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Append an instruction whose result (if any) is not referenced by name
    pub fn push(&mut self, inst: Instruction) -> Arc<Instruction> {
        let inst = Arc::new(inst);
        trace!("%{}: push {}", self.label, inst);
        self.slots.push(Slot { name: None, inst: Arc::clone(&inst) });
        inst
    }

    /// Append an instruction and bind its result to `%name`; the returned
    /// value is the operand later instructions use to refer to it.
    pub fn push_named(&mut self, name: &str, inst: Instruction) -> ValueRef {
        let inst = Arc::new(inst);
        trace!("%{}: push %{} = {}", self.label, name, inst);
        let local = Arc::new(Local::new(name, &inst));
        self.slots.push(Slot { name: Some(name.to_string()), inst });
        local
    }

    /// Append the definition of a forward-declared `local`. Operands that
    /// already hold `local` see the instruction from here on.
    pub fn push_bound(&mut self, local: &Local, inst: Instruction) -> Result<(), IrError> {
        let inst = Arc::new(inst);
        local.bind(&inst)?;
        trace!("%{}: push %{} = {} (bound)", self.label, local.name(), inst);
        self.slots.push(Slot { name: Some(local.name().to_string()), inst });
        Ok(())
    }

    /// Set the terminator, returning the one it replaced
    pub fn terminate(&mut self, terminator: Terminator) -> Option<Terminator> {
        self.terminator.replace(terminator)
    }

    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    pub fn instructions(&self) -> impl Iterator<Item = &Arc<Instruction>> {
        self.slots.iter().map(|slot| &slot.inst)
    }

    pub fn terminator(&self) -> Option<&Terminator> {
        self.terminator.as_ref()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty() && self.terminator.is_none()
    }

    pub fn has_terminator(&self) -> bool {
        self.terminator.is_some()
    }

    pub fn successors(&self) -> Vec<&str> {
        self.terminator.as_ref().map_or_else(Vec::new, Terminator::successors)
    }
}

impl Value for BasicBlock {
    fn ty(&self) -> IrType {
        IrType::Label
    }

    fn kind(&self) -> ValueKind {
        ValueKind::BasicBlock
    }
}

impl fmt::Display for BasicBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}:", self.label)?;
        for slot in &self.slots {
            writeln!(f, "  {slot}")?;
        }
        if let Some(terminator) = &self.terminator {
            writeln!(f, "  {terminator}")?;
        }
        Ok(())
    }
}

/// Predecessor labels of every block, derived from the terminators.
///
/// Each block gets an entry even when nothing branches to it; predecessors
/// are listed in block order.
pub fn predecessors(blocks: &[BasicBlock]) -> BTreeMap<String, Vec<String>> {
    let mut preds: BTreeMap<String, Vec<String>> = blocks
        .iter()
        .map(|block| (block.label.clone(), Vec::new()))
        .collect();

    for block in blocks {
        for succ in block.successors() {
            let entry = preds.entry(succ.to_string()).or_default();
            if !entry.iter().any(|pred| pred == &block.label) {
                entry.push(block.label.clone());
            }
        }
    }

    preds
}

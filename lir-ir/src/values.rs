//! IR Value Representations
//!
//! Anything that can appear as an operand implements [`Value`]. Operands are
//! held as [`ValueRef`]s, shared links into the graph that never own the
//! lifetime of the node they point at in any structural sense.

use lir_common::IrType;
use std::fmt;
use std::sync::{Arc, OnceLock, Weak};
use crate::error::IrError;
use crate::instructions::Instruction;

/// A computed value that may be used as an operand of other values.
///
/// `Display` renders the node itself. For leaf operands (constants,
/// parameters, globals, named results) that is the operand spelling
/// (`42`, `%x`, `@g`); for instructions, terminators and blocks it is
/// their full textual form.
pub trait Value: fmt::Display + fmt::Debug + Send + Sync {
    /// Returns the type of the value.
    fn ty(&self) -> IrType;

    /// Which family of values this is.
    fn kind(&self) -> ValueKind;

    /// The named-result view of this value, if it is one.
    fn as_local(&self) -> Option<&Local> {
        None
    }
}

/// Shared operand link
pub type ValueRef = Arc<dyn Value>;

/// The families of values. `Instruction`, `Terminator` and `BasicBlock` are
/// the IR nodes proper and are pairwise disjoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Constant,
    Param,
    Global,
    Local,
    Instruction,
    Terminator,
    BasicBlock,
}

impl ValueKind {
    pub fn is_instruction(self) -> bool {
        self == ValueKind::Instruction
    }

    pub fn is_terminator(self) -> bool {
        self == ValueKind::Terminator
    }

    /// True for the node kinds a function body is made of.
    pub fn is_node(self) -> bool {
        matches!(self, ValueKind::Instruction | ValueKind::Terminator | ValueKind::BasicBlock)
    }
}

/// Constant operands
#[derive(Debug, Clone, PartialEq)]
pub enum Constant {
    /// Integer constant of an integer type
    Int { ty: IrType, value: i64 },

    /// Floating point constant
    Float { ty: IrType, value: f64 },

    /// Null pointer of a pointer type
    Null(IrType),

    /// Undefined value
    Undef(IrType),
}

impl Constant {
    pub fn int(ty: IrType, value: i64) -> ValueRef {
        Arc::new(Constant::Int { ty, value })
    }

    pub fn float(ty: IrType, value: f64) -> ValueRef {
        Arc::new(Constant::Float { ty, value })
    }

    pub fn null(ty: IrType) -> ValueRef {
        Arc::new(Constant::Null(ty))
    }

    pub fn undef(ty: IrType) -> ValueRef {
        Arc::new(Constant::Undef(ty))
    }
}

impl Value for Constant {
    fn ty(&self) -> IrType {
        match self {
            Constant::Int { ty, .. } | Constant::Float { ty, .. } => ty.clone(),
            Constant::Null(ty) | Constant::Undef(ty) => ty.clone(),
        }
    }

    fn kind(&self) -> ValueKind {
        ValueKind::Constant
    }
}

impl fmt::Display for Constant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Constant::Int { ty: IrType::Int(1), value } => {
                write!(f, "{}", if *value != 0 { "true" } else { "false" })
            }
            Constant::Int { value, .. } => write!(f, "{value}"),
            Constant::Float { ty, value } => write_float(f, ty, *value),
            Constant::Null(_) => write!(f, "null"),
            Constant::Undef(_) => write!(f, "undef"),
        }
    }
}

/// Shortest decimal that reads back to the same bits, always with a
/// fraction dot. Non-finite values, and `float` constants that do not fit
/// in single precision, use the hexadecimal bit pattern of the double.
fn write_float(f: &mut fmt::Formatter<'_>, ty: &IrType, value: f64) -> fmt::Result {
    let exact = value.is_finite() && (*ty != IrType::Float || f64::from(value as f32) == value);
    if !exact {
        return write!(f, "0x{:016X}", value.to_bits());
    }

    let text = format!("{value:e}");
    match text.split_once('e') {
        Some((mantissa, exp)) if !mantissa.contains('.') => write!(f, "{mantissa}.0e{exp}"),
        _ => f.write_str(&text),
    }
}

/// Function parameter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Param {
    pub name: String,
    pub ty: IrType,
}

impl Param {
    pub fn value(name: &str, ty: IrType) -> ValueRef {
        Arc::new(Param { name: name.to_string(), ty })
    }
}

impl Value for Param {
    fn ty(&self) -> IrType {
        self.ty.clone()
    }

    fn kind(&self) -> ValueKind {
        ValueKind::Param
    }
}

impl fmt::Display for Param {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "%{}", self.name)
    }
}

/// Global symbol reference. `ty` is the type of the reference itself,
/// normally a pointer to the global's content type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Global {
    pub name: String,
    pub ty: IrType,
}

impl Global {
    pub fn value(name: &str, ty: IrType) -> ValueRef {
        Arc::new(Global { name: name.to_string(), ty })
    }
}

impl Value for Global {
    fn ty(&self) -> IrType {
        self.ty.clone()
    }

    fn kind(&self) -> ValueKind {
        ValueKind::Global
    }
}

impl fmt::Display for Global {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "@{}", self.name)
    }
}

/// A named instruction result, `%name`.
///
/// The container binds the name; the instruction itself never knows it.
/// Other instructions use a `Local` (not the instruction) as their operand.
///
/// A `Local` may be declared before its definition exists, which is how a
/// φ refers to a value computed later in a loop body. It is bound once,
/// when the block places the defining instruction
/// (see [`BasicBlock::push_bound`](crate::BasicBlock::push_bound)). The
/// link is weak: blocks own their instructions.
#[derive(Debug, Clone)]
pub struct Local {
    name: String,
    ty: IrType,
    def: OnceLock<Weak<Instruction>>,
}

impl Local {
    /// A name bound to an already placed instruction
    pub fn new(name: &str, inst: &Arc<Instruction>) -> Self {
        Self {
            name: name.to_string(),
            ty: inst.ty(),
            def: OnceLock::from(Arc::downgrade(inst)),
        }
    }

    /// A name whose definition has not been placed yet
    pub fn forward(name: &str, ty: IrType) -> Self {
        Self {
            name: name.to_string(),
            ty,
            def: OnceLock::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_bound(&self) -> bool {
        self.def.get().is_some()
    }

    /// The defining instruction, while the block holding it is alive
    pub fn inst(&self) -> Option<Arc<Instruction>> {
        self.def.get().and_then(Weak::upgrade)
    }

    pub(crate) fn bind(&self, inst: &Arc<Instruction>) -> Result<(), IrError> {
        let found = inst.ty();
        if found != self.ty {
            return Err(IrError::BindingTypeMismatch {
                name: self.name.clone(),
                expected: self.ty.clone(),
                found,
            });
        }
        self.def
            .set(Arc::downgrade(inst))
            .map_err(|_| IrError::AlreadyBound { name: self.name.clone() })
    }
}

impl Value for Local {
    fn ty(&self) -> IrType {
        self.ty.clone()
    }

    fn kind(&self) -> ValueKind {
        ValueKind::Local
    }

    fn as_local(&self) -> Option<&Local> {
        Some(self)
    }
}

impl fmt::Display for Local {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "%{}", self.name)
    }
}

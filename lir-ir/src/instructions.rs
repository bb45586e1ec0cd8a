//! IR Instructions
//!
//! Defines the non-terminator instruction kinds. An instruction performs a
//! non-branching operation and belongs to one of the LangRef groups
//! (binary, bitwise binary, memory, other).
//!
//! Nodes are plain records. Constructors accept anything: operand/type
//! agreement, alignment and φ completeness are checked by
//! [`crate::verify`], so half-built graphs (a parser that has not yet seen
//! every block) stay representable.

use lir_common::IrType;
use std::collections::BTreeMap;
use std::fmt;
use crate::ops::{BinaryOp, Category, Opcode};
use crate::predicates::{FloatPredicate, IntPredicate};
use crate::values::{Value, ValueKind, ValueRef};
use crate::verify::{verify_instruction, VerifyError, VerifyOptions};

/// Shape shared by every binary and bitwise binary instruction.
///
/// Syntax:
///    <Result> = <op> <Type> <Op1>, <Op2>
#[derive(Debug, Clone)]
pub struct BinaryInst {
    ty: IrType,
    op1: ValueRef,
    op2: ValueRef,
}

impl BinaryInst {
    pub fn new(ty: IrType, op1: ValueRef, op2: ValueRef) -> Self {
        Self { ty, op1, op2 }
    }

    /// Operand type
    pub fn ty(&self) -> &IrType {
        &self.ty
    }

    pub fn op1(&self) -> &ValueRef {
        &self.op1
    }

    pub fn op2(&self) -> &ValueRef {
        &self.op2
    }
}

/// Allocates memory on the stack frame of the current function.
///
/// Syntax:
///    <Result> = alloca <Type> [, <Type> <NumElems> ] [, align <Align> ]
#[derive(Debug, Clone)]
pub struct AllocaInst {
    ty: IrType,
    num_elems: u32,
    align: u32,
}

impl AllocaInst {
    /// One element, default alignment.
    pub fn new(ty: IrType) -> Self {
        Self { ty, num_elems: 1, align: 0 }
    }

    pub fn with_num_elems(mut self, num_elems: u32) -> Self {
        self.num_elems = num_elems;
        self
    }

    pub fn with_align(mut self, align: u32) -> Self {
        self.align = align;
        self
    }

    /// Allocated element type
    pub fn ty(&self) -> &IrType {
        &self.ty
    }

    pub fn num_elems(&self) -> u32 {
        self.num_elems
    }

    /// 0 means the target's default alignment
    pub fn align(&self) -> u32 {
        self.align
    }
}

/// Reads from memory.
///
/// Syntax:
///    <Result> = load <Type>* <Addr> [, align <Align> ]
#[derive(Debug, Clone)]
pub struct LoadInst {
    ty: IrType,
    addr: ValueRef,
    align: u32,
}

impl LoadInst {
    pub fn new(ty: IrType, addr: ValueRef) -> Self {
        Self { ty, addr, align: 0 }
    }

    pub fn with_align(mut self, align: u32) -> Self {
        self.align = align;
        self
    }

    /// Pointee type
    pub fn ty(&self) -> &IrType {
        &self.ty
    }

    pub fn addr(&self) -> &ValueRef {
        &self.addr
    }

    pub fn align(&self) -> u32 {
        self.align
    }
}

/// Writes to memory. Yields no value.
///
/// Syntax:
///    store <Type> <Val>, <Type>* <Addr> [, align <Align> ]
#[derive(Debug, Clone)]
pub struct StoreInst {
    ty: IrType,
    val: ValueRef,
    addr: ValueRef,
    align: u32,
}

impl StoreInst {
    pub fn new(ty: IrType, val: ValueRef, addr: ValueRef) -> Self {
        Self { ty, val, addr, align: 0 }
    }

    pub fn with_align(mut self, align: u32) -> Self {
        self.align = align;
        self
    }

    /// Type of the stored value
    pub fn ty(&self) -> &IrType {
        &self.ty
    }

    pub fn val(&self) -> &ValueRef {
        &self.val
    }

    pub fn addr(&self) -> &ValueRef {
        &self.addr
    }

    pub fn align(&self) -> u32 {
        self.align
    }
}

/// Computes the address of a subelement of an aggregate. Address
/// arithmetic only, memory is never touched.
///
/// Syntax:
///    <Result> = getelementptr <Type>* <Ptr> {, <Type> <Idx>}*
///
/// The first index steps over the pointer itself, each following index
/// selects a field or element of the aggregate reached so far, so index
/// order is significant.
#[derive(Debug, Clone)]
pub struct GepInst {
    ty: IrType,
    ptr: ValueRef,
    indices: Vec<i64>,
    result_ty: Option<IrType>,
}

impl GepInst {
    pub fn new(ty: IrType, ptr: ValueRef, indices: Vec<i64>) -> Self {
        Self { ty, ptr, indices, result_ty: None }
    }

    /// Declare the type of the computed address. Without it the result is
    /// typed as the base pointer `Type*`; the IR never walks the aggregate
    /// to find the addressed element.
    pub fn with_result_type(mut self, result_ty: IrType) -> Self {
        self.result_ty = Some(result_ty);
        self
    }

    /// Base pointee type
    pub fn ty(&self) -> &IrType {
        &self.ty
    }

    pub fn ptr(&self) -> &ValueRef {
        &self.ptr
    }

    pub fn indices(&self) -> &[i64] {
        &self.indices
    }

    pub fn result_type(&self) -> IrType {
        self.result_ty.clone().unwrap_or_else(|| IrType::ptr_to(self.ty.clone()))
    }
}

/// Compares integer (or pointer) values.
///
/// Syntax:
///    <Result> = icmp <Pred> <Type> <Op1>, <Op2>
#[derive(Debug, Clone)]
pub struct IcmpInst {
    pred: IntPredicate,
    ty: IrType,
    op1: ValueRef,
    op2: ValueRef,
}

impl IcmpInst {
    pub fn new(pred: IntPredicate, ty: IrType, op1: ValueRef, op2: ValueRef) -> Self {
        Self { pred, ty, op1, op2 }
    }

    pub fn pred(&self) -> IntPredicate {
        self.pred
    }

    /// Type of the compared operands
    pub fn operand_type(&self) -> &IrType {
        &self.ty
    }

    pub fn op1(&self) -> &ValueRef {
        &self.op1
    }

    pub fn op2(&self) -> &ValueRef {
        &self.op2
    }
}

/// Compares floating point values.
///
/// Syntax:
///    <Result> = fcmp <Pred> <Type> <Op1>, <Op2>
#[derive(Debug, Clone)]
pub struct FcmpInst {
    pred: FloatPredicate,
    ty: IrType,
    op1: ValueRef,
    op2: ValueRef,
}

impl FcmpInst {
    pub fn new(pred: FloatPredicate, ty: IrType, op1: ValueRef, op2: ValueRef) -> Self {
        Self { pred, ty, op1, op2 }
    }

    pub fn pred(&self) -> FloatPredicate {
        self.pred
    }

    /// Type of the compared operands
    pub fn operand_type(&self) -> &IrType {
        &self.ty
    }

    pub fn op1(&self) -> &ValueRef {
        &self.op1
    }

    pub fn op2(&self) -> &ValueRef {
        &self.op2
    }
}

/// φ node: selects the incoming value of the edge control arrived along.
///
/// Syntax:
///    <Result> = phi <Type> [ <Val0>, <Label0> ], ...
///
/// Keyed by predecessor label; one entry per label, a repeated label
/// replaces the earlier value. Entries are kept in label order so the
/// rendering does not depend on insertion order.
#[derive(Debug, Clone)]
pub struct PhiInst {
    ty: IrType,
    preds: BTreeMap<String, ValueRef>,
}

impl PhiInst {
    pub fn new(ty: IrType) -> Self {
        Self { ty, preds: BTreeMap::new() }
    }

    pub fn with_incoming(mut self, label: &str, value: ValueRef) -> Self {
        self.insert(label, value);
        self
    }

    /// Set the value for `label`, returning the one it replaced.
    pub fn insert(&mut self, label: &str, value: ValueRef) -> Option<ValueRef> {
        self.preds.insert(label.to_string(), value)
    }

    /// Incoming value along the edge from `label` (exact match)
    pub fn incoming(&self, label: &str) -> Option<&ValueRef> {
        self.preds.get(label)
    }

    pub fn ty(&self) -> &IrType {
        &self.ty
    }

    pub fn len(&self) -> usize {
        self.preds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.preds.is_empty()
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.preds.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ValueRef)> {
        self.preds.iter().map(|(label, value)| (label.as_str(), value))
    }
}

impl<S: AsRef<str>> FromIterator<(S, ValueRef)> for PhiInst {
    /// Collects into a φ whose type is taken from the first incoming value;
    /// an empty φ is typed `void`.
    fn from_iter<I: IntoIterator<Item = (S, ValueRef)>>(iter: I) -> Self {
        let mut preds = BTreeMap::new();
        for (label, value) in iter {
            preds.insert(label.as_ref().to_string(), value);
        }
        let ty = preds.values().next().map_or(IrType::Void, |value| value.ty());
        Self { ty, preds }
    }
}

/// IR Instruction
#[derive(Debug, Clone)]
pub enum Instruction {
    // Binary operations
    Add(BinaryInst),
    Fadd(BinaryInst),
    Sub(BinaryInst),
    Fsub(BinaryInst),
    Mul(BinaryInst),
    Fmul(BinaryInst),
    Udiv(BinaryInst),
    Sdiv(BinaryInst),
    Fdiv(BinaryInst),
    Urem(BinaryInst),
    Srem(BinaryInst),
    Frem(BinaryInst),

    // Bitwise binary operations
    Shl(BinaryInst),
    Lshr(BinaryInst),
    Ashr(BinaryInst),
    And(BinaryInst),
    Or(BinaryInst),
    Xor(BinaryInst),

    // Memory access and addressing operations
    Alloca(AllocaInst),
    Load(LoadInst),
    Store(StoreInst),
    Getelementptr(GepInst),

    // Other operations
    Icmp(IcmpInst),
    Fcmp(FcmpInst),
    Phi(PhiInst),
}

macro_rules! binary_constructors {
    ($($name:ident => $variant:ident),* $(,)?) => {
        $(
            pub fn $name(ty: IrType, op1: ValueRef, op2: ValueRef) -> Self {
                Instruction::$variant(BinaryInst::new(ty, op1, op2))
            }
        )*
    };
}

impl Instruction {
    binary_constructors! {
        add => Add, fadd => Fadd, sub => Sub, fsub => Fsub, mul => Mul, fmul => Fmul,
        udiv => Udiv, sdiv => Sdiv, fdiv => Fdiv, urem => Urem, srem => Srem, frem => Frem,
        shl => Shl, lshr => Lshr, ashr => Ashr, and => And, or => Or, xor => Xor,
    }

    /// Build any of the binary or bitwise kinds from its operator
    pub fn binary(op: BinaryOp, ty: IrType, op1: ValueRef, op2: ValueRef) -> Self {
        let inst = BinaryInst::new(ty, op1, op2);
        match op {
            BinaryOp::Add => Instruction::Add(inst),
            BinaryOp::Fadd => Instruction::Fadd(inst),
            BinaryOp::Sub => Instruction::Sub(inst),
            BinaryOp::Fsub => Instruction::Fsub(inst),
            BinaryOp::Mul => Instruction::Mul(inst),
            BinaryOp::Fmul => Instruction::Fmul(inst),
            BinaryOp::Udiv => Instruction::Udiv(inst),
            BinaryOp::Sdiv => Instruction::Sdiv(inst),
            BinaryOp::Fdiv => Instruction::Fdiv(inst),
            BinaryOp::Urem => Instruction::Urem(inst),
            BinaryOp::Srem => Instruction::Srem(inst),
            BinaryOp::Frem => Instruction::Frem(inst),
            BinaryOp::Shl => Instruction::Shl(inst),
            BinaryOp::Lshr => Instruction::Lshr(inst),
            BinaryOp::Ashr => Instruction::Ashr(inst),
            BinaryOp::And => Instruction::And(inst),
            BinaryOp::Or => Instruction::Or(inst),
            BinaryOp::Xor => Instruction::Xor(inst),
        }
    }

    pub fn alloca(ty: IrType) -> Self {
        Instruction::Alloca(AllocaInst::new(ty))
    }

    pub fn load(ty: IrType, addr: ValueRef) -> Self {
        Instruction::Load(LoadInst::new(ty, addr))
    }

    pub fn store(ty: IrType, val: ValueRef, addr: ValueRef) -> Self {
        Instruction::Store(StoreInst::new(ty, val, addr))
    }

    pub fn getelementptr(ty: IrType, ptr: ValueRef, indices: Vec<i64>) -> Self {
        Instruction::Getelementptr(GepInst::new(ty, ptr, indices))
    }

    pub fn icmp(pred: IntPredicate, ty: IrType, op1: ValueRef, op2: ValueRef) -> Self {
        Instruction::Icmp(IcmpInst::new(pred, ty, op1, op2))
    }

    pub fn fcmp(pred: FloatPredicate, ty: IrType, op1: ValueRef, op2: ValueRef) -> Self {
        Instruction::Fcmp(FcmpInst::new(pred, ty, op1, op2))
    }

    pub fn opcode(&self) -> Opcode {
        match self {
            Instruction::Add(_) => Opcode::Add,
            Instruction::Fadd(_) => Opcode::Fadd,
            Instruction::Sub(_) => Opcode::Sub,
            Instruction::Fsub(_) => Opcode::Fsub,
            Instruction::Mul(_) => Opcode::Mul,
            Instruction::Fmul(_) => Opcode::Fmul,
            Instruction::Udiv(_) => Opcode::Udiv,
            Instruction::Sdiv(_) => Opcode::Sdiv,
            Instruction::Fdiv(_) => Opcode::Fdiv,
            Instruction::Urem(_) => Opcode::Urem,
            Instruction::Srem(_) => Opcode::Srem,
            Instruction::Frem(_) => Opcode::Frem,
            Instruction::Shl(_) => Opcode::Shl,
            Instruction::Lshr(_) => Opcode::Lshr,
            Instruction::Ashr(_) => Opcode::Ashr,
            Instruction::And(_) => Opcode::And,
            Instruction::Or(_) => Opcode::Or,
            Instruction::Xor(_) => Opcode::Xor,
            Instruction::Alloca(_) => Opcode::Alloca,
            Instruction::Load(_) => Opcode::Load,
            Instruction::Store(_) => Opcode::Store,
            Instruction::Getelementptr(_) => Opcode::Getelementptr,
            Instruction::Icmp(_) => Opcode::Icmp,
            Instruction::Fcmp(_) => Opcode::Fcmp,
            Instruction::Phi(_) => Opcode::Phi,
        }
    }

    pub fn category(&self) -> Category {
        self.opcode().category()
    }

    /// The `(Type, Op1, Op2)` record of a binary or bitwise instruction
    pub fn as_binary(&self) -> Option<&BinaryInst> {
        match self {
            Instruction::Add(inst)
            | Instruction::Fadd(inst)
            | Instruction::Sub(inst)
            | Instruction::Fsub(inst)
            | Instruction::Mul(inst)
            | Instruction::Fmul(inst)
            | Instruction::Udiv(inst)
            | Instruction::Sdiv(inst)
            | Instruction::Fdiv(inst)
            | Instruction::Urem(inst)
            | Instruction::Srem(inst)
            | Instruction::Frem(inst)
            | Instruction::Shl(inst)
            | Instruction::Lshr(inst)
            | Instruction::Ashr(inst)
            | Instruction::And(inst)
            | Instruction::Or(inst)
            | Instruction::Xor(inst) => Some(inst),
            _ => None,
        }
    }

    /// False only for effect instructions (`store`), which have no result
    /// and must not be bound to a name.
    pub fn produces_value(&self) -> bool {
        !self.opcode().is_effect()
    }

    /// Operands in the order they appear in the textual form
    pub fn operands(&self) -> Vec<&ValueRef> {
        match self {
            Instruction::Alloca(_) => Vec::new(),
            Instruction::Load(inst) => vec![inst.addr()],
            Instruction::Store(inst) => vec![inst.val(), inst.addr()],
            Instruction::Getelementptr(inst) => vec![inst.ptr()],
            Instruction::Icmp(inst) => vec![inst.op1(), inst.op2()],
            Instruction::Fcmp(inst) => vec![inst.op1(), inst.op2()],
            Instruction::Phi(inst) => inst.iter().map(|(_, value)| value).collect(),
            other => match other.as_binary() {
                Some(inst) => vec![inst.op1(), inst.op2()],
                None => Vec::new(),
            },
        }
    }

    /// Construct-and-check: hands the node back only if the verifier finds
    /// nothing wrong with it in isolation.
    pub fn validated(self, options: &VerifyOptions) -> Result<Self, VerifyError> {
        match verify_instruction(&self, options).into_iter().next() {
            Some(err) => Err(err),
            None => Ok(self),
        }
    }
}

impl From<AllocaInst> for Instruction {
    fn from(inst: AllocaInst) -> Self {
        Instruction::Alloca(inst)
    }
}

impl From<LoadInst> for Instruction {
    fn from(inst: LoadInst) -> Self {
        Instruction::Load(inst)
    }
}

impl From<StoreInst> for Instruction {
    fn from(inst: StoreInst) -> Self {
        Instruction::Store(inst)
    }
}

impl From<GepInst> for Instruction {
    fn from(inst: GepInst) -> Self {
        Instruction::Getelementptr(inst)
    }
}

impl From<IcmpInst> for Instruction {
    fn from(inst: IcmpInst) -> Self {
        Instruction::Icmp(inst)
    }
}

impl From<FcmpInst> for Instruction {
    fn from(inst: FcmpInst) -> Self {
        Instruction::Fcmp(inst)
    }
}

impl From<PhiInst> for Instruction {
    fn from(inst: PhiInst) -> Self {
        Instruction::Phi(inst)
    }
}

impl Value for Instruction {
    fn ty(&self) -> IrType {
        match self {
            Instruction::Alloca(inst) => IrType::ptr_to(inst.ty.clone()),
            Instruction::Load(inst) => inst.ty.clone(),
            Instruction::Store(_) => IrType::Void,
            Instruction::Getelementptr(inst) => inst.result_type(),
            Instruction::Icmp(inst) => inst.ty.bool_shaped(),
            Instruction::Fcmp(inst) => inst.ty.bool_shaped(),
            Instruction::Phi(inst) => inst.ty.clone(),
            other => match other.as_binary() {
                Some(inst) => inst.ty.clone(),
                None => IrType::Void,
            },
        }
    }

    fn kind(&self) -> ValueKind {
        ValueKind::Instruction
    }
}

fn write_align(f: &mut fmt::Formatter<'_>, align: u32) -> fmt::Result {
    if align != 0 {
        write!(f, ", align {align}")?;
    }
    Ok(())
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let op = self.opcode();
        match self {
            Instruction::Alloca(inst) => {
                write!(f, "alloca {}", inst.ty)?;
                if inst.num_elems != 1 {
                    write!(f, ", i32 {}", inst.num_elems)?;
                }
                write_align(f, inst.align)
            }
            Instruction::Load(inst) => {
                write!(f, "load {}* {}", inst.ty, inst.addr)?;
                write_align(f, inst.align)
            }
            Instruction::Store(inst) => {
                write!(f, "store {} {}, {}* {}", inst.ty, inst.val, inst.ty, inst.addr)?;
                write_align(f, inst.align)
            }
            Instruction::Getelementptr(inst) => {
                write!(f, "getelementptr {}* {}", inst.ty, inst.ptr)?;
                for index in &inst.indices {
                    let width = if i32::try_from(*index).is_ok() { 32 } else { 64 };
                    write!(f, ", i{width} {index}")?;
                }
                Ok(())
            }
            Instruction::Icmp(inst) => {
                write!(f, "{op} {} {} {}, {}", inst.pred, inst.ty, inst.op1, inst.op2)
            }
            Instruction::Fcmp(inst) => {
                write!(f, "{op} {} {} {}, {}", inst.pred, inst.ty, inst.op1, inst.op2)
            }
            Instruction::Phi(inst) => {
                write!(f, "{op} {}", inst.ty)?;
                for (i, (label, value)) in inst.iter().enumerate() {
                    write!(f, "{}[ {value}, %{label} ]", if i > 0 { ", " } else { " " })?;
                }
                Ok(())
            }
            other => match other.as_binary() {
                Some(inst) => write!(f, "{op} {} {}, {}", inst.ty, inst.op1, inst.op2),
                None => write!(f, "{op}"),
            },
        }
    }
}

//! IR Type System
//!
//! The type representation shared by every IR node. Instructions only ever
//! compare types structurally and print them, so the API here is mostly
//! constructors and classification predicates.

use serde::{Deserialize, Serialize};
use std::fmt;

/// IR Type system
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IrType {
    /// Void type
    Void,

    /// Integer type with an arbitrary bit width (`i1`, `i8`, `i32`, ...)
    Int(u32),

    /// Floating point types
    Half,
    Float,
    Double,

    /// Pointer type
    Ptr(Box<IrType>),

    /// Vector type <len x element_type>
    Vector { len: u64, element_type: Box<IrType> },

    /// Array type [size x element_type]
    Array { size: u64, element_type: Box<IrType> },

    /// Function type
    Function {
        return_type: Box<IrType>,
        param_types: Vec<IrType>,
        is_vararg: bool,
    },

    /// Struct type
    Struct {
        name: Option<String>,
        fields: Vec<IrType>,
        packed: bool,
    },

    /// Label type (for basic block addresses)
    Label,
}

impl IrType {
    pub fn i1() -> Self {
        IrType::Int(1)
    }

    pub fn i8() -> Self {
        IrType::Int(8)
    }

    pub fn i16() -> Self {
        IrType::Int(16)
    }

    pub fn i32() -> Self {
        IrType::Int(32)
    }

    pub fn i64() -> Self {
        IrType::Int(64)
    }

    /// Pointer to `pointee`
    pub fn ptr_to(pointee: IrType) -> Self {
        IrType::Ptr(Box::new(pointee))
    }

    /// Vector of `len` elements of `element_type`
    pub fn vector(len: u64, element_type: IrType) -> Self {
        IrType::Vector { len, element_type: Box::new(element_type) }
    }

    /// Array of `size` elements of `element_type`
    pub fn array(size: u64, element_type: IrType) -> Self {
        IrType::Array { size, element_type: Box::new(element_type) }
    }

    /// Check if this is a scalar integer type
    pub fn is_integer(&self) -> bool {
        matches!(self, IrType::Int(_))
    }

    /// Check if this is a scalar floating point type
    pub fn is_float(&self) -> bool {
        matches!(self, IrType::Half | IrType::Float | IrType::Double)
    }

    /// Check if this is a pointer type
    pub fn is_pointer(&self) -> bool {
        matches!(self, IrType::Ptr(_))
    }

    pub fn is_vector(&self) -> bool {
        matches!(self, IrType::Vector { .. })
    }

    /// Integer or vector of integers
    pub fn is_int_or_int_vector(&self) -> bool {
        self.scalar_type().is_integer()
    }

    /// Floating point or vector of floating point
    pub fn is_float_or_float_vector(&self) -> bool {
        self.scalar_type().is_float()
    }

    /// Pointer or vector of pointers
    pub fn is_ptr_or_ptr_vector(&self) -> bool {
        self.scalar_type().is_pointer()
    }

    /// The element type of a vector, or the type itself for scalars
    pub fn scalar_type(&self) -> &IrType {
        match self {
            IrType::Vector { element_type, .. } => element_type,
            other => other,
        }
    }

    /// The type a pointer points to
    pub fn pointee(&self) -> Option<&IrType> {
        match self {
            IrType::Ptr(pointee) => Some(pointee),
            _ => None,
        }
    }

    /// Get the element type for pointers, vectors and arrays
    pub fn element_type(&self) -> Option<&IrType> {
        match self {
            IrType::Ptr(elem) => Some(elem),
            IrType::Vector { element_type, .. } => Some(element_type),
            IrType::Array { element_type, .. } => Some(element_type),
            _ => None,
        }
    }

    /// `i1` with the same shape as `self`: `<N x i1>` for vectors, `i1` otherwise.
    pub fn bool_shaped(&self) -> IrType {
        match self {
            IrType::Vector { len, .. } => IrType::vector(*len, IrType::i1()),
            _ => IrType::i1(),
        }
    }
}

impl fmt::Display for IrType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IrType::Void => write!(f, "void"),
            IrType::Int(bits) => write!(f, "i{bits}"),
            IrType::Half => write!(f, "half"),
            IrType::Float => write!(f, "float"),
            IrType::Double => write!(f, "double"),
            IrType::Ptr(target) => write!(f, "{target}*"),
            IrType::Vector { len, element_type } => write!(f, "<{len} x {element_type}>"),
            IrType::Array { size, element_type } => write!(f, "[{size} x {element_type}]"),
            IrType::Function { return_type, param_types, is_vararg } => {
                write!(f, "{return_type} (")?;
                for (i, param) in param_types.iter().enumerate() {
                    if i > 0 { write!(f, ", ")?; }
                    write!(f, "{param}")?;
                }
                if *is_vararg {
                    if !param_types.is_empty() { write!(f, ", ")?; }
                    write!(f, "...")?;
                }
                write!(f, ")")
            }
            IrType::Struct { name: Some(name), .. } => write!(f, "%{name}"),
            IrType::Struct { name: None, fields, packed } => {
                if *packed { write!(f, "<")?; }
                write!(f, "{{ ")?;
                for (i, field) in fields.iter().enumerate() {
                    if i > 0 { write!(f, ", ")?; }
                    write!(f, "{field}")?;
                }
                write!(f, " }}")?;
                if *packed { write!(f, ">")?; }
                Ok(())
            }
            IrType::Label => write!(f, "label"),
        }
    }
}

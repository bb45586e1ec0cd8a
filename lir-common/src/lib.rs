//! LLVM-style SSA IR - Common Types and Diagnostics
//!
//! This crate contains the type representation and the diagnostic
//! machinery shared by the IR node model and the passes built on it.

pub mod error;
pub mod types;
pub mod site;

pub use error::{Diagnostic, ErrorReporter, Severity};
pub use types::IrType;
pub use site::IrSite;

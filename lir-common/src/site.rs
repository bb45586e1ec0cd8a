//! IR site tracking for error reporting
//!
//! An IR graph has no source file, so diagnostics point at a position inside
//! the containment structure instead: a block label and the index of the
//! instruction within that block.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A position inside a function body (index is 0-based)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IrSite {
    pub block: Option<String>,
    pub index: Option<usize>,
}

impl IrSite {
    /// Site of the `index`-th instruction in `block`
    pub fn new(block: &str, index: usize) -> Self {
        Self {
            block: Some(block.to_string()),
            index: Some(index),
        }
    }

    /// Site naming a whole block (its terminator or its φ-set)
    pub fn block(block: &str) -> Self {
        Self {
            block: Some(block.to_string()),
            index: None,
        }
    }

    /// A node that is not yet placed in any block
    pub fn detached() -> Self {
        Self { block: None, index: None }
    }
}

impl fmt::Display for IrSite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.block, self.index) {
            (Some(block), Some(index)) => write!(f, "%{block}#{index}"),
            (Some(block), None) => write!(f, "%{block}"),
            (None, Some(index)) => write!(f, "<detached>#{index}"),
            (None, None) => write!(f, "<detached>"),
        }
    }
}

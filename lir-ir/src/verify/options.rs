//! Verifier configuration

use serde::{Deserialize, Serialize};

/// Which checks the verifier runs. Missing fields in a serialized form
/// take their default.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VerifyOptions {
    /// Accept `getelementptr` with no indices
    pub allow_empty_gep: bool,
    /// Reject instructions, terminators or blocks used directly as operands
    pub check_operand_kinds: bool,
    /// Reject blocks without a terminator
    pub require_terminator: bool,
}

impl Default for VerifyOptions {
    fn default() -> Self {
        Self {
            allow_empty_gep: false,
            check_operand_kinds: true,
            require_terminator: true,
        }
    }
}

impl VerifyOptions {
    /// Settings for graphs still under construction
    pub fn permissive() -> Self {
        Self {
            allow_empty_gep: true,
            check_operand_kinds: false,
            require_terminator: false,
        }
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

//! Diagnostics for IR consumers
//!
//! The IR itself never fails. Passes that inspect it (the verifier, a
//! parser, a lowering pass) report what they find through these types.

use crate::site::IrSite;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Severity {
    Error,
    Warning,
    Note,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
            Severity::Note => write!(f, "note"),
        }
    }
}

/// A diagnostic message with a site, a stable code and a severity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub code: String,
    pub message: String,
    pub site: IrSite,
    pub notes: Vec<String>,
}

impl Diagnostic {
    pub fn error(code: &str, message: String, site: IrSite) -> Self {
        Self::with_severity(Severity::Error, code, message, site)
    }

    pub fn warning(code: &str, message: String, site: IrSite) -> Self {
        Self::with_severity(Severity::Warning, code, message, site)
    }

    pub fn note(code: &str, message: String, site: IrSite) -> Self {
        Self::with_severity(Severity::Note, code, message, site)
    }

    fn with_severity(severity: Severity, code: &str, message: String, site: IrSite) -> Self {
        Self {
            severity,
            code: code.to_string(),
            message,
            site,
            notes: Vec::new(),
        }
    }

    pub fn with_note(mut self, note: String) -> Self {
        self.notes.push(note);
        self
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}] at {}: {}", self.severity, self.code, self.site, self.message)?;

        for note in &self.notes {
            write!(f, "\n  note: {note}")?;
        }

        Ok(())
    }
}

/// Error reporter for collecting and displaying diagnostics
#[derive(Debug, Default)]
pub struct ErrorReporter {
    diagnostics: Vec<Diagnostic>,
    error_count: usize,
    warning_count: usize,
}

impl ErrorReporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an already-built diagnostic
    pub fn report(&mut self, diagnostic: Diagnostic) -> &mut Diagnostic {
        match diagnostic.severity {
            Severity::Error => self.error_count += 1,
            Severity::Warning => self.warning_count += 1,
            Severity::Note => {}
        }
        let index = self.diagnostics.len();
        self.diagnostics.push(diagnostic);
        &mut self.diagnostics[index]
    }

    /// Report an error diagnostic
    pub fn error(&mut self, code: &str, message: String, site: IrSite) -> &mut Diagnostic {
        self.report(Diagnostic::error(code, message, site))
    }

    /// Report a warning diagnostic
    pub fn warning(&mut self, code: &str, message: String, site: IrSite) -> &mut Diagnostic {
        self.report(Diagnostic::warning(code, message, site))
    }

    /// Report a note diagnostic
    pub fn note(&mut self, code: &str, message: String, site: IrSite) -> &mut Diagnostic {
        self.report(Diagnostic::note(code, message, site))
    }

    /// Check if any errors have been reported
    pub fn has_errors(&self) -> bool {
        self.error_count > 0
    }

    pub fn error_count(&self) -> usize {
        self.error_count
    }

    pub fn warning_count(&self) -> usize {
        self.warning_count
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }

    /// Clear all diagnostics
    pub fn clear(&mut self) {
        self.diagnostics.clear();
        self.error_count = 0;
        self.warning_count = 0;
    }

    /// Emit all diagnostics through the `log` facade
    pub fn log_diagnostics(&self) {
        for diagnostic in &self.diagnostics {
            match diagnostic.severity {
                Severity::Error => log::error!("{diagnostic}"),
                Severity::Warning => log::warn!("{diagnostic}"),
                Severity::Note => log::info!("{diagnostic}"),
            }
        }
    }

    /// Create a summary string
    pub fn summary(&self) -> String {
        match (self.error_count, self.warning_count) {
            (0, 0) => "No errors or warnings".to_string(),
            (0, w) => format!("{} warning{}", w, if w == 1 { "" } else { "s" }),
            (e, 0) => format!("{} error{}", e, if e == 1 { "" } else { "s" }),
            (e, w) => format!(
                "{} error{} and {} warning{}",
                e,
                if e == 1 { "" } else { "s" },
                w,
                if w == 1 { "" } else { "s" }
            ),
        }
    }
}

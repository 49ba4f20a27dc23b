//! Non-fatal anomalies found while compiling.
//!
//! A diagnostic never stops compilation; the affected command is degraded or skipped
//! and the run goes on. Every diagnostic is logged through `tracing` when recorded and
//! also kept, so callers (and tests) can inspect them after the run.

use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum DiagnosticKind {
    /// Text did not fit in the print buffer and was truncated
    BufferOverflow,
    /// Unknown or malformed macro, including expression errors
    InvalidMacro,
    UnresolvedCall,
    UnresolvedDisplay,
    /// `<<display>>` would recurse into a passage already being displayed
    DisplayCycle,
    DuplicatePassage,
    /// Variable written but never read
    UnusedVariable,
    /// Variable read but never written
    UnsetVariable,
    /// More variables than register letters
    RegisterOverflow,
    /// Link on-click text that is not an assignment
    IgnoredLinkAction,
    /// Title maps to the same script file as an earlier passage
    FileNameCollision,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    /// Passage being compiled, if the problem is tied to one
    pub passage: Option<String>,
    pub kind: DiagnosticKind,
    pub message: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.passage {
            Some(passage) => write!(f, "Warning on {}: {}", passage, self.message),
            None => write!(f, "Warning: {}", self.message),
        }
    }
}

/// Collected diagnostics of one run.
#[derive(Debug, Clone, Default)]
pub struct Diagnostics {
    items: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record and log a diagnostic.
    pub fn report(
        &mut self,
        passage: Option<&str>,
        kind: DiagnosticKind,
        message: impl Into<String>,
    ) {
        let diagnostic = Diagnostic {
            passage: passage.map(str::to_string),
            kind,
            message: message.into(),
        };
        tracing::warn!(kind = ?diagnostic.kind, "{}", diagnostic);
        self.items.push(diagnostic);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.items.iter()
    }

    pub fn of_kind(&self, kind: DiagnosticKind) -> impl Iterator<Item = &Diagnostic> {
        self.items.iter().filter(move |d| d.kind == kind)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn into_vec(self) -> Vec<Diagnostic> {
        self.items
    }
}

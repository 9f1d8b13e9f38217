//! Shared test helpers for Lintel crates.
//!
//! The engine doubles here let session and boundary tests drive exact
//! findings and faults without going through the lexer.

use std::cell::Cell;

use crate::diagnostics::Finding;
use crate::engine::{EngineFault, LintEngine};

/// Engine that reports the same findings for every text.
///
/// # Examples
///
/// ```
/// use common::diagnostics::{DiagnosticKind, Finding};
/// use common::engine::LintEngine;
/// use common::span::SourceSpan;
/// use common::test_support::ScriptedEngine;
///
/// let span = SourceSpan::new(0, 1).unwrap();
/// let engine = ScriptedEngine::new(vec![Finding::new(DiagnosticKind::UnexpectedAtCharacter, span)]);
/// assert_eq!(engine.analyze(b"@").unwrap().len(), 1);
/// assert_eq!(engine.calls(), 1);
/// ```
#[derive(Debug, Default)]
pub struct ScriptedEngine {
    findings: Vec<Finding>,
    calls: Cell<usize>,
}

impl ScriptedEngine {
    /// Report `findings` on every call.
    #[must_use]
    pub const fn new(findings: Vec<Finding>) -> Self {
        Self {
            findings,
            calls: Cell::new(0),
        }
    }

    /// Number of times the engine has been asked to analyse text.
    #[must_use]
    pub fn calls(&self) -> usize {
        self.calls.get()
    }
}

impl LintEngine for ScriptedEngine {
    fn analyze(&self, _text: &[u8]) -> Result<Vec<Finding>, EngineFault> {
        self.calls.set(self.calls.get() + 1);
        Ok(self.findings.clone())
    }
}

/// Engine that always fails with [`EngineFault::Internal`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FailingEngine {
    reason: String,
}

impl FailingEngine {
    /// Fail every call with `reason`.
    #[must_use]
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

impl LintEngine for FailingEngine {
    fn analyze(&self, _text: &[u8]) -> Result<Vec<Finding>, EngineFault> {
        Err(EngineFault::Internal {
            reason: self.reason.clone(),
        })
    }
}

//! Lint engine that reports lexical problems in JavaScript-like source.
//!
//! The [`Lexer`] walks the text once, without building tokens, and reports
//! unterminated strings, templates and block comments, stray `*/`, and
//! characters that cannot start any token (`@`, a lone `#`). Findings come
//! back in source order with byte spans into the analysed slice.

mod scanner;

use common::diagnostics::Finding;
use common::engine::{EngineFault, LintEngine};
use log::debug;

use scanner::Scanner;

/// Production lint engine used by document sessions.
///
/// # Examples
///
/// ```
/// use common::diagnostics::DiagnosticKind;
/// use common::engine::LintEngine;
/// use lintel_lexer::Lexer;
///
/// let findings = Lexer.analyze(b"let x = 'unfinished").unwrap();
/// assert_eq!(findings.len(), 1);
/// assert_eq!(findings[0].kind(), DiagnosticKind::UnclosedStringLiteral);
/// assert_eq!((findings[0].span().begin(), findings[0].span().end()), (8, 19));
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Lexer;

impl LintEngine for Lexer {
    fn analyze(&self, text: &[u8]) -> Result<Vec<Finding>, EngineFault> {
        ensure_addressable(text.len())?;
        let findings = Scanner::new(text).run();
        debug!(
            target: "lintel::lexer",
            "scanned {} bytes, {} findings",
            text.len(),
            findings.len(),
        );
        Ok(findings)
    }
}

/// Spans are `u32`, so longer texts cannot be reported on.
fn ensure_addressable(length: usize) -> Result<(), EngineFault> {
    u32::try_from(length)
        .map(drop)
        .map_err(|_| EngineFault::TextTooLarge { length })
}

//! Seam between document sessions and the analysis that discovers problems.

use thiserror::Error;

use crate::diagnostics::Finding;

/// Internal failures a lint engine may signal instead of findings.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum EngineFault {
    /// The text cannot be addressed with 32-bit offsets.
    #[error("text of {length} bytes exceeds the 32-bit offset range")]
    TextTooLarge {
        /// Length of the rejected text in bytes.
        length: usize,
    },
    /// The engine failed for a reason of its own.
    #[error("lint engine failed: {reason}")]
    Internal {
        /// Description supplied by the engine.
        reason: String,
    },
}

/// Pure analysis of a text snapshot.
///
/// Implementations must be deterministic: the same bytes always yield the
/// same ordered findings, with spans pointing into the exact slice passed in.
pub trait LintEngine {
    /// Analyse `text` and return findings in source order.
    fn analyze(&self, text: &[u8]) -> Result<Vec<Finding>, EngineFault>;
}

impl<E: LintEngine + ?Sized> LintEngine for &E {
    fn analyze(&self, text: &[u8]) -> Result<Vec<Finding>, EngineFault> {
        (**self).analyze(text)
    }
}

impl<E: LintEngine + ?Sized> LintEngine for Box<E> {
    fn analyze(&self, text: &[u8]) -> Result<Vec<Finding>, EngineFault> {
        (**self).analyze(text)
    }
}

//! One open document: its text snapshot and the latest diagnostics.
//!
//! A session moves `Empty → TextSet → Linted`. Replacing the text always
//! returns it to `TextSet` and discards the diagnostics; linting renders
//! every finding through the shared translator as it stands at that moment.

use std::borrow::Cow;

use common::diagnostics::{Diagnostic, Finding};
use common::engine::{EngineFault, LintEngine};
use common::i18n::SharedTranslator;
use lintel_lexer::Lexer;
use log::{debug, warn};
use thiserror::Error;

/// Errors surfaced by [`DocumentSession::lint`].
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    /// The lint engine failed; no diagnostics were kept.
    #[error(transparent)]
    LintEngineFault(#[from] EngineFault),
}

/// Lifecycle state of a [`DocumentSession`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionState {
    /// No text has been supplied yet.
    Empty,
    /// Text is present and has not been linted since it was set.
    TextSet,
    /// Diagnostics reflect the current text.
    Linted,
}

/// Text snapshot plus the diagnostics of its latest lint.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
///
/// use common::i18n::{Translator, builtin_catalog};
/// use lintel_suite::DocumentSession;
///
/// let translator = Arc::new(Translator::new(builtin_catalog()));
/// let mut session = DocumentSession::new(Arc::clone(&translator));
/// session.set_text(b"'unfinished");
///
/// let diagnostics = session.lint().unwrap();
/// assert_eq!(diagnostics[0].code(), "E0040");
/// assert_eq!(diagnostics[0].message(), "unclosed string literal");
/// ```
#[derive(Debug)]
pub struct DocumentSession<E = Lexer> {
    translator: SharedTranslator,
    engine: E,
    text: Vec<u8>,
    diagnostics: Vec<Diagnostic>,
    state: SessionState,
}

impl DocumentSession<Lexer> {
    /// Create an empty session linted by [`Lexer`].
    #[must_use]
    pub fn new(translator: SharedTranslator) -> Self {
        Self::with_engine(translator, Lexer)
    }
}

impl<E: LintEngine> DocumentSession<E> {
    /// Create an empty session linted by `engine`.
    #[must_use]
    pub const fn with_engine(translator: SharedTranslator, engine: E) -> Self {
        Self {
            translator,
            engine,
            text: Vec::new(),
            diagnostics: Vec::new(),
            state: SessionState::Empty,
        }
    }

    /// Replace the whole text. Previous diagnostics are discarded.
    pub fn set_text(&mut self, text: &[u8]) {
        self.text.clear();
        self.text.extend_from_slice(text);
        self.diagnostics.clear();
        self.state = SessionState::TextSet;
    }

    /// Lint the current text and return the rendered diagnostics in source
    /// order.
    ///
    /// Linting an `Empty` session lints the empty text. On an engine fault
    /// the diagnostics stay empty.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::LintEngineFault`] when the engine fails.
    ///
    /// # Panics
    ///
    /// Panics if the engine reports a diagnostic kind whose message is
    /// missing from the translator's catalog.
    pub fn lint(&mut self) -> Result<&[Diagnostic], SessionError> {
        self.diagnostics.clear();
        let findings = match self.engine.analyze(&self.text) {
            Ok(findings) => findings,
            Err(fault) => {
                warn!(target: "lintel::session", "lint engine failed: {fault}");
                if self.state == SessionState::Linted {
                    self.state = SessionState::TextSet;
                }
                return Err(fault.into());
            }
        };

        self.diagnostics = findings
            .iter()
            .map(|finding| self.render(finding))
            .collect();
        self.state = SessionState::Linted;
        debug!(
            target: "lintel::session",
            "linted {} bytes in locale {}: {} diagnostics",
            self.text.len(),
            self.translator.active_locale().unwrap_or("<default>"),
            self.diagnostics.len(),
        );
        Ok(&self.diagnostics)
    }

    fn render(&self, finding: &Finding) -> Diagnostic {
        let args: Vec<Cow<'_, str>> = finding
            .args()
            .iter()
            .map(|span| {
                span.slice(&self.text)
                    .map_or(Cow::Borrowed(""), String::from_utf8_lossy)
            })
            .collect();
        let message = self.translator.render(finding.kind().message_id(), &args);
        Diagnostic::new(finding.kind(), message, finding.span())
    }

    /// Current text snapshot.
    #[must_use]
    pub fn text(&self) -> &[u8] {
        &self.text
    }

    /// Diagnostics of the latest lint; empty while stale.
    #[must_use]
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Lifecycle state.
    #[must_use]
    pub const fn state(&self) -> SessionState {
        self.state
    }

    /// Translator shared with other sessions.
    #[must_use]
    pub const fn translator(&self) -> &SharedTranslator {
        &self.translator
    }
}

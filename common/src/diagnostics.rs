//! Diagnostic kinds, raw engine findings, and rendered diagnostics.
//!
//! A [`Finding`] is what the lint engine reports: a kind, a byte span, and
//! argument spans pointing back into the linted text. A [`Diagnostic`] is the
//! same finding after the translator has rendered its message in the active
//! locale.

use std::ffi::CStr;

use crate::i18n::{MessageId, message_ids};
use crate::span::SourceSpan;

/// Every problem the lint engine knows how to report.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DiagnosticKind {
    /// `/*` without a matching `*/`.
    UnclosedBlockComment,
    /// `*/` outside any comment.
    UnopenedBlockComment,
    /// A quoted string literal that runs off the end of its line or the text.
    UnclosedStringLiteral,
    /// A template literal without a closing backtick.
    UnclosedTemplate,
    /// A stray `@` character.
    UnexpectedAtCharacter,
    /// A stray `#` character that does not begin a private name.
    UnexpectedHashCharacter,
}

impl DiagnosticKind {
    /// All kinds, in code order.
    pub const ALL: [Self; 6] = [
        Self::UnclosedBlockComment,
        Self::UnopenedBlockComment,
        Self::UnclosedStringLiteral,
        Self::UnclosedTemplate,
        Self::UnexpectedAtCharacter,
        Self::UnexpectedHashCharacter,
    ];

    /// Stable, locale-independent code such as `E0040`.
    ///
    /// # Examples
    ///
    /// ```
    /// use common::DiagnosticKind;
    ///
    /// assert_eq!(DiagnosticKind::UnclosedStringLiteral.code(), "E0040");
    /// ```
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::UnclosedBlockComment => "E0037",
            Self::UnopenedBlockComment => "E0039",
            Self::UnclosedStringLiteral => "E0040",
            Self::UnclosedTemplate => "E0041",
            Self::UnexpectedAtCharacter => "E0042",
            Self::UnexpectedHashCharacter => "E0052",
        }
    }

    /// The code as a NUL-terminated string for the foreign boundary.
    #[must_use]
    pub const fn code_cstr(self) -> &'static CStr {
        match self {
            Self::UnclosedBlockComment => c"E0037",
            Self::UnopenedBlockComment => c"E0039",
            Self::UnclosedStringLiteral => c"E0040",
            Self::UnclosedTemplate => c"E0041",
            Self::UnexpectedAtCharacter => c"E0042",
            Self::UnexpectedHashCharacter => c"E0052",
        }
    }

    /// Identifier of the message template in the built-in catalog.
    #[must_use]
    pub const fn message_id(self) -> MessageId {
        match self {
            Self::UnclosedBlockComment => message_ids::UNCLOSED_BLOCK_COMMENT,
            Self::UnopenedBlockComment => message_ids::UNOPENED_BLOCK_COMMENT,
            Self::UnclosedStringLiteral => message_ids::UNCLOSED_STRING_LITERAL,
            Self::UnclosedTemplate => message_ids::UNCLOSED_TEMPLATE,
            Self::UnexpectedAtCharacter | Self::UnexpectedHashCharacter => {
                message_ids::UNEXPECTED_CHARACTER
            }
        }
    }
}

/// A problem reported by the lint engine, before translation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Finding {
    kind: DiagnosticKind,
    span: SourceSpan,
    args: Vec<SourceSpan>,
}

impl Finding {
    /// Creates a finding without message arguments.
    #[must_use]
    pub const fn new(kind: DiagnosticKind, span: SourceSpan) -> Self {
        Self {
            kind,
            span,
            args: Vec::new(),
        }
    }

    /// Adds a message argument taken from the linted text.
    #[must_use]
    pub fn with_arg(mut self, arg: SourceSpan) -> Self {
        self.args.push(arg);
        self
    }

    /// Returns the finding kind.
    #[must_use]
    pub const fn kind(&self) -> DiagnosticKind {
        self.kind
    }

    /// Returns the primary span.
    #[must_use]
    pub const fn span(&self) -> SourceSpan {
        self.span
    }

    /// Returns the argument spans substituted into `{0}`, `{1}`, ...
    #[must_use]
    pub fn args(&self) -> &[SourceSpan] {
        &self.args
    }
}

/// A finding rendered into the active locale.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Diagnostic {
    kind: DiagnosticKind,
    message: String,
    span: SourceSpan,
}

impl Diagnostic {
    /// Creates a rendered diagnostic.
    #[must_use]
    pub const fn new(kind: DiagnosticKind, message: String, span: SourceSpan) -> Self {
        Self {
            kind,
            message,
            span,
        }
    }

    /// Returns the diagnostic kind.
    #[must_use]
    pub const fn kind(&self) -> DiagnosticKind {
        self.kind
    }

    /// Returns the stable code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        self.kind.code()
    }

    /// Returns the rendered, localized message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the primary span.
    #[must_use]
    pub const fn span(&self) -> SourceSpan {
        self.span
    }
}

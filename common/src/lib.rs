//! Shared Lintel infrastructure: the translation catalog and translator,
//! diagnostic kinds and records, byte spans, and the lint engine seam.

pub mod diagnostics;
pub mod engine;
pub mod i18n;
pub mod span;
pub mod test_support;

pub use diagnostics::{Diagnostic, DiagnosticKind, Finding};
pub use engine::{EngineFault, LintEngine};
pub use i18n::{
    Catalog, CatalogError, I18nError, LocaleSelection, LocaleSource, MessageId, SharedTranslator,
    Translator, builtin_catalog, global_translator, message_ids, normalise_locale, resolve_locale,
};
pub use span::{SourceSpan, SpanError};

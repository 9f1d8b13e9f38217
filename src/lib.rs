//! Lintel: an embeddable linter core with a compiled-in, multi-locale
//! message catalog.
//!
//! This crate ties the workspace together for Rust hosts. It owns the
//! host-facing [`LintelConfig`] and re-exports the pieces a host needs to
//! open documents and choose a locale. C hosts load the `lintel_suite`
//! `cdylib` directly instead.

pub mod config;

pub use common::i18n::{
    LocaleSelection, LocaleSource, SharedTranslator, Translator, builtin_catalog,
    global_translator,
};
pub use common::{Diagnostic, DiagnosticKind, SourceSpan};
pub use config::{CONFIG_NAMESPACE, ConfigError, LintelConfig};
pub use lintel_suite::{DocumentSession, SessionError, SessionState};

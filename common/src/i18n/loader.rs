use std::sync::Arc;

use log::debug;
use once_cell::sync::Lazy;
use thiserror::Error;

use super::builder::CatalogBuilder;
use super::catalog::{Catalog, CatalogError};
use super::messages::{LOCALES, MESSAGES, MessageSource};

/// Error raised when a caller request cannot be satisfied by the catalog.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum I18nError {
    /// The identifier does not name a message in the catalog.
    #[error("message id {id} is not in the catalog ({count} messages)")]
    InvalidMessageId {
        /// Rejected identifier.
        id: u32,
        /// Number of messages in the catalog.
        count: usize,
    },
    /// No locale in the catalog matches the requested name.
    #[error("locale `{locale}` is not in the catalog")]
    LocaleNotFound {
        /// Requested locale name.
        locale: String,
    },
}

static BUILTIN: Lazy<Arc<Catalog>> = Lazy::new(|| match package_builtin() {
    Ok(catalog) => {
        debug!(
            target: "i18n::catalog",
            "built-in catalog ready: {} messages, locales {:?}",
            catalog.message_count(),
            LOCALES,
        );
        Arc::new(catalog)
    }
    // Covered by the packaging test in `tests.rs`.
    Err(error) => panic!("built-in translation catalog is malformed: {error}"),
});

/// Return the catalog compiled into this crate.
///
/// The catalog is packaged and validated on first use and shared for the
/// rest of the process.
///
/// ```
/// use common::i18n::{builtin_catalog, message_ids};
///
/// let catalog = builtin_catalog();
/// let german = catalog.find_locale("de").unwrap();
/// assert_eq!(
///     catalog.lookup(message_ids::UNCLOSED_STRING_LITERAL, catalog.locale_count()),
///     "unclosed string literal",
/// );
/// assert_ne!(
///     catalog.lookup(message_ids::UNCLOSED_STRING_LITERAL, german),
///     "unclosed string literal",
/// );
/// ```
#[must_use]
pub fn builtin_catalog() -> Arc<Catalog> {
    Arc::clone(&BUILTIN)
}

pub(crate) fn builtin_builder() -> Result<CatalogBuilder, CatalogError> {
    builder_from(MESSAGES)
}

fn builder_from(sources: &[MessageSource]) -> Result<CatalogBuilder, CatalogError> {
    let mut builder = CatalogBuilder::new(LOCALES);
    for (message, source) in sources.iter().enumerate() {
        if source.id.index() != message {
            return Err(CatalogError::MessageOutOfOrder {
                message,
                id: source.id.index(),
            });
        }
        builder.message(source.untranslated, source.translations);
    }
    Ok(builder)
}

fn package_builtin() -> Result<Catalog, CatalogError> {
    builtin_builder()?.build()
}

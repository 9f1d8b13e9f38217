//! Message translation for Lintel diagnostics.
//!
//! The catalog maps a compile-time [`MessageId`] and a locale slot to text in
//! two probes, with a default slot that is always present. Catalog data is
//! packaged from the compiled-in message table by [`CatalogBuilder`] and
//! validated once by [`Catalog::load`]; lookups never fail for compiled-in
//! identifiers.
//!
//! The [`Translator`] holds the active locale. It is shared by every document
//! session, and a change is visible to all of them until the next change.
//! Configuration-driven selection goes through [`resolve_locale`], which
//! records where the locale came from.

mod builder;
mod catalog;
mod loader;
mod locales;
mod messages;
mod selection;
pub mod testing;
mod translator;

pub use builder::{CatalogBuilder, PackagedCatalog};
pub use catalog::{Catalog, CatalogError, MessageId, RawCatalog, Slot, TextSpan};
pub use loader::{I18nError, builtin_catalog};
pub use locales::{LocaleDirectory, locale_name_combinations};
pub use messages::{LOCALES, message_ids};
pub use selection::{LocaleSelection, LocaleSource, normalise_locale, resolve_locale};
pub use translator::{
    SharedTranslator, Translator, UNTRANSLATED_LOCALES, format_message, global_translator,
};

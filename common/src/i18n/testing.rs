//! Fixtures for exercising translation without the built-in catalog.

use std::sync::Arc;

use super::{Catalog, CatalogBuilder, SharedTranslator, Translator};

/// Locale of the sample catalog that translates every message.
pub const SAMPLE_CUSTOM_LOCALE: &str = "xx_YY@custom";

/// Build a two-message catalog over `de` and [`SAMPLE_CUSTOM_LOCALE`].
///
/// Message `0` reads `hello`, `hallo` and `hullo, custom`. Message `1` reads
/// `goodbye` and has no German translation.
///
/// # Panics
///
/// Panics if the fixture data stops packaging, which is a bug in this module.
#[must_use]
pub fn sample_catalog() -> Catalog {
    let mut builder = CatalogBuilder::new(["de", SAMPLE_CUSTOM_LOCALE]);
    builder
        .message("hello", [Some("hallo"), Some("hullo, custom")])
        .message("goodbye", [None, Some("cheerio, custom")]);
    match builder.build() {
        Ok(catalog) => catalog,
        Err(error) => panic!("sample catalog should package: {error}"),
    }
}

/// Fresh translator over [`sample_catalog`], independent of the global one.
#[must_use]
pub fn sample_translator() -> SharedTranslator {
    Arc::new(Translator::new(Arc::new(sample_catalog())))
}

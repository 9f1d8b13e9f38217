//! Packaging of translation sources into the binary catalog layout.
//!
//! Invariant violations (a message without default text, a row with the
//! wrong number of translations, duplicate locales) are rejected here, once,
//! so that [`Catalog::lookup`] never has to check them.

use std::collections::HashMap;

use super::catalog::{Catalog, CatalogError, RawCatalog};
use super::locales::LocaleDirectory;

#[derive(Clone, Debug)]
struct MessageRow {
    untranslated: String,
    translations: Vec<Option<String>>,
}

/// Collects locales and messages before packaging them.
///
/// Messages receive identifiers in insertion order, starting at `0`.
///
/// # Examples
///
/// ```
/// use common::i18n::{CatalogBuilder, MessageId};
///
/// let mut builder = CatalogBuilder::new(["fr_FR", "pt_BR"]);
/// builder.message("unclosed string literal", [Some("chaîne non fermée"), None]);
/// let catalog = builder.build().unwrap();
///
/// let id = MessageId::new(0);
/// assert_eq!(catalog.lookup(id, 0), "chaîne non fermée");
/// assert_eq!(catalog.lookup(id, 1), "unclosed string literal");
/// ```
#[derive(Clone, Debug, Default)]
pub struct CatalogBuilder {
    locales: Vec<String>,
    messages: Vec<MessageRow>,
}

impl CatalogBuilder {
    /// Start a catalog for `locales`, in slot order.
    #[must_use]
    pub fn new<I, S>(locales: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            locales: locales.into_iter().map(Into::into).collect(),
            messages: Vec::new(),
        }
    }

    /// Append a message with its default text and one optional translation
    /// per locale. Empty translations count as missing.
    pub fn message<I, S>(&mut self, untranslated: impl Into<String>, translations: I) -> &mut Self
    where
        I: IntoIterator<Item = Option<S>>,
        S: Into<String>,
    {
        self.messages.push(MessageRow {
            untranslated: untranslated.into(),
            translations: translations
                .into_iter()
                .map(|translation| translation.map(Into::into))
                .collect(),
        });
        self
    }

    /// Produce the binary catalog layout.
    pub fn package(&self) -> Result<PackagedCatalog, CatalogError> {
        self.validate_locales()?;
        if self.messages.len() > usize::from(u16::MAX) + 1 {
            return Err(CatalogError::TooManyMessages {
                count: self.messages.len(),
            });
        }

        let locale_count = self.locales.len();
        let mut pool = StringPool::default();
        let mut mapping_table = Vec::with_capacity(self.messages.len() * (locale_count + 1));

        for (message, row) in self.messages.iter().enumerate() {
            if row.translations.len() != locale_count {
                return Err(CatalogError::TranslationCountMismatch {
                    message,
                    expected: locale_count,
                    found: row.translations.len(),
                });
            }
            if row.untranslated.is_empty() {
                return Err(CatalogError::EmptyDefault { message });
            }
            for translation in &row.translations {
                let offset = match translation.as_deref() {
                    Some(text) if !text.is_empty() => pool.intern(message, text)?,
                    _ => 0,
                };
                mapping_table.push(offset);
            }
            mapping_table.push(pool.intern(message, &row.untranslated)?);
        }

        Ok(PackagedCatalog {
            locale_table: LocaleDirectory::from_names(self.locales.clone()).to_table(),
            mapping_table,
            string_table: pool.bytes,
        })
    }

    /// Package and load in one step.
    pub fn build(&self) -> Result<Catalog, CatalogError> {
        self.package()?.load()
    }

    fn validate_locales(&self) -> Result<(), CatalogError> {
        for (index, locale) in self.locales.iter().enumerate() {
            if locale.is_empty() {
                return Err(CatalogError::EmptyLocaleName { index });
            }
            if locale.contains('\0') {
                return Err(CatalogError::InvalidLocaleName { index });
            }
            if self.locales[..index].contains(locale) {
                return Err(CatalogError::DuplicateLocale {
                    locale: locale.clone(),
                });
            }
        }
        Ok(())
    }
}

/// Deduplicating string pool; offset `0` holds the reserved NUL.
struct StringPool {
    bytes: Vec<u8>,
    offsets: HashMap<String, u32>,
}

impl Default for StringPool {
    fn default() -> Self {
        Self {
            bytes: vec![0],
            offsets: HashMap::new(),
        }
    }
}

impl StringPool {
    fn intern(&mut self, message: usize, text: &str) -> Result<u32, CatalogError> {
        if let Some(offset) = self.offsets.get(text) {
            return Ok(*offset);
        }
        if text.contains('\0') {
            return Err(CatalogError::InteriorNul { message });
        }
        let offset = u32::try_from(self.bytes.len()).map_err(|_| CatalogError::PoolTooLarge {
            length: self.bytes.len(),
        })?;
        self.bytes.extend_from_slice(text.as_bytes());
        self.bytes.push(0);
        self.offsets.insert(text.to_owned(), offset);
        Ok(offset)
    }
}

/// Owned binary catalog as produced by [`CatalogBuilder::package`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PackagedCatalog {
    locale_table: Vec<u8>,
    mapping_table: Vec<u32>,
    string_table: Vec<u8>,
}

impl PackagedCatalog {
    /// Borrow the three segments.
    #[must_use]
    pub fn as_raw(&self) -> RawCatalog<'_> {
        RawCatalog {
            locale_table: &self.locale_table,
            mapping_table: &self.mapping_table,
            string_table: &self.string_table,
        }
    }

    /// Validate and load the packaged segments.
    pub fn load(&self) -> Result<Catalog, CatalogError> {
        Catalog::load(self.as_raw())
    }

    /// NUL-separated locale names closed by an empty name.
    #[must_use]
    pub fn locale_table(&self) -> &[u8] {
        &self.locale_table
    }

    /// `L + 1` offsets per message.
    #[must_use]
    pub fn mapping_table(&self) -> &[u32] {
        &self.mapping_table
    }

    /// Pooled NUL-terminated strings.
    #[must_use]
    pub fn string_table(&self) -> &[u8] {
        &self.string_table
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn packages_the_documented_layout() {
        let mut builder = CatalogBuilder::new(["de", "fr_FR"]);
        builder.message("hello", [Some("hallo"), None::<&str>]);
        let packaged = builder.package().unwrap();

        assert_eq!(packaged.locale_table(), b"de\0fr_FR\0\0");
        assert_eq!(packaged.string_table(), b"\0hallo\0hello\0");
        assert_eq!(packaged.mapping_table(), &[1, 0, 7]);
    }

    #[rstest]
    fn shares_identical_strings() {
        let mut builder = CatalogBuilder::new(["en_GB"]);
        builder
            .message("colour", [Some("colour")])
            .message("unexpected '{0}'", [Some("colour")]);
        let packaged = builder.package().unwrap();

        assert_eq!(packaged.string_table(), b"\0colour\0unexpected '{0}'\0");
        assert_eq!(packaged.mapping_table(), &[1, 1, 1, 8]);
    }

    #[rstest]
    fn empty_translations_use_the_sentinel() {
        let mut builder = CatalogBuilder::new(["de"]);
        builder.message("hello", [Some("")]);
        let packaged = builder.package().unwrap();

        assert_eq!(packaged.mapping_table(), &[0, 1]);
    }

    #[rstest]
    #[case(CatalogBuilder::new([""]), CatalogError::EmptyLocaleName { index: 0 })]
    #[case(CatalogBuilder::new(["de", "de"]), CatalogError::DuplicateLocale { locale: "de".into() })]
    #[case(CatalogBuilder::new(["d\0e"]), CatalogError::InvalidLocaleName { index: 0 })]
    fn rejects_invalid_locales(#[case] builder: CatalogBuilder, #[case] expected: CatalogError) {
        assert_eq!(builder.package().unwrap_err(), expected);
    }

    #[rstest]
    fn rejects_missing_default_text() {
        let mut builder = CatalogBuilder::new(["de"]);
        builder.message("", [Some("hallo")]);
        assert_eq!(
            builder.package().unwrap_err(),
            CatalogError::EmptyDefault { message: 0 }
        );
    }

    #[rstest]
    fn rejects_rows_of_the_wrong_width() {
        let mut builder = CatalogBuilder::new(["de", "fr_FR"]);
        builder.message("hello", [Some("hallo")]);
        assert_eq!(
            builder.package().unwrap_err(),
            CatalogError::TranslationCountMismatch {
                message: 0,
                expected: 2,
                found: 1
            }
        );
    }

    #[rstest]
    fn rejects_interior_nul_bytes() {
        let mut builder = CatalogBuilder::new(["de"]);
        builder.message("hello", [Some("hal\0lo")]);
        assert_eq!(
            builder.package().unwrap_err(),
            CatalogError::InteriorNul { message: 0 }
        );
    }
}

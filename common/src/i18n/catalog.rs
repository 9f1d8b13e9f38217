//! Binary translation catalog and constant-time lookup.
//!
//! A catalog arrives as three segments: a locale table of NUL-terminated
//! names closed by an empty name, a mapping table holding `L + 1` string
//! offsets per message, and a string pool of NUL-terminated strings. Offset
//! `0` in the mapping table means "no translation"; the last offset of every
//! row is the default text and must never be `0`.
//!
//! [`Catalog::load`] validates all of this once and resolves every offset into
//! a [`Slot`], so lookups never branch on malformed data.

use std::ops::Range;

use log::debug;
use thiserror::Error;

use super::I18nError;
use super::locales::LocaleDirectory;

/// Identifier of one translatable message template.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MessageId(u16);

impl MessageId {
    /// Wraps a compile-time message index.
    #[must_use]
    pub const fn new(index: u16) -> Self {
        Self(index)
    }

    /// Returns the row index in the mapping table.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// Errors raised while packaging or loading a catalog.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum CatalogError {
    /// The locale table does not end with an empty name.
    #[error("locale table is missing its empty-name terminator")]
    UnterminatedLocaleTable,
    /// A locale name is empty where a real name was expected.
    #[error("locale #{index} has an empty name")]
    EmptyLocaleName {
        /// Position of the offending locale.
        index: usize,
    },
    /// A locale name is not valid UTF-8 or contains a NUL byte.
    #[error("locale #{index} has an invalid name")]
    InvalidLocaleName {
        /// Position of the offending locale.
        index: usize,
    },
    /// The same locale name appears twice.
    #[error("locale `{locale}` is listed more than once")]
    DuplicateLocale {
        /// The repeated name.
        locale: String,
    },
    /// The mapping table length is not a multiple of the row width.
    #[error("mapping table has {entries} entries, not a multiple of {stride}")]
    MisalignedMappingTable {
        /// Number of offsets in the table.
        entries: usize,
        /// Expected row width (`L + 1`).
        stride: usize,
    },
    /// More messages than a [`MessageId`] can address.
    #[error("catalog holds {count} messages; at most 65536 are addressable")]
    TooManyMessages {
        /// Number of messages supplied.
        count: usize,
    },
    /// A message row supplies the wrong number of translations.
    #[error("message #{message} has {found} translations; expected {expected}")]
    TranslationCountMismatch {
        /// Row index.
        message: usize,
        /// Number of locales in the directory.
        expected: usize,
        /// Number of translations supplied.
        found: usize,
    },
    /// A message row sits at a position other than its identifier.
    #[error("message #{message} is declared with identifier {id}")]
    MessageOutOfOrder {
        /// Row index.
        message: usize,
        /// Identifier the row was declared with.
        id: usize,
    },
    /// The default slot holds the "no translation" sentinel.
    #[error("message #{message} has no default text")]
    MissingDefault {
        /// Row index.
        message: usize,
    },
    /// The default slot points at an empty string.
    #[error("message #{message} has an empty default text")]
    EmptyDefault {
        /// Row index.
        message: usize,
    },
    /// Message text contains a NUL byte and cannot be pooled.
    #[error("message #{message} contains an interior NUL byte")]
    InteriorNul {
        /// Row index.
        message: usize,
    },
    /// The string pool does not begin with the reserved NUL byte.
    #[error("string pool must begin with the reserved NUL byte")]
    MissingReservedOffset,
    /// The string pool is not valid UTF-8.
    #[error("string pool holds invalid UTF-8 at byte {offset}")]
    InvalidUtf8 {
        /// First invalid byte.
        offset: usize,
    },
    /// The string pool cannot be addressed with 32-bit offsets.
    #[error("string pool of {length} bytes exceeds the 32-bit offset range")]
    PoolTooLarge {
        /// Pool length in bytes.
        length: usize,
    },
    /// An offset points outside the pool or into the middle of a character.
    #[error("message #{message} references invalid offset {offset}")]
    OffsetOutOfRange {
        /// Row index.
        message: usize,
        /// Rejected offset.
        offset: u32,
    },
    /// A pooled string is not NUL-terminated.
    #[error("message #{message} references an unterminated string at {offset}")]
    UnterminatedString {
        /// Row index.
        message: usize,
        /// Offset of the string.
        offset: u32,
    },
}

/// Borrowed view over the three segments of a binary catalog.
#[derive(Clone, Copy, Debug)]
pub struct RawCatalog<'a> {
    /// Consecutive NUL-terminated locale names, closed by an empty name.
    pub locale_table: &'a [u8],
    /// `L + 1` offsets per message; the last offset is the default text.
    pub mapping_table: &'a [u32],
    /// NUL-terminated strings addressed by offset; offset `0` is reserved.
    pub string_table: &'a [u8],
}

/// Location of a string inside the pool, excluding its NUL terminator.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TextSpan {
    start: u32,
    len: u32,
}

impl TextSpan {
    fn range(self) -> Range<usize> {
        let start = self.start as usize;
        start..start + self.len as usize
    }

    const fn is_empty(self) -> bool {
        self.len == 0
    }
}

/// A locale slot resolved at load time.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Slot {
    /// The locale carries its own text.
    Translated(TextSpan),
    /// The locale defers to the default text.
    UseDefault,
}

/// Immutable, validated translation catalog.
#[derive(Clone, Debug)]
pub struct Catalog {
    locales: LocaleDirectory,
    pool: Box<str>,
    defaults: Vec<TextSpan>,
    translations: Vec<Slot>,
}

impl Catalog {
    /// Validate a binary catalog and resolve every slot.
    pub fn load(raw: RawCatalog<'_>) -> Result<Self, CatalogError> {
        let locales = LocaleDirectory::parse(raw.locale_table)?;
        let locale_count = locales.len();
        let stride = locale_count + 1;

        if raw.mapping_table.len() % stride != 0 {
            return Err(CatalogError::MisalignedMappingTable {
                entries: raw.mapping_table.len(),
                stride,
            });
        }
        let message_count = raw.mapping_table.len() / stride;
        if message_count > usize::from(u16::MAX) + 1 {
            return Err(CatalogError::TooManyMessages {
                count: message_count,
            });
        }
        if raw.string_table.first() != Some(&0) {
            return Err(CatalogError::MissingReservedOffset);
        }
        if u32::try_from(raw.string_table.len()).is_err() {
            return Err(CatalogError::PoolTooLarge {
                length: raw.string_table.len(),
            });
        }
        let pool = std::str::from_utf8(raw.string_table).map_err(|error| {
            CatalogError::InvalidUtf8 {
                offset: error.valid_up_to(),
            }
        })?;

        let mut defaults = Vec::with_capacity(message_count);
        let mut translations = Vec::with_capacity(message_count * locale_count);
        for (message, row) in raw.mapping_table.chunks_exact(stride).enumerate() {
            let Some((default_offset, translated)) = row.split_last() else {
                return Err(CatalogError::MissingDefault { message });
            };
            defaults.push(resolve_default(pool, message, *default_offset)?);
            for offset in translated {
                translations.push(resolve_slot(pool, message, *offset)?);
            }
        }

        debug!(
            target: "i18n::catalog",
            "loaded catalog with {message_count} messages in {locale_count} locales",
        );

        Ok(Self {
            locales,
            pool: pool.into(),
            defaults,
            translations,
        })
    }

    /// Return the text of `id` in locale `locale_index`, falling back to the
    /// default text when the locale has no translation.
    ///
    /// Any `locale_index` of [`Self::locale_count`] or more selects the
    /// default text directly.
    ///
    /// # Panics
    ///
    /// Panics when `id` does not belong to this catalog. Identifiers from
    /// untrusted input must go through [`Self::checked_lookup`].
    #[must_use]
    pub fn lookup(&self, id: MessageId, locale_index: usize) -> &str {
        let message = id.index();
        let span = match self.slot(message, locale_index) {
            Some(Slot::Translated(span)) => *span,
            Some(Slot::UseDefault) | None => self.defaults[message],
        };
        &self.pool[span.range()]
    }

    /// Like [`Self::lookup`], but validates a raw identifier first.
    pub fn checked_lookup(&self, raw_id: u32, locale_index: usize) -> Result<&str, I18nError> {
        let id = self.message_id(raw_id)?;
        Ok(self.lookup(id, locale_index))
    }

    /// Convert an untrusted raw identifier into a [`MessageId`].
    pub fn message_id(&self, raw_id: u32) -> Result<MessageId, I18nError> {
        u16::try_from(raw_id)
            .ok()
            .map(MessageId::new)
            .filter(|id| id.index() < self.message_count())
            .ok_or(I18nError::InvalidMessageId {
                id: raw_id,
                count: self.message_count(),
            })
    }

    /// Whether `locale_index` carries its own text for `id`.
    #[must_use]
    pub fn has_translation(&self, id: MessageId, locale_index: usize) -> bool {
        matches!(
            self.slot(id.index(), locale_index),
            Some(Slot::Translated(_))
        )
    }

    /// Return the locale directory.
    #[must_use]
    pub const fn locales(&self) -> &LocaleDirectory {
        &self.locales
    }

    /// Number of locales (`L`); also the index of the default slot.
    #[must_use]
    pub fn locale_count(&self) -> usize {
        self.locales.len()
    }

    /// Number of messages (`M`).
    #[must_use]
    pub fn message_count(&self) -> usize {
        self.defaults.len()
    }

    /// Exact-match locale search; see [`LocaleDirectory::find`].
    #[must_use]
    pub fn find_locale(&self, name: &str) -> Option<usize> {
        self.locales.find(name)
    }

    /// Iterate every message identifier in the catalog.
    pub fn message_ids(&self) -> impl Iterator<Item = MessageId> + '_ {
        (0..self.message_count())
            .filter_map(|index| u16::try_from(index).ok())
            .map(MessageId::new)
    }

    fn slot(&self, message: usize, locale_index: usize) -> Option<&Slot> {
        let locale_count = self.locale_count();
        if locale_index >= locale_count {
            return None;
        }
        self.translations.get(message * locale_count + locale_index)
    }
}

fn resolve_default(pool: &str, message: usize, offset: u32) -> Result<TextSpan, CatalogError> {
    match resolve_slot(pool, message, offset)? {
        Slot::Translated(span) if span.is_empty() => Err(CatalogError::EmptyDefault { message }),
        Slot::Translated(span) => Ok(span),
        Slot::UseDefault => Err(CatalogError::MissingDefault { message }),
    }
}

fn resolve_slot(pool: &str, message: usize, offset: u32) -> Result<Slot, CatalogError> {
    if offset == 0 {
        return Ok(Slot::UseDefault);
    }
    let tail = pool
        .get(offset as usize..)
        .filter(|tail| !tail.is_empty())
        .ok_or(CatalogError::OffsetOutOfRange { message, offset })?;
    let len = tail
        .find('\0')
        .ok_or(CatalogError::UnterminatedString { message, offset })?;
    let len = u32::try_from(len).map_err(|_| CatalogError::PoolTooLarge {
        length: pool.len(),
    })?;
    Ok(Slot::Translated(TextSpan { start: offset, len }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    const LOCALES: &[u8] = b"de\0fr_FR\0\0";
    const POOL: &[u8] = b"\0hello\0hallo\0bonjour\0";

    fn load(mapping: &[u32]) -> Result<Catalog, CatalogError> {
        Catalog::load(RawCatalog {
            locale_table: LOCALES,
            mapping_table: mapping,
            string_table: POOL,
        })
    }

    #[rstest]
    fn resolves_translated_and_default_slots() {
        let catalog = load(&[7, 0, 1]).unwrap();
        let id = MessageId::new(0);

        assert_eq!(catalog.lookup(id, 0), "hallo");
        assert_eq!(catalog.lookup(id, 1), "hello");
        assert_eq!(catalog.lookup(id, 2), "hello");
        assert_eq!(catalog.lookup(id, 99), "hello");
        assert!(catalog.has_translation(id, 0));
        assert!(!catalog.has_translation(id, 1));
    }

    #[rstest]
    #[case(&[7, 0, 0], CatalogError::MissingDefault { message: 0 })]
    #[case(&[7, 0], CatalogError::MisalignedMappingTable { entries: 2, stride: 3 })]
    #[case(&[0, 0, 64], CatalogError::OffsetOutOfRange { message: 0, offset: 64 })]
    #[case(&[0, 0, 21], CatalogError::OffsetOutOfRange { message: 0, offset: 21 })]
    #[case(&[0, 0, 6], CatalogError::EmptyDefault { message: 0 })]
    fn rejects_malformed_mapping_tables(#[case] mapping: &[u32], #[case] expected: CatalogError) {
        assert_eq!(load(mapping).unwrap_err(), expected);
    }

    #[rstest]
    #[case(b"de\0fr_FR\0", CatalogError::UnterminatedLocaleTable)]
    #[case(b"de\0de\0\0", CatalogError::DuplicateLocale { locale: "de".into() })]
    #[case(b"\xff\0\0", CatalogError::InvalidLocaleName { index: 0 })]
    fn rejects_malformed_locale_tables(#[case] table: &[u8], #[case] expected: CatalogError) {
        let outcome = Catalog::load(RawCatalog {
            locale_table: table,
            mapping_table: &[],
            string_table: POOL,
        });
        assert_eq!(outcome.unwrap_err(), expected);
    }

    #[rstest]
    #[case(b"hello\0", CatalogError::MissingReservedOffset)]
    #[case(b"\0hel\xfflo\0", CatalogError::InvalidUtf8 { offset: 4 })]
    fn rejects_malformed_pools(#[case] pool: &[u8], #[case] expected: CatalogError) {
        let outcome = Catalog::load(RawCatalog {
            locale_table: b"\0",
            mapping_table: &[1],
            string_table: pool,
        });
        assert_eq!(outcome.unwrap_err(), expected);
    }

    #[rstest]
    fn rejects_unterminated_strings() {
        let outcome = Catalog::load(RawCatalog {
            locale_table: b"\0",
            mapping_table: &[1],
            string_table: b"\0dangling",
        });
        assert_eq!(
            outcome.unwrap_err(),
            CatalogError::UnterminatedString {
                message: 0,
                offset: 1
            }
        );
    }

    #[rstest]
    fn checked_lookup_rejects_unknown_identifiers() {
        let catalog = load(&[7, 0, 1]).unwrap();

        assert_eq!(catalog.checked_lookup(0, 0), Ok("hallo"));
        assert_eq!(
            catalog.checked_lookup(1, 0),
            Err(I18nError::InvalidMessageId { id: 1, count: 1 })
        );
        assert_eq!(
            catalog.checked_lookup(70_000, 0),
            Err(I18nError::InvalidMessageId {
                id: 70_000,
                count: 1
            })
        );
    }

    #[rstest]
    fn catalogs_without_locales_only_serve_defaults() {
        let catalog = Catalog::load(RawCatalog {
            locale_table: b"\0",
            mapping_table: &[1],
            string_table: POOL,
        })
        .unwrap();

        assert_eq!(catalog.locale_count(), 0);
        assert_eq!(catalog.lookup(MessageId::new(0), 0), "hello");
    }
}

//! Locale enumeration and matching.
//!
//! The directory keeps locale names in catalog order; a locale's position is
//! its slot index in every message row. [`LocaleDirectory::find`] is an exact
//! search. [`LocaleDirectory::find_closest`] additionally walks POSIX name
//! combinations (`en_US.UTF-8@snarky` down to `en`) and accepts BCP 47 tags
//! such as `pt-BR`.

use std::str::FromStr;

use unic_langid::LanguageIdentifier;

use super::CatalogError;

/// Ordered locale names of a catalog.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LocaleDirectory {
    names: Vec<String>,
}

impl LocaleDirectory {
    /// Parse a NUL-separated locale table closed by an empty name.
    ///
    /// # Examples
    ///
    /// ```
    /// use common::i18n::LocaleDirectory;
    ///
    /// let directory = LocaleDirectory::parse(b"en_US\0fr_FR\0de_DE\0\0").unwrap();
    /// assert_eq!(directory.find("fr_FR"), Some(1));
    /// ```
    pub fn parse(table: &[u8]) -> Result<Self, CatalogError> {
        let mut names: Vec<String> = Vec::new();
        let mut rest = table;
        loop {
            let end = rest
                .iter()
                .position(|byte| *byte == 0)
                .ok_or(CatalogError::UnterminatedLocaleTable)?;
            let (name, tail) = rest.split_at(end);
            if name.is_empty() {
                break;
            }
            let index = names.len();
            let name = std::str::from_utf8(name)
                .map_err(|_| CatalogError::InvalidLocaleName { index })?;
            if names.iter().any(|existing| existing == name) {
                return Err(CatalogError::DuplicateLocale {
                    locale: name.to_owned(),
                });
            }
            names.push(name.to_owned());
            rest = tail.split_first().map_or(&[], |(_, remaining)| remaining);
        }
        Ok(Self { names })
    }

    /// Build a directory from already-validated names.
    pub(crate) const fn from_names(names: Vec<String>) -> Self {
        Self { names }
    }

    /// Serialise the directory into the NUL-separated table layout.
    #[must_use]
    pub fn to_table(&self) -> Vec<u8> {
        let mut table = Vec::new();
        for name in &self.names {
            table.extend_from_slice(name.as_bytes());
            table.push(0);
        }
        table.push(0);
        table
    }

    /// Position of the first locale named exactly `name`.
    #[must_use]
    pub fn find(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|candidate| candidate == name)
    }

    /// Position of the most specific locale matching `name`.
    ///
    /// POSIX names are reduced one component at a time; BCP 47 tags are
    /// rewritten as `language_REGION` first.
    ///
    /// # Examples
    ///
    /// ```
    /// use common::i18n::LocaleDirectory;
    ///
    /// let directory = LocaleDirectory::parse(b"en_US@snarky\0pt_BR\0\0").unwrap();
    /// assert_eq!(directory.find_closest("en_US.UTF-8@snarky"), Some(0));
    /// assert_eq!(directory.find_closest("pt-BR"), Some(1));
    /// assert_eq!(directory.find_closest("pt_PT"), None);
    /// ```
    #[must_use]
    pub fn find_closest(&self, name: &str) -> Option<usize> {
        let from_posix = locale_name_combinations(name)
            .iter()
            .find_map(|candidate| self.find(candidate));
        from_posix.or_else(|| {
            let posix = posix_spelling(name)?;
            locale_name_combinations(&posix)
                .iter()
                .find_map(|candidate| self.find(candidate))
        })
    }

    /// Name of the locale at `index`.
    #[must_use]
    pub fn name(&self, index: usize) -> Option<&str> {
        self.names.get(index).map(String::as_str)
    }

    /// Number of locales.
    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Whether the directory lists no locales.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Iterate locale names in slot order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }
}

const SEPARATORS: [char; 3] = ['_', '.', '@'];

const TERRITORY: u8 = 1 << 1;
const CODESET: u8 = 1 << 2;
const MODIFIER: u8 = 1 << 3;

// Most specific first; the modifier outranks territory and codeset.
#[rustfmt::skip]
const COMBINATION_MASKS: [u8; 8] = [
    TERRITORY | CODESET | MODIFIER,
    TERRITORY           | MODIFIER,
                CODESET | MODIFIER,
                          MODIFIER,
    TERRITORY | CODESET,
    TERRITORY,
                CODESET,
    0,
];

/// `language[_territory][.codeset][@modifier]`, indexed by part.
struct LocaleParts<'a> {
    parts: [&'a str; 4],
}

impl<'a> LocaleParts<'a> {
    fn parse(name: &'a str) -> Self {
        let mut parts = [""; 4];
        let mut rest = name;
        let mut part = 0;
        loop {
            let next = rest.char_indices().find_map(|(at, character)| {
                SEPARATORS
                    .iter()
                    .skip(part)
                    .position(|separator| *separator == character)
                    .map(|offset| (at, part + offset))
            });
            let Some((at, separator)) = next else {
                parts[part] = rest;
                break;
            };
            let (head, tail) = rest.split_at(at);
            parts[part] = head;
            rest = &tail[1..];
            part = separator + 1;
        }
        Self { parts }
    }

    fn present_mask(&self) -> u8 {
        (1..4)
            .filter(|index| !self.parts[*index].is_empty())
            .fold(0, |mask, index| mask | (1 << index))
    }
}

/// Candidate names for `locale_name`, from most to least specific.
///
/// # Examples
///
/// ```
/// use common::i18n::locale_name_combinations;
///
/// assert_eq!(
///     locale_name_combinations("en_US.utf8@snarky"),
///     vec![
///         "en_US.utf8@snarky",
///         "en_US@snarky",
///         "en.utf8@snarky",
///         "en@snarky",
///         "en_US.utf8",
///         "en_US",
///         "en.utf8",
///         "en",
///     ],
/// );
/// ```
#[must_use]
pub fn locale_name_combinations(locale_name: &str) -> Vec<String> {
    let parts = LocaleParts::parse(locale_name);
    let present = parts.present_mask();

    COMBINATION_MASKS
        .iter()
        .filter(|mask| present & **mask == **mask)
        .map(|mask| {
            let mut candidate = String::with_capacity(locale_name.len());
            candidate.push_str(parts.parts[0]);
            for (offset, separator) in SEPARATORS.iter().enumerate() {
                let index = offset + 1;
                if mask & (1 << index) != 0 {
                    candidate.push(*separator);
                    candidate.push_str(parts.parts[index]);
                }
            }
            candidate
        })
        .collect()
}

/// Rewrite a BCP 47 tag (`pt-BR`) in POSIX form (`pt_BR`).
fn posix_spelling(tag: &str) -> Option<String> {
    if !tag.contains('-') {
        return None;
    }
    let identifier = LanguageIdentifier::from_str(tag).ok()?;
    let mut name = identifier.language.as_str().to_owned();
    if let Some(region) = identifier.region {
        name.push('_');
        name.push_str(region.as_str());
    }
    Some(name)
}

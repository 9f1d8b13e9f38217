//! Active-locale state shared by every document session.
//!
//! A [`Translator`] pairs a catalog with the index of the active locale. The
//! index equals the catalog's locale count while default text is in use.
//! Changes are sticky: nothing resets them except another selection call,
//! and every holder of the same [`SharedTranslator`] observes them.

use std::sync::{Arc, PoisonError, RwLock};

use log::debug;
use once_cell::sync::Lazy;

use super::catalog::{Catalog, MessageId};
use super::loader::{I18nError, builtin_catalog};

/// Locale names that disable translation and end a priority search.
pub const UNTRANSLATED_LOCALES: [&str; 2] = ["C", "POSIX"];

/// Translator handle shared between sessions.
pub type SharedTranslator = Arc<Translator>;

/// Translates message identifiers using the active locale.
#[derive(Debug)]
pub struct Translator {
    catalog: Arc<Catalog>,
    active: RwLock<usize>,
}

impl Translator {
    /// Create a translator over `catalog`, starting with default text.
    #[must_use]
    pub fn new(catalog: Arc<Catalog>) -> Self {
        let default_index = catalog.locale_count();
        Self {
            catalog,
            active: RwLock::new(default_index),
        }
    }

    /// Create a translator over the built-in catalog.
    #[must_use]
    pub fn builtin() -> Self {
        Self::new(builtin_catalog())
    }

    /// Return the underlying catalog.
    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Text of `id` in the active locale.
    ///
    /// # Panics
    ///
    /// Panics when `id` does not belong to the catalog; see
    /// [`Catalog::lookup`].
    #[must_use]
    pub fn translate(&self, id: MessageId) -> &str {
        self.catalog.lookup(id, self.active_index())
    }

    /// Translate `id` and substitute `{0}`, `{1}`, ... with `args`.
    ///
    /// # Panics
    ///
    /// Panics when `id` does not belong to the catalog.
    #[must_use]
    pub fn render<S: AsRef<str>>(&self, id: MessageId, args: &[S]) -> String {
        format_message(self.translate(id), args)
    }

    /// Activate the locale named exactly `name`.
    ///
    /// Returns `false` and leaves the active locale untouched when no locale
    /// matches.
    pub fn set_locale_explicit(&self, name: &str) -> bool {
        self.try_set_locale(name).is_ok()
    }

    /// Like [`Self::set_locale_explicit`], reporting why nothing changed.
    pub fn try_set_locale(&self, name: &str) -> Result<(), I18nError> {
        let index = self
            .catalog
            .find_locale(name)
            .ok_or_else(|| I18nError::LocaleNotFound {
                locale: name.to_owned(),
            })?;
        self.activate(index);
        Ok(())
    }

    /// Activate the locale closest to `name`; see
    /// [`super::LocaleDirectory::find_closest`].
    pub fn use_closest_locale(&self, name: &str) -> bool {
        match self.catalog.locales().find_closest(name) {
            Some(index) => {
                self.activate(index);
                true
            }
            None => false,
        }
    }

    /// Activate the first available locale in `priority`.
    ///
    /// `C` and `POSIX` stop the search: they request untranslated text and
    /// outrank every later entry. Returns `false` when nothing was selected,
    /// leaving the active locale unchanged.
    ///
    /// # Examples
    ///
    /// ```
    /// use common::i18n::Translator;
    ///
    /// let translator = Translator::builtin();
    /// assert!(translator.select_best_locale(&["ja_JP", "fr_FR", "de"]));
    /// assert_eq!(translator.active_locale(), Some("fr_FR"));
    ///
    /// assert!(!translator.select_best_locale(&["C", "de"]));
    /// assert_eq!(translator.active_locale(), Some("fr_FR"));
    /// ```
    pub fn select_best_locale<S: AsRef<str>>(&self, priority: &[S]) -> bool {
        for candidate in priority {
            let candidate = candidate.as_ref();
            if UNTRANSLATED_LOCALES.contains(&candidate) {
                debug!(
                    target: "i18n::translator",
                    "`{candidate}` requests untranslated text; stopping locale search",
                );
                return false;
            }
            if self.set_locale_explicit(candidate) {
                return true;
            }
        }
        false
    }

    /// Switch to default (untranslated) text.
    pub fn use_default(&self) {
        self.activate(self.catalog.locale_count());
    }

    /// Name of the active locale, or `None` while default text is in use.
    #[must_use]
    pub fn active_locale(&self) -> Option<&str> {
        self.catalog.locales().name(self.active_index())
    }

    /// Whether default text is in use.
    #[must_use]
    pub fn is_using_default(&self) -> bool {
        self.active_index() >= self.catalog.locale_count()
    }

    /// Index of the active locale slot.
    #[must_use]
    pub fn active_index(&self) -> usize {
        *self.active.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn activate(&self, index: usize) {
        *self.active.write().unwrap_or_else(PoisonError::into_inner) = index;
        debug!(
            target: "i18n::translator",
            "active locale is now {}",
            self.catalog.locales().name(index).unwrap_or("<default>"),
        );
    }
}

static GLOBAL: Lazy<SharedTranslator> = Lazy::new(|| Arc::new(Translator::builtin()));

/// The process-wide translator used by the embedding interface.
#[must_use]
pub fn global_translator() -> SharedTranslator {
    Arc::clone(&GLOBAL)
}

/// Substitute `{N}` placeholders in `template` with `args[N]`.
///
/// `{{` and `}}` produce literal braces. Placeholders without a matching
/// argument are copied verbatim.
///
/// # Examples
///
/// ```
/// use common::i18n::format_message;
///
/// assert_eq!(format_message("unexpected '{0}'", &["@"]), "unexpected '@'");
/// assert_eq!(format_message("{{0}} and {1}", &["a"]), "{0} and {1}");
/// ```
#[must_use]
pub fn format_message<S: AsRef<str>>(template: &str, args: &[S]) -> String {
    let mut rendered = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(brace) = rest.find(['{', '}']) {
        let (literal, tail) = rest.split_at(brace);
        rendered.push_str(literal);

        if let Some(after) = tail.strip_prefix("{{") {
            rendered.push('{');
            rest = after;
        } else if let Some(after) = tail.strip_prefix("}}") {
            rendered.push('}');
            rest = after;
        } else if let Some((arg, after)) = placeholder(tail, args) {
            rendered.push_str(arg);
            rest = after;
        } else {
            let (brace, after) = tail.split_at(1);
            rendered.push_str(brace);
            rest = after;
        }
    }
    rendered.push_str(rest);
    rendered
}

fn placeholder<'t, 'a, S: AsRef<str>>(
    tail: &'t str,
    args: &'a [S],
) -> Option<(&'a str, &'t str)> {
    let inner = tail.strip_prefix('{')?;
    let (index, after) = inner.split_once('}')?;
    let index: usize = index.parse().ok()?;
    let arg = args.get(index)?;
    Some((arg.as_ref(), after))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::i18n::testing::sample_catalog;
    use rstest::{fixture, rstest};

    #[fixture]
    fn translator() -> Translator {
        Translator::new(Arc::new(sample_catalog()))
    }

    #[rstest]
    fn starts_with_default_text(translator: Translator) {
        assert!(translator.is_using_default());
        assert_eq!(translator.active_locale(), None);
        assert_eq!(translator.translate(MessageId::new(0)), "hello");
    }

    #[rstest]
    fn explicit_selection_is_exact(translator: Translator) {
        assert!(translator.set_locale_explicit("xx_YY@custom"));
        assert_eq!(translator.translate(MessageId::new(0)), "hullo, custom");
        assert!(!translator.set_locale_explicit("xx_YY"));
        assert_eq!(translator.active_locale(), Some("xx_YY@custom"));
    }

    #[rstest]
    fn missing_translations_fall_back_per_message(translator: Translator) {
        assert!(translator.set_locale_explicit("de"));
        assert_eq!(translator.translate(MessageId::new(0)), "hallo");
        assert_eq!(translator.translate(MessageId::new(1)), "goodbye");
    }

    #[rstest]
    fn reports_unknown_locales(translator: Translator) {
        assert_eq!(
            translator.try_set_locale("zz"),
            Err(I18nError::LocaleNotFound {
                locale: "zz".to_owned()
            })
        );
        assert!(translator.is_using_default());
    }

    #[rstest]
    #[case(&["de"], true, Some("de"))]
    #[case(&["zz", "xx_YY@custom", "de"], true, Some("xx_YY@custom"))]
    #[case(&["zz", "POSIX", "de"], false, None)]
    #[case(&["C"], false, None)]
    #[case(&["zz", "yy"], false, None)]
    #[case(&[], false, None)]
    fn selects_the_best_locale(
        translator: Translator,
        #[case] priority: &[&str],
        #[case] selected: bool,
        #[case] expected: Option<&str>,
    ) {
        assert_eq!(translator.select_best_locale(priority), selected);
        assert_eq!(translator.active_locale(), expected);
    }

    #[rstest]
    fn failed_selection_keeps_the_previous_locale(translator: Translator) {
        assert!(translator.set_locale_explicit("de"));
        assert!(!translator.select_best_locale(&["C", "xx_YY@custom"]));
        assert_eq!(translator.active_locale(), Some("de"));
    }

    #[rstest]
    fn use_default_restores_untranslated_text(translator: Translator) {
        assert!(translator.set_locale_explicit("de"));
        translator.use_default();
        assert_eq!(translator.translate(MessageId::new(0)), "hello");
    }

    #[rstest]
    fn closest_match_accepts_posix_and_bcp47_names(translator: Translator) {
        assert!(translator.use_closest_locale("de_CH.UTF-8"));
        assert_eq!(translator.active_locale(), Some("de"));
        assert!(translator.use_closest_locale("xx_YY.UTF-8@custom"));
        assert_eq!(translator.active_locale(), Some("xx_YY@custom"));
        assert!(!translator.use_closest_locale("xx-YY"));
        assert_eq!(translator.active_locale(), Some("xx_YY@custom"));
    }

    #[rstest]
    fn changes_are_visible_through_every_handle(translator: Translator) {
        let first: SharedTranslator = Arc::new(translator);
        let second = Arc::clone(&first);

        assert!(first.set_locale_explicit("de"));
        assert_eq!(second.translate(MessageId::new(0)), "hallo");
    }

    #[rstest]
    #[case("no placeholders", &[], "no placeholders")]
    #[case("unexpected '{0}'", &["#"], "unexpected '#'")]
    #[case("{1} before {0}", &["a", "b"], "b before a")]
    #[case("missing {2}", &["a"], "missing {2}")]
    #[case("{{literal}}", &[], "{literal}")]
    #[case("dangling {", &[], "dangling {")]
    #[case("lone } brace", &[], "lone } brace")]
    #[case("{x}", &["a"], "{x}")]
    fn formats_placeholders(#[case] template: &str, #[case] args: &[&str], #[case] expected: &str) {
        assert_eq!(format_message(template, args), expected);
    }
}

use std::fmt;

use log::{debug, warn};

use super::Translator;

/// Source for a resolved locale.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum LocaleSource {
    /// Locale supplied explicitly by the caller.
    ExplicitArgument,
    /// Locale taken from the `locale` configuration key.
    Configuration,
    /// Locale chosen from the `locales` priority list.
    PriorityList,
    /// No candidate matched; default text is in use.
    Fallback,
}

impl fmt::Display for LocaleSource {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ExplicitArgument => formatter.write_str("explicit locale override"),
            Self::Configuration => formatter.write_str("configuration locale"),
            Self::PriorityList => formatter.write_str("locale priority list"),
            Self::Fallback => formatter.write_str("default text"),
        }
    }
}

/// Outcome of locale resolution including the applied locale and provenance.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LocaleSelection {
    locale: Option<String>,
    source: LocaleSource,
    requested: Option<String>,
}

impl LocaleSelection {
    const fn new(locale: Option<String>, source: LocaleSource, requested: Option<String>) -> Self {
        Self {
            locale,
            source,
            requested,
        }
    }

    /// Returns the effective locale source.
    #[must_use]
    pub const fn source(&self) -> LocaleSource {
        self.source
    }

    /// Returns the locale requested by the resolved source, if any.
    #[must_use]
    pub fn requested(&self) -> Option<&str> {
        self.requested.as_deref()
    }

    /// Returns the catalog locale now active, or `None` for default text.
    #[must_use]
    pub fn locale(&self) -> Option<&str> {
        self.locale.as_deref()
    }

    /// Whether resolution fell back to default text.
    #[must_use]
    pub fn used_fallback(&self) -> bool {
        self.source == LocaleSource::Fallback
    }

    /// Emit a debug log summarising the resolved locale.
    pub fn log_outcome(&self, target: &str) {
        debug!(
            target: target,
            "resolved {} to `{}`",
            self.source(),
            self.locale().unwrap_or("<default>"),
        );
    }
}

/// Attempt to activate a single locale candidate from the given source.
fn try_resolve_candidate(
    translator: &Translator,
    source: LocaleSource,
    raw: Option<&str>,
) -> Option<LocaleSelection> {
    let candidate = normalise_locale(raw)?;

    if translator.use_closest_locale(candidate) {
        return Some(LocaleSelection::new(
            translator.active_locale().map(str::to_owned),
            source,
            Some(candidate.to_owned()),
        ));
    }

    warn!(
        target: "i18n::selection",
        "skipping unsupported {source} `{candidate}`",
    );

    None
}

fn try_priority_list(translator: &Translator, priority: &[String]) -> Option<LocaleSelection> {
    let candidates: Vec<&str> = priority
        .iter()
        .filter_map(|entry| normalise_locale(Some(entry)))
        .collect();
    if candidates.is_empty() {
        return None;
    }

    if translator.select_best_locale(&candidates) {
        let locale = translator.active_locale().map(str::to_owned);
        return Some(LocaleSelection::new(
            locale.clone(),
            LocaleSource::PriorityList,
            locale,
        ));
    }

    warn!(
        target: "i18n::selection",
        "no entry of the {} {candidates:?} is available",
        LocaleSource::PriorityList,
    );

    None
}

/// Resolve and activate a locale on `translator`.
///
/// The resolver considers candidates in the following order:
///
/// 1. The explicit locale supplied by the caller.
/// 2. The configured `locale`.
/// 3. The configured `locales` priority list, where `C` and `POSIX` stop
///    the search.
/// 4. Default text when no candidate is available.
///
/// Explicit and configured names accept POSIX and BCP 47 spellings and match
/// the closest catalog locale.
pub fn resolve_locale(
    translator: &Translator,
    explicit: Option<&str>,
    configuration: Option<&str>,
    priority: &[String],
) -> LocaleSelection {
    let candidates = [
        (LocaleSource::ExplicitArgument, explicit),
        (LocaleSource::Configuration, configuration),
    ];

    candidates
        .into_iter()
        .find_map(|(source, raw)| try_resolve_candidate(translator, source, raw))
        .or_else(|| try_priority_list(translator, priority))
        .unwrap_or_else(|| {
            translator.use_default();
            LocaleSelection::new(None, LocaleSource::Fallback, None)
        })
}

/// Trim whitespace and discard empty locale candidates.
#[must_use]
pub fn normalise_locale(input: Option<&str>) -> Option<&str> {
    input
        .map(str::trim)
        .and_then(|value| if value.is_empty() { None } else { Some(value) })
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::i18n::builtin_catalog;
    use rstest::rstest;

    fn priority(entries: &[&str]) -> Vec<String> {
        entries.iter().map(|entry| (*entry).to_owned()).collect()
    }

    #[rstest]
    #[case(None, None, &[], LocaleSource::Fallback, None)]
    #[case(Some("de"), None, &[], LocaleSource::ExplicitArgument, Some("de"))]
    #[case(None, Some("fr_FR"), &[], LocaleSource::Configuration, Some("fr_FR"))]
    #[case(None, Some("pt-BR"), &[], LocaleSource::Configuration, Some("pt_BR"))]
    #[case(Some("sv_SE.UTF-8"), Some("de"), &[], LocaleSource::ExplicitArgument, Some("sv_SE"))]
    #[case(Some("zz"), Some("de"), &[], LocaleSource::Configuration, Some("de"))]
    #[case(Some("zz"), Some("yy"), &["ja_JP", "fr_FR"], LocaleSource::PriorityList, Some("fr_FR"))]
    #[case(None, None, &["POSIX", "fr_FR"], LocaleSource::Fallback, None)]
    #[case(None, None, &["ja_JP"], LocaleSource::Fallback, None)]
    fn resolves_sources(
        #[case] explicit: Option<&str>,
        #[case] configuration: Option<&str>,
        #[case] list: &[&str],
        #[case] expected_source: LocaleSource,
        #[case] expected_locale: Option<&str>,
    ) {
        let translator = Translator::new(builtin_catalog());
        let selection = resolve_locale(&translator, explicit, configuration, &priority(list));

        assert_eq!(selection.source(), expected_source);
        assert_eq!(selection.locale(), expected_locale);
        assert_eq!(translator.active_locale(), expected_locale);
        assert_eq!(
            selection.used_fallback(),
            expected_source == LocaleSource::Fallback
        );
    }

    #[rstest]
    fn fallback_resets_a_previous_selection() {
        let translator = Arc::new(Translator::new(builtin_catalog()));
        assert!(translator.set_locale_explicit("de"));

        let selection = resolve_locale(&translator, Some("zz"), None, &[]);

        assert!(selection.used_fallback());
        assert!(translator.is_using_default());
    }

    #[rstest]
    fn records_the_requested_spelling() {
        let translator = Translator::new(builtin_catalog());
        let selection = resolve_locale(&translator, Some(" en_US.UTF-8@snarky "), None, &[]);

        assert_eq!(selection.requested(), Some("en_US.UTF-8@snarky"));
        assert_eq!(selection.locale(), Some("en_US@snarky"));
    }

    #[rstest]
    #[case(None, None)]
    #[case(Some(""), None)]
    #[case(Some("  "), None)]
    #[case(Some("de"), Some("de"))]
    #[case(Some(" fr_FR "), Some("fr_FR"))]
    fn normalises_candidates(#[case] input: Option<&str>, #[case] expected: Option<&str>) {
        assert_eq!(normalise_locale(input), expected);
    }
}

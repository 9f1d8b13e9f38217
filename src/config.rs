//! Host configuration for Lintel embedders.
//!
//! Settings live in a TOML table named [`CONFIG_NAMESPACE`] within whatever
//! file the host owns. `LintelConfig` captures the translation settings: a
//! single preferred `locale` and an ordered `locales` priority list. Hosts
//! either parse the table themselves with [`LintelConfig::from_toml_str`] or
//! inject a loader through [`LintelConfig::load_with`].

use common::i18n::{LocaleSelection, Translator, normalise_locale, resolve_locale};
use log::debug;
use serde::Deserialize;
use thiserror::Error;

/// Table name under which hosts store Lintel settings.
pub const CONFIG_NAMESPACE: &str = "lintel";

/// Errors raised while reading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The TOML source is malformed or holds unexpected fields.
    #[error("invalid Lintel configuration: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Translation settings for a Lintel host.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct LintelConfig {
    /// Preferred locale, in POSIX (`pt_BR.UTF-8`) or BCP 47 (`pt-BR`) form.
    ///
    /// The closest catalog locale is selected. Blank values count as absent,
    /// so `locale = ""` falls through to the priority list.
    pub locale: Option<String>,
    /// Ordered fallbacks tried when `locale` is absent or unavailable.
    ///
    /// Entries must name catalog locales exactly. `C` or `POSIX` ends the
    /// list and selects untranslated text.
    pub locales: Vec<String>,
}

impl LintelConfig {
    /// Parse the contents of the Lintel table.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed TOML, mistyped values,
    /// and unknown keys.
    ///
    /// # Examples
    ///
    /// ```
    /// use lintel::LintelConfig;
    ///
    /// let config = LintelConfig::from_toml_str("locale = \"de\"\n").unwrap();
    /// assert_eq!(config.locale(), Some("de"));
    /// ```
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        toml::from_str(source).map_err(|error| {
            debug!(target: "lintel::config", "rejected Lintel configuration: {error}");
            ConfigError::from(error)
        })
    }

    /// Loads configuration using the supplied loader.
    ///
    /// The loader receives [`CONFIG_NAMESPACE`] so it can pick the right
    /// table out of the host's own file. Tests inject stubs here instead of
    /// touching the file system.
    ///
    /// # Examples
    ///
    /// ```
    /// use lintel::LintelConfig;
    ///
    /// let config = LintelConfig::load_with(|namespace| {
    ///     assert_eq!(namespace, "lintel");
    ///     LintelConfig::default()
    /// });
    /// assert!(config.locales().is_empty());
    /// ```
    #[must_use]
    pub fn load_with<F>(loader: F) -> Self
    where
        F: FnOnce(&str) -> Self,
    {
        loader(CONFIG_NAMESPACE)
    }

    /// Returns the configured locale, if present.
    ///
    /// Whitespace-only values are treated as absent.
    #[must_use]
    pub fn locale(&self) -> Option<&str> {
        normalise_locale(self.locale.as_deref())
    }

    /// Returns the locale priority list.
    #[must_use]
    pub fn locales(&self) -> &[String] {
        &self.locales
    }

    /// Activate the configured locale on `translator`.
    ///
    /// `explicit` (for example a host command-line override) outranks the
    /// configuration. Without any available candidate the translator
    /// switches to default text.
    #[must_use]
    pub fn resolve_locale(&self, explicit: Option<&str>, translator: &Translator) -> LocaleSelection {
        let selection = resolve_locale(translator, explicit, self.locale(), &self.locales);
        selection.log_outcome("lintel::config");
        selection
    }
}

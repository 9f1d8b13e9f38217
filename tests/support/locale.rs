use std::convert::Infallible;
use std::str::FromStr;

fn unquote(input: &str) -> &str {
    input
        .trim()
        .trim_matches(|candidate| matches!(candidate, '"' | '\''))
}

/// Single locale name from a step, with surrounding quotes removed.
///
/// Quoting lets scenarios spell blank values (`""`, `"  "`).
#[derive(Clone, Debug)]
pub struct StepLocale(String);

impl FromStr for StepLocale {
    type Err = Infallible;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        Ok(Self(unquote(input).to_owned()))
    }
}

impl StepLocale {
    /// Consumes the step value, yielding the locale name.
    pub fn into_inner(self) -> String {
        self.0
    }
}

/// Comma-separated priority list from a step, such as `ja_JP, fr_FR`.
#[derive(Clone, Debug, Default)]
pub struct StepLocaleList(Vec<String>);

impl FromStr for StepLocaleList {
    type Err = Infallible;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let entries = input
            .split(',')
            .map(unquote)
            .filter(|entry| !entry.is_empty())
            .map(str::to_owned)
            .collect();
        Ok(Self(entries))
    }
}

impl StepLocaleList {
    /// Consumes the step value, yielding the entries in order.
    pub fn into_inner(self) -> Vec<String> {
        self.0
    }
}

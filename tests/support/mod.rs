//! Shared step-parameter parsers for the behaviour suites.
//!
//! `locale` turns quoted locale names and comma-separated priority lists in
//! feature files into the values the configuration layer expects.
pub mod locale;

//! Document lint sessions and the C embedding interface.
//!
//! [`DocumentSession`] is the Rust-level API: one per open buffer, sharing a
//! translator with its siblings. The [`boundary`] module wraps sessions in
//! opaque handles for hosts that load `lintel_suite` as a `cdylib`.

pub mod boundary;
mod session;

pub use boundary::{LintelWebDemoDiagnostic, LintelWebDemoDocument};
pub use session::{DocumentSession, SessionError, SessionState};

//! C embedding interface.
//!
//! Documents are opaque heap handles. Diagnostics come back as a contiguous
//! array of [`LintelWebDemoDiagnostic`] records closed by a sentinel whose
//! `message` is null and whose `code` is the empty string. The array and its
//! strings belong to the document and stay valid until the next
//! `set_text`, `lint` or `destroy_document` call on that handle.
//!
//! Every entry point catches panics; a caught panic behaves like a no-op or
//! a sentinel-only array. Locale changes apply to the process-wide
//! translator and therefore to every document.

use std::ffi::{CStr, CString, c_char};
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::ptr;
use std::slice;

use common::diagnostics::Diagnostic;
use common::engine::LintEngine;
use common::i18n::{SharedTranslator, global_translator};
use lintel_lexer::Lexer;
use log::{debug, warn};
use once_cell::sync::Lazy;

use crate::session::DocumentSession;

/// One diagnostic as seen from C.
#[repr(C)]
#[derive(Clone, Copy, Debug)]
pub struct LintelWebDemoDiagnostic {
    /// NUL-terminated UTF-8 message; null in the sentinel record.
    pub message: *const c_char,
    /// NUL-terminated stable code such as `E0040`; empty in the sentinel.
    pub code: *const c_char,
    /// First byte of the range, inclusive.
    pub begin_offset: u32,
    /// End of the range, exclusive.
    pub end_offset: u32,
}

impl LintelWebDemoDiagnostic {
    /// Record that terminates every diagnostics array.
    pub const SENTINEL: Self = Self {
        message: ptr::null(),
        code: c"".as_ptr(),
        begin_offset: 0,
        end_offset: 0,
    };

    /// Whether this record terminates its array.
    #[must_use]
    pub const fn is_sentinel(&self) -> bool {
        self.message.is_null()
    }
}

/// Opaque document handle owned by the embedder.
///
/// Exported entry points always use the [`Lexer`] engine.
#[derive(Debug)]
pub struct LintelWebDemoDocument<E = Lexer> {
    session: DocumentSession<E>,
    records: Vec<LintelWebDemoDiagnostic>,
    messages: Vec<CString>,
}

impl LintelWebDemoDocument {
    fn new(translator: SharedTranslator) -> Self {
        Self::with_engine(translator, Lexer)
    }
}

impl<E: LintEngine> LintelWebDemoDocument<E> {
    fn with_engine(translator: SharedTranslator, engine: E) -> Self {
        Self {
            session: DocumentSession::with_engine(translator, engine),
            records: vec![LintelWebDemoDiagnostic::SENTINEL],
            messages: Vec::new(),
        }
    }

    fn set_text(&mut self, text: &[u8]) {
        self.session.set_text(text);
        self.records.clear();
        self.messages.clear();
    }

    fn lint(&mut self) -> *const LintelWebDemoDiagnostic {
        self.records.clear();
        self.messages.clear();
        match self.session.lint() {
            Ok(diagnostics) => {
                for diagnostic in diagnostics {
                    let message = c_message(diagnostic);
                    self.records.push(LintelWebDemoDiagnostic {
                        message: message.as_ptr(),
                        code: diagnostic.kind().code_cstr().as_ptr(),
                        begin_offset: diagnostic.span().begin(),
                        end_offset: diagnostic.span().end(),
                    });
                    self.messages.push(message);
                }
            }
            Err(error) => warn!(target: "lintel::boundary", "lint failed: {error}"),
        }
        self.records.push(LintelWebDemoDiagnostic::SENTINEL);
        self.records.as_ptr()
    }
}

/// Static array holding only the sentinel, returned for null handles.
struct SentinelOnly([LintelWebDemoDiagnostic; 1]);

// SAFETY: the record points at a `'static` C string literal and is never
// written through.
unsafe impl Sync for SentinelOnly {}

static SENTINEL_ONLY: SentinelOnly = SentinelOnly([LintelWebDemoDiagnostic::SENTINEL]);

/// NULL-terminated list of locale names, built once.
struct LocaleList {
    _names: Vec<CString>,
    pointers: Vec<*const c_char>,
}

// SAFETY: the pointers refer to the heap buffers of `_names`, which live as
// long as the list and are never mutated.
unsafe impl Send for LocaleList {}
// SAFETY: see `Send`; the list is read-only after construction.
unsafe impl Sync for LocaleList {}

static LOCALE_LIST: Lazy<LocaleList> = Lazy::new(|| {
    let translator = global_translator();
    let names: Vec<CString> = translator
        .catalog()
        .locales()
        .iter()
        .chain([""])
        .filter_map(|name| CString::new(name).ok())
        .collect();
    let pointers = names
        .iter()
        .map(|name| name.as_ptr())
        .chain([ptr::null()])
        .collect();
    LocaleList {
        _names: names,
        pointers,
    }
});

fn c_message(diagnostic: &Diagnostic) -> CString {
    let message = diagnostic.message();
    let message = if message.contains('\0') {
        message.replace('\0', "\u{FFFD}")
    } else {
        message.to_owned()
    };
    CString::new(message).unwrap_or_default()
}

fn guard<T>(entry: &str, fallback: T, call: impl FnOnce() -> T) -> T {
    catch_unwind(AssertUnwindSafe(call)).unwrap_or_else(|_| {
        warn!(target: "lintel::boundary", "{entry} panicked; returning the fallback");
        fallback
    })
}

/// Create a document that uses the process-wide translator.
///
/// Release it with [`lintel_web_demo_destroy_document`]. Returns null only
/// if construction panicked.
#[unsafe(no_mangle)]
pub extern "C" fn lintel_web_demo_create_document() -> *mut LintelWebDemoDocument {
    guard("create_document", ptr::null_mut(), || {
        Box::into_raw(Box::new(LintelWebDemoDocument::new(global_translator())))
    })
}

/// Destroy a document and every array it returned.
///
/// # Safety
///
/// `document` must be null or a handle from
/// [`lintel_web_demo_create_document`] that has not been destroyed yet.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn lintel_web_demo_destroy_document(document: *mut LintelWebDemoDocument) {
    if document.is_null() {
        return;
    }
    guard("destroy_document", (), || {
        // SAFETY: the caller hands back a live handle created by `Box::into_raw`.
        drop(unsafe { Box::from_raw(document) });
    });
}

/// Replace the document text with `length` bytes at `text`.
///
/// A null `text` with a zero `length` sets empty text; with a non-zero
/// `length` the call does nothing.
///
/// # Safety
///
/// `document` must be null or a live handle, and `text` must be null or
/// point at `length` readable bytes.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn lintel_web_demo_set_text(
    document: *mut LintelWebDemoDocument,
    text: *const u8,
    length: usize,
) {
    // SAFETY: the caller guarantees the handle is null or live and unaliased.
    let Some(document) = (unsafe { document.as_mut() }) else {
        return;
    };
    let text: &[u8] = match (text.is_null(), length) {
        (true, 0) => &[],
        (true, _) => {
            warn!(target: "lintel::boundary", "ignoring null text of length {length}");
            return;
        }
        // SAFETY: the caller guarantees `length` readable bytes at `text`.
        (false, _) => unsafe { slice::from_raw_parts(text, length) },
    };
    guard("set_text", (), || document.set_text(text));
}

/// Lint the document and return its sentinel-terminated diagnostics.
///
/// Null handles and engine faults yield an array holding only the sentinel.
///
/// # Safety
///
/// `document` must be null or a live handle.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn lintel_web_demo_lint(
    document: *mut LintelWebDemoDocument,
) -> *const LintelWebDemoDiagnostic {
    let sentinel_only = SENTINEL_ONLY.0.as_ptr();
    // SAFETY: the caller guarantees the handle is null or live and unaliased.
    let Some(document) = (unsafe { document.as_mut() }) else {
        return sentinel_only;
    };
    guard("lint", sentinel_only, || document.lint())
}

/// Select the translation locale named `locale` for every document.
///
/// The locale is process-wide, so `document` is not read and may be null.
/// An unknown, empty or non-UTF-8 name switches to default text. `C` and
/// `POSIX` also select default text. A null `locale` does nothing.
///
/// # Safety
///
/// `locale` must be null or a NUL-terminated string.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn lintel_web_demo_set_locale(
    _document: *mut LintelWebDemoDocument,
    locale: *const c_char,
) {
    if locale.is_null() {
        return;
    }
    // SAFETY: the caller guarantees a NUL-terminated string.
    let locale = unsafe { CStr::from_ptr(locale) };
    guard("set_locale", (), || {
        let translator = global_translator();
        match locale.to_str() {
            Ok(name) if translator.select_best_locale(&[name]) => {}
            Ok(name) => {
                debug!(target: "lintel::boundary", "locale `{name}` unavailable; using default text");
                translator.use_default();
            }
            Err(_) => {
                debug!(target: "lintel::boundary", "locale name is not UTF-8; using default text");
                translator.use_default();
            }
        }
    });
}

/// Every selectable locale name followed by `""` (default text), closed by
/// a null pointer. The array lives for the rest of the process.
#[unsafe(no_mangle)]
pub extern "C" fn lintel_list_locales() -> *const *const c_char {
    static EMPTY: SentinelList = SentinelList([ptr::null()]);
    guard("list_locales", EMPTY.0.as_ptr(), || LOCALE_LIST.pointers.as_ptr())
}

/// Null-only pointer list returned if the locale list cannot be built.
struct SentinelList([*const c_char; 1]);

// SAFETY: holds a single null pointer.
unsafe impl Sync for SentinelList {}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::sync::Arc;

    use super::*;
    use common::diagnostics::Finding;
    use common::engine::EngineFault;
    use common::i18n::{Translator, builtin_catalog};
    use rstest::{fixture, rstest};

    /// Lexer that can be switched into failing.
    #[derive(Debug, Default)]
    struct SwitchableEngine {
        failing: Cell<bool>,
    }

    impl LintEngine for SwitchableEngine {
        fn analyze(&self, text: &[u8]) -> Result<Vec<Finding>, EngineFault> {
            if self.failing.get() {
                return Err(EngineFault::Internal {
                    reason: "switched off".to_owned(),
                });
            }
            Lexer.analyze(text)
        }
    }

    #[fixture]
    fn translator() -> SharedTranslator {
        Arc::new(Translator::new(builtin_catalog()))
    }

    fn records(mut cursor: *const LintelWebDemoDiagnostic) -> Vec<(u32, u32)> {
        let mut spans = Vec::new();
        loop {
            // SAFETY: the array is sentinel-terminated and owned by a live document.
            let record = unsafe { *cursor };
            if record.is_sentinel() {
                return spans;
            }
            spans.push((record.begin_offset, record.end_offset));
            // SAFETY: the sentinel has not been reached yet.
            cursor = unsafe { cursor.add(1) };
        }
    }

    #[rstest]
    fn engine_faults_yield_only_the_sentinel(translator: SharedTranslator) {
        let engine = SwitchableEngine::default();
        let mut document = LintelWebDemoDocument::with_engine(translator, &engine);
        document.set_text(b"@ 'open");
        assert_eq!(records(document.lint()), vec![(0, 1), (2, 7)]);

        engine.failing.set(true);
        let array = document.lint();

        assert!(records(array).is_empty());
        // SAFETY: `array` points at the document's live records.
        let sentinel = unsafe { *array };
        assert_eq!(
            // SAFETY: the sentinel code is a static C string literal.
            unsafe { CStr::from_ptr(sentinel.code) }.to_bytes(),
            b""
        );
        assert_eq!(document.records.len(), 1);
        assert!(document.messages.is_empty());
    }

    #[rstest]
    fn guard_returns_the_fallback_after_a_panic() {
        assert_eq!(guard("plain_call", 7, || 3), 3);
        assert_eq!(guard("panicking_call", 7, || panic!("boom")), 7);
    }

    #[rstest]
    fn new_documents_hold_only_the_sentinel(translator: SharedTranslator) {
        let document = LintelWebDemoDocument::new(translator);
        assert_eq!(document.records.len(), 1);
        assert!(document.records[0].is_sentinel());
    }
}

//! Behaviour-driven coverage for document sessions sharing a translator.

use std::cell::RefCell;
use std::sync::Arc;

use common::diagnostics::Diagnostic;
use common::i18n::{SharedTranslator, Translator, builtin_catalog};
use lintel_suite::{DocumentSession, SessionState};
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};

struct SessionWorld {
    translator: SharedTranslator,
    first: RefCell<Option<DocumentSession>>,
    second: RefCell<Option<DocumentSession>>,
    lints: RefCell<Vec<Vec<Diagnostic>>>,
    second_lint: RefCell<Vec<Diagnostic>>,
}

impl SessionWorld {
    fn new() -> Self {
        Self {
            translator: Arc::new(Translator::new(builtin_catalog())),
            first: RefCell::new(None),
            second: RefCell::new(None),
            lints: RefCell::new(Vec::new()),
            second_lint: RefCell::new(Vec::new()),
        }
    }

    fn session_with(&self, text: &str) -> DocumentSession {
        let mut session = DocumentSession::new(Arc::clone(&self.translator));
        session.set_text(text.as_bytes());
        session
    }

    fn lint(slot: &RefCell<Option<DocumentSession>>) -> Vec<Diagnostic> {
        slot.borrow_mut()
            .as_mut()
            .unwrap_or_else(|| panic!("session should exist"))
            .lint()
            .unwrap_or_else(|error| panic!("lint should succeed: {error}"))
            .to_vec()
    }

    fn latest(&self) -> Vec<Diagnostic> {
        self.lints
            .borrow()
            .last()
            .cloned()
            .unwrap_or_else(|| panic!("the session should have been linted"))
    }
}

#[fixture]
fn world() -> SessionWorld {
    SessionWorld::new()
}

#[given("a session with text {text}")]
fn given_session(world: &SessionWorld, text: String) {
    *world.first.borrow_mut() = Some(world.session_with(&text));
}

#[given("a second session with text {text}")]
fn given_second_session(world: &SessionWorld, text: String) {
    *world.second.borrow_mut() = Some(world.session_with(&text));
}

#[when("the session is linted twice")]
fn when_lint_twice(world: &SessionWorld) {
    for _ in 0..2 {
        let diagnostics = SessionWorld::lint(&world.first);
        world.lints.borrow_mut().push(diagnostics);
    }
}

#[when("the shared translator switches to {locale}")]
fn when_switch(world: &SessionWorld, locale: String) {
    assert!(world.translator.set_locale_explicit(&locale));
}

#[when("both sessions are linted")]
fn when_lint_both(world: &SessionWorld) {
    let first = SessionWorld::lint(&world.first);
    world.lints.borrow_mut().push(first);
    *world.second_lint.borrow_mut() = SessionWorld::lint(&world.second);
}

#[when("the session text becomes {text}")]
fn when_text_changes(world: &SessionWorld, text: String) {
    world
        .first
        .borrow_mut()
        .as_mut()
        .unwrap_or_else(|| panic!("session should exist"))
        .set_text(text.as_bytes());
}

#[then("both lints are identical")]
fn then_identical(world: &SessionWorld) {
    let lints = world.lints.borrow();
    assert_eq!(lints.len(), 2);
    assert_eq!(lints.first(), lints.last());
}

#[then("the session reports {code} from {begin} to {end}")]
fn then_reports(world: &SessionWorld, code: String, begin: u32, end: u32) {
    let latest = world.latest();
    let [diagnostic] = latest.as_slice() else {
        panic!("expected one diagnostic, got {latest:?}");
    };
    assert_eq!(diagnostic.code(), code);
    assert_eq!((diagnostic.span().begin(), diagnostic.span().end()), (begin, end));
}

#[then("the first session says {message}")]
fn then_first_says(world: &SessionWorld, message: String) {
    let latest = world.latest();
    assert_eq!(latest.first().map(Diagnostic::message), Some(message.as_str()));
}

#[then("the second session says {message}")]
fn then_second_says(world: &SessionWorld, message: String) {
    let second = world.second_lint.borrow();
    assert_eq!(second.first().map(Diagnostic::message), Some(message.as_str()));
}

#[then("the session has no diagnostics")]
fn then_no_diagnostics(world: &SessionWorld) {
    let first = world.first.borrow();
    let session = first.as_ref().unwrap_or_else(|| panic!("session should exist"));
    assert!(session.diagnostics().is_empty());
}

#[then("the session state is TextSet")]
fn then_text_set(world: &SessionWorld) {
    let first = world.first.borrow();
    let session = first.as_ref().unwrap_or_else(|| panic!("session should exist"));
    assert_eq!(session.state(), SessionState::TextSet);
}

#[scenario(path = "tests/features/session.feature", index = 0)]
fn scenario_repeated_lints(world: SessionWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/session.feature", index = 1)]
fn scenario_sticky_locale(world: SessionWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/session.feature", index = 2)]
fn scenario_stale_diagnostics(world: SessionWorld) {
    let _ = world;
}

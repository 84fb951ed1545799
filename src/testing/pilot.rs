//! Pilot: programmatic interaction with a headless App.
//!
//! The `Pilot` wraps an [`App`] and provides methods to simulate user input
//! (clicks, key presses, typing), dispatch it, let spawned navigation run, and
//! dump the DOM for snapshot testing.
//!
//! Listeners that navigate spawn local tasks, so a pilot that clicks through
//! dialogs must run inside a `tokio::task::LocalSet`.

use crate::app::{App, AppConfig};
use crate::context::Ui;
use crate::event::{InputEvent, Key, KeyEvent, Modifiers};
use crate::testing::snapshot::dom_to_string;
use crate::view::View;

/// How many times [`Pilot::settle`] yields to the scheduler.
const SETTLE_ROUNDS: usize = 16;

// ---------------------------------------------------------------------------
// Pilot
// ---------------------------------------------------------------------------

/// A headless app driver for testing.
///
/// # Examples
///
/// ```ignore
/// use panekit::testing::Pilot;
/// use panekit::event::Key;
///
/// let mut pilot = Pilot::new();
/// pilot.app_mut().boot().await?;
/// pilot.press_key(Key::Escape);
/// pilot.settle().await;
/// assert!(pilot.is_running());
/// ```
pub struct Pilot {
    app: App,
}

impl Pilot {
    /// Create a pilot around an app with the default config.
    pub fn new() -> Self {
        Self::with_config(AppConfig::default())
    }

    pub fn with_config(config: AppConfig) -> Self {
        Self {
            app: App::new(config),
        }
    }

    /// Wrap an existing app.
    pub fn from_app(app: App) -> Self {
        Self { app }
    }

    // ── Input simulation ─────────────────────────────────────────────

    /// Queue a click on `view`.
    pub fn click(&mut self, view: &View) {
        self.app.handle_input(InputEvent::Click { target: view.id() });
    }

    /// Queue a key press with no modifiers.
    pub fn press_key(&mut self, key: Key) {
        self.press_key_with(key, Modifiers::NONE);
    }

    /// Queue a key press with the given modifiers.
    pub fn press_key_with(&mut self, key: Key, modifiers: Modifiers) {
        self.app.handle_input(InputEvent::Key(KeyEvent::new(key, modifiers)));
    }

    /// Queue each character of `text` as an individual key press.
    pub fn type_text(&mut self, text: &str) {
        for ch in text.chars() {
            self.press_key(Key::Char(ch));
        }
    }

    // ── Processing ───────────────────────────────────────────────────

    /// Dispatch every queued event. Returns how many were processed.
    pub fn process(&mut self) -> usize {
        self.app.handle_events()
    }

    /// Dispatch queued events, then yield so spawned navigation tasks run to
    /// completion, dispatching again afterwards.
    pub async fn settle(&mut self) {
        self.process();
        for _ in 0..SETTLE_ROUNDS {
            tokio::task::yield_now().await;
        }
        self.process();
    }

    // ── Query ────────────────────────────────────────────────────────

    pub fn app(&self) -> &App {
        &self.app
    }

    pub fn app_mut(&mut self) -> &mut App {
        &mut self.app
    }

    pub fn ui(&self) -> &Ui {
        self.app.ui()
    }

    /// The focused view, if any.
    pub fn focused(&self) -> Option<View> {
        self.app.ui().focused()
    }

    /// Whether the app is still running (has not quit).
    pub fn is_running(&self) -> bool {
        !self.app.should_quit()
    }

    /// The whole document as an outline.
    pub fn snapshot(&self) -> String {
        dom_to_string(&self.app.ui().dom())
    }
}

impl Default for Pilot {
    fn default() -> Self {
        Self::new()
    }
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use super::*;

    #[test]
    fn new_pilot_is_running() {
        let pilot = Pilot::new();
        assert!(pilot.is_running());
        assert_eq!(pilot.focused(), None);
    }

    #[test]
    fn ctrl_c_stops_the_app() {
        let mut pilot = Pilot::new();
        pilot.press_key_with(Key::Char('c'), Modifiers::CTRL);
        assert!(!pilot.is_running());
    }

    #[test]
    fn type_text_edits_the_focused_field() {
        let mut pilot = Pilot::new();
        let field = View::text_field(pilot.ui(), &["name"]);
        pilot.app().root().view().append_child(&field);
        field.focus();

        let changes = Rc::new(Cell::new(0));
        let count = Rc::clone(&changes);
        field.on_changed(move |_| count.set(count.get() + 1));

        pilot.type_text("abc");
        pilot.press_key(Key::Backspace);
        assert_eq!(pilot.process(), 4);

        assert_eq!(field.text().as_deref(), Some("ab"));
        assert_eq!(changes.get(), 4);
    }

    #[test]
    fn click_reaches_the_target() {
        let mut pilot = Pilot::new();
        let button = View::button(pilot.ui(), &["go"], "go");
        pilot.app().root().view().append_child(&button);

        let clicked = Rc::new(Cell::new(false));
        let flag = Rc::clone(&clicked);
        button.on_click(move |_| flag.set(true));

        pilot.click(&button);
        pilot.process();
        assert!(clicked.get());
    }

    #[test]
    fn snapshot_starts_at_body() {
        let pilot = Pilot::new();
        assert!(pilot.snapshot().starts_with("body\n  view.root-view-controller"));
    }
}

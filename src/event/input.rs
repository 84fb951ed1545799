//! Input event types, decoupled from crossterm.
//!
//! Terminal events come in through [`from_crossterm`] and the `From` impls;
//! nothing past this module sees crossterm types.

use std::ops::BitOr;

use crossterm::event::{KeyCode, KeyModifiers};

use crate::dom::{Dom, NodeId};
use crate::event::handler::EventDispatcher;

// ---------------------------------------------------------------------------
// Keys
// ---------------------------------------------------------------------------

/// The keys the dispatcher understands. Anything else arrives as
/// [`Key::Escape`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    /// A printable character, typed into the focused field.
    Char(char),
    /// Submits; bubbles from the focused node.
    Enter,
    /// Cancels; bubbles from the focused node.
    Escape,
    /// Next focusable node.
    Tab,
    /// Previous focusable node.
    BackTab,
    /// Deletes the last character of the focused field.
    Backspace,
    Delete,
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
}

/// Held modifier keys, as a set of flag bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Modifiers(u8);

impl Modifiers {
    pub const NONE: Modifiers = Modifiers(0);
    pub const SHIFT: Modifiers = Modifiers(0b001);
    pub const CTRL: Modifiers = Modifiers(0b010);
    pub const ALT: Modifiers = Modifiers(0b100);

    /// Whether every flag of `other` is held.
    pub fn contains(self, other: Modifiers) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn is_empty(self) -> bool {
        self == Self::NONE
    }
}

impl BitOr for Modifiers {
    type Output = Modifiers;

    fn bitor(self, rhs: Modifiers) -> Modifiers {
        Modifiers(self.0 | rhs.0)
    }
}

impl From<KeyModifiers> for Modifiers {
    fn from(held: KeyModifiers) -> Self {
        [
            (KeyModifiers::SHIFT, Modifiers::SHIFT),
            (KeyModifiers::CONTROL, Modifiers::CTRL),
            (KeyModifiers::ALT, Modifiers::ALT),
        ]
        .into_iter()
        .filter(|(terminal, _)| held.contains(*terminal))
        .fold(Modifiers::NONE, |acc, (_, ours)| acc | ours)
    }
}

/// One key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyEvent {
    pub code: Key,
    pub modifiers: Modifiers,
}

impl KeyEvent {
    pub fn new(code: Key, modifiers: Modifiers) -> Self {
        Self { code, modifiers }
    }

    /// A key event without modifiers.
    pub fn plain(code: Key) -> Self {
        Self::new(code, Modifiers::NONE)
    }

    /// Whether this is Ctrl+C.
    pub fn is_interrupt(&self) -> bool {
        self.code == Key::Char('c') && self.modifiers.contains(Modifiers::CTRL)
    }
}

impl From<crossterm::event::KeyEvent> for KeyEvent {
    fn from(event: crossterm::event::KeyEvent) -> Self {
        let code = match event.code {
            KeyCode::Char(c) => Key::Char(c),
            KeyCode::Enter => Key::Enter,
            KeyCode::Tab => Key::Tab,
            KeyCode::BackTab => Key::BackTab,
            KeyCode::Backspace => Key::Backspace,
            KeyCode::Delete => Key::Delete,
            KeyCode::Up => Key::Up,
            KeyCode::Down => Key::Down,
            KeyCode::Left => Key::Left,
            KeyCode::Right => Key::Right,
            KeyCode::Home => Key::Home,
            KeyCode::End => Key::End,
            _ => Key::Escape,
        };
        KeyEvent::new(code, event.modifiers.into())
    }
}

// ---------------------------------------------------------------------------
// InputEvent
// ---------------------------------------------------------------------------

/// Everything the dispatcher can route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEvent {
    /// A key press, delivered to the focused node.
    Key(KeyEvent),
    /// A click on a node.
    Click { target: NodeId },
    /// A scroll request on a node.
    Scroll { target: NodeId, dx: i32, dy: i32 },
    /// Text entered into the focused node.
    Paste(String),
}

/// Translate a terminal event into an [`InputEvent`].
///
/// Mouse presses and wheel turns are hit-tested against the bounds stored in
/// `dom`. Returns `None` for events with no counterpart (resize, focus, mouse
/// motion) or for mouse events that hit nothing.
pub fn from_crossterm(event: crossterm::event::Event, dom: &Dom) -> Option<InputEvent> {
    use crossterm::event::{Event, MouseButton, MouseEventKind};

    match event {
        Event::Key(ke) => Some(InputEvent::Key(KeyEvent::from(ke))),
        Event::Paste(text) => Some(InputEvent::Paste(text)),
        Event::Mouse(me) => {
            let target = EventDispatcher::hit_test(dom, i32::from(me.column), i32::from(me.row))?;
            match me.kind {
                MouseEventKind::Down(MouseButton::Left) => Some(InputEvent::Click { target }),
                MouseEventKind::ScrollUp => Some(InputEvent::Scroll { target, dx: 0, dy: -1 }),
                MouseEventKind::ScrollDown => Some(InputEvent::Scroll { target, dx: 0, dy: 1 }),
                MouseEventKind::ScrollLeft => Some(InputEvent::Scroll { target, dx: -1, dy: 0 }),
                MouseEventKind::ScrollRight => Some(InputEvent::Scroll { target, dx: 1, dy: 0 }),
                _ => None,
            }
        }
        _ => None,
    }
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::NodeData;
    use crate::geometry::Region;

    // ── Modifiers ────────────────────────────────────────────────────

    #[test]
    fn terminal_modifiers_map_to_flags() {
        let held = Modifiers::from(KeyModifiers::CONTROL | KeyModifiers::ALT);
        assert!(held.contains(Modifiers::CTRL | Modifiers::ALT));
        assert!(!held.contains(Modifiers::SHIFT));
        assert!(Modifiers::from(KeyModifiers::NONE).is_empty());
    }

    // ── KeyEvent ─────────────────────────────────────────────────────

    #[test]
    fn interrupt_is_ctrl_c() {
        assert!(KeyEvent::new(Key::Char('c'), Modifiers::CTRL).is_interrupt());
        assert!(!KeyEvent::plain(Key::Char('c')).is_interrupt());
    }

    #[test]
    fn from_crossterm_key_with_ctrl() {
        let event = KeyEvent::from(crossterm::event::KeyEvent::new(
            KeyCode::Char('c'),
            KeyModifiers::CONTROL,
        ));
        assert_eq!(event.code, Key::Char('c'));
        assert!(event.is_interrupt());
    }

    #[test]
    fn unsupported_keys_cancel() {
        for (code, expected) in [
            (KeyCode::Enter, Key::Enter),
            (KeyCode::Esc, Key::Escape),
            (KeyCode::BackTab, Key::BackTab),
            (KeyCode::PageDown, Key::Escape),
            (KeyCode::F(5), Key::Escape),
        ] {
            let event = crossterm::event::KeyEvent::new(code, KeyModifiers::NONE);
            assert_eq!(KeyEvent::from(event).code, expected);
        }
    }

    // ── from_crossterm ───────────────────────────────────────────────

    fn dom_with_button() -> (Dom, NodeId) {
        let mut dom = Dom::new();
        let mut data = NodeData::new("button");
        data.bounds = Region::new(2, 2, 4, 1);
        let button = dom.insert(data);
        let body = dom.body();
        dom.append_child(body, button);
        (dom, button)
    }

    fn mouse(kind: crossterm::event::MouseEventKind, x: u16, y: u16) -> crossterm::event::Event {
        crossterm::event::Event::Mouse(crossterm::event::MouseEvent {
            kind,
            column: x,
            row: y,
            modifiers: KeyModifiers::NONE,
        })
    }

    #[test]
    fn left_press_becomes_click_on_hit_node() {
        let (dom, button) = dom_with_button();
        let ev = mouse(
            crossterm::event::MouseEventKind::Down(crossterm::event::MouseButton::Left),
            3,
            2,
        );
        assert_eq!(from_crossterm(ev, &dom), Some(InputEvent::Click { target: button }));
    }

    #[test]
    fn press_outside_everything_is_dropped() {
        let (dom, _) = dom_with_button();
        let ev = mouse(
            crossterm::event::MouseEventKind::Down(crossterm::event::MouseButton::Left),
            40,
            40,
        );
        assert_eq!(from_crossterm(ev, &dom), None);
    }

    #[test]
    fn wheel_becomes_scroll() {
        let (dom, button) = dom_with_button();
        let ev = mouse(crossterm::event::MouseEventKind::ScrollDown, 2, 2);
        assert_eq!(
            from_crossterm(ev, &dom),
            Some(InputEvent::Scroll { target: button, dx: 0, dy: 1 })
        );
    }

    #[test]
    fn key_and_paste_pass_through() {
        let dom = Dom::new();
        let key = crossterm::event::Event::Key(crossterm::event::KeyEvent::new(
            KeyCode::Char('q'),
            KeyModifiers::NONE,
        ));
        assert_eq!(
            from_crossterm(key, &dom),
            Some(InputEvent::Key(KeyEvent::plain(Key::Char('q'))))
        );
        let paste = crossterm::event::Event::Paste("hi".into());
        assert_eq!(from_crossterm(paste, &dom), Some(InputEvent::Paste("hi".into())));
        assert_eq!(from_crossterm(crossterm::event::Event::FocusLost, &dom), None);
    }
}

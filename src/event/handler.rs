//! Event dispatch: input queue, bubble paths, and delivery plans.
//!
//! [`EventDispatcher`] maintains a queue of [`InputEvent`]s. Routing an event
//! is split in two: [`EventDispatcher::route`] works out, against the DOM,
//! which nodes receive what (applying any state change the input implies,
//! such as a scroll offset or typed text), and [`Delivery::deliver`] then runs
//! the listeners. The split means no DOM borrow is held while listeners run,
//! so listeners are free to mutate the tree.

use std::collections::VecDeque;
use std::rc::Rc;

use tracing::trace;

use super::input::{InputEvent, Key, Modifiers};
use crate::dom::node::{NodeData, NodeEvents, NodeId};
use crate::dom::tree::Dom;
use crate::geometry::Offset;

// ---------------------------------------------------------------------------
// Delivery
// ---------------------------------------------------------------------------

/// One listener invocation, computed by [`EventDispatcher::route`].
#[derive(Debug, Clone)]
pub enum Delivery {
    Click { events: Rc<NodeEvents>, target: NodeId },
    EnterKey { events: Rc<NodeEvents>, target: NodeId },
    EscapeKey { events: Rc<NodeEvents>, target: NodeId },
    Scrolled { events: Rc<NodeEvents>, offset: Offset },
    Changed { events: Rc<NodeEvents>, text: String },
}

impl Delivery {
    /// Run the listeners for this delivery.
    pub fn deliver(&self) {
        match self {
            Delivery::Click { events, target } => events.on_click.emit(target),
            Delivery::EnterKey { events, target } => events.on_enter_key.emit(target),
            Delivery::EscapeKey { events, target } => events.on_escape_key.emit(target),
            Delivery::Scrolled { events, offset } => events.on_scrolled.emit(offset),
            Delivery::Changed { events, text } => events.on_changed.emit(text),
        }
    }
}

// ---------------------------------------------------------------------------
// EventDispatcher
// ---------------------------------------------------------------------------

/// Queue-based input dispatcher.
///
/// Events are enqueued via `push` and drained for processing via `drain`.
#[derive(Debug, Default)]
pub struct EventDispatcher {
    queue: VecDeque<InputEvent>,
}

impl EventDispatcher {
    /// Create a new, empty dispatcher.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enqueue an input event for later processing.
    pub fn push(&mut self, event: InputEvent) {
        self.queue.push_back(event);
    }

    /// Drain all pending events, oldest first.
    pub fn drain(&mut self) -> Vec<InputEvent> {
        self.queue.drain(..).collect()
    }

    /// Number of pending events.
    pub fn pending_count(&self) -> usize {
        self.queue.len()
    }

    /// Whether the queue is empty.
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Compute the bubble path from `start` up to the topmost ancestor
    /// (inclusive).
    ///
    /// Returns `[start, parent, grandparent, ...]`, or an empty vec if `start`
    /// does not exist.
    pub fn bubble_path(dom: &Dom, start: NodeId) -> Vec<NodeId> {
        if !dom.contains(start) {
            return Vec::new();
        }
        let mut path = vec![start];
        path.extend(dom.ancestors(start));
        path
    }

    /// The topmost visible attached node whose bounds contain the point.
    ///
    /// Later nodes in tree order paint over earlier ones, so the last match in
    /// a pre-order walk wins. Hidden subtrees are skipped.
    pub fn hit_test(dom: &Dom, x: i32, y: i32) -> Option<NodeId> {
        let mut hit = None;
        let mut stack = vec![dom.body()];
        while let Some(current) = stack.pop() {
            let Some(data) = dom.get(current) else {
                continue;
            };
            if data.hidden {
                continue;
            }
            if data.bounds.contains(x, y) {
                hit = Some(current);
            }
            stack.extend(dom.children(current).iter().rev().copied());
        }
        hit
    }

    /// Work out the deliveries for `event`.
    ///
    /// Clicks bubble from their target; Enter and Escape bubble from the
    /// focused node. Bubbling stops after the first node whose matching
    /// `propagate_*` flag is off. Hidden or disabled targets swallow clicks.
    /// Tab and BackTab move focus; text input and Backspace edit the focused
    /// node's text.
    pub fn route(dom: &mut Dom, event: &InputEvent) -> Vec<Delivery> {
        trace!(?event, "route");
        match event {
            InputEvent::Click { target } => {
                let Some(data) = dom.get(*target) else {
                    return Vec::new();
                };
                if data.hidden || data.disabled {
                    return Vec::new();
                }
                Self::bubble(dom, *target, |d| d.propagate_clicks)
                    .into_iter()
                    .map(|events| Delivery::Click {
                        events,
                        target: *target,
                    })
                    .collect()
            }
            InputEvent::Key(key) => match key.code {
                Key::Enter | Key::Escape => {
                    let Some(target) = dom.focused() else {
                        return Vec::new();
                    };
                    let enter = key.code == Key::Enter;
                    Self::bubble(dom, target, |d| d.propagate_keys)
                        .into_iter()
                        .map(|events| {
                            if enter {
                                Delivery::EnterKey { events, target }
                            } else {
                                Delivery::EscapeKey { events, target }
                            }
                        })
                        .collect()
                }
                Key::Tab => {
                    Self::cycle_focus(dom, true);
                    Vec::new()
                }
                Key::BackTab => {
                    Self::cycle_focus(dom, false);
                    Vec::new()
                }
                Key::Backspace => Self::edit_focused(dom, |text| {
                    text.pop();
                }),
                Key::Char(c) if (key.modifiers | Modifiers::SHIFT) == Modifiers::SHIFT => {
                    Self::edit_focused(dom, |text| text.push(c))
                }
                _ => Vec::new(),
            },
            InputEvent::Scroll { target, dx, dy } => {
                let Some(data) = dom.get_mut(*target) else {
                    return Vec::new();
                };
                data.scroll = data.scroll + Offset::new(*dx, *dy);
                vec![Delivery::Scrolled {
                    events: Rc::clone(&data.events),
                    offset: data.scroll,
                }]
            }
            InputEvent::Paste(pasted) => Self::edit_focused(dom, |text| text.push_str(pasted)),
        }
    }

    fn bubble(
        dom: &Dom,
        start: NodeId,
        propagates: impl Fn(&NodeData) -> bool,
    ) -> Vec<Rc<NodeEvents>> {
        let mut out = Vec::new();
        for node in Self::bubble_path(dom, start) {
            let Some(data) = dom.get(node) else {
                break;
            };
            out.push(Rc::clone(&data.events));
            if !propagates(data) {
                break;
            }
        }
        out
    }

    fn edit_focused(dom: &mut Dom, edit: impl FnOnce(&mut String)) -> Vec<Delivery> {
        let Some(target) = dom.focused() else {
            return Vec::new();
        };
        let Some(data) = dom.get_mut(target) else {
            return Vec::new();
        };
        let text = data.text.get_or_insert_with(String::new);
        edit(text);
        vec![Delivery::Changed {
            events: Rc::clone(&data.events),
            text: text.clone(),
        }]
    }

    fn cycle_focus(dom: &mut Dom, forward: bool) {
        let order: Vec<NodeId> = dom
            .walk_depth_first(dom.body())
            .into_iter()
            .filter(|&n| {
                dom.get(n).is_some_and(|d| d.is_focusable())
                    && !dom.ancestors(n).iter().any(|&a| dom.get(a).is_some_and(|d| d.hidden))
            })
            .collect();
        if order.is_empty() {
            return;
        }
        let current = dom
            .focused()
            .and_then(|f| order.iter().position(|&n| n == f));
        let next = match (current, forward) {
            (None, true) => 0,
            (None, false) => order.len() - 1,
            (Some(i), true) => (i + 1) % order.len(),
            (Some(i), false) => (i + order.len() - 1) % order.len(),
        };
        dom.focus(order[next]);
    }
}

// ===========================================================================
// Tests
// ===========================================================================

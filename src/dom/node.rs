//! Node types: NodeId, NodeData, NodeEvents.

use std::fmt;
use std::rc::Rc;

use slotmap::new_key_type;

use crate::event::Emitter;
use crate::geometry::{Offset, Region};

new_key_type! {
    /// Unique identifier for a DOM node. Copy, lightweight (u64).
    pub struct NodeId;
}

// ---------------------------------------------------------------------------
// NodeEvents
// ---------------------------------------------------------------------------

/// The events a single node emits.
///
/// Shared behind an `Rc` so a caller can clone the bundle out of a short
/// `Dom` borrow and emit without holding the borrow.
pub struct NodeEvents {
    /// A click reached this node. Carries the node the click started at.
    pub on_click: Emitter<NodeId>,
    /// Enter was pressed while this node or a descendant had focus.
    pub on_enter_key: Emitter<NodeId>,
    /// Escape was pressed while this node or a descendant had focus.
    pub on_escape_key: Emitter<NodeId>,
    /// The hidden flag was assigned. Carries the new value.
    pub on_hidden_changed: Emitter<bool>,
    /// The node was scrolled. Carries the new scroll position.
    pub on_scrolled: Emitter<Offset>,
    /// The node's text was replaced. Carries the new text.
    pub on_changed: Emitter<String>,
}

impl NodeEvents {
    pub fn new() -> Self {
        Self {
            on_click: Emitter::new("View.onClick"),
            on_enter_key: Emitter::new("View.onEnterKey"),
            on_escape_key: Emitter::new("View.onEscapeKey"),
            on_hidden_changed: Emitter::new("View.onHiddenChanged"),
            on_scrolled: Emitter::new("View.onScrolled"),
            on_changed: Emitter::new("View.onChanged"),
        }
    }

    /// Drop every listener on every event.
    pub fn clear(&self) {
        self.on_click.clear();
        self.on_enter_key.clear();
        self.on_escape_key.clear();
        self.on_hidden_changed.clear();
        self.on_scrolled.clear();
        self.on_changed.clear();
    }
}

impl Default for NodeEvents {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for NodeEvents {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeEvents")
            .field("on_click", &self.on_click.listener_count())
            .field("on_enter_key", &self.on_enter_key.listener_count())
            .field("on_escape_key", &self.on_escape_key.listener_count())
            .finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// NodeData
// ---------------------------------------------------------------------------

/// Data associated with a single DOM node.
#[derive(Debug, Clone)]
pub struct NodeData {
    /// Node kind (e.g. "view", "label", "button").
    pub tag: String,
    /// Optional unique id.
    pub id: Option<String>,
    /// Classes, in insertion order.
    pub classes: Vec<String>,
    /// Text content, for labels and buttons.
    pub text: Option<String>,
    pub hidden: bool,
    pub disabled: bool,
    pub selected: bool,
    pub clickable: bool,
    /// Positional tag set by owners (e.g. a cell's row). Advisory only.
    pub index: Option<usize>,
    /// Nodes with a tab index can take focus.
    pub tab_index: Option<i32>,
    /// Whether clicks continue to the parent after this node.
    pub propagate_clicks: bool,
    /// Whether Enter/Escape continue to the parent after this node.
    pub propagate_keys: bool,
    /// Bounds reported by the host.
    pub bounds: Region,
    /// Accumulated scroll position.
    pub scroll: Offset,
    pub events: Rc<NodeEvents>,
}

impl NodeData {
    /// Create a new `NodeData` with the given tag and sensible defaults.
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            id: None,
            classes: Vec::new(),
            text: None,
            hidden: false,
            disabled: false,
            selected: false,
            clickable: false,
            index: None,
            tab_index: None,
            propagate_clicks: true,
            propagate_keys: true,
            bounds: Region::EMPTY,
            scroll: Offset::ZERO,
            events: Rc::new(NodeEvents::new()),
        }
    }

    /// Set the id (builder).
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Add a single class (builder).
    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        let class = class.into();
        if !self.classes.contains(&class) {
            self.classes.push(class);
        }
        self
    }

    /// Add multiple classes (builder).
    pub fn with_classes(mut self, classes: impl IntoIterator<Item = impl Into<String>>) -> Self {
        for class in classes {
            let class = class.into();
            if !self.classes.contains(&class) {
                self.classes.push(class);
            }
        }
        self
    }

    /// Set the text content (builder).
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Set the tab index (builder).
    pub fn with_tab_index(mut self, tab_index: i32) -> Self {
        self.tab_index = Some(tab_index);
        self
    }

    /// Whether this node can take focus.
    pub fn is_focusable(&self) -> bool {
        self.tab_index.is_some() && !self.hidden && !self.disabled
    }

    /// Check whether this node has a given class.
    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    /// Add a class. No-op if already present.
    pub fn add_class(&mut self, class: &str) {
        if !self.has_class(class) {
            self.classes.push(class.to_owned());
        }
    }

    /// Remove a class. No-op if not present.
    pub fn remove_class(&mut self, class: &str) {
        self.classes.retain(|c| c != class);
    }

    /// Toggle a class: add if absent, remove if present.
    pub fn toggle_class(&mut self, class: &str) {
        if self.has_class(class) {
            self.remove_class(class);
        } else {
            self.add_class(class);
        }
    }
}

//! Snapshot helpers.
//!
//! Functions that dump the DOM as an indented outline, one node per line,
//! suitable for snapshot testing and assertions:
//!
//! ```text
//! body
//!   view.root-view-controller.view-controller
//!     button.done "#_ok" [focused]
//! ```
//!
//! Each line is the tag, the classes (without the implicit `view` class), the
//! id, the text in quotes, then the `hidden`/`disabled`/`selected`/`focused`
//! flags that are set. The children of a hidden node are not listed.

use std::fmt::Write;

use crate::dom::{Dom, NodeData, NodeId};
use crate::view::View;

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Dump the whole document, starting at the body.
pub fn dom_to_string(dom: &Dom) -> String {
    subtree_to_string(dom, dom.body())
}

/// Dump `view` and everything below it.
pub fn view_to_string(view: &View) -> String {
    subtree_to_string(&view.ui().dom(), view.id())
}

/// Dump the subtree rooted at `start`. Lines are joined with `'\n'`, with no
/// trailing newline.
pub fn subtree_to_string(dom: &Dom, start: NodeId) -> String {
    let mut lines = Vec::new();
    outline(dom, start, 0, &mut lines);
    lines.join("\n")
}

// ---------------------------------------------------------------------------
// Internals
// ---------------------------------------------------------------------------

fn outline(dom: &Dom, node: NodeId, depth: usize, lines: &mut Vec<String>) {
    let Some(data) = dom.get(node) else {
        return;
    };
    lines.push(format!("{}{}", "  ".repeat(depth), describe(data, dom.focused() == Some(node))));
    if data.hidden {
        return;
    }
    for &child in dom.children(node) {
        outline(dom, child, depth + 1, lines);
    }
}

fn describe(data: &NodeData, focused: bool) -> String {
    let mut line = data.tag.clone();
    for class in data.classes.iter().filter(|c| *c != "view") {
        let _ = write!(line, ".{class}");
    }
    if let Some(id) = &data.id {
        let _ = write!(line, "#{id}");
    }
    if let Some(text) = &data.text {
        let _ = write!(line, " {text:?}");
    }
    let flags = [
        (data.hidden, "hidden"),
        (data.disabled, "disabled"),
        (data.selected, "selected"),
        (focused, "focused"),
    ];
    for (_, flag) in flags.iter().filter(|(set, _)| *set) {
        let _ = write!(line, " [{flag}]");
    }
    line
}

// ===========================================================================
// Tests
// ===========================================================================

//! View: a cloneable handle to one DOM node.
//!
//! A `View` pairs the shared [`Ui`] with a [`NodeId`] and the node's event
//! bundle, so listeners can be registered and events emitted without touching
//! the DOM borrow. Every mutation is a short borrow of the DOM; emission
//! happens after the borrow is released.
//!
//! Listeners that refer back to a view (or to a controller) should capture a
//! [`WeakView`] / `Weak<_>`: a strong capture forms an `Rc` cycle through the
//! node's event bundle, which only [`View::dispose`] breaks.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::rc::{Rc, Weak};

use crate::context::{Ui, WeakUi};
use crate::dom::{NodeData, NodeEvents, NodeId};
use crate::event::ListenerId;
use crate::geometry::{Offset, Region};

#[derive(Clone)]
pub struct View {
    ui: Ui,
    id: NodeId,
    events: Rc<NodeEvents>,
}

impl View {
    /// A plain container view carrying `classes` plus `view`.
    pub fn new(ui: &Ui, classes: &[&str]) -> View {
        Self::with_tag(ui, "view", classes)
    }

    /// A view of the given kind carrying `classes` plus `view`.
    pub fn with_tag(ui: &Ui, tag: &str, classes: &[&str]) -> View {
        let data = NodeData::new(tag)
            .with_classes(classes.iter().copied())
            .with_class("view");
        ui.create(data)
    }

    /// A text label.
    pub fn label(ui: &Ui, classes: &[&str], text: impl Into<String>) -> View {
        let view = Self::with_tag(ui, "label", classes);
        view.write(|d| d.text = Some(text.into()));
        view
    }

    /// A clickable, focusable button. Clicks stop at the button.
    pub fn button(ui: &Ui, classes: &[&str], text: impl Into<String>) -> View {
        let view = Self::with_tag(ui, "button", classes);
        view.write(|d| {
            d.text = Some(text.into());
            d.clickable = true;
            d.propagate_clicks = false;
            d.tab_index = Some(0);
        });
        view
    }

    /// A focusable single-line text field.
    pub fn text_field(ui: &Ui, classes: &[&str]) -> View {
        let view = Self::with_tag(ui, "text-field", classes);
        view.write(|d| {
            d.text = Some(String::new());
            d.tab_index = Some(0);
        });
        view
    }

    pub(crate) fn from_id(ui: &Ui, id: NodeId) -> View {
        let events = ui
            .dom()
            .get(id)
            .map(|d| Rc::clone(&d.events))
            .unwrap_or_default();
        View {
            ui: ui.clone(),
            id,
            events,
        }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn ui(&self) -> &Ui {
        &self.ui
    }

    /// The node's event bundle.
    pub fn events(&self) -> &NodeEvents {
        &self.events
    }

    /// Whether the node still exists.
    pub fn exists(&self) -> bool {
        self.ui.dom().contains(self.id)
    }

    /// Read the node's data. `None` once disposed.
    pub fn read<R>(&self, f: impl FnOnce(&NodeData) -> R) -> Option<R> {
        self.ui.dom().get(self.id).map(f)
    }

    /// Mutate the node's data. `None` once disposed.
    pub fn write<R>(&self, f: impl FnOnce(&mut NodeData) -> R) -> Option<R> {
        self.ui.dom_mut().get_mut(self.id).map(f)
    }

    // -- tree ------------------------------------------------------------------

    /// Append `child`, detaching it from any previous parent. Returns its
    /// index, or `None` when the append would create a cycle.
    pub fn append_child(&self, child: &View) -> Option<usize> {
        self.ui.dom_mut().append_child(self.id, child.id)
    }

    /// Detach `child`. Returns the index it had, or `None` if it was not a
    /// child of this view.
    pub fn remove_child(&self, child: &View) -> Option<usize> {
        self.ui.dom_mut().remove_child(self.id, child.id)
    }

    /// Detach the child at `index`. `None` if out of range.
    pub fn remove_child_at_index(&self, index: usize) -> Option<View> {
        let id = self.ui.dom_mut().remove_child_at_index(self.id, index)?;
        Some(View::from_id(&self.ui, id))
    }

    /// Detach every child, returning them in order.
    pub fn remove_all_children(&self) -> Vec<View> {
        let ids = self.ui.dom_mut().remove_all_children(self.id);
        ids.into_iter().map(|id| View::from_id(&self.ui, id)).collect()
    }

    /// Detach from the parent, if any. Returns the index it had.
    pub fn remove_from_parent(&self) -> Option<usize> {
        self.ui.dom_mut().remove_from_parent(self.id)
    }

    pub fn parent(&self) -> Option<View> {
        let parent = self.ui.dom().parent(self.id)?;
        Some(View::from_id(&self.ui, parent))
    }

    pub fn children(&self) -> Vec<View> {
        let ids = self.ui.dom().children(self.id).to_vec();
        ids.into_iter().map(|id| View::from_id(&self.ui, id)).collect()
    }

    pub fn child(&self, index: usize) -> Option<View> {
        let id = self.ui.dom().children(self.id).get(index).copied()?;
        Some(View::from_id(&self.ui, id))
    }

    pub fn child_count(&self) -> usize {
        self.ui.dom().children(self.id).len()
    }

    /// Position in the parent's child list.
    pub fn index_in_parent(&self) -> Option<usize> {
        self.ui.dom().index_in_parent(self.id)
    }

    /// Direct children carrying `class`.
    pub fn children_with_class(&self, class: &str) -> Vec<View> {
        let ids = self.ui.dom().children_with_class(self.id, class);
        ids.into_iter().map(|id| View::from_id(&self.ui, id)).collect()
    }

    /// Whether the view is reachable from the body.
    pub fn is_attached(&self) -> bool {
        self.ui.dom().is_attached(self.id)
    }

    // -- flags -----------------------------------------------------------------

    pub fn is_hidden(&self) -> bool {
        self.read(|d| d.hidden).unwrap_or(true)
    }

    /// Assign the hidden flag and announce it, even if unchanged.
    pub fn set_hidden(&self, hidden: bool) {
        if self.write(|d| d.hidden = hidden).is_some() {
            self.events.on_hidden_changed.emit(&hidden);
        }
    }

    pub fn is_visible(&self) -> bool {
        !self.is_hidden()
    }

    pub fn set_visible(&self, visible: bool) {
        self.set_hidden(!visible);
    }

    pub fn is_disabled(&self) -> bool {
        self.read(|d| d.disabled).unwrap_or(false)
    }

    pub fn set_disabled(&self, disabled: bool) {
        self.write(|d| d.disabled = disabled);
    }

    pub fn is_enabled(&self) -> bool {
        !self.is_disabled()
    }

    pub fn set_enabled(&self, enabled: bool) {
        self.set_disabled(!enabled);
    }

    pub fn is_selected(&self) -> bool {
        self.read(|d| d.selected).unwrap_or(false)
    }

    pub fn set_selected(&self, selected: bool) {
        self.write(|d| d.selected = selected);
    }

    pub fn is_clickable(&self) -> bool {
        self.read(|d| d.clickable).unwrap_or(false)
    }

    pub fn set_clickable(&self, clickable: bool) {
        self.write(|d| d.clickable = clickable);
    }

    /// The advisory positional tag.
    pub fn index(&self) -> Option<usize> {
        self.read(|d| d.index).flatten()
    }

    pub fn set_index(&self, index: Option<usize>) {
        self.write(|d| d.index = index);
    }

    pub fn tab_index(&self) -> Option<i32> {
        self.read(|d| d.tab_index).flatten()
    }

    pub fn set_tab_index(&self, tab_index: Option<i32>) {
        self.write(|d| d.tab_index = tab_index);
    }

    pub fn propagates_clicks(&self) -> bool {
        self.read(|d| d.propagate_clicks).unwrap_or(true)
    }

    pub fn set_propagate_clicks(&self, propagate: bool) {
        self.write(|d| d.propagate_clicks = propagate);
    }

    pub fn propagates_keys(&self) -> bool {
        self.read(|d| d.propagate_keys).unwrap_or(true)
    }

    pub fn set_propagate_keys(&self, propagate: bool) {
        self.write(|d| d.propagate_keys = propagate);
    }

    pub fn text(&self) -> Option<String> {
        self.read(|d| d.text.clone()).flatten()
    }

    /// Replace the text and announce it.
    pub fn set_text(&self, text: impl Into<String>) {
        let text = text.into();
        if self.write(|d| d.text = Some(text.clone())).is_some() {
            self.events.on_changed.emit(&text);
        }
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.read(|d| d.has_class(class)).unwrap_or(false)
    }

    pub fn add_class(&self, class: &str) {
        self.write(|d| d.add_class(class));
    }

    pub fn remove_class(&self, class: &str) {
        self.write(|d| d.remove_class(class));
    }

    pub fn toggle_class(&self, class: &str) {
        self.write(|d| d.toggle_class(class));
    }

    pub fn classes(&self) -> Vec<String> {
        self.read(|d| d.classes.clone()).unwrap_or_default()
    }

    pub fn tag(&self) -> String {
        self.read(|d| d.tag.clone()).unwrap_or_default()
    }

    // -- geometry --------------------------------------------------------------

    /// Bounds reported by the host.
    pub fn bounds(&self) -> Region {
        self.read(|d| d.bounds).unwrap_or(Region::EMPTY)
    }

    pub fn set_bounds(&self, bounds: Region) {
        self.write(|d| d.bounds = bounds);
    }

    pub fn scroll_offset(&self) -> Offset {
        self.read(|d| d.scroll).unwrap_or(Offset::ZERO)
    }

    /// Scroll by a delta and announce the new position.
    pub fn scroll_by(&self, dx: i32, dy: i32) {
        let scroll = self.write(|d| {
            d.scroll = d.scroll + Offset::new(dx, dy);
            d.scroll
        });
        if let Some(scroll) = scroll {
            self.events.on_scrolled.emit(&scroll);
        }
    }

    /// Scroll to a position and announce it.
    pub fn scroll_to(&self, x: i32, y: i32) {
        let offset = Offset::new(x, y);
        if self.write(|d| d.scroll = offset).is_some() {
            self.events.on_scrolled.emit(&offset);
        }
    }

    // -- focus & events ----------------------------------------------------------

    /// Focus this view, then its descendants; the last focusable one wins.
    pub fn focus(&self) {
        self.ui.dom_mut().focus(self.id);
    }

    pub fn has_focus(&self) -> bool {
        self.ui.dom().focused() == Some(self.id)
    }

    /// Emit a click on this view alone, without bubbling.
    pub fn click(&self) {
        self.events.on_click.emit(&self.id);
    }

    pub fn on_click(&self, f: impl Fn(&NodeId) + 'static) -> ListenerId {
        self.events.on_click.on(f)
    }

    pub fn on_enter_key(&self, f: impl Fn(&NodeId) + 'static) -> ListenerId {
        self.events.on_enter_key.on(f)
    }

    pub fn on_escape_key(&self, f: impl Fn(&NodeId) + 'static) -> ListenerId {
        self.events.on_escape_key.on(f)
    }

    pub fn on_hidden_changed(&self, f: impl Fn(&bool) + 'static) -> ListenerId {
        self.events.on_hidden_changed.on(f)
    }

    pub fn on_scrolled(&self, f: impl Fn(&Offset) + 'static) -> ListenerId {
        self.events.on_scrolled.on(f)
    }

    pub fn on_changed(&self, f: impl Fn(&String) + 'static) -> ListenerId {
        self.events.on_changed.on(f)
    }

    pub fn downgrade(&self) -> WeakView {
        WeakView {
            ui: self.ui.downgrade(),
            id: self.id,
            events: Rc::downgrade(&self.events),
        }
    }

    /// Destroy this view and its subtree.
    ///
    /// Listeners on every node of the subtree are dropped first, releasing
    /// whatever they captured.
    pub fn dispose(&self) {
        let bundles: Vec<Rc<NodeEvents>> = {
            let dom = self.ui.dom();
            dom.walk_depth_first(self.id)
                .into_iter()
                .filter_map(|id| dom.get(id).map(|d| Rc::clone(&d.events)))
                .collect()
        };
        for events in bundles {
            events.clear();
        }
        self.ui.dom_mut().remove(self.id);
    }
}

impl PartialEq for View {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for View {}

impl Hash for View {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = self.ui.dom().get(self.id).map(|d| d.tag.clone());
        f.debug_tuple("View").field(&self.id).field(&tag).finish()
    }
}

// ---------------------------------------------------------------------------
// WeakView
// ---------------------------------------------------------------------------

/// Non-owning counterpart of [`View`], for listener captures.
#[derive(Clone, Debug)]
pub struct WeakView {
    ui: WeakUi,
    id: NodeId,
    events: Weak<NodeEvents>,
}

impl WeakView {
    /// The view, if both the UI and the node are still alive.
    pub fn upgrade(&self) -> Option<View> {
        let ui = self.ui.upgrade()?;
        let events = self.events.upgrade()?;
        if !ui.dom().contains(self.id) {
            return None;
        }
        Some(View {
            ui,
            id: self.id,
            events,
        })
    }
}

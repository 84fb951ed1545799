//! Process-wide context: the DOM, configuration, and router.
//!
//! [`Ui`] is created once at startup and handed by reference to every
//! constructor that builds views or controllers. It is a cheap `Rc` clone.
//! Borrows of the DOM are short and never held across an `.await` or an
//! emit, since listeners re-enter it.

use std::cell::{Ref, RefCell, RefMut};
use std::collections::BTreeMap;
use std::fmt;
use std::rc::{Rc, Weak};

use crate::app::AppConfig;
use crate::dom::{Dom, NodeData, NodeId};
use crate::router::Router;
use crate::view::View;

// ---------------------------------------------------------------------------
// Ui
// ---------------------------------------------------------------------------

struct UiInner {
    dom: RefCell<Dom>,
    config: AppConfig,
    router: Router,
}

/// Shared handle to the process-wide UI state.
#[derive(Clone)]
pub struct Ui(Rc<UiInner>);

impl Ui {
    pub fn new(config: AppConfig) -> Self {
        Self(Rc::new(UiInner {
            dom: RefCell::new(Dom::new()),
            config,
            router: Router::new(),
        }))
    }

    /// Borrow the DOM.
    pub fn dom(&self) -> Ref<'_, Dom> {
        self.0.dom.borrow()
    }

    /// Borrow the DOM mutably.
    pub fn dom_mut(&self) -> RefMut<'_, Dom> {
        self.0.dom.borrow_mut()
    }

    pub fn config(&self) -> &AppConfig {
        &self.0.config
    }

    pub fn router(&self) -> &Router {
        &self.0.router
    }

    /// The document body.
    pub fn body(&self) -> View {
        let body = self.dom().body();
        View::from_id(self, body)
    }

    /// The view that currently has focus.
    pub fn focused(&self) -> Option<View> {
        let focused = self.dom().focused()?;
        Some(View::from_id(self, focused))
    }

    /// A handle to an existing node.
    pub fn view(&self, id: NodeId) -> Option<View> {
        self.dom().contains(id).then(|| View::from_id(self, id))
    }

    /// Insert a detached node and return its handle.
    pub fn create(&self, data: NodeData) -> View {
        let id = self.dom_mut().insert(data);
        View::from_id(self, id)
    }

    /// A non-owning handle, for listeners that must not keep the UI alive.
    pub fn downgrade(&self) -> WeakUi {
        WeakUi(Rc::downgrade(&self.0))
    }
}

/// Non-owning counterpart of [`Ui`].
#[derive(Clone)]
pub struct WeakUi(Weak<UiInner>);

impl WeakUi {
    pub fn upgrade(&self) -> Option<Ui> {
        self.0.upgrade().map(Ui)
    }
}

impl fmt::Debug for WeakUi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("WeakUi")
    }
}

impl fmt::Debug for Ui {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Ui")
            .field("nodes", &self.0.dom.try_borrow().map(|d| d.len()).ok())
            .field("route", &self.0.router.route().to_string())
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Parameter / Preparer
// ---------------------------------------------------------------------------

/// A named, documented setting contributed by a controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    pub name: String,
    pub description: String,
    pub default: String,
}

impl Parameter {
    pub fn new(name: impl Into<String>, description: impl Into<String>, default: impl ToString) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            default: default.to_string(),
        }
    }
}

/// Registry handed to every controller's `prepare`.
#[derive(Debug, Default)]
pub struct Preparer {
    parameters: RefCell<Vec<Parameter>>,
    values: RefCell<BTreeMap<String, String>>,
}

impl Preparer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a parameter. Returns `false` if the name is already taken.
    pub fn add(&self, parameter: Parameter) -> bool {
        let mut parameters = self.parameters.borrow_mut();
        if parameters.iter().any(|p| p.name == parameter.name) {
            return false;
        }
        parameters.push(parameter);
        true
    }

    /// Override a registered parameter. Returns `false` for unknown names.
    pub fn set(&self, name: &str, value: impl ToString) -> bool {
        if !self.parameters.borrow().iter().any(|p| p.name == name) {
            return false;
        }
        self.values
            .borrow_mut()
            .insert(name.to_owned(), value.to_string());
        true
    }

    /// The current value of a parameter: its override, else its default.
    pub fn get(&self, name: &str) -> Option<String> {
        if let Some(value) = self.values.borrow().get(name) {
            return Some(value.clone());
        }
        self.parameters
            .borrow()
            .iter()
            .find(|p| p.name == name)
            .map(|p| p.default.clone())
    }

    /// Registered parameters, in registration order.
    pub fn parameters(&self) -> Vec<Parameter> {
        self.parameters.borrow().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn body_is_attached_and_unique() {
        let ui = Ui::new(AppConfig::default());
        assert_eq!(ui.body(), ui.body());
        assert!(ui.body().is_attached());
    }

    #[test]
    fn create_returns_detached_view() {
        let ui = Ui::new(AppConfig::default());
        let view = ui.create(NodeData::new("view"));
        assert!(!view.is_attached());
        assert_eq!(ui.view(view.id()), Some(view));
    }

    #[test]
    fn preparer_rejects_duplicates() {
        let preparer = Preparer::new();
        assert!(preparer.add(Parameter::new("debug", "debug mode", false)));
        assert!(!preparer.add(Parameter::new("debug", "again", true)));
        assert_eq!(preparer.parameters().len(), 1);
    }

    #[test]
    fn preparer_values_fall_back_to_default() {
        let preparer = Preparer::new();
        preparer.add(Parameter::new("page_size", "rows per page", 20));
        assert_eq!(preparer.get("page_size").as_deref(), Some("20"));
        assert!(preparer.set("page_size", 50));
        assert_eq!(preparer.get("page_size").as_deref(), Some("50"));
        assert!(!preparer.set("unknown", 1));
        assert_eq!(preparer.get("unknown"), None);
    }
}

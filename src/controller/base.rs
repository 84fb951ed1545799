//! Controller trait and the base `ViewController`.
//!
//! Controllers form a tree parallel to the DOM: every controller owns exactly
//! one [`View`], and attaching a controller attaches its view in the same
//! call. Child links are strong, parent links weak.
//!
//! The lifecycle (`prepare`, `init`, `load`, `unload`, `start`) is async and
//! fans out to every current child with `try_join_all`; `load` and `unload`
//! announce themselves only after every child has settled. Subtypes override
//! the [`Controller`] hooks and call back into the base to keep the cascade.

use std::any::Any;
use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

use futures::future::{try_join_all, LocalBoxFuture};

use crate::context::{Preparer, Ui};
use crate::error::Result;
use crate::event::Emitter;
use crate::view::{Bar, TitleBar, View};

/// Shared handle to any controller.
pub type ControllerRef = Rc<dyn Controller>;

// ---------------------------------------------------------------------------
// Controller trait
// ---------------------------------------------------------------------------

/// Behaviour shared by every controller.
///
/// Object-safe: lifecycle hooks return boxed local futures. The defaults run
/// the base [`ViewController`] behaviour; an override that builds its own
/// subtree must still await the base version, or descendants never see the
/// call.
pub trait Controller: Any {
    /// The base state every controller embeds.
    fn base(&self) -> &ViewController;

    /// Downcast to `&dyn Any` for runtime type inspection.
    fn as_any(&self) -> &dyn Any;

    /// The owned view.
    fn view(&self) -> &View {
        self.base().view()
    }

    /// Contribute parameters before anything is built.
    fn prepare<'a>(&'a self, preparer: &'a Preparer) -> LocalBoxFuture<'a, Result<()>> {
        self.base().prepare(preparer)
    }

    /// One-shot construction of state that outlives load/unload cycles.
    fn init(&self) -> LocalBoxFuture<'_, Result<()>> {
        self.base().init()
    }

    /// Mount content. Repeatable, alternating with `unload`.
    fn load(&self) -> LocalBoxFuture<'_, Result<()>> {
        self.base().load()
    }

    /// Release content.
    fn unload(&self) -> LocalBoxFuture<'_, Result<()>> {
        self.base().unload()
    }

    /// Hook run once the whole tree is loaded.
    fn start(&self) -> LocalBoxFuture<'_, Result<()>> {
        self.base().start()
    }

    /// Focus the owned view, then every child.
    fn focus(&self) {
        self.base().focus();
    }
}

impl dyn Controller {
    /// Downcast to a concrete controller type.
    pub fn downcast_ref<C: Controller>(&self) -> Option<&C> {
        self.as_any().downcast_ref::<C>()
    }

    /// Whether `self` and `other` are the same controller.
    pub fn is(&self, other: &dyn Controller) -> bool {
        std::ptr::eq(self.base(), other.base())
    }
}

impl fmt::Debug for dyn Controller {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self.base(), f)
    }
}

// ---------------------------------------------------------------------------
// ViewController
// ---------------------------------------------------------------------------

/// The base controller: a view, an ordered child list, and the lifecycle.
pub struct ViewController {
    ui: Ui,
    this: Weak<dyn Controller>,
    view: View,
    children: RefCell<Vec<ControllerRef>>,
    parent: RefCell<Option<Weak<dyn Controller>>>,
    title: RefCell<Option<String>>,
    index: Cell<Option<usize>>,
    editable: Cell<bool>,
    title_bar: RefCell<Option<TitleBar>>,
    footer_bar: RefCell<Option<Bar>>,
    /// Fires after the controller and all its children have loaded.
    pub on_loaded: Emitter<()>,
    /// Fires after the controller and all its children have unloaded.
    pub on_unloaded: Emitter<()>,
}

impl ViewController {
    /// Build a plain controller.
    pub fn create(ui: &Ui, classes: &[&str]) -> Rc<ViewController> {
        Self::build(ui, classes, |base, _| base)
    }

    /// Build a controller of type `C` around a fresh base.
    ///
    /// `make` receives the base (whose view carries `classes` plus
    /// `view-controller`) and a weak handle to the controller being built, for
    /// listeners that need to reach it later. The handle cannot be upgraded
    /// until `build` returns.
    pub fn build<C, F>(ui: &Ui, classes: &[&str], make: F) -> Rc<C>
    where
        C: Controller,
        F: FnOnce(ViewController, &Weak<C>) -> C,
    {
        Rc::new_cyclic(|weak: &Weak<C>| {
            let this: Weak<dyn Controller> = weak.clone();
            let mut all = classes.to_vec();
            all.push("view-controller");
            let base = ViewController {
                ui: ui.clone(),
                this,
                view: View::new(ui, &all),
                children: RefCell::new(Vec::new()),
                parent: RefCell::new(None),
                title: RefCell::new(None),
                index: Cell::new(None),
                editable: Cell::new(false),
                title_bar: RefCell::new(None),
                footer_bar: RefCell::new(None),
                on_loaded: Emitter::new("ViewController.onLoaded"),
                on_unloaded: Emitter::new("ViewController.onUnloaded"),
            };
            make(base, weak)
        })
    }

    /// The context this controller was built in.
    pub fn ui(&self) -> &Ui {
        &self.ui
    }

    /// The owned view. Never swapped.
    pub fn view(&self) -> &View {
        &self.view
    }

    /// The controller embedding this base, once construction has finished.
    pub fn this(&self) -> Option<ControllerRef> {
        self.this.upgrade()
    }

    // -- attributes --------------------------------------------------------------

    /// Title shown in menus and title bars.
    pub fn title(&self) -> Option<String> {
        self.title.borrow().clone()
    }

    /// Set the title. Does not touch any bar.
    pub fn set_title(&self, title: impl Into<String>) {
        *self.title.borrow_mut() = Some(title.into());
    }

    /// Advisory position set by owners.
    pub fn index(&self) -> Option<usize> {
        self.index.get()
    }

    /// Set the advisory position.
    pub fn set_index(&self, index: Option<usize>) {
        self.index.set(index);
    }

    /// Whether the controller is in edit mode.
    pub fn is_editable(&self) -> bool {
        self.editable.get()
    }

    /// Enter or leave edit mode.
    pub fn set_editable(&self, editable: bool) {
        self.editable.set(editable);
    }

    /// The title bar this controller draws into. Shared, not owned.
    pub fn title_bar(&self) -> Option<TitleBar> {
        self.title_bar.borrow().clone()
    }

    /// Point at a (possibly shared) title bar.
    pub fn set_title_bar(&self, bar: Option<TitleBar>) {
        *self.title_bar.borrow_mut() = bar;
    }

    /// The footer bar this controller draws into. Shared, not owned.
    pub fn footer_bar(&self) -> Option<Bar> {
        self.footer_bar.borrow().clone()
    }

    /// Point at a (possibly shared) footer bar.
    pub fn set_footer_bar(&self, bar: Option<Bar>) {
        *self.footer_bar.borrow_mut() = bar;
    }

    // -- tree --------------------------------------------------------------------

    /// The owning controller, if attached.
    pub fn parent(&self) -> Option<ControllerRef> {
        self.parent.borrow().as_ref()?.upgrade()
    }

    /// A snapshot of the child list.
    pub fn children(&self) -> Vec<ControllerRef> {
        self.children.borrow().clone()
    }

    /// The child at `index`.
    pub fn child(&self, index: usize) -> Option<ControllerRef> {
        self.children.borrow().get(index).cloned()
    }

    /// Number of children.
    pub fn child_count(&self) -> usize {
        self.children.borrow().len()
    }

    /// Position of `child` in the child list.
    pub fn index_of(&self, child: &dyn Controller) -> Option<usize> {
        self.children.borrow().iter().position(|c| c.is(child))
    }

    /// Attach `child`, detaching it from any previous parent first.
    ///
    /// Returns the child's index, or `None` when `child` is this controller
    /// or one of its ancestors.
    pub fn append_child(&self, child: ControllerRef) -> Option<usize> {
        if self.is_self_or_ancestor(&*child) {
            return None;
        }
        if let Some(previous) = child.base().parent() {
            previous.base().remove_child(&*child);
        }
        self.view.append_child(child.base().view())?;
        *child.base().parent.borrow_mut() = Some(self.this.clone());

        let mut children = self.children.borrow_mut();
        children.push(child);
        Some(children.len() - 1)
    }

    /// Detach `child`. Returns the index it had, or `None` if absent.
    pub fn remove_child(&self, child: &dyn Controller) -> Option<usize> {
        let index = self.index_of(child)?;
        self.remove_child_at_index(index).map(|_| index)
    }

    /// Detach the child at `index`. `None` if out of range.
    pub fn remove_child_at_index(&self, index: usize) -> Option<ControllerRef> {
        let child = {
            let mut children = self.children.borrow_mut();
            if index >= children.len() {
                return None;
            }
            children.remove(index)
        };
        self.view.remove_child(child.base().view());
        *child.base().parent.borrow_mut() = None;
        Some(child)
    }

    /// Detach every child without unloading it. Returns them in order.
    pub fn remove_all_children(&self) -> Vec<ControllerRef> {
        let children = std::mem::take(&mut *self.children.borrow_mut());
        for child in &children {
            self.view.remove_child(child.base().view());
            *child.base().parent.borrow_mut() = None;
        }
        children
    }

    /// Detach from the parent, if any. Returns the index this had.
    pub fn remove_from_parent(&self) -> Option<usize> {
        let parent = self.parent()?;
        parent.base().remove_child_by_base(self)
    }

    fn remove_child_by_base(&self, child: &ViewController) -> Option<usize> {
        let index = self
            .children
            .borrow()
            .iter()
            .position(|c| std::ptr::eq(c.base(), child))?;
        self.remove_child_at_index(index).map(|_| index)
    }

    fn is_self_or_ancestor(&self, candidate: &dyn Controller) -> bool {
        if std::ptr::eq(candidate.base(), self) {
            return true;
        }
        let mut next = self.parent();
        while let Some(ancestor) = next {
            if ancestor.is(candidate) {
                return true;
            }
            next = ancestor.base().parent();
        }
        false
    }

    // -- lifecycle -----------------------------------------------------------------

    pub fn prepare<'a>(&'a self, preparer: &'a Preparer) -> LocalBoxFuture<'a, Result<()>> {
        let children = self.children();
        Box::pin(async move {
            try_join_all(children.iter().map(|child| child.prepare(preparer))).await?;
            Ok(())
        })
    }

    pub fn init(&self) -> LocalBoxFuture<'_, Result<()>> {
        let children = self.children();
        Box::pin(async move {
            try_join_all(children.iter().map(|child| child.init())).await?;
            Ok(())
        })
    }

    pub fn load(&self) -> LocalBoxFuture<'_, Result<()>> {
        let children = self.children();
        Box::pin(async move {
            try_join_all(children.iter().map(|child| child.load())).await?;
            self.on_loaded.emit(&());
            Ok(())
        })
    }

    pub fn unload(&self) -> LocalBoxFuture<'_, Result<()>> {
        let children = self.children();
        Box::pin(async move {
            try_join_all(children.iter().map(|child| child.unload())).await?;
            self.on_unloaded.emit(&());
            Ok(())
        })
    }

    pub fn start(&self) -> LocalBoxFuture<'_, Result<()>> {
        let children = self.children();
        Box::pin(async move {
            try_join_all(children.iter().map(|child| child.start())).await?;
            Ok(())
        })
    }

    pub fn focus(&self) {
        self.view.focus();
        for child in self.children() {
            child.focus();
        }
    }
}

impl Controller for ViewController {
    fn base(&self) -> &ViewController {
        self
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl fmt::Debug for ViewController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ViewController")
            .field("view", &self.view)
            .field("title", &self.title.borrow())
            .field("children", &self.children.borrow().len())
            .finish()
    }
}

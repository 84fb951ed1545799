//! ContainerViewController: fixed chrome around a swappable content region.
//!
//! The container's only direct child is an inner `content` controller; the
//! child operations of the container act on that inner controller, so chrome
//! added to the container's own view never mixes with the content.

use std::any::Any;
use std::ops::Deref;
use std::rc::Rc;

use crate::context::Ui;
use crate::controller::{Controller, ControllerRef, ViewController};
use crate::view::View;

pub struct ContainerViewController {
    base: ViewController,
    content: Rc<ViewController>,
}

impl ContainerViewController {
    pub fn new(ui: &Ui, classes: &[&str]) -> Rc<Self> {
        ViewController::build(ui, classes, |base, _| Self::from_base(base))
    }

    /// Wrap an already built base, adding the container class and the
    /// content controller. Used by controllers that are containers too.
    pub(crate) fn from_base(base: ViewController) -> Self {
        base.view().add_class("container-view-controller");
        let content = ViewController::create(base.ui(), &["content"]);
        base.append_child(content.clone());
        Self { base, content }
    }

    /// The inner controller holding the content.
    pub fn content_view_controller(&self) -> &Rc<ViewController> {
        &self.content
    }

    /// The view content controllers are mounted into.
    pub fn content_view(&self) -> &View {
        self.content.view()
    }

    pub fn children(&self) -> Vec<ControllerRef> {
        self.content.children()
    }

    pub fn append_child(&self, child: ControllerRef) -> Option<usize> {
        self.content.append_child(child)
    }

    pub fn remove_child(&self, child: &dyn Controller) -> Option<usize> {
        self.content.remove_child(child)
    }

    pub fn remove_child_at_index(&self, index: usize) -> Option<ControllerRef> {
        self.content.remove_child_at_index(index)
    }

    pub fn remove_all_children(&self) -> Vec<ControllerRef> {
        self.content.remove_all_children()
    }
}

impl Controller for ContainerViewController {
    fn base(&self) -> &ViewController {
        &self.base
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl Deref for ContainerViewController {
    type Target = ViewController;

    fn deref(&self) -> &ViewController {
        &self.base
    }
}

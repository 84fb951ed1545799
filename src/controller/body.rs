//! BodyViewController: a container with its own title and footer bars.
//!
//! The view stacks `title bar / content / footer bar`; the bars are assigned
//! as this controller's own chrome, so a menu hosting it keeps them.

use std::any::Any;
use std::ops::Deref;
use std::rc::Rc;

use crate::context::Ui;
use crate::controller::{ContainerViewController, Controller, ViewController};
use crate::view::{Bar, TitleBar};

pub struct BodyViewController {
    container: ContainerViewController,
    title_bar: TitleBar,
    footer_bar: Bar,
}

impl BodyViewController {
    pub fn new(ui: &Ui, classes: &[&str]) -> Rc<Self> {
        let mut all = classes.to_vec();
        all.push("body-view-controller");

        let mut title_classes = classes.to_vec();
        title_classes.push("body-title-bar");
        let mut footer_classes = classes.to_vec();
        footer_classes.push("body-footer-bar");

        ViewController::build(ui, &all, |base, _| {
            let container = ContainerViewController::from_base(base);
            let title_bar = TitleBar::new(ui, &title_classes);
            let footer_bar = Bar::new(ui, &footer_classes);

            container.set_title_bar(Some(title_bar.clone()));
            container.set_footer_bar(Some(footer_bar.clone()));

            let view = container.view();
            view.append_child(&title_bar);
            view.append_child(container.content_view());
            view.append_child(&footer_bar);

            Self {
                container,
                title_bar,
                footer_bar,
            }
        })
    }

    /// This controller's own title bar.
    pub fn title_bar(&self) -> &TitleBar {
        &self.title_bar
    }

    /// This controller's own footer bar.
    pub fn footer_bar(&self) -> &Bar {
        &self.footer_bar
    }
}

impl Controller for BodyViewController {
    fn base(&self) -> &ViewController {
        self.container.base()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl Deref for BodyViewController {
    type Target = ContainerViewController;

    fn deref(&self) -> &ContainerViewController {
        &self.container
    }
}

//! Chrome views: Bar and TitleBar.
//!
//! Bars are shared by reference: a menu hands the same title bar to every
//! pane it hosts, so cloning a bar clones the handle, not the node.

use std::ops::Deref;

use crate::context::Ui;
use crate::view::View;

/// A horizontal strip of views, used for footers and toolbars.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bar {
    view: View,
}

impl Bar {
    pub fn new(ui: &Ui, classes: &[&str]) -> Self {
        let mut all = classes.to_vec();
        all.push("bar-view");
        Self {
            view: View::new(ui, &all),
        }
    }

    pub fn view(&self) -> &View {
        &self.view
    }
}

impl Deref for Bar {
    type Target = View;

    fn deref(&self) -> &View {
        &self.view
    }
}

/// A bar with left, middle, and right slots; the middle one holds the title.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TitleBar {
    bar: Bar,
    left: View,
    middle: View,
    right: View,
    title_label: View,
}

impl TitleBar {
    pub fn new(ui: &Ui, classes: &[&str]) -> Self {
        let mut all = classes.to_vec();
        all.push("title-bar-view");
        let bar = Bar::new(ui, &all);
        let left = View::new(ui, &["left"]);
        let middle = View::new(ui, &["middle"]);
        let right = View::new(ui, &["right"]);
        let title_label = View::label(ui, &["title"], "");

        bar.append_child(&left);
        bar.append_child(&middle);
        bar.append_child(&right);
        middle.append_child(&title_label);

        Self {
            bar,
            left,
            middle,
            right,
            title_label,
        }
    }

    pub fn left_view(&self) -> &View {
        &self.left
    }

    pub fn middle_view(&self) -> &View {
        &self.middle
    }

    pub fn right_view(&self) -> &View {
        &self.right
    }

    pub fn title_label(&self) -> &View {
        &self.title_label
    }

    pub fn title(&self) -> String {
        self.title_label.text().unwrap_or_default()
    }

    pub fn set_title(&self, title: impl Into<String>) {
        self.title_label.set_text(title);
    }

    /// The title bar as a plain [`Bar`].
    pub fn as_bar(&self) -> &Bar {
        &self.bar
    }
}

impl Deref for TitleBar {
    type Target = View;

    fn deref(&self) -> &View {
        &self.bar
    }
}

//! TabBar: a row of selectable items with a single visual selection.
//!
//! Also serves as the side menu of a menu controller. Clicking an item marks
//! it selected and fires `on_item_clicked` with its current position.

use std::ops::Deref;
use std::rc::Rc;

use crate::context::Ui;
use crate::event::Emitter;
use crate::view::{Bar, View};

#[derive(Debug, Clone)]
pub struct TabBar {
    bar: Bar,
    /// Fires with the clicked item's index.
    pub on_item_clicked: Rc<Emitter<usize>>,
}

impl TabBar {
    pub fn new(ui: &Ui, classes: &[&str]) -> Self {
        let mut all = classes.to_vec();
        all.push("tab-bar-view");
        Self {
            bar: Bar::new(ui, &all),
            on_item_clicked: Rc::new(Emitter::new("TabBar.onItemClicked")),
        }
    }

    /// Add an item showing `title`. Returns its index.
    pub fn add_item(&self, title: &str) -> usize {
        let ui = self.bar.ui();
        let item = View::new(ui, &["item"]);
        let label = View::label(ui, &[], title);
        item.append_child(&label);
        self.append_item(&item)
    }

    /// Append an arbitrary view as an item. Returns its index.
    pub fn append_item(&self, item: &View) -> usize {
        let index = self.bar.append_child(item).unwrap_or_else(|| self.len());
        item.set_clickable(true);
        item.set_propagate_clicks(false);

        let weak_item = item.downgrade();
        let weak_bar = self.bar.downgrade();
        let emitter = Rc::downgrade(&self.on_item_clicked);
        item.on_click(move |_| {
            let (Some(item), Some(bar)) = (weak_item.upgrade(), weak_bar.upgrade()) else {
                return;
            };
            let Some(index) = item.index_in_parent().filter(|_| item.parent().as_ref() == Some(&bar)) else {
                return;
            };
            for (i, child) in bar.children().iter().enumerate() {
                child.set_selected(i == index);
            }
            if let Some(emitter) = emitter.upgrade() {
                emitter.emit(&index);
            }
        });
        index
    }

    /// Index of the selected item.
    pub fn selected_index(&self) -> Option<usize> {
        self.bar.children().iter().position(View::is_selected)
    }

    /// Mark exactly the item at `index` selected, or none for `None`.
    pub fn set_selected_index(&self, index: Option<usize>) {
        if index == self.selected_index() {
            return;
        }
        for (i, child) in self.bar.children().iter().enumerate() {
            child.set_selected(Some(i) == index);
        }
    }

    pub fn item(&self, index: usize) -> Option<View> {
        self.bar.child(index)
    }

    pub fn items(&self) -> Vec<View> {
        self.bar.children()
    }

    /// Remove and destroy the item at `index`. Returns whether one existed.
    pub fn remove_item_at(&self, index: usize) -> bool {
        match self.bar.remove_child_at_index(index) {
            Some(item) => {
                item.dispose();
                true
            }
            None => false,
        }
    }

    /// Remove and destroy every item.
    pub fn remove_all_items(&self) {
        for item in self.bar.remove_all_children() {
            item.dispose();
        }
    }

    pub fn len(&self) -> usize {
        self.bar.child_count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Deref for TabBar {
    type Target = View;

    fn deref(&self) -> &View {
        &self.bar
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;
    use crate::app::AppConfig;

    fn tab_bar() -> (Ui, TabBar) {
        let ui = Ui::new(AppConfig::default());
        let bar = TabBar::new(&ui, &["menu"]);
        (ui, bar)
    }

    #[test]
    fn add_item_builds_labelled_item() {
        let (_ui, bar) = tab_bar();
        assert_eq!(bar.add_item("Home"), 0);
        assert_eq!(bar.add_item("Settings"), 1);
        let item = bar.item(1).unwrap();
        assert!(item.has_class("item"));
        assert!(item.is_clickable());
        assert!(!item.propagates_clicks());
        assert_eq!(item.child(0).unwrap().text().as_deref(), Some("Settings"));
    }

    #[test]
    fn click_selects_and_emits_current_index() {
        let (_ui, bar) = tab_bar();
        bar.add_item("a");
        bar.add_item("b");
        bar.add_item("c");
        let seen = Rc::new(RefCell::new(Vec::new()));
        let s = Rc::clone(&seen);
        bar.on_item_clicked.on(move |i| s.borrow_mut().push(*i));

        bar.item(2).unwrap().click();
        assert_eq!(bar.selected_index(), Some(2));

        // Removing an earlier item shifts the clicked index.
        assert!(bar.remove_item_at(0));
        bar.item(1).unwrap().click();
        assert_eq!(*seen.borrow(), vec![2, 1]);
    }

    #[test]
    fn set_selected_index_is_exclusive() {
        let (_ui, bar) = tab_bar();
        bar.add_item("a");
        bar.add_item("b");
        bar.set_selected_index(Some(0));
        bar.set_selected_index(Some(1));
        assert!(!bar.item(0).unwrap().is_selected());
        assert_eq!(bar.selected_index(), Some(1));
        bar.set_selected_index(None);
        assert_eq!(bar.selected_index(), None);
    }

    #[test]
    fn remove_all_items_empties_the_bar() {
        let (_ui, bar) = tab_bar();
        bar.add_item("a");
        bar.add_item("b");
        let first = bar.item(0).unwrap();
        bar.remove_all_items();
        assert!(bar.is_empty());
        assert!(!first.exists());
        assert!(!bar.remove_item_at(0));
    }
}

//! List surfaces: TableView and GridView, plus the selection mode they share.
//!
//! Both are plain views whose children are tagged by class: `header`,
//! `category`, `cell`. They know which of their mounted cells are selected;
//! the controllers on top own the cell pools and the selection rules.

use std::cell::Cell;
use std::ops::Deref;

use crate::context::Ui;
use crate::view::View;

/// How cell clicks affect the selected set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SelectionMode {
    /// Clicks are inert.
    #[default]
    None,
    /// At most one selected cell.
    Single,
    /// Any number of selected cells.
    Multi,
    /// Selection events fire, but no cell is ever marked selected.
    Clickable,
}

impl SelectionMode {
    /// Whether cells react to clicks in this mode.
    pub fn is_interactive(self) -> bool {
        self != SelectionMode::None
    }
}

// ---------------------------------------------------------------------------
// TableView
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub struct TableView {
    view: View,
    selection_mode: Cell<SelectionMode>,
}

impl TableView {
    pub fn new(ui: &Ui, classes: &[&str]) -> Self {
        let mut all = classes.to_vec();
        all.extend(["table-view", "alternating-background"]);
        Self {
            view: View::new(ui, &all),
            selection_mode: Cell::new(SelectionMode::None),
        }
    }

    pub fn selection_mode(&self) -> SelectionMode {
        self.selection_mode.get()
    }

    /// Change the mode and update the clickable flag on mounted cells.
    pub fn set_selection_mode(&self, mode: SelectionMode) {
        self.selection_mode.set(mode);
        for cell in self.find_cells() {
            cell.set_clickable(mode.is_interactive());
        }
    }

    /// Mount `header` as the first child, replacing any previous header.
    pub fn append_header(&self, header: &View) {
        header.add_class("header");
        if let Some(previous) = self.find_header().filter(|h| h != header) {
            self.view.remove_child(&previous);
        }
        let rest: Vec<View> = self.view.children().into_iter().filter(|c| c != header).collect();
        self.view.append_child(header);
        for child in &rest {
            self.view.append_child(child);
        }
    }

    pub fn append_category(&self, category: &View) {
        category.add_class("category");
        self.view.append_child(category);
    }

    pub fn append_cell(&self, cell: &View) {
        cell.add_class("cell");
        self.view.append_child(cell);
    }

    pub fn find_header(&self) -> Option<View> {
        self.view.children_with_class("header").into_iter().next()
    }

    pub fn find_categories(&self) -> Vec<View> {
        self.view.children_with_class("category")
    }

    pub fn find_cells(&self) -> Vec<View> {
        self.view.children_with_class("cell")
    }

    /// Mounted cells marked selected.
    pub fn selected_cells(&self) -> Vec<View> {
        self.find_cells().into_iter().filter(View::is_selected).collect()
    }

    /// Positions, among mounted cells, of the selected ones.
    pub fn selected_cell_indices(&self) -> Vec<usize> {
        self.find_cells()
            .iter()
            .enumerate()
            .filter(|(_, cell)| cell.is_selected())
            .map(|(i, _)| i)
            .collect()
    }
}

impl Deref for TableView {
    type Target = View;

    fn deref(&self) -> &View {
        &self.view
    }
}

// ---------------------------------------------------------------------------
// GridView
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub struct GridView {
    view: View,
    selection_mode: Cell<SelectionMode>,
}

impl GridView {
    pub fn new(ui: &Ui, classes: &[&str]) -> Self {
        let mut all = classes.to_vec();
        all.push("grid-view");
        Self {
            view: View::new(ui, &all),
            selection_mode: Cell::new(SelectionMode::None),
        }
    }

    pub fn selection_mode(&self) -> SelectionMode {
        self.selection_mode.get()
    }

    pub fn set_selection_mode(&self, mode: SelectionMode) {
        self.selection_mode.set(mode);
        for cell in self.find_cells() {
            cell.set_clickable(mode.is_interactive());
        }
    }

    pub fn append_cell(&self, cell: &View) {
        cell.add_class("cell");
        self.view.append_child(cell);
    }

    pub fn find_cells(&self) -> Vec<View> {
        self.view.children_with_class("cell")
    }

    pub fn selected_cells(&self) -> Vec<View> {
        self.find_cells().into_iter().filter(View::is_selected).collect()
    }

    pub fn selected_cell_indices(&self) -> Vec<usize> {
        self.find_cells()
            .iter()
            .enumerate()
            .filter(|(_, cell)| cell.is_selected())
            .map(|(i, _)| i)
            .collect()
    }
}

impl Deref for GridView {
    type Target = View;

    fn deref(&self) -> &View {
        &self.view
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::app::AppConfig;

    fn ui() -> Ui {
        Ui::new(AppConfig::default())
    }

    #[test]
    fn header_moves_to_front_and_replaces_previous() {
        let ui = ui();
        let table = TableView::new(&ui, &[]);
        let cell = View::new(&ui, &[]);
        table.append_cell(&cell);
        let first = View::new(&ui, &[]);
        table.append_header(&first);
        assert_eq!(table.children(), vec![first.clone(), cell.clone()]);

        let second = View::new(&ui, &[]);
        table.append_header(&second);
        assert_eq!(table.children(), vec![second.clone(), cell]);
        assert_eq!(table.find_header(), Some(second));
        assert_eq!(first.parent(), None);
    }

    #[test]
    fn classes_tag_children() {
        let ui = ui();
        let table = TableView::new(&ui, &[]);
        let category = View::new(&ui, &[]);
        let a = View::new(&ui, &[]);
        let b = View::new(&ui, &[]);
        table.append_category(&category);
        table.append_cell(&a);
        table.append_cell(&b);
        assert_eq!(table.find_categories(), vec![category]);
        assert_eq!(table.find_cells(), vec![a, b]);
    }

    #[test]
    fn selected_cells_and_indices() {
        let ui = ui();
        let grid = GridView::new(&ui, &[]);
        let cells: Vec<View> = (0..4).map(|_| View::new(&ui, &[])).collect();
        for cell in &cells {
            grid.append_cell(cell);
        }
        cells[1].set_selected(true);
        cells[3].set_selected(true);
        assert_eq!(grid.selected_cells(), vec![cells[1].clone(), cells[3].clone()]);
        assert_eq!(grid.selected_cell_indices(), vec![1, 3]);
    }

    #[test]
    fn selection_mode_updates_clickable() {
        let ui = ui();
        let table = TableView::new(&ui, &[]);
        let cell = View::new(&ui, &[]);
        table.append_cell(&cell);
        assert_eq!(table.selection_mode(), SelectionMode::None);
        table.set_selection_mode(SelectionMode::Multi);
        assert!(cell.is_clickable());
        table.set_selection_mode(SelectionMode::None);
        assert!(!cell.is_clickable());
    }

    #[test]
    fn only_none_is_inert() {
        assert!(!SelectionMode::None.is_interactive());
        assert!(SelectionMode::Single.is_interactive());
        assert!(SelectionMode::Multi.is_interactive());
        assert!(SelectionMode::Clickable.is_interactive());
    }
}

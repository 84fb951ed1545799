//! TableViewController: data-source-driven rows with a reusable cell pool.
//!
//! Cells are created once per (category, row) position and kept for the
//! controller's lifetime; each render refreshes and remounts them in order.
//! The pool never shrinks, so cell identity survives re-renders. Selection
//! only ever applies to cells mounted by the last render.

use std::any::Any;
use std::cell::RefCell;
use std::rc::{Rc, Weak};

use futures::future::LocalBoxFuture;
use tracing::debug;

use crate::context::Ui;
use crate::controller::{Controller, TableDataSource, ViewController};
use crate::error::{Result, UiError};
use crate::event::Emitter;
use crate::view::{SelectionMode, TableView, View};

pub struct TableViewController {
    base: ViewController,
    this: Weak<TableViewController>,
    title_label: View,
    table_view: TableView,
    data_source: RefCell<Option<Rc<dyn TableDataSource>>>,
    header: RefCell<Option<View>>,
    cells: RefCell<Vec<Vec<View>>>,
    mounted: RefCell<Vec<usize>>,
    /// Fires with each cell that becomes selected.
    pub on_selected_cell: Emitter<View>,
    /// Fires with each cell that stops being selected.
    pub on_deselected_cell: Emitter<View>,
}

impl TableViewController {
    pub fn new(ui: &Ui, classes: &[&str]) -> Rc<Self> {
        let mut all = classes.to_vec();
        all.push("table-view-controller");
        ViewController::build(ui, &all, |base, this| {
            let title_label = View::label(ui, &["title"], "table title");
            let table_view = TableView::new(ui, &[]);
            base.view().append_child(&title_label);
            base.view().append_child(&table_view);
            Self {
                base,
                this: this.clone(),
                title_label,
                table_view,
                data_source: RefCell::new(None),
                header: RefCell::new(None),
                cells: RefCell::new(Vec::new()),
                mounted: RefCell::new(Vec::new()),
                on_selected_cell: Emitter::new("TableViewController.onSelectedCell"),
                on_deselected_cell: Emitter::new("TableViewController.onDeselectedCell"),
            }
        })
    }

    pub fn title_label(&self) -> &View {
        &self.title_label
    }

    pub fn table_view(&self) -> &TableView {
        &self.table_view
    }

    pub fn data_source(&self) -> Option<Rc<dyn TableDataSource>> {
        self.data_source.borrow().clone()
    }

    pub fn set_data_source(&self, source: Option<Rc<dyn TableDataSource>>) {
        *self.data_source.borrow_mut() = source;
    }

    /// The header mounted by the last render.
    pub fn header(&self) -> Option<View> {
        self.header.borrow().clone()
    }

    /// The whole pool, mounted or not, per category.
    pub fn cells(&self) -> Vec<Vec<View>> {
        self.cells.borrow().clone()
    }

    /// Number of cells ever created for `category`.
    pub fn pool_len(&self, category: usize) -> usize {
        self.cells.borrow().get(category).map_or(0, Vec::len)
    }

    /// Number of cells of `category` mounted by the last render.
    pub fn mounted_len(&self, category: usize) -> usize {
        self.mounted.borrow().get(category).copied().unwrap_or(0)
    }

    pub fn selection_mode(&self) -> SelectionMode {
        self.table_view.selection_mode()
    }

    /// Change the mode, updating the clickable flag on every pooled cell.
    pub fn set_selection_mode(&self, mode: SelectionMode) {
        self.table_view.set_selection_mode(mode);
        for cell in self.cells.borrow().iter().flatten() {
            cell.set_clickable(mode.is_interactive());
        }
    }

    /// Rebuild the table from the data source.
    ///
    /// Clears the selection (announcing each deselected cell), then mounts
    /// the header, and per category its divider and its pooled cells,
    /// refreshing every cell through the source.
    pub fn render(&self) -> Result<()> {
        let source = self.data_source().ok_or(UiError::MissingDataSource("table"))?;

        let categories = source.number_of_categories(self);
        let header = source.create_header(self);

        self.deselect_all_cells();
        let previous = self.table_view.remove_all_children();

        if let Some(header) = &header {
            self.table_view.append_header(header);
        }
        *self.header.borrow_mut() = header;

        let mut mounted = Vec::with_capacity(categories);
        for category in 0..categories {
            let count = source.number_of_cells(self, category);
            if let Some(divider) = source.create_category(self, category) {
                self.table_view.append_category(&divider);
            }
            for row in 0..count {
                let cell = self.reuse_cell(&*source, category, row);
                source.update_cell(self, &cell, row, category);
                self.table_view.append_cell(&cell);
            }
            mounted.push(count);
        }

        let total: usize = mounted.iter().sum();
        *self.mounted.borrow_mut() = mounted;

        // Headers and dividers are made fresh each time; drop the old ones.
        for stale in previous {
            if !stale.has_class("cell") && stale.parent().is_none() {
                stale.dispose();
            }
        }

        debug!(categories, cells = total, "table rendered");
        Ok(())
    }

    /// The mounted cell at `index`. Without a category, `index` counts across
    /// categories in order.
    pub fn cell_at_index(&self, index: usize, category: Option<usize>) -> Option<View> {
        match category {
            Some(category) => self.mounted_cell(category, index),
            None => {
                let mut index = index;
                let counts = self.mounted.borrow().clone();
                for (category, count) in counts.into_iter().enumerate() {
                    if index < count {
                        return self.mounted_cell(category, index);
                    }
                    index -= count;
                }
                None
            }
        }
    }

    pub fn is_cell_selected(&self, category: usize, row: usize) -> bool {
        self.mounted_cell(category, row).is_some_and(|cell| cell.is_selected())
    }

    /// Deselect every selected cell, announcing each.
    pub fn deselect_all_cells(&self) {
        for cell in self.table_view.selected_cells() {
            cell.set_selected(false);
            self.on_deselected_cell.emit(&cell);
        }
    }

    /// Deselect one cell. No-op unless it is mounted and selected.
    pub fn deselect_cell(&self, category: usize, row: usize) {
        let Some(cell) = self.mounted_cell(category, row).filter(View::is_selected) else {
            return;
        };
        cell.set_selected(false);
        self.on_deselected_cell.emit(&cell);
    }

    /// Select one cell according to the selection mode. No-op for cells that
    /// are not mounted, already selected, or in [`SelectionMode::None`].
    pub fn select_cell(&self, category: usize, row: usize) {
        let mode = self.selection_mode();
        if mode == SelectionMode::None {
            return;
        }
        let Some(cell) = self.mounted_cell(category, row) else {
            return;
        };
        if cell.is_selected() {
            return;
        }
        if mode == SelectionMode::Single {
            self.deselect_all_cells();
        }
        if mode != SelectionMode::Clickable {
            cell.set_selected(true);
        }
        self.on_selected_cell.emit(&cell);
    }

    fn mounted_cell(&self, category: usize, row: usize) -> Option<View> {
        if row >= self.mounted_len(category) {
            return None;
        }
        self.cells.borrow().get(category)?.get(row).cloned()
    }

    fn reuse_cell(&self, source: &dyn TableDataSource, category: usize, row: usize) -> View {
        loop {
            let next = {
                let mut cells = self.cells.borrow_mut();
                while cells.len() <= category {
                    cells.push(Vec::new());
                }
                if let Some(cell) = cells[category].get(row) {
                    return cell.clone();
                }
                cells[category].len()
            };
            // The source may inspect the table, so the pool is not borrowed here.
            let cell = self.create_cell(source, category, next);
            self.cells.borrow_mut()[category].push(cell);
        }
    }

    fn create_cell(&self, source: &dyn TableDataSource, category: usize, row: usize) -> View {
        let cell = source.create_cell(self, category);
        cell.set_index(Some(row));
        cell.set_clickable(self.selection_mode().is_interactive());

        let table = self.this.clone();
        cell.on_click(move |_| {
            let Some(table) = table.upgrade() else {
                return;
            };
            if table.selection_mode() == SelectionMode::None {
                return;
            }
            if table.is_cell_selected(category, row) {
                table.deselect_cell(category, row);
            } else {
                table.select_cell(category, row);
            }
        });
        cell
    }
}

impl Controller for TableViewController {
    fn base(&self) -> &ViewController {
        &self.base
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn load(&self) -> LocalBoxFuture<'_, Result<()>> {
        Box::pin(async move {
            self.render()?;
            self.base.load().await
        })
    }
}

//! Data sources feeding the list controllers.
//!
//! Optional hooks have defaults: one category, no header, no category views.
//! A source that needs to reach back into its controller should hold a weak
//! reference; the controller keeps its source alive.

use crate::controller::{GridViewController, TableViewController};
use crate::view::View;

/// Rows for a [`TableViewController`], grouped by category.
pub trait TableDataSource {
    fn number_of_categories(&self, _table: &TableViewController) -> usize {
        1
    }

    fn number_of_cells(&self, table: &TableViewController, category: usize) -> usize;

    /// A header mounted above the first category. Created on every render.
    fn create_header(&self, _table: &TableViewController) -> Option<View> {
        None
    }

    /// A divider mounted before the cells of `category`. Created on every
    /// render.
    fn create_category(&self, _table: &TableViewController, _category: usize) -> Option<View> {
        None
    }

    /// A fresh, unconfigured cell. Called once per pooled position.
    fn create_cell(&self, table: &TableViewController, category: usize) -> View;

    /// Refresh `cell` in place for `row` of `category`.
    fn update_cell(&self, table: &TableViewController, cell: &View, row: usize, category: usize);
}

/// Items for a [`GridViewController`].
pub trait GridDataSource {
    fn number_of_cells(&self, grid: &GridViewController) -> usize;

    /// A fresh, unconfigured cell. Called once per pooled position.
    fn create_cell(&self, grid: &GridViewController, index: usize) -> View;

    /// Refresh `cell` in place for `index`.
    fn update_cell(&self, grid: &GridViewController, cell: &View, index: usize);
}

//! GridViewController: the single-axis twin of the table controller.
//!
//! Same pooling and selection rules as [`TableViewController`], with cells
//! indexed by position only. Scroll queries compare cell bounds reported by
//! the host against the grid view's own bounds.
//!
//! [`TableViewController`]: crate::controller::TableViewController

use std::any::Any;
use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use futures::future::LocalBoxFuture;
use tracing::debug;

use crate::context::Ui;
use crate::controller::{Controller, GridDataSource, ViewController};
use crate::error::{Result, UiError};
use crate::event::Emitter;
use crate::geometry::Region;
use crate::view::{GridView, SelectionMode, View};

pub struct GridViewController {
    base: ViewController,
    this: Weak<GridViewController>,
    title_label: View,
    grid_view: GridView,
    data_source: RefCell<Option<Rc<dyn GridDataSource>>>,
    cells: RefCell<Vec<View>>,
    mounted: Cell<usize>,
    pub on_selected_cell: Emitter<View>,
    pub on_deselected_cell: Emitter<View>,
}

impl GridViewController {
    /// Build a grid with no data source; call [`render`](Self::render) after
    /// setting one.
    pub fn new(ui: &Ui, classes: &[&str]) -> Rc<Self> {
        let mut all = classes.to_vec();
        all.push("grid-view-controller");
        ViewController::build(ui, &all, |base, this| {
            let title_label = View::label(ui, &["title"], "grid title");
            let grid_view = GridView::new(ui, &[]);
            base.view().append_child(&title_label);
            base.view().append_child(&grid_view);
            Self {
                base,
                this: this.clone(),
                title_label,
                grid_view,
                data_source: RefCell::new(None),
                cells: RefCell::new(Vec::new()),
                mounted: Cell::new(0),
                on_selected_cell: Emitter::new("GridViewController.onSelectedCell"),
                on_deselected_cell: Emitter::new("GridViewController.onDeselectedCell"),
            }
        })
    }

    pub fn title_label(&self) -> &View {
        &self.title_label
    }

    pub fn grid_view(&self) -> &GridView {
        &self.grid_view
    }

    pub fn data_source(&self) -> Option<Rc<dyn GridDataSource>> {
        self.data_source.borrow().clone()
    }

    pub fn set_data_source(&self, source: Option<Rc<dyn GridDataSource>>) {
        *self.data_source.borrow_mut() = source;
    }

    /// The whole pool, mounted or not.
    pub fn cells(&self) -> Vec<View> {
        self.cells.borrow().clone()
    }

    /// Number of cells mounted by the last render.
    pub fn mounted_len(&self) -> usize {
        self.mounted.get()
    }

    pub fn selection_mode(&self) -> SelectionMode {
        self.grid_view.selection_mode()
    }

    pub fn set_selection_mode(&self, mode: SelectionMode) {
        self.grid_view.set_selection_mode(mode);
        for cell in self.cells.borrow().iter() {
            cell.set_clickable(mode.is_interactive());
        }
    }

    /// Rebuild the grid from the data source.
    pub fn render(&self) -> Result<()> {
        let source = self.data_source().ok_or(UiError::MissingDataSource("grid"))?;

        self.deselect_all_cells();
        self.grid_view.remove_all_children();

        let count = source.number_of_cells(self);
        for index in 0..count {
            let cell = self.reuse_cell(&*source, index);
            source.update_cell(self, &cell, index);
            self.grid_view.append_cell(&cell);
        }
        self.mounted.set(count);

        debug!(cells = count, "grid rendered");
        Ok(())
    }

    /// The mounted cell at `index`.
    pub fn cell_at_index(&self, index: usize) -> Option<View> {
        if index >= self.mounted.get() {
            return None;
        }
        self.cells.borrow().get(index).cloned()
    }

    pub fn is_cell_selected(&self, index: usize) -> bool {
        self.cell_at_index(index).is_some_and(|cell| cell.is_selected())
    }

    pub fn deselect_all_cells(&self) {
        for cell in self.grid_view.selected_cells() {
            cell.set_selected(false);
            self.on_deselected_cell.emit(&cell);
        }
    }

    pub fn deselect_cell(&self, index: usize) {
        let Some(cell) = self.cell_at_index(index).filter(View::is_selected) else {
            return;
        };
        cell.set_selected(false);
        self.on_deselected_cell.emit(&cell);
    }

    pub fn select_cell(&self, index: usize) {
        let mode = self.selection_mode();
        if mode == SelectionMode::None {
            return;
        }
        let Some(cell) = self.cell_at_index(index) else {
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

    // -- scrolling ---------------------------------------------------------------

    fn edge_cells(&self) -> Option<(Region, Region)> {
        let count = self.mounted.get();
        if count == 0 {
            return None;
        }
        let first = self.cell_at_index(0)?.bounds();
        let last = self.cell_at_index(count - 1)?.bounds();
        Some((first, last))
    }

    pub fn can_scroll_top(&self) -> bool {
        self.edge_cells()
            .is_some_and(|(first, _)| first.top() < self.grid_view.bounds().top())
    }

    pub fn can_scroll_bottom(&self) -> bool {
        self.edge_cells()
            .is_some_and(|(_, last)| last.bottom() > self.grid_view.bounds().bottom())
    }

    pub fn can_scroll_left(&self) -> bool {
        self.edge_cells()
            .is_some_and(|(first, _)| first.left() < self.grid_view.bounds().left())
    }

    pub fn can_scroll_right(&self) -> bool {
        self.edge_cells()
            .is_some_and(|(_, last)| last.right() > self.grid_view.bounds().right())
    }

    /// Scroll by whole pages of the grid's height; negative pages scroll up.
    /// Returns whether the scroll reached the end of the content.
    pub fn scroll_vertical(&self, pages: i32) -> bool {
        let cells = self.mounted_bounds();
        if pages == 0 || cells.is_empty() {
            return false;
        }
        let view = self.grid_view.bounds();
        let dy = view.height * pages;
        self.grid_view.scroll_by(0, dy);
        if pages > 0 {
            let edge = view.bottom() + dy;
            !cells.iter().any(|cell| cell.bottom() > edge)
        } else {
            let edge = view.top() + dy;
            !cells.iter().any(|cell| cell.top() < edge)
        }
    }

    /// Scroll by whole pages of the grid's width; negative pages scroll left.
    /// Returns whether the scroll reached the end of the content.
    pub fn scroll_horizontal(&self, pages: i32) -> bool {
        let cells = self.mounted_bounds();
        if pages == 0 || cells.is_empty() {
            return false;
        }
        let view = self.grid_view.bounds();
        let dx = view.width * pages;
        self.grid_view.scroll_by(dx, 0);
        if pages > 0 {
            let edge = view.right() + dx;
            !cells.iter().any(|cell| cell.right() > edge)
        } else {
            let edge = view.left() + dx;
            !cells.iter().any(|cell| cell.left() < edge)
        }
    }

    fn mounted_bounds(&self) -> Vec<Region> {
        self.cells
            .borrow()
            .iter()
            .take(self.mounted.get())
            .map(View::bounds)
            .collect()
    }

    // -- pool ----------------------------------------------------------------------

    fn reuse_cell(&self, source: &dyn GridDataSource, index: usize) -> View {
        loop {
            let next = {
                let cells = self.cells.borrow();
                if let Some(cell) = cells.get(index) {
                    return cell.clone();
                }
                cells.len()
            };
            let cell = self.create_cell(source, next);
            self.cells.borrow_mut().push(cell);
        }
    }

    fn create_cell(&self, source: &dyn GridDataSource, index: usize) -> View {
        let cell = source.create_cell(self, index);
        cell.set_index(Some(index));
        cell.set_clickable(self.selection_mode().is_interactive());

        let grid = self.this.clone();
        cell.on_click(move |_| {
            let Some(grid) = grid.upgrade() else {
                return;
            };
            if grid.selection_mode() == SelectionMode::None {
                return;
            }
            if grid.is_cell_selected(index) {
                grid.deselect_cell(index);
            } else {
                grid.select_cell(index);
            }
        });
        cell
    }
}

impl Controller for GridViewController {
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

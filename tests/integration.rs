//! Integration tests for panekit.
//!
//! These tests exercise the public API from outside the crate: controller
//! trees, navigation, pooled list rendering, the presentation layers driven
//! through the headless pilot, and routing.

use std::any::Any;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Duration;

use futures::future::LocalBoxFuture;
use pretty_assertions::assert_eq;
use tokio::task::LocalSet;
use tokio_test::{assert_pending, assert_ready};

use panekit::controller::{
    Controller, ControllerRef, MenuViewController, Notification, QueryBooleanKind,
    StackViewController, TableDataSource, TableViewController, ViewController,
};
use panekit::event::Key;
use panekit::testing::snapshot::view_to_string;
use panekit::testing::Pilot;
use panekit::view::{SelectionMode, View};
use panekit::{AppConfig, Result, Ui, UiError};

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// A controller that counts its load and unload calls.
struct Screen {
    base: ViewController,
    loads: Cell<usize>,
    unloads: Cell<usize>,
}

impl Screen {
    fn new(ui: &Ui, name: &str) -> Rc<Screen> {
        ViewController::build(ui, &[name], |base, _| Screen {
            base,
            loads: Cell::new(0),
            unloads: Cell::new(0),
        })
    }

    fn counts(&self) -> (usize, usize) {
        (self.loads.get(), self.unloads.get())
    }
}

impl Controller for Screen {
    fn base(&self) -> &ViewController {
        &self.base
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn load(&self) -> LocalBoxFuture<'_, Result<()>> {
        self.loads.set(self.loads.get() + 1);
        self.base.load()
    }

    fn unload(&self) -> LocalBoxFuture<'_, Result<()>> {
        self.unloads.set(self.unloads.get() + 1);
        self.base.unload()
    }
}

/// Label rows per category, with an optional divider per category.
struct Rows {
    counts: RefCell<Vec<usize>>,
    created: Cell<usize>,
    dividers: bool,
}

impl Rows {
    fn new(counts: &[usize]) -> Rc<Rows> {
        Rc::new(Rows {
            counts: RefCell::new(counts.to_vec()),
            created: Cell::new(0),
            dividers: false,
        })
    }

    fn set_counts(&self, counts: &[usize]) {
        *self.counts.borrow_mut() = counts.to_vec();
    }
}

impl TableDataSource for Rows {
    fn number_of_categories(&self, _table: &TableViewController) -> usize {
        self.counts.borrow().len()
    }

    fn number_of_cells(&self, _table: &TableViewController, category: usize) -> usize {
        self.counts.borrow()[category]
    }

    fn create_category(&self, table: &TableViewController, category: usize) -> Option<View> {
        self.dividers
            .then(|| View::label(table.base().ui(), &["divider"], format!("cat {category}")))
    }

    fn create_cell(&self, table: &TableViewController, _category: usize) -> View {
        self.created.set(self.created.get() + 1);
        View::label(table.base().ui(), &["row"], "")
    }

    fn update_cell(&self, _table: &TableViewController, cell: &View, row: usize, _category: usize) {
        cell.set_text(format!("row {row}"));
    }
}

fn ui() -> Ui {
    Ui::new(AppConfig::default())
}

fn child_views(controller: &ViewController) -> Vec<View> {
    controller
        .children()
        .iter()
        .map(|child| child.view().clone())
        .collect()
}

// ---------------------------------------------------------------------------
// Controller tree
// ---------------------------------------------------------------------------

#[test]
fn controller_and_view_children_stay_in_lock_step() {
    let ui = ui();
    let root = ViewController::create(&ui, &["root"]);
    let children: Vec<Rc<ViewController>> =
        (0..4).map(|_| ViewController::create(&ui, &["child"])).collect();

    for child in &children {
        root.append_child(child.clone());
        assert_eq!(child_views(&root), root.view().children());
    }

    root.remove_child(&*children[1]);
    assert_eq!(child_views(&root), root.view().children());

    root.remove_child_at_index(0);
    assert_eq!(child_views(&root), root.view().children());

    // Re-appending moves a child to the end.
    root.append_child(children[2].clone());
    assert_eq!(child_views(&root), root.view().children());
    assert_eq!(root.index_of(&*children[2]), Some(1));

    root.remove_all_children();
    assert!(root.view().children().is_empty());
    assert_eq!(root.child_count(), 0);
}

#[tokio::test]
async fn failing_child_load_fails_the_parent() {
    struct Broken(ViewController);

    impl Controller for Broken {
        fn base(&self) -> &ViewController {
            &self.0
        }

        fn as_any(&self) -> &dyn Any {
            self
        }

        fn load(&self) -> LocalBoxFuture<'_, Result<()>> {
            Box::pin(async { Err(UiError::custom("no data")) })
        }
    }

    let ui = ui();
    let root = ViewController::create(&ui, &[]);
    root.append_child(ViewController::build(&ui, &[], |base, _| Broken(base)));

    let loaded = Rc::new(Cell::new(false));
    let flag = Rc::clone(&loaded);
    root.on_loaded.on(move |_| flag.set(true));

    assert_eq!(root.load().await, Err(UiError::custom("no data")));
    assert!(!loaded.get());
}

// ---------------------------------------------------------------------------
// Stack navigation
// ---------------------------------------------------------------------------

#[tokio::test]
async fn stack_pop_restores_previous_and_dismissals_are_instance_keyed() {
    let ui = ui();
    let stack = StackViewController::new(&ui, &[]);
    let a = Screen::new(&ui, "a");
    let b = Screen::new(&ui, "b");

    let mut a_closed = tokio_test::task::spawn(stack.push_view_controller(a.clone()).await.unwrap());
    let mut b_closed = tokio_test::task::spawn(stack.push_view_controller(b.clone()).await.unwrap());
    assert_eq!(stack.count(), 2);

    let popped = stack.pop_view_controller().await.unwrap().unwrap();
    assert!(popped.is(&*b));
    assert_ready!(b_closed.poll());
    assert_pending!(a_closed.poll());

    let top = stack.current_view_controller().unwrap();
    assert!(top.is(&*a));
    assert_eq!(stack.view().children(), vec![a.view().clone()]);
    assert_eq!(a.counts(), (2, 0));
    assert_eq!(b.counts(), (1, 1));

    stack.pop_view_controller().await.unwrap();
    assert_ready!(a_closed.poll());
    assert!(stack.pop_view_controller().await.unwrap().is_none());
}

#[tokio::test]
async fn stack_remove_all_unloads_and_announces_everything() {
    let ui = ui();
    let stack = StackViewController::new(&ui, &[]);
    let a = Screen::new(&ui, "a");
    let b = Screen::new(&ui, "b");
    let _a_closed = stack.push_view_controller(a.clone()).await.unwrap();
    let _b_closed = stack.push_view_controller(b.clone()).await.unwrap();

    let popped = Rc::new(RefCell::new(Vec::new()));
    let log = Rc::clone(&popped);
    stack
        .on_pop
        .on(move |c: &ControllerRef| log.borrow_mut().push(c.view().has_class("a")));

    let removed = stack.remove_all_children().await.unwrap();

    assert_eq!(removed.len(), 2);
    assert_eq!(*popped.borrow(), vec![false, true]);
    assert_eq!(a.counts().1, 1);
    assert_eq!(b.counts().1, 1);
    assert!(stack.is_empty());
}

// ---------------------------------------------------------------------------
// Pooled list rendering
// ---------------------------------------------------------------------------

#[test]
fn table_pool_never_shrinks_and_reuses_cells() {
    let ui = ui();
    let table = TableViewController::new(&ui, &[]);
    let rows = Rows::new(&[2, 3]);
    table.set_data_source(Some(rows.clone()));

    table.render().unwrap();
    let first: Vec<View> = table.cells()[0].clone();
    assert_eq!(rows.created.get(), 5);

    rows.set_counts(&[1, 3]);
    table.render().unwrap();
    assert_eq!(table.pool_len(0), 2);
    assert_eq!(table.mounted_len(0), 1);
    assert_eq!(first[1].parent(), None);

    rows.set_counts(&[3, 3]);
    table.render().unwrap();
    assert_eq!(rows.created.get(), 6);
    assert_eq!(table.cells()[0][..2].to_vec(), first);
    assert_eq!(table.cell_at_index(4, None), table.cell_at_index(1, Some(1)));
}

#[test]
fn rendering_without_a_source_is_an_error() {
    let table = TableViewController::new(&ui(), &[]);
    assert_eq!(table.render(), Err(UiError::MissingDataSource("table")));
}

#[test]
fn selection_modes() {
    let ui = ui();
    let table = TableViewController::new(&ui, &[]);
    table.set_data_source(Some(Rows::new(&[8])));
    table.render().unwrap();

    let selected = Rc::new(Cell::new(0));
    let count = Rc::clone(&selected);
    table.on_selected_cell.on(move |_| count.set(count.get() + 1));

    let run = |mode: SelectionMode| {
        table.set_selection_mode(mode);
        table.deselect_all_cells();
        selected.set(0);
        table.select_cell(0, 2);
        table.select_cell(0, 5);
        (table.is_cell_selected(0, 2), table.is_cell_selected(0, 5), selected.get())
    };

    assert_eq!(run(SelectionMode::Single), (false, true, 2));
    assert_eq!(run(SelectionMode::Multi), (true, true, 2));
    assert_eq!(run(SelectionMode::Clickable), (false, false, 2));
    assert_eq!(run(SelectionMode::None), (false, false, 0));
}

#[test]
fn rendered_table_outline() {
    let ui = ui();
    let table = TableViewController::new(&ui, &[]);
    let rows = Rc::new(Rows {
        counts: RefCell::new(vec![2, 1]),
        created: Cell::new(0),
        dividers: true,
    });
    table.set_data_source(Some(rows));
    table.set_selection_mode(SelectionMode::Single);
    table.render().unwrap();
    table.select_cell(0, 0);

    insta::assert_snapshot!(view_to_string(table.table_view()), @r#"
    view.table-view.alternating-background
      label.divider.category "cat 0"
      label.row.cell "row 0" [selected]
      label.row.cell "row 1"
      label.divider.category "cat 1"
      label.row.cell "row 0"
    "#);
}

// ---------------------------------------------------------------------------
// Menu
// ---------------------------------------------------------------------------

#[tokio::test]
async fn menu_mounts_one_pane_at_a_time() {
    let ui = ui();
    let menu = MenuViewController::new(&ui, &[]);
    let panes: Vec<Rc<Screen>> = ["one", "two", "three"]
        .into_iter()
        .map(|name| Screen::new(&ui, name))
        .collect();
    for pane in &panes {
        menu.append_child(pane.clone(), None);
    }

    menu.select(0).await.unwrap();
    menu.select(2).await.unwrap();
    menu.select(2).await.unwrap();

    assert_eq!(panes[0].counts(), (1, 1));
    assert_eq!(panes[1].counts(), (0, 0));
    assert_eq!(panes[2].counts(), (1, 0));
    assert_eq!(menu.tab_bar().selected_index(), Some(2));
    assert_eq!(menu.menu_view().selected_index(), Some(2));
    assert_eq!(
        menu.select(3).await,
        Err(UiError::IndexOutOfBounds { index: 3, len: 3 })
    );
}

#[tokio::test]
async fn untitled_menu_entries_use_the_configured_placeholder() {
    let ui = Ui::new(AppConfig::new().with_missing_title("untitled"));
    let menu = MenuViewController::new(&ui, &[]);
    menu.append_child(Screen::new(&ui, "pane"), None);

    let entry = menu.menu_view().item(0).unwrap();
    assert_eq!(entry.child(0).and_then(|label| label.text()).as_deref(), Some("untitled"));
}

// ---------------------------------------------------------------------------
// Presentation layers through the pilot
// ---------------------------------------------------------------------------

#[tokio::test]
async fn message_is_closed_with_enter() {
    LocalSet::new()
        .run_until(async {
            let mut pilot = Pilot::new();
            pilot.app_mut().boot().await.unwrap();
            let popup = pilot.app().popup().clone();

            let closed = popup.push_message("saved", "info").await.unwrap();
            assert!(popup.view().is_visible());
            assert_eq!(pilot.focused().and_then(|f| f.text()).as_deref(), Some("#_ok"));

            pilot.press_key(Key::Enter);
            pilot.settle().await;
            closed.await;

            assert!(popup.view().is_hidden());
            assert!(popup.stack_view_controller().is_empty());
        })
        .await;
}

#[tokio::test]
async fn query_string_through_typing() {
    LocalSet::new()
        .run_until(async {
            let mut pilot = Pilot::new();
            pilot.app_mut().boot().await.unwrap();
            let popup = pilot.app().popup().clone();

            let answer = popup.query_string("name?", "rename").await.unwrap();
            pilot.type_text("notes");
            pilot.press_key(Key::Enter);
            pilot.settle().await;

            assert_eq!(answer.await.as_deref(), Some("notes"));
        })
        .await;
}

#[tokio::test]
async fn query_boolean_escape_answers_no() {
    LocalSet::new()
        .run_until(async {
            let mut pilot = Pilot::new();
            pilot.app_mut().boot().await.unwrap();
            let popup = pilot.app().popup().clone();

            let answer = popup
                .query_boolean("discard?", "confirm", QueryBooleanKind::YesNo)
                .await
                .unwrap();
            pilot.press_key(Key::Escape);
            pilot.settle().await;

            assert_eq!(answer.await, Some(false));
        })
        .await;
}

#[tokio::test(start_paused = true)]
async fn notifications_queue_behind_important_ones() {
    LocalSet::new()
        .run_until(async {
            let pilot = Pilot::with_config(
                AppConfig::new().with_notification_duration(Duration::from_secs(2)),
            );
            let notifications = pilot.app().notifications().clone();

            notifications.push_notification(Notification::new("sync failed").important());
            tokio::time::sleep(Duration::from_millis(10)).await;
            notifications.push_notification(Notification::new("retrying"));
            tokio::time::sleep(Duration::from_millis(10)).await;

            let current = notifications.current_notification().unwrap();
            assert_eq!(current.text, "sync failed");
            assert!(notifications.view().is_visible());

            tokio::time::sleep(Duration::from_secs(2)).await;
            assert_eq!(notifications.current_notification().unwrap().text, "retrying");

            tokio::time::sleep(Duration::from_secs(3)).await;
            assert_eq!(notifications.current_notification(), None);
            assert!(notifications.view().is_hidden());
        })
        .await;
}

// ---------------------------------------------------------------------------
// Routing
// ---------------------------------------------------------------------------

#[test]
fn router_paths_and_history() {
    let ui = ui();
    let router = ui.router();
    assert_eq!(router.change_route("home", None), Err(UiError::NoRoutes));

    let visits = Rc::new(RefCell::new(Vec::new()));
    let log = Rc::clone(&visits);
    router.add_route("home");
    router.add_route_with("detail", move |route| log.borrow_mut().push(route.index()));

    router.navigate_path("/detail/3?tab=info").unwrap();
    assert_eq!(router.route().name(), "detail");
    assert_eq!(router.param("tab").as_deref(), Some("info"));

    router.change_route("missing", None).unwrap();
    assert_eq!(router.route().name(), "home");

    router.back().unwrap();
    assert_eq!(router.route().name(), "detail");
    assert_eq!(*visits.borrow(), vec![Some(3), Some(3)]);
}

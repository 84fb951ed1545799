//! MenuViewController: an ordered list of panes, one mounted at a time.
//!
//! Each pane gets an entry in the side menu and in the tab bar. Selecting an
//! index unloads and detaches the current pane, then mounts and loads the new
//! one; the menu and tab markers move before the load starts. Panes that are
//! not selected stay unloaded. Selections and removals on one menu run one at
//! a time behind an internal lock.
//!
//! View layout:
//!
//! ```text
//! menu-view-controller
//! ├── menu-menu-view         (side list)
//! └── relative
//!     └── container-view-controller
//!         ├── content        (selected pane)
//!         └── menu-tab-bar
//! ```

use std::any::Any;
use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use futures::future::LocalBoxFuture;
use tokio::sync::Mutex;
use tracing::debug;

use crate::context::Ui;
use crate::controller::{ContainerViewController, Controller, ControllerRef, ViewController};
use crate::error::{Result, UiError};
use crate::event::Emitter;
use crate::task;
use crate::view::{Bar, TabBar, TitleBar, View};

pub struct MenuViewController {
    base: ViewController,
    container: Rc<ContainerViewController>,
    menu_view: TabBar,
    tab_bar: TabBar,
    items: RefCell<Vec<ControllerRef>>,
    selected: Cell<Option<usize>>,
    select_lock: Mutex<()>,
    /// Fires with the index chosen through the menu or the tab bar, once
    /// the pane is mounted.
    pub on_selected: Emitter<usize>,
}

impl MenuViewController {
    /// Build an empty menu; nothing is selected until [`select`](Self::select).
    pub fn new(ui: &Ui, classes: &[&str]) -> Rc<Self> {
        let mut all = classes.to_vec();
        all.push("menu-view-controller");
        let mut menu_classes = classes.to_vec();
        menu_classes.push("menu-menu-view");
        let mut tab_classes = classes.to_vec();
        tab_classes.push("menu-tab-bar");

        ViewController::build(ui, &all, |base, this: &Weak<MenuViewController>| {
            let relative = ViewController::create(ui, &["relative"]);
            let container = ContainerViewController::new(ui, &[]);
            let menu_view = TabBar::new(ui, &menu_classes);
            let tab_bar = TabBar::new(ui, &tab_classes);

            for bar in [&menu_view, &tab_bar] {
                let menu = this.clone();
                bar.on_item_clicked.on(move |index| {
                    let Some(menu) = menu.upgrade() else {
                        return;
                    };
                    let index = *index;
                    task::spawn("menu select", async move {
                        menu.select(index).await?;
                        menu.on_selected.emit(&index);
                        Ok(())
                    });
                });
            }

            base.view().append_child(&menu_view);
            relative.append_child(container.clone());
            base.append_child(relative);
            container.view().append_child(&tab_bar);

            Self {
                base,
                container,
                menu_view,
                tab_bar,
                items: RefCell::new(Vec::new()),
                selected: Cell::new(None),
                select_lock: Mutex::new(()),
                on_selected: Emitter::new("MenuViewController.onSelected"),
            }
        })
    }

    /// The side list of entries.
    pub fn menu_view(&self) -> &TabBar {
        &self.menu_view
    }

    /// The tab strip shown above the selected pane.
    pub fn tab_bar(&self) -> &TabBar {
        &self.tab_bar
    }

    /// The container holding the selected pane.
    pub fn container_view_controller(&self) -> &Rc<ContainerViewController> {
        &self.container
    }

    /// Where the selected pane is mounted.
    pub fn content_view(&self) -> &View {
        self.container.content_view()
    }

    /// The panes, in order.
    pub fn children(&self) -> Vec<ControllerRef> {
        self.items.borrow().clone()
    }

    /// Number of panes.
    pub fn len(&self) -> usize {
        self.items.borrow().len()
    }

    /// Whether the menu has no panes.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Index of the mounted pane.
    pub fn selected_index(&self) -> Option<usize> {
        self.selected.get()
    }

    /// The mounted pane.
    pub fn selected_view_controller(&self) -> Option<ControllerRef> {
        let index = self.selected.get()?;
        self.items.borrow().get(index).cloned()
    }

    // -- chrome ------------------------------------------------------------------

    /// Set the shared title bar here and on every pane.
    pub fn set_title_bar(&self, bar: Option<TitleBar>) {
        self.base.set_title_bar(bar.clone());
        for item in self.items.borrow().iter() {
            item.base().set_title_bar(bar.clone());
        }
    }

    /// Set the shared footer bar here and on every pane.
    pub fn set_footer_bar(&self, bar: Option<Bar>) {
        self.base.set_footer_bar(bar.clone());
        for item in self.items.borrow().iter() {
            item.base().set_footer_bar(bar.clone());
        }
    }

    /// Enable or disable the entries of pane `index`. The pane itself is
    /// left as it is.
    pub fn enable_view_controller_at_index(&self, index: usize, enabled: bool) {
        if index >= self.len() {
            return;
        }
        for bar in [&self.menu_view, &self.tab_bar] {
            if let Some(item) = bar.item(index) {
                item.set_enabled(enabled);
            }
        }
    }

    /// Shorthand for disabling the entries of pane `index`.
    pub fn disable_view_controller_at_index(&self, index: usize) {
        self.enable_view_controller_at_index(index, false);
    }

    /// Hide or show the entries of pane `index`. The pane itself is left as
    /// it is.
    pub fn hide_view_controller_at_index(&self, index: usize, hidden: bool) {
        if index >= self.len() {
            return;
        }
        for bar in [&self.menu_view, &self.tab_bar] {
            if let Some(item) = bar.item(index) {
                item.set_hidden(hidden);
            }
        }
    }

    // -- items -------------------------------------------------------------------

    /// Add a pane with an entry titled `title`, falling back to the pane's
    /// own title and then to the configured placeholder. A pane without its
    /// own bars gets the menu's shared ones. Returns the pane's index.
    pub fn append_child(&self, controller: ControllerRef, title: Option<&str>) -> usize {
        let title = title
            .map(str::to_owned)
            .or_else(|| controller.base().title())
            .unwrap_or_else(|| self.base.ui().config().missing_title().to_owned());

        if controller.base().title_bar().is_none() {
            controller.base().set_title_bar(self.base.title_bar());
        }
        if controller.base().footer_bar().is_none() {
            controller.base().set_footer_bar(self.base.footer_bar());
        }

        self.menu_view.add_item(&title);
        self.tab_bar.add_item(&title);

        let mut items = self.items.borrow_mut();
        items.push(controller);
        items.len() - 1
    }

    /// Mount pane `index`.
    ///
    /// No-op when it is already selected; `IndexOutOfBounds` when there is no
    /// such pane.
    pub async fn select(&self, index: usize) -> Result<()> {
        let _guard = self.select_lock.lock().await;

        if Some(index) == self.selected.get() {
            return Ok(());
        }
        let (current, next) = {
            let items = self.items.borrow();
            let Some(next) = items.get(index).cloned() else {
                return Err(UiError::IndexOutOfBounds {
                    index,
                    len: items.len(),
                });
            };
            let current = self.selected.get().and_then(|i| items.get(i).cloned());
            (current, next)
        };

        self.selected.set(Some(index));
        self.menu_view.set_selected_index(Some(index));
        self.tab_bar.set_selected_index(Some(index));
        debug!(index, "menu select");

        if let Some(current) = current {
            current.unload().await?;
            self.container.remove_child(&*current);
        }
        self.container.append_child(next);

        self.base.load().await?;
        self.focus();
        Ok(())
    }

    /// Remove `child`. Returns the index it had.
    pub async fn remove_child(&self, child: &dyn Controller) -> Result<Option<usize>> {
        let index = self.items.borrow().iter().position(|c| c.is(child));
        let Some(index) = index else {
            return Ok(None);
        };
        Ok(self.remove_child_at_index(index).await?.map(|_| index))
    }

    /// Remove the pane at `index` with its entries.
    ///
    /// Removing the selected pane unloads and detaches it and leaves nothing
    /// selected; removing an earlier pane shifts the selection down by one.
    pub async fn remove_child_at_index(&self, index: usize) -> Result<Option<ControllerRef>> {
        let _guard = self.select_lock.lock().await;

        let child = {
            let mut items = self.items.borrow_mut();
            if index >= items.len() {
                return Ok(None);
            }
            items.remove(index)
        };
        self.menu_view.remove_item_at(index);
        self.tab_bar.remove_item_at(index);

        match self.selected.get() {
            Some(selected) if selected == index => {
                self.selected.set(None);
                self.container.remove_child(&*child);
                child.unload().await?;
            }
            Some(selected) if selected > index => self.selected.set(Some(selected - 1)),
            _ => {}
        }
        Ok(Some(child))
    }

    /// Remove every pane, unloading the selected one.
    pub async fn remove_all_children(&self) -> Result<Vec<ControllerRef>> {
        let _guard = self.select_lock.lock().await;

        let current = self.selected_view_controller();
        let items = std::mem::take(&mut *self.items.borrow_mut());
        self.selected.set(None);
        self.container.remove_all_children();
        self.menu_view.remove_all_items();
        self.tab_bar.remove_all_items();

        if let Some(current) = current {
            current.unload().await?;
        }
        Ok(items)
    }
}

impl Controller for MenuViewController {
    fn base(&self) -> &ViewController {
        &self.base
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    /// Selects the first pane when nothing is selected yet.
    fn load(&self) -> LocalBoxFuture<'_, Result<()>> {
        Box::pin(async move {
            if self.selected.get().is_none() && !self.is_empty() {
                self.select(0).await
            } else {
                self.base.load().await
            }
        })
    }

    fn focus(&self) {
        if let Some(selected) = self.selected_view_controller() {
            selected.focus();
        }
    }
}

impl std::fmt::Debug for MenuViewController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MenuViewController")
            .field("items", &self.len())
            .field("selected", &self.selected.get())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use tokio::task::LocalSet;

    use super::*;
    use crate::app::AppConfig;

    struct Pane {
        base: ViewController,
        loads: Cell<usize>,
        unloads: Cell<usize>,
    }

    impl Pane {
        fn new(ui: &Ui) -> Rc<Pane> {
            ViewController::build(ui, &["pane"], |base, _| Pane {
                base,
                loads: Cell::new(0),
                unloads: Cell::new(0),
            })
        }

        fn counts(&self) -> (usize, usize) {
            (self.loads.get(), self.unloads.get())
        }
    }

    impl Controller for Pane {
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

    fn menu_with(count: usize) -> (Ui, Rc<MenuViewController>, Vec<Rc<Pane>>) {
        let ui = Ui::new(AppConfig::default());
        let menu = MenuViewController::new(&ui, &[]);
        let panes: Vec<Rc<Pane>> = (0..count).map(|_| Pane::new(&ui)).collect();
        for (i, pane) in panes.iter().enumerate() {
            menu.append_child(pane.clone(), Some(format!("pane {i}").as_str()));
        }
        (ui, menu, panes)
    }

    #[tokio::test]
    async fn reselect_unloads_previous_once_and_loads_next_once() {
        let (_ui, menu, panes) = menu_with(3);
        menu.select(0).await.unwrap();
        menu.select(2).await.unwrap();

        assert_eq!(panes[0].counts(), (1, 1));
        assert_eq!(panes[1].counts(), (0, 0));
        assert_eq!(panes[2].counts(), (1, 0));
        assert_eq!(menu.content_view().children(), vec![panes[2].base().view().clone()]);
    }

    #[tokio::test]
    async fn selecting_current_index_is_a_noop() {
        let (_ui, menu, panes) = menu_with(2);
        menu.select(1).await.unwrap();
        menu.select(1).await.unwrap();
        assert_eq!(panes[1].counts(), (1, 0));
    }

    #[tokio::test]
    async fn out_of_bounds_selection_fails() {
        let (_ui, menu, _panes) = menu_with(2);
        let err = menu.select(2).await.unwrap_err();
        assert_eq!(err, UiError::IndexOutOfBounds { index: 2, len: 2 });
        assert_eq!(menu.selected_index(), None);
    }

    #[tokio::test]
    async fn markers_follow_selection() {
        let (_ui, menu, _panes) = menu_with(3);
        menu.select(1).await.unwrap();
        assert_eq!(menu.menu_view().selected_index(), Some(1));
        assert_eq!(menu.tab_bar().selected_index(), Some(1));
    }

    #[tokio::test]
    async fn load_selects_first_pane() {
        let (_ui, menu, panes) = menu_with(2);
        menu.load().await.unwrap();
        assert_eq!(menu.selected_index(), Some(0));
        assert_eq!(panes[0].counts(), (1, 0));

        // Once selected, load cascades to the mounted pane only.
        menu.load().await.unwrap();
        assert_eq!(panes[0].counts(), (2, 0));
        assert_eq!(panes[1].counts(), (0, 0));
    }

    #[tokio::test]
    async fn load_without_panes_is_plain() {
        let (_ui, menu, _panes) = menu_with(0);
        menu.load().await.unwrap();
        assert_eq!(menu.selected_index(), None);
    }

    #[test]
    fn append_titles_and_shared_bars() {
        let ui = Ui::new(AppConfig::default());
        let menu = MenuViewController::new(&ui, &[]);
        let shared = TitleBar::new(&ui, &["shared"]);
        menu.set_title_bar(Some(shared.clone()));

        let plain = Pane::new(&ui);
        let titled = Pane::new(&ui);
        titled.base().set_title("Titled");
        let own_bar = TitleBar::new(&ui, &["own"]);
        titled.base().set_title_bar(Some(own_bar.clone()));

        menu.append_child(plain.clone(), None);
        menu.append_child(titled.clone(), None);
        menu.append_child(Pane::new(&ui), Some("Explicit"));

        let titles: Vec<Option<String>> = menu
            .menu_view()
            .items()
            .iter()
            .map(|item| item.child(0).and_then(|label| label.text()))
            .collect();
        assert_eq!(
            titles,
            vec![
                Some("_missing_title_".to_string()),
                Some("Titled".to_string()),
                Some("Explicit".to_string()),
            ]
        );
        assert_eq!(plain.base().title_bar(), Some(shared));
        assert_eq!(titled.base().title_bar(), Some(own_bar));
        assert_eq!(menu.tab_bar().len(), 3);
    }

    #[test]
    fn set_title_bar_propagates() {
        let (ui, menu, panes) = menu_with(2);
        let bar = TitleBar::new(&ui, &[]);
        menu.set_title_bar(Some(bar.clone()));
        assert!(panes.iter().all(|p| p.base().title_bar().as_ref() == Some(&bar)));
        let footer = Bar::new(&ui, &[]);
        menu.set_footer_bar(Some(footer.clone()));
        assert!(panes.iter().all(|p| p.base().footer_bar().as_ref() == Some(&footer)));
    }

    #[tokio::test]
    async fn enable_and_hide_touch_only_chrome() {
        let (_ui, menu, panes) = menu_with(2);
        menu.select(0).await.unwrap();
        menu.disable_view_controller_at_index(0);
        menu.hide_view_controller_at_index(0, true);
        menu.hide_view_controller_at_index(9, true);

        assert!(menu.menu_view().item(0).unwrap().is_disabled());
        assert!(menu.tab_bar().item(0).unwrap().is_hidden());
        assert_eq!(menu.selected_index(), Some(0));
        assert_eq!(panes[0].counts(), (1, 0));
        assert_eq!(panes[0].base().view().parent().as_ref(), Some(menu.content_view()));

        menu.enable_view_controller_at_index(0, true);
        assert!(menu.menu_view().item(0).unwrap().is_enabled());
    }

    #[tokio::test]
    async fn removing_selected_pane_clears_selection() {
        let (_ui, menu, panes) = menu_with(3);
        menu.select(1).await.unwrap();
        let removed = menu.remove_child_at_index(1).await.unwrap().unwrap();
        assert!(removed.is(&*panes[1]));
        assert_eq!(menu.selected_index(), None);
        assert_eq!(panes[1].counts(), (1, 1));
        assert!(menu.content_view().children().is_empty());
        assert_eq!(menu.menu_view().len(), 2);
    }

    #[tokio::test]
    async fn removing_earlier_pane_shifts_selection() {
        let (_ui, menu, panes) = menu_with(3);
        menu.select(2).await.unwrap();
        assert_eq!(menu.remove_child(&*panes[0]).await.unwrap(), Some(0));
        assert_eq!(menu.selected_index(), Some(1));
        assert!(menu.selected_view_controller().unwrap().is(&*panes[2]));
        assert_eq!(menu.remove_child(&*panes[0]).await.unwrap(), None);
        assert!(menu.remove_child_at_index(7).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn remove_all_unloads_selected() {
        let (_ui, menu, panes) = menu_with(2);
        menu.select(0).await.unwrap();
        let removed = menu.remove_all_children().await.unwrap();
        assert_eq!(removed.len(), 2);
        assert!(menu.is_empty());
        assert!(menu.menu_view().is_empty());
        assert_eq!(panes[0].counts(), (1, 1));
        assert_eq!(panes[1].counts(), (0, 0));
    }

    #[tokio::test]
    async fn clicking_an_entry_selects_and_announces() {
        let local = LocalSet::new();
        local
            .run_until(async {
                let (_ui, menu, panes) = menu_with(2);
                let announced = Rc::new(Cell::new(None));
                let a = Rc::clone(&announced);
                menu.on_selected.on(move |i| a.set(Some(*i)));

                menu.tab_bar().item(1).unwrap().click();
                // Markers move synchronously.
                assert_eq!(menu.tab_bar().selected_index(), Some(1));

                for _ in 0..8 {
                    tokio::task::yield_now().await;
                }
                assert_eq!(announced.get(), Some(1));
                assert_eq!(menu.selected_index(), Some(1));
                assert_eq!(panes[1].counts(), (1, 0));
            })
            .await;
    }
}

//! Controllers: the behaviour tree paired one-to-one with views.
//!
//! - [`ViewController`]: ownership, lifecycle fan-out, focus
//! - [`ContainerViewController`] / [`BodyViewController`]: fixed chrome around
//!   a swappable content region
//! - [`StackViewController`]: LIFO navigation with a dismissal rendezvous
//! - [`MenuViewController`]: one mounted pane out of many
//! - [`TableViewController`] / [`GridViewController`]: pooled list rendering
//! - [`PopupViewController`], [`NotificationViewController`],
//!   [`LoadingViewController`]: presentation layers

pub mod base;
pub mod body;
pub mod container;
pub mod data_source;
pub mod grid;
pub mod lifecycle;
pub mod loading;
pub mod menu;
pub mod notification;
pub mod popup;
pub mod stack;
pub mod table;

pub use base::{Controller, ControllerRef, ViewController};
pub use body::BodyViewController;
pub use container::ContainerViewController;
pub use data_source::{GridDataSource, TableDataSource};
pub use grid::GridViewController;
pub use lifecycle::{LifecycleTracker, Phase, PhaseChange};
pub use loading::LoadingViewController;
pub use menu::MenuViewController;
pub use notification::{Notification, NotificationViewController};
pub use popup::{Answer, PopupViewController, QueryBooleanKind};
pub use stack::{Dismissal, NavigationController, StackViewController};
pub use table::TableViewController;

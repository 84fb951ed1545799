//! # panekit
//!
//! View-controller composition and navigation over a retained DOM.
//!
//! panekit pairs every controller with exactly one view and keeps the two trees
//! in lock-step. On top of that it provides a stack navigator with a
//! "wait until this screen closes" rendezvous, a menu that mounts one pane at a
//! time, and table/grid controllers that render from a data source through a
//! reusable cell pool. Everything runs on one thread: lifecycle hooks are
//! `!Send` futures, and listener-driven navigation runs on a
//! `tokio::task::LocalSet`.
//!
//! ## Core Systems
//!
//! - **[`dom`]**: slotmap-backed node arena with tree operations, queries and focus
//! - **[`view`]**: the `View` handle plus bars, tab bars, tables and grids
//! - **[`event`]**: emitters, input events, dispatch and bubbling
//! - **[`controller`]**: the `Controller` trait, lifecycle, and every concrete controller
//! - **[`context`]**: the process-wide [`Ui`] context and the parameter registry
//! - **[`router`]**: named routes with history
//! - **[`app`]**: configuration and the composition root
//! - **[`testing`]**: headless pilot and DOM snapshots
//! - **[`geometry`]**: Offset and Region primitives

// Foundation
pub mod error;
pub mod geometry;

// Rendering surface
pub mod dom;
pub mod view;

// Events
pub mod event;
pub mod task;

// Controllers
pub mod context;
pub mod controller;

// Application
pub mod app;
pub mod router;

// Headless testing
pub mod testing;

pub use app::{App, AppConfig};
pub use context::{Parameter, Preparer, Ui};
pub use controller::{Controller, ControllerRef, ViewController};
pub use error::{Result, UiError};
pub use view::View;

//! Headless testing support: Pilot, text snapshots.
//!
//! Use the [`Pilot`] to drive an [`App`](crate::app::App) the way a user
//! would, without a terminal. Use [`dom_to_string`] and [`view_to_string`] to
//! capture the DOM as an indented outline for snapshot assertions.

pub mod pilot;
pub mod snapshot;

pub use pilot::Pilot;
pub use snapshot::{dom_to_string, view_to_string};

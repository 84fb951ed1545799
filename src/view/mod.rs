//! Views: the node handle and the composite views built from it.

pub mod bar;
pub mod handle;
pub mod list;
pub mod tab_bar;

pub use bar::{Bar, TitleBar};
pub use handle::{View, WeakView};
pub use list::{GridView, SelectionMode, TableView};
pub use tab_bar::TabBar;

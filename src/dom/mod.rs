//! DOM arena: slotmap-backed node tree with class/id queries and focus.

pub mod node;
pub mod tree;
pub mod query;

pub use node::{NodeData, NodeEvents, NodeId};
pub use tree::Dom;

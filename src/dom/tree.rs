//! Tree operations: insert, append, remove, walk, focus.

use std::collections::VecDeque;

use slotmap::{SecondaryMap, SlotMap};

use super::node::{NodeData, NodeId};

/// Empty slice constant for returning when a node has no children.
const EMPTY_CHILDREN: &[NodeId] = &[];

/// The central DOM tree, backed by a slotmap arena.
///
/// All nodes live in a single `SlotMap`. Parent/child relationships are stored
/// in secondary maps so that node removal is O(subtree size) and lookup is O(1).
/// The parent map is a plain back-reference: dropping a parent never depends on
/// it, and every detach path clears it.
///
/// A `body` node exists from construction. Nodes reachable from it are
/// attached; everything else is a detached subtree owned by whoever holds its
/// id.
pub struct Dom {
    pub(crate) nodes: SlotMap<NodeId, NodeData>,
    children: SecondaryMap<NodeId, Vec<NodeId>>,
    parent: SecondaryMap<NodeId, NodeId>,
    body: NodeId,
    focused: Option<NodeId>,
}

impl Dom {
    /// Create a DOM containing only the body node.
    pub fn new() -> Self {
        let mut nodes = SlotMap::with_key();
        let body = nodes.insert(NodeData::new("body"));
        let mut children = SecondaryMap::new();
        children.insert(body, Vec::new());
        Self {
            nodes,
            children,
            parent: SecondaryMap::new(),
            body,
            focused: None,
        }
    }

    /// The body node.
    pub fn body(&self) -> NodeId {
        self.body
    }

    /// Insert a detached node.
    pub fn insert(&mut self, data: NodeData) -> NodeId {
        let id = self.nodes.insert(data);
        self.children.insert(id, Vec::new());
        id
    }

    /// Append `child` as the last child of `parent`.
    ///
    /// If `child` already has a parent it is detached first, so appending to
    /// the same parent again moves it to the end. Returns the child's new index,
    /// or `None` when either node is missing or the append would make a node
    /// its own ancestor.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> Option<usize> {
        if !self.nodes.contains_key(parent) || !self.nodes.contains_key(child) {
            return None;
        }
        if child == parent || self.ancestors(parent).contains(&child) {
            return None;
        }
        self.detach(child);
        self.parent.insert(child, parent);
        let siblings = self.children.get_mut(parent)?;
        siblings.push(child);
        Some(siblings.len() - 1)
    }

    /// Detach `child` from `parent`. Returns the index it had, or `None` if it
    /// was not a child of `parent`.
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) -> Option<usize> {
        let index = self.index_in(parent, child)?;
        self.remove_child_at_index(parent, index).map(|_| index)
    }

    /// Detach the child at `index`. Returns it, or `None` if out of range.
    pub fn remove_child_at_index(&mut self, parent: NodeId, index: usize) -> Option<NodeId> {
        let siblings = self.children.get_mut(parent)?;
        if index >= siblings.len() {
            return None;
        }
        let child = siblings.remove(index);
        self.parent.remove(child);
        Some(child)
    }

    /// Detach every child of `parent`, returning them in order.
    pub fn remove_all_children(&mut self, parent: NodeId) -> Vec<NodeId> {
        let Some(siblings) = self.children.get_mut(parent) else {
            return Vec::new();
        };
        let removed = std::mem::take(siblings);
        for &child in &removed {
            self.parent.remove(child);
        }
        removed
    }

    /// Detach `node` from its parent, if it has one. Returns the index it had.
    pub fn remove_from_parent(&mut self, node: NodeId) -> Option<usize> {
        let parent = self.parent(node)?;
        self.remove_child(parent, node)
    }

    /// Destroy a node and all its descendants.
    ///
    /// Returns the `NodeData` for the removed node, or `None` if it didn't
    /// exist. The body cannot be removed.
    pub fn remove(&mut self, id: NodeId) -> Option<NodeData> {
        if id == self.body || !self.nodes.contains_key(id) {
            return None;
        }

        self.detach(id);

        let mut to_remove = VecDeque::new();
        to_remove.push_back(id);
        let mut removed_root_data = None;

        while let Some(current) = to_remove.pop_front() {
            if let Some(kids) = self.children.remove(current) {
                to_remove.extend(kids);
            }
            self.parent.remove(current);
            if self.focused == Some(current) {
                self.focused = None;
            }
            let data = self.nodes.remove(current);
            if current == id {
                removed_root_data = data;
            }
        }

        removed_root_data
    }

    /// Get the parent of a node, if it has one.
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.parent.get(id).copied()
    }

    /// Get the children of a node. Returns an empty slice if the node has no
    /// children or does not exist.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.children
            .get(id)
            .map(Vec::as_slice)
            .unwrap_or(EMPTY_CHILDREN)
    }

    /// Position of `node` in its parent's child list.
    pub fn index_in_parent(&self, node: NodeId) -> Option<usize> {
        let parent = self.parent(node)?;
        self.index_in(parent, node)
    }

    /// Walk from `id` up to the topmost ancestor, collecting ancestor ids.
    ///
    /// The returned vec does **not** include `id` itself; it starts with the
    /// immediate parent.
    pub fn ancestors(&self, id: NodeId) -> Vec<NodeId> {
        let mut result = Vec::new();
        let mut current = id;
        while let Some(p) = self.parent.get(current).copied() {
            result.push(p);
            current = p;
        }
        result
    }

    /// Whether `id` is reachable from the body.
    pub fn is_attached(&self, id: NodeId) -> bool {
        id == self.body || self.ancestors(id).last() == Some(&self.body)
    }

    /// Immutable access to a node's data.
    pub fn get(&self, id: NodeId) -> Option<&NodeData> {
        self.nodes.get(id)
    }

    /// Mutable access to a node's data.
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut NodeData> {
        self.nodes.get_mut(id)
    }

    /// Number of nodes in the DOM, body included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the DOM holds nothing but the body.
    pub fn is_empty(&self) -> bool {
        self.nodes.len() <= 1
    }

    /// Whether the DOM contains a node with the given id.
    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    /// Pre-order depth-first traversal starting from `start`.
    pub fn walk_depth_first(&self, start: NodeId) -> Vec<NodeId> {
        let mut result = Vec::new();
        let mut stack = vec![start];
        while let Some(current) = stack.pop() {
            if !self.nodes.contains_key(current) {
                continue;
            }
            result.push(current);
            // Push children in reverse so the first child is visited first.
            for &child in self.children(current).iter().rev() {
                stack.push(child);
            }
        }
        result
    }

    /// Breadth-first traversal starting from `start`.
    pub fn walk_breadth_first(&self, start: NodeId) -> Vec<NodeId> {
        let mut result = Vec::new();
        let mut queue = VecDeque::new();
        queue.push_back(start);
        while let Some(current) = queue.pop_front() {
            if !self.nodes.contains_key(current) {
                continue;
            }
            result.push(current);
            queue.extend(self.children(current).iter().copied());
        }
        result
    }

    // -- focus ---------------------------------------------------------------

    /// Focus `node`, then every node below it, in pre-order.
    ///
    /// Only focusable nodes take focus and hidden subtrees are skipped, so the
    /// last focusable node visited ends up focused. Returns the focused node
    /// after the walk.
    pub fn focus(&mut self, node: NodeId) -> Option<NodeId> {
        let mut stack = vec![node];
        while let Some(current) = stack.pop() {
            let Some(data) = self.nodes.get(current) else {
                continue;
            };
            if data.hidden {
                continue;
            }
            if data.is_focusable() {
                self.focused = Some(current);
            }
            for &child in self.children(current).iter().rev() {
                stack.push(child);
            }
        }
        self.focused
    }

    /// The node that currently has focus.
    pub fn focused(&self) -> Option<NodeId> {
        self.focused
    }

    /// Drop focus.
    pub fn blur(&mut self) {
        self.focused = None;
    }

    fn index_in(&self, parent: NodeId, child: NodeId) -> Option<usize> {
        self.children(parent).iter().position(|&c| c == child)
    }

    fn detach(&mut self, node: NodeId) {
        if let Some(old_parent) = self.parent.remove(node) {
            if let Some(siblings) = self.children.get_mut(old_parent) {
                siblings.retain(|&c| c != node);
            }
        }
    }
}

impl Default for Dom {
    fn default() -> Self {
        Self::new()
    }
}

//! DOM queries: by id, class, tag; generic predicate matching.

use super::node::{NodeData, NodeId};
use super::tree::Dom;

impl Dom {
    /// Find the first node whose `id` field matches the given string.
    ///
    /// Iterates all nodes in the arena, attached or not.
    pub fn query_by_id(&self, id: &str) -> Option<NodeId> {
        self.iter_nodes()
            .find(|(_, data)| data.id.as_deref() == Some(id))
            .map(|(node_id, _)| node_id)
    }

    /// Find all nodes that have the given class.
    pub fn query_by_class(&self, class: &str) -> Vec<NodeId> {
        self.query_all(|data| data.has_class(class))
    }

    /// Find all nodes whose `tag` matches the given string.
    pub fn query_by_tag(&self, tag: &str) -> Vec<NodeId> {
        self.query_all(|data| data.tag == tag)
    }

    /// Find all nodes matching an arbitrary predicate.
    pub fn query_all(&self, predicate: impl Fn(&NodeData) -> bool) -> Vec<NodeId> {
        self.iter_nodes()
            .filter(|(_, data)| predicate(data))
            .map(|(node_id, _)| node_id)
            .collect()
    }

    /// Direct children of `parent` that carry `class`, in child order.
    pub fn children_with_class(&self, parent: NodeId, class: &str) -> Vec<NodeId> {
        self.children(parent)
            .iter()
            .copied()
            .filter(|&child| self.get(child).is_some_and(|data| data.has_class(class)))
            .collect()
    }

    /// Nodes in the subtree of `start` (inclusive) that carry `class`, in
    /// tree order.
    pub fn descendants_with_class(&self, start: NodeId, class: &str) -> Vec<NodeId> {
        self.walk_depth_first(start)
            .into_iter()
            .filter(|&node| self.get(node).is_some_and(|data| data.has_class(class)))
            .collect()
    }

    /// Iterate over all `(NodeId, &NodeData)` pairs in the arena.
    ///
    /// Slotmap order: deterministic but not tree order.
    fn iter_nodes(&self) -> impl Iterator<Item = (NodeId, &NodeData)> {
        self.nodes.iter()
    }
}

#[cfg(test)]
mod tests {
    use crate::dom::node::{NodeData, NodeId};
    use crate::dom::tree::Dom;

    /// ```text
    ///          body
    ///         /    \
    ///    sidebar    main
    ///    (.nav)   (.content)
    ///    /    \
    ///  save   cancel
    ///  (.btn) (.btn .danger)
    /// ```
    fn build_query_tree() -> (Dom, NodeId) {
        let mut dom = Dom::new();
        let body = dom.body();
        let sidebar = dom.insert(NodeData::new("view").with_id("sidebar").with_class("nav"));
        let main = dom.insert(NodeData::new("view").with_id("main").with_class("content"));
        let save = dom.insert(NodeData::new("button").with_id("save").with_class("btn"));
        let cancel = dom.insert(
            NodeData::new("button")
                .with_id("cancel")
                .with_classes(["btn", "danger"]),
        );
        dom.append_child(body, sidebar);
        dom.append_child(body, main);
        dom.append_child(sidebar, save);
        dom.append_child(sidebar, cancel);
        (dom, sidebar)
    }

    #[test]
    fn query_by_id_found() {
        let (dom, sidebar) = build_query_tree();
        assert_eq!(dom.query_by_id("sidebar"), Some(sidebar));
        assert!(dom.query_by_id("nonexistent").is_none());
    }

    #[test]
    fn query_by_class() {
        let (dom, _) = build_query_tree();
        assert_eq!(dom.query_by_class("btn").len(), 2);
        assert!(dom.query_by_class("nonexistent").is_empty());
    }

    #[test]
    fn query_by_tag() {
        let (dom, _) = build_query_tree();
        assert_eq!(dom.query_by_tag("button").len(), 2);
        assert_eq!(dom.query_by_tag("body").len(), 1);
    }

    #[test]
    fn children_with_class_keeps_order() {
        let (dom, sidebar) = build_query_tree();
        let btns = dom.children_with_class(sidebar, "btn");
        let ids: Vec<_> = btns
            .iter()
            .map(|&n| dom.get(n).unwrap().id.clone().unwrap())
            .collect();
        assert_eq!(ids, vec!["save", "cancel"]);
        assert_eq!(dom.children_with_class(sidebar, "danger").len(), 1);
    }

    #[test]
    fn descendants_with_class_searches_subtree() {
        let (dom, _) = build_query_tree();
        assert_eq!(dom.descendants_with_class(dom.body(), "btn").len(), 2);
        let main = dom.query_by_id("main").unwrap();
        assert!(dom.descendants_with_class(main, "btn").is_empty());
    }

    #[test]
    fn detached_nodes_are_still_queryable() {
        let (mut dom, sidebar) = build_query_tree();
        dom.remove_from_parent(sidebar);
        assert!(dom.query_by_id("save").is_some());
        assert!(dom.descendants_with_class(dom.body(), "btn").is_empty());
    }
}

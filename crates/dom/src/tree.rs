//! DOM Tree implementation.

use crate::element::ElementData;
use crate::node::{Node, NodeData, NodeId};
use slotmap::SlotMap;
use std::collections::HashMap;

/// The DOM tree structure.
pub struct DomTree {
    /// All nodes in the tree, attached or not.
    nodes: SlotMap<NodeId, Node>,
    /// Root node (document).
    root: NodeId,
    /// ID to node mapping for fast lookups.
    id_map: HashMap<String, NodeId>,
}

impl DomTree {
    pub fn new() -> Self {
        let mut nodes = SlotMap::with_key();
        let root = nodes.insert_with_key(Node::new_document);
        Self {
            nodes,
            root,
            id_map: HashMap::new(),
        }
    }

    /// Get the root document node.
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Check whether a node is still alive.
    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id)
    }

    pub fn get_element(&self, id: NodeId) -> Option<&ElementData> {
        self.nodes.get(id).and_then(|n| n.as_element())
    }

    pub fn get_element_mut(&mut self, id: NodeId) -> Option<&mut ElementData> {
        self.nodes.get_mut(id).and_then(|n| n.as_element_mut())
    }

    /// Create a detached element node.
    pub fn create_element(&mut self, data: ElementData) -> NodeId {
        self.nodes.insert_with_key(|id| Node::new_element(id, data))
    }

    /// Create a detached text node.
    pub fn create_text(&mut self, content: String) -> NodeId {
        self.nodes.insert_with_key(|id| Node::new_text(id, content))
    }

    /// Append a child to a parent node, detaching it from any old parent first.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        if parent == child || !self.contains(parent) || !self.contains(child) {
            return;
        }

        self.remove_from_parent(child);

        if let Some(last_child) = self.nodes.get(parent).and_then(|n| n.last_child()) {
            if let Some(last) = self.nodes.get_mut(last_child) {
                last.next_sibling = Some(child);
            }
            if let Some(child_node) = self.nodes.get_mut(child) {
                child_node.prev_sibling = Some(last_child);
            }
        }

        if let Some(parent_node) = self.nodes.get_mut(parent) {
            parent_node.children.push(child);
        }

        if let Some(child_node) = self.nodes.get_mut(child) {
            child_node.parent = Some(parent);
            child_node.next_sibling = None;
        }

        self.update_id_map(child);
    }

    /// Insert a child before a reference node.
    pub fn insert_before(&mut self, parent: NodeId, child: NodeId, reference: Option<NodeId>) {
        let Some(ref_id) = reference else {
            self.append_child(parent, child);
            return;
        };

        if self.parent(ref_id) != Some(parent) || ref_id == child {
            return;
        }

        self.remove_from_parent(child);

        if let Some(parent_node) = self.nodes.get_mut(parent) {
            if let Some(pos) = parent_node.children.iter().position(|&id| id == ref_id) {
                parent_node.children.insert(pos, child);
            }
        }

        let prev = self.nodes.get(ref_id).and_then(|n| n.prev_sibling);

        if let Some(prev_id) = prev {
            if let Some(prev_node) = self.nodes.get_mut(prev_id) {
                prev_node.next_sibling = Some(child);
            }
        }

        if let Some(child_node) = self.nodes.get_mut(child) {
            child_node.parent = Some(parent);
            child_node.prev_sibling = prev;
            child_node.next_sibling = Some(ref_id);
        }

        if let Some(ref_node) = self.nodes.get_mut(ref_id) {
            ref_node.prev_sibling = Some(child);
        }

        self.update_id_map(child);
    }

    /// Insert a child as the first child of `parent`.
    pub fn prepend_child(&mut self, parent: NodeId, child: NodeId) {
        let first = self.first_child(parent);
        self.insert_before(parent, child, first);
    }

    /// Remove a node from its parent, keeping it alive.
    pub fn remove_from_parent(&mut self, node: NodeId) {
        let (parent, prev, next) = match self.nodes.get(node) {
            Some(n) => (n.parent, n.prev_sibling, n.next_sibling),
            None => return,
        };

        if let Some(parent_id) = parent {
            if let Some(parent_node) = self.nodes.get_mut(parent_id) {
                parent_node.children.retain(|id| *id != node);
            }
        }

        if let Some(prev_id) = prev {
            if let Some(prev_node) = self.nodes.get_mut(prev_id) {
                prev_node.next_sibling = next;
            }
        }
        if let Some(next_id) = next {
            if let Some(next_node) = self.nodes.get_mut(next_id) {
                next_node.prev_sibling = prev;
            }
        }

        if let Some(node_data) = self.nodes.get_mut(node) {
            node_data.parent = None;
            node_data.prev_sibling = None;
            node_data.next_sibling = None;
        }
    }

    /// Remove a node and its subtree, returning every removed id.
    pub fn remove(&mut self, node: NodeId) -> Vec<NodeId> {
        if node == self.root {
            return Vec::new();
        }

        self.remove_from_parent(node);

        let mut to_remove = vec![node];
        let mut i = 0;
        while i < to_remove.len() {
            if let Some(n) = self.nodes.get(to_remove[i]) {
                to_remove.extend(n.children.iter().copied());
            }
            i += 1;
        }

        for &id in &to_remove {
            if let Some(elem_id) = self.get_element(id).and_then(|e| e.id.clone()) {
                if self.id_map.get(elem_id.as_ref()) == Some(&id) {
                    self.id_map.remove(elem_id.as_ref());
                }
            }
        }

        to_remove.retain(|&id| self.nodes.remove(id).is_some());
        to_remove
    }

    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes.get(node).and_then(|n| n.parent)
    }

    pub fn first_child(&self, node: NodeId) -> Option<NodeId> {
        self.nodes.get(node).and_then(|n| n.children.first().copied())
    }

    pub fn last_child(&self, node: NodeId) -> Option<NodeId> {
        self.nodes.get(node).and_then(|n| n.last_child())
    }

    pub fn next_sibling(&self, node: NodeId) -> Option<NodeId> {
        self.nodes.get(node).and_then(|n| n.next_sibling)
    }

    pub fn children(&self, node: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes
            .get(node)
            .into_iter()
            .flat_map(|n| n.children.iter().copied())
    }

    /// Get ancestors, nearest first.
    pub fn ancestors(&self, node: NodeId) -> AncestorIterator<'_> {
        AncestorIterator {
            tree: self,
            current: self.parent(node),
        }
    }

    /// Get descendants (pre-order), excluding `node` itself.
    pub fn descendants(&self, node: NodeId) -> DescendantIterator<'_> {
        let mut stack = Vec::new();
        if let Some(n) = self.nodes.get(node) {
            stack.extend(n.children.iter().rev().copied());
        }
        DescendantIterator { tree: self, stack }
    }

    /// Find an attached element by ID.
    pub fn find_element_by_id(&self, id: &str) -> Option<NodeId> {
        self.id_map.get(id).copied()
    }

    pub fn find_elements_by_tag_name(&self, tag_name: &str) -> Vec<NodeId> {
        self.query_selector_all_within(self.root, tag_name)
    }

    pub fn find_elements_by_class_name(&self, class_name: &str) -> Vec<NodeId> {
        let classes: Vec<&str> = class_name.split_whitespace().collect();
        if classes.is_empty() {
            return Vec::new();
        }

        self.descendants(self.root)
            .filter(|&id| {
                self.get_element(id)
                    .map(|e| classes.iter().all(|c| e.has_class(c)))
                    .unwrap_or(false)
            })
            .collect()
    }

    /// Find a direct child by tag name.
    pub fn find_child_by_tag(&self, parent: NodeId, tag_name: &str) -> Option<NodeId> {
        let tag_lower = tag_name.to_ascii_lowercase();
        self.children(parent).find(|&id| {
            self.get_element(id)
                .map(|e| e.tag_name.as_str() == tag_lower)
                .unwrap_or(false)
        })
    }

    pub fn query_selector(&self, selector: &str) -> Option<NodeId> {
        self.query_selector_all(selector).into_iter().next()
    }

    pub fn query_selector_all(&self, selector: &str) -> Vec<NodeId> {
        self.query_selector_all_within(self.root, selector)
    }

    /// Query selector all below `scope`, which may be a detached subtree.
    ///
    /// Supports `tag`, `.class`, `#id`, `tag.class` and `*`.
    pub fn query_selector_all_within(&self, scope: NodeId, selector: &str) -> Vec<NodeId> {
        let selector = selector.trim();

        let (tag, class, id) = if let Some(id) = selector.strip_prefix('#') {
            (None, None, Some(id))
        } else if let Some(class) = selector.strip_prefix('.') {
            (None, Some(class), None)
        } else if let Some((tag, class)) = selector.split_once('.') {
            (Some(tag), Some(class), None)
        } else if selector == "*" {
            (None, None, None)
        } else {
            (Some(selector), None, None)
        };

        self.descendants(scope)
            .filter(|&node| {
                let Some(elem) = self.get_element(node) else {
                    return false;
                };
                tag.map(|t| elem.tag_name == t).unwrap_or(true)
                    && class.map(|c| elem.has_class(c)).unwrap_or(true)
                    && id.map(|i| elem.id.as_deref() == Some(i)).unwrap_or(true)
            })
            .collect()
    }

    /// Replace the children of `node` with a single text node.
    pub fn set_text_content(&mut self, node: NodeId, text: &str) {
        match self.nodes.get_mut(node).map(|n| &mut n.data) {
            Some(NodeData::Text { content }) => {
                *content = text.to_string();
                return;
            }
            Some(_) => {}
            None => return,
        }

        let children: Vec<NodeId> = self.children(node).collect();
        for child in children {
            self.remove(child);
        }
        let text_node = self.create_text(text.to_string());
        self.append_child(node, text_node);
    }

    /// Get text content of a node and its descendants.
    pub fn get_text_content(&self, node: NodeId) -> String {
        let mut result = String::new();
        self.collect_text_content(node, &mut result);
        result
    }

    fn collect_text_content(&self, node: NodeId, result: &mut String) {
        if let Some(node_data) = self.nodes.get(node) {
            match &node_data.data {
                NodeData::Text { content } => result.push_str(content),
                NodeData::Element(_) | NodeData::Document => {
                    for &child in &node_data.children {
                        self.collect_text_content(child, result);
                    }
                }
            }
        }
    }

    fn update_id_map(&mut self, node: NodeId) {
        let mut pending = vec![node];
        while let Some(current) = pending.pop() {
            if let Some(n) = self.nodes.get(current) {
                if let Some(id) = n.as_element().and_then(|e| e.id.clone()) {
                    self.id_map.insert(id.to_string(), current);
                }
                pending.extend(n.children.iter().copied());
            }
        }
    }

    /// Get total number of nodes, including detached ones.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if tree is empty (only root).
    pub fn is_empty(&self) -> bool {
        self.nodes.len() <= 1
    }
}

impl Default for DomTree {
    fn default() -> Self {
        Self::new()
    }
}

/// Iterator over ancestor nodes.
pub struct AncestorIterator<'a> {
    tree: &'a DomTree,
    current: Option<NodeId>,
}

impl<'a> Iterator for AncestorIterator<'a> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.current?;
        self.current = self.tree.parent(current);
        Some(current)
    }
}

/// Iterator over descendant nodes (pre-order traversal).
pub struct DescendantIterator<'a> {
    tree: &'a DomTree,
    stack: Vec<NodeId>,
}

impl<'a> Iterator for DescendantIterator<'a> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.stack.pop()?;

        if let Some(node) = self.tree.nodes.get(current) {
            self.stack.extend(node.children.iter().rev().copied());
        }

        Some(current)
    }
}

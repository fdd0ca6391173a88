//! DOM nodes.

use crate::element::ElementData;
use slotmap::new_key_type;
use smallvec::SmallVec;

new_key_type! {
    /// Unique identifier for a DOM node.
    ///
    /// Keys are generational: a removed node's id never resolves to a later node,
    /// so tables keyed by `NodeId` do not keep nodes alive.
    pub struct NodeId;
}

/// Type of DOM node.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NodeType {
    Element = 1,
    Text = 3,
    Document = 9,
}

#[derive(Clone, Debug)]
pub enum NodeData {
    Document,
    Element(ElementData),
    Text { content: String },
}

/// A DOM node and its links.
#[derive(Clone, Debug)]
pub struct Node {
    pub id: NodeId,
    pub node_type: NodeType,
    pub data: NodeData,
    pub parent: Option<NodeId>,
    pub children: SmallVec<[NodeId; 8]>,
    pub prev_sibling: Option<NodeId>,
    pub next_sibling: Option<NodeId>,
}

impl Node {
    fn with_data(id: NodeId, node_type: NodeType, data: NodeData) -> Self {
        Self {
            id,
            node_type,
            data,
            parent: None,
            children: SmallVec::new(),
            prev_sibling: None,
            next_sibling: None,
        }
    }

    pub fn new_document(id: NodeId) -> Self {
        Self::with_data(id, NodeType::Document, NodeData::Document)
    }

    pub fn new_element(id: NodeId, data: ElementData) -> Self {
        Self::with_data(id, NodeType::Element, NodeData::Element(data))
    }

    pub fn new_text(id: NodeId, content: String) -> Self {
        Self::with_data(id, NodeType::Text, NodeData::Text { content })
    }

    pub fn as_element(&self) -> Option<&ElementData> {
        match &self.data {
            NodeData::Element(data) => Some(data),
            _ => None,
        }
    }

    pub fn as_element_mut(&mut self) -> Option<&mut ElementData> {
        match &mut self.data {
            NodeData::Element(data) => Some(data),
            _ => None,
        }
    }

    #[inline]
    pub fn last_child(&self) -> Option<NodeId> {
        self.children.last().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::TagName;
    use slotmap::SlotMap;

    #[test]
    fn test_node_constructors() {
        let mut nodes: SlotMap<NodeId, Node> = SlotMap::with_key();
        let video = nodes.insert_with_key(|id| Node::new_element(id, ElementData::new(TagName::new("video"))));
        let label = nodes.insert_with_key(|id| Node::new_text(id, "Clocks".to_string()));

        assert_eq!(nodes[video].node_type, NodeType::Element);
        assert!(nodes[video].as_element().is_some_and(|e| e.is_media()));
        assert!(nodes[label].as_element().is_none());
        assert_eq!(nodes[label].id, label);
    }
}

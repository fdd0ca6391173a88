//! DOM (Document Object Model) implementation.
//!
//! This crate provides the in-memory DOM tree the site components build into,
//! together with event dispatch and an HTML serializer for dumping trees.

pub mod node;
pub mod document;
pub mod element;
pub mod tree;
pub mod events;
pub mod attributes;
pub mod serializer;

pub use node::{Node, NodeId, NodeType, NodeData};
pub use document::Document;
pub use element::{ElementData, TagName};
pub use tree::DomTree;
pub use events::{Event, EventCallback, EventListenerOptions, EventManager, EventPhase, EventType};
pub use attributes::AttributeMap;
pub use serializer::{serialize_document, serialize_node, SerializeOptions};

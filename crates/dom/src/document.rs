//! DOM Document implementation.

use crate::element::{ElementData, TagName};
use crate::events::{Event, EventCallback, EventListenerOptions, EventManager, EventType};
use crate::node::NodeId;
use crate::tree::DomTree;
use url::Url;

/// Document ready state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReadyState {
    Loading,
    Interactive,
    Complete,
}

impl ReadyState {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReadyState::Loading => "loading",
            ReadyState::Interactive => "interactive",
            ReadyState::Complete => "complete",
        }
    }
}

/// DOM Document with an `<html><head></head><body></body></html>` skeleton.
pub struct Document {
    /// The DOM tree.
    pub tree: DomTree,
    /// Listeners attached to nodes of this document.
    pub events: EventManager,
    /// Document URL.
    pub url: Url,
    /// Document title.
    pub title: String,
    pub ready_state: ReadyState,
    document_element: NodeId,
    head: NodeId,
    body: NodeId,
}

impl Document {
    pub fn new(url: Url) -> Self {
        let mut tree = DomTree::new();
        let root = tree.root();

        let html = tree.create_element(ElementData::new(TagName::new("html")));
        let head = tree.create_element(ElementData::new(TagName::new("head")));
        let body = tree.create_element(ElementData::new(TagName::new("body")));
        tree.append_child(root, html);
        tree.append_child(html, head);
        tree.append_child(html, body);

        Self {
            tree,
            events: EventManager::new(),
            url,
            title: String::new(),
            ready_state: ReadyState::Loading,
            document_element: html,
            head,
            body,
        }
    }

    /// Create a blank document.
    pub fn blank() -> Self {
        Self::new(Url::parse("about:blank").expect("about:blank is a valid URL"))
    }

    pub fn document_element(&self) -> NodeId {
        self.document_element
    }

    pub fn head(&self) -> NodeId {
        self.head
    }

    pub fn body(&self) -> NodeId {
        self.body
    }

    /// Create a detached element.
    pub fn create_element(&mut self, tag_name: &str) -> NodeId {
        self.tree.create_element(ElementData::new(TagName::new(tag_name)))
    }

    /// Create a detached element with a `class` attribute.
    pub fn create_element_with_class(&mut self, tag_name: &str, class_name: &str) -> NodeId {
        let mut data = ElementData::new(TagName::new(tag_name));
        if !class_name.trim().is_empty() {
            data.set_attribute("class", class_name.trim());
        }
        self.tree.create_element(data)
    }

    pub fn create_text_node(&mut self, content: &str) -> NodeId {
        self.tree.create_text(content.to_string())
    }

    pub fn set_attribute(&mut self, node: NodeId, name: &str, value: &str) {
        if let Some(elem) = self.tree.get_element_mut(node) {
            elem.set_attribute(name, value);
        }
    }

    pub fn get_attribute(&self, node: NodeId, name: &str) -> Option<&str> {
        self.tree.get_element(node).and_then(|e| e.get_attribute(name))
    }

    pub fn has_class(&self, node: NodeId, class: &str) -> bool {
        self.tree.get_element(node).map(|e| e.has_class(class)).unwrap_or(false)
    }

    /// Add or remove `class` on `node`.
    pub fn set_class(&mut self, node: NodeId, class: &str, present: bool) {
        if let Some(elem) = self.tree.get_element_mut(node) {
            if present {
                elem.add_class(class);
            } else {
                elem.remove_class(class);
            }
        }
    }

    pub fn set_text_content(&mut self, node: NodeId, text: &str) {
        self.tree.set_text_content(node, text);
    }

    pub fn text_content(&self, node: NodeId) -> String {
        self.tree.get_text_content(node)
    }

    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        self.tree.append_child(parent, child);
    }

    pub fn append_to_head(&mut self, node: NodeId) {
        self.tree.append_child(self.head, node);
    }

    pub fn append_to_body(&mut self, node: NodeId) {
        self.tree.append_child(self.body, node);
    }

    /// Insert `node` as the first child of body.
    pub fn prepend_to_body(&mut self, node: NodeId) {
        self.tree.prepend_child(self.body, node);
    }

    /// Remove a node and its subtree, dropping the listeners attached to it.
    pub fn remove_node(&mut self, node: NodeId) -> Vec<NodeId> {
        let removed = self.tree.remove(node);
        for &id in &removed {
            self.events.remove_all(id);
        }
        removed
    }

    pub fn get_element_by_id(&self, id: &str) -> Option<NodeId> {
        self.tree.find_element_by_id(id)
    }

    pub fn get_elements_by_tag_name(&self, tag_name: &str) -> Vec<NodeId> {
        self.tree.find_elements_by_tag_name(tag_name)
    }

    pub fn get_elements_by_class_name(&self, class_name: &str) -> Vec<NodeId> {
        self.tree.find_elements_by_class_name(class_name)
    }

    pub fn query_selector(&self, selector: &str) -> Option<NodeId> {
        self.tree.query_selector(selector)
    }

    pub fn query_selector_all(&self, selector: &str) -> Vec<NodeId> {
        self.tree.query_selector_all(selector)
    }

    /// Set the document title, creating `<title>` in head when missing.
    pub fn set_title(&mut self, title: &str) {
        self.title = title.to_string();
        let title_elem = match self.tree.find_child_by_tag(self.head, "title") {
            Some(existing) => existing,
            None => {
                let created = self.create_element("title");
                self.append_to_head(created);
                created
            }
        };
        self.tree.set_text_content(title_elem, title);
    }

    /// Resolve a URL relative to the document.
    pub fn resolve_url(&self, url: &str) -> Result<Url, url::ParseError> {
        self.url.join(url)
    }

    pub fn add_event_listener(&mut self, node: NodeId, event_type: EventType, callback: EventCallback) {
        self.events
            .add_listener(node, &event_type, callback, EventListenerOptions::default());
    }

    pub fn remove_event_listener(&mut self, node: NodeId, event_type: &EventType, callback: &EventCallback) {
        self.events.remove_listener(node, event_type, callback);
    }

    /// Dispatch `event` at `target` through its ancestor path.
    ///
    /// Returns `false` when a listener prevented the default action.
    pub fn dispatch_event(&mut self, target: NodeId, event: &mut Event) -> bool {
        if !self.tree.contains(target) {
            return true;
        }
        let path: Vec<NodeId> = std::iter::once(target)
            .chain(self.tree.ancestors(target))
            .collect();
        self.events.dispatch(target, event, &path)
    }

    /// Mark document as completely loaded.
    pub fn finish_loading(&mut self) {
        self.ready_state = ReadyState::Complete;
    }
}

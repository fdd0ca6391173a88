//! Interaction handler sets and the per-video registry.

use common::{SiteError, SiteResult};
use dom::{DomTree, EventCallback, EventType, NodeId};
use indexmap::IndexMap;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Input a video preview reacts to, bound on the enclosing card.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum InteractionKind {
    PointerEnter,
    PointerLeave,
    TouchStart,
    TouchEnd,
    TouchCancel,
}

impl InteractionKind {
    /// DOM event that drives this interaction.
    pub fn event_type(&self) -> EventType {
        match self {
            InteractionKind::PointerEnter => EventType::MouseEnter,
            InteractionKind::PointerLeave => EventType::MouseLeave,
            InteractionKind::TouchStart => EventType::TouchStart,
            InteractionKind::TouchEnd => EventType::TouchEnd,
            InteractionKind::TouchCancel => EventType::TouchCancel,
        }
    }
}

/// Receives `true` when the video becomes visible, `false` when it leaves.
pub type VisibilityCallback = Arc<dyn Fn(bool) + Send + Sync>;

/// Visibility subscription for a video node.
#[derive(Clone)]
pub struct VisibilityHandler {
    pub threshold: f64,
    pub callback: VisibilityCallback,
}

impl fmt::Debug for VisibilityHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VisibilityHandler")
            .field("threshold", &self.threshold)
            .finish_non_exhaustive()
    }
}

/// Callbacks a video controller exposes to the card that hosts it.
#[derive(Clone, Default)]
pub struct InteractionHandlerSet {
    handlers: IndexMap<InteractionKind, EventCallback>,
    visibility: Option<VisibilityHandler>,
}

impl InteractionHandlerSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a handler, replacing any previous one of the same kind.
    pub fn with_handler(mut self, kind: InteractionKind, callback: EventCallback) -> Self {
        self.handlers.insert(kind, callback);
        self
    }

    pub fn with_visibility(mut self, threshold: f64, callback: VisibilityCallback) -> Self {
        self.visibility = Some(VisibilityHandler { threshold, callback });
        self
    }

    pub fn get(&self, kind: InteractionKind) -> Option<&EventCallback> {
        self.handlers.get(&kind)
    }

    pub fn contains(&self, kind: InteractionKind) -> bool {
        self.handlers.contains_key(&kind)
    }

    /// Handlers in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (InteractionKind, &EventCallback)> {
        self.handlers.iter().map(|(kind, cb)| (*kind, cb))
    }

    pub fn visibility(&self) -> Option<&VisibilityHandler> {
        self.visibility.as_ref()
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty() && self.visibility.is_none()
    }
}

impl fmt::Debug for InteractionHandlerSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InteractionHandlerSet")
            .field("kinds", &self.handlers.keys().collect::<Vec<_>>())
            .field("visibility", &self.visibility)
            .finish()
    }
}

/// Handler sets keyed by video node.
///
/// Keys are slotmap ids, so an entry never keeps its node alive; entries for
/// removed nodes are dropped by [`MediaHandlerRegistry::prune`].
#[derive(Debug, Default)]
pub struct MediaHandlerRegistry {
    entries: HashMap<NodeId, InteractionHandlerSet>,
}

impl MediaHandlerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the handler set for `node`. A node is registered at most once.
    pub fn register(&mut self, node: NodeId, handlers: InteractionHandlerSet) -> SiteResult<()> {
        if self.entries.contains_key(&node) {
            return Err(SiteError::invalid(format!(
                "interaction handlers already registered for {node:?}"
            )));
        }
        self.entries.insert(node, handlers);
        Ok(())
    }

    pub fn get(&self, node: NodeId) -> Option<&InteractionHandlerSet> {
        self.entries.get(&node)
    }

    pub fn contains(&self, node: NodeId) -> bool {
        self.entries.contains_key(&node)
    }

    pub fn remove(&mut self, node: NodeId) -> Option<InteractionHandlerSet> {
        self.entries.remove(&node)
    }

    /// Drop entries whose node is no longer in `tree`. Returns the removed ids.
    pub fn prune(&mut self, tree: &DomTree) -> Vec<NodeId> {
        let stale: Vec<NodeId> = self
            .entries
            .keys()
            .copied()
            .filter(|id| !tree.contains(*id))
            .collect();
        for id in &stale {
            self.entries.remove(id);
        }
        stale
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dom::{Document, Event};

    fn noop() -> EventCallback {
        Arc::new(|_: &mut Event| {})
    }

    #[test]
    fn test_handler_set_order_and_replace() {
        let set = InteractionHandlerSet::new()
            .with_handler(InteractionKind::TouchStart, noop())
            .with_handler(InteractionKind::TouchEnd, noop())
            .with_handler(InteractionKind::TouchStart, noop())
            .with_visibility(0.5, Arc::new(|_| {}));

        let kinds: Vec<_> = set.iter().map(|(kind, _)| kind).collect();
        assert_eq!(kinds, vec![InteractionKind::TouchStart, InteractionKind::TouchEnd]);
        assert_eq!(set.visibility().map(|v| v.threshold), Some(0.5));
        assert!(!set.contains(InteractionKind::PointerEnter));
    }

    #[test]
    fn test_event_types() {
        assert_eq!(InteractionKind::PointerEnter.event_type(), EventType::MouseEnter);
        assert_eq!(InteractionKind::TouchCancel.event_type(), EventType::TouchCancel);
    }

    #[test]
    fn test_registry_rejects_second_registration() {
        let mut doc = Document::blank();
        let video = doc.create_element("video");
        let mut registry = MediaHandlerRegistry::new();

        registry.register(video, InteractionHandlerSet::new()).unwrap();
        let err = registry.register(video, InteractionHandlerSet::new()).unwrap_err();
        assert!(matches!(err, SiteError::InvalidInput(_)));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_registry_prune_removed_nodes() {
        let mut doc = Document::blank();
        let kept = doc.create_element("video");
        let gone = doc.create_element("video");
        doc.append_to_body(kept);
        doc.append_to_body(gone);

        let mut registry = MediaHandlerRegistry::new();
        registry.register(kept, InteractionHandlerSet::new()).unwrap();
        registry.register(gone, InteractionHandlerSet::new()).unwrap();

        doc.remove_node(gone);
        assert_eq!(registry.prune(&doc.tree), vec![gone]);
        assert!(registry.contains(kept));
        assert!(!registry.contains(gone));
    }
}

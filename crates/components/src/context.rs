//! Render context shared by the component builders.

use dom::{Document, NodeId};
use media::{InteractionHandlerSet, MediaResolver, VisibilityHandler};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;
use web_apis::{IntersectionObserverController, IntersectionObserverEntry, ObserverId};

/// Document under construction plus the services its media depends on.
pub struct RenderContext {
    pub doc: Document,
    pub media: MediaResolver,
    pub observers: IntersectionObserverController,
    visibility: HashMap<NodeId, ObserverId>,
    /// Video → host its pointer and touch handlers are bound on.
    hosts: HashMap<NodeId, (NodeId, InteractionHandlerSet)>,
}

impl RenderContext {
    pub fn new(doc: Document, media: MediaResolver) -> Self {
        Self {
            doc,
            media,
            observers: IntersectionObserverController::new(),
            visibility: HashMap::new(),
            hosts: HashMap::new(),
        }
    }

    /// Bind a video's pointer and touch handlers on `host` and observe `video`.
    pub fn bind_interactions(&mut self, host: NodeId, video: NodeId, handlers: &InteractionHandlerSet) {
        self.unbind_host(video);
        for (kind, callback) in handlers.iter() {
            self.doc.add_event_listener(host, kind.event_type(), callback.clone());
        }
        self.hosts.insert(video, (host, handlers.clone()));
        if let Some(visibility) = handlers.visibility() {
            self.observe_visibility(video, visibility);
        }
    }

    fn observe_visibility(&mut self, video: NodeId, handler: &VisibilityHandler) {
        let callback = handler.callback.clone();
        let observer = self.observers.create_observer(
            handler.threshold,
            Arc::new(move |entry: &IntersectionObserverEntry| callback(entry.is_intersecting)),
        );
        self.observers.observe(observer, video);
        if let Some(previous) = self.visibility.insert(video, observer) {
            self.observers.disconnect(previous);
        }
        debug!(video = ?video, threshold = handler.threshold, "observing video visibility");
    }

    /// Detach a video's handlers from its host, if the host is still in the tree.
    fn unbind_host(&mut self, video: NodeId) {
        let Some((host, handlers)) = self.hosts.remove(&video) else {
            return;
        };
        if self.doc.tree.contains(host) {
            for (kind, callback) in handlers.iter() {
                self.doc.remove_event_listener(host, &kind.event_type(), callback);
            }
            debug!(video = ?video, host = ?host, "interaction handlers unbound");
        }
    }

    pub fn is_observed(&self, video: NodeId) -> bool {
        self.visibility.contains_key(&video)
    }

    /// Report whether `video` is in view. Returns the number of callbacks run.
    pub fn notify_visibility(&mut self, video: NodeId, is_intersecting: bool) -> usize {
        self.observers.notify(video, is_intersecting)
    }

    /// Remove a subtree and release observers and controllers of videos inside it.
    pub fn remove_node(&mut self, node: NodeId) -> Vec<NodeId> {
        let removed = self.doc.remove_node(node);
        for id in &removed {
            if let Some(observer) = self.visibility.remove(id) {
                self.observers.disconnect(observer);
            }
            self.unbind_host(*id);
        }
        let released = self.media.prune(&self.doc.tree);
        debug!(removed = removed.len(), released, "subtree removed");
        removed
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use media::VideoConfig;
    use web_apis::{Navigator, TimerQueue};

    pub(crate) fn context(touch: bool) -> (RenderContext, Arc<TimerQueue>) {
        let navigator = if touch { Navigator::touch() } else { Navigator::desktop() };
        let queue = Arc::new(TimerQueue::new());
        let resolver = MediaResolver::new(&navigator, queue.clone(), VideoConfig::default());
        (RenderContext::new(Document::blank(), resolver), queue)
    }
}

//! DOM Events implementation.

use crate::node::NodeId;
use std::collections::HashMap;
use std::sync::Arc;

/// Events the site's components listen for.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum EventType {
    Click,
    MouseEnter,
    MouseLeave,
    KeyDown,
    TouchStart,
    TouchEnd,
    TouchCancel,
    /// Media playback reached the end.
    Ended,
    Custom(String),
}

impl EventType {
    pub fn as_str(&self) -> &str {
        match self {
            EventType::Click => "click",
            EventType::MouseEnter => "mouseenter",
            EventType::MouseLeave => "mouseleave",
            EventType::KeyDown => "keydown",
            EventType::TouchStart => "touchstart",
            EventType::TouchEnd => "touchend",
            EventType::TouchCancel => "touchcancel",
            EventType::Ended => "ended",
            EventType::Custom(s) => s,
        }
    }

    /// Pointer boundary and media events neither bubble nor cancel.
    fn is_target_only(&self) -> bool {
        matches!(self, EventType::MouseEnter | EventType::MouseLeave | EventType::Ended)
    }
}

/// Event phase.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EventPhase {
    None,
    Capturing,
    AtTarget,
    Bubbling,
}

/// A dispatched event. Listeners receive it mutably to stop propagation or
/// prevent the default action.
#[derive(Clone, Debug)]
pub struct Event {
    pub event_type: EventType,
    pub target: Option<NodeId>,
    /// Node whose listeners are running.
    pub current_target: Option<NodeId>,
    pub phase: EventPhase,
    pub bubbles: bool,
    pub cancelable: bool,
    pub default_prevented: bool,
    pub propagation_stopped: bool,
    /// Key name for keyboard events.
    pub key: Option<String>,
}

impl Event {
    pub fn new(event_type: EventType) -> Self {
        let target_only = event_type.is_target_only();
        Self {
            event_type,
            target: None,
            current_target: None,
            phase: EventPhase::None,
            bubbles: !target_only,
            cancelable: !target_only,
            default_prevented: false,
            propagation_stopped: false,
            key: None,
        }
    }

    /// Create a keydown event for `key`.
    pub fn key_down(key: &str) -> Self {
        Self {
            key: Some(key.to_string()),
            ..Self::new(EventType::KeyDown)
        }
    }

    /// No effect on events that are not cancelable.
    pub fn prevent_default(&mut self) {
        if self.cancelable {
            self.default_prevented = true;
        }
    }

    pub fn stop_propagation(&mut self) {
        self.propagation_stopped = true;
    }
}

/// Event listener callback type.
pub type EventCallback = Arc<dyn Fn(&mut Event) + Send + Sync>;

/// Event listener options.
#[derive(Clone, Debug, Default)]
pub struct EventListenerOptions {
    pub capture: bool,
    pub once: bool,
}

/// Event listener.
#[derive(Clone)]
pub struct EventListener {
    pub callback: EventCallback,
    pub options: EventListenerOptions,
}

/// Event manager holding listeners per node.
pub struct EventManager {
    listeners: HashMap<NodeId, HashMap<EventType, Vec<EventListener>>>,
}

impl EventManager {
    pub fn new() -> Self {
        Self {
            listeners: HashMap::new(),
        }
    }

    /// Add event listener for a node.
    pub fn add_listener(
        &mut self,
        node: NodeId,
        event_type: &EventType,
        callback: EventCallback,
        options: EventListenerOptions,
    ) {
        self.listeners
            .entry(node)
            .or_default()
            .entry(event_type.clone())
            .or_default()
            .push(EventListener { callback, options });
    }

    /// Remove the listener registered with `callback`, matched by identity.
    pub fn remove_listener(&mut self, node: NodeId, event_type: &EventType, callback: &EventCallback) {
        if let Some(type_listeners) = self.listeners.get_mut(&node).and_then(|n| n.get_mut(event_type)) {
            type_listeners.retain(|l| !Arc::ptr_eq(&l.callback, callback));
        }
    }

    /// Count listeners for a node and event type.
    pub fn listener_count(&self, node: NodeId, event_type: &EventType) -> usize {
        self.listeners
            .get(&node)
            .and_then(|n| n.get(event_type))
            .map(|l| l.len())
            .unwrap_or(0)
    }

    /// Dispatch event to target.
    ///
    /// `path` is the target followed by its ancestors, nearest first.
    /// Returns `false` when a listener prevented the default action.
    pub fn dispatch(&mut self, target: NodeId, event: &mut Event, path: &[NodeId]) -> bool {
        event.target = Some(target);
        let ancestors = path.get(1..).unwrap_or_default();

        event.phase = EventPhase::Capturing;
        for &node in ancestors.iter().rev() {
            event.current_target = Some(node);
            self.invoke_listeners(node, event, true);
            if event.propagation_stopped {
                return self.finish(event);
            }
        }

        event.phase = EventPhase::AtTarget;
        event.current_target = Some(target);
        self.invoke_listeners(target, event, false);
        if event.propagation_stopped {
            return self.finish(event);
        }

        if event.bubbles {
            event.phase = EventPhase::Bubbling;
            for &node in ancestors {
                event.current_target = Some(node);
                self.invoke_listeners(node, event, false);
                if event.propagation_stopped {
                    break;
                }
            }
        }

        self.finish(event)
    }

    fn finish(&self, event: &mut Event) -> bool {
        event.phase = EventPhase::None;
        event.current_target = None;
        !event.default_prevented
    }

    fn invoke_listeners(&mut self, node: NodeId, event: &mut Event, capture: bool) {
        let event_type = event.event_type.clone();
        let at_target = event.phase == EventPhase::AtTarget;
        let selected = |l: &EventListener| at_target || l.options.capture == capture;

        // Snapshot so callbacks run without borrowing the listener table.
        let matching: Vec<EventCallback> = match self.listeners.get(&node).and_then(|n| n.get(&event_type)) {
            Some(type_listeners) => type_listeners
                .iter()
                .filter(|l| selected(*l))
                .map(|l| l.callback.clone())
                .collect(),
            None => return,
        };

        for callback in matching {
            callback(event);
        }

        if let Some(type_listeners) = self
            .listeners
            .get_mut(&node)
            .and_then(|n| n.get_mut(&event_type))
        {
            type_listeners.retain(|l| !(l.options.once && selected(l)));
        }
    }

    /// Remove all listeners for a node.
    pub fn remove_all(&mut self, node: NodeId) {
        self.listeners.remove(&node);
    }
}

impl Default for EventManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use slotmap::SlotMap;

    fn ids(count: usize) -> Vec<NodeId> {
        let mut map: SlotMap<NodeId, ()> = SlotMap::with_key();
        (0..count).map(|_| map.insert(())).collect()
    }

    #[test]
    fn test_event_defaults() {
        let touch = Event::new(EventType::TouchEnd);
        assert!(touch.bubbles);
        assert!(touch.cancelable);

        let enter = Event::new(EventType::MouseEnter);
        assert!(!enter.bubbles);
        assert!(!enter.cancelable);
    }

    #[test]
    fn test_prevent_default() {
        let mut event = Event::new(EventType::Click);
        event.prevent_default();
        assert!(event.default_prevented);

        let mut ended = Event::new(EventType::Ended);
        ended.prevent_default();
        assert!(!ended.default_prevented);
    }

    #[test]
    fn test_key_down_carries_key() {
        let event = Event::key_down("Escape");
        assert_eq!(event.event_type, EventType::KeyDown);
        assert_eq!(event.key.as_deref(), Some("Escape"));
    }

    #[test]
    fn test_dispatch_order_and_bubbling() {
        let nodes = ids(3);
        let (link, card, video) = (nodes[0], nodes[1], nodes[2]);
        let seen = Arc::new(Mutex::new(Vec::new()));
        let mut manager = EventManager::new();

        for (node, name) in [(link, "link"), (card, "card"), (video, "video")] {
            let seen = seen.clone();
            manager.add_listener(
                node,
                &EventType::TouchEnd,
                Arc::new(move |_: &mut Event| seen.lock().push(name)),
                EventListenerOptions::default(),
            );
        }

        let mut event = Event::new(EventType::TouchEnd);
        assert!(manager.dispatch(video, &mut event, &[video, card, link]));
        assert_eq!(*seen.lock(), vec!["video", "card", "link"]);
    }

    #[test]
    fn test_non_bubbling_event_stays_at_target() {
        let nodes = ids(2);
        let (card, link) = (nodes[0], nodes[1]);
        let hits = Arc::new(Mutex::new(0));
        let mut manager = EventManager::new();

        let counter = hits.clone();
        manager.add_listener(
            link,
            &EventType::MouseEnter,
            Arc::new(move |_: &mut Event| *counter.lock() += 1),
            EventListenerOptions::default(),
        );

        let mut event = Event::new(EventType::MouseEnter);
        manager.dispatch(card, &mut event, &[card, link]);
        assert_eq!(*hits.lock(), 0);
    }

    #[test]
    fn test_prevented_default_reported() {
        let nodes = ids(1);
        let mut manager = EventManager::new();
        manager.add_listener(
            nodes[0],
            &EventType::TouchEnd,
            Arc::new(|event: &mut Event| event.prevent_default()),
            EventListenerOptions::default(),
        );

        let mut event = Event::new(EventType::TouchEnd);
        assert!(!manager.dispatch(nodes[0], &mut event, &[nodes[0]]));
    }

    #[test]
    fn test_stop_propagation_skips_ancestors() {
        let nodes = ids(2);
        let (card, link) = (nodes[0], nodes[1]);
        let hits = Arc::new(Mutex::new(0));
        let mut manager = EventManager::new();

        manager.add_listener(
            card,
            &EventType::Click,
            Arc::new(|event: &mut Event| event.stop_propagation()),
            EventListenerOptions::default(),
        );
        let counter = hits.clone();
        manager.add_listener(
            link,
            &EventType::Click,
            Arc::new(move |_: &mut Event| *counter.lock() += 1),
            EventListenerOptions::default(),
        );

        let mut event = Event::new(EventType::Click);
        manager.dispatch(card, &mut event, &[card, link]);
        assert_eq!(*hits.lock(), 0);
    }

    #[test]
    fn test_once_listener_runs_once() {
        let nodes = ids(1);
        let hits = Arc::new(Mutex::new(0));
        let mut manager = EventManager::new();
        let counter = hits.clone();
        manager.add_listener(
            nodes[0],
            &EventType::Click,
            Arc::new(move |_: &mut Event| *counter.lock() += 1),
            EventListenerOptions { capture: false, once: true },
        );

        for _ in 0..2 {
            let mut event = Event::new(EventType::Click);
            manager.dispatch(nodes[0], &mut event, &[nodes[0]]);
        }
        assert_eq!(*hits.lock(), 1);
        assert_eq!(manager.listener_count(nodes[0], &EventType::Click), 0);
    }

    #[test]
    fn test_remove_listener_by_identity() {
        let nodes = ids(1);
        let mut manager = EventManager::new();
        let keep: EventCallback = Arc::new(|_: &mut Event| {});
        let dropped: EventCallback = Arc::new(|_: &mut Event| {});

        manager.add_listener(nodes[0], &EventType::MouseEnter, keep, EventListenerOptions::default());
        manager.add_listener(nodes[0], &EventType::MouseEnter, dropped.clone(), EventListenerOptions::default());
        manager.remove_listener(nodes[0], &EventType::MouseEnter, &dropped);
        manager.remove_listener(nodes[0], &EventType::Click, &dropped);

        assert_eq!(manager.listener_count(nodes[0], &EventType::MouseEnter), 1);
    }
}

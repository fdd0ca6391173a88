//! Intersection Observer API implementation.

use dom::NodeId;
use slotmap::{new_key_type, SlotMap};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::trace;

new_key_type! {
    /// Identifier of a registered observer.
    pub struct ObserverId;
}

/// Callback invoked once per entry whose visibility changed.
pub type IntersectionCallback = Arc<dyn Fn(&IntersectionObserverEntry) + Send + Sync>;

/// Intersection observer entry.
#[derive(Clone, Debug)]
pub struct IntersectionObserverEntry {
    pub target: NodeId,
    /// Fraction of the target inside the root, 0.0 to 1.0.
    pub intersection_ratio: f64,
    /// Whether the target is at or past the observer's threshold.
    pub is_intersecting: bool,
}

/// DOMRect for intersection calculations.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DOMRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl DOMRect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Calculate intersection with another rect.
    pub fn intersection(&self, other: &DOMRect) -> Option<DOMRect> {
        let left = self.x.max(other.x);
        let top = self.y.max(other.y);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());

        if left < right && top < bottom {
            Some(DOMRect::new(left, top, right - left, bottom - top))
        } else {
            None
        }
    }

    pub fn area(&self) -> f64 {
        self.width * self.height
    }
}

/// A single observer: one threshold, one callback, many targets.
struct IntersectionObserver {
    threshold: f64,
    callback: IntersectionCallback,
    /// Observed targets with their last reported state.
    targets: HashMap<NodeId, Option<bool>>,
}

/// Intersection observer controller.
pub struct IntersectionObserverController {
    observers: SlotMap<ObserverId, IntersectionObserver>,
}

impl IntersectionObserverController {
    pub fn new() -> Self {
        Self {
            observers: SlotMap::with_key(),
        }
    }

    /// Create and register an observer. The threshold is clamped to `0.0..=1.0`.
    pub fn create_observer(&mut self, threshold: f64, callback: IntersectionCallback) -> ObserverId {
        self.observers.insert(IntersectionObserver {
            threshold: threshold.clamp(0.0, 1.0),
            callback,
            targets: HashMap::new(),
        })
    }

    /// Start observing a target. Observing twice is a no-op.
    pub fn observe(&mut self, observer: ObserverId, target: NodeId) {
        if let Some(obs) = self.observers.get_mut(observer) {
            obs.targets.entry(target).or_insert(None);
        }
    }

    pub fn unobserve(&mut self, observer: ObserverId, target: NodeId) {
        if let Some(obs) = self.observers.get_mut(observer) {
            obs.targets.remove(&target);
        }
    }

    /// Stop observing all targets and drop the observer.
    pub fn disconnect(&mut self, observer: ObserverId) {
        self.observers.remove(observer);
    }

    /// Drop a target from every observer, e.g. after the node was removed.
    pub fn forget_target(&mut self, target: NodeId) {
        for obs in self.observers.values_mut() {
            obs.targets.remove(&target);
        }
    }

    pub fn is_observing(&self, target: NodeId) -> bool {
        self.observers.values().any(|o| o.targets.contains_key(&target))
    }

    pub fn threshold(&self, observer: ObserverId) -> Option<f64> {
        self.observers.get(observer).map(|o| o.threshold)
    }

    /// Report a target's visibility directly, as the runtime would.
    ///
    /// Every observer watching `target` receives the entry, whether or not the
    /// state changed. Returns the number of callbacks invoked.
    pub fn notify(&mut self, target: NodeId, is_intersecting: bool) -> usize {
        let mut pending = Vec::new();
        for obs in self.observers.values_mut() {
            if let Some(last) = obs.targets.get_mut(&target) {
                *last = Some(is_intersecting);
                let entry = IntersectionObserverEntry {
                    target,
                    intersection_ratio: if is_intersecting { 1.0 } else { 0.0 },
                    is_intersecting,
                };
                pending.push((obs.callback.clone(), entry));
            }
        }
        Self::deliver(pending)
    }

    /// Recompute visibility from layout rects (called on layout/scroll changes).
    ///
    /// Callbacks fire for the first observation of a target and afterwards only
    /// when it crosses the observer's threshold. Targets with no rect are skipped.
    pub fn process(&mut self, viewport: &DOMRect, elements: &HashMap<NodeId, DOMRect>) -> usize {
        let mut pending = Vec::new();

        for obs in self.observers.values_mut() {
            for (&target, last) in obs.targets.iter_mut() {
                let Some(target_rect) = elements.get(&target) else {
                    continue;
                };

                let entry = compute_entry(target, target_rect, viewport, obs.threshold);
                if *last != Some(entry.is_intersecting) {
                    *last = Some(entry.is_intersecting);
                    pending.push((obs.callback.clone(), entry));
                }
            }
        }

        Self::deliver(pending)
    }

    fn deliver(pending: Vec<(IntersectionCallback, IntersectionObserverEntry)>) -> usize {
        let count = pending.len();
        for (callback, entry) in pending {
            trace!(target = ?entry.target, intersecting = entry.is_intersecting, "intersection entry");
            callback(&entry);
        }
        count
    }
}

impl Default for IntersectionObserverController {
    fn default() -> Self {
        Self::new()
    }
}

fn compute_entry(
    target: NodeId,
    target_rect: &DOMRect,
    root_bounds: &DOMRect,
    threshold: f64,
) -> IntersectionObserverEntry {
    let intersection_ratio = match target_rect.intersection(root_bounds) {
        Some(int_rect) if target_rect.area() > 0.0 => int_rect.area() / target_rect.area(),
        _ => 0.0,
    };

    let is_intersecting = if threshold > 0.0 {
        intersection_ratio >= threshold
    } else {
        intersection_ratio > 0.0
    };

    IntersectionObserverEntry {
        target,
        intersection_ratio,
        is_intersecting,
    }
}

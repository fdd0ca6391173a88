//! Web APIs the site components rely on.
//!
//! This crate provides:
//! - Timer API (cancellable scheduled callbacks over a virtual clock)
//! - Intersection Observer API
//! - Navigator capability probe (touch support)

pub mod intersection_observer;
pub mod navigator;
pub mod timers;

pub use intersection_observer::{
    DOMRect, IntersectionCallback, IntersectionObserverController, IntersectionObserverEntry,
    ObserverId,
};
pub use navigator::Navigator;
pub use timers::{TimerApi, TimerCallback, TimerHandle, TimerQueue};

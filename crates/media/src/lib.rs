//! Media elements for the site's cards.
//!
//! This crate provides:
//! - Media resolution (image vs. video, by file extension)
//! - Video playback surface with an autoplay policy
//! - Hover and touch interaction controllers for video previews
//! - A non-owning registry of per-video interaction handlers

pub mod config;
pub mod handlers;
pub mod interaction;
pub mod media_element;
pub mod resolver;

pub use config::VideoConfig;
pub use handlers::{InteractionHandlerSet, InteractionKind, MediaHandlerRegistry, VisibilityCallback, VisibilityHandler};
pub use interaction::{HoverInteraction, InteractionMode, InteractionStrategy, TouchInteraction, VideoPlaybackState};
pub use media_element::{AutoplayPolicy, MediaElement, MediaError};
pub use resolver::{MediaDescriptor, MediaKind, MediaResolver, ResolvedMedia};

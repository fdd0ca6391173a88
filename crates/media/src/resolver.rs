//! Media resolution: turn a source URL into an image or video element.

use crate::config::VideoConfig;
use crate::handlers::{InteractionHandlerSet, MediaHandlerRegistry};
use crate::interaction::{create_strategy, InteractionMode, InteractionStrategy, VideoPlaybackState};
use crate::media_element::{AutoplayPolicy, MediaElement};
use common::{SiteError, SiteResult};
use dom::{Document, DomTree, Event, EventCallback, EventType, NodeId};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;
use web_apis::{Navigator, TimerApi};

const VIDEO_EXTENSIONS: &[&str] = &["mp4", "webm", "ogg", "mov"];
const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "svg", "webp"];

/// A media source and its accessible description.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MediaDescriptor {
    source_url: String,
    alt_text: String,
}

impl MediaDescriptor {
    /// Fails with `InvalidInput` when `source_url` is blank.
    pub fn new(source_url: &str, alt_text: &str) -> SiteResult<Self> {
        let source_url = source_url.trim();
        if source_url.is_empty() {
            return Err(SiteError::invalid("media source is required"));
        }
        Ok(Self {
            source_url: source_url.to_string(),
            alt_text: alt_text.to_string(),
        })
    }

    pub fn source_url(&self) -> &str {
        &self.source_url
    }

    pub fn alt_text(&self) -> &str {
        &self.alt_text
    }

    pub fn kind(&self) -> MediaKind {
        MediaKind::classify(&self.source_url)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MediaKind {
    Image,
    Video,
}

impl MediaKind {
    /// Classify by the text after the last `.`, case-insensitively.
    ///
    /// Unknown or missing extensions are treated as images.
    pub fn classify(url: &str) -> Self {
        let extension = match url.rsplit_once('.') {
            Some((_, ext)) => ext.to_ascii_lowercase(),
            None => return MediaKind::Image,
        };

        if VIDEO_EXTENSIONS.contains(&extension.as_str()) {
            MediaKind::Video
        } else {
            if !IMAGE_EXTENSIONS.contains(&extension.as_str()) {
                debug!(url, "unrecognized media extension, rendering as image");
            }
            MediaKind::Image
        }
    }
}

/// A freshly created, unattached media node.
#[derive(Debug)]
pub struct ResolvedMedia {
    pub node: NodeId,
    pub kind: MediaKind,
    /// Present for videos: handlers for the card that will host the node.
    pub handlers: Option<InteractionHandlerSet>,
}

/// Creates media nodes and owns the controllers of the videos it creates.
pub struct MediaResolver {
    mode: InteractionMode,
    timers: Arc<dyn TimerApi>,
    config: VideoConfig,
    autoplay: AutoplayPolicy,
    registry: MediaHandlerRegistry,
    controllers: HashMap<NodeId, Arc<dyn InteractionStrategy>>,
}

impl MediaResolver {
    /// The interaction mode is read from `navigator` once, here.
    pub fn new(navigator: &Navigator, timers: Arc<dyn TimerApi>, config: VideoConfig) -> Self {
        Self {
            mode: InteractionMode::detect(navigator),
            timers,
            config,
            autoplay: AutoplayPolicy::default(),
            registry: MediaHandlerRegistry::new(),
            controllers: HashMap::new(),
        }
    }

    pub fn with_autoplay_policy(mut self, policy: AutoplayPolicy) -> Self {
        self.autoplay = policy;
        self
    }

    pub fn mode(&self) -> InteractionMode {
        self.mode
    }

    pub fn config(&self) -> &VideoConfig {
        &self.config
    }

    pub fn registry(&self) -> &MediaHandlerRegistry {
        &self.registry
    }

    /// Validate `src` and resolve it.
    pub fn create_media(&mut self, doc: &mut Document, src: &str, alt: &str) -> SiteResult<ResolvedMedia> {
        let descriptor = MediaDescriptor::new(src, alt)?;
        self.resolve(doc, &descriptor)
    }

    /// Create the node for `descriptor`. The node is not attached to any parent.
    pub fn resolve(&mut self, doc: &mut Document, descriptor: &MediaDescriptor) -> SiteResult<ResolvedMedia> {
        match descriptor.kind() {
            MediaKind::Image => {
                let node = doc.create_element_with_class("img", "card-image");
                doc.set_attribute(node, "src", descriptor.source_url());
                doc.set_attribute(node, "alt", descriptor.alt_text());
                Ok(ResolvedMedia {
                    node,
                    kind: MediaKind::Image,
                    handlers: None,
                })
            }
            MediaKind::Video => self.create_video(doc, descriptor),
        }
    }

    fn create_video(&mut self, doc: &mut Document, descriptor: &MediaDescriptor) -> SiteResult<ResolvedMedia> {
        let node = doc.create_element_with_class("video", "card-image");
        doc.set_attribute(node, "src", descriptor.source_url());
        doc.set_attribute(node, "muted", "");
        doc.set_attribute(node, "playsinline", "");
        doc.set_attribute(node, "preload", "auto");
        if !descriptor.alt_text().is_empty() {
            doc.set_attribute(node, "aria-label", descriptor.alt_text());
        }

        let element = Arc::new(MediaElement::new(descriptor.source_url(), self.autoplay));
        let strategy = create_strategy(self.mode, node, element, self.timers.clone(), self.config.clone());
        let handlers = strategy.handlers();
        self.registry.register(node, handlers.clone())?;

        let on_ended = strategy.clone();
        let ended: EventCallback = Arc::new(move |_: &mut Event| on_ended.ended());
        doc.add_event_listener(node, EventType::Ended, ended);

        debug!(video = ?node, mode = ?self.mode, src = descriptor.source_url(), "video controller attached");
        self.controllers.insert(node, strategy);

        Ok(ResolvedMedia {
            node,
            kind: MediaKind::Video,
            handlers: Some(handlers),
        })
    }

    pub fn controller(&self, video: NodeId) -> Option<&Arc<dyn InteractionStrategy>> {
        self.controllers.get(&video)
    }

    pub fn element(&self, video: NodeId) -> Option<Arc<MediaElement>> {
        self.controllers.get(&video).map(|c| c.element().clone())
    }

    pub fn playback(&self, video: NodeId) -> Option<VideoPlaybackState> {
        self.controllers.get(&video).map(|c| c.state())
    }

    /// Number of videos with live controllers.
    pub fn video_count(&self) -> usize {
        self.controllers.len()
    }

    /// Drop controllers and handlers for videos no longer in `tree`.
    pub fn prune(&mut self, tree: &DomTree) -> usize {
        let stale = self.registry.prune(tree);
        for id in &stale {
            self.controllers.remove(id);
        }
        stale.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use web_apis::TimerQueue;

    fn resolver(navigator: &Navigator) -> (MediaResolver, Arc<TimerQueue>) {
        let queue = Arc::new(TimerQueue::new());
        let resolver = MediaResolver::new(navigator, queue.clone(), VideoConfig::default());
        (resolver, queue)
    }

    #[test]
    fn test_classify_extensions() {
        for ext in ["mp4", "webm", "ogg", "mov", "MP4", "WebM", "MOV"] {
            assert_eq!(MediaKind::classify(&format!("clip.{ext}")), MediaKind::Video, "{ext}");
        }
        for ext in ["jpg", "jpeg", "png", "gif", "svg", "webp", "PNG", "JpEg"] {
            assert_eq!(MediaKind::classify(&format!("art.{ext}")), MediaKind::Image, "{ext}");
        }
        assert_eq!(MediaKind::classify("images/no-extension"), MediaKind::Image);
        assert_eq!(MediaKind::classify("file.unknown"), MediaKind::Image);
        assert_eq!(MediaKind::classify("videos/a.b/clip.mp4"), MediaKind::Video);
    }

    #[test]
    fn test_descriptor_requires_source() {
        assert!(matches!(MediaDescriptor::new("", "alt"), Err(SiteError::InvalidInput(_))));
        assert!(matches!(MediaDescriptor::new("   ", "alt"), Err(SiteError::InvalidInput(_))));
        assert_eq!(MediaDescriptor::new(" a.png ", "").unwrap().source_url(), "a.png");
    }

    #[test]
    fn test_resolve_image() {
        let (mut resolver, _) = resolver(&Navigator::desktop());
        let mut doc = Document::blank();

        let media = resolver.create_media(&mut doc, "images/sunset.jpg", "Sunset").unwrap();
        assert_eq!(media.kind, MediaKind::Image);
        assert!(media.handlers.is_none());
        assert!(doc.has_class(media.node, "card-image"));
        assert_eq!(doc.get_attribute(media.node, "src"), Some("images/sunset.jpg"));
        assert_eq!(doc.get_attribute(media.node, "alt"), Some("Sunset"));
        assert_eq!(doc.tree.parent(media.node), None);
        assert_eq!(resolver.video_count(), 0);
    }

    #[test]
    fn test_resolve_video_attributes() {
        let (mut resolver, _) = resolver(&Navigator::desktop());
        let mut doc = Document::blank();

        let media = resolver.create_media(&mut doc, "videos/case.mp4", "Phone case").unwrap();
        assert_eq!(media.kind, MediaKind::Video);
        for attr in ["muted", "playsinline"] {
            assert_eq!(doc.get_attribute(media.node, attr), Some(""));
        }
        assert_eq!(doc.get_attribute(media.node, "preload"), Some("auto"));
        assert_eq!(doc.get_attribute(media.node, "aria-label"), Some("Phone case"));
        assert!(resolver.registry().contains(media.node));
        assert_eq!(doc.events.listener_count(media.node, &EventType::Ended), 1);

        let unlabeled = resolver.create_media(&mut doc, "videos/b.webm", "").unwrap();
        assert_eq!(doc.get_attribute(unlabeled.node, "aria-label"), None);
    }

    #[test]
    fn test_mode_follows_navigator() {
        let (mut hover, _) = resolver(&Navigator::desktop());
        let (mut touch, _) = resolver(&Navigator::touch());
        let mut doc = Document::blank();

        let desktop_video = hover.create_media(&mut doc, "a.mp4", "").unwrap();
        let touch_video = touch.create_media(&mut doc, "a.mp4", "").unwrap();

        assert!(desktop_video.handlers.unwrap().visibility().is_none());
        assert!(touch_video.handlers.unwrap().visibility().is_some());
        assert_eq!(touch.mode(), InteractionMode::Touch);
    }

    #[test]
    fn test_ended_event_reaches_controller() {
        let (mut resolver, queue) = resolver(&Navigator::desktop());
        let mut doc = Document::blank();
        let media = resolver.create_media(&mut doc, "a.mp4", "").unwrap();

        doc.dispatch_event(media.node, &mut Event::new(EventType::Ended));
        assert_eq!(resolver.playback(media.node).map(|s| s.has_ended), Some(true));
        assert_eq!(queue.advance(Duration::from_secs(1)), 0);
    }

    #[test]
    fn test_prune_drops_removed_videos() {
        let (mut resolver, _) = resolver(&Navigator::touch());
        let mut doc = Document::blank();
        let media = resolver.create_media(&mut doc, "a.mp4", "").unwrap();
        doc.append_to_body(media.node);

        assert_eq!(resolver.prune(&doc.tree), 0);
        doc.remove_node(media.node);
        assert_eq!(resolver.prune(&doc.tree), 1);
        assert!(resolver.playback(media.node).is_none());
        assert!(resolver.element(media.node).is_none());
    }
}

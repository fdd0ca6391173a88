//! Product and gallery cards.

use crate::context::RenderContext;
use crate::non_blank;
use common::{SiteError, SiteResult};
use dom::NodeId;
use serde::{Deserialize, Serialize};
use tracing::debug;
use url::Url;

/// Declarative description of a card.
///
/// Field names follow the page data (`mediaSrc`, `imageAlt`, `linkURL`, ...).
/// Unknown fields are ignored.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CardConfig {
    #[serde(default, alias = "imageSrc", alias = "videoSrc", skip_serializing_if = "Option::is_none")]
    pub media_src: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_alt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class_name: Option<String>,
    #[serde(default, rename = "linkURL", skip_serializing_if = "Option::is_none")]
    pub link_url: Option<String>,
}

impl CardConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_media(mut self, src: &str, alt: &str) -> Self {
        self.media_src = Some(src.to_string());
        self.image_alt = Some(alt.to_string());
        self
    }

    pub fn with_title(mut self, title: &str) -> Self {
        self.title = Some(title.to_string());
        self
    }

    pub fn with_subtitle(mut self, subtitle: &str) -> Self {
        self.subtitle = Some(subtitle.to_string());
        self
    }

    pub fn with_class(mut self, class_name: &str) -> Self {
        self.class_name = Some(class_name.to_string());
        self
    }

    pub fn with_link(mut self, link_url: &str) -> Self {
        self.link_url = Some(link_url.to_string());
        self
    }
}

/// Absolute http(s) URLs open in a new browsing context.
pub fn is_external_link(link: &str) -> bool {
    match Url::parse(link.trim()) {
        Ok(url) => matches!(url.scheme(), "http" | "https"),
        Err(_) => false,
    }
}

/// Build a card. Returns the outermost node: the link when one is set,
/// otherwise the card container.
pub fn create_card(ctx: &mut RenderContext, config: &CardConfig) -> SiteResult<NodeId> {
    let media_src = non_blank(&config.media_src);
    let title = non_blank(&config.title);
    let subtitle = non_blank(&config.subtitle);

    if media_src.is_none() && title.is_none() && subtitle.is_none() {
        return Err(SiteError::content_required(
            "card requires at least one of: media source, title, or subtitle",
        ));
    }

    let image_alt = config.image_alt.as_deref().unwrap_or_default();
    let media = match media_src {
        Some(src) => Some(ctx.media.create_media(&mut ctx.doc, src, image_alt)?),
        None => None,
    };

    let class_name = match non_blank(&config.class_name) {
        Some(extra) => format!("card {}", extra.trim()),
        None => "card".to_string(),
    };
    let card = ctx.doc.create_element_with_class("div", &class_name);

    if let Some(media) = &media {
        ctx.doc.append_child(card, media.node);
        if let Some(handlers) = &media.handlers {
            ctx.bind_interactions(card, media.node, handlers);
        }
    }

    if title.is_some() || subtitle.is_some() {
        let content = ctx.doc.create_element_with_class("div", "card-content");

        if let Some(title) = title {
            let heading = ctx.doc.create_element_with_class("h3", "card-title");
            ctx.doc.set_text_content(heading, title);
            ctx.doc.append_child(content, heading);
        }

        if let Some(subtitle) = subtitle {
            let paragraph = ctx.doc.create_element_with_class("p", "card-subtitle");
            ctx.doc.set_text_content(paragraph, subtitle);
            ctx.doc.append_child(content, paragraph);
        }

        ctx.doc.append_child(card, content);
    }

    let Some(link_url) = non_blank(&config.link_url) else {
        return Ok(card);
    };

    let link = ctx.doc.create_element("a");
    ctx.doc.set_attribute(link, "href", link_url);
    if !image_alt.is_empty() {
        ctx.doc.set_attribute(link, "title", image_alt);
    }
    if is_external_link(link_url) {
        ctx.doc.set_attribute(link, "target", "_blank");
        ctx.doc.set_attribute(link, "rel", "noopener noreferrer");
    }
    ctx.doc.append_child(link, card);

    debug!(href = link_url, "card wrapped in link");
    Ok(link)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::testing::context;
    use dom::{Event, EventType};
    use std::time::Duration;

    #[test]
    fn test_card_requires_content() {
        let (mut ctx, _) = context(false);
        let blank = CardConfig {
            media_src: Some("  ".to_string()),
            title: Some(String::new()),
            subtitle: None,
            image_alt: Some("alt only".to_string()),
            ..CardConfig::default()
        };

        let err = create_card(&mut ctx, &blank).unwrap_err();
        assert!(matches!(err, SiteError::ContentRequired(_)));
        assert!(ctx.doc.get_elements_by_class_name("card").is_empty());
    }

    #[test]
    fn test_card_structure() {
        let (mut ctx, _) = context(false);
        let config = CardConfig::new()
            .with_media("assets/images/fractal.jpg", "Watercolor fractal")
            .with_title("Fractals")
            .with_subtitle("Watercolor on paper")
            .with_class("featured");

        let card = create_card(&mut ctx, &config).unwrap();
        assert_eq!(ctx.doc.get_attribute(card, "class"), Some("card featured"));

        let children: Vec<_> = ctx.doc.tree.children(card).collect();
        assert_eq!(children.len(), 2);
        assert_eq!(ctx.doc.get_attribute(children[0], "src"), Some("assets/images/fractal.jpg"));
        assert!(ctx.doc.has_class(children[1], "card-content"));

        let title = ctx.doc.tree.query_selector_all_within(card, "h3.card-title");
        assert_eq!(ctx.doc.text_content(title[0]), "Fractals");
        let subtitle = ctx.doc.tree.query_selector_all_within(card, "p.card-subtitle");
        assert_eq!(ctx.doc.text_content(subtitle[0]), "Watercolor on paper");
    }

    #[test]
    fn test_card_without_text_has_no_content_block() {
        let (mut ctx, _) = context(false);
        let card = create_card(&mut ctx, &CardConfig::new().with_media("a.png", "")).unwrap();
        assert!(ctx.doc.tree.query_selector_all_within(card, ".card-content").is_empty());
        assert_eq!(ctx.doc.get_attribute(card, "class"), Some("card"));
    }

    #[test]
    fn test_external_link_detection() {
        assert!(is_external_link("http://example.com/x"));
        assert!(is_external_link("https://www.etsy.com/shop/ScenicSerenityArts"));
        assert!(!is_external_link("about.html"));
        assert!(!is_external_link("#main-content"));
        assert!(!is_external_link("mailto:hello@example.com"));
    }

    #[test]
    fn test_external_link_wrapping() {
        let (mut ctx, _) = context(false);
        let config = CardConfig::new()
            .with_media("a.png", "Clocks")
            .with_title("Clocks")
            .with_link("http://example.com/x");

        let link = create_card(&mut ctx, &config).unwrap();
        assert_eq!(ctx.doc.get_attribute(link, "href"), Some("http://example.com/x"));
        assert_eq!(ctx.doc.get_attribute(link, "title"), Some("Clocks"));
        assert_eq!(ctx.doc.get_attribute(link, "target"), Some("_blank"));
        assert_eq!(ctx.doc.get_attribute(link, "rel"), Some("noopener noreferrer"));
        let card = ctx.doc.tree.first_child(link).unwrap();
        assert!(ctx.doc.has_class(card, "card"));
    }

    #[test]
    fn test_internal_link_wrapping() {
        let (mut ctx, _) = context(false);
        let config = CardConfig::new().with_title("About").with_link("about.html");

        let link = create_card(&mut ctx, &config).unwrap();
        assert_eq!(ctx.doc.get_attribute(link, "href"), Some("about.html"));
        assert_eq!(ctx.doc.get_attribute(link, "target"), None);
        assert_eq!(ctx.doc.get_attribute(link, "rel"), None);
        assert_eq!(ctx.doc.get_attribute(link, "title"), None);
    }

    #[test]
    fn test_hover_video_card_binds_handlers() {
        let (mut ctx, queue) = context(false);
        let config = CardConfig::new()
            .with_media("assets/videos/clock.mp4", "Clocks")
            .with_title("Clocks");

        let card = create_card(&mut ctx, &config).unwrap();
        let video = ctx.doc.tree.query_selector_all_within(card, "video")[0];
        assert_eq!(ctx.doc.events.listener_count(card, &EventType::MouseEnter), 1);
        assert_eq!(ctx.doc.events.listener_count(card, &EventType::MouseLeave), 1);
        assert!(!ctx.is_observed(video));

        ctx.doc.dispatch_event(card, &mut Event::new(EventType::MouseEnter));
        queue.advance(Duration::from_millis(250));
        assert_eq!(ctx.media.playback(video).map(|s| s.has_played), Some(true));
    }

    #[test]
    fn test_touch_video_card_observes_video() {
        let (mut ctx, _) = context(true);
        let config = CardConfig::new()
            .with_media("assets/videos/clock.mp4", "Clocks")
            .with_link("https://www.etsy.com/shop/ScenicSerenityArts");

        let link = create_card(&mut ctx, &config).unwrap();
        let card = ctx.doc.tree.first_child(link).unwrap();
        let video = ctx.doc.tree.query_selector_all_within(card, "video")[0];

        assert_eq!(ctx.doc.events.listener_count(card, &EventType::TouchStart), 1);
        assert_eq!(ctx.doc.events.listener_count(link, &EventType::TouchStart), 0);
        assert!(ctx.is_observed(video));

        ctx.notify_visibility(video, true);
        let element = ctx.media.element(video).unwrap();
        assert!(!element.paused());
    }

    #[test]
    fn test_config_deserialize_aliases() {
        let json = r#"{
            "imageSrc": "assets/images/print.png",
            "imageAlt": "Print",
            "title": "Print",
            "buttonText": "Shop Now",
            "linkURL": "https://example.com"
        }"#;
        let config: CardConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.media_src.as_deref(), Some("assets/images/print.png"));
        assert_eq!(config.link_url.as_deref(), Some("https://example.com"));

        let video: CardConfig = serde_json::from_str(r#"{"videoSrc": "a.mp4"}"#).unwrap();
        assert_eq!(video.media_src.as_deref(), Some("a.mp4"));
    }
}

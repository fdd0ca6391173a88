//! Product sections: heading, description and a grid of cards.

use crate::card::{create_card, CardConfig};
use crate::card_grid::create_card_grid;
use crate::context::RenderContext;
use crate::non_blank;
use common::{SiteError, SiteResult};
use dom::NodeId;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub heading: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub cards: Vec<CardConfig>,
}

/// Build a `<section class="product-section">`.
///
/// Cards that fail to build are logged and left out; the section still renders.
pub fn create_section(ctx: &mut RenderContext, config: &SectionConfig) -> SiteResult<NodeId> {
    let heading = non_blank(&config.heading);
    let description = non_blank(&config.description);

    if heading.is_none() && description.is_none() && config.cards.is_empty() {
        return Err(SiteError::content_required(
            "section requires a heading, a description, or cards",
        ));
    }

    let section = ctx.doc.create_element_with_class("section", "product-section");

    if let Some(heading) = heading {
        let h2 = ctx.doc.create_element("h2");
        ctx.doc.set_text_content(h2, heading);
        ctx.doc.append_child(section, h2);
    }

    if let Some(description) = description {
        let paragraph = ctx.doc.create_element_with_class("p", "section-description");
        ctx.doc.set_text_content(paragraph, description);
        ctx.doc.append_child(section, paragraph);
    }

    if !config.cards.is_empty() {
        let mut cards = Vec::with_capacity(config.cards.len());
        for (index, card_config) in config.cards.iter().enumerate() {
            match create_card(ctx, card_config) {
                Ok(card) => cards.push(card),
                Err(err) => warn!(section = heading.unwrap_or_default(), index, error = %err, "skipping card"),
            }
        }

        let grid = create_card_grid(&mut ctx.doc, &cards);
        ctx.doc.append_child(section, grid);
        debug!(built = cards.len(), requested = config.cards.len(), "section grid built");
    }

    Ok(section)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::testing::context;

    fn phone_cases() -> SectionConfig {
        SectionConfig {
            heading: Some("Phone Cases".to_string()),
            description: Some("Durable protection for your phone.".to_string()),
            cards: vec![
                CardConfig::new().with_media("assets/videos/phone-case-magsafe.mp4", "MagSafe").with_title("MagSafe"),
                CardConfig {
                    image_alt: Some("Nothing to show".to_string()),
                    ..CardConfig::default()
                },
                CardConfig::new().with_media("assets/videos/phone-case-tough.mp4", "Tough").with_title("Tough"),
            ],
        }
    }

    #[test]
    fn test_invalid_card_is_skipped() {
        let (mut ctx, _) = context(true);
        let section = create_section(&mut ctx, &phone_cases()).unwrap();

        let grid = ctx.doc.tree.query_selector_all_within(section, ".card-grid")[0];
        assert_eq!(ctx.doc.tree.children(grid).count(), 2);
        assert_eq!(ctx.media.video_count(), 2);
    }

    #[test]
    fn test_section_structure() {
        let (mut ctx, _) = context(false);
        let section = create_section(&mut ctx, &phone_cases()).unwrap();

        assert!(ctx.doc.has_class(section, "product-section"));
        let children: Vec<_> = ctx.doc.tree.children(section).collect();
        assert_eq!(children.len(), 3);
        assert_eq!(ctx.doc.text_content(children[0]), "Phone Cases");
        assert!(ctx.doc.has_class(children[1], "section-description"));
        assert!(ctx.doc.has_class(children[2], "card-grid"));
    }

    #[test]
    fn test_heading_only_section() {
        let (mut ctx, _) = context(false);
        let config = SectionConfig {
            heading: Some("Coming soon".to_string()),
            ..SectionConfig::default()
        };

        let section = create_section(&mut ctx, &config).unwrap();
        assert_eq!(ctx.doc.tree.children(section).count(), 1);
    }

    #[test]
    fn test_empty_section_rejected() {
        let (mut ctx, _) = context(false);
        let config = SectionConfig {
            heading: Some("   ".to_string()),
            ..SectionConfig::default()
        };

        let err = create_section(&mut ctx, &config).unwrap_err();
        assert!(matches!(err, SiteError::ContentRequired(_)));
    }

    #[test]
    fn test_all_cards_failing_keeps_empty_grid() {
        let (mut ctx, _) = context(false);
        let config = SectionConfig {
            heading: Some("Prints".to_string()),
            description: None,
            cards: vec![CardConfig::new(), CardConfig::new().with_title("  ")],
        };

        let section = create_section(&mut ctx, &config).unwrap();
        let grid = ctx.doc.tree.query_selector_all_within(section, ".card-grid")[0];
        assert_eq!(ctx.doc.tree.first_child(grid), None);
    }

    #[test]
    fn test_section_from_json() {
        let json = r#"{
            "heading": "Home Tech",
            "cards": [{ "mediaSrc": "assets/videos/clock.mp4", "title": "Clocks" }]
        }"#;
        let config: SectionConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.description, None);
        assert_eq!(config.cards.len(), 1);
    }
}

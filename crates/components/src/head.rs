//! Common `<head>` content: metadata, fonts, stylesheets and analytics.

use dom::{Document, NodeId};
use tracing::debug;

const FONT_STYLESHEET: &str = "https://fonts.googleapis.com/css2?family=Quicksand:wght@300..700&family=Tenor+Sans&family=Cookie&display=swap";
const FONT_AWESOME_CSS: &str = "https://cdnjs.cloudflare.com/ajax/libs/font-awesome/4.7.0/css/font-awesome.min.css";
const FONT_AWESOME_KIT: &str = "https://kit.fontawesome.com/679a59d672.js";
const STYLESHEETS: &[&str] = &["css/variables.css", "css/global.css"];

#[derive(Clone, Debug)]
pub struct HeadOptions {
    pub title: String,
    /// Meta description for search engines.
    pub description: Option<String>,
    /// Google tag id; analytics scripts are added only when set.
    pub analytics_id: Option<String>,
}

impl Default for HeadOptions {
    fn default() -> Self {
        Self {
            title: "Scenic Serenity Arts".to_string(),
            description: None,
            analytics_id: None,
        }
    }
}

fn append_meta(doc: &mut Document, attributes: &[(&str, &str)]) -> NodeId {
    append_element(doc, "meta", attributes)
}

fn append_link(doc: &mut Document, attributes: &[(&str, &str)]) -> NodeId {
    append_element(doc, "link", attributes)
}

fn append_element(doc: &mut Document, tag: &str, attributes: &[(&str, &str)]) -> NodeId {
    let node = doc.create_element(tag);
    for (name, value) in attributes {
        doc.set_attribute(node, name, value);
    }
    doc.append_to_head(node);
    node
}

fn analytics_bootstrap(tag_id: &str) -> String {
    format!(
        "window.dataLayer = window.dataLayer || [];\n\
         function gtag() {{ dataLayer.push(arguments); }}\n\
         gtag('js', new Date());\n\
         gtag('config', '{tag_id}');"
    )
}

/// Populate `<head>`. The title is set after everything else.
pub fn set_up_head(doc: &mut Document, options: &HeadOptions) {
    if let Some(tag_id) = options.analytics_id.as_deref().filter(|id| !id.trim().is_empty()) {
        let src = format!("https://www.googletagmanager.com/gtag/js?id={tag_id}");
        append_element(doc, "script", &[("async", ""), ("src", src.as_str())]);

        let config = doc.create_element("script");
        doc.set_text_content(config, &analytics_bootstrap(tag_id));
        doc.append_to_head(config);
        debug!(tag_id, "analytics enabled");
    }

    append_meta(doc, &[("charset", "UTF-8")]);
    append_meta(doc, &[("name", "viewport"), ("content", "width=device-width, initial-scale=1.0")]);
    if let Some(description) = options.description.as_deref().filter(|d| !d.trim().is_empty()) {
        append_meta(doc, &[("name", "description"), ("content", description)]);
    }

    append_link(doc, &[("rel", "preconnect"), ("href", "https://fonts.googleapis.com")]);
    append_link(
        doc,
        &[("rel", "preconnect"), ("href", "https://fonts.gstatic.com"), ("crossorigin", "anonymous")],
    );
    append_link(doc, &[("href", FONT_STYLESHEET), ("rel", "stylesheet")]);
    append_link(doc, &[("rel", "stylesheet"), ("href", FONT_AWESOME_CSS)]);
    append_element(doc, "script", &[("src", FONT_AWESOME_KIT), ("crossorigin", "anonymous")]);
    for &href in STYLESHEETS {
        append_link(doc, &[("rel", "stylesheet"), ("href", href)]);
    }

    doc.set_title(&options.title);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_head_without_analytics() {
        let mut doc = Document::blank();
        set_up_head(&mut doc, &HeadOptions::default());

        assert_eq!(doc.title, "Scenic Serenity Arts");
        let scripts = doc.get_elements_by_tag_name("script");
        assert_eq!(scripts.len(), 1);
        assert_eq!(doc.get_attribute(scripts[0], "src"), Some(FONT_AWESOME_KIT));
        assert_eq!(doc.tree.last_child(doc.head()), doc.query_selector("title"));
    }

    #[test]
    fn test_head_with_analytics_and_description() {
        let mut doc = Document::blank();
        let options = HeadOptions {
            title: "Home & Lifestyle - Scenic Serenity Arts".to_string(),
            description: Some("Functional art for everyday life.".to_string()),
            analytics_id: Some("G-YHZKZ8TB6S".to_string()),
        };
        set_up_head(&mut doc, &options);

        let first = doc.tree.first_child(doc.head()).unwrap();
        assert_eq!(
            doc.get_attribute(first, "src"),
            Some("https://www.googletagmanager.com/gtag/js?id=G-YHZKZ8TB6S")
        );
        assert!(doc.get_elements_by_tag_name("script").iter().any(|&s| doc.text_content(s).contains("gtag('config', 'G-YHZKZ8TB6S')")));

        let description = doc
            .get_elements_by_tag_name("meta")
            .into_iter()
            .find(|&m| doc.get_attribute(m, "name") == Some("description"))
            .unwrap();
        assert_eq!(doc.get_attribute(description, "content"), Some("Functional art for everyday life."));
        assert_eq!(doc.title, "Home & Lifestyle - Scenic Serenity Arts");
    }
}

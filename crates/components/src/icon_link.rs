//! Icon links to external profiles.

use common::{SiteError, SiteResult};
use dom::{Document, NodeId};

#[derive(Clone, Debug, Default)]
pub struct IconLinkOptions {
    /// Font Awesome classes, e.g. `fa-brands fa-etsy`.
    pub icon_class: String,
    pub url: String,
    pub tooltip: Option<String>,
}

/// Build `<a class="icon-link"><i class=..></i></a>` opening in a new tab.
pub fn create_icon_link(doc: &mut Document, options: &IconLinkOptions) -> SiteResult<NodeId> {
    if options.icon_class.trim().is_empty() || options.url.trim().is_empty() {
        return Err(SiteError::invalid("icon link requires an icon class and a url"));
    }

    let link = doc.create_element_with_class("a", "icon-link");
    doc.set_attribute(link, "href", &options.url);
    doc.set_attribute(link, "target", "_blank");
    doc.set_attribute(link, "rel", "noopener noreferrer");
    if let Some(tooltip) = options.tooltip.as_deref().filter(|t| !t.is_empty()) {
        doc.set_attribute(link, "title", tooltip);
    }

    let icon = doc.create_element_with_class("i", &options.icon_class);
    doc.append_child(link, icon);
    Ok(link)
}

//! Page metadata table.

use common::{SiteError, SiteResult};
use components::{NavItem, SectionConfig};
use serde::{Deserialize, Serialize};

const BUILTIN_PAGES: &str = include_str!("../data/pages.json");

/// Metadata and content of one page.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageData {
    pub id: String,
    pub href: String,
    /// Label in the navigation menus; pages without one are not listed.
    #[serde(default)]
    pub nav_text: Option<String>,
    pub heading: String,
    pub page_title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub include_analytics: bool,
    #[serde(default)]
    pub sections: Vec<SectionConfig>,
}

/// Ordered, immutable set of pages.
#[derive(Clone, Debug)]
pub struct PageTable {
    pages: Vec<PageData>,
}

impl PageTable {
    /// Build a table, rejecting duplicate ids or hrefs.
    pub fn new(pages: Vec<PageData>) -> SiteResult<Self> {
        for (i, page) in pages.iter().enumerate() {
            if page.id.trim().is_empty() {
                return Err(SiteError::config(format!("page at index {i} has no id")));
            }
            if pages[..i].iter().any(|p| p.id == page.id || p.href == page.href) {
                return Err(SiteError::config(format!("duplicate page '{}'", page.id)));
            }
        }
        Ok(Self { pages })
    }

    pub fn from_json(json: &str) -> SiteResult<Self> {
        Self::new(serde_json::from_str(json)?)
    }

    /// The site's own pages.
    pub fn builtin() -> SiteResult<Self> {
        Self::from_json(BUILTIN_PAGES)
    }

    pub fn get(&self, id: &str) -> Option<&PageData> {
        self.pages.iter().find(|p| p.id == id)
    }

    pub fn by_href(&self, href: &str) -> Option<&PageData> {
        self.pages.iter().find(|p| p.href == href)
    }

    pub fn nav_items(&self) -> Vec<NavItem> {
        self.pages
            .iter()
            .filter_map(|p| p.nav_text.as_deref().map(|text| NavItem::new(text, &p.href)))
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PageData> {
        self.pages.iter()
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_table() {
        let table = PageTable::builtin().unwrap();
        assert_eq!(table.len(), 5);

        let home = table.get("home").unwrap();
        assert_eq!(home.href, "index.html");
        assert!(home.include_analytics);
        assert!(home.nav_text.is_none());

        let lifestyle = table.by_href("lifestyle.html").unwrap();
        assert_eq!(lifestyle.sections.len(), 2);
        assert_eq!(lifestyle.sections[0].cards.len(), 3);
        assert!(table.get("about").unwrap().description.is_none());
        assert!(table.get("merchandise").is_none());
    }

    #[test]
    fn test_nav_items_skip_unlisted_pages() {
        let table = PageTable::builtin().unwrap();
        let items = table.nav_items();
        assert_eq!(items.len(), 4);
        assert_eq!(items[0], NavItem::new("About the Artist", "about.html"));
        assert!(items.iter().all(|i| i.href != "index.html"));
    }

    #[test]
    fn test_duplicate_pages_rejected() {
        let json = r#"[
            {"id": "a", "href": "a.html", "heading": "A", "pageTitle": "A"},
            {"id": "a", "href": "b.html", "heading": "B", "pageTitle": "B"}
        ]"#;
        assert!(matches!(PageTable::from_json(json), Err(SiteError::Config(_))));
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(PageTable::from_json("{"), Err(SiteError::Json(_))));
    }
}

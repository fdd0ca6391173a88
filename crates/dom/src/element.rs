//! DOM Element implementation.

use crate::attributes::AttributeMap;
use bitflags::bitflags;
use once_cell::sync::Lazy;
use parking_lot::RwLock;
use smallvec::SmallVec;
use std::collections::HashMap;
use std::sync::Arc;

/// HTML tag names interned for efficiency.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TagName(Arc<str>);

impl TagName {
    pub fn new(name: &str) -> Self {
        static INTERNED: Lazy<RwLock<HashMap<String, Arc<str>>>> =
            Lazy::new(|| RwLock::new(HashMap::new()));

        let lower = name.to_ascii_lowercase();

        {
            let cache = INTERNED.read();
            if let Some(s) = cache.get(&lower) {
                return TagName(s.clone());
            }
        }

        let mut cache = INTERNED.write();
        let s = cache
            .entry(lower.clone())
            .or_insert_with(|| Arc::from(lower.as_str()))
            .clone();
        TagName(s)
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for TagName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for TagName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for TagName {
    fn eq(&self, other: &str) -> bool {
        self.0.as_ref() == other.to_ascii_lowercase()
    }
}

impl PartialEq<&str> for TagName {
    fn eq(&self, other: &&str) -> bool {
        self.0.as_ref() == other.to_ascii_lowercase()
    }
}

bitflags! {
    /// Serialization and media properties derived from the tag name.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct ElementFlags: u8 {
        /// No closing tag, no children (`img`, `meta`, `link`).
        const VOID = 1 << 0;
        /// Text children are written verbatim (`script`, `style`).
        const RAW_TEXT = 1 << 1;
        /// Playable element that can carry interaction handlers.
        const MEDIA = 1 << 2;
    }
}

impl ElementFlags {
    fn for_tag(tag_name: &TagName) -> Self {
        match tag_name.as_str() {
            "br" | "hr" | "img" | "input" | "link" | "meta" | "source" | "track" | "wbr" => Self::VOID,
            "script" | "style" => Self::RAW_TEXT,
            "video" | "audio" => Self::MEDIA,
            _ => Self::empty(),
        }
    }
}

/// Element-specific data.
#[derive(Clone, Debug)]
pub struct ElementData {
    /// Tag name (lowercase).
    pub tag_name: TagName,
    pub attributes: AttributeMap,
    /// Cached `id` attribute.
    pub id: Option<Arc<str>>,
    /// Cached `class` attribute, split on whitespace.
    pub class_list: SmallVec<[Arc<str>; 4]>,
    pub flags: ElementFlags,
}

impl ElementData {
    pub fn new(tag_name: TagName) -> Self {
        Self {
            flags: ElementFlags::for_tag(&tag_name),
            tag_name,
            attributes: AttributeMap::new(),
            id: None,
            class_list: SmallVec::new(),
        }
    }

    /// Set an attribute, keeping the `id` and class caches current.
    pub fn set_attribute(&mut self, name: &str, value: &str) {
        let name = name.to_ascii_lowercase();
        match name.as_str() {
            "id" => self.id = Some(Arc::from(value)),
            "class" => self.class_list = value.split_whitespace().map(Arc::from).collect(),
            _ => {}
        }
        self.attributes.set(&name, value);
    }

    #[inline]
    pub fn get_attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(&name.to_ascii_lowercase())
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.class_list.iter().any(|c| c.as_ref() == class)
    }

    pub fn add_class(&mut self, class: &str) {
        if !self.has_class(class) {
            self.class_list.push(Arc::from(class));
            self.sync_class_attribute();
        }
    }

    pub fn remove_class(&mut self, class: &str) {
        let before = self.class_list.len();
        self.class_list.retain(|c| c.as_ref() != class);
        if self.class_list.len() != before {
            self.sync_class_attribute();
        }
    }

    fn sync_class_attribute(&mut self) {
        let joined = self.class_list.join(" ");
        self.attributes.set("class", &joined);
    }

    #[inline]
    pub fn is_void(&self) -> bool {
        self.flags.contains(ElementFlags::VOID)
    }

    #[inline]
    pub fn is_raw_text(&self) -> bool {
        self.flags.contains(ElementFlags::RAW_TEXT)
    }

    #[inline]
    pub fn is_media(&self) -> bool {
        self.flags.contains(ElementFlags::MEDIA)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_name() {
        let div = TagName::new("DIV");
        assert_eq!(div.as_str(), "div");
        assert!(div == "div");
        assert!(div == "Div");
    }

    #[test]
    fn test_element_attributes() {
        let mut elem = ElementData::new(TagName::new("div"));
        elem.set_attribute("id", "main-content");
        elem.set_attribute("class", "card  featured");

        assert_eq!(elem.id.as_deref(), Some("main-content"));
        assert_eq!(elem.class_list.len(), 2);
        assert!(elem.has_class("card"));
        assert!(!elem.has_class("card-grid"));
    }

    #[test]
    fn test_add_and_remove_class() {
        let mut modal = ElementData::new(TagName::new("div"));
        modal.set_attribute("class", "mobile-nav-modal");

        modal.add_class("active");
        assert_eq!(modal.get_attribute("class"), Some("mobile-nav-modal active"));
        modal.remove_class("active");
        modal.remove_class("missing");
        assert_eq!(modal.get_attribute("class"), Some("mobile-nav-modal"));
    }

    #[test]
    fn test_element_flags() {
        assert!(ElementData::new(TagName::new("img")).is_void());
        assert!(ElementData::new(TagName::new("meta")).is_void());
        assert!(!ElementData::new(TagName::new("video")).is_void());
        assert!(ElementData::new(TagName::new("video")).is_media());
        assert!(ElementData::new(TagName::new("script")).is_raw_text());
    }
}

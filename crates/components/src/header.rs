//! Site header with desktop navigation and the mobile navigation modal.

use dom::{Document, Event, EventCallback, EventType, NodeId};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

const LOGO_SRC: &str = "assets/images/logos/SSA-logo-white.png";

/// Navigation entry.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct NavItem {
    pub text: String,
    pub href: String,
}

impl NavItem {
    pub fn new(text: &str, href: &str) -> Self {
        Self {
            text: text.to_string(),
            href: href.to_string(),
        }
    }
}

/// Mobile navigation modal.
///
/// Listeners only record whether the modal should be open; [`MobileNav::sync`]
/// applies that to the `active` class after dispatch.
#[derive(Clone, Debug)]
pub struct MobileNav {
    pub modal: NodeId,
    pub close_button: NodeId,
    open: Arc<Mutex<bool>>,
}

impl MobileNav {
    pub fn is_open(&self) -> bool {
        *self.open.lock()
    }

    /// Reflect the open state on the modal's `active` class.
    pub fn sync(&self, doc: &mut Document) {
        doc.set_class(self.modal, "active", self.is_open());
    }

    fn setter(&self, open: bool) -> EventCallback {
        let state = self.open.clone();
        Arc::new(move |_: &mut Event| {
            *state.lock() = open;
        })
    }
}

/// Handles to an initialized header.
#[derive(Clone, Debug)]
pub struct Header {
    pub header: NodeId,
    pub hamburger: NodeId,
    pub mobile_nav: MobileNav,
}

fn nav_list(doc: &mut Document, items: &[NavItem]) -> NodeId {
    let list = doc.create_element("ul");
    for item in items {
        let li = doc.create_element("li");
        let link = doc.create_element("a");
        doc.set_attribute(link, "href", &item.href);
        doc.set_text_content(link, &item.text);
        doc.append_child(li, link);
        doc.append_child(list, li);
    }
    list
}

fn icon_button(doc: &mut Document, class: &str, icon: &str, label: &str) -> NodeId {
    let button = doc.create_element_with_class("button", class);
    doc.set_attribute(button, "aria-label", label);
    let glyph = doc.create_element_with_class("i", icon);
    doc.append_child(button, glyph);
    button
}

/// Build a detached `<header>`: skip link, logo, navigation and hamburger button.
pub fn create_header(doc: &mut Document, site_name: &str, items: &[NavItem]) -> NodeId {
    build_header(doc, site_name, items).0
}

/// Returns the header and its hamburger button.
fn build_header(doc: &mut Document, site_name: &str, items: &[NavItem]) -> (NodeId, NodeId) {
    let header = doc.create_element("header");

    let skip_link = doc.create_element_with_class("a", "skip-link");
    doc.set_attribute(skip_link, "href", "#main-content");
    doc.set_text_content(skip_link, "Skip to main content");
    doc.append_child(header, skip_link);

    let logo_link = doc.create_element_with_class("a", "logo-link");
    doc.set_attribute(logo_link, "href", "index.html");
    let logo = doc.create_element("img");
    doc.set_attribute(logo, "src", LOGO_SRC);
    doc.set_attribute(logo, "alt", site_name);
    doc.append_child(logo_link, logo);
    doc.append_child(header, logo_link);

    let nav = doc.create_element("nav");
    let list = nav_list(doc, items);
    doc.append_child(nav, list);
    doc.append_child(header, nav);

    let hamburger = icon_button(doc, "hamburger-menu", "fa fa-bars", "Open menu");
    doc.append_child(header, hamburger);

    (header, hamburger)
}

fn create_mobile_nav(doc: &mut Document, items: &[NavItem]) -> MobileNav {
    let modal = doc.create_element_with_class("div", "mobile-nav-modal");
    let close_button = icon_button(doc, "mobile-nav-close", "fa fa-times", "Close menu");
    let list = nav_list(doc, items);
    doc.append_child(modal, close_button);
    doc.append_child(modal, list);

    MobileNav {
        modal,
        close_button,
        open: Arc::new(Mutex::new(false)),
    }
}

/// Put the header first in `<body>` and the mobile modal last, wired together.
///
/// Returns `None` when the document already has a header.
pub fn init_header(doc: &mut Document, site_name: &str, items: &[NavItem]) -> Option<Header> {
    if doc.query_selector("header").is_some() {
        debug!("header already present");
        return None;
    }

    let (header, hamburger) = build_header(doc, site_name, items);
    doc.prepend_to_body(header);

    let mobile_nav = create_mobile_nav(doc, items);
    doc.append_to_body(mobile_nav.modal);

    doc.add_event_listener(hamburger, EventType::Click, mobile_nav.setter(true));
    doc.add_event_listener(mobile_nav.close_button, EventType::Click, mobile_nav.setter(false));

    for link in doc.tree.query_selector_all_within(mobile_nav.modal, "a") {
        doc.add_event_listener(link, EventType::Click, mobile_nav.setter(false));
    }

    // Clicks on the backdrop itself close the modal; clicks bubbling up from its items do not.
    let modal = mobile_nav.modal;
    let backdrop = mobile_nav.open.clone();
    doc.add_event_listener(
        modal,
        EventType::Click,
        Arc::new(move |event: &mut Event| {
            if event.target == Some(modal) {
                *backdrop.lock() = false;
            }
        }),
    );

    let escape = mobile_nav.open.clone();
    doc.add_event_listener(
        doc.document_element(),
        EventType::KeyDown,
        Arc::new(move |event: &mut Event| {
            if event.key.as_deref() == Some("Escape") {
                *escape.lock() = false;
            }
        }),
    );

    Some(Header {
        header,
        hamburger,
        mobile_nav,
    })
}

//! Page fragments for the Scenic Serenity Arts site.
//!
//! Every builder creates detached nodes in the [`RenderContext`]'s document;
//! callers attach them where they belong.

pub mod card;
pub mod card_grid;
pub mod context;
pub mod footer;
pub mod head;
pub mod header;
pub mod icon_link;
pub mod section;

pub use card::{create_card, is_external_link, CardConfig};
pub use card_grid::create_card_grid;
pub use context::RenderContext;
pub use footer::{create_footer, init_footer, FooterOptions};
pub use head::{set_up_head, HeadOptions};
pub use header::{create_header, init_header, Header, MobileNav, NavItem};
pub use icon_link::{create_icon_link, IconLinkOptions};
pub use section::{create_section, SectionConfig};

/// Returns the value when present and not blank.
pub(crate) fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.trim().is_empty())
}

//! Page footer.

use dom::{Document, NodeId};

#[derive(Clone, Debug)]
pub struct FooterOptions {
    pub year: i32,
    pub site_name: String,
    pub location: String,
}

impl Default for FooterOptions {
    fn default() -> Self {
        Self {
            year: 2025,
            site_name: "Scenic Serenity Arts".to_string(),
            location: "Chattanooga, TN".to_string(),
        }
    }
}

pub fn create_footer(doc: &mut Document, options: &FooterOptions) -> NodeId {
    let footer = doc.create_element("footer");
    let text = format!(
        "\u{a9} {} {} \u{2022} {}",
        options.year, options.site_name, options.location
    );
    doc.set_text_content(footer, &text);
    footer
}

/// Append the footer to `<body>`.
pub fn init_footer(doc: &mut Document, options: &FooterOptions) -> NodeId {
    let footer = create_footer(doc, options);
    doc.append_to_body(footer);
    footer
}

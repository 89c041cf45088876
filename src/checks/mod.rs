//! Check battery
//!
//! Ten independent, pure checks over a parsed page. Each one inspects a
//! [`PageDocument`] and produces exactly one [`Finding`]:
//! - Meta title, meta description, canonical tag, meta robots
//! - H1 tag and heading structure
//! - Image alt text
//! - Linking profile
//! - Schema markup and Open Graph tags

mod headings;
mod images;
mod links;
mod meta;
mod structured_data;

pub use headings::{check_h1_tag, check_heading_structure};
pub use images::check_image_alt_text;
pub use links::{check_linking_profile, collect_anchors, count_links, LinkCounts};
pub use meta::{check_canonical_tag, check_meta_description, check_meta_robots, check_meta_title};
pub use structured_data::{check_open_graph_tags, check_schema_markup};

use crate::findings::{CheckName, Finding};
use scraper::{ElementRef, Html, Selector};
use std::sync::LazyLock;
use url::Url;

/// A check: a pure function from a parsed page to one finding
pub type CheckFn = fn(&PageDocument) -> Finding;

/// The battery, in execution order
///
/// Execution order is independent of display order; see [`order_findings`].
pub const BATTERY: [(CheckName, CheckFn); 10] = [
    (CheckName::MetaTitle, check_meta_title),
    (CheckName::MetaDescription, check_meta_description),
    (CheckName::H1Tag, check_h1_tag),
    (CheckName::CanonicalTag, check_canonical_tag),
    (CheckName::MetaRobots, check_meta_robots),
    (CheckName::ImageAltText, check_image_alt_text),
    (CheckName::SchemaMarkup, check_schema_markup),
    (CheckName::OpenGraphTags, check_open_graph_tags),
    (CheckName::HeadingStructure, check_heading_structure),
    (CheckName::LinkingProfile, check_linking_profile),
];

static BODY_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("body").expect("static selector"));

static META_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("meta").expect("static selector"));

/// Parsed markup plus the URL relative references resolve against
///
/// The base is always the page's resolved final URL; any `<base>` element in
/// the markup is overridden.
pub struct PageDocument {
    html: Html,
    base: Url,
}

impl PageDocument {
    /// Parses `markup` delivered from `final_url`
    ///
    /// # Example
    ///
    /// ```
    /// use geo_audit::checks::{check_meta_title, PageDocument};
    /// use url::Url;
    ///
    /// let base = Url::parse("https://example.com/").unwrap();
    /// let doc = PageDocument::parse("<html><head><title>Home</title></head></html>", base);
    /// let finding = check_meta_title(&doc);
    /// assert!(finding.is_pass());
    /// ```
    pub fn parse(markup: &str, final_url: Url) -> Self {
        Self {
            html: Html::parse_document(markup),
            base: final_url,
        }
    }

    pub fn html(&self) -> &Html {
        &self.html
    }

    /// Base URL used to resolve relative links
    pub fn base(&self) -> &Url {
        &self.base
    }

    /// Returns the trimmed `content` of the first `<meta>` whose `attr`
    /// equals `key` (case-insensitive), skipping empty values
    pub fn meta_content(&self, attr: &str, key: &str) -> Option<String> {
        self.html
            .select(&META_SELECTOR)
            .filter(|meta| {
                meta.value()
                    .attr(attr)
                    .is_some_and(|value| value.trim().eq_ignore_ascii_case(key))
            })
            .filter_map(|meta| meta.value().attr("content"))
            .map(|content| content.trim().to_string())
            .find(|content| !content.is_empty())
    }

    /// Number of `<meta>` elements in the document
    pub fn meta_tag_count(&self) -> usize {
        self.html.select(&META_SELECTOR).count()
    }

    /// Visible body text, whitespace-collapsed, excluding script and style content
    pub fn body_text(&self) -> String {
        let Some(body) = self.html.select(&BODY_SELECTOR).next() else {
            return String::new();
        };

        let raw: String = body
            .descendants()
            .filter_map(|node| {
                let text = node.value().as_text()?;
                let hidden = node.ancestors().any(|ancestor| {
                    ancestor.value().as_element().is_some_and(|el| {
                        matches!(el.name(), "script" | "style" | "noscript" | "template")
                    })
                });
                (!hidden).then(|| format!("{} ", &**text))
            })
            .collect();

        collapse_whitespace(&raw)
    }
}

/// Collapses runs of whitespace into single spaces and trims the ends
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Whitespace-collapsed text content of an element
pub fn element_text(element: &ElementRef<'_>) -> String {
    collapse_whitespace(&element.text().collect::<String>())
}

/// Number of Unicode scalar values in `text`
pub(crate) fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// Runs every check in [`BATTERY`] order
pub fn run_all(doc: &PageDocument) -> Vec<Finding> {
    BATTERY.iter().map(|(_, check)| check(doc)).collect()
}

/// Reorders findings into canonical display order
pub fn order_findings(mut findings: Vec<Finding>) -> Vec<Finding> {
    findings.sort_by_key(|finding| finding.check_name.display_rank());
    findings
}

//! Sitemap XML parsing

use crate::sitemap::{SitemapKind, SitemapParseResult};
use crate::AuditError;
use roxmltree::{Document, Node};

/// Collects `<entry><loc>` values under `root`, in document order
fn collect_locs(root: Node<'_, '_>, entry: &str) -> Vec<String> {
    root.descendants()
        .filter(|node| node.is_element() && node.tag_name().name() == entry)
        .filter_map(|node| {
            node.children()
                .find(|child| child.is_element() && child.tag_name().name() == "loc")
        })
        .filter_map(|loc| loc.text())
        .map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty())
        .collect()
}

/// Parses sitemap or sitemap-index XML
///
/// # Returns
///
/// * `Ok(SitemapParseResult)` - `Index` for a `<sitemapindex>` root, `Urlset` otherwise
/// * `Err(AuditError::ParseFailure)` - Malformed XML, or a non-index document
///   without any `<url><loc>` entries
///
/// # Example
///
/// ```
/// use geo_audit::sitemap::{parse_sitemap, SitemapKind};
///
/// let xml = r#"<urlset><url><loc>https://example.com/</loc></url></urlset>"#;
/// let parsed = parse_sitemap(xml).unwrap();
/// assert_eq!(parsed.kind, SitemapKind::Urlset);
/// assert_eq!(parsed.urls, vec!["https://example.com/".to_string()]);
/// ```
pub fn parse_sitemap(xml: &str) -> Result<SitemapParseResult, AuditError> {
    let xml = xml.trim_start_matches('\u{feff}').trim_start();
    let document = Document::parse(xml)
        .map_err(|e| AuditError::ParseFailure(format!("sitemap is not well-formed XML: {}", e)))?;

    let root = document.root_element();
    if root.tag_name().name().eq_ignore_ascii_case("sitemapindex") {
        return Ok(SitemapParseResult {
            kind: SitemapKind::Index,
            urls: collect_locs(root, "sitemap"),
        });
    }

    let urls = collect_locs(root, "url");
    if urls.is_empty() {
        return Err(AuditError::ParseFailure(format!(
            "<{}> document contains no <url><loc> entries",
            root.tag_name().name()
        )));
    }

    Ok(SitemapParseResult {
        kind: SitemapKind::Urlset,
        urls,
    })
}

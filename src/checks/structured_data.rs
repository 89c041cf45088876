//! Machine-readable metadata checks: schema.org types and Open Graph tags

use crate::checks::PageDocument;
use crate::findings::{CheckName, DataValue, Finding, FindingData};
use scraper::{ElementRef, Selector};
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::LazyLock;

/// Open Graph properties every shareable page should declare
pub const OPEN_GRAPH_PROPERTIES: [&str; 3] = ["og:title", "og:description", "og:image"];

static SCRIPT_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("script[type]").expect("static selector"));

static ITEMTYPE_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("[itemtype]").expect("static selector"));

/// Adds every `@type` found anywhere in a JSON-LD value
fn collect_json_ld_types(value: &Value, types: &mut BTreeSet<String>) {
    match value {
        Value::Object(map) => {
            match map.get("@type") {
                Some(Value::String(name)) => {
                    types.insert(name.trim().to_string());
                }
                Some(Value::Array(names)) => {
                    for name in names.iter().filter_map(Value::as_str) {
                        types.insert(name.trim().to_string());
                    }
                }
                _ => {}
            }
            for (key, nested) in map {
                if key != "@type" {
                    collect_json_ld_types(nested, types);
                }
            }
        }
        Value::Array(items) => {
            for item in items {
                collect_json_ld_types(item, types);
            }
        }
        _ => {}
    }
}

/// `<script type="application/ld+json">` elements, in document order
fn json_ld_blocks(doc: &PageDocument) -> impl Iterator<Item = ElementRef<'_>> {
    doc.html().select(&SCRIPT_SELECTOR).filter(|script| {
        script
            .value()
            .attr("type")
            .is_some_and(|t| t.trim().eq_ignore_ascii_case("application/ld+json"))
    })
}

/// Schema type names declared on the page, from JSON-LD and microdata
///
/// JSON-LD blocks that fail to parse are skipped.
pub fn detect_schema_types(doc: &PageDocument) -> BTreeSet<String> {
    let mut types = BTreeSet::new();

    for script in json_ld_blocks(doc) {
        let source: String = script.text().collect();
        match serde_json::from_str::<Value>(&source) {
            Ok(value) => collect_json_ld_types(&value, &mut types),
            Err(e) => {
                tracing::debug!("Skipping malformed JSON-LD block: {}", e);
            }
        }
    }

    for element in doc.html().select(&ITEMTYPE_SELECTOR) {
        let Some(itemtype) = element.value().attr("itemtype") else {
            continue;
        };
        for type_url in itemtype.split_whitespace() {
            if let Some(name) = type_url.trim_end_matches('/').rsplit('/').next() {
                types.insert(name.to_string());
            }
        }
    }

    types.retain(|name| !name.is_empty());
    types
}

/// Schema Markup: passes when at least one structured data type is declared
pub fn check_schema_markup(doc: &PageDocument) -> Finding {
    let types = detect_schema_types(doc);

    if types.is_empty() {
        return Finding::fail(
            CheckName::SchemaMarkup,
            format!(
                "0 structured data types detected ({} JSON-LD blocks, {} itemtype attributes scanned).",
                json_ld_blocks(doc).count(),
                doc.html().select(&ITEMTYPE_SELECTOR).count()
            ),
        );
    }

    let names: Vec<String> = types.into_iter().collect();
    Finding::pass(
        CheckName::SchemaMarkup,
        format!(
            "Found {} structured data type(s): {}.",
            names.len(),
            names.join(", ")
        ),
    )
    .with_data(FindingData::List(names))
}

/// Open Graph Tags: all of title, description, and image should be present
pub fn check_open_graph_tags(doc: &PageDocument) -> Finding {
    let mut table = BTreeMap::new();
    let mut missing = Vec::new();

    for property in OPEN_GRAPH_PROPERTIES {
        let content = doc
            .meta_content("property", property)
            .or_else(|| doc.meta_content("name", property));
        match content {
            Some(content) => {
                table.insert(property.to_string(), DataValue::Text(content));
            }
            None => missing.push(property.to_string()),
        }
    }

    let present = OPEN_GRAPH_PROPERTIES.len() - missing.len();
    let finding = match present {
        0 => Finding::fail(
            CheckName::OpenGraphTags,
            format!("0 of 3 core Open Graph tags present; missing {}.", missing.join(", ")),
        ),
        3 => Finding::pass(
            CheckName::OpenGraphTags,
            format!("{} of 3 core Open Graph tags present.", present),
        ),
        _ => Finding::warning(
            CheckName::OpenGraphTags,
            format!(
                "{} of 3 core Open Graph tags present; missing {}.",
                present,
                missing.join(", ")
            ),
        ),
    };

    if !missing.is_empty() {
        table.insert("missing".to_string(), DataValue::List(missing));
    }

    finding.with_data(FindingData::Table(table))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::findings::CheckStatus;
    use url::Url;

    fn doc(head: &str, body: &str) -> PageDocument {
        let markup = format!("<html><head>{}</head><body>{}</body></html>", head, body);
        PageDocument::parse(&markup, Url::parse("https://example.com/").unwrap())
    }

    #[test]
    fn test_no_schema_fails() {
        assert_eq!(check_schema_markup(&doc("", "")).status, CheckStatus::Fail);
    }

    #[test]
    fn test_json_ld_types_including_graph() {
        let head = r#"<script type="application/ld+json">
            {"@context":"https://schema.org","@graph":[
                {"@type":"Organization","name":"Acme"},
                {"@type":["WebPage","FAQPage"]}
            ]}
        </script>"#;
        let types = detect_schema_types(&doc(head, ""));
        let names: Vec<_> = types.into_iter().collect();
        assert_eq!(names, vec!["FAQPage", "Organization", "WebPage"]);
    }

    #[test]
    fn test_malformed_json_ld_skipped_silently() {
        let head = r#"
            <script type="application/ld+json">{ not json</script>
            <script type="application/ld+json">{"@type":"Article"}</script>
        "#;
        let finding = check_schema_markup(&doc(head, ""));
        assert_eq!(finding.status, CheckStatus::Pass);
        assert_eq!(finding.data, Some(FindingData::List(vec!["Article".to_string()])));
    }

    #[test]
    fn test_malformed_only_fails() {
        let head = r#"<script type="application/ld+json">{ not json</script>"#;
        assert_eq!(check_schema_markup(&doc(head, "")).status, CheckStatus::Fail);
    }

    #[test]
    fn test_microdata_itemtype() {
        let body = r#"<div itemscope itemtype="https://schema.org/Product"><span itemprop="name">X</span></div>
                      <div itemscope itemtype="http://schema.org/Offer/">Y</div>"#;
        let types = detect_schema_types(&doc("", body));
        assert!(types.contains("Product"));
        assert!(types.contains("Offer"));
    }

    #[test]
    fn test_union_of_both_channels_dedupes() {
        let head = r#"<script type="application/ld+json">{"@type":"Product"}</script>"#;
        let body = r#"<div itemscope itemtype="https://schema.org/Product"></div>"#;
        let finding = check_schema_markup(&doc(head, body));
        assert_eq!(finding.data, Some(FindingData::List(vec!["Product".to_string()])));
    }

    #[test]
    fn test_open_graph_none() {
        assert_eq!(check_open_graph_tags(&doc("", "")).status, CheckStatus::Fail);
    }

    #[test]
    fn test_open_graph_partial() {
        let head = r#"<meta property="og:title" content="T"><meta property="og:image" content="/i.png">"#;
        let finding = check_open_graph_tags(&doc(head, ""));
        assert_eq!(finding.status, CheckStatus::Warning);
        assert!(finding.message.contains("og:description"));
    }

    #[test]
    fn test_open_graph_complete() {
        let head = r#"
            <meta property="og:title" content="T">
            <meta property="og:description" content="D">
            <meta property="og:image" content="https://example.com/i.png">
        "#;
        assert_eq!(check_open_graph_tags(&doc(head, "")).status, CheckStatus::Pass);
    }

    #[test]
    fn test_no_schema_reports_scanned_blocks() {
        let head = r#"<script type="application/ld+json">{ not json</script>"#;
        let finding = check_schema_markup(&doc(head, ""));
        assert_eq!(finding.status, CheckStatus::Fail);
        assert!(
            finding.message.contains("1 JSON-LD blocks, 0 itemtype attributes"),
            "{}",
            finding.message
        );
    }

    #[test]
    fn test_open_graph_counts_in_message() {
        let none = check_open_graph_tags(&doc("", ""));
        assert_eq!(none.status, CheckStatus::Fail);
        assert!(none.message.starts_with("0 of 3"), "{}", none.message);
        assert!(none.message.contains("og:title, og:description, og:image"));

        let head = r#"
            <meta property="og:title" content="T">
            <meta property="og:description" content="D">
            <meta property="og:image" content="https://example.com/i.png">
        "#;
        let all = check_open_graph_tags(&doc(head, ""));
        assert_eq!(all.message, "3 of 3 core Open Graph tags present.");
    }
}

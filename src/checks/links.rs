//! Linking profile check

use crate::checks::{element_text, PageDocument};
use crate::findings::{AnchorRecord, CheckName, DataValue, Finding, FindingData, LinkRel};
use crate::url::{is_same_host, resolve_href};
use scraper::Selector;
use std::collections::{BTreeMap, HashSet};
use std::sync::LazyLock;

static ANCHOR_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a[href]").expect("static selector"));

/// Counts produced by [`collect_anchors`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkCounts {
    pub internal: usize,
    pub external: usize,
    pub nofollow: usize,
}

/// Collects unique anchors, resolved against the page base
///
/// Fragment-only, `mailto:` and `tel:` links are skipped. Anchors are
/// deduplicated by resolved href; the first occurrence wins.
pub fn collect_anchors(doc: &PageDocument) -> Vec<AnchorRecord> {
    let mut seen = HashSet::new();
    let mut anchors = Vec::new();

    for anchor in doc.html().select(&ANCHOR_SELECTOR) {
        let Some(resolved) = anchor
            .value()
            .attr("href")
            .and_then(|href| resolve_href(href, doc.base()))
        else {
            continue;
        };

        let href = resolved.to_string();
        if !seen.insert(href.clone()) {
            continue;
        }

        let nofollow = anchor.value().attr("rel").is_some_and(|rel| {
            rel.split_whitespace()
                .any(|token| token.eq_ignore_ascii_case("nofollow"))
        });

        anchors.push(AnchorRecord {
            text: element_text(&anchor),
            is_internal: is_same_host(&resolved, doc.base()),
            href,
            rel: if nofollow {
                LinkRel::Nofollow
            } else {
                LinkRel::Dofollow
            },
        });
    }

    anchors
}

/// Tallies internal, external, and nofollow anchors
pub fn count_links(anchors: &[AnchorRecord]) -> LinkCounts {
    anchors.iter().fold(LinkCounts::default(), |mut counts, anchor| {
        if anchor.is_internal {
            counts.internal += 1;
        } else {
            counts.external += 1;
        }
        if anchor.rel == LinkRel::Nofollow {
            counts.nofollow += 1;
        }
        counts
    })
}

/// Linking Profile: never fails; passes with both internal and external links
pub fn check_linking_profile(doc: &PageDocument) -> Finding {
    let anchors = collect_anchors(doc);
    let counts = count_links(&anchors);
    let total = anchors.len();

    let mut table = BTreeMap::new();
    table.insert("internal".to_string(), DataValue::Count(counts.internal));
    table.insert("external".to_string(), DataValue::Count(counts.external));
    table.insert("nofollow".to_string(), DataValue::Count(counts.nofollow));
    table.insert("links".to_string(), DataValue::Anchors(anchors));

    let summary = format!(
        "{} internal, {} external, {} nofollow",
        counts.internal, counts.external, counts.nofollow
    );

    let finding = if total == 0 {
        Finding::warning(
            CheckName::LinkingProfile,
            format!(
                "No crawlable links found ({} <a href> elements scanned, 0 usable).",
                doc.html().select(&ANCHOR_SELECTOR).count()
            ),
        )
    } else if counts.external == 0 {
        Finding::warning(
            CheckName::LinkingProfile,
            format!(
                "No external links ({}); citing sources helps answer engines trust the content.",
                summary
            ),
        )
    } else if counts.internal == 0 {
        Finding::warning(
            CheckName::LinkingProfile,
            format!("No internal links ({}); link to related pages on this site.", summary),
        )
    } else {
        Finding::pass(CheckName::LinkingProfile, format!("Healthy link mix: {}.", summary))
    };

    finding.with_data(FindingData::Table(table))
}

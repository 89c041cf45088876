//! Heading checks: the single H1 rule and overall heading hierarchy

use crate::checks::{char_len, element_text, PageDocument};
use crate::findings::{CheckName, DataValue, Finding, FindingData};
use scraper::Selector;
use std::collections::BTreeMap;
use std::sync::LazyLock;

/// Pages with more body text than this should be broken up with H2 sections
pub const LONG_PAGE_CHARS: usize = 1500;

static HEADING_SELECTORS: LazyLock<[Selector; 6]> = LazyLock::new(|| {
    ["h1", "h2", "h3", "h4", "h5", "h6"].map(|tag| Selector::parse(tag).expect("static selector"))
});

/// Text of every heading at `level` (1-6), in document order
fn heading_texts(doc: &PageDocument, level: usize) -> Vec<String> {
    doc.html()
        .select(&HEADING_SELECTORS[level - 1])
        .map(|heading| element_text(&heading))
        .collect()
}

/// H1 Tag: passes only with exactly one H1
pub fn check_h1_tag(doc: &PageDocument) -> Finding {
    let h1s = heading_texts(doc, 1);

    match h1s.len() {
        0 => Finding::fail(
            CheckName::H1Tag,
            format!(
                "Found 0 H1 tags among {} headings; every page needs one main heading.",
                (2..=6).map(|level| heading_texts(doc, level).len()).sum::<usize>()
            ),
        ),
        1 => Finding::pass(
            CheckName::H1Tag,
            format!("Exactly one H1 tag found ({} characters).", char_len(&h1s[0])),
        )
        .with_data(FindingData::List(h1s)),
        count => Finding::fail(
            CheckName::H1Tag,
            format!("Found {} H1 tags; use exactly one per page.", count),
        )
        .with_data(FindingData::List(h1s)),
    }
}

/// Heading Structure: one H1, and H2 sections on long pages
pub fn check_heading_structure(doc: &PageDocument) -> Finding {
    let counts: Vec<usize> = (1..=6)
        .map(|level| doc.html().select(&HEADING_SELECTORS[level - 1]).count())
        .collect();
    let (h1_count, h2_count) = (counts[0], counts[1]);
    let body_length = char_len(&doc.body_text());

    let mut table = BTreeMap::new();
    for (index, count) in counts.iter().enumerate() {
        table.insert(format!("h{}", index + 1), DataValue::Count(*count));
    }
    table.insert("bodyTextLength".to_string(), DataValue::Count(body_length));

    let finding = if h1_count != 1 {
        Finding::fail(
            CheckName::HeadingStructure,
            format!(
                "Heading hierarchy has {} H1 tags and {} H2 tags; it should start from exactly one H1.",
                h1_count, h2_count
            ),
        )
    } else if h2_count == 0 && body_length > LONG_PAGE_CHARS {
        Finding::warning(
            CheckName::HeadingStructure,
            format!(
                "Page has {} characters of text but no H2 subheadings; add sections so answer engines can extract them.",
                body_length
            ),
        )
    } else {
        Finding::pass(
            CheckName::HeadingStructure,
            format!(
                "Heading hierarchy has one H1 and {} H2 tags over {} characters of text.",
                h2_count, body_length
            ),
        )
    };

    finding.with_data(FindingData::Table(table))
}

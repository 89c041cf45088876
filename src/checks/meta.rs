//! Head metadata checks: title, description, canonical link, robots directives

use crate::checks::{char_len, collapse_whitespace, PageDocument};
use crate::findings::{CheckName, Finding, FindingData};
use scraper::Selector;
use std::sync::LazyLock;

/// Titles longer than this are truncated in search results
pub const TITLE_MAX_CHARS: usize = 60;

/// Recommended description length range (inclusive)
pub const DESCRIPTION_MIN_CHARS: usize = 70;
pub const DESCRIPTION_MAX_CHARS: usize = 160;

static TITLE_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("title").expect("static selector"));

static LINK_REL_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("link[rel][href]").expect("static selector"));

/// Meta Title: fails when absent, warns above 60 characters
pub fn check_meta_title(doc: &PageDocument) -> Finding {
    let title_tags: Vec<_> = doc.html().select(&TITLE_SELECTOR).collect();
    let title = title_tags
        .first()
        .map(|element| collapse_whitespace(&element.text().collect::<String>()))
        .filter(|title| !title.is_empty());

    let Some(title) = title else {
        return Finding::fail(
            CheckName::MetaTitle,
            format!(
                "No title text found ({} <title> elements, 0 characters of title text).",
                title_tags.len()
            ),
        );
    };

    let length = char_len(&title);
    let finding = if length > TITLE_MAX_CHARS {
        Finding::warning(
            CheckName::MetaTitle,
            format!(
                "Title is {} characters long; keep it to {} or fewer to avoid truncation.",
                length, TITLE_MAX_CHARS
            ),
        )
    } else {
        Finding::pass(
            CheckName::MetaTitle,
            format!("Title is {} characters long.", length),
        )
    };

    finding.with_data(FindingData::Text(title))
}

/// Meta Description: fails when absent, warns outside 70–160 characters
pub fn check_meta_description(doc: &PageDocument) -> Finding {
    let Some(description) = doc.meta_content("name", "description") else {
        return Finding::fail(
            CheckName::MetaDescription,
            format!(
                "No meta description found ({} <meta> tags scanned, 0 characters of description).",
                doc.meta_tag_count()
            ),
        );
    };

    let length = char_len(&description);
    let finding = if length < DESCRIPTION_MIN_CHARS {
        Finding::warning(
            CheckName::MetaDescription,
            format!(
                "Meta description is {} characters long; aim for at least {}.",
                length, DESCRIPTION_MIN_CHARS
            ),
        )
    } else if length > DESCRIPTION_MAX_CHARS {
        Finding::warning(
            CheckName::MetaDescription,
            format!(
                "Meta description is {} characters long; keep it to {} or fewer.",
                length, DESCRIPTION_MAX_CHARS
            ),
        )
    } else {
        Finding::pass(
            CheckName::MetaDescription,
            format!("Meta description is {} characters long.", length),
        )
    };

    finding.with_data(FindingData::Text(description))
}

/// Canonical Tag: passes when a canonical link is declared
///
/// The target is reported but not compared with the page URL.
pub fn check_canonical_tag(doc: &PageDocument) -> Finding {
    let canonical = doc
        .html()
        .select(&LINK_REL_SELECTOR)
        .filter(|link| {
            link.value().attr("rel").is_some_and(|rel| {
                rel.split_whitespace()
                    .any(|token| token.eq_ignore_ascii_case("canonical"))
            })
        })
        .filter_map(|link| link.value().attr("href"))
        .map(str::trim)
        .find(|href| !href.is_empty());

    match canonical {
        Some(href) => {
            let target = doc
                .base()
                .join(href)
                .map(|url| url.to_string())
                .unwrap_or_else(|_| href.to_string());
            Finding::pass(
                CheckName::CanonicalTag,
                format!("Canonical URL declared ({} characters).", char_len(&target)),
            )
            .with_data(FindingData::Text(target))
        }
        None => Finding::fail(
            CheckName::CanonicalTag,
            format!(
                "No canonical link element found among {} <link> elements; duplicate URLs may split ranking signals.",
                doc.html().select(&LINK_REL_SELECTOR).count()
            ),
        ),
    }
}

/// Meta Robots: fails on `noindex`, warns on `nofollow`
pub fn check_meta_robots(doc: &PageDocument) -> Finding {
    let Some(content) = doc.meta_content("name", "robots") else {
        return Finding::pass(
            CheckName::MetaRobots,
            format!(
                "No meta robots tag among {} <meta> tags; the page is indexable by default.",
                doc.meta_tag_count()
            ),
        );
    };

    let directives = content.to_ascii_lowercase();
    let finding = if directives.contains("noindex") {
        Finding::fail(
            CheckName::MetaRobots,
            format!(
                "Meta robots '{}' blocks indexing of this page.",
                content
            ),
        )
    } else if directives.contains("nofollow") {
        Finding::warning(
            CheckName::MetaRobots,
            format!(
                "Meta robots '{}' tells crawlers not to follow links on this page.",
                content
            ),
        )
    } else {
        Finding::pass(
            CheckName::MetaRobots,
            format!("Meta robots '{}' allows indexing and link following.", content),
        )
    };

    finding.with_data(FindingData::Text(content))
}

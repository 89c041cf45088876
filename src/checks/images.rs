//! Image alt text check

use crate::checks::PageDocument;
use crate::findings::{CheckName, DataValue, Finding, FindingData};
use scraper::{ElementRef, Selector};
use std::collections::{BTreeMap, HashSet};
use std::sync::LazyLock;

static IMG_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("img").expect("static selector"));

/// Returns true for a `width`/`height` attribute value of one pixel
fn is_one_pixel(value: Option<&str>) -> bool {
    value.is_some_and(|v| {
        let v = v.trim();
        let v = v.strip_suffix("px").unwrap_or(v).trim();
        v == "1"
    })
}

/// Returns true if the image is hidden by inline style or the `hidden` attribute
fn is_hidden(img: &ElementRef<'_>) -> bool {
    if img.value().attr("hidden").is_some() {
        return true;
    }

    img.value().attr("style").is_some_and(|style| {
        style.split(';').any(|declaration| {
            let Some((property, value)) = declaration.split_once(':') else {
                return false;
            };
            property.trim().eq_ignore_ascii_case("display")
                && value
                    .trim()
                    .trim_end_matches("!important")
                    .trim()
                    .eq_ignore_ascii_case("none")
        })
    })
}

/// Collects images that count towards the alt text ratio
///
/// Tracking pixels, inline data URIs, hidden images, and repeats of an
/// already-seen source are excluded. Returns `(resolved source, has_alt)` pairs.
fn qualifying_images(doc: &PageDocument) -> Vec<(String, bool)> {
    let mut seen = HashSet::new();
    let mut images = Vec::new();

    for img in doc.html().select(&IMG_SELECTOR) {
        let Some(src) = img.value().attr("src").map(str::trim).filter(|s| !s.is_empty()) else {
            continue;
        };

        // Matched on the raw attribute so the page's own host and path never match
        let lower = src.to_ascii_lowercase();
        if lower.starts_with("data:") || lower.contains("pixel") {
            continue;
        }

        if is_one_pixel(img.value().attr("width")) && is_one_pixel(img.value().attr("height")) {
            continue;
        }

        if is_hidden(&img) {
            continue;
        }

        let resolved = doc
            .base()
            .join(src)
            .map(|url| url.to_string())
            .unwrap_or_else(|_| src.to_string());

        if !seen.insert(resolved.clone()) {
            continue;
        }

        let has_alt = img
            .value()
            .attr("alt")
            .is_some_and(|alt| !alt.trim().is_empty());
        images.push((resolved, has_alt));
    }

    images
}

/// Image Alt Text: fails when half or more of the images lack alt text
pub fn check_image_alt_text(doc: &PageDocument) -> Finding {
    let images = qualifying_images(doc);
    let total = images.len();

    if total == 0 {
        let scanned = doc.html().select(&IMG_SELECTOR).count();
        return Finding::pass(
            CheckName::ImageAltText,
            format!("No qualifying images found ({} <img> elements scanned).", scanned),
        );
    }

    let missing: Vec<String> = images
        .into_iter()
        .filter(|(_, has_alt)| !has_alt)
        .map(|(src, _)| src)
        .collect();
    let missing_count = missing.len();
    let percent = (missing_count as f64 * 100.0 / total as f64).round();

    let mut table = BTreeMap::new();
    table.insert("qualifyingImages".to_string(), DataValue::Count(total));
    table.insert("missingAlt".to_string(), DataValue::Count(missing_count));
    table.insert("missingPercent".to_string(), DataValue::Percent(percent));
    table.insert("missingSources".to_string(), DataValue::List(missing));

    let finding = if missing_count == 0 {
        Finding::pass(
            CheckName::ImageAltText,
            format!("All {} images have alt text.", total),
        )
    } else if missing_count * 2 >= total {
        Finding::fail(
            CheckName::ImageAltText,
            format!(
                "{} of {} images ({}%) are missing alt text.",
                missing_count, total, percent
            ),
        )
    } else {
        Finding::warning(
            CheckName::ImageAltText,
            format!(
                "{} of {} images ({}%) are missing alt text.",
                missing_count, total, percent
            ),
        )
    };

    finding.with_data(FindingData::Table(table))
}

//! Weighted SEO and GEO scores
//!
//! Each score is a weighted percentage over the findings whose check appears
//! in that score's weight table. Checks missing from a table do not affect it.

use crate::findings::{CheckName, CheckStatus, Finding};

/// A check and its positive weight
pub type Weight = (CheckName, u32);

/// Weights for classic search engine optimization
pub const SEO_WEIGHTS: &[Weight] = &[
    (CheckName::MetaTitle, 15),
    (CheckName::MetaDescription, 10),
    (CheckName::H1Tag, 10),
    (CheckName::HeadingStructure, 5),
    (CheckName::CanonicalTag, 10),
    (CheckName::MetaRobots, 15),
    (CheckName::ImageAltText, 10),
    (CheckName::LinkingProfile, 5),
    (CheckName::OpenGraphTags, 5),
];

/// Weights for generative engine optimization; favors extractable structure
pub const GEO_WEIGHTS: &[Weight] = &[
    (CheckName::MetaTitle, 5),
    (CheckName::MetaDescription, 10),
    (CheckName::H1Tag, 10),
    (CheckName::HeadingStructure, 20),
    (CheckName::ImageAltText, 5),
    (CheckName::LinkingProfile, 15),
    (CheckName::SchemaMarkup, 25),
    (CheckName::OpenGraphTags, 10),
];

/// Score contribution of a status
pub fn status_multiplier(status: CheckStatus) -> f64 {
    match status {
        CheckStatus::Pass => 1.0,
        CheckStatus::Warning => 0.5,
        CheckStatus::Fail => 0.0,
    }
}

/// Computes a 0–100 score for `findings` under `weights`
///
/// Returns 0 when no finding has a weight in the table.
pub fn weighted_score(findings: &[Finding], weights: &[Weight]) -> u8 {
    let (earned, possible) = findings.iter().fold((0.0, 0u32), |(earned, possible), finding| {
        match weights.iter().find(|(name, _)| *name == finding.check_name) {
            Some((_, weight)) => (
                earned + *weight as f64 * status_multiplier(finding.status),
                possible + weight,
            ),
            None => (earned, possible),
        }
    });

    if possible == 0 {
        return 0;
    }

    (100.0 * earned / possible as f64).round().clamp(0.0, 100.0) as u8
}

/// Computes `(seo, geo)` scores
pub fn compute_scores(findings: &[Finding]) -> (u8, u8) {
    (
        weighted_score(findings, SEO_WEIGHTS),
        weighted_score(findings, GEO_WEIGHTS),
    )
}

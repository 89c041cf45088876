//! Audit findings and per-page reports
//!
//! A [`Finding`] is the outcome of one check. An [`AuditReport`] holds one
//! page's findings in canonical display order together with its scores.

use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// Identifier of a check
///
/// The ten audit checks plus `PageFetch`, which only appears in degraded
/// reports for pages that could not be retrieved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum CheckName {
    #[serde(rename = "Meta Title")]
    MetaTitle,
    #[serde(rename = "Meta Description")]
    MetaDescription,
    #[serde(rename = "H1 Tag")]
    H1Tag,
    #[serde(rename = "Heading Structure")]
    HeadingStructure,
    #[serde(rename = "Canonical Tag")]
    CanonicalTag,
    #[serde(rename = "Meta Robots")]
    MetaRobots,
    #[serde(rename = "Image Alt Text")]
    ImageAltText,
    #[serde(rename = "Linking Profile")]
    LinkingProfile,
    #[serde(rename = "Schema Markup")]
    SchemaMarkup,
    #[serde(rename = "Open Graph Tags")]
    OpenGraphTags,
    #[serde(rename = "Page Fetch")]
    PageFetch,
}

impl CheckName {
    /// The ten audit checks in display order
    pub const CANONICAL_ORDER: [CheckName; 10] = [
        CheckName::MetaTitle,
        CheckName::MetaDescription,
        CheckName::H1Tag,
        CheckName::HeadingStructure,
        CheckName::CanonicalTag,
        CheckName::MetaRobots,
        CheckName::ImageAltText,
        CheckName::LinkingProfile,
        CheckName::SchemaMarkup,
        CheckName::OpenGraphTags,
    ];

    /// Human-readable name, as shown in reports
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MetaTitle => "Meta Title",
            Self::MetaDescription => "Meta Description",
            Self::H1Tag => "H1 Tag",
            Self::HeadingStructure => "Heading Structure",
            Self::CanonicalTag => "Canonical Tag",
            Self::MetaRobots => "Meta Robots",
            Self::ImageAltText => "Image Alt Text",
            Self::LinkingProfile => "Linking Profile",
            Self::SchemaMarkup => "Schema Markup",
            Self::OpenGraphTags => "Open Graph Tags",
            Self::PageFetch => "Page Fetch",
        }
    }

    /// Position in the canonical display order; `PageFetch` sorts last
    pub fn display_rank(&self) -> usize {
        Self::CANONICAL_ORDER
            .iter()
            .position(|name| name == self)
            .unwrap_or(Self::CANONICAL_ORDER.len())
    }
}

impl fmt::Display for CheckName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Severity tier of a finding, ordered from best to worst
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum CheckStatus {
    Pass,
    Warning,
    Fail,
}

impl CheckStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pass => "Pass",
            Self::Warning => "Warning",
            Self::Fail => "Fail",
        }
    }
}

impl fmt::Display for CheckStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether a link passes ranking signals
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkRel {
    Dofollow,
    Nofollow,
}

/// One anchor collected by the linking profile check
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnchorRecord {
    /// Visible anchor text, whitespace-collapsed
    pub text: String,
    /// Absolute href after resolution against the page base
    pub href: String,
    pub is_internal: bool,
    #[serde(rename = "type")]
    pub rel: LinkRel,
}

/// A named value inside a [`FindingData::Table`]
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum DataValue {
    Text(String),
    Count(usize),
    Percent(f64),
    List(Vec<String>),
    Anchors(Vec<AnchorRecord>),
}

/// Evidence attached to a finding
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "camelCase")]
pub enum FindingData {
    Text(String),
    List(Vec<String>),
    Table(BTreeMap<String, DataValue>),
}

/// Outcome of one check on one page
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Finding {
    pub check_name: CheckName,
    pub status: CheckStatus,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<FindingData>,
}

impl Finding {
    pub fn new(check_name: CheckName, status: CheckStatus, message: impl Into<String>) -> Self {
        Self {
            check_name,
            status,
            message: message.into(),
            data: None,
        }
    }

    pub fn pass(check_name: CheckName, message: impl Into<String>) -> Self {
        Self::new(check_name, CheckStatus::Pass, message)
    }

    pub fn warning(check_name: CheckName, message: impl Into<String>) -> Self {
        Self::new(check_name, CheckStatus::Warning, message)
    }

    pub fn fail(check_name: CheckName, message: impl Into<String>) -> Self {
        Self::new(check_name, CheckStatus::Fail, message)
    }

    /// Attaches an evidence payload
    pub fn with_data(mut self, data: FindingData) -> Self {
        self.data = Some(data);
        self
    }

    pub fn is_pass(&self) -> bool {
        self.status == CheckStatus::Pass
    }
}

/// One page's audit outcome
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditReport {
    /// The URL string exactly as it was requested
    pub id: String,
    /// The resolved URL after redirects
    pub url: String,
    pub findings: Vec<Finding>,
    pub seo_score: u8,
    pub geo_score: u8,
}

impl AuditReport {
    /// Builds a report for a page that could not be audited
    ///
    /// The report carries a single failing `Page Fetch` finding and zero scores.
    pub fn degraded(id: impl Into<String>, url: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            url: url.into(),
            findings: vec![Finding::fail(CheckName::PageFetch, message)],
            seo_score: 0,
            geo_score: 0,
        }
    }

    /// Returns true if this report came from a failed fetch
    pub fn is_degraded(&self) -> bool {
        self.findings
            .iter()
            .any(|finding| finding.check_name == CheckName::PageFetch)
    }

    /// Looks up the finding for a check
    pub fn finding(&self, name: CheckName) -> Option<&Finding> {
        self.findings.iter().find(|finding| finding.check_name == name)
    }

    /// Warning and failing findings, in display order
    pub fn issues(&self) -> impl Iterator<Item = &Finding> {
        self.findings.iter().filter(|finding| !finding.is_pass())
    }
}

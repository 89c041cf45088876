use crate::UrlError;
use url::Url;

/// Schemes whose links never point at a crawlable page
const SKIPPED_SCHEMES: &[&str] = &["mailto:", "tel:", "javascript:", "data:"];

/// Parses an operator-supplied target URL
///
/// Surrounding whitespace is ignored and a bare host such as `example.com`
/// is treated as `https://example.com`. Only HTTP(S) URLs with a host are
/// accepted.
///
/// # Examples
///
/// ```
/// use geo_audit::url::parse_target_url;
///
/// let url = parse_target_url("  example.com/about ").unwrap();
/// assert_eq!(url.as_str(), "https://example.com/about");
/// ```
pub fn parse_target_url(input: &str) -> Result<Url, UrlError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(UrlError::Parse("empty URL".to_string()));
    }

    let url = match Url::parse(input) {
        Ok(url) => url,
        Err(url::ParseError::RelativeUrlWithoutBase) => Url::parse(&format!("https://{}", input))
            .map_err(|e| UrlError::Parse(format!("{}: {}", input, e)))?,
        Err(e) => return Err(UrlError::Parse(format!("{}: {}", input, e))),
    };

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(format!(
            "Only HTTP and HTTPS schemes are supported, got: {}",
            url.scheme()
        )));
    }

    if url.host_str().map_or(true, str::is_empty) {
        return Err(UrlError::MissingDomain);
    }

    Ok(url)
}

/// Returns true for hrefs that never resolve to a page: empty, fragment-only,
/// or a non-navigational scheme
pub fn is_skipped_href(href: &str) -> bool {
    let href = href.trim();
    if href.is_empty() || href.starts_with('#') {
        return true;
    }

    let lower = href.to_ascii_lowercase();
    SKIPPED_SCHEMES.iter().any(|scheme| lower.starts_with(scheme))
}

/// Resolves an href against the document base URL
///
/// Returns None if the link should be excluded:
/// - empty or fragment-only hrefs
/// - mailto:, tel:, javascript:, data: schemes
/// - invalid URLs
/// - non-HTTP(S) URLs after resolution
pub fn resolve_href(href: &str, base: &Url) -> Option<Url> {
    if is_skipped_href(href) {
        return None;
    }

    match base.join(href.trim()) {
        Ok(absolute) if absolute.scheme() == "http" || absolute.scheme() == "https" => {
            Some(absolute)
        }
        _ => None,
    }
}

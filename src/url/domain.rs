use url::Url;

/// Extracts the lowercase hostname from a URL
///
/// Returns `None` for URLs without a host (e.g. `mailto:` or `data:` URLs).
///
/// # Examples
///
/// ```
/// use url::Url;
/// use geo_audit::url::extract_domain;
///
/// let url = Url::parse("https://EXAMPLE.COM/path").unwrap();
/// assert_eq!(extract_domain(&url), Some("example.com".to_string()));
/// ```
pub fn extract_domain(url: &Url) -> Option<String> {
    url.host_str().map(|h| h.to_lowercase())
}

/// Returns true if both URLs share the same hostname
///
/// Ports and schemes are ignored; `www.` is significant.
pub fn is_same_host(a: &Url, b: &Url) -> bool {
    match (extract_domain(a), extract_domain(b)) {
        (Some(left), Some(right)) => left == right,
        _ => false,
    }
}

//! Integration tests for page audits
//!
//! These tests use wiremock to stand in for both content relays and drive
//! single-page audits, batches, and crawls end-to-end.

use geo_audit::audit::{silent_progress, ProgressCallback};
use geo_audit::config::{Config, RetryConfig};
use geo_audit::{AuditError, AuditOutcome, AuditRequest, Auditor, CancelToken, CheckName, CheckStatus};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

const FULL_PAGE: &str = r#"<!DOCTYPE html>
<html>
<head>
    <title>Example Widgets - Handmade widgets since 1999</title>
    <meta name="description" content="Example Widgets builds handmade widgets for collectors, with free shipping on every order over fifty dollars in the US.">
    <link rel="canonical" href="https://example.com/">
    <meta name="robots" content="index, follow">
    <meta property="og:title" content="Example Widgets">
    <meta property="og:description" content="Handmade widgets">
    <meta property="og:image" content="https://example.com/og.png">
    <script type="application/ld+json">{"@context":"https://schema.org","@type":"Organization","name":"Example Widgets"}</script>
</head>
<body>
    <h1>Handmade widgets</h1>
    <h2>Our workshop</h2>
    <p>Every widget is built by hand.</p>
    <img src="/workshop.jpg" alt="The workshop floor">
    <a href="/about">About us</a>
    <a href="https://partner.example.org/">Our partner</a>
</body>
</html>"#;

/// Creates a test configuration pointing both relays at the mock server
fn create_test_config(server: &MockServer) -> Config {
    let mut config = Config::default();
    config.relay.primary = format!("{}/primary", server.uri());
    config.relay.secondary = format!("{}/secondary", server.uri());
    config.relay.timeout_secs = 5;
    config.retry = RetryConfig {
        page_attempts: 2,
        page_delay_ms: 5,
        sitemap_attempts: 2,
        sitemap_backoff_ms: 5,
    };
    config
}

fn create_test_auditor(server: &MockServer) -> Auditor {
    Auditor::new(&create_test_config(server)).expect("Failed to build auditor")
}

/// Primary relay envelope for a fetched page
fn envelope(content: &str, final_url: &str, http_code: u16) -> Value {
    json!({
        "content": content,
        "status": { "url": final_url, "httpCode": http_code }
    })
}

fn recording_progress() -> (ProgressCallback, Arc<Mutex<Vec<String>>>) {
    let messages = Arc::new(Mutex::new(Vec::new()));
    let sink = messages.clone();
    let progress: ProgressCallback = Arc::new(move |message: &str| {
        sink.lock().unwrap().push(message.to_string());
    });
    (progress, messages)
}

#[tokio::test]
async fn test_single_page_via_primary_relay() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/primary"))
        .and(query_param("url", "https://example.com/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(
            FULL_PAGE,
            "https://example.com/",
            200,
        )))
        .expect(1)
        .mount(&server)
        .await;

    let auditor = create_test_auditor(&server);
    let report = auditor
        .audit("https://example.com/", &CancelToken::new())
        .await
        .unwrap();

    let names: Vec<_> = report.findings.iter().map(|f| f.check_name).collect();
    assert_eq!(names, CheckName::CANONICAL_ORDER.to_vec());
    assert!(!report.is_degraded());
    assert_eq!(report.id, "https://example.com/");
    assert_eq!(report.url, "https://example.com/");
    assert_eq!(
        report.finding(CheckName::SchemaMarkup).unwrap().status,
        CheckStatus::Pass
    );
    assert_eq!(
        report.finding(CheckName::LinkingProfile).unwrap().status,
        CheckStatus::Pass
    );
    assert!(report.seo_score > 0 && report.seo_score <= 100);
    assert!(report.geo_score > 0 && report.geo_score <= 100);
}

#[tokio::test]
async fn test_single_request_keeps_supplied_url_as_id() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/primary"))
        .and(query_param("url", "https://example.com/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(
            FULL_PAGE,
            "https://example.com/",
            200,
        )))
        .expect(2)
        .mount(&server)
        .await;

    let auditor = create_test_auditor(&server);
    let cancel = CancelToken::new();

    for supplied in ["https://Example.com", "example.com"] {
        let outcome = auditor
            .run_request(
                &AuditRequest::Single(format!("  {} ", supplied)),
                &silent_progress(),
                &cancel,
            )
            .await
            .unwrap();

        let AuditOutcome::Completed(reports) = outcome else {
            panic!("expected completed reports");
        };
        assert_eq!(reports[0].id, supplied);
        assert_eq!(reports[0].url, "https://example.com/");
        assert!(!reports[0].is_degraded());
    }
}

#[tokio::test]
async fn test_report_uses_final_url_after_redirect() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/primary"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(
            FULL_PAGE,
            "https://www.example.com/home",
            200,
        )))
        .mount(&server)
        .await;

    let auditor = create_test_auditor(&server);
    let report = auditor
        .audit("https://example.com/", &CancelToken::new())
        .await
        .unwrap();

    assert_eq!(report.id, "https://example.com/");
    assert_eq!(report.url, "https://www.example.com/home");
}

#[tokio::test]
async fn test_fallback_to_secondary_on_primary_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/primary"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/secondary"))
        .and(query_param("url", "https://example.com/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(FULL_PAGE))
        .expect(1)
        .mount(&server)
        .await;

    let auditor = create_test_auditor(&server);
    let report = auditor
        .audit("https://example.com/", &CancelToken::new())
        .await
        .unwrap();

    assert!(!report.is_degraded());
    assert_eq!(report.findings.len(), 10);
    assert_eq!(report.url, "https://example.com/");
}

#[tokio::test]
async fn test_fallback_to_secondary_on_null_content() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/primary"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "content": null,
            "status": { "url": "https://example.com/", "httpCode": 0 }
        })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/secondary"))
        .respond_with(ResponseTemplate::new(200).set_body_string(FULL_PAGE))
        .expect(1)
        .mount(&server)
        .await;

    let auditor = create_test_auditor(&server);
    let report = auditor
        .audit("https://example.com/", &CancelToken::new())
        .await
        .unwrap();

    assert!(!report.is_degraded());
}

#[tokio::test]
async fn test_both_relays_failing_yields_degraded_report() {
    let server = MockServer::start().await;

    // Two page attempts, each trying both relays
    Mock::given(method("GET"))
        .and(path("/primary"))
        .respond_with(ResponseTemplate::new(502))
        .expect(2)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/secondary"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string(r#"{"error":"Could not reach target"}"#),
        )
        .expect(2)
        .mount(&server)
        .await;

    let auditor = create_test_auditor(&server);
    let report = auditor
        .audit("https://unreachable.example/", &CancelToken::new())
        .await
        .unwrap();

    assert!(report.is_degraded());
    assert_eq!(report.findings.len(), 1);
    assert_eq!(report.findings[0].check_name, CheckName::PageFetch);
    assert_eq!(report.findings[0].status, CheckStatus::Fail);
    assert!(report.findings[0].message.contains("unreachable or blocked"));
    assert_eq!(report.seo_score, 0);
    assert_eq!(report.geo_score, 0);
}

#[tokio::test]
async fn test_origin_error_status_yields_degraded_report() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/primary"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(
            "<html><body>Not Found</body></html>",
            "https://example.com/missing",
            404,
        )))
        .mount(&server)
        .await;

    let auditor = create_test_auditor(&server);
    let report = auditor
        .audit("https://example.com/missing", &CancelToken::new())
        .await
        .unwrap();

    assert!(report.is_degraded());
    assert_eq!(report.findings.len(), 1);
    assert!(report.findings[0].message.contains("404"));
    assert_eq!((report.seo_score, report.geo_score), (0, 0));
}

#[tokio::test]
async fn test_custom_list_preserves_order_and_reports_progress() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/primary"))
        .respond_with(|request: &Request| {
            let target = request
                .url
                .query_pairs()
                .find(|(key, _)| key == "url")
                .map(|(_, value)| value.into_owned())
                .unwrap_or_default();
            ResponseTemplate::new(200).set_body_json(envelope(FULL_PAGE, &target, 200))
        })
        .mount(&server)
        .await;

    let auditor = create_test_auditor(&server);
    let (progress, messages) = recording_progress();
    let request = AuditRequest::Custom(vec![
        "https://example.com/a".to_string(),
        "".to_string(),
        "https://example.com/b".to_string(),
        "https://example.com/c".to_string(),
    ]);

    let outcome = auditor
        .run_request(&request, &progress, &CancelToken::new())
        .await
        .unwrap();

    let AuditOutcome::Completed(reports) = outcome else {
        panic!("expected completed reports");
    };
    let urls: Vec<_> = reports.iter().map(|r| r.url.as_str()).collect();
    assert_eq!(
        urls,
        vec![
            "https://example.com/a",
            "https://example.com/b",
            "https://example.com/c"
        ]
    );

    let messages = messages.lock().unwrap();
    assert_eq!(messages.len(), 3);
    assert!(messages.contains(&"Auditing page 1 of 3: https://example.com/a".to_string()));
    assert!(messages.contains(&"Auditing page 3 of 3: https://example.com/c".to_string()));
}

#[tokio::test]
async fn test_crawl_caps_at_twelve_pages() {
    let server = MockServer::start().await;

    let links: String = (0..20)
        .map(|i| format!(r#"<a href="/page{}">Page {}</a>"#, i, i))
        .collect();
    let homepage = format!(
        "<html><head><title>Home</title></head><body><h1>Home</h1>{}</body></html>",
        links
    );

    Mock::given(method("GET"))
        .and(path("/primary"))
        .and(query_param("url", "https://example.com/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(
            &homepage,
            "https://example.com/",
            200,
        )))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/primary"))
        .and(|request: &Request| {
            request
                .url
                .query_pairs()
                .any(|(key, value)| key == "url" && value.starts_with("https://example.com/page"))
        })
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(
            FULL_PAGE,
            "https://example.com/page",
            200,
        )))
        .mount(&server)
        .await;

    let auditor = create_test_auditor(&server);
    let (progress, messages) = recording_progress();
    let reports = auditor
        .crawl_and_audit("https://example.com/", &progress, &CancelToken::new())
        .await
        .unwrap();

    assert_eq!(reports.len(), 12);
    assert_eq!(reports[0].id, "https://example.com/");
    assert_eq!(reports[1].id, "https://example.com/page0");
    assert_eq!(reports[11].id, "https://example.com/page10");
    assert!(reports.iter().all(|r| !r.is_degraded()));

    let messages = messages.lock().unwrap();
    assert!(messages
        .iter()
        .any(|m| m == "Auditing page 12 of 12: https://example.com/page10"));
}

#[tokio::test]
async fn test_crawl_fails_when_homepage_errors() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/primary"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(
            "<html></html>",
            "https://example.com/",
            503,
        )))
        .mount(&server)
        .await;

    let auditor = create_test_auditor(&server);
    let result = auditor
        .crawl_and_audit("https://example.com/", &silent_progress(), &CancelToken::new())
        .await;

    assert!(matches!(result, Err(AuditError::FetchFailed { .. })));
}

#[tokio::test]
async fn test_cancellation_stops_batch() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/primary"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(envelope(FULL_PAGE, "https://example.com/", 200))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let auditor = create_test_auditor(&server);
    let cancel = CancelToken::new();
    let trigger = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(100)).await;
        trigger.cancel();
    });

    let urls = vec![
        "https://example.com/a".to_string(),
        "https://example.com/b".to_string(),
    ];
    let result = tokio::time::timeout(
        Duration::from_secs(2),
        auditor.audit_many(&urls, &silent_progress(), &cancel),
    )
    .await
    .expect("cancellation should end the batch promptly");

    match result {
        Err(e) => assert!(e.is_cancelled()),
        Ok(_) => panic!("expected the batch to be cancelled"),
    }
}

#[tokio::test]
async fn test_invalid_requests_are_rejected() {
    let server = MockServer::start().await;
    let auditor = create_test_auditor(&server);
    let cancel = CancelToken::new();

    for request in [
        AuditRequest::Single("   ".to_string()),
        AuditRequest::Single("ftp://example.com/file".to_string()),
        AuditRequest::Custom(vec!["".to_string()]),
        AuditRequest::Crawl("".to_string()),
    ] {
        let result = auditor.run_request(&request, &silent_progress(), &cancel).await;
        assert!(
            matches!(result, Err(AuditError::InvalidRequest(_))),
            "{:?} should be rejected",
            request
        );
    }
}

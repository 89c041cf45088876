//! Integration tests for sitemap resolution
//!
//! These tests use wiremock to serve sitemap documents through mock relays
//! and exercise the resolver's retry behavior and the sitemap request mode.

use geo_audit::audit::silent_progress;
use geo_audit::config::{Config, RetryConfig};
use geo_audit::{AuditError, AuditOutcome, AuditRequest, Auditor, CancelToken, SitemapKind};
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const SITEMAP_INDEX: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<sitemapindex xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
    <sitemap><loc>https://example.com/sitemap-posts.xml</loc></sitemap>
    <sitemap><loc>https://example.com/sitemap-pages.xml</loc></sitemap>
    <sitemap><loc>https://example.com/sitemap-products.xml</loc></sitemap>
</sitemapindex>"#;

const URLSET: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
    <url><loc>https://example.com/</loc></url>
    <url><loc>https://example.com/about</loc><lastmod>2024-01-01</lastmod></url>
    <url><loc>https://example.com/contact</loc></url>
</urlset>"#;

const PAGE: &str = r#"<html><head><title>Contact Example Widgets today</title></head>
<body><h1>Contact</h1><a href="/">Home</a></body></html>"#;

/// Creates a test configuration pointing both relays at the mock server
fn create_test_config(server: &MockServer, sitemap_attempts: u32) -> Config {
    let mut config = Config::default();
    config.relay.primary = format!("{}/primary", server.uri());
    config.relay.secondary = format!("{}/secondary", server.uri());
    config.relay.timeout_secs = 5;
    config.retry = RetryConfig {
        page_attempts: 1,
        page_delay_ms: 5,
        sitemap_attempts,
        sitemap_backoff_ms: 5,
    };
    config
}

fn create_test_auditor(server: &MockServer, sitemap_attempts: u32) -> Auditor {
    Auditor::new(&create_test_config(server, sitemap_attempts)).expect("Failed to build auditor")
}

async fn mount_primary(server: &MockServer, target: &str, content: &str) {
    Mock::given(method("GET"))
        .and(path("/primary"))
        .and(query_param("url", target))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "content": content,
            "status": { "url": target, "httpCode": 200 }
        })))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_resolve_index_in_document_order() {
    let server = MockServer::start().await;
    mount_primary(&server, "https://example.com/sitemap.xml", SITEMAP_INDEX).await;

    let auditor = create_test_auditor(&server, 3);
    let parsed = auditor
        .sitemap_resolver()
        .resolve("https://example.com/sitemap.xml", &CancelToken::new())
        .await
        .unwrap();

    assert_eq!(parsed.kind, SitemapKind::Index);
    assert_eq!(
        parsed.urls,
        vec![
            "https://example.com/sitemap-posts.xml".to_string(),
            "https://example.com/sitemap-pages.xml".to_string(),
            "https://example.com/sitemap-products.xml".to_string(),
        ]
    );
}

#[tokio::test]
async fn test_resolve_urlset_via_secondary_relay() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/primary"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/secondary"))
        .and(query_param("url", "https://example.com/sitemap.xml"))
        .respond_with(ResponseTemplate::new(200).set_body_string(URLSET))
        .mount(&server)
        .await;

    let auditor = create_test_auditor(&server, 3);
    let parsed = auditor
        .sitemap_resolver()
        .resolve("https://example.com/sitemap.xml", &CancelToken::new())
        .await
        .unwrap();

    assert_eq!(parsed.kind, SitemapKind::Urlset);
    assert_eq!(parsed.urls.len(), 3);
    assert_eq!(parsed.urls[1], "https://example.com/about");
}

#[tokio::test]
async fn test_malformed_sitemap_exhausts_attempts() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/primary"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "content": "<urlset><url><loc>https://example.com/</loc></url>",
            "status": { "url": "https://example.com/sitemap.xml", "httpCode": 200 }
        })))
        .expect(2)
        .mount(&server)
        .await;

    let auditor = create_test_auditor(&server, 2);
    let result = auditor
        .sitemap_resolver()
        .resolve("https://example.com/sitemap.xml", &CancelToken::new())
        .await;

    match result {
        Err(AuditError::SitemapExhausted { attempts, source }) => {
            assert_eq!(attempts, 2);
            assert!(matches!(*source, AuditError::ParseFailure(_)));
        }
        other => panic!("expected SitemapExhausted, got {:?}", other),
    }
}

#[tokio::test]
async fn test_unreachable_sitemap_exhausts_attempts() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/primary"))
        .respond_with(ResponseTemplate::new(503))
        .expect(3)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/secondary"))
        .respond_with(ResponseTemplate::new(503))
        .expect(3)
        .mount(&server)
        .await;

    let auditor = create_test_auditor(&server, 3);
    let result = auditor
        .sitemap_resolver()
        .resolve("https://example.com/sitemap.xml", &CancelToken::new())
        .await;

    match result {
        Err(AuditError::SitemapExhausted { attempts, source }) => {
            assert_eq!(attempts, 3);
            assert!(matches!(*source, AuditError::RelayUnavailable(_)));
        }
        other => panic!("expected SitemapExhausted, got {:?}", other),
    }
}

#[tokio::test]
async fn test_sitemap_request_returns_index_for_selection() {
    let server = MockServer::start().await;
    mount_primary(&server, "https://example.com/sitemap.xml", SITEMAP_INDEX).await;

    let auditor = create_test_auditor(&server, 1);
    let request = AuditRequest::Sitemap {
        sitemap_url: "https://example.com/sitemap.xml".to_string(),
        selection: vec![],
    };
    let outcome = auditor
        .run_request(&request, &silent_progress(), &CancelToken::new())
        .await
        .unwrap();

    match outcome {
        AuditOutcome::SitemapIndex(children) => {
            assert_eq!(children.len(), 3);
            assert_eq!(children[0], "https://example.com/sitemap-posts.xml");
        }
        other => panic!("expected a sitemap index, got {:?}", other),
    }
}

#[tokio::test]
async fn test_sitemap_request_audits_selected_entries() {
    let server = MockServer::start().await;
    mount_primary(&server, "https://example.com/sitemap.xml", URLSET).await;
    mount_primary(&server, "https://example.com/contact", PAGE).await;

    let auditor = create_test_auditor(&server, 1);
    let request = AuditRequest::Sitemap {
        sitemap_url: "https://example.com/sitemap.xml".to_string(),
        selection: vec![3],
    };
    let outcome = auditor
        .run_request(&request, &silent_progress(), &CancelToken::new())
        .await
        .unwrap();

    let AuditOutcome::Completed(reports) = outcome else {
        panic!("expected completed reports");
    };
    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0].id, "https://example.com/contact");
    assert!(!reports[0].is_degraded());
    assert_eq!(reports[0].findings.len(), 10);
}

#[tokio::test]
async fn test_sitemap_request_rejects_missing_entry() {
    let server = MockServer::start().await;
    mount_primary(&server, "https://example.com/sitemap.xml", URLSET).await;

    let auditor = create_test_auditor(&server, 1);
    let request = AuditRequest::Sitemap {
        sitemap_url: "https://example.com/sitemap.xml".to_string(),
        selection: vec![7],
    };
    let result = auditor
        .run_request(&request, &silent_progress(), &CancelToken::new())
        .await;

    assert!(matches!(result, Err(AuditError::InvalidRequest(_))));
}

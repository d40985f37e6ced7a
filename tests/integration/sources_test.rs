// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::helpers::{capture_logs, drain, fast_fetcher};
use phsh_url::domain::models::log_event::Severity;
use phsh_url::domain::models::target::Domain;
use phsh_url::domain::sources::source::{ApiKeys, SourceError, UrlSource};
use phsh_url::infrastructure::http::retrying_fetcher::FetchError;
use phsh_url::infrastructure::sources::{
    AlienVaultSource, HudsonRockSource, VirusTotalSource, WaybackSource,
};
use serde_json::json;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn keys(keys: &[&str]) -> ApiKeys {
    ApiKeys::new(keys.iter().map(|k| k.to_string()).collect())
}

fn domain(name: &str) -> Domain {
    Domain::parse(name).unwrap()
}

#[tokio::test]
async fn test_virustotal_rotates_keys_and_reads_undetected_urls() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/vtapi/v2/domain/report"))
        .and(query_param("apikey", "second"))
        .and(query_param("domain", "example.com"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "response_code": 1,
            "undetected_urls": [
                ["https://example.com/a", "0f1e", 0, 70, "2023-01-01 00:00:00"],
                ["https://example.com/b"]
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let source = VirusTotalSource::new(fast_fetcher(), keys(&["first", "second"]))
        .with_base_url(server.uri());
    let (log, rx) = capture_logs();

    // Index 3 with two keys selects the second one.
    let urls = source
        .fetch_urls(&domain("example.com"), 3, &log)
        .await
        .unwrap();
    assert_eq!(urls, vec!["https://example.com/a", "https://example.com/b"]);
    assert!(drain(log, rx).is_empty());
}

#[tokio::test]
async fn test_virustotal_unknown_domain_is_empty_result() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/vtapi/v2/domain/report"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "response_code": 0,
            "verbose_msg": "Domain not found"
        })))
        .mount(&server)
        .await;

    let source = VirusTotalSource::new(fast_fetcher(), keys(&["k"])).with_base_url(server.uri());
    let (log, _rx) = capture_logs();

    let urls = source
        .fetch_urls(&domain("example.com"), 0, &log)
        .await
        .unwrap();
    assert!(urls.is_empty());
}

#[tokio::test]
async fn test_virustotal_without_keys_sends_nothing() {
    let server = MockServer::start().await;
    let source = VirusTotalSource::new(fast_fetcher(), ApiKeys::default())
        .with_base_url(server.uri());
    let (log, _rx) = capture_logs();

    let result = source.fetch_urls(&domain("example.com"), 0, &log).await;
    assert!(matches!(result, Err(SourceError::MissingApiKey)));
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_alienvault_follows_pages_with_key_header() {
    let server = MockServer::start().await;
    let list_path = "/api/v1/indicators/domain/example.com/url_list";
    Mock::given(method("GET"))
        .and(path(list_path))
        .and(header("X-OTX-API-KEY", "otx-key"))
        .and(query_param("limit", "500"))
        .and(query_param("page", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "url_list": [{"url": "https://example.com/1"}, {"url": "https://example.com/2"}],
            "has_next": true
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(list_path))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "url_list": [{"url": "https://example.com/3"}],
            "has_next": false
        })))
        .expect(1)
        .mount(&server)
        .await;

    let source =
        AlienVaultSource::new(fast_fetcher(), keys(&["otx-key"])).with_base_url(server.uri());
    let (log, _rx) = capture_logs();

    let urls = source
        .fetch_urls(&domain("example.com"), 0, &log)
        .await
        .unwrap();
    assert_eq!(
        urls,
        vec![
            "https://example.com/1",
            "https://example.com/2",
            "https://example.com/3"
        ]
    );
}

#[tokio::test]
async fn test_alienvault_keeps_collected_pages_when_later_page_fails() {
    let server = MockServer::start().await;
    let list_path = "/api/v1/indicators/domain/example.com/url_list";
    Mock::given(method("GET"))
        .and(path(list_path))
        .and(query_param("page", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "url_list": [{"url": "https://example.com/1"}],
            "has_next": true
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(list_path))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(503))
        .expect(3)
        .mount(&server)
        .await;

    let source = AlienVaultSource::new(fast_fetcher(), ApiKeys::default())
        .with_base_url(server.uri());
    let (log, rx) = capture_logs();

    let urls = source
        .fetch_urls(&domain("example.com"), 0, &log)
        .await
        .unwrap();
    assert_eq!(urls, vec!["https://example.com/1"]);

    let events = drain(log, rx);
    let last = events.last().unwrap();
    assert_eq!(last.severity, Severity::Warning);
    assert!(last.message.starts_with("Stopped at page 2:"));
}

#[tokio::test]
async fn test_alienvault_first_page_failure_is_absent() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(403))
        .expect(1)
        .mount(&server)
        .await;

    let source = AlienVaultSource::new(fast_fetcher(), ApiKeys::default())
        .with_base_url(server.uri());
    let (log, _rx) = capture_logs();

    let result = source.fetch_urls(&domain("example.com"), 0, &log).await;
    assert!(matches!(
        result,
        Err(SourceError::Fetch(FetchError::ClientError { .. }))
    ));
}

#[tokio::test]
async fn test_wayback_queries_cdx_for_subdomains() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/cdx/search/cdx"))
        .and(query_param("url", "*.example.com/*"))
        .and(query_param("output", "text"))
        .and(query_param("fl", "original"))
        .and(query_param("collapse", "urlkey"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            "http://a.example.com/x\r\nhttp://b.example.com/y\n\n",
        ))
        .expect(1)
        .mount(&server)
        .await;

    let source = WaybackSource::new(fast_fetcher()).with_base_url(server.uri());
    let (log, _rx) = capture_logs();

    let urls = source
        .fetch_urls(&domain("example.com"), 0, &log)
        .await
        .unwrap();
    assert_eq!(urls, vec!["http://a.example.com/x", "http://b.example.com/y"]);
}

#[tokio::test]
async fn test_wayback_empty_body_is_empty_result() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/cdx/search/cdx"))
        .respond_with(ResponseTemplate::new(200).set_body_string(""))
        .mount(&server)
        .await;

    let source = WaybackSource::new(fast_fetcher()).with_base_url(server.uri());
    let (log, _rx) = capture_logs();

    let urls = source
        .fetch_urls(&domain("example.com"), 0, &log)
        .await
        .unwrap();
    assert!(urls.is_empty());
}

#[tokio::test]
async fn test_hudsonrock_sends_key_header() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/json/v2/osint-tools/search-by-domain"))
        .and(query_param("domain", "example.com"))
        .and(header("key", "hr-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"all_urls": [{"url": "https://login.example.com"}]}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let source =
        HudsonRockSource::new(fast_fetcher(), keys(&["hr-key"])).with_base_url(server.uri());
    let (log, rx) = capture_logs();

    let urls = source
        .fetch_urls(&domain("example.com"), 0, &log)
        .await
        .unwrap();
    assert_eq!(urls, vec!["https://login.example.com"]);
    assert!(drain(log, rx).is_empty());
}

#[tokio::test]
async fn test_hudsonrock_without_key_warns_and_proceeds() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/json/v2/osint-tools/search-by-domain"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"all_urls": []}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let source = HudsonRockSource::new(fast_fetcher(), ApiKeys::default())
        .with_base_url(server.uri());
    let (log, rx) = capture_logs();

    let urls = source
        .fetch_urls(&domain("example.com"), 0, &log)
        .await
        .unwrap();
    assert!(urls.is_empty());

    let events = drain(log, rx);
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].severity, Severity::Warning);
    assert_eq!(events[0].source, "HudsonRock");
}

#[tokio::test]
async fn test_hudsonrock_not_found_is_absent_without_retry() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;

    let source =
        HudsonRockSource::new(fast_fetcher(), keys(&["hr-key"])).with_base_url(server.uri());
    let (log, _rx) = capture_logs();

    let result = source.fetch_urls(&domain("example.com"), 0, &log).await;
    assert!(result.is_err());
}

#[tokio::test]
async fn test_malformed_json_is_absent() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>rate limited</html>"))
        .mount(&server)
        .await;

    let source =
        HudsonRockSource::new(fast_fetcher(), keys(&["hr-key"])).with_base_url(server.uri());
    let (log, _rx) = capture_logs();

    let result = source.fetch_urls(&domain("example.com"), 0, &log).await;
    assert!(matches!(result, Err(SourceError::Parse(_))));
}

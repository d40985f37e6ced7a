// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::helpers::fast_fetcher;
use phsh_url::application::orchestrator::DomainOrchestrator;
use phsh_url::application::use_cases::harvest::{
    finish, prepare_domains, Harvester, OutputPaths, Reporter, RunOutcome,
};
use phsh_url::domain::sources::source::SourceKind;
use phsh_url::infrastructure::sources::{
    parse_exclusions, SourceEndpoints, SourceFactory, SourceKeys,
};
use phsh_url::workers::log_aggregator::MemorySink;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tempfile::tempdir;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn mount_otx(server: &MockServer, domain: &str, urls: &[&str]) {
    let entries: Vec<_> = urls.iter().map(|u| json!({ "url": u })).collect();
    Mock::given(method("GET"))
        .and(path(format!("/api/v1/indicators/domain/{}/url_list", domain)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "url_list": entries,
            "has_next": false
        })))
        .mount(server)
        .await;
}

async fn mount_wayback(server: &MockServer, domain: &str, body: &str) {
    Mock::given(method("GET"))
        .and(path("/cdx/search/cdx"))
        .and(query_param("url", format!("*.{}/*", domain)))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_excluded_sources_and_dedup_across_domains() {
    let server = MockServer::start().await;
    mount_otx(&server, "example.com", &["a.com/x"]).await;
    mount_wayback(&server, "example.com", "a.com/x\na.com/y\n").await;
    mount_otx(&server, "sub.example.co", &[]).await;
    mount_wayback(&server, "sub.example.co", "").await;

    let (excluded, unknown) = parse_exclusions("vt,hr");
    assert!(unknown.is_empty());
    let sources = SourceFactory::new(fast_fetcher(), SourceKeys::default())
        .with_endpoints(SourceEndpoints::all(&server.uri()))
        .create_enabled(&excluded);
    let kinds: Vec<_> = sources.iter().map(|s| s.kind()).collect();
    assert_eq!(kinds, vec![SourceKind::AlienVault, SourceKind::Wayback]);

    let sink = Arc::new(MemorySink::new());
    let reporter = Reporter::new(sink.clone(), false);
    let domains = prepare_domains(
        &["example.com", "not a domain!!", "sub.example.co"],
        &reporter,
    );
    assert_eq!(domains.len(), 2);

    let orchestrator = DomainOrchestrator::new(sources, sink.clone(), false);
    let harvester = Harvester::new(orchestrator, reporter.clone(), Duration::from_millis(10));
    let outcome = harvester
        .run_until(&domains, std::future::pending::<()>())
        .await;
    assert_eq!(outcome, RunOutcome::Completed);

    // VT and HudsonRock endpoints must never have been hit.
    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 4);
    assert!(requests
        .iter()
        .all(|r| !r.url.path().starts_with("/vtapi") && !r.url.path().contains("osint-tools")));

    let dir = tempdir().unwrap();
    let paths = OutputPaths::new(dir.path().join("endpoints.txt"))
        .with_failed_domains(dir.path().join("failed_domains.txt"));
    let snapshot = harvester.accumulator().lock().snapshot();
    let mut stdout = Vec::new();
    finish(&snapshot, &paths, &reporter, &mut stdout)
        .await
        .unwrap();

    assert_eq!(
        std::fs::read_to_string(&paths.urls).unwrap(),
        "a.com/x\na.com/y\n"
    );
    assert!(!paths.failed_domains.exists());
    assert!(stdout.is_empty());

    let messages = sink.messages();
    assert!(messages.contains(&"[OTX] Found 1 URLs".to_string()));
    assert!(messages.contains(&"[Wayback] Found 2 URLs".to_string()));
    assert!(messages.contains(&"[WARNING] Skipping invalid domain format: notadomain".to_string()));
}

#[tokio::test]
async fn test_domain_with_every_source_failing_is_recorded() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let (excluded, _) = parse_exclusions("vt");
    let sources = SourceFactory::new(fast_fetcher(), SourceKeys::default())
        .with_endpoints(SourceEndpoints::all(&server.uri()))
        .create_enabled(&excluded);

    let sink = Arc::new(MemorySink::new());
    let reporter = Reporter::new(sink.clone(), true);
    let domains = prepare_domains(&["gone.example.com"], &reporter);

    let orchestrator = DomainOrchestrator::new(sources, sink.clone(), true);
    let harvester = Harvester::new(orchestrator, reporter.clone(), Duration::from_millis(10));
    harvester
        .run_until(&domains, std::future::pending::<()>())
        .await;

    let dir = tempdir().unwrap();
    let paths = OutputPaths::new(dir.path().join("endpoints.txt"))
        .with_failed_domains(dir.path().join("failed_domains.txt"));
    let snapshot = harvester.accumulator().lock().snapshot();
    let mut stdout = Vec::new();
    finish(&snapshot, &paths, &reporter, &mut stdout)
        .await
        .unwrap();

    assert!(stdout.is_empty());
    assert!(!paths.urls.exists());
    assert_eq!(
        std::fs::read_to_string(&paths.failed_domains).unwrap(),
        "gone.example.com\n"
    );
    assert!(sink.events().is_empty());
}

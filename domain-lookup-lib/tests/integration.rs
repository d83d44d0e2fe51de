// domain-lookup-lib/tests/integration.rs

//! End-to-end tests of the lookup engine against a local RDAP server.

use domain_lookup_lib::{
    Dispatcher, DomainChecker, LookupError, LookupOutcome, LookupStatus, RegistryDirectory,
};
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{method, path, path_regex};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn dispatcher_for(directory: RegistryDirectory, concurrency: usize) -> Dispatcher<DomainChecker> {
    let checker = DomainChecker::new(Arc::new(directory)).unwrap();
    Dispatcher::new(checker, concurrency)
}

fn sorted_lines(outcomes: &[LookupOutcome]) -> Vec<String> {
    let mut lines: Vec<String> = outcomes.iter().map(LookupOutcome::to_line).collect();
    lines.sort();
    lines
}

async fn mount_status(server: &MockServer, domain: &str, status: u16) {
    Mock::given(method("GET"))
        .and(path(format!("/domain/{}", domain)))
        .respond_with(ResponseTemplate::new(status).set_body_string("{}"))
        .expect(1)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_registered_and_unregistered_scenario() {
    let server = MockServer::start().await;
    mount_status(&server, "a.com", 404).await;

    let directory = RegistryDirectory::from_entries([("com", vec![server.uri()])]);
    let dispatcher = dispatcher_for(directory, 4);

    let outcomes = dispatcher
        .lookup_all(vec!["a.com".to_string(), "b.xx".to_string()])
        .await;

    assert_eq!(
        sorted_lines(&outcomes),
        vec!["a.com,Unregistered", "b.xx,No RDAP server found"]
    );
}

#[tokio::test]
async fn test_status_classification() {
    let server = MockServer::start().await;
    mount_status(&server, "taken.com", 200).await;
    mount_status(&server, "free.com", 404).await;
    mount_status(&server, "broken.com", 503).await;
    mount_status(&server, "moved.com", 301).await;
    mount_status(&server, "denied.com", 403).await;

    let directory = RegistryDirectory::from_entries([("com", vec![server.uri()])]);
    let dispatcher = dispatcher_for(directory, 2);

    let outcomes = dispatcher
        .lookup_all(
            ["taken.com", "free.com", "broken.com", "moved.com", "denied.com"]
                .iter()
                .map(|d| d.to_string())
                .collect(),
        )
        .await;

    assert_eq!(
        sorted_lines(&outcomes),
        vec![
            "broken.com,RDAP server error",
            "denied.com,Unknown error",
            "free.com,Unregistered",
            "moved.com,Unknown error",
            "taken.com,Registered",
        ]
    );

    let status_of = |domain: &str| {
        outcomes
            .iter()
            .find(|o| o.domain == domain)
            .map(|o| o.status)
            .unwrap()
    };
    assert_eq!(status_of("moved.com"), LookupStatus::UnknownStatus);
    assert_eq!(status_of("broken.com"), LookupStatus::ServerError);
}

#[tokio::test]
async fn test_unknown_label_never_reaches_network() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let directory = RegistryDirectory::from_entries([("com", vec![server.uri()])]);
    let dispatcher = dispatcher_for(directory, 8);

    let outcomes = dispatcher
        .lookup_all(vec![
            "x.org".to_string(),
            "y.COM".to_string(),
            "a.com ".to_string(),
            String::new(),
        ])
        .await;

    assert_eq!(outcomes.len(), 4);
    assert!(outcomes
        .iter()
        .all(|o| o.status == LookupStatus::NoProvider));
    assert!(outcomes.iter().any(|o| o.domain == "a.com "));
}

#[tokio::test]
async fn test_only_first_endpoint_is_queried() {
    let primary = MockServer::start().await;
    let secondary = MockServer::start().await;

    mount_status(&primary, "a.com", 500).await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&secondary)
        .await;

    let directory =
        RegistryDirectory::from_entries([("com", vec![primary.uri(), secondary.uri()])]);
    let dispatcher = dispatcher_for(directory, 1);

    let outcomes = dispatcher.lookup_all(vec!["a.com".to_string()]).await;
    assert_eq!(outcomes, vec![LookupOutcome::new("a.com", LookupStatus::ServerError)]);
}

#[tokio::test]
async fn test_cardinality_when_every_lookup_fails() {
    // Nothing listens on the discard port, so every query is a transport error.
    let directory = RegistryDirectory::from_entries([("com", vec!["http://127.0.0.1:9"])]);
    let dispatcher = dispatcher_for(directory, 3);

    let domains: Vec<String> = (0..20).map(|i| format!("fail{}.com", i)).collect();
    let outcomes = dispatcher.lookup_all(domains).await;

    assert_eq!(outcomes.len(), 20);
    assert!(outcomes
        .iter()
        .all(|o| o.status == LookupStatus::TransportError && !o.message.is_empty()));
}

#[tokio::test]
async fn test_slow_server_with_many_domains() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path_regex(r"^/domain/.*$"))
        .respond_with(ResponseTemplate::new(404).set_delay(Duration::from_millis(20)))
        .expect(30)
        .mount(&server)
        .await;

    let directory = RegistryDirectory::from_entries([("net", vec![server.uri()])]);
    let dispatcher = dispatcher_for(directory, 5);

    let domains: Vec<String> = (0..30).map(|i| format!("free{}.net", i)).collect();
    let outcomes = dispatcher.lookup_all(domains).await;

    assert_eq!(outcomes.len(), 30);
    assert!(outcomes
        .iter()
        .all(|o| o.status == LookupStatus::Unregistered));
}

// ============================================================
// Bootstrap fetch tests
// ============================================================

async fn serve_bootstrap(body: &str, status: u16) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rdap/dns.json"))
        .respond_with(
            ResponseTemplate::new(status)
                .insert_header("content-type", "application/json")
                .set_body_string(body.to_string()),
        )
        .mount(&server)
        .await;
    server
}

#[tokio::test]
async fn test_fetch_bootstrap_builds_directory() {
    let server = serve_bootstrap(
        r#"{
            "description": "RDAP bootstrap file for Domain Name System registrations",
            "publication": "2024-01-01T00:00:00Z",
            "version": "1.0",
            "services": [
                [["com", "net"], ["https://rdap.verisign.com/com/v1/"]],
                [["uz"], ["http://cctld.uz:9000/"]]
            ]
        }"#,
        200,
    )
    .await;

    let url = format!("{}/rdap/dns.json", server.uri());
    let directory = RegistryDirectory::fetch(&url, Duration::from_secs(5))
        .await
        .unwrap();

    assert_eq!(directory.len(), 3);
    assert_eq!(
        directory.lookup("net").unwrap()[0],
        "https://rdap.verisign.com/com/v1/"
    );
}

#[tokio::test]
async fn test_fetch_bootstrap_rejects_three_element_service() {
    let server = serve_bootstrap(r#"{"services": [[["com"], ["http://r1"], []]]}"#, 200).await;

    let url = format!("{}/rdap/dns.json", server.uri());
    let err = RegistryDirectory::fetch(&url, Duration::from_secs(5))
        .await
        .unwrap_err();
    assert!(matches!(err, LookupError::MalformedService { elements: 3, .. }));
}

#[tokio::test]
async fn test_fetch_bootstrap_rejects_empty_services() {
    let server = serve_bootstrap(r#"{"services": []}"#, 200).await;

    let url = format!("{}/rdap/dns.json", server.uri());
    let err = RegistryDirectory::fetch(&url, Duration::from_secs(5))
        .await
        .unwrap_err();
    assert!(matches!(err, LookupError::EmptyRegistry));
    assert!(err.to_string().contains("empty"));
}

#[tokio::test]
async fn test_fetch_bootstrap_http_error() {
    let server = serve_bootstrap("oops", 500).await;

    let url = format!("{}/rdap/dns.json", server.uri());
    let err = RegistryDirectory::fetch(&url, Duration::from_secs(5))
        .await
        .unwrap_err();
    assert!(matches!(err, LookupError::Bootstrap { .. }));
    assert!(err.to_string().contains("500"));
}

#[tokio::test]
async fn test_fetch_bootstrap_unreachable() {
    let err = RegistryDirectory::fetch("http://127.0.0.1:9/dns.json", Duration::from_secs(5))
        .await
        .unwrap_err();
    assert!(matches!(err, LookupError::Bootstrap { .. }));
}

#![allow(unused_crate_dependencies)]
#![allow(clippy::tests_outside_test_module, reason = "integration tests live in tests/ dir")]
#![allow(clippy::expect_used, reason = "integration test, panics are the assertion mechanism")]

//! End-to-end discovery against mock servers.
//!
//! The mocks speak plain HTTP, so every verified probe here also proves the
//! https→http transport fallback: the https attempt must fail before the
//! plaintext one can be recorded.

use async_trait::async_trait;
use gravimeter_core::modules::locator::{
    CandidateProcess, PortInspector, ProcessIndex, ProcessLocator, PROBE_PATH,
};
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

struct FakeIndex {
    candidates: Vec<CandidateProcess>,
}

impl ProcessIndex for FakeIndex {
    fn candidates(&self, _pattern: &str) -> Vec<CandidateProcess> {
        self.candidates.clone()
    }
}

struct FakePorts {
    ports: Vec<u16>,
}

#[async_trait]
impl PortInspector for FakePorts {
    async fn listening_ports(&self, _pid: u32) -> io::Result<Vec<u16>> {
        Ok(self.ports.clone())
    }
}

fn locator(candidates: Vec<CandidateProcess>, ports: Vec<u16>) -> ProcessLocator {
    ProcessLocator::with_parts(Arc::new(FakeIndex { candidates }), Arc::new(FakePorts { ports }))
}

fn candidate(pid: u32, cmdline: &str) -> CandidateProcess {
    CandidateProcess { pid, cmdline: cmdline.to_string() }
}

fn probe_ok() -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(serde_json::json!({ "processes": [] }))
}

#[tokio::test]
async fn first_verified_port_wins_and_later_ports_are_never_probed() {
    let servers = [
        MockServer::start().await,
        MockServer::start().await,
        MockServer::start().await,
    ];
    let mut by_port: Vec<&MockServer> = servers.iter().collect();
    by_port.sort_by_key(|s| s.address().port());
    let (bad, good, sentinel) = (by_port[0], by_port[1], by_port[2]);

    // Lowest port answers 200 but not with JSON, so it must be rejected.
    Mock::given(method("POST"))
        .and(path(PROBE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .expect(1)
        .mount(bad)
        .await;

    Mock::given(method("POST"))
        .and(path(PROBE_PATH))
        .and(header("X-Csrf-Token", "test-token-abc123"))
        .and(header("Connect-Protocol-Version", "1"))
        .respond_with(probe_ok())
        .expect(1)
        .mount(good)
        .await;

    // Past the first verified port nothing may be probed.
    Mock::given(method("POST"))
        .and(path(PROBE_PATH))
        .respond_with(probe_ok())
        .expect(0)
        .mount(sentinel)
        .await;

    let ports: Vec<u16> = by_port.iter().map(|s| s.address().port()).collect();
    let locator = locator(vec![candidate(4242, "/opt/ls --csrf_token=test-token-abc123")], ports);

    let info = locator.locate(None).await.expect("should locate the mock server");
    assert_eq!(info.pid, 4242);
    assert_eq!(info.port, good.address().port(), "wrong port won the probe");
    assert_eq!(info.token, "test-token-abc123");
}

#[tokio::test]
async fn advertised_port_joins_the_probe_list() {
    let rejecting = MockServer::start().await;
    let hinted = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(PROBE_PATH))
        .respond_with(ResponseTemplate::new(403))
        .mount(&rejecting)
        .await;

    Mock::given(method("POST"))
        .and(path(PROBE_PATH))
        .respond_with(probe_ok())
        .expect(1)
        .mount(&hinted)
        .await;

    // The hinted port is absent from the listening set and must still win.
    let cmdline = format!(
        "/opt/ls --csrf_token=abc --extension_server_port={}",
        hinted.address().port()
    );
    let locator = locator(vec![candidate(7, &cmdline)], vec![rejecting.address().port()]);

    let info = locator.locate(None).await.expect("hinted port should verify");
    assert_eq!(info.port, hinted.address().port());
}

#[tokio::test]
async fn no_listening_ports_fails_even_with_a_hint() {
    let sentinel = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(PROBE_PATH))
        .respond_with(probe_ok())
        .expect(0)
        .mount(&sentinel)
        .await;

    let cmdline =
        format!("/opt/ls --csrf_token=abc --extension_server_port={}", sentinel.address().port());
    let locator = locator(vec![candidate(7, &cmdline)], Vec::new());

    assert!(locator.locate(None).await.is_none(), "empty listening set must fail discovery");
}

#[tokio::test]
async fn missing_token_fails_before_any_probe() {
    let sentinel = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(PROBE_PATH))
        .respond_with(probe_ok())
        .expect(0)
        .mount(&sentinel)
        .await;

    let locator = locator(
        vec![candidate(7, "/opt/ls --extension_server_port=4242")],
        vec![sentinel.address().port()],
    );

    assert!(locator.locate(None).await.is_none());
}

#[tokio::test]
async fn workspace_hint_selects_the_matching_window() {
    let server = MockServer::start().await;

    // Only the beta window's token is accepted; picking the wrong candidate
    // would 404 the probe and fail discovery.
    Mock::given(method("POST"))
        .and(path(PROBE_PATH))
        .and(header("X-Csrf-Token", "beta-token"))
        .respond_with(probe_ok())
        .expect(1)
        .mount(&server)
        .await;

    let locator = locator(
        vec![
            candidate(10, "ls --csrf_token=alpha-token --workspace_id=file_home_me_alpha"),
            candidate(20, "ls --csrf_token=beta-token --workspace_id=file_home_me_beta"),
        ],
        vec![server.address().port()],
    );

    let info = locator
        .locate(Some(&PathBuf::from("/home/me/beta")))
        .await
        .expect("hinted candidate should verify");
    assert_eq!(info.pid, 20);
    assert_eq!(info.token, "beta-token");
}

// Shared fakes and mock-controller wiring for the integration tests.
use std::sync::{Arc, Mutex};

use serde_json::{Value, json};
use unifi_auth_test::domain::{GuestOutcome, ProgressEvent, ProgressReporter};
use unifi_auth_test::interface_adapters::clients::{ClientOptions, ControllerClient};
use unifi_auth_test::interface_adapters::prompt::ProvidedSecret;
use unifi_auth_test::use_cases::AuthCheckWorkflow;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const USERNAME: &str = "testadmin";
pub const PASSWORD: &str = "s3cret";
pub const SITE: &str = "default";
pub const SESSION_COOKIE: &str = "unifises=abc123; Path=/; Secure; HttpOnly";

// Progress lines captured from the workflow, in order.
#[derive(Clone, Default)]
pub struct RecordingReporter {
    lines: Arc<Mutex<Vec<String>>>,
}

impl RecordingReporter {
    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().expect("lines mutex poisoned").clone()
    }
}

impl ProgressReporter for RecordingReporter {
    fn report(&self, event: ProgressEvent<'_>) {
        let line = match event {
            ProgressEvent::Entered(state) => format!("enter {}", state.label()),
            ProgressEvent::SessionEstablished => "session established".to_string(),
            ProgressEvent::SitesVerified(sites) => format!("{} site(s)", sites.len()),
            ProgressEvent::Guest(GuestOutcome::Skipped) => "guest skipped".to_string(),
            ProgressEvent::Guest(GuestOutcome::Authorized { mac }) => {
                format!("guest authorized {mac}")
            }
            ProgressEvent::Completed => "completed".to_string(),
            ProgressEvent::Failed { state, error } => format!("failed {}: {error}", state.label()),
        };
        self.lines.lock().expect("lines mutex poisoned").push(line);
    }
}

pub type Workflow = AuthCheckWorkflow<ControllerClient, ProvidedSecret, RecordingReporter>;

// Workflow wired to the real reqwest client pointed at the mock controller.
pub fn workflow(server: &MockServer, reporter: RecordingReporter) -> Workflow {
    workflow_for(&server.uri(), reporter)
}

pub fn workflow_for(base_url: &str, reporter: RecordingReporter) -> Workflow {
    let api = ControllerClient::new(base_url, ClientOptions::default())
        .expect("client should build");
    AuthCheckWorkflow {
        api,
        secrets: ProvidedSecret::new(PASSWORD),
        reporter,
        username: USERNAME.to_string(),
        site: SITE.to_string(),
    }
}

// Login succeeds with a session cookie; expected exactly once.
pub async fn mount_login_ok(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/api/login"))
        .and(header("content-type", "application/json"))
        .and(body_json(json!({ "username": USERNAME, "password": PASSWORD })))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("set-cookie", SESSION_COOKIE)
                .set_body_json(json!({ "meta": { "rc": "ok" }, "data": [] })),
        )
        .expect(1)
        .mount(server)
        .await;
}

// Sites endpoint answering only when the session cookie is replayed verbatim.
pub async fn mount_sites(server: &MockServer, status: u16, body: Value, expected_calls: u64) {
    Mock::given(method("GET"))
        .and(path("/api/self/sites"))
        .and(header("cookie", SESSION_COOKIE))
        .respond_with(ResponseTemplate::new(status).set_body_json(body))
        .expect(expected_calls)
        .mount(server)
        .await;
}

pub fn default_sites_body() -> Value {
    json!({
        "meta": { "rc": "ok" },
        "data": [{ "_id": "s1", "name": "Default", "desc": "Default site" }]
    })
}

// Guest endpoint must never be reached.
pub async fn forbid_guest(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path(format!("/api/s/{SITE}/cmd/stamgr")))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(server)
        .await;
}

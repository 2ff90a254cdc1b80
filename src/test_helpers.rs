//! Shared test helpers for building API clients against a mock server.

use crate::api::NexyApi;
use crate::clock::RecordingClock;
use crate::config::Config;
use crate::http::HttpClient;
use crate::types::{Credential, Task, TaskStatus};
use serde_json::{Value, json};
use std::sync::Arc;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Config pointing both the API and the IP echo at `server`
pub(crate) fn test_config(server: &MockServer) -> Config {
    let mut config = Config::default();
    config.api.base_url = server.uri();
    config.api.ip_echo_url = format!("{}/ip", server.uri());
    config
}

/// API client for token "tok" against `server`, waiting through `clock`
pub(crate) fn test_api(server: &MockServer, clock: Arc<RecordingClock>) -> NexyApi {
    let config = test_config(server);
    let http = HttpClient::new(&config, None, clock).unwrap();
    NexyApi::new(&config, &Credential::new("tok"), http).unwrap()
}

/// A pending task with the given id and category
pub(crate) fn pending_task(id: &str, category: &str) -> Task {
    Task {
        id: id.to_string(),
        description: format!("Task {}", id),
        category: category.to_string(),
        points: 10,
        status: TaskStatus::Pending,
    }
}

/// Mount `GET <route>` answering 200 with `{ "data": data }`
pub(crate) async fn mount_get(server: &MockServer, route: &str, data: Value) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": data })))
        .mount(server)
        .await;
}

/// Verify payload with the given status and optional referral counters
pub(crate) fn verify_body(status: &str, referral: Option<(u64, u64)>) -> Value {
    match referral {
        Some((min, invited)) => json!({
            "data": {
                "status": status,
                "task_id": "t-ref",
                "task": { "data": { "min_referrals": min } },
                "user": { "invited": invited }
            }
        }),
        None => json!({ "data": { "status": status } }),
    }
}

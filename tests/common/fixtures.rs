//! Mock API fixtures, scoped per bearer token

use serde_json::{Value, json};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn bearer(token: &str) -> String {
    format!("Bearer {}", token)
}

/// `GET <route>` for `token` answering `{ "data": data }`
pub async fn mount_data(server: &MockServer, token: &str, route: &str, data: Value) {
    Mock::given(method("GET"))
        .and(path(route))
        .and(header("authorization", bearer(token).as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": data })))
        .mount(server)
        .await;
}

/// `POST <route>` for `token` answering 200 with `body`
pub async fn mount_post(server: &MockServer, token: &str, route: &str, body: Value) {
    Mock::given(method("POST"))
        .and(path(route))
        .and(header("authorization", bearer(token).as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

/// `GET <route>` for `token` always failing with `status`
pub async fn mount_failure(server: &MockServer, token: &str, route: &str, status: u16) {
    Mock::given(method("GET"))
        .and(path(route))
        .and(header("authorization", bearer(token).as_str()))
        .respond_with(ResponseTemplate::new(status).set_body_json(json!({"message": "boom"})))
        .mount(server)
        .await;
}

/// IP echo shared by every account
pub async fn mount_ip(server: &MockServer, ip: &str) {
    Mock::given(method("GET"))
        .and(path("/ip"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "ip": ip })))
        .mount(server)
        .await;
}

/// A complete account: identity, tasks, completed ids and statistics
pub async fn mount_account(
    server: &MockServer,
    token: &str,
    name: &str,
    tasks: Value,
    completed: Value,
) {
    mount_data(
        server,
        token,
        "/client/user",
        json!({"metadata": {"name": name, "username": name}, "agent_address": format!("0x{name}")}),
    )
    .await;
    mount_data(server, token, "/client/tasks", tasks).await;
    mount_data(server, token, "/client/user-tasks/completed", completed).await;
    mount_data(
        server,
        token,
        "/client/rewards/statistic",
        json!({"social": 10, "ref": 0, "follower": 1}),
    )
    .await;
}

/// Number of requests received on `route`
pub async fn hits(server: &MockServer, route: &str) -> usize {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .filter(|r| r.url.path() == route)
        .count()
}

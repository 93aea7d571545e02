//! Shared fixtures for integration tests.

#![allow(dead_code)]

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use valop::{Dispatcher, OperationRegistry, RegistryBuilder};
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[derive(Debug, PartialEq, Serialize, Deserialize)]
pub struct PingResult {
    pub ok: bool,
}

/// Standard table plus `Ping` at `api/ping`.
pub fn registry_with_ping() -> OperationRegistry {
    let mut builder = RegistryBuilder::standard();
    builder
        .register::<PingResult>("Ping", "api/ping")
        .expect("Ping is not a standard operation");
    builder.build()
}

pub fn dispatcher_for(server: &MockServer) -> Dispatcher {
    Dispatcher::http(registry_with_ping(), &server.uri())
}

pub fn sample_page() -> Value {
    json!({
        "items": [
            {"id": 101, "status": "pending"},
            {"id": 102, "status": "done"}
        ],
        "totalCount": 42,
        "page": 1,
        "pageSize": 2
    })
}

/// Expect exactly one JSON POST to `/{route}` carrying `filter`.
pub async fn expect_post(server: &MockServer, route: &str, filter: &Value, reply: ResponseTemplate) {
    Mock::given(method("POST"))
        .and(path(format!("/{}", route)))
        .and(header("content-type", "application/json"))
        .and(body_json(filter))
        .respond_with(reply)
        .expect(1)
        .mount(server)
        .await;
}

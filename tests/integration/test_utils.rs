//! Shared helpers for the HTTP integration tests
//!
//! Each test serves the real router on an ephemeral port and talks to it
//! over HTTP, so request decoding, status codes, and response bodies are
//! exercised exactly as a client sees them.

use ranctl::nodes::ApiSet;
use ranctl::proto::{CommandRequest, CommandResponse, NavigationRequest, NavigationResponse};
use ranctl::server::{amf_router, router, AmfState, AppState};
use std::collections::BTreeMap;
use std::time::Duration;

const EXEC_TIMEOUT: Duration = Duration::from_secs(5);

/// Serves the context-tree router against stub APIs, returning its base URL.
pub async fn spawn_app() -> String {
    serve(router(AppState::new(ApiSet::stub(), EXEC_TIMEOUT))).await
}

/// Serves the AMF direct-connect router, returning its base URL.
pub async fn spawn_amf() -> String {
    serve(amf_router(AmfState::new(ApiSet::stub(), EXEC_TIMEOUT))).await
}

async fn serve(app: axum::Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

pub fn nav_request(current: &str, command: &str, args: &[&str]) -> NavigationRequest {
    NavigationRequest {
        current_context: current.to_string(),
        command: command.to_string(),
        args: args.iter().map(|a| a.to_string()).collect(),
        server_url: String::new(),
        node_type: String::new(),
    }
}

pub fn exec_request(
    node_type: &str,
    node_name: &str,
    command_path: &str,
    args: &[&str],
) -> CommandRequest {
    CommandRequest {
        node_type: node_type.to_string(),
        node_name: node_name.to_string(),
        command_path: command_path.to_string(),
        raw_command: String::new(),
        args: args.iter().map(|a| a.to_string()).collect(),
        flags: BTreeMap::new(),
    }
}

/// Posts a navigation request and decodes the answer whatever the status.
pub async fn navigate(
    base: &str,
    req: &NavigationRequest,
) -> (reqwest::StatusCode, NavigationResponse) {
    let resp = reqwest::Client::new()
        .post(format!("{base}/api/context/navigate"))
        .json(req)
        .send()
        .await
        .unwrap();
    let status = resp.status();
    (status, resp.json().await.unwrap())
}

/// Posts a command request and decodes the answer whatever the status.
pub async fn exec(base: &str, req: &CommandRequest) -> (reqwest::StatusCode, CommandResponse) {
    let resp = reqwest::Client::new()
        .post(format!("{base}/api/exec"))
        .json(req)
        .send()
        .await
        .unwrap();
    let status = resp.status();
    (status, resp.json().await.unwrap())
}

//! AMF direct-connect personality: a flat command surface on its own
//! listener, reached by connecting straight to the AMF port instead of
//! navigating the context tree.

use crate::catalog::Catalog;
use crate::exec::Engine;
use crate::nodes::{AmfApi, ApiSet};
use crate::proto::{
    ClientContext, CommandInfo, CommandRequest, CommandResponse, ContextKind, NavigationRequest,
    NavigationResponse,
};
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{Map, Value};
use std::sync::Arc;
use std::time::Duration;
use tower_http::trace::TraceLayer;

/// Shared state behind the AMF listener.
#[derive(Clone)]
pub struct AmfState {
    engine: Arc<Engine>,
    amf: Arc<dyn AmfApi>,
    commands: Arc<Vec<CommandInfo>>,
}

impl AmfState {
    pub fn new(apis: ApiSet, timeout: Duration) -> Self {
        let catalog = Arc::new(Catalog::amf());
        let mut commands = basic_commands();
        commands.extend(catalog.infos_for("amf"));
        Self {
            engine: Arc::new(Engine::new(catalog, apis.clone(), timeout)),
            amf: apis.amf,
            commands: Arc::new(commands),
        }
    }

    fn command_names(&self) -> Vec<String> {
        self.commands.iter().map(|c| c.name.clone()).collect()
    }
}

pub fn amf_router(state: AmfState) -> Router {
    Router::new()
        .route("/api/status", get(status))
        .route("/api/context/navigate", post(navigate))
        .route("/api/exec", post(exec))
        .layer(TraceLayer::new_for_http())
        .layer(super::routes::cors_layer())
        .with_state(state)
}

async fn status(State(state): State<AmfState>) -> impl IntoResponse {
    let mut status = Map::new();
    for (key, value) in state.amf.service_status() {
        status.insert(key, Value::String(value));
    }
    Json(Value::Object(status))
}

/// Only `connect` and `disconnect` exist here; there is no tree to walk.
async fn navigate(
    State(state): State<AmfState>,
    payload: Result<Json<NavigationRequest>, JsonRejection>,
) -> impl IntoResponse {
    let req = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(NavigationResponse::failure(format!(
                    "Invalid request format: {rejection}"
                ))),
            );
        }
    };
    match req.command.as_str() {
        "connect" => {
            let url = req
                .args
                .first()
                .filter(|u| !u.is_empty())
                .cloned()
                .unwrap_or_else(|| {
                    if req.server_url.is_empty() {
                        "http://localhost:6000".to_string()
                    } else {
                        req.server_url.clone()
                    }
                });
            let context = ClientContext {
                kind: ContextKind::Amf,
                name: "amf".to_string(),
                node_type: "amf".to_string(),
                commands: state.command_names(),
                ..ClientContext::default()
            };
            (
                StatusCode::OK,
                Json(NavigationResponse {
                    context,
                    prompt: ">>> ".to_string(),
                    message: format!("Connected to AMF: {url}, type help to see commands"),
                    commands: state.commands.as_ref().clone(),
                    error: String::new(),
                }),
            )
        }
        "disconnect" => {
            let root_commands = root_commands();
            let context = ClientContext {
                kind: ContextKind::Root,
                name: "root".to_string(),
                commands: root_commands.iter().map(|c| c.name.clone()).collect(),
                ..ClientContext::default()
            };
            (
                StatusCode::OK,
                Json(NavigationResponse {
                    context,
                    prompt: ">>> ".to_string(),
                    message: "Disconnect AMF successfully.".to_string(),
                    commands: root_commands,
                    error: String::new(),
                }),
            )
        }
        other => (
            StatusCode::BAD_REQUEST,
            Json(NavigationResponse::failure(format!(
                "Unknown navigation command: {other}"
            ))),
        ),
    }
}

/// Every execution here is an AMF command, whatever node type the request
/// claims.
async fn exec(
    State(state): State<AmfState>,
    payload: Result<Json<CommandRequest>, JsonRejection>,
) -> impl IntoResponse {
    let mut req = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(CommandResponse::failure(format!(
                    "Invalid request format: {rejection}"
                ))),
            );
        }
    };
    req.node_type = "amf".to_string();
    match state.engine.execute(&req).await {
        Ok(response) => (StatusCode::OK, Json(CommandResponse::ok(response))),
        Err(e) => (
            StatusCode::BAD_REQUEST,
            Json(CommandResponse::failure(e.to_string())),
        ),
    }
}

fn basic_commands() -> Vec<CommandInfo> {
    vec![
        CommandInfo::new("clear", "Clear the screen", "Clear the terminal screen", ""),
        CommandInfo::new(
            "disconnect",
            "Disconnect from AMF",
            "Disconnect from the AMF server and return to root context",
            "",
        ),
        CommandInfo::new("exit", "Exit the client", "Exit the client application", ""),
        CommandInfo::new(
            "help",
            "Display help",
            "Show a list of all available AMF commands",
            "",
        ),
    ]
}

fn root_commands() -> Vec<CommandInfo> {
    vec![
        CommandInfo::new("clear", "clear the screen", "Clear the terminal screen", ""),
        CommandInfo::new(
            "connect",
            "Connect to a MSsim [connect http://localhost:4000], Connect to AMF [connect http://localhost:6000]",
            "Connect to a server instance",
            "<server-url>",
        ),
        CommandInfo::new("exit", "exit the program", "Exit the client application", ""),
        CommandInfo::new("help", "display help", "Show a list of all available commands", ""),
    ]
}

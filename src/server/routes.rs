//! Context-tree endpoints: readiness, node listings, command descriptors,
//! navigation, and command execution.

use crate::catalog::Catalog;
use crate::exec::Engine;
use crate::nodes::ApiSet;
use crate::proto::{CommandRequest, CommandResponse, NavigationRequest, NavigationResponse};
use crate::tree::ContextTree;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::{header, Method, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Shared state behind the context-tree listener.
#[derive(Clone)]
pub struct AppState {
    pub tree: Arc<ContextTree>,
    pub engine: Arc<Engine>,
}

impl AppState {
    pub fn new(apis: ApiSet, timeout: Duration) -> Self {
        let catalog = Arc::new(Catalog::tree());
        let tree = Arc::new(ContextTree::new(catalog.clone(), apis.emulator.clone()));
        let engine = Arc::new(Engine::new(catalog, apis, timeout));
        Self { tree, engine }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/context", get(readiness))
        .route("/api/context/node/:node_type", get(list_nodes))
        .route(
            "/api/context/node/:node_type/:node_name/commands",
            get(node_commands),
        )
        .route("/api/context/navigate", post(navigate))
        .route("/api/exec", post(exec))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer())
        .with_state(state)
}

pub(crate) fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
}

/// Liveness probe the client hits before treating a URL as connected.
async fn readiness() -> impl IntoResponse {
    Json(json!({ "message": "Context API is ready" }))
}

async fn list_nodes(
    State(state): State<AppState>,
    Path(node_type): Path<String>,
) -> impl IntoResponse {
    match state.tree.objects_of_type(&node_type) {
        Ok(nodes) => (StatusCode::OK, Json(json!({ "nodes": nodes }))),
        Err(e) => (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": e.to_string() })),
        ),
    }
}

/// Command descriptors for one node. An uncached node answers from the
/// catalog so clients can bind commands before the first selection.
async fn node_commands(
    State(state): State<AppState>,
    Path((node_type, node_name)): Path<(String, String)>,
) -> impl IntoResponse {
    let key = format!("{node_type}:{node_name}");
    if let Some(ctx) = state.tree.get(&key) {
        return (StatusCode::OK, Json(json!(ctx.commands)));
    }
    let fallback = state.tree.commands_for_type(&node_type);
    if !fallback.is_empty() {
        return (StatusCode::OK, Json(json!(fallback)));
    }
    (
        StatusCode::BAD_REQUEST,
        Json(json!({ "error": "Node context not found" })),
    )
}

async fn navigate(
    State(state): State<AppState>,
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
    match state.tree.navigate(&req) {
        Ok(resp) => (StatusCode::OK, Json(resp)),
        Err(e) => (
            StatusCode::BAD_REQUEST,
            Json(NavigationResponse::failure(e.to_string())),
        ),
    }
}

async fn exec(
    State(state): State<AppState>,
    payload: Result<Json<CommandRequest>, JsonRejection>,
) -> impl IntoResponse {
    let req = match payload {
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
    match state.engine.execute(&req).await {
        Ok(response) => (StatusCode::OK, Json(CommandResponse::ok(response))),
        Err(e) => (
            StatusCode::BAD_REQUEST,
            Json(CommandResponse::failure(e.to_string())),
        ),
    }
}

use anyhow::{Context, Result};
use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        ws::{Message, WebSocket, WebSocketUpgrade},
        Query, State,
    },
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Json, Router, serve,
};
use futures::{sink::SinkExt, stream::StreamExt};
use minijinja::{path_loader, Environment};
use minijinja_autoreload::AutoReloader;
use serde::Deserialize;
use serde_json::json;
use std::{net::SocketAddr, sync::Arc};
use tokio::sync::broadcast::error::RecvError;
use tower::ServiceBuilder;
use tower_http::{services::ServeDir, trace::TraceLayer};
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::options::{Budget, ConceptOptions, DesignOptions, Mood, Personality, Room, Style, PRESET_EMOTIONS};
use crate::orchestrator::{Orchestrator, RunRequest, RunResult};

// Shared application state
#[derive(Clone)]
struct AppState {
    templates: Arc<AutoReloader>,
    orchestrator: Arc<Orchestrator>,
}

// Minijinja Environment setup
fn create_minijinja_env() -> AutoReloader {
    // Use AutoReloader for development convenience
    AutoReloader::new(|notifier| {
        let mut env = Environment::new();
        env.set_loader(path_loader("templates"));
        notifier.watch_path("templates", true);
        Ok(env)
    })
}

/// JSON error body with a status code.
struct ApiError {
    status: StatusCode,
    message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}

// Body and query rejections keep their status but answer in the same JSON shape.
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

/// `?run=<uuid>`: the id a browser picked for its run, so it can follow that
/// run's status updates on `/ws?run=<uuid>`.
#[derive(Debug, Default, Deserialize)]
struct RunParams {
    run: Option<Uuid>,
}

fn labels<T: ToString>(values: &[T]) -> Vec<String> {
    values.iter().map(ToString::to_string).collect()
}

fn option_lists() -> serde_json::Value {
    json!({
        "personalities": labels(Personality::ALL),
        "moods": labels(Mood::ALL),
        "rooms": labels(Room::ALL),
        "styles": labels(Style::ALL),
        "budgets": labels(Budget::ALL),
        "emotions": PRESET_EMOTIONS,
    })
}

async fn index_handler(State(state): State<AppState>) -> Result<Html<String>, ApiError> {
    state
        .templates
        .acquire_env()
        .and_then(|env| {
            env.get_template("index.html").and_then(|tmpl| {
                tmpl.render(minijinja::context! {
                    title => "EmotiSpace",
                    options => option_lists(),
                })
            })
        })
        .map(Html)
        .map_err(|e| {
            error!("Failed to get or render template: {}", e);
            ApiError {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                message: format!("Internal Server Error: {}", e),
            }
        })
}

async fn options_handler() -> Json<serde_json::Value> {
    Json(option_lists())
}

async fn execute(
    state: &AppState,
    run_id: Option<Uuid>,
    request: RunRequest,
) -> Result<Json<RunResult>, ApiError> {
    let run_id = run_id.unwrap_or_else(Uuid::new_v4);
    state
        .orchestrator
        .run_as(run_id, request)
        .await
        .map(Json)
        .map_err(|failure| ApiError {
            status: StatusCode::BAD_GATEWAY,
            message: failure.user_message(),
        })
}

async fn design_handler(
    State(state): State<AppState>,
    params: Result<Query<RunParams>, QueryRejection>,
    payload: Result<Json<DesignOptions>, JsonRejection>,
) -> Result<Json<RunResult>, ApiError> {
    let Query(params) = params?;
    let Json(options) = payload?;
    info!(?options, run = ?params.run, "Design run requested");
    execute(&state, params.run, RunRequest::Interior(options)).await
}

async fn concept_handler(
    State(state): State<AppState>,
    params: Result<Query<RunParams>, QueryRejection>,
    payload: Result<Json<ConceptOptions>, JsonRejection>,
) -> Result<Json<RunResult>, ApiError> {
    let Query(params) = params?;
    let Json(options) = payload?;
    info!(?options, run = ?params.run, "Concept run requested");
    options.validate().map_err(|e| ApiError {
        status: StatusCode::UNPROCESSABLE_ENTITY,
        message: e.to_string(),
    })?;
    execute(&state, params.run, RunRequest::Architecture(options)).await
}

// WebSocket upgrade handler
async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
    params: Result<Query<RunParams>, QueryRejection>,
) -> Result<Response, ApiError> {
    let Query(params) = params?;
    info!(run = ?params.run, "WebSocket connection upgrade requested");
    Ok(ws.on_upgrade(move |socket| handle_socket(socket, state, params.run)))
}

// Forwards status updates of `run` (or of every run) to one client until
// either side goes away.
async fn handle_socket(socket: WebSocket, state: AppState, run: Option<Uuid>) {
    let (mut sender, mut receiver) = socket.split();
    let mut status_rx = state.orchestrator.subscribe();

    loop {
        tokio::select! {
            status = status_rx.recv() => {
                match status {
                    Ok(status) if !status.belongs_to(run) => {}
                    Ok(status) => {
                        let Ok(json_msg) = serde_json::to_string(&status) else {
                            error!("Failed to serialize run status");
                            continue;
                        };
                        if sender.send(Message::Text(json_msg)).await.is_err() {
                            warn!("WebSocket client disconnected or send error. Closing connection.");
                            break;
                        }
                    }
                    Err(RecvError::Lagged(skipped)) => {
                        warn!(skipped, "WebSocket client lagging behind run status updates");
                    }
                    Err(RecvError::Closed) => break,
                }
            }

            msg = receiver.next() => {
                match msg {
                    Some(Ok(Message::Close(_))) | None => {
                        info!("WebSocket client disconnected");
                        break;
                    }
                    Some(Ok(_)) => {} // Status stream is one-way
                    Some(Err(e)) => {
                        warn!("WebSocket receive error: {}", e);
                        break;
                    }
                }
            }
        }
    }
    info!("WebSocket connection closed");
}

/// Application router, separate from the listener for testing.
pub fn router(orchestrator: Arc<Orchestrator>) -> Router {
    let state = AppState {
        templates: Arc::new(create_minijinja_env()),
        orchestrator,
    };

    Router::new()
        .route("/", get(index_handler))
        .route("/api/options", get(options_handler))
        .route("/api/design", post(design_handler))
        .route("/api/concept", post(concept_handler))
        .route("/ws", get(ws_handler))
        .nest_service("/static", ServeDir::new("static"))
        .with_state(state)
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http())) // Add request logging
}

pub async fn start_web_server(port: u16, orchestrator: Arc<Orchestrator>) -> Result<()> {
    let app = router(orchestrator);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    info!("Web server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context(format!("Failed to bind to address {}", addr))?;

    serve(listener, app.into_make_service())
        .await
        .context("Web server failed")?;

    Ok(())
}

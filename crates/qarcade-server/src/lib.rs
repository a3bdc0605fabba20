//! HTTP arcade server.
//!
//! Serves the slot machine, the attack simulation, the card game and the
//! console log as a JSON API. Every request goes through one lock around the
//! [`Arcade`], so console appends and deal replacements are atomic to
//! concurrent readers.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    Router,
    extract::{Query, State, rejection::QueryRejection},
    http::StatusCode,
    response::Json,
    routing::get,
};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tokio::sync::Mutex;
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;

use qarcade_core::{Arcade, ArcadeError, Regime};

/// Shared server state.
struct AppState {
    arcade: Mutex<Arcade>,
}

#[derive(Deserialize)]
struct PlayParams {
    /// Paired regime when true (default), Independent when false.
    use_quantum: Option<bool>,
    /// Attempt to read the outcome early.
    simulate_eavesdrop: Option<bool>,
    /// Card session; the shared default session when absent.
    session: Option<String>,
}

impl PlayParams {
    fn regime(&self) -> Regime {
        Regime::from_quantum_flag(self.use_quantum.unwrap_or(true))
    }

    fn eavesdrop(&self) -> bool {
        self.simulate_eavesdrop.unwrap_or(false)
    }
}

#[derive(Deserialize)]
struct GuessParams {
    player1: i64,
    player2: i64,
    session: Option<String>,
}

#[derive(Serialize)]
struct ConsoleResponse {
    logs: Vec<String>,
}

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    sessions: usize,
    log_entries: usize,
}

type ApiResponse = (StatusCode, Json<Value>);

fn status_for(err: &ArcadeError) -> StatusCode {
    match err {
        ArcadeError::InvalidArgument(_) => StatusCode::BAD_REQUEST,
        ArcadeError::NoActiveDeal => StatusCode::OK,
        ArcadeError::TamperDetected(_) | ArcadeError::Entropy(_) | ArcadeError::Internal(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

fn error_response(err: &ArcadeError) -> ApiResponse {
    let status = status_for(err);
    if status.is_server_error() {
        log::warn!("request failed: {err}");
    }
    (status, Json(json!({ "error": err.to_string() })))
}

/// Malformed or missing query parameters get the same JSON error body as
/// every other failure.
fn rejection_response(rejection: &QueryRejection) -> ApiResponse {
    log::debug!("rejected query: {}", rejection.body_text());
    (
        StatusCode::BAD_REQUEST,
        Json(json!({ "error": rejection.body_text() })),
    )
}

fn respond<T: Serialize>(result: Result<T, ArcadeError>) -> ApiResponse {
    let value = result.and_then(|v| {
        serde_json::to_value(v).map_err(|e| ArcadeError::Internal(e.to_string()))
    });
    match value {
        Ok(v) => (StatusCode::OK, Json(v)),
        Err(e) => error_response(&e),
    }
}

async fn handle_spin(
    State(state): State<Arc<AppState>>,
    params: Result<Query<PlayParams>, QueryRejection>,
) -> ApiResponse {
    let Query(params) = match params {
        Ok(q) => q,
        Err(rejection) => return rejection_response(&rejection),
    };
    let mut arcade = state.arcade.lock().await;
    respond(arcade.spin(params.regime(), params.eavesdrop()))
}

async fn handle_attack(
    State(state): State<Arc<AppState>>,
    params: Result<Query<PlayParams>, QueryRejection>,
) -> ApiResponse {
    let Query(params) = match params {
        Ok(q) => q,
        Err(rejection) => return rejection_response(&rejection),
    };
    let mut arcade = state.arcade.lock().await;
    respond(arcade.attack(params.regime(), params.eavesdrop()))
}

async fn handle_deal(
    State(state): State<Arc<AppState>>,
    params: Result<Query<PlayParams>, QueryRejection>,
) -> ApiResponse {
    let Query(params) = match params {
        Ok(q) => q,
        Err(rejection) => return rejection_response(&rejection),
    };
    let mut arcade = state.arcade.lock().await;
    respond(arcade.deal(
        params.session.as_deref(),
        params.regime(),
        params.eavesdrop(),
    ))
}

async fn handle_guess(
    State(state): State<Arc<AppState>>,
    params: Result<Query<GuessParams>, QueryRejection>,
) -> ApiResponse {
    let Query(params) = match params {
        Ok(q) => q,
        Err(rejection) => return rejection_response(&rejection),
    };
    let mut arcade = state.arcade.lock().await;
    respond(arcade.guess(params.session.as_deref(), params.player1, params.player2))
}

async fn handle_session(State(state): State<Arc<AppState>>) -> Json<Value> {
    let mut arcade = state.arcade.lock().await;
    Json(json!({ "session": arcade.new_session() }))
}

async fn handle_console(State(state): State<Arc<AppState>>) -> Json<ConsoleResponse> {
    let arcade = state.arcade.lock().await;
    Json(ConsoleResponse {
        logs: arcade.console(),
    })
}

async fn handle_health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let arcade = state.arcade.lock().await;
    Json(HealthResponse {
        status: "ok".to_string(),
        sessions: arcade.session_count(),
        log_entries: arcade.event_log().len(),
    })
}

async fn handle_index(State(state): State<Arc<AppState>>) -> Json<Value> {
    let arcade = state.arcade.lock().await;
    let policy = arcade.config().attack_policy.to_string();
    drop(arcade);

    Json(json!({
        "name": "Quantum Arcade Server",
        "version": qarcade_core::VERSION,
        "attack_policy": policy,
        "endpoints": {
            "/": "This API index",
            "/api/spin": "Spin the slot machine (use_quantum, simulate_eavesdrop)",
            "/api/attack": "Try to force a jackpot (use_quantum, simulate_eavesdrop)",
            "/api/card/session": "Mint a card session id",
            "/api/card/deal": "Deal two cards (use_quantum, simulate_eavesdrop, session)",
            "/api/card/guess": "Score two guesses (player1, player2, session)",
            "/api/console": "Recent console events, oldest first",
            "/health": "Health check",
        },
        "examples": {
            "quantum_spin": "/api/spin?use_quantum=true",
            "eavesdropped_deal": "/api/card/deal?use_quantum=false&simulate_eavesdrop=true",
            "guess": "/api/card/guess?player1=7&player2=12",
        }
    }))
}

/// Build the axum router.
pub fn build_router(arcade: Arcade, timeout: Duration) -> Router {
    let state = Arc::new(AppState {
        arcade: Mutex::new(arcade),
    });

    Router::new()
        .route("/", get(handle_index))
        .route("/api/spin", get(handle_spin))
        .route("/api/attack", get(handle_attack))
        .route("/api/card/session", get(handle_session))
        .route("/api/card/deal", get(handle_deal))
        .route("/api/card/guess", get(handle_guess))
        .route("/api/console", get(handle_console))
        .route("/health", get(handle_health))
        .layer(TimeoutLayer::new(timeout))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Run the HTTP arcade server until the listener fails.
pub async fn run_server(
    arcade: Arcade,
    host: &str,
    port: u16,
    timeout: Duration,
) -> std::io::Result<()> {
    let app = build_router(arcade, timeout);
    let addr = format!("{host}:{port}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    log::info!("listening on http://{addr}");
    axum::serve(listener, app).await
}

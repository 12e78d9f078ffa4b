//! Browser front end: one HTML page plus a small JSON API over per-visitor
//! session contexts.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tokio::net::TcpListener;
use tokio::sync::{Mutex, RwLock};
use tokio::time::Instant;
use tower_http::trace::TraceLayer;
use tracing::{debug, info};
use uuid::Uuid;

use crate::conversation_state::Turn;
use crate::model::CareerModel;
use crate::session::{SessionContext, SessionError};

const PAGE: &str = include_str!("page.html");

/// Sessions untouched for this long are dropped.
pub const SESSION_IDLE_TTL: Duration = Duration::from_secs(60 * 60);

const SWEEP_INTERVAL: Duration = Duration::from_secs(5 * 60);

struct Entry {
    context: Arc<Mutex<SessionContext>>,
    last_used: Instant,
}

/// Keeps every visitor's conversation apart from everyone else's, and
/// forgets conversations nobody has touched for a while.
#[derive(Clone)]
pub struct SessionRegistry {
    sessions: Arc<RwLock<HashMap<Uuid, Entry>>>,
    idle_ttl: Duration,
}

impl SessionRegistry {
    pub fn new(idle_ttl: Duration) -> Self {
        Self {
            sessions: Arc::default(),
            idle_ttl,
        }
    }

    pub async fn create(&self, model: &CareerModel) -> Uuid {
        self.evict_idle().await;

        let id = Uuid::new_v4();
        let entry = Entry {
            context: Arc::new(Mutex::new(SessionContext::new(model.clone()))),
            last_used: Instant::now(),
        };
        self.sessions.write().await.insert(id, entry);
        id
    }

    pub async fn get(&self, id: &Uuid) -> Option<Arc<Mutex<SessionContext>>> {
        let mut sessions = self.sessions.write().await;
        let entry = sessions.get_mut(id)?;
        entry.last_used = Instant::now();
        Some(Arc::clone(&entry.context))
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// Drops idle sessions that no request is currently using. Returns how
    /// many were dropped.
    pub async fn evict_idle(&self) -> usize {
        let now = Instant::now();
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, entry| {
            now.duration_since(entry.last_used) < self.idle_ttl
                || Arc::strong_count(&entry.context) > 1
        });
        let evicted = before - sessions.len();
        if evicted > 0 {
            debug!(evicted, remaining = sessions.len(), "Evicted idle sessions");
        }
        evicted
    }

    fn spawn_sweeper(&self) {
        let registry = self.clone();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(SWEEP_INTERVAL);
            loop {
                ticker.tick().await;
                registry.evict_idle().await;
            }
        });
    }
}

#[derive(Clone)]
struct AppState {
    model: CareerModel,
    sessions: SessionRegistry,
}

#[derive(Debug, Serialize)]
struct SessionCreated {
    session_id: Uuid,
}

#[derive(Debug, Deserialize)]
struct MessageRequest {
    text: String,
}

#[derive(Debug, Serialize)]
struct TurnsResponse {
    turns: Vec<Turn>,
}

#[derive(Debug)]
struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn unknown_session(id: Uuid) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: format!("unknown session {id}"),
        }
    }
}

impl From<SessionError> for ApiError {
    fn from(error: SessionError) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: error.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let body = Json(json!({
            "error": self.message
        }));
        (self.status, body).into_response()
    }
}

pub fn router(model: CareerModel, sessions: SessionRegistry) -> Router {
    let state = AppState { model, sessions };

    Router::new()
        .route("/", get(index))
        .route("/health", get(health))
        .route("/api/sessions", post(create_session))
        .route("/api/sessions/:id/history", get(history))
        .route("/api/sessions/:id/messages", post(send_message))
        .route("/api/sessions/:id/reset", post(reset))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

pub async fn serve(model: CareerModel, addr: SocketAddr) -> eyre::Result<()> {
    let listener = TcpListener::bind(addr).await?;
    info!(addr = %listener.local_addr()?, "Serving career guide");

    let sessions = SessionRegistry::new(SESSION_IDLE_TTL);
    sessions.spawn_sweeper();
    axum::serve(listener, router(model, sessions)).await?;
    Ok(())
}

async fn index() -> Html<&'static str> {
    Html(PAGE)
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

async fn create_session(State(state): State<AppState>) -> Json<SessionCreated> {
    let session_id = state.sessions.create(&state.model).await;
    let active = state.sessions.len().await;
    debug!(%session_id, active, "Created web session");
    Json(SessionCreated { session_id })
}

async fn lookup(state: &AppState, id: Uuid) -> Result<Arc<Mutex<SessionContext>>, ApiError> {
    state
        .sessions
        .get(&id)
        .await
        .ok_or_else(|| ApiError::unknown_session(id))
}

async fn history(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<TurnsResponse>, ApiError> {
    let session = lookup(&state, id).await?;
    let session = session.lock().await;
    Ok(Json(TurnsResponse {
        turns: session.conversation().turns().to_vec(),
    }))
}

/// Holds the session lock for the whole exchange, so a visitor has at most
/// one turn in flight.
async fn send_message(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<MessageRequest>,
) -> Result<Json<TurnsResponse>, ApiError> {
    let session = lookup(&state, id).await?;
    let mut session = session.lock().await;
    let added = session.submit(&request.text).await?;
    Ok(Json(TurnsResponse {
        turns: added.to_vec(),
    }))
}

async fn reset(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<TurnsResponse>, ApiError> {
    let session = lookup(&state, id).await?;
    session.lock().await.reset();
    Ok(Json(TurnsResponse { turns: Vec::new() }))
}

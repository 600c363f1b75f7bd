pub mod auth;
pub mod chat;
pub mod error;
pub mod messages;
pub mod requests;
pub mod storage;
pub mod upload;

use std::sync::Arc;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};
use chrono::{DateTime, Utc};
use tower_http::services::ServeDir;
use tracing::warn;

use foyer_db::Database;

use crate::error::ApiError;
use crate::storage::AvatarStore;

/// Shared application state for all route handlers.
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<Database>,
    pub avatars: Arc<AvatarStore>,
    pub admin_password: String,
}

const MAX_BODY_BYTES: usize = 8 * 1024 * 1024; // 8 MiB, covers the base64 envelope

/// Assemble all routes. Cross-cutting layers (CORS, request tracing) are
/// applied by the server binary on top of this.
pub fn router(state: AppState) -> Router {
    let avatar_dir = state.avatars.dir().to_path_buf();

    Router::new()
        .route(
            "/requests",
            get(requests::list_requests)
                .post(requests::create_request)
                .put(requests::set_request_status)
                .delete(requests::delete_request),
        )
        .route(
            "/messages",
            get(messages::list_messages)
                .post(messages::create_message)
                .put(messages::set_message_read)
                .delete(messages::delete_message),
        )
        .route("/chat", get(chat::list_chat).post(chat::send_chat))
        .route("/upload-avatar", post(upload::upload_avatar))
        .route("/health", get(health))
        .nest_service("/avatars", ServeDir::new(avatar_dir))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .with_state(state)
}

/// GET /health — liveness check (no auth).
pub async fn health() -> &'static str {
    "ok"
}

/// Run blocking rusqlite work off the async runtime.
pub(crate) async fn run_blocking<T, F>(f: F) -> Result<T, ApiError>
where
    F: FnOnce() -> anyhow::Result<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| ApiError::Internal(anyhow::anyhow!("spawn_blocking join error: {}", e)))?
        .map_err(ApiError::Internal)
}

/// SQLite stores timestamps as "YYYY-MM-DD HH:MM:SS" without timezone.
/// Parse as naive UTC and convert, trying RFC 3339 first.
pub(crate) fn parse_created_at(raw: &str, entity: &str, id: i64) -> DateTime<Utc> {
    raw.parse::<DateTime<Utc>>()
        .or_else(|_| {
            chrono::NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S").map(|ndt| ndt.and_utc())
        })
        .unwrap_or_else(|e| {
            warn!("Corrupt created_at '{}' on {} {}: {}", raw, entity, id, e);
            DateTime::default()
        })
}

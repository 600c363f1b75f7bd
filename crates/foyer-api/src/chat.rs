use axum::{
    Json,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
};
use tracing::warn;

use foyer_db::models::ChatEntryRow;
use foyer_types::api::SendChatBody;
use foyer_types::models::{ChatEntry, ChatSender};

use crate::error::ApiError;
use crate::{AppState, auth, parse_created_at, run_blocking};

/// Public read: visitor and operator poll the same shared transcript.
pub async fn list_chat(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let db = state.db.clone();
    let rows = run_blocking(move || db.list_chat_entries()).await?;

    let entries: Vec<ChatEntry> = rows.into_iter().map(to_chat_entry).collect();
    Ok(Json(entries))
}

/// Append-only. Admin entries must pass the gate and carry no name; visitor
/// entries are public and must carry one.
pub async fn send_chat(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<SendChatBody>,
) -> Result<impl IntoResponse, ApiError> {
    let message = body.message.trim().to_string();
    if message.is_empty() {
        return Err(ApiError::InvalidInput("Sender and message are required".into()));
    }

    let name = match body.sender {
        ChatSender::Admin => {
            auth::authorize(&headers, &state.admin_password)?;
            if body.name.is_some() {
                return Err(ApiError::InvalidInput(
                    "name must be omitted for admin messages".into(),
                ));
            }
            None
        }
        ChatSender::Visitor => {
            let name = body.name.as_deref().map(str::trim).unwrap_or_default();
            if name.is_empty() {
                return Err(ApiError::InvalidInput(
                    "name is required for visitor messages".into(),
                ));
            }
            Some(name.to_string())
        }
    };

    let sender = body.sender;
    let db = state.db.clone();
    let row =
        run_blocking(move || db.insert_chat_entry(sender.as_str(), name.as_deref(), &message))
            .await?;

    Ok((StatusCode::CREATED, Json(to_chat_entry(row))))
}

fn to_chat_entry(row: ChatEntryRow) -> ChatEntry {
    let created_at = parse_created_at(&row.created_at, "chat entry", row.id);
    let sender = row.sender.parse().unwrap_or_else(|e| {
        warn!("Corrupt sender on chat entry {}: {}", row.id, e);
        ChatSender::Visitor
    });

    ChatEntry {
        id: row.id,
        sender,
        name: row.name,
        message: row.message,
        created_at,
    }
}

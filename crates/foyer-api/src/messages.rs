use axum::{
    Json,
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
};
use tracing::info;

use foyer_db::models::ContactMessageRow;
use foyer_types::api::{CreateMessageBody, IdQuery, SetReadBody};
use foyer_types::models::ContactMessage;

use crate::error::ApiError;
use crate::{AppState, auth, parse_created_at, run_blocking};

pub async fn list_messages(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, ApiError> {
    auth::authorize(&headers, &state.admin_password)?;

    let db = state.db.clone();
    let rows = run_blocking(move || db.list_contact_messages()).await?;

    let messages: Vec<ContactMessage> = rows.into_iter().map(to_contact_message).collect();
    Ok(Json(messages))
}

/// Public write, no auth.
pub async fn create_message(
    State(state): State<AppState>,
    Json(body): Json<CreateMessageBody>,
) -> Result<impl IntoResponse, ApiError> {
    let name = body.name.trim().to_string();
    let message = body.message.trim().to_string();
    if name.is_empty() || message.is_empty() {
        return Err(ApiError::InvalidInput("Name and message are required".into()));
    }

    let email = match body.email.as_deref().map(str::trim) {
        None => None,
        Some("") => {
            return Err(ApiError::InvalidInput("email must not be empty".into()));
        }
        Some(email) => Some(email.to_string()),
    };

    let db = state.db.clone();
    let row =
        run_blocking(move || db.insert_contact_message(&name, email.as_deref(), &message)).await?;

    info!("Contact message {} received from {}", row.id, row.name);
    Ok((StatusCode::CREATED, Json(to_contact_message(row))))
}

pub async fn set_message_read(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<SetReadBody>,
) -> Result<impl IntoResponse, ApiError> {
    auth::authorize(&headers, &state.admin_password)?;

    let db = state.db.clone();
    let row = run_blocking(move || db.set_message_read(body.id, body.is_read))
        .await?
        .ok_or(ApiError::NotFound("Message"))?;

    Ok(Json(to_contact_message(row)))
}

pub async fn delete_message(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<IdQuery>,
) -> Result<StatusCode, ApiError> {
    auth::authorize(&headers, &state.admin_password)?;

    let db = state.db.clone();
    let deleted = run_blocking(move || db.delete_contact_message(query.id)).await?;
    if !deleted {
        return Err(ApiError::NotFound("Message"));
    }

    info!("Message {} deleted", query.id);
    Ok(StatusCode::NO_CONTENT)
}

fn to_contact_message(row: ContactMessageRow) -> ContactMessage {
    let created_at = parse_created_at(&row.created_at, "message", row.id);

    ContactMessage {
        id: row.id,
        name: row.name,
        email: row.email,
        message: row.message,
        is_read: row.is_read,
        created_at,
    }
}

use axum::{
    Json,
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
};
use tracing::{info, warn};

use foyer_db::models::FriendRequestRow;
use foyer_db::queries::StatusUpdate;
use foyer_types::api::{CreateRequestBody, IdQuery, SetStatusBody};
use foyer_types::models::{FriendRequest, RequestStatus};

use crate::error::ApiError;
use crate::{AppState, auth, parse_created_at, run_blocking};

pub async fn list_requests(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, ApiError> {
    auth::authorize(&headers, &state.admin_password)?;

    let db = state.db.clone();
    let rows = run_blocking(move || db.list_friend_requests()).await?;

    let requests: Vec<FriendRequest> = rows.into_iter().map(to_friend_request).collect();
    Ok(Json(requests))
}

/// Public write: the one surface the gate must never block.
pub async fn create_request(
    State(state): State<AppState>,
    Json(body): Json<CreateRequestBody>,
) -> Result<impl IntoResponse, ApiError> {
    let name = body.name.trim().to_string();
    let description = body.description.trim().to_string();
    if name.is_empty() || description.is_empty() {
        return Err(ApiError::InvalidInput(
            "Name and description are required".into(),
        ));
    }

    let avatar_url = match body.avatar_url.as_deref() {
        None => None,
        Some(url) => {
            if !state.avatars.validate_url(url).await {
                return Err(ApiError::InvalidInput(
                    "avatar_url was not issued by this server".into(),
                ));
            }
            Some(url.to_string())
        }
    };

    let db = state.db.clone();
    let row = run_blocking(move || {
        db.insert_friend_request(&name, &description, avatar_url.as_deref())
    })
    .await?;

    info!("Friend request {} created by {}", row.id, row.name);
    Ok((StatusCode::CREATED, Json(to_friend_request(row))))
}

pub async fn set_request_status(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<SetStatusBody>,
) -> Result<impl IntoResponse, ApiError> {
    auth::authorize(&headers, &state.admin_password)?;

    // Only the two decided states are valid targets; "pending" is the
    // starting state, never a destination.
    if body.status == RequestStatus::Pending {
        return Err(ApiError::InvalidInput(
            "status must be approved or rejected".into(),
        ));
    }

    let db = state.db.clone();
    let outcome = run_blocking(move || db.set_request_status(body.id, body.status.as_str())).await?;

    match outcome {
        StatusUpdate::Updated(row) => {
            info!("Request {} marked {}", row.id, row.status);
            Ok(Json(to_friend_request(row)))
        }
        StatusUpdate::Missing => Err(ApiError::NotFound("Request")),
        StatusUpdate::AlreadyDecided => Err(ApiError::InvalidTransition),
    }
}

pub async fn delete_request(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<IdQuery>,
) -> Result<StatusCode, ApiError> {
    auth::authorize(&headers, &state.admin_password)?;

    let db = state.db.clone();
    let deleted = run_blocking(move || db.delete_friend_request(query.id)).await?;
    if !deleted {
        return Err(ApiError::NotFound("Request"));
    }

    info!("Request {} deleted", query.id);
    Ok(StatusCode::NO_CONTENT)
}

fn to_friend_request(row: FriendRequestRow) -> FriendRequest {
    let created_at = parse_created_at(&row.created_at, "request", row.id);
    let status = row.status.parse().unwrap_or_else(|e| {
        warn!("Corrupt status on request {}: {}", row.id, e);
        RequestStatus::Pending
    });

    FriendRequest {
        id: row.id,
        name: row.name,
        description: row.description,
        avatar_url: row.avatar_url,
        status,
        created_at,
    }
}

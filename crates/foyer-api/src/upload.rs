use axum::{Json, extract::State, response::IntoResponse};
use base64::Engine;
use base64::engine::general_purpose::STANDARD as B64;
use uuid::Uuid;

use foyer_types::api::{UploadAvatarBody, UploadAvatarResponse};

use crate::error::ApiError;
use crate::AppState;

const ALLOWED_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "webp"];

/// POST /upload-avatar — store a base64 blob, return its URL. Public: the
/// upload happens before the friend request that references it exists.
pub async fn upload_avatar(
    State(state): State<AppState>,
    Json(body): Json<UploadAvatarBody>,
) -> Result<impl IntoResponse, ApiError> {
    if body.file.is_empty() {
        return Err(ApiError::InvalidInput("File data is required".into()));
    }

    // Accept either raw base64 or a full data URL; everything before the
    // first comma is the media-type preamble.
    let payload = body
        .file
        .split_once(',')
        .map(|(_, rest)| rest)
        .unwrap_or(&body.file);
    let bytes = B64
        .decode(payload.trim())
        .map_err(|_| ApiError::InvalidInput("File data is not valid base64".into()))?;

    // The stored name is server-chosen; only the extension survives from the
    // client, and only off an allowlist.
    let file_name = body.file_name.as_deref().unwrap_or("avatar.jpg");
    let ext = file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .filter(|ext| ALLOWED_EXTENSIONS.contains(&ext.as_str()))
        .unwrap_or_else(|| "jpg".to_string());

    let name = format!("{}.{}", Uuid::new_v4(), ext);
    let url = state
        .avatars
        .store(&name, &bytes)
        .await
        .map_err(ApiError::Internal)?;

    Ok(Json(UploadAvatarResponse { url }))
}

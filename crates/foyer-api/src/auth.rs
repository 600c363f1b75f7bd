use axum::http::HeaderMap;

use foyer_types::api::ADMIN_PASSWORD_HEADER;

use crate::error::ApiError;

/// Gate every privileged call: plain equality between the presented header
/// and the one process-configured secret. No sessions, no expiry, and no
/// hints about how close a wrong value was.
pub fn authorize(headers: &HeaderMap, admin_password: &str) -> Result<(), ApiError> {
    let provided = headers
        .get(ADMIN_PASSWORD_HEADER)
        .and_then(|v| v.to_str().ok())
        .ok_or(ApiError::Unauthorized)?;

    if provided != admin_password {
        return Err(ApiError::Unauthorized);
    }

    Ok(())
}

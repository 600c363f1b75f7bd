use serde::{Deserialize, Serialize};

use crate::models::{ChatSender, RequestStatus};

/// Header carrying the operator secret, resent on every privileged call.
pub const ADMIN_PASSWORD_HEADER: &str = "X-Admin-Password";

// Request schemas are strict: unknown fields are rejected at the boundary
// rather than silently dropped.

// -- Friend requests --

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateRequestBody {
    pub name: String,
    pub description: String,
    pub avatar_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SetStatusBody {
    pub id: i64,
    pub status: RequestStatus,
}

// -- Contact messages --

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateMessageBody {
    pub name: String,
    pub email: Option<String>,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SetReadBody {
    pub id: i64,
    pub is_read: bool,
}

// -- Chat --

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SendChatBody {
    pub sender: ChatSender,
    pub name: Option<String>,
    pub message: String,
}

// -- Avatar upload --

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UploadAvatarBody {
    /// Base64 payload, optionally a full data URL ("data:...;base64,...").
    pub file: String,
    #[serde(rename = "fileName")]
    pub file_name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadAvatarResponse {
    pub url: String,
}

// -- Shared --

/// `?id=` query parameter used by the DELETE endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct IdQuery {
    pub id: i64,
}

/// JSON error envelope returned on every non-2xx response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

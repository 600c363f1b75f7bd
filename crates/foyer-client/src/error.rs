use reqwest::StatusCode;
use thiserror::Error;

/// Client-side view of the failure taxonomy. Transport failures get their
/// own variant so the poller can tell a blip from a rejection.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("unauthorized")]
    Unauthorized,

    #[error("not found")]
    NotFound,

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("invalid transition: the request has already been decided")]
    InvalidTransition,

    #[error("unexpected status {0}")]
    Unexpected(StatusCode),

    #[error("upstream unavailable: {0}")]
    Upstream(#[from] reqwest::Error),
}

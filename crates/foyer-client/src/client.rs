use base64::Engine;
use base64::engine::general_purpose::STANDARD as B64;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;

use foyer_types::api::{
    ADMIN_PASSWORD_HEADER, CreateMessageBody, CreateRequestBody, ErrorBody, SendChatBody,
    SetReadBody, SetStatusBody, UploadAvatarBody, UploadAvatarResponse,
};
use foyer_types::models::{ChatEntry, ChatSender, ContactMessage, FriendRequest, RequestStatus};

use crate::error::ClientError;

/// Operator credential. Never stored globally; every privileged call takes
/// it as an explicit parameter and resends it in the auth header.
#[derive(Debug, Clone)]
pub struct AdminToken(String);

impl AdminToken {
    pub fn new(secret: impl Into<String>) -> Self {
        Self(secret.into())
    }

    fn as_str(&self) -> &str {
        &self.0
    }
}

/// Typed HTTP client for both surfaces: the public visitor writes
/// (SubmissionFlow) and the credentialed operator calls.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    // -- Visitor surface (public, no credential) --

    /// Upload an avatar blob; returns the URL to reference from a
    /// subsequent friend request.
    pub async fn upload_avatar(
        &self,
        bytes: &[u8],
        file_name: &str,
    ) -> Result<String, ClientError> {
        let body = UploadAvatarBody {
            file: B64.encode(bytes),
            file_name: Some(file_name.to_string()),
        };
        let resp = self
            .http
            .post(self.url("/upload-avatar"))
            .json(&body)
            .send()
            .await?;
        let body: UploadAvatarResponse = decode(resp).await?;
        Ok(body.url)
    }

    pub async fn submit_friend_request(
        &self,
        name: &str,
        description: &str,
        avatar_url: Option<String>,
    ) -> Result<FriendRequest, ClientError> {
        let body = CreateRequestBody {
            name: name.to_string(),
            description: description.to_string(),
            avatar_url,
        };
        let resp = self.http.post(self.url("/requests")).json(&body).send().await?;
        decode(resp).await
    }

    pub async fn submit_message(
        &self,
        name: &str,
        email: Option<&str>,
        message: &str,
    ) -> Result<ContactMessage, ClientError> {
        let body = CreateMessageBody {
            name: name.to_string(),
            email: email.map(str::to_string),
            message: message.to_string(),
        };
        let resp = self.http.post(self.url("/messages")).json(&body).send().await?;
        decode(resp).await
    }

    pub async fn send_visitor_chat(
        &self,
        name: &str,
        message: &str,
    ) -> Result<ChatEntry, ClientError> {
        let body = SendChatBody {
            sender: ChatSender::Visitor,
            name: Some(name.to_string()),
            message: message.to_string(),
        };
        let resp = self.http.post(self.url("/chat")).json(&body).send().await?;
        decode(resp).await
    }

    /// The transcript read is public: both surfaces poll the same log.
    pub async fn list_chat(&self) -> Result<Vec<ChatEntry>, ClientError> {
        let resp = self.http.get(self.url("/chat")).send().await?;
        decode(resp).await
    }

    // -- Operator surface (explicit credential on every call) --

    pub async fn list_requests(
        &self,
        token: &AdminToken,
    ) -> Result<Vec<FriendRequest>, ClientError> {
        let resp = self
            .http
            .get(self.url("/requests"))
            .header(ADMIN_PASSWORD_HEADER, token.as_str())
            .send()
            .await?;
        decode(resp).await
    }

    pub async fn set_request_status(
        &self,
        token: &AdminToken,
        id: i64,
        status: RequestStatus,
    ) -> Result<FriendRequest, ClientError> {
        let body = SetStatusBody { id, status };
        let resp = self
            .http
            .put(self.url("/requests"))
            .header(ADMIN_PASSWORD_HEADER, token.as_str())
            .json(&body)
            .send()
            .await?;
        decode(resp).await
    }

    pub async fn delete_request(&self, token: &AdminToken, id: i64) -> Result<(), ClientError> {
        let resp = self
            .http
            .delete(self.url("/requests"))
            .query(&[("id", id)])
            .header(ADMIN_PASSWORD_HEADER, token.as_str())
            .send()
            .await?;
        check(resp).await?;
        Ok(())
    }

    pub async fn list_messages(
        &self,
        token: &AdminToken,
    ) -> Result<Vec<ContactMessage>, ClientError> {
        let resp = self
            .http
            .get(self.url("/messages"))
            .header(ADMIN_PASSWORD_HEADER, token.as_str())
            .send()
            .await?;
        decode(resp).await
    }

    pub async fn set_message_read(
        &self,
        token: &AdminToken,
        id: i64,
        is_read: bool,
    ) -> Result<ContactMessage, ClientError> {
        let body = SetReadBody { id, is_read };
        let resp = self
            .http
            .put(self.url("/messages"))
            .header(ADMIN_PASSWORD_HEADER, token.as_str())
            .json(&body)
            .send()
            .await?;
        decode(resp).await
    }

    pub async fn delete_message(&self, token: &AdminToken, id: i64) -> Result<(), ClientError> {
        let resp = self
            .http
            .delete(self.url("/messages"))
            .query(&[("id", id)])
            .header(ADMIN_PASSWORD_HEADER, token.as_str())
            .send()
            .await?;
        check(resp).await?;
        Ok(())
    }

    pub async fn send_admin_chat(
        &self,
        token: &AdminToken,
        message: &str,
    ) -> Result<ChatEntry, ClientError> {
        let body = SendChatBody {
            sender: ChatSender::Admin,
            name: None,
            message: message.to_string(),
        };
        let resp = self
            .http
            .post(self.url("/chat"))
            .header(ADMIN_PASSWORD_HEADER, token.as_str())
            .json(&body)
            .send()
            .await?;
        decode(resp).await
    }
}

async fn decode<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, ClientError> {
    let resp = check(resp).await?;
    Ok(resp.json().await?)
}

/// Map non-2xx responses onto the error taxonomy, pulling the server's
/// `{"error": ...}` envelope through when it parses.
async fn check(resp: reqwest::Response) -> Result<reqwest::Response, ClientError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }

    let message = resp
        .json::<ErrorBody>()
        .await
        .map(|b| b.error)
        .unwrap_or_else(|_| status.to_string());

    Err(match status {
        StatusCode::UNAUTHORIZED => ClientError::Unauthorized,
        StatusCode::NOT_FOUND => ClientError::NotFound,
        StatusCode::CONFLICT => ClientError::InvalidTransition,
        StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
            ClientError::InvalidInput(message)
        }
        other => ClientError::Unexpected(other),
    })
}

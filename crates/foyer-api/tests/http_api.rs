use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

use foyer_api::storage::AvatarStore;
use foyer_api::{AppState, router};
use foyer_db::Database;

const ADMIN_PASSWORD: &str = "correct-horse-battery";

async fn app() -> Router {
    let db = Arc::new(Database::open_in_memory().unwrap());
    let dir = std::env::temp_dir().join(format!("foyer-api-test-{}", uuid::Uuid::new_v4()));
    let avatars = Arc::new(AvatarStore::new(dir, "").await.unwrap());
    router(AppState {
        db,
        avatars,
        admin_password: ADMIN_PASSWORD.into(),
    })
}

fn json_request(method: Method, uri: &str, body: &Value, admin: bool) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if admin {
        builder = builder.header("X-Admin-Password", ADMIN_PASSWORD);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

fn bare_request(method: Method, uri: &str, password: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(password) = password {
        builder = builder.header("X-Admin-Password", password);
    }
    builder.body(Body::empty()).unwrap()
}

async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
    let resp = app.clone().oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = resp.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, body)
}

async fn admin_list(app: &Router, uri: &str) -> Vec<Value> {
    let (status, body) = send(app, bare_request(Method::GET, uri, Some(ADMIN_PASSWORD))).await;
    assert_eq!(status, StatusCode::OK);
    body.as_array().unwrap().clone()
}

#[tokio::test]
async fn moderation_lifecycle() {
    let app = app().await;

    let (status, created) = send(
        &app,
        json_request(
            Method::POST,
            "/requests",
            &json!({"name": "Mike", "description": "hi", "avatar_url": null}),
            false,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["status"], "pending");
    assert_eq!(created["name"], "Mike");
    let id = created["id"].as_i64().unwrap();

    let listed = admin_list(&app, "/requests").await;
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0]["status"], "pending");

    let (status, updated) = send(
        &app,
        json_request(
            Method::PUT,
            "/requests",
            &json!({"id": id, "status": "approved"}),
            true,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["status"], "approved");

    let listed = admin_list(&app, "/requests").await;
    assert_eq!(listed[0]["status"], "approved");

    // A decided request cannot be re-decided.
    let (status, _) = send(
        &app,
        json_request(
            Method::PUT,
            "/requests",
            &json!({"id": id, "status": "rejected"}),
            true,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    let listed = admin_list(&app, "/requests").await;
    assert_eq!(listed[0]["status"], "approved");

    let (status, _) = send(
        &app,
        bare_request(
            Method::DELETE,
            &format!("/requests?id={id}"),
            Some(ADMIN_PASSWORD),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(
        &app,
        bare_request(
            Method::DELETE,
            &format!("/requests?id={id}"),
            Some(ADMIN_PASSWORD),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    assert!(admin_list(&app, "/requests").await.is_empty());
}

#[tokio::test]
async fn set_status_rejects_pending_target_and_missing_id() {
    let app = app().await;

    let (status, _) = send(
        &app,
        json_request(
            Method::PUT,
            "/requests",
            &json!({"id": 1, "status": "pending"}),
            true,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &app,
        json_request(
            Method::PUT,
            "/requests",
            &json!({"id": 42, "status": "approved"}),
            true,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn create_request_validates_input() {
    let app = app().await;

    let (status, body) = send(
        &app,
        json_request(
            Method::POST,
            "/requests",
            &json!({"name": "  ", "description": "hi", "avatar_url": null}),
            false,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Name and description are required");

    // Unknown fields are rejected, not coerced.
    let (status, _) = send(
        &app,
        json_request(
            Method::POST,
            "/requests",
            &json!({"name": "Mike", "description": "hi", "extra": true}),
            false,
        ),
    )
    .await;
    assert!(status.is_client_error());

    assert!(admin_list(&app, "/requests").await.is_empty());
}

#[tokio::test]
async fn unauthorized_calls_leave_state_untouched() {
    let app = app().await;

    let (status, created) = send(
        &app,
        json_request(
            Method::POST,
            "/requests",
            &json!({"name": "Mike", "description": "hi", "avatar_url": null}),
            false,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let id = created["id"].as_i64().unwrap();

    let (status, _) = send(&app, bare_request(Method::GET, "/requests", None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    let (status, _) = send(&app, bare_request(Method::GET, "/requests", Some("wrong"))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let forged = Request::builder()
        .method(Method::PUT)
        .uri("/requests")
        .header(header::CONTENT_TYPE, "application/json")
        .header("X-Admin-Password", "wrong")
        .body(Body::from(json!({"id": id, "status": "approved"}).to_string()))
        .unwrap();
    let (status, _) = send(&app, forged).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(
        &app,
        bare_request(Method::DELETE, &format!("/requests?id={id}"), Some("wrong")),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // Snapshot after the failed calls: still one pending request.
    let listed = admin_list(&app, "/requests").await;
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0]["status"], "pending");
}

#[tokio::test]
async fn message_read_flag_toggles_and_deletes() {
    let app = app().await;

    let (status, created) = send(
        &app,
        json_request(
            Method::POST,
            "/messages",
            &json!({"name": "Ann", "email": "ann@example.com", "message": "hello"}),
            false,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["is_read"], false);
    let id = created["id"].as_i64().unwrap();

    let (status, updated) = send(
        &app,
        json_request(
            Method::PUT,
            "/messages",
            &json!({"id": id, "is_read": true}),
            true,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["is_read"], true);

    // And back again: the flag is not monotonic.
    let (status, updated) = send(
        &app,
        json_request(
            Method::PUT,
            "/messages",
            &json!({"id": id, "is_read": false}),
            true,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["is_read"], false);

    let (status, _) = send(
        &app,
        json_request(
            Method::PUT,
            "/messages",
            &json!({"id": 999, "is_read": true}),
            true,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(
        &app,
        bare_request(
            Method::DELETE,
            &format!("/messages?id={id}"),
            Some(ADMIN_PASSWORD),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = send(
        &app,
        bare_request(
            Method::DELETE,
            &format!("/messages?id={id}"),
            Some(ADMIN_PASSWORD),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn chat_transcript_interleaves_in_submission_order() {
    let app = app().await;

    let (status, _) = send(
        &app,
        json_request(
            Method::POST,
            "/chat",
            &json!({"sender": "visitor", "name": "Ann", "message": "hello"}),
            false,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    // Admin replies need the gate...
    let (status, _) = send(
        &app,
        json_request(
            Method::POST,
            "/chat",
            &json!({"sender": "admin", "name": null, "message": "hi Ann"}),
            false,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, entry) = send(
        &app,
        json_request(
            Method::POST,
            "/chat",
            &json!({"sender": "admin", "name": null, "message": "hi Ann"}),
            true,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(entry["name"], Value::Null);

    // ...while the transcript read is public.
    let (status, body) = send(&app, bare_request(Method::GET, "/chat", None)).await;
    assert_eq!(status, StatusCode::OK);
    let entries = body.as_array().unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0]["sender"], "visitor");
    assert_eq!(entries[0]["name"], "Ann");
    assert_eq!(entries[1]["sender"], "admin");
    assert_eq!(entries[1]["name"], Value::Null);
}

#[tokio::test]
async fn chat_validation() {
    let app = app().await;

    let (status, _) = send(
        &app,
        json_request(
            Method::POST,
            "/chat",
            &json!({"sender": "visitor", "name": "Ann", "message": "   "}),
            false,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &app,
        json_request(
            Method::POST,
            "/chat",
            &json!({"sender": "visitor", "name": null, "message": "hi"}),
            false,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &app,
        json_request(
            Method::POST,
            "/chat",
            &json!({"sender": "admin", "name": "Boss", "message": "hi"}),
            true,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(&app, bare_request(Method::GET, "/chat", None)).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn avatar_upload_round_trip() {
    let app = app().await;
    let pixel = b"not-really-a-png-but-bytes";
    let encoded = {
        use base64::Engine;
        base64::engine::general_purpose::STANDARD.encode(pixel)
    };

    let (status, body) = send(
        &app,
        json_request(
            Method::POST,
            "/upload-avatar",
            &json!({"file": format!("data:image/png;base64,{encoded}"), "fileName": "me.png"}),
            false,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let url = body["url"].as_str().unwrap().to_string();
    assert!(url.starts_with("/avatars/"));
    assert!(url.ends_with(".png"));

    // The stored blob is served back.
    let resp = app
        .clone()
        .oneshot(bare_request(Method::GET, &url, None))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let bytes = resp.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(&bytes[..], pixel);

    // An issued URL is accepted on a request; a made-up one is not.
    let (status, _) = send(
        &app,
        json_request(
            Method::POST,
            "/requests",
            &json!({"name": "Mike", "description": "hi", "avatar_url": url}),
            false,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = send(
        &app,
        json_request(
            Method::POST,
            "/requests",
            &json!({"name": "Eve", "description": "hi", "avatar_url": "/avatars/forged.png"}),
            false,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn upload_rejects_bad_payloads() {
    let app = app().await;

    let (status, _) = send(
        &app,
        json_request(
            Method::POST,
            "/upload-avatar",
            &json!({"file": "", "fileName": "me.png"}),
            false,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &app,
        json_request(
            Method::POST,
            "/upload-avatar",
            &json!({"file": "!!!not base64!!!", "fileName": "me.png"}),
            false,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn health_is_public() {
    let app = app().await;
    let resp = app
        .oneshot(bare_request(Method::GET, "/health", None))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let bytes = resp.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(&bytes[..], b"ok");
}

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use foyer_api::storage::AvatarStore;
use foyer_api::{AppState, router};
use foyer_db::Database;

/// Placeholder operator secrets that MUST NOT be used.
const PLACEHOLDER_SECRETS: &[&str] = &[
    "change-me-to-a-random-string",
    "dev-secret-change-me",
    "admin",
    "password",
];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    // Init logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "foyer=debug,tower_http=debug".into()),
        )
        .init();

    // Config
    let admin_password = std::env::var("FOYER_ADMIN_PASSWORD").unwrap_or_default();
    if admin_password.is_empty() || PLACEHOLDER_SECRETS.contains(&admin_password.as_str()) {
        eprintln!("FATAL: FOYER_ADMIN_PASSWORD is unset or still a placeholder.");
        eprintln!("       Every privileged call is gated on this one secret.");
        eprintln!("       Set it in your .env file and restart.");
        std::process::exit(1);
    }

    let db_path = std::env::var("FOYER_DB_PATH").unwrap_or_else(|_| "foyer.db".into());
    let host = std::env::var("FOYER_HOST").unwrap_or_else(|_| "0.0.0.0".into());
    let port: u16 = std::env::var("FOYER_PORT")
        .unwrap_or_else(|_| "8080".into())
        .parse()?;
    let avatar_dir: PathBuf = std::env::var("FOYER_AVATAR_DIR")
        .unwrap_or_else(|_| "./avatars".into())
        .into();
    let public_base_url = std::env::var("FOYER_PUBLIC_BASE_URL").unwrap_or_default();

    // Init database and blob storage
    let db = Arc::new(Database::open(&PathBuf::from(&db_path))?);
    let avatars = Arc::new(AvatarStore::new(avatar_dir, &public_base_url).await?);

    let state = AppState {
        db,
        avatars,
        admin_password,
    };

    // CORS is permissive on purpose: the public profile is served from a
    // different origin and resends X-Admin-Password on every operator call.
    let app = router(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
    info!("Foyer server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = tokio::signal::ctrl_c();
    #[cfg(unix)]
    {
        let mut sigterm =
            tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
                .expect("failed to install SIGTERM handler");
        tokio::select! {
            _ = ctrl_c => info!("Received Ctrl+C, shutting down..."),
            _ = sigterm.recv() => info!("Received SIGTERM, shutting down..."),
        }
    }
    #[cfg(not(unix))]
    {
        ctrl_c.await.ok();
        info!("Received Ctrl+C, shutting down...");
    }
}

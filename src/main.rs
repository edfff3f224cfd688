use mimalloc::MiMalloc;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};
use winding_tree_server::db::{self, SqliteUserRepository};
use winding_tree_server::router::{AppState, app_router};
use winding_tree_server::service::session::SessionManager;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let cfg = &winding_tree_server::config::CONFIG;

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cfg.log_level.clone()));
    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_level(true)
                .with_target(false),
        )
        .init();

    info!(
        bind_address = %cfg.bind_address,
        database_url = %cfg.database_url,
        log_level = %cfg.log_level,
        session_max_age_days = cfg.session_max_age_days,
        insecure_cookie = cfg.insecure_cookie,
    );

    let key = cfg.session_key()?;

    let pool = db::connect(&cfg.database_url, cfg.database_max_connections).await?;
    let repo = SqliteUserRepository::new(pool.clone());
    repo.init_schema().await?;

    let sessions = SessionManager::new(cfg.session_max_age(), !cfg.insecure_cookie);
    let state = AppState::new(Arc::new(repo), sessions, key);
    let app = app_router(state);

    let listener = TcpListener::bind(&cfg.bind_address).await?;
    info!("HTTP server listening on {}", cfg.bind_address);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    pool.close().await;
    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        let _ = tokio::signal::ctrl_c().await;
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(_) => std::future::pending::<()>().await,
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    info!("shutdown signal received");
}

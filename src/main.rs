use std::net::SocketAddr;
use std::path::PathBuf;

use diskview::{config, routes, state::AppState};
use tower_http::cors::CorsLayer;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logging (stdout + tägliche Datei-Rotation unter ./logs)
    std::fs::create_dir_all("logs").ok();
    let (stdout_nb, stdout_guard) = tracing_appender::non_blocking(std::io::stdout());
    let file_appender = tracing_appender::rolling::daily("logs", "diskview.log");
    let (file_nb, file_guard) = tracing_appender::non_blocking(file_appender);
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info,tower_http=info".into());
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(stdout_nb))
        .with(tracing_subscriber::fmt::layer().with_ansi(false).with_writer(file_nb))
        .init();
    // Guards must live until exit so the non-blocking writers flush
    let _log_guards = (stdout_guard, file_guard);

    // Load configuration (embedded defaults -> diskview.toml -> env/.env)
    let app_cfg = config::load()?;

    let static_root = resolve_static_dir(&app_cfg.static_files.dir);
    info!("Serving static files from {}", static_root.display());

    let state = AppState::new(app_cfg.clone());
    let app = routes::build_router(state, static_root);

    // CORS: permissive in debug builds for a UI served from elsewhere; same-origin in release
    let app = if cfg!(debug_assertions) { app.layer(CorsLayer::permissive()) } else { app };

    let port: u16 = app_cfg.server.port;
    let host: String = app_cfg.server.host.clone();
    let addr: SocketAddr = format!("{}:{}", host, port)
        .parse()
        .map_err(|e| anyhow::anyhow!("invalid listen addr {}:{} - {}", host, port, e))?;
    let listener = tokio::net::TcpListener::bind(addr).await?;

    info!("Starting server on http://{}", listener.local_addr()?);
    axum::serve(listener, app).with_graceful_shutdown(shutdown_signal()).await?;

    Ok(())
}

/// Prefers the configured directory relative to the working directory, then
/// relative to the executable.
fn resolve_static_dir(configured: &str) -> PathBuf {
    let direct = PathBuf::from(configured);
    if direct.is_dir() {
        return direct;
    }
    let beside_exe = std::env::current_exe().ok().and_then(|p| p.parent().map(|d| d.join(configured)));
    match beside_exe {
        Some(dir) if dir.is_dir() => dir,
        _ => {
            warn!("Static directory {} not found; only the API will be served", configured);
            direct
        }
    }
}

async fn shutdown_signal() {
    #[cfg(unix)]
    {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut term) => {
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => {},
                    _ = term.recv() => {},
                }
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                let _ = tokio::signal::ctrl_c().await;
            }
        }
    }
    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
    info!("Shutdown signal received. Stopping server...");
}

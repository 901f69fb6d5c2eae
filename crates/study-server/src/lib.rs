pub mod error;
pub mod frontend;
pub mod readiness;
pub mod routes;
pub mod state;

use std::future::Future;
use std::path::PathBuf;

use axum::routing::get;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub use frontend::build_frontend_router;
pub use state::AppState;

/// Build the API router with all routes and middleware.
/// Used by `serve_api()` and available for integration testing.
pub fn build_router(app_state: AppState) -> Router {
    // The window loads the frontend from another port (or a file:// origin),
    // so every origin is mirrored back with credentials allowed.
    let cors = CorsLayer::very_permissive();

    Router::new()
        .route("/api/data", get(routes::data::get_data))
        // Ollama
        .route("/api/ollama/status", get(routes::ollama::get_status))
        .route("/api/ollama/models", get(routes::ollama::list_models))
        // Topics
        .route("/api/topics", get(routes::topics::list_topics))
        .route("/api/topics/{name}", get(routes::topics::get_topic))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}

/// Run the API server on a pre-bound listener until `shutdown` resolves.
///
/// Binding is left to the caller so it knows the port is taken before the
/// server task starts.
pub async fn serve_api<F>(
    listener: tokio::net::TcpListener,
    app_state: AppState,
    shutdown: F,
) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let port = listener.local_addr()?.port();
    tracing::info!("API server listening on http://localhost:{port}");

    axum::serve(listener, build_router(app_state))
        .with_graceful_shutdown(shutdown)
        .await?;
    Ok(())
}

/// Run the static frontend server on a pre-bound listener until `shutdown`
/// resolves.
pub async fn serve_frontend<F>(
    listener: tokio::net::TcpListener,
    dir: PathBuf,
    shutdown: F,
) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let port = listener.local_addr()?.port();
    tracing::info!(dir = %dir.display(), "frontend server listening on http://localhost:{port}");

    axum::serve(listener, build_frontend_router(dir))
        .with_graceful_shutdown(shutdown)
        .await?;
    Ok(())
}

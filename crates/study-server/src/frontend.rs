use std::path::PathBuf;

use axum::Router;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

/// Serve `dir` as-is: plain static files, `index.html` for directories.
pub fn build_frontend_router(dir: PathBuf) -> Router {
    if !dir.join("index.html").is_file() {
        tracing::warn!(dir = %dir.display(), "frontend directory has no index.html");
    }
    Router::new()
        .fallback_service(ServeDir::new(dir).append_index_html_on_directories(true))
        .layer(TraceLayer::new_for_http())
}

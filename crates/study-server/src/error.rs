use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use ollama_agent::OllamaError;
use study_core::StudyError;

// ---------------------------------------------------------------------------
// AppError: unified error type for HTTP responses
// ---------------------------------------------------------------------------

/// Unified error type for HTTP responses. Renders as `{"detail": message}`.
#[derive(Debug)]
pub struct AppError(pub anyhow::Error);

impl AppError {
    fn status(&self) -> StatusCode {
        if let Some(e) = self.0.downcast_ref::<StudyError>() {
            return match e {
                StudyError::TopicNotFound(_) => StatusCode::NOT_FOUND,
                StudyError::InvalidTopicName(_) => StatusCode::BAD_REQUEST,
                StudyError::Config(_) | StudyError::Io(_) | StudyError::Yaml(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            };
        }
        if let Some(e) = self.0.downcast_ref::<OllamaError>() {
            return match e {
                OllamaError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
                OllamaError::AlreadyRunning | OllamaError::NotRunning => StatusCode::CONFLICT,
                OllamaError::Transport(_)
                | OllamaError::Status(_)
                | OllamaError::Parse(_)
                | OllamaError::InvalidUrl(_)
                | OllamaError::Spawn { .. }
                | OllamaError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
            };
        }
        StatusCode::INTERNAL_SERVER_ERROR
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(%status, "request failed: {:#}", self.0);
        }
        let body = serde_json::json!({ "detail": self.0.to_string() });
        (status, axum::Json(body)).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

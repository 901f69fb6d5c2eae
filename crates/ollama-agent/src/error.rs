use thiserror::Error;

#[derive(Debug, Error)]
pub enum OllamaError {
    #[error("Ollama is not running at {0}")]
    Unavailable(String),

    #[error("HTTP error talking to Ollama: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Ollama returned HTTP {0}")]
    Status(u16),

    #[error("Failed to parse Ollama response: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid Ollama URL '{0}'")]
    InvalidUrl(String),

    #[error("Ollama daemon is already running")]
    AlreadyRunning,

    #[error("Ollama daemon is not running")]
    NotRunning,

    #[error("Failed to spawn '{command}': {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

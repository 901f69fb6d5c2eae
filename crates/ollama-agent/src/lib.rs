//! `ollama-agent`: client and process supervisor for a local Ollama daemon.
//!
//! The daemon is an opaque external process. This crate only needs two
//! things from it: whether it answers, and which models it has installed.
//!
//! # Architecture
//!
//! ```text
//! OllamaClient       ← GET {base}/api/tags
//!     │                 probe() / is_running() / list_models()
//!     ▼
//! DaemonSupervisor   ← owns at most one `ollama serve` child
//!                       Stopped → Starting → Running → Stopped
//! ```
//!
//! # Quick start
//!
//! ```rust,ignore
//! use std::time::Duration;
//! use ollama_agent::{DaemonSupervisor, OllamaClient};
//!
//! let client = OllamaClient::new("http://127.0.0.1:11434", Duration::from_secs(5))?;
//! let mut daemon = DaemonSupervisor::new(client.clone(), "ollama");
//! daemon.ensure_running().await?;
//! println!("{:?}", client.list_models().await?);
//! daemon.stop().await?;
//! ```

pub mod client;
pub mod error;
pub mod supervisor;
pub mod types;

pub use client::OllamaClient;
pub use error::OllamaError;
pub use supervisor::DaemonSupervisor;
pub use types::{DaemonState, ModelEntry, ProbeOutcome, TagsResponse};

/// Convenience `Result` alias for this crate.
pub type Result<T> = std::result::Result<T, OllamaError>;

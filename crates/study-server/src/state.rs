use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use ollama_agent::{DaemonSupervisor, OllamaClient, OllamaError};
use study_core::config::Config;
use study_core::topic::TopicStore;
use tokio::sync::Mutex;

/// Application context passed to all route handlers.
///
/// Built once at startup. The daemon supervisor lives here so that whoever
/// owns the context is responsible for calling [`shutdown`].
///
/// [`shutdown`]: AppState::shutdown
#[derive(Clone)]
pub struct AppState {
    pub topics: TopicStore,
    pub ollama: OllamaClient,
    pub daemon: Arc<Mutex<DaemonSupervisor>>,
}

impl AppState {
    pub fn new(topics: TopicStore, daemon: DaemonSupervisor) -> Self {
        Self {
            topics,
            ollama: daemon.client().clone(),
            daemon: Arc::new(Mutex::new(daemon)),
        }
    }

    /// Build the context from configuration: materialize default topics and,
    /// when `autostart` is set, spawn Ollama if it is not answering.
    ///
    /// A failed spawn is logged, not fatal; the API still serves topics and
    /// reports the daemon as not running.
    pub async fn from_config(root: &Path, config: &Config, autostart: bool) -> anyhow::Result<Self> {
        let topics = TopicStore::new(config.data_dir(root));
        let created = topics.ensure_default_topics(config.default_topics.as_slice())?;
        if !created.is_empty() {
            tracing::info!(dir = %topics.dir().display(), count = created.len(), "initialized topic store");
        }

        let client = OllamaClient::new(
            &config.ollama.url,
            Duration::from_millis(config.ollama.timeout_ms),
        )?;
        let mut daemon = DaemonSupervisor::new(client, config.ollama.command.clone());
        if autostart {
            if let Err(e) = daemon.ensure_running().await {
                tracing::warn!("could not start Ollama: {e}");
            }
        }

        Ok(Self::new(topics, daemon))
    }

    /// Stop the daemon if this context spawned it. Returns true if a process
    /// was stopped.
    pub async fn shutdown(&self) -> Result<bool, OllamaError> {
        let mut daemon = self.daemon.lock().await;
        if !daemon.owns_process() {
            return Ok(false);
        }
        daemon.stop().await?;
        Ok(true)
    }
}

use std::time::Duration;

use reqwest::Url;

use crate::types::{ProbeOutcome, TagsResponse};
use crate::{OllamaError, Result};

const TAGS_PATH: &str = "/api/tags";

// ─── OllamaClient ─────────────────────────────────────────────────────────

/// HTTP client for the daemon's model-listing endpoint.
///
/// Cheap to clone; clones share the underlying connection pool.
#[derive(Debug, Clone)]
pub struct OllamaClient {
    http: reqwest::Client,
    base_url: Url,
}

impl OllamaClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let base_url = Url::parse(base_url.trim_end_matches('/'))
            .map_err(|_| OllamaError::InvalidUrl(base_url.to_string()))?;
        if base_url.host_str().is_none() {
            return Err(OllamaError::InvalidUrl(base_url.to_string()));
        }
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { http, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// `host:port` form of the base URL, as expected by `OLLAMA_HOST`.
    pub fn host_port(&self) -> String {
        let host = self.base_url.host_str().unwrap_or("127.0.0.1");
        match self.base_url.port_or_known_default() {
            Some(port) => format!("{host}:{port}"),
            None => host.to_string(),
        }
    }

    fn tags_url(&self) -> Url {
        let mut url = self.base_url.clone();
        url.set_path(TAGS_PATH);
        url
    }

    /// Check whether the daemon answers on its tags endpoint.
    ///
    /// A refused connection is the ordinary "not running" case and is only
    /// logged at debug level. Anything else is unexpected and logged as a
    /// warning, but still reported as not running by [`is_running`].
    ///
    /// [`is_running`]: OllamaClient::is_running
    pub async fn probe(&self) -> ProbeOutcome {
        match self.http.get(self.tags_url()).send().await {
            Ok(resp) if resp.status().is_success() => ProbeOutcome::Running,
            Ok(resp) => {
                let status = resp.status();
                tracing::warn!(url = %self.base_url, %status, "Ollama probe got non-success status");
                ProbeOutcome::Failed(format!("HTTP {status}"))
            }
            Err(e) if is_refused(&e) => {
                tracing::debug!(url = %self.base_url, "Ollama is not listening");
                ProbeOutcome::NotListening
            }
            Err(e) => {
                tracing::warn!(url = %self.base_url, "Ollama probe failed: {e}");
                ProbeOutcome::Failed(e.to_string())
            }
        }
    }

    pub async fn is_running(&self) -> bool {
        self.probe().await.is_running()
    }

    /// Names of the locally installed models, in the order the daemon lists
    /// them.
    pub async fn list_models(&self) -> Result<Vec<String>> {
        let resp = self
            .http
            .get(self.tags_url())
            .send()
            .await
            .map_err(|e| {
                if is_refused(&e) {
                    OllamaError::Unavailable(self.base_url.to_string())
                } else {
                    OllamaError::Transport(e)
                }
            })?;

        let status = resp.status();
        if !status.is_success() {
            return Err(OllamaError::Status(status.as_u16()));
        }

        let body = resp.bytes().await?;
        let tags: TagsResponse = serde_json::from_slice(&body)?;
        Ok(tags.models.into_iter().map(|m| m.name).collect())
    }
}

fn is_refused(e: &reqwest::Error) -> bool {
    e.is_connect() && !e.is_timeout()
}

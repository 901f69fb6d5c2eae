use crate::error::{Result, StudyError};
use crate::paths;
use crate::topic::DEFAULT_TOPICS;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// ConfigWarning / WarnLevel
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigWarning {
    pub level: WarnLevel,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarnLevel {
    Warning,
    Error,
}

// ---------------------------------------------------------------------------
// OllamaConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OllamaConfig {
    #[serde(default = "default_ollama_url")]
    pub url: String,
    /// Executable spawned as `{command} serve` when the daemon is absent.
    #[serde(default = "default_ollama_command")]
    pub command: String,
    #[serde(default = "default_true")]
    pub autostart: bool,
    #[serde(default = "default_ollama_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_ollama_url() -> String {
    "http://127.0.0.1:11434".to_string()
}

fn default_ollama_command() -> String {
    "ollama".to_string()
}

fn default_ollama_timeout_ms() -> u64 {
    5_000
}

fn default_true() -> bool {
    true
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            url: default_ollama_url(),
            command: default_ollama_command(),
            autostart: true,
            timeout_ms: default_ollama_timeout_ms(),
        }
    }
}

// ---------------------------------------------------------------------------
// WindowConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WindowConfig {
    #[serde(default = "default_window_title")]
    pub title: String,
    /// Enables the webview's developer tools.
    #[serde(default = "default_true")]
    pub debug: bool,
}

fn default_window_title() -> String {
    "Study Buddy".to_string()
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: default_window_title(),
            debug: true,
        }
    }
}

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    #[serde(default = "default_frontend_dir")]
    pub frontend_dir: PathBuf,
    #[serde(default = "default_bind_host")]
    pub bind_host: String,
    #[serde(default = "default_api_port")]
    pub api_port: u16,
    #[serde(default = "default_frontend_port")]
    pub frontend_port: u16,
    #[serde(default = "default_startup_timeout_ms")]
    pub startup_timeout_ms: u64,
    #[serde(default = "default_topics")]
    pub default_topics: Vec<String>,
    #[serde(default)]
    pub ollama: OllamaConfig,
    #[serde(default)]
    pub window: WindowConfig,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}

fn default_frontend_dir() -> PathBuf {
    PathBuf::from("frontend")
}

fn default_bind_host() -> String {
    "127.0.0.1".to_string()
}

fn default_api_port() -> u16 {
    8000
}

fn default_frontend_port() -> u16 {
    8080
}

fn default_startup_timeout_ms() -> u64 {
    10_000
}

fn default_topics() -> Vec<String> {
    DEFAULT_TOPICS.iter().map(|s| s.to_string()).collect()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            frontend_dir: default_frontend_dir(),
            bind_host: default_bind_host(),
            api_port: default_api_port(),
            frontend_port: default_frontend_port(),
            startup_timeout_ms: default_startup_timeout_ms(),
            default_topics: default_topics(),
            ollama: OllamaConfig::default(),
            window: WindowConfig::default(),
        }
    }
}

impl Config {
    /// Load `study-buddy.yaml` from `root`. A missing file yields defaults.
    pub fn load(root: &Path) -> Result<Self> {
        let path = paths::config_path(root);
        if !path.exists() {
            return Ok(Self::default());
        }
        let data = std::fs::read_to_string(&path)?;
        let cfg: Config = serde_yaml::from_str(&data)?;
        Ok(cfg)
    }

    pub fn data_dir(&self, root: &Path) -> PathBuf {
        paths::resolve_dir(root, &self.data_dir)
    }

    pub fn frontend_dir(&self, root: &Path) -> PathBuf {
        paths::resolve_dir(root, &self.frontend_dir)
    }

    // -----------------------------------------------------------------------
    // Validation
    // -----------------------------------------------------------------------

    pub fn validate(&self) -> Vec<ConfigWarning> {
        let mut warnings = Vec::new();

        if self.api_port != 0 && self.api_port == self.frontend_port {
            warnings.push(ConfigWarning {
                level: WarnLevel::Error,
                message: format!(
                    "api_port and frontend_port are both {}; they must differ",
                    self.api_port
                ),
            });
        }

        for name in &self.default_topics {
            if paths::validate_topic_name(name).is_err() {
                warnings.push(ConfigWarning {
                    level: WarnLevel::Error,
                    message: format!("default topic '{name}' is not a valid topic name"),
                });
            }
        }

        if self.default_topics.is_empty() {
            warnings.push(ConfigWarning {
                level: WarnLevel::Warning,
                message: "default_topics is empty; a fresh store will have no topics".into(),
            });
        }

        if !self.ollama.url.starts_with("http://") && !self.ollama.url.starts_with("https://") {
            warnings.push(ConfigWarning {
                level: WarnLevel::Error,
                message: format!("ollama.url '{}' must be an http(s) URL", self.ollama.url),
            });
        }

        if self.ollama.command.trim().is_empty() {
            warnings.push(ConfigWarning {
                level: WarnLevel::Warning,
                message: "ollama.command is empty; the daemon cannot be auto-started".into(),
            });
        }

        if self.startup_timeout_ms == 0 {
            warnings.push(ConfigWarning {
                level: WarnLevel::Warning,
                message: "startup_timeout_ms=0 gives the servers no time to become ready".into(),
            });
        }

        warnings
    }

    /// Fail with the first error-level warning, if any.
    pub fn check(&self) -> Result<()> {
        match self
            .validate()
            .into_iter()
            .find(|w| w.level == WarnLevel::Error)
        {
            Some(w) => Err(StudyError::Config(w.message)),
            None => Ok(()),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

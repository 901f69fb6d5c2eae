use std::process::{ExitStatus, Stdio};
use std::time::Duration;

use tokio::process::{Child, Command};

use crate::client::OllamaClient;
use crate::types::DaemonState;
use crate::{OllamaError, Result};

/// How long `stop()` waits after the terminate signal before killing.
const STOP_GRACE: Duration = Duration::from_secs(10);

// ─── DaemonSupervisor ─────────────────────────────────────────────────────

/// Owns at most one `ollama serve` child process.
///
/// The handle is the source of truth: once the spawn call returns the daemon
/// is considered running, with no readiness handshake. The child is spawned
/// with `kill_on_drop`, so dropping a supervisor that still owns a process
/// kills it; callers that want a graceful exit should call [`stop`] first.
///
/// [`stop`]: DaemonSupervisor::stop
#[derive(Debug)]
pub struct DaemonSupervisor {
    client: OllamaClient,
    program: String,
    args: Vec<String>,
    child: Option<Child>,
    state: DaemonState,
}

impl DaemonSupervisor {
    /// Supervise `{program} serve`, bound to the client's host and port.
    pub fn new(client: OllamaClient, program: impl Into<String>) -> Self {
        Self::with_args(client, program, vec!["serve".to_string()])
    }

    pub fn with_args(client: OllamaClient, program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            client,
            program: program.into(),
            args,
            child: None,
            state: DaemonState::Stopped,
        }
    }

    pub fn client(&self) -> &OllamaClient {
        &self.client
    }

    pub fn state(&self) -> DaemonState {
        self.state
    }

    /// True when this supervisor spawned the daemon and still holds it.
    pub fn owns_process(&self) -> bool {
        self.child.is_some()
    }

    /// Probe the daemon and spawn it if nothing answers. Returns true when a
    /// process was spawned.
    pub async fn ensure_running(&mut self) -> Result<bool> {
        if self.child.is_some() {
            return Ok(false);
        }
        if self.client.is_running().await {
            tracing::info!(url = %self.client.base_url(), "Ollama already running");
            return Ok(false);
        }
        self.start()?;
        Ok(true)
    }

    /// Spawn the daemon. Fails with `AlreadyRunning` if this supervisor
    /// already holds a process handle.
    pub fn start(&mut self) -> Result<()> {
        if self.child.is_some() {
            return Err(OllamaError::AlreadyRunning);
        }

        self.state = DaemonState::Starting;
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args)
            .env("OLLAMA_HOST", self.client.host_port())
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true);

        match cmd.spawn() {
            Ok(child) => {
                tracing::info!(
                    program = %self.program,
                    pid = ?child.id(),
                    host = %self.client.host_port(),
                    "spawned Ollama daemon"
                );
                self.child = Some(child);
                self.state = DaemonState::Running;
                Ok(())
            }
            Err(source) => {
                self.state = DaemonState::Stopped;
                Err(OllamaError::Spawn {
                    command: self.program.clone(),
                    source,
                })
            }
        }
    }

    /// Terminate the daemon and wait for it to exit. Fails with `NotRunning`
    /// if no process handle is held.
    ///
    /// The handle is released before anything can fail, so the supervisor
    /// ends up `Stopped` even when the shutdown itself errors; the dropped
    /// handle then kills the child.
    pub async fn stop(&mut self) -> Result<()> {
        let Some(mut child) = self.child.take() else {
            return Err(OllamaError::NotRunning);
        };

        let result = shut_down(&mut child).await;
        self.state = DaemonState::Stopped;
        let status = result?;
        tracing::info!(%status, "Ollama daemon stopped");
        Ok(())
    }
}

/// Terminate `child`, then wait out the grace period before killing it.
async fn shut_down(child: &mut Child) -> Result<ExitStatus> {
    terminate(child).await?;
    match tokio::time::timeout(STOP_GRACE, child.wait()).await {
        Ok(status) => Ok(status?),
        Err(_) => {
            tracing::warn!(
                "Ollama did not exit within {}s; killing",
                STOP_GRACE.as_secs()
            );
            child.kill().await?;
            Ok(child.wait().await?)
        }
    }
}

/// Ask the child to exit: SIGTERM on unix, a hard kill elsewhere.
async fn terminate(child: &mut Child) -> Result<()> {
    #[cfg(unix)]
    {
        let Some(pid) = child.id() else {
            // Already reaped.
            return Ok(());
        };
        let status = Command::new("kill")
            .args(["-TERM", &pid.to_string()])
            .status()
            .await?;
        if !status.success() {
            tracing::warn!(pid, "kill -TERM failed with {status}; killing");
            child.start_kill()?;
        }
        Ok(())
    }
    #[cfg(not(unix))]
    {
        child.start_kill()?;
        Ok(())
    }
}

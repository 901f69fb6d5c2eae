use crate::window::{self, Shell};
use anyhow::{Context, Result};
use clap::Args;
use study_core::config::Config;
use study_server::{readiness, AppState};
use std::future::Future;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// How long shutdown waits for the servers to drain.
const DRAIN_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Args, Debug, Default)]
pub struct RunOptions {
    /// API port (overrides api_port in study-buddy.yaml; 0 = OS-assigned)
    #[arg(long, env = "STUDY_BUDDY_API_PORT")]
    pub api_port: Option<u16>,

    /// Frontend port (overrides frontend_port; 0 = OS-assigned)
    #[arg(long, env = "STUDY_BUDDY_FRONTEND_PORT")]
    pub frontend_port: Option<u16>,

    /// Serve only; wait for Ctrl-C instead of opening a window
    #[arg(long)]
    pub no_window: bool,

    /// Never spawn the Ollama daemon, even if it is not running
    #[arg(long)]
    pub no_ollama: bool,
}

// ---------------------------------------------------------------------------
// run
// ---------------------------------------------------------------------------

/// Start both servers, wait until they answer, show the window on this
/// thread, then tear everything down once it closes.
pub fn run(root: &Path, opts: RunOptions) -> Result<()> {
    let mut config = Config::load(root).context("failed to load config")?;
    if let Some(port) = opts.api_port {
        config.api_port = port;
    }
    if let Some(port) = opts.frontend_port {
        config.frontend_port = port;
    }
    for w in config.validate() {
        tracing::warn!("config: {}", w.message);
    }
    config.check()?;

    let autostart = !opts.no_ollama && config.ollama.autostart && ollama_installed(&config);

    let rt = tokio::runtime::Runtime::new()?;
    let services = rt.block_on(Services::start(root, &config, autostart))?;

    // Window and signal errors are reported after cleanup so the daemon is
    // never left behind.
    let shell_result = if opts.no_window {
        println!(
            "Study Buddy → {}  (API {})  press Ctrl-C to stop",
            services.page_url, services.api_url
        );
        rt.block_on(wait_for_stop_signal())
    } else {
        match window::show(&config.window, &services.page_url) {
            Ok(Shell::Closed) => Ok(()),
            Ok(Shell::Detached) => {
                println!("Opened {} in your browser; press Ctrl-C to stop", services.page_url);
                rt.block_on(wait_for_stop_signal())
            }
            Err(e) => Err(e),
        }
    };

    let shutdown_result = rt.block_on(services.shutdown());
    shell_result.and(shutdown_result)
}

fn ollama_installed(config: &Config) -> bool {
    match which::which(&config.ollama.command) {
        Ok(path) => {
            tracing::debug!(path = %path.display(), "found Ollama executable");
            true
        }
        Err(_) => {
            tracing::warn!(
                command = %config.ollama.command,
                "Ollama executable not found; it will not be auto-started"
            );
            false
        }
    }
}

// ---------------------------------------------------------------------------
// Services
// ---------------------------------------------------------------------------

/// Both background servers plus the application context that owns the
/// daemon supervisor.
struct Services {
    state: AppState,
    api_url: String,
    page_url: String,
    shutdown_tx: watch::Sender<bool>,
    tasks: Vec<JoinHandle<Result<()>>>,
}

impl Services {
    async fn start(root: &Path, config: &Config, autostart: bool) -> Result<Self> {
        let state = AppState::from_config(root, config, autostart).await?;

        match Self::launch(state.clone(), config, config.frontend_dir(root)).await {
            Ok(services) => Ok(services),
            Err(e) => {
                if let Err(stop_err) = state.shutdown().await {
                    tracing::warn!("failed to stop Ollama after startup error: {stop_err}");
                }
                Err(e)
            }
        }
    }

    async fn launch(state: AppState, config: &Config, frontend_dir: PathBuf) -> Result<Self> {
        // Bind both listeners up front: once bind returns the ports are ours.
        let api_listener = TcpListener::bind((config.bind_host.as_str(), config.api_port))
            .await
            .with_context(|| format!("failed to bind API port {}", config.api_port))?;
        let frontend_listener = TcpListener::bind((config.bind_host.as_str(), config.frontend_port))
            .await
            .with_context(|| format!("failed to bind frontend port {}", config.frontend_port))?;

        let api_port = api_listener.local_addr()?.port();
        let frontend_port = frontend_listener.local_addr()?.port();
        let host = connect_host(&config.bind_host);
        let api_url = format!("http://{host}:{api_port}");
        let frontend_url = format!("http://{host}:{frontend_port}");

        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let tasks = vec![
            tokio::spawn(study_server::serve_api(
                api_listener,
                state.clone(),
                wait_for_shutdown(shutdown_rx.clone()),
            )),
            tokio::spawn(study_server::serve_frontend(
                frontend_listener,
                frontend_dir,
                wait_for_shutdown(shutdown_rx),
            )),
        ];

        let services = Self {
            state,
            page_url: format!("{frontend_url}/index.html?api={api_url}"),
            api_url: api_url.clone(),
            shutdown_tx,
            tasks,
        };

        let timeout = Duration::from_millis(config.startup_timeout_ms);
        let api_probe_url = format!("{api_url}/api/data");
        let frontend_probe_url = format!("{frontend_url}/");
        let ready = tokio::try_join!(
            readiness::wait_until_ready(
                &api_probe_url,
                timeout,
                readiness::DEFAULT_POLL_INTERVAL,
            ),
            readiness::wait_until_ready(
                &frontend_probe_url,
                timeout,
                readiness::DEFAULT_POLL_INTERVAL,
            ),
        );
        if let Err(e) = ready {
            services.stop_servers().await;
            return Err(e.context("servers did not start"));
        }

        tracing::info!(api = %services.api_url, frontend = %frontend_url, "servers ready");
        Ok(services)
    }

    async fn stop_servers(self) -> AppState {
        let _ = self.shutdown_tx.send(true);
        for task in self.tasks {
            match tokio::time::timeout(DRAIN_TIMEOUT, task).await {
                Ok(Ok(Ok(()))) => {}
                Ok(Ok(Err(e))) => tracing::warn!("server exited with error: {e:#}"),
                Ok(Err(e)) => tracing::warn!("server task failed: {e}"),
                Err(_) => tracing::warn!("server did not drain within {}s", DRAIN_TIMEOUT.as_secs()),
            }
        }
        self.state
    }

    /// Stop both servers, then the daemon if this process spawned it.
    async fn shutdown(self) -> Result<()> {
        let state = self.stop_servers().await;
        if state.shutdown().await.context("failed to stop Ollama")? {
            tracing::info!("stopped the Ollama daemon started by this session");
        }
        Ok(())
    }
}

/// Host to put in URLs for a server bound to `bind_host`.
fn connect_host(bind_host: &str) -> &str {
    match bind_host {
        "0.0.0.0" | "::" | "" => "127.0.0.1",
        host => host,
    }
}

/// Resolve on Ctrl-C, or on SIGTERM under unix, so a terminated process
/// still runs the ordered shutdown.
async fn wait_for_stop_signal() -> Result<()> {
    stop_signal()?.await
}

#[cfg(unix)]
fn stop_signal() -> Result<impl Future<Output = Result<()>>> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut term = signal(SignalKind::terminate()).context("failed to listen for SIGTERM")?;
    Ok(async move {
        tokio::select! {
            res = tokio::signal::ctrl_c() => res.context("failed to listen for Ctrl-C"),
            _ = term.recv() => {
                tracing::info!("received SIGTERM");
                Ok(())
            }
        }
    })
}

#[cfg(not(unix))]
fn stop_signal() -> Result<impl Future<Output = Result<()>>> {
    Ok(async { tokio::signal::ctrl_c().await.context("failed to listen for Ctrl-C") })
}

async fn wait_for_shutdown(mut rx: watch::Receiver<bool>) {
    while !*rx.borrow() {
        if rx.changed().await.is_err() {
            return;
        }
    }
}

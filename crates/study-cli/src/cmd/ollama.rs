use crate::output::{print_json, print_list};
use anyhow::Context;
use clap::Subcommand;
use ollama_agent::{OllamaClient, ProbeOutcome};
use study_core::config::Config;
use std::path::Path;
use std::time::Duration;

// ---------------------------------------------------------------------------
// Subcommand definition
// ---------------------------------------------------------------------------

#[derive(Subcommand, Debug)]
pub enum OllamaSubcommand {
    /// Report whether the daemon is answering
    Status,
    /// List installed models
    Models,
}

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

pub fn run(root: &Path, subcommand: OllamaSubcommand, json: bool) -> anyhow::Result<()> {
    let config = Config::load(root).context("failed to load config")?;
    let client = OllamaClient::new(
        &config.ollama.url,
        Duration::from_millis(config.ollama.timeout_ms),
    )?;

    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(async move {
        match subcommand {
            OllamaSubcommand::Status => status(&client, json).await,
            OllamaSubcommand::Models => models(&client, json).await,
        }
    })
}

async fn status(client: &OllamaClient, json: bool) -> anyhow::Result<()> {
    let outcome = client.probe().await;
    if json {
        return print_json(&serde_json::json!({ "running": outcome.is_running() }));
    }
    match outcome {
        ProbeOutcome::Running => println!("Ollama is running at {}", client.base_url()),
        ProbeOutcome::NotListening => println!("Ollama is not running at {}", client.base_url()),
        ProbeOutcome::Failed(reason) => {
            println!("Ollama is not running at {} ({reason})", client.base_url())
        }
    }
    Ok(())
}

async fn models(client: &OllamaClient, json: bool) -> anyhow::Result<()> {
    let models = client.list_models().await?;
    if json {
        print_json(&serde_json::json!({ "models": models }))
    } else {
        print_list(&models, "No models installed.");
        Ok(())
    }
}

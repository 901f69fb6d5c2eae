mod cmd;
mod output;
mod root;
mod window;

use clap::{Parser, Subcommand};
use cmd::{
    config::ConfigSubcommand, ollama::OllamaSubcommand, run::RunOptions,
    topics::TopicsSubcommand,
};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "study-buddy",
    about = "Desktop study assistant: markdown topic notes and a local Ollama",
    version,
    propagate_version = true
)]
struct Cli {
    /// Project root holding study-buddy.yaml (default: auto-detect, then cwd)
    #[arg(long, global = true, env = "STUDY_BUDDY_ROOT")]
    root: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the API and frontend servers and open the study window (default)
    Run(RunOptions),

    /// Inspect the topic store
    Topics {
        #[command(subcommand)]
        subcommand: TopicsSubcommand,
    },

    /// Query the local Ollama daemon
    Ollama {
        #[command(subcommand)]
        subcommand: OllamaSubcommand,
    },

    /// Show or validate the configuration
    Config {
        #[command(subcommand)]
        subcommand: ConfigSubcommand,
    },
}

fn main() {
    let cli = Cli::parse();

    let default_level = match &cli.command {
        None | Some(Commands::Run(_)) => tracing::Level::INFO,
        _ => tracing::Level::WARN,
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(default_level.into()),
        )
        .with_target(false)
        .init();

    let root = root::resolve_root(cli.root.as_deref());

    let result = match cli.command {
        None => cmd::run::run(&root, RunOptions::default()),
        Some(Commands::Run(opts)) => cmd::run::run(&root, opts),
        Some(Commands::Topics { subcommand }) => cmd::topics::run(&root, subcommand, cli.json),
        Some(Commands::Ollama { subcommand }) => cmd::ollama::run(&root, subcommand, cli.json),
        Some(Commands::Config { subcommand }) => cmd::config::run(&root, subcommand, cli.json),
    };

    if let Err(e) = result {
        // Print the full error chain (anyhow's alternate Display)
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}

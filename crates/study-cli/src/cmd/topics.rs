use crate::output::{print_json, print_list};
use anyhow::Context;
use clap::Subcommand;
use study_core::{config::Config, topic::TopicStore};
use std::path::Path;

// ---------------------------------------------------------------------------
// Subcommand definition
// ---------------------------------------------------------------------------

#[derive(Subcommand, Debug)]
pub enum TopicsSubcommand {
    /// List every topic in the store
    List,
    /// Print the markdown content of one topic
    Show { name: String },
    /// Create any missing default topics
    Init,
}

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

pub fn run(root: &Path, subcommand: TopicsSubcommand, json: bool) -> anyhow::Result<()> {
    let config = Config::load(root).context("failed to load config")?;
    let store = TopicStore::new(config.data_dir(root));

    match subcommand {
        TopicsSubcommand::List => {
            let topics = store.list_topics().context("failed to list topics")?;
            if json {
                print_json(&serde_json::json!({ "topics": topics }))?;
            } else {
                print_list(&topics, "No topics.");
            }
        }
        TopicsSubcommand::Show { name } => {
            let content = store.read_topic(&name)?;
            if json {
                print_json(&serde_json::json!({ "content": content }))?;
            } else {
                print!("{content}");
            }
        }
        TopicsSubcommand::Init => {
            let created = store.ensure_default_topics(config.default_topics.as_slice())?;
            if json {
                print_json(&serde_json::json!({ "created": created }))?;
            } else {
                print_list(&created, "All default topics already exist.");
            }
        }
    }
    Ok(())
}

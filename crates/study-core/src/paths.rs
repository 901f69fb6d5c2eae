use crate::error::{Result, StudyError};
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

// ---------------------------------------------------------------------------
// File constants
// ---------------------------------------------------------------------------

pub const CONFIG_FILE: &str = "study-buddy.yaml";
pub const TOPIC_EXT: &str = "md";

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

pub fn config_path(root: &Path) -> PathBuf {
    root.join(CONFIG_FILE)
}

/// Resolve a configured directory against the project root. Absolute paths
/// are returned unchanged.
pub fn resolve_dir(root: &Path, dir: &Path) -> PathBuf {
    if dir.is_absolute() {
        dir.to_path_buf()
    } else {
        root.join(dir)
    }
}

/// Backing file for a topic. The name must already be validated.
pub fn topic_path(data_dir: &Path, name: &str) -> PathBuf {
    data_dir.join(format!("{name}.{TOPIC_EXT}"))
}

// ---------------------------------------------------------------------------
// Topic name validation
// ---------------------------------------------------------------------------

/// Longest accepted topic name, in characters.
pub const MAX_TOPIC_NAME: usize = 128;

static UNSAFE_CHARS_RE: OnceLock<Regex> = OnceLock::new();

fn unsafe_chars_re() -> &'static Regex {
    UNSAFE_CHARS_RE.get_or_init(|| Regex::new(r#"[/\\:*?"<>|\x00-\x1f\x7f]"#).unwrap())
}

/// Topic names become filename stems. Any printable name is accepted,
/// including dots and non-ASCII letters, as long as it cannot leave the
/// data directory or trip a reserved filesystem character. A leading `.`
/// (hidden files, `..`) and surrounding whitespace are rejected.
pub fn validate_topic_name(name: &str) -> Result<()> {
    let invalid = name.is_empty()
        || name.chars().count() > MAX_TOPIC_NAME
        || name.starts_with('.')
        || name.trim() != name
        || unsafe_chars_re().is_match(name);
    if invalid {
        return Err(StudyError::InvalidTopicName(name.to_string()));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

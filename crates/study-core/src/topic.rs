use crate::error::{Result, StudyError};
use crate::paths;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

// ---------------------------------------------------------------------------
// Defaults
// ---------------------------------------------------------------------------

pub const DEFAULT_TOPICS: &[&str] = &["General", "Math", "Science", "History", "Programming"];

/// Greeting body written for a default topic on first run.
pub fn default_topic_body(name: &str) -> String {
    format!(
        "# {name} Chat\n\n\
         Welcome to the {name} Chat! Use this space to collect notes, \
         questions and summaries while you study.\n"
    )
}

// ---------------------------------------------------------------------------
// TopicStore
// ---------------------------------------------------------------------------

/// Filesystem-backed topic store: one `{name}.md` file per topic.
///
/// Nothing is cached; every call reads the directory, so files added or
/// removed out of band are picked up on the next call.
#[derive(Debug, Clone)]
pub struct TopicStore {
    dir: PathBuf,
}

impl TopicStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Materialize each named topic with the greeting template unless its
    /// file already exists. Returns the names that were written.
    pub fn ensure_default_topics<S: AsRef<str>>(&self, names: &[S]) -> Result<Vec<String>> {
        std::fs::create_dir_all(&self.dir)?;
        let mut created = Vec::new();
        for name in names {
            let name = name.as_ref();
            paths::validate_topic_name(name)?;
            if self.create_topic(name, &default_topic_body(name))? {
                tracing::info!(topic = name, "created default topic");
                created.push(name.to_string());
            }
        }
        Ok(created)
    }

    /// Names of every markdown file in the store, in directory enumeration
    /// order. A missing directory is an empty store. Files whose stem is not a
    /// valid topic name are skipped, so every listed name can be read back.
    pub fn list_topics(&self) -> Result<Vec<String>> {
        if !self.dir.exists() {
            return Ok(vec![]);
        }
        let mut topics = Vec::new();
        for entry in std::fs::read_dir(&self.dir)? {
            let entry = match entry {
                Ok(e) => e,
                Err(e) => {
                    tracing::warn!(dir = %self.dir.display(), "skipping unreadable entry: {e}");
                    continue;
                }
            };
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            if path.extension().and_then(|e| e.to_str()) != Some(paths::TOPIC_EXT) {
                continue;
            }
            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                tracing::warn!(path = %path.display(), "skipping topic file with a non-UTF-8 name");
                continue;
            };
            if paths::validate_topic_name(stem).is_err() {
                tracing::warn!(path = %path.display(), "skipping topic file with an unusable name");
                continue;
            }
            topics.push(stem.to_string());
        }
        Ok(topics)
    }

    /// Write `body` as a new topic unless the file already exists. The body is
    /// staged in a temp file and linked into place without clobbering, so a
    /// reader never sees a partial file and existing notes are kept.
    fn create_topic(&self, name: &str, body: &str) -> Result<bool> {
        let path = paths::topic_path(&self.dir, name);
        if path.exists() {
            return Ok(false);
        }
        let mut tmp = NamedTempFile::new_in(&self.dir)?;
        tmp.write_all(body.as_bytes())?;
        match tmp.persist_noclobber(&path) {
            Ok(_) => Ok(true),
            Err(e) if e.error.kind() == std::io::ErrorKind::AlreadyExists => Ok(false),
            Err(e) => Err(e.error.into()),
        }
    }

    pub fn read_topic(&self, name: &str) -> Result<String> {
        paths::validate_topic_name(name)?;
        let path = paths::topic_path(&self.dir, name);
        match std::fs::read_to_string(&path) {
            Ok(content) => Ok(content),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(StudyError::TopicNotFound(name.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use tempfile::TempDir;

    fn store(dir: &TempDir) -> TopicStore {
        TopicStore::new(dir.path().join("data"))
    }

    #[test]
    fn defaults_created_with_heading() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);
        let created = store.ensure_default_topics(DEFAULT_TOPICS).unwrap();
        assert_eq!(created.len(), DEFAULT_TOPICS.len());

        for name in DEFAULT_TOPICS {
            let content = store.read_topic(name).unwrap();
            assert!(
                content.starts_with(&format!("# {name}")),
                "unexpected heading for {name}: {content}"
            );
        }
        assert!(store.read_topic("General").unwrap().contains("General Chat"));
    }

    #[test]
    fn ensure_defaults_never_overwrites() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);
        store.ensure_default_topics(DEFAULT_TOPICS).unwrap();
        std::fs::write(store.dir().join("Math.md"), "my own notes").unwrap();

        let created = store.ensure_default_topics(DEFAULT_TOPICS).unwrap();
        assert!(created.is_empty());
        assert_eq!(store.read_topic("Math").unwrap(), "my own notes");
    }

    #[test]
    fn ensure_defaults_leaves_no_temp_files() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);
        store.ensure_default_topics(DEFAULT_TOPICS).unwrap();
        store.ensure_default_topics(DEFAULT_TOPICS).unwrap();

        let entries = std::fs::read_dir(store.dir()).unwrap().count();
        assert_eq!(entries, DEFAULT_TOPICS.len());
    }

    #[test]
    fn ensure_defaults_rejects_bad_names() {
        let dir = TempDir::new().unwrap();
        let err = store(&dir).ensure_default_topics(&["../escape"]).unwrap_err();
        assert!(matches!(err, StudyError::InvalidTopicName(_)));
    }

    #[test]
    fn list_tracks_filesystem_changes() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);
        store.ensure_default_topics(&["General", "Math"]).unwrap();
        std::fs::write(store.dir().join("ignored.txt"), "not a topic").unwrap();

        let listed: HashSet<String> = store.list_topics().unwrap().into_iter().collect();
        assert_eq!(listed, HashSet::from(["General".to_string(), "Math".to_string()]));

        std::fs::write(store.dir().join("Physics.md"), "# Physics").unwrap();
        std::fs::remove_file(store.dir().join("Math.md")).unwrap();

        let listed: HashSet<String> = store.list_topics().unwrap().into_iter().collect();
        assert_eq!(
            listed,
            HashSet::from(["General".to_string(), "Physics".to_string()])
        );
    }

    #[test]
    fn every_listed_topic_can_be_read() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);
        store.ensure_default_topics(&["General"]).unwrap();
        for file in ["Chapter 1.5.md", "Geschichte-Ü.md", ".hidden.md", "padded .md"] {
            std::fs::write(store.dir().join(file), "notes").unwrap();
        }

        let listed: HashSet<String> = store.list_topics().unwrap().into_iter().collect();
        assert_eq!(
            listed,
            HashSet::from([
                "General".to_string(),
                "Chapter 1.5".to_string(),
                "Geschichte-Ü".to_string(),
            ])
        );
        for name in &listed {
            store
                .read_topic(name)
                .unwrap_or_else(|e| panic!("listed topic {name} is unreadable: {e}"));
        }
    }

    #[test]
    fn list_missing_dir_is_empty() {
        let dir = TempDir::new().unwrap();
        assert!(store(&dir).list_topics().unwrap().is_empty());
    }

    #[test]
    fn list_skips_subdirectories() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);
        std::fs::create_dir_all(store.dir().join("archive.md")).unwrap();
        assert!(store.list_topics().unwrap().is_empty());
    }

    #[test]
    fn read_missing_topic_is_not_found() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);
        store.ensure_default_topics(&["General"]).unwrap();

        let err = store.read_topic("Chemistry").unwrap_err();
        assert!(matches!(err, StudyError::TopicNotFound(ref n) if n == "Chemistry"));
        assert!(!store.dir().join("Chemistry.md").exists());
    }

    #[test]
    fn read_rejects_traversal() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("outside.md"), "secret").unwrap();
        let err = store(&dir).read_topic("../outside").unwrap_err();
        assert!(matches!(err, StudyError::InvalidTopicName(_)));
    }
}

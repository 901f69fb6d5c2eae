use thiserror::Error;

#[derive(Debug, Error)]
pub enum StudyError {
    #[error("topic not found: {0}")]
    TopicNotFound(String),

    #[error("invalid topic name '{0}': no path separators, reserved characters, leading '.' or surrounding spaces (max 128 chars)")]
    InvalidTopicName(String),

    #[error("invalid config: {0}")]
    Config(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),
}

pub type Result<T> = std::result::Result<T, StudyError>;

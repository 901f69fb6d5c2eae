pub mod config;
pub mod error;
pub mod paths;
pub mod topic;

pub use error::{Result, StudyError};

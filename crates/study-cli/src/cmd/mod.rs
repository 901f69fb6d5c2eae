pub mod config;
pub mod ollama;
pub mod run;
pub mod topics;

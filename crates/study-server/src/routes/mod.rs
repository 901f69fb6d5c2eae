pub mod data;
pub mod ollama;
pub mod topics;

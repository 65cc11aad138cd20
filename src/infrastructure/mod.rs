pub mod config;
pub mod engines;
pub mod http;
pub mod llm;
pub mod synthesizers;
pub mod workflows;

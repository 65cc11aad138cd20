pub mod i18n;
pub mod image;
pub mod llm;
pub mod tts;
pub mod workflow;

pub mod health;
pub mod i18n;
pub mod image;
pub mod llm;
pub mod tts;

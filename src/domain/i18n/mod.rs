//! Localization registry.
//!
//! Locale files are `{"language_name": .., "t": {key: text}}` JSON documents
//! named after their language code (`en_US.json`). Lookups never fail: a
//! missing key falls back to the caller's fallback, then to the default
//! locale, then to the key itself.

use once_cell::sync::{Lazy, OnceCell};
use regex::{Captures, Regex};
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use std::sync::{Arc, RwLock};

pub const DEFAULT_LANGUAGE: &str = "en_US";

static PLACEHOLDER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\{\{|\}\}|\{([A-Za-z_][A-Za-z0-9_]*)\}").expect("placeholder pattern is valid")
});

static GLOBAL: OnceCell<Arc<Localizer>> = OnceCell::new();

#[derive(Debug, Clone, Deserialize)]
pub struct Locale {
    #[serde(default)]
    pub language_name: Option<String>,
    #[serde(default)]
    pub t: HashMap<String, String>,
}

#[derive(Debug)]
pub struct Localizer {
    locales: HashMap<String, Locale>,
    current: RwLock<String>,
}

impl Localizer {
    pub fn new(locales: HashMap<String, Locale>, current: impl Into<String>) -> Self {
        Self {
            locales,
            current: RwLock::new(current.into()),
        }
    }

    /// Load every `*.json` file in `dir`. Unreadable or malformed files are
    /// logged and skipped; a missing directory yields an empty registry.
    pub fn load_dir(dir: &Path, current: impl Into<String>) -> Self {
        let mut locales = HashMap::new();

        let entries = match std::fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(e) => {
                tracing::warn!(dir = %dir.display(), error = %e, "Locales directory not found");
                return Self::new(locales, current);
            }
        };

        for path in entries.filter_map(|entry| entry.ok()).map(|entry| entry.path()) {
            if path.extension().and_then(|ext| ext.to_str()) != Some("json") {
                continue;
            }
            let Some(code) = path.file_stem().and_then(|stem| stem.to_str()) else {
                continue;
            };

            let parsed = std::fs::read_to_string(&path)
                .map_err(|e| e.to_string())
                .and_then(|raw| serde_json::from_str::<Locale>(&raw).map_err(|e| e.to_string()));

            match parsed {
                Ok(locale) => {
                    tracing::debug!(language = %code, keys = locale.t.len(), "Loaded locale");
                    locales.insert(code.to_string(), locale);
                }
                Err(e) => tracing::error!(language = %code, error = %e, "Failed to load locale"),
            }
        }

        let mut codes: Vec<&String> = locales.keys().collect();
        codes.sort();
        tracing::info!(count = locales.len(), languages = ?codes, "Loaded locales");

        Self::new(locales, current)
    }

    pub fn language(&self) -> String {
        self.current
            .read()
            .map(|current| current.clone())
            .unwrap_or_else(|poisoned| poisoned.into_inner().clone())
    }

    /// Switch the current language. Unknown codes are ignored.
    pub fn set_language(&self, code: &str) -> bool {
        if !self.locales.contains_key(code) {
            tracing::warn!(language = %code, current = %self.language(), "Language not found, keeping current");
            return false;
        }

        match self.current.write() {
            Ok(mut current) => *current = code.to_string(),
            Err(poisoned) => *poisoned.into_inner() = code.to_string(),
        }
        tracing::debug!(language = %code, "Language set");
        true
    }

    pub fn translate(&self, key: &str, fallback: Option<&str>, args: &[(&str, &str)]) -> String {
        let current = self.language();
        let lookup = |code: &str| {
            self.locales
                .get(code)
                .and_then(|locale| locale.t.get(key))
                .map(String::as_str)
        };

        let text = lookup(&current)
            .or(fallback)
            .or_else(|| {
                if current != DEFAULT_LANGUAGE {
                    lookup(DEFAULT_LANGUAGE)
                } else {
                    None
                }
            });

        let text = match text {
            Some(text) => text,
            None => {
                tracing::debug!(key = %key, language = %current, "Translation missing");
                key
            }
        };

        if args.is_empty() {
            return text.to_string();
        }

        match interpolate(text, args) {
            Ok(formatted) => formatted,
            Err(missing) => {
                tracing::warn!(key = %key, placeholder = %missing, "Failed to format translation");
                text.to_string()
            }
        }
    }

    /// Display name of `code`, or of the current language. Falls back to the code.
    pub fn language_name(&self, code: Option<&str>) -> String {
        let code = code.map(str::to_string).unwrap_or_else(|| self.language());
        self.locales
            .get(&code)
            .and_then(|locale| locale.language_name.clone())
            .unwrap_or(code)
    }

    /// Language code → display name
    pub fn available_languages(&self) -> BTreeMap<String, String> {
        self.locales
            .iter()
            .map(|(code, locale)| {
                let name = locale.language_name.clone().unwrap_or_else(|| code.clone());
                (code.clone(), name)
            })
            .collect()
    }
}

/// Replace `{name}` placeholders; `{{` and `}}` are literal braces.
/// Returns the first placeholder without an argument as the error.
fn interpolate(text: &str, args: &[(&str, &str)]) -> Result<String, String> {
    let mut missing = None;

    let formatted = PLACEHOLDER.replace_all(text, |caps: &Captures| match caps.get(1) {
        None if &caps[0] == "{{" => "{".to_string(),
        None => "}".to_string(),
        Some(name) => match args.iter().find(|(key, _)| *key == name.as_str()) {
            Some((_, value)) => value.to_string(),
            None => {
                missing.get_or_insert_with(|| name.as_str().to_string());
                caps[0].to_string()
            }
        },
    });

    match missing {
        Some(name) => Err(name),
        None => Ok(formatted.into_owned()),
    }
}

/// Install the process-wide registry. The first call wins; later calls get
/// the already-installed instance back.
pub fn init(localizer: Localizer) -> Arc<Localizer> {
    GLOBAL.get_or_init(|| Arc::new(localizer)).clone()
}

pub fn global() -> Option<Arc<Localizer>> {
    GLOBAL.get().cloned()
}

/// Translate through the process-wide registry
pub fn tr(key: &str, fallback: Option<&str>, args: &[(&str, &str)]) -> String {
    match GLOBAL.get() {
        Some(localizer) => localizer.translate(key, fallback, args),
        None => fallback.unwrap_or(key).to_string(),
    }
}

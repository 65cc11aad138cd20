use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use crate::{
    domain::i18n::Localizer,
    error::{AppError, AppResult},
};

#[derive(Debug, Serialize, Deserialize)]
pub struct LanguagesResponse {
    pub current: String,
    pub current_name: String,
    pub languages: BTreeMap<String, String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SetLanguageRequest {
    pub language: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TranslationResponse {
    pub key: String,
    pub text: String,
}

pub struct I18nController {
    localizer: Arc<Localizer>,
}

impl I18nController {
    pub fn new(localizer: Arc<Localizer>) -> Self {
        Self { localizer }
    }

    fn languages_response(&self) -> LanguagesResponse {
        LanguagesResponse {
            current: self.localizer.language(),
            current_name: self.localizer.language_name(None),
            languages: self.localizer.available_languages(),
        }
    }

    /// GET /api/i18n/languages
    pub async fn languages(
        State(controller): State<Arc<I18nController>>,
    ) -> AppResult<Json<LanguagesResponse>> {
        Ok(Json(controller.languages_response()))
    }

    /// PUT /api/i18n/language
    pub async fn set_language(
        State(controller): State<Arc<I18nController>>,
        Json(request): Json<SetLanguageRequest>,
    ) -> AppResult<Json<LanguagesResponse>> {
        if !controller.localizer.set_language(&request.language) {
            return Err(AppError::BadRequest(format!(
                "Unknown language: {}",
                request.language
            )));
        }
        Ok(Json(controller.languages_response()))
    }

    /// GET /api/i18n/translate?key=..&fallback=..&<name>=<value>
    ///
    /// Every query parameter other than `key` and `fallback` is an
    /// interpolation argument.
    pub async fn translate(
        State(controller): State<Arc<I18nController>>,
        Query(mut query): Query<HashMap<String, String>>,
    ) -> AppResult<Json<TranslationResponse>> {
        let key = query
            .remove("key")
            .ok_or_else(|| AppError::BadRequest("key is required".to_string()))?;
        let fallback = query.remove("fallback");
        let args: Vec<(&str, &str)> = query
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
            .collect();

        let text = controller
            .localizer
            .translate(&key, fallback.as_deref(), &args);
        Ok(Json(TranslationResponse { key, text }))
    }
}

use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tabli_core::locale::Language;

use crate::{error::AppError, state::AppState};

pub fn routes() -> Router<AppState> {
    Router::new().route(
        "/v1/preferences/{client_id}/language",
        get(get_language).put(set_language),
    )
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LanguagePreference {
    pub language: Language,
    #[serde(default)]
    pub rtl: bool,
}

impl From<Language> for LanguagePreference {
    fn from(language: Language) -> Self {
        Self {
            language,
            rtl: language.is_rtl(),
        }
    }
}

async fn get_language(
    State(state): State<AppState>,
    Path(client_id): Path<String>,
) -> Result<Json<LanguagePreference>, AppError> {
    Ok(Json(state.preferences.language(&client_id).await?.into()))
}

async fn set_language(
    State(state): State<AppState>,
    Path(client_id): Path<String>,
    Json(req): Json<LanguagePreference>,
) -> Result<Json<LanguagePreference>, AppError> {
    state.preferences.set_language(&client_id, req.language).await?;
    Ok(Json(req.language.into()))
}

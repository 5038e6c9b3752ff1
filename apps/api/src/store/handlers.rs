use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use crate::errors::AppError;
use crate::state::AppState;
use crate::store::{ActiveTab, UiPrefs};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrefsPatch {
    #[serde(default)]
    pub active_tab: Option<ActiveTab>,
    #[serde(default)]
    pub dark_mode: Option<bool>,
}

/// GET /api/v1/prefs
pub async fn handle_get_prefs(State(state): State<AppState>) -> Result<Json<UiPrefs>, AppError> {
    let snapshot = state.store.read();
    Ok(Json(snapshot.ui.clone()))
}

/// PATCH /api/v1/prefs
pub async fn handle_patch_prefs(
    State(state): State<AppState>,
    Json(patch): Json<PrefsPatch>,
) -> Result<Json<UiPrefs>, AppError> {
    let ui = state.store.mutate(|s| {
        if let Some(tab) = patch.active_tab {
            s.ui.active_tab = tab;
        }
        if let Some(dark) = patch.dark_mode {
            s.ui.dark_mode = dark;
        }
        s.ui.clone()
    });
    Ok(Json(ui))
}

/// POST /api/v1/purge
///
/// Wipes every candidate, the session, preferences, and the persisted
/// snapshot. There is no partial delete.
pub async fn handle_purge(State(state): State<AppState>) -> Result<StatusCode, AppError> {
    state.store.purge()?;
    tracing::warn!("all persisted data purged");
    Ok(StatusCode::NO_CONTENT)
}

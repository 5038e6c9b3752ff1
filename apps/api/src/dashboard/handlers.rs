use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;

use crate::dashboard::{rows, CandidateRow, SortKey};
use crate::errors::AppError;
use crate::models::candidate::CandidateRecord;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    pub q: Option<String>,
    #[serde(default)]
    pub sort: SortKey,
}

/// GET /api/v1/candidates?q=&sort=
pub async fn handle_list(
    State(state): State<AppState>,
    Query(params): Query<ListQuery>,
) -> Result<Json<Vec<CandidateRow>>, AppError> {
    let snapshot = state.store.read();
    Ok(Json(rows(
        snapshot.candidates_in_order(),
        params.q.as_deref(),
        params.sort,
    )))
}

/// GET /api/v1/candidates/:id
///
/// The full record: profile, per-question answers and scores, summary, and
/// the chat transcript.
pub async fn handle_detail(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<CandidateRecord>, AppError> {
    let snapshot = state.store.read();
    let record = snapshot
        .candidate(id)
        .cloned()
        .ok_or_else(|| AppError::NotFound(format!("candidate {id} not found")))?;
    Ok(Json(record))
}

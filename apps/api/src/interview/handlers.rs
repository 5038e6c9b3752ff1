use axum::extract::State;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;
use crate::interview::machine::{self, ProfileFields, SubmitOutcome};
use crate::interview::timer;
use crate::models::candidate::Difficulty;
use crate::models::session::Stage;
use crate::state::AppState;
use crate::store::StoreState;

/// Client-facing snapshot of the active session. The countdown is reported as
/// whole seconds remaining, never the raw deadline.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionView {
    pub stage: Stage,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub candidate_id: Option<Uuid>,
    pub question_index: usize,
    pub total_questions: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub question: Option<QuestionView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remaining_secs: Option<u32>,
    pub paused: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionView {
    pub id: String,
    pub difficulty: Difficulty,
    pub question: String,
    pub time_limit_secs: u32,
}

pub fn session_view(state: &StoreState, now: DateTime<Utc>) -> SessionView {
    let session = &state.session;
    let record = session
        .current_candidate_id
        .and_then(|id| state.candidate(id));

    let question = match (session.stage, record) {
        (Stage::InProgress, Some(record)) => {
            record.qas.get(session.current_question_index).map(|q| QuestionView {
                id: q.id.clone(),
                difficulty: q.difficulty,
                question: q.question.clone(),
                time_limit_secs: q.difficulty.time_limit_secs(),
            })
        }
        _ => None,
    };
    let remaining_secs = match session.stage {
        Stage::InProgress => session.current_question_expires_at.map(|expires_at| {
            let left_ms = (expires_at - now).num_milliseconds().max(0);
            // Ceiling so a freshly armed 20s question reads 20, not 19.
            (left_ms as u64).div_ceil(1000) as u32
        }),
        _ => None,
    };

    SessionView {
        stage: session.stage,
        candidate_id: session.current_candidate_id,
        question_index: session.current_question_index,
        total_questions: record.map(|r| r.qas.len()).filter(|&n| n > 0).unwrap_or(6),
        question,
        remaining_secs,
        paused: session.paused,
    }
}

/// GET /api/v1/session
pub async fn handle_get_session(
    State(state): State<AppState>,
) -> Result<Json<SessionView>, AppError> {
    let snapshot = state.store.read();
    Ok(Json(session_view(&snapshot, Utc::now())))
}

/// POST /api/v1/session/profile
///
/// Confirms the contact fields and starts the interview; the first countdown
/// is armed before the response is sent.
pub async fn handle_confirm_profile(
    State(state): State<AppState>,
    Json(fields): Json<ProfileFields>,
) -> Result<Json<SessionView>, AppError> {
    let armed = state.store.mutate(|s| {
        machine::confirm_profile(s, &fields, &mut rand::thread_rng(), Utc::now())
    })?;
    timer::arm(state.store.clone(), armed);

    let snapshot = state.store.read();
    Ok(Json(session_view(&snapshot, Utc::now())))
}

#[derive(Debug, Deserialize)]
pub struct SubmitRequest {
    #[serde(default)]
    pub answer: Option<String>,
}

/// POST /api/v1/session/answer
///
/// Manual submit for the current question. Racing the expiry timer is safe:
/// whichever side scores first wins and the other becomes a no-op, so this
/// never errors for a lost race.
pub async fn handle_submit_answer(
    State(state): State<AppState>,
    Json(req): Json<SubmitRequest>,
) -> Result<Json<SessionView>, AppError> {
    let outcome = state
        .store
        .mutate(|s| machine::submit_current(s, req.answer.as_deref(), false, Utc::now()));
    if let SubmitOutcome::Advanced(next) = outcome {
        timer::arm(state.store.clone(), next);
    }

    let snapshot = state.store.read();
    Ok(Json(session_view(&snapshot, Utc::now())))
}

/// POST /api/v1/session/pause
pub async fn handle_pause(State(state): State<AppState>) -> Result<Json<SessionView>, AppError> {
    state.store.mutate(machine::pause);
    let snapshot = state.store.read();
    Ok(Json(session_view(&snapshot, Utc::now())))
}

/// POST /api/v1/session/resume
pub async fn handle_resume(State(state): State<AppState>) -> Result<Json<SessionView>, AppError> {
    let rearmed = state.store.mutate(|s| machine::resume(s, Utc::now()));
    if let Some(armed) = rearmed {
        timer::arm(state.store.clone(), armed);
    }

    let snapshot = state.store.read();
    Ok(Json(session_view(&snapshot, Utc::now())))
}

/// POST /api/v1/session/reset
///
/// Abandons the active session without touching finished or in-flight
/// candidate records.
pub async fn handle_reset(State(state): State<AppState>) -> Result<Json<SessionView>, AppError> {
    state.store.mutate(StoreState::reset_session);
    let snapshot = state.store.read();
    Ok(Json(session_view(&snapshot, Utc::now())))
}

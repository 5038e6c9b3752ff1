//! The interview session state machine.
//!
//! Stages run idle → collecting_profile → in_progress → completed, with an
//! orthogonal `paused` overlay. All transitions are synchronous functions over
//! `StoreState` taking an injected `now`, so every path is drivable from
//! tests without timers or wall clocks.
//!
//! Defensive policy throughout: if the session references a candidate or
//! question that does not exist (a benign race with the store), the operation
//! is a silent no-op, never an error.

use chrono::{DateTime, Duration, Utc};
use once_cell::sync::Lazy;
use rand::Rng;
use regex::Regex;
use serde::Deserialize;

use crate::engine::{questions, scoring, summary};
use crate::errors::AppError;
use crate::models::candidate::{CandidateRecord, ChatMessage, ChatRole, QuestionItem};
use crate::models::session::Stage;
use crate::store::StoreState;

/// Confirmed/edited contact fields from the profile form.
#[derive(Debug, Clone, Deserialize)]
pub struct ProfileFields {
    pub name: String,
    pub email: String,
    pub phone: String,
}

/// A freshly armed countdown: the deadline plus the timer generation that is
/// allowed to fire it.
#[derive(Debug, Clone, Copy)]
pub struct ArmedQuestion {
    pub generation: u64,
    pub expires_at: DateTime<Utc>,
}

/// Result of a submit attempt (manual or auto).
#[derive(Debug, Clone, Copy)]
pub enum SubmitOutcome {
    /// Nothing to do: wrong stage, missing data, or the question was already
    /// scored. Benign by policy.
    Ignored,
    /// Question scored; the next one is current and its countdown is armed.
    Advanced(ArmedQuestion),
    /// The 6th question was scored and the interview finalized.
    Completed,
}

static PHONE_SHAPE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:\+?\d{1,3}[\s-]?)?(?:\(?\d{3}\)?[\s-]?)?\d{3}[\s-]?\d{4}$").unwrap()
});
static EMAIL_SHAPE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^[A-Z0-9._%+-]+@[A-Z0-9.-]+\.[A-Z]{2,}$").unwrap());

pub fn validate_profile(fields: &ProfileFields) -> Result<(), AppError> {
    if fields.name.trim().is_empty()
        || fields.email.trim().is_empty()
        || fields.phone.trim().is_empty()
    {
        return Err(AppError::Validation(
            "Please fill all fields to begin the interview.".to_string(),
        ));
    }
    if !EMAIL_SHAPE_RE.is_match(fields.email.trim()) {
        return Err(AppError::Validation(
            "Please enter a valid email".to_string(),
        ));
    }
    if !PHONE_SHAPE_RE.is_match(fields.phone.trim()) {
        return Err(AppError::Validation(
            "Please enter a valid phone number (e.g., +1 555 555 5555)".to_string(),
        ));
    }
    Ok(())
}

/// idle → collecting_profile. Called once a résumé has been parsed and the
/// record built; the record is stored and becomes the active candidate.
pub fn begin_profile(state: &mut StoreState, record: CandidateRecord) {
    let id = record.id;
    state.upsert_candidate(record);

    let session = &mut state.session;
    session.current_candidate_id = Some(id);
    session.stage = Stage::CollectingProfile;
    session.current_question_index = 0;
    session.current_question_expires_at = None;
    session.paused = false;
    session.timer_generation += 1;
}

/// collecting_profile → in_progress. Validates the confirmed fields, writes
/// them to the profile, generates the 6-question set, and arms the first
/// countdown.
pub fn confirm_profile<R: Rng + ?Sized>(
    state: &mut StoreState,
    fields: &ProfileFields,
    rng: &mut R,
    now: DateTime<Utc>,
) -> Result<ArmedQuestion, AppError> {
    if state.session.stage != Stage::CollectingProfile {
        return Err(AppError::Validation(
            "no session awaiting profile confirmation".to_string(),
        ));
    }
    validate_profile(fields)?;

    let qas = questions::generate(rng);
    let first_limit = qas[0].difficulty.time_limit_secs();

    let record = state
        .current_candidate_mut()
        .ok_or_else(|| AppError::NotFound("candidate for active session not found".to_string()))?;
    record.profile.name = fields.name.trim().to_string();
    record.profile.email = fields.email.trim().to_string();
    record.profile.phone = fields.phone.trim().to_string();
    push_assistant_entry(record, &qas[0].question, now);
    record.qas = qas;

    let expires_at = now + Duration::seconds(first_limit as i64);
    let session = &mut state.session;
    session.stage = Stage::InProgress;
    session.current_question_index = 0;
    session.current_question_expires_at = Some(expires_at);
    session.paused = false;
    session.timer_generation += 1;

    tracing::info!("interview started, first question armed for {first_limit}s");
    Ok(ArmedQuestion {
        generation: session.timer_generation,
        expires_at,
    })
}

/// Scores the current question (manual submit or auto-expiry) and advances or
/// finalizes. At-most-once per question: an already-scored current question
/// makes this a no-op, which is what suppresses a stale timer racing a manual
/// submit.
pub fn submit_current(
    state: &mut StoreState,
    answer: Option<&str>,
    auto: bool,
    now: DateTime<Utc>,
) -> SubmitOutcome {
    if state.session.stage != Stage::InProgress {
        return SubmitOutcome::Ignored;
    }
    let Some(candidate_id) = state.session.current_candidate_id else {
        return SubmitOutcome::Ignored;
    };
    let index = state.session.current_question_index;
    let expires_at = state.session.current_question_expires_at;

    let Some(record) = state.candidates.get_mut(&candidate_id) else {
        return SubmitOutcome::Ignored;
    };
    let Some(question) = record.qas.get_mut(index) else {
        return SubmitOutcome::Ignored;
    };
    if question.score.is_some() {
        return SubmitOutcome::Ignored;
    }

    // Elapsed is derived from the remaining budget at submit time, clamped so
    // a skewed expiry can never produce negative time.
    let limit_ms = question.difficulty.time_limit_secs() as i64 * 1000;
    let left_ms = expires_at
        .map(|e| (e - now).num_milliseconds().clamp(0, limit_ms))
        .unwrap_or(limit_ms);
    let elapsed_secs = ((limit_ms - left_ms) as f64 / 1000.0).round() as u32;

    let evaluation = scoring::evaluate(question, answer, elapsed_secs);
    question.answer = Some(answer.map(str::trim).unwrap_or_default().to_string());
    question.time_taken_secs = Some(elapsed_secs);
    question.score = Some(evaluation.score);

    let answer_text = answer.unwrap_or_default();
    let transcript_entry = if !answer_text.is_empty() {
        answer_text.to_string()
    } else if auto {
        "[No answer]".to_string()
    } else {
        String::new()
    };
    record.chat_history.push(ChatMessage {
        role: ChatRole::User,
        content: transcript_entry,
        ts: now,
    });

    if index + 1 < record.qas.len() {
        let next_question = record.qas[index + 1].question.clone();
        let next_limit = record.qas[index + 1].difficulty.time_limit_secs();
        push_assistant_entry(record, &next_question, now);

        let expires_at = now + Duration::seconds(next_limit as i64);
        let session = &mut state.session;
        session.current_question_index = index + 1;
        session.current_question_expires_at = Some(expires_at);
        session.timer_generation += 1;
        SubmitOutcome::Advanced(ArmedQuestion {
            generation: session.timer_generation,
            expires_at,
        })
    } else {
        let final_score = mean_score(&record.qas);
        let name = if record.profile.name.is_empty() {
            "Candidate"
        } else {
            record.profile.name.as_str()
        };
        record.summary = Some(summary::summarize(name, &record.qas, final_score));
        record.final_score = Some(final_score);
        record.completed_at = Some(now);

        let session = &mut state.session;
        session.stage = Stage::Completed;
        session.current_question_expires_at = None;
        session.timer_generation += 1;
        tracing::info!(final_score, "interview completed");
        SubmitOutcome::Completed
    }
}

/// Timer callback body. Auto-submits only when the session is in progress and
/// unpaused, the arming generation is still current, and the deadline has
/// actually passed.
pub fn expire_if_due(state: &mut StoreState, generation: u64, now: DateTime<Utc>) -> SubmitOutcome {
    let session = &state.session;
    if session.stage != Stage::InProgress
        || session.paused
        || session.timer_generation != generation
    {
        return SubmitOutcome::Ignored;
    }
    let due = session
        .current_question_expires_at
        .is_some_and(|expires_at| now >= expires_at);
    if due {
        submit_current(state, None, true, now)
    } else {
        SubmitOutcome::Ignored
    }
}

/// Suppresses the auto-submit trigger. The wall-clock deadline keeps elapsing
/// while paused, so a long pause can make the next unpause fire immediately —
/// observed product behavior, likely a defect, preserved deliberately.
pub fn pause(state: &mut StoreState) {
    let session = &mut state.session;
    if matches!(session.stage, Stage::CollectingProfile | Stage::InProgress) && !session.paused {
        session.paused = true;
        session.timer_generation += 1;
    }
}

/// Clears the pause overlay. Returns the re-armed countdown (against the
/// original deadline) when a question is live.
pub fn resume(state: &mut StoreState, _now: DateTime<Utc>) -> Option<ArmedQuestion> {
    let session = &mut state.session;
    if !session.paused {
        return None;
    }
    session.paused = false;
    session.timer_generation += 1;
    if session.stage == Stage::InProgress {
        session
            .current_question_expires_at
            .map(|expires_at| ArmedQuestion {
                generation: session.timer_generation,
                expires_at,
            })
    } else {
        None
    }
}

/// Final score: rounded arithmetic mean of the per-question scores.
fn mean_score(qas: &[QuestionItem]) -> u32 {
    if qas.is_empty() {
        return 0;
    }
    let total: u32 = qas.iter().map(|q| q.score.unwrap_or(0)).sum();
    (total as f64 / qas.len() as f64).round() as u32
}

/// Appends the assistant transcript entry for a question exactly once: if the
/// last entry is already this question from the assistant, nothing happens.
fn push_assistant_entry(record: &mut CandidateRecord, question_text: &str, now: DateTime<Utc>) {
    let duplicate = record
        .chat_history
        .last()
        .is_some_and(|m| m.role == ChatRole::Assistant && m.content == question_text);
    if !duplicate {
        record.chat_history.push(ChatMessage {
            role: ChatRole::Assistant,
            content: question_text.to_string(),
            ts: now,
        });
    }
}

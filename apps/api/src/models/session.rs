use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Top-level phase of the single interview session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Idle,
    CollectingProfile,
    InProgress,
    Completed,
}

/// The singleton session. `current_question_index` is only meaningful while
/// the stage is `in_progress`; the expiry is cleared whenever the stage leaves
/// `in_progress`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionState {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_candidate_id: Option<Uuid>,
    pub stage: Stage,
    pub current_question_index: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_question_expires_at: Option<DateTime<Utc>>,
    pub paused: bool,
    /// Monotonic counter bumped on every timer arm/disarm. A scheduled
    /// auto-submit only fires if its captured generation is still current,
    /// which guarantees at-most-one score-write per question even when a stale
    /// timer races a manual submit.
    #[serde(default)]
    pub timer_generation: u64,
}

impl Default for SessionState {
    fn default() -> Self {
        SessionState {
            current_candidate_id: None,
            stage: Stage::Idle,
            current_question_index: 0,
            current_question_expires_at: None,
            paused: false,
            timer_generation: 0,
        }
    }
}

//! Cancellable countdown scheduling.
//!
//! Arming spawns one task that sleeps until the question deadline and then
//! runs the expiry transition with the generation captured at arm time. There
//! is no disarm call: manual submit, pause, and reset all bump the store's
//! timer generation, so a stale fire fails the generation check inside
//! `expire_if_due` and becomes a no-op. When an auto-submit advances to the
//! next question, the task chains by arming the fresh countdown.

use std::sync::Arc;

use chrono::Utc;

use crate::interview::machine::{self, ArmedQuestion, SubmitOutcome};
use crate::store::Store;

pub fn arm(store: Arc<Store>, armed: ArmedQuestion) {
    tokio::spawn(async move {
        let wait = (armed.expires_at - Utc::now())
            .to_std()
            .unwrap_or_default();
        tokio::time::sleep(wait).await;

        let outcome = store.mutate(|s| machine::expire_if_due(s, armed.generation, Utc::now()));
        match outcome {
            SubmitOutcome::Advanced(next) => {
                tracing::info!(
                    generation = armed.generation,
                    "question auto-submitted on expiry"
                );
                arm(store, next);
            }
            SubmitOutcome::Completed => {
                tracing::info!("final question auto-submitted, interview completed");
            }
            SubmitOutcome::Ignored => {}
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interview::machine::{begin_profile, confirm_profile, ProfileFields};
    use crate::models::candidate::{CandidateProfile, CandidateRecord};
    use crate::models::session::Stage;
    use chrono::{DateTime, Duration as ChronoDuration};
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::time::Duration;
    use uuid::Uuid;

    /// Store with a running interview whose first question was armed at
    /// `started_at`. Arming in the past lets a spawned timer fire without
    /// actually waiting out the 20s budget.
    fn seeded_store(
        started_at: DateTime<Utc>,
    ) -> (Arc<Store>, ArmedQuestion, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(Store::load_or_default(dir.path()).unwrap());

        let armed = store.mutate(|s| {
            begin_profile(
                s,
                CandidateRecord {
                    id: Uuid::new_v4(),
                    profile: CandidateProfile {
                        name: String::new(),
                        email: String::new(),
                        phone: String::new(),
                        resume_meta: None,
                    },
                    qas: vec![],
                    started_at,
                    completed_at: None,
                    final_score: None,
                    summary: None,
                    chat_history: vec![],
                },
            );
            confirm_profile(
                s,
                &ProfileFields {
                    name: "Jane Doe".to_string(),
                    email: "jane@example.com".to_string(),
                    phone: "+1 555 555 5555".to_string(),
                },
                &mut StdRng::seed_from_u64(11),
                started_at,
            )
            .expect("confirm")
        });
        (store, armed, dir)
    }

    async fn settle() {
        tokio::time::sleep(Duration::from_millis(50)).await;
        tokio::task::yield_now().await;
    }

    #[tokio::test]
    async fn test_armed_timer_fires_once_deadline_past() {
        // Question armed 21s ago: the 20s deadline has already elapsed.
        let (store, armed, _dir) = seeded_store(Utc::now() - ChronoDuration::seconds(21));
        arm(store.clone(), armed);
        settle().await;

        let state = store.read();
        assert_eq!(state.session.current_question_index, 1);
        let record = state.candidate(state.session.current_candidate_id.unwrap()).unwrap();
        assert_eq!(record.qas[0].score, Some(0));
        assert_eq!(record.qas[0].answer.as_deref(), Some(""));
    }

    #[tokio::test]
    async fn test_stale_generation_never_fires() {
        let (store, armed, _dir) = seeded_store(Utc::now() - ChronoDuration::seconds(21));

        // Manual submit first: bumps the generation, orphaning `armed`.
        let outcome = store.mutate(|s| {
            machine::submit_current(s, Some("early answer"), false, Utc::now())
        });
        assert!(matches!(outcome, SubmitOutcome::Advanced(_)));

        arm(store.clone(), armed);
        settle().await;

        let state = store.read();
        // Still on question 1: the stale fire for question 0 was suppressed.
        assert_eq!(state.session.current_question_index, 1);
        assert_eq!(state.session.stage, Stage::InProgress);
        let record = state.candidate(state.session.current_candidate_id.unwrap()).unwrap();
        assert_eq!(record.qas[0].answer.as_deref(), Some("early answer"));
        assert!(record.qas[1].score.is_none());
    }

    #[tokio::test]
    async fn test_paused_session_suppresses_fire() {
        let (store, armed, _dir) = seeded_store(Utc::now() - ChronoDuration::seconds(120));
        store.mutate(machine::pause);

        arm(store.clone(), armed);
        settle().await;

        let state = store.read();
        assert_eq!(state.session.current_question_index, 0);
        let record = state.candidate(state.session.current_candidate_id.unwrap()).unwrap();
        assert!(record.qas[0].score.is_none());
    }

    #[tokio::test]
    async fn test_resume_after_overdue_deadline_fires_immediately() {
        let (store, armed, _dir) = seeded_store(Utc::now() - ChronoDuration::seconds(120));
        store.mutate(machine::pause);

        let rearmed = store.mutate(|s| machine::resume(s, Utc::now())).unwrap();
        // The pause did not shift the deadline: it is long past.
        assert_eq!(rearmed.expires_at, armed.expires_at);
        arm(store.clone(), rearmed);
        settle().await;

        let state = store.read();
        assert_eq!(state.session.current_question_index, 1);
    }
}

//! Candidate collection, session singleton, and UI preferences.
//!
//! `StoreState` is a plain data container with explicit update functions; the
//! `Store` wrapper owns the lock and persists a snapshot after every mutation.
//! It is constructed once at startup and injected through `AppState` — there
//! is no ambient global.

pub mod handlers;
pub mod persist;

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{RwLock, RwLockReadGuard};

use anyhow::Result;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::candidate::{CandidatePatch, CandidateRecord};
use crate::models::session::{SessionState, Stage};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActiveTab {
    Interviewee,
    Interviewer,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UiPrefs {
    pub active_tab: ActiveTab,
    pub dark_mode: bool,
}

impl Default for UiPrefs {
    fn default() -> Self {
        UiPrefs {
            active_tab: ActiveTab::Interviewee,
            dark_mode: false,
        }
    }
}

/// Everything the service persists, as one snapshot.
///
/// Invariant: `candidate_order` and the keys of `candidates` always
/// correspond one-to-one.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreState {
    pub candidates: HashMap<Uuid, CandidateRecord>,
    pub candidate_order: Vec<Uuid>,
    #[serde(default)]
    pub ui: UiPrefs,
    #[serde(default)]
    pub session: SessionState,
}

impl StoreState {
    /// Inserts or replaces a record. The insertion order gains the id at most
    /// once, no matter how often the same candidate is upserted.
    pub fn upsert_candidate(&mut self, record: CandidateRecord) {
        if !self.candidate_order.contains(&record.id) {
            self.candidate_order.push(record.id);
        }
        self.candidates.insert(record.id, record);
    }

    /// Shallow-merges a patch into an existing record; unknown ids are a
    /// no-op. Returns whether anything was written.
    pub fn update_candidate(&mut self, id: Uuid, patch: CandidatePatch) -> bool {
        match self.candidates.get_mut(&id) {
            Some(record) => {
                record.apply(patch);
                true
            }
            None => false,
        }
    }

    pub fn candidate(&self, id: Uuid) -> Option<&CandidateRecord> {
        self.candidates.get(&id)
    }

    pub fn current_candidate_mut(&mut self) -> Option<&mut CandidateRecord> {
        let id = self.session.current_candidate_id?;
        self.candidates.get_mut(&id)
    }

    pub fn candidates_in_order(&self) -> impl Iterator<Item = &CandidateRecord> {
        self.candidate_order
            .iter()
            .filter_map(|id| self.candidates.get(id))
    }

    /// Returns the session to its initial values without touching the
    /// candidate collection. The timer generation keeps counting up so any
    /// armed auto-submit is orphaned.
    pub fn reset_session(&mut self) {
        let generation = self.session.timer_generation + 1;
        self.session = SessionState::default();
        self.session.timer_generation = generation;
    }
}

/// Thread-safe store handle with write-through persistence.
pub struct Store {
    state: RwLock<StoreState>,
    path: PathBuf,
}

impl Store {
    /// Loads the persisted snapshot from `data_dir`, or starts empty. An
    /// unfinished persisted session comes back paused so the client can show
    /// a resume prompt instead of the timer silently running.
    pub fn load_or_default(data_dir: &std::path::Path) -> Result<Self> {
        let path = persist::namespace_path(data_dir);
        let mut state = persist::load(&path)?.unwrap_or_default();
        if matches!(
            state.session.stage,
            Stage::CollectingProfile | Stage::InProgress
        ) {
            state.session.paused = true;
            tracing::info!("resuming persisted session in paused state");
        }
        Ok(Store {
            state: RwLock::new(state),
            path,
        })
    }

    pub fn read(&self) -> RwLockReadGuard<'_, StoreState> {
        self.state.read().expect("store lock poisoned")
    }

    /// Applies a mutation and persists the resulting snapshot. A failed save
    /// is logged, not fatal — the in-memory state stays authoritative.
    pub fn mutate<T>(&self, f: impl FnOnce(&mut StoreState) -> T) -> T {
        let mut state = self.state.write().expect("store lock poisoned");
        let out = f(&mut state);
        if let Err(e) = persist::save(&self.path, &state) {
            tracing::error!("failed to persist store snapshot: {e:?}");
        }
        out
    }

    /// Wipes all persisted and in-memory state. The only reset-everything
    /// action.
    pub fn purge(&self) -> Result<()> {
        let mut state = self.state.write().expect("store lock poisoned");
        *state = StoreState::default();
        persist::remove(&self.path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use crate::models::candidate::CandidateProfile;

    fn record(name: &str) -> CandidateRecord {
        CandidateRecord {
            id: Uuid::new_v4(),
            profile: CandidateProfile {
                name: name.to_string(),
                email: format!("{}@example.com", name.to_lowercase()),
                phone: "+1 555 555 5555".to_string(),
                resume_meta: None,
            },
            qas: vec![],
            started_at: Utc::now(),
            completed_at: None,
            final_score: None,
            summary: None,
            chat_history: vec![],
        }
    }

    #[test]
    fn test_upsert_keeps_order_unique() {
        let mut state = StoreState::default();
        let c = record("Ana");
        state.upsert_candidate(c.clone());
        state.upsert_candidate(c.clone());
        assert_eq!(state.candidate_order, vec![c.id]);
        assert_eq!(state.candidates.len(), 1);
    }

    #[test]
    fn test_upsert_preserves_insertion_order() {
        let mut state = StoreState::default();
        let a = record("Ana");
        let b = record("Ben");
        state.upsert_candidate(a.clone());
        state.upsert_candidate(b.clone());
        let names: Vec<&str> = state
            .candidates_in_order()
            .map(|c| c.profile.name.as_str())
            .collect();
        assert_eq!(names, vec!["Ana", "Ben"]);
    }

    #[test]
    fn test_update_unknown_id_is_noop() {
        let mut state = StoreState::default();
        let wrote = state.update_candidate(
            Uuid::new_v4(),
            CandidatePatch {
                final_score: Some(50),
                ..Default::default()
            },
        );
        assert!(!wrote);
        assert!(state.candidates.is_empty());
    }

    #[test]
    fn test_update_patches_existing() {
        let mut state = StoreState::default();
        let c = record("Ana");
        let id = c.id;
        state.upsert_candidate(c);
        assert!(state.update_candidate(
            id,
            CandidatePatch {
                summary: Some("solid".to_string()),
                ..Default::default()
            }
        ));
        assert_eq!(state.candidate(id).unwrap().summary.as_deref(), Some("solid"));
    }

    #[test]
    fn test_reset_session_keeps_candidates_and_bumps_generation() {
        let mut state = StoreState::default();
        let c = record("Ana");
        state.upsert_candidate(c.clone());
        state.session.current_candidate_id = Some(c.id);
        state.session.stage = Stage::InProgress;
        state.session.timer_generation = 4;

        state.reset_session();

        assert_eq!(state.session.stage, Stage::Idle);
        assert!(state.session.current_candidate_id.is_none());
        assert_eq!(state.session.timer_generation, 5);
        assert_eq!(state.candidates.len(), 1);
    }
}

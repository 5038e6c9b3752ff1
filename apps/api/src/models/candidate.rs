use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Question tier. Determines the per-question time budget and score weight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub fn time_limit_secs(self) -> u32 {
        match self {
            Difficulty::Easy => 20,
            Difficulty::Medium => 60,
            Difficulty::Hard => 120,
        }
    }

    pub fn weight(self) -> f64 {
        match self {
            Difficulty::Easy => 1.0,
            Difficulty::Medium => 1.2,
            Difficulty::Hard => 1.4,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }
}

/// One interview question. `answer`, `time_taken_secs` and `score` are filled
/// exactly once, when the candidate submits or the countdown expires.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionItem {
    /// Stable id encoding difficulty and pool index: `"<difficulty>-<index>"`.
    pub id: String,
    pub difficulty: Difficulty,
    pub question: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub answer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_taken_secs: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<u32>,
}

impl QuestionItem {
    /// Pool index recovered from the id. Malformed ids fall back to 0.
    pub fn pool_index(&self) -> usize {
        self.id
            .split('-')
            .nth(1)
            .and_then(|s| s.parse().ok())
            .unwrap_or(0)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResumeMeta {
    pub file_name: String,
    pub file_type: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateProfile {
    pub name: String,
    pub email: String,
    pub phone: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resume_meta: Option<ResumeMeta>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    System,
    Assistant,
    User,
}

/// One entry of the chronological interview transcript.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
    pub ts: DateTime<Utc>,
}

/// One interview attempt. Created on résumé upload, mutated throughout the
/// session, never deleted except by a full data wipe.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateRecord {
    pub id: Uuid,
    pub profile: CandidateProfile,
    /// Empty until the profile is confirmed, then exactly 6 items.
    pub qas: Vec<QuestionItem>,
    pub started_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub final_score: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    pub chat_history: Vec<ChatMessage>,
}

/// Partial update for a candidate record. Field-level precedence is explicit:
/// a set field replaces the existing value wholesale, an unset field leaves it
/// untouched.
#[derive(Debug, Clone, Default)]
pub struct CandidatePatch {
    pub profile: Option<CandidateProfile>,
    pub qas: Option<Vec<QuestionItem>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub final_score: Option<u32>,
    pub summary: Option<String>,
    pub chat_history: Option<Vec<ChatMessage>>,
}

impl CandidateRecord {
    pub fn apply(&mut self, patch: CandidatePatch) {
        if let Some(profile) = patch.profile {
            self.profile = profile;
        }
        if let Some(qas) = patch.qas {
            self.qas = qas;
        }
        if let Some(completed_at) = patch.completed_at {
            self.completed_at = Some(completed_at);
        }
        if let Some(final_score) = patch.final_score {
            self.final_score = Some(final_score);
        }
        if let Some(summary) = patch.summary {
            self.summary = Some(summary);
        }
        if let Some(chat_history) = patch.chat_history {
            self.chat_history = chat_history;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question(id: &str, difficulty: Difficulty) -> QuestionItem {
        QuestionItem {
            id: id.to_string(),
            difficulty,
            question: "q".to_string(),
            answer: None,
            time_taken_secs: None,
            score: None,
        }
    }

    #[test]
    fn test_time_limits_per_difficulty() {
        assert_eq!(Difficulty::Easy.time_limit_secs(), 20);
        assert_eq!(Difficulty::Medium.time_limit_secs(), 60);
        assert_eq!(Difficulty::Hard.time_limit_secs(), 120);
    }

    #[test]
    fn test_pool_index_parses_id() {
        assert_eq!(question("hard-3", Difficulty::Hard).pool_index(), 3);
        assert_eq!(question("easy-0", Difficulty::Easy).pool_index(), 0);
    }

    #[test]
    fn test_pool_index_malformed_id_falls_back_to_zero() {
        assert_eq!(question("garbage", Difficulty::Easy).pool_index(), 0);
        assert_eq!(question("easy-x", Difficulty::Easy).pool_index(), 0);
    }

    #[test]
    fn test_patch_set_fields_win_unset_fields_keep() {
        let mut record = CandidateRecord {
            id: Uuid::new_v4(),
            profile: CandidateProfile {
                name: "Jane Doe".to_string(),
                email: "jane@example.com".to_string(),
                phone: "+1 555 555 5555".to_string(),
                resume_meta: None,
            },
            qas: vec![question("easy-1", Difficulty::Easy)],
            started_at: Utc::now(),
            completed_at: None,
            final_score: None,
            summary: None,
            chat_history: vec![],
        };

        record.apply(CandidatePatch {
            final_score: Some(72),
            summary: Some("ok".to_string()),
            ..Default::default()
        });

        assert_eq!(record.final_score, Some(72));
        assert_eq!(record.summary.as_deref(), Some("ok"));
        assert_eq!(record.profile.name, "Jane Doe");
        assert_eq!(record.qas.len(), 1);
    }
}

//! Interviewer-facing candidate listing: search and ordering over the
//! candidate collection. The full record (transcript, per-question breakdown)
//! is served by the detail endpoint only.

pub mod handlers;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::candidate::CandidateRecord;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateRow {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
}

impl CandidateRow {
    fn from_record(record: &CandidateRecord) -> Self {
        CandidateRow {
            id: record.id,
            name: record.profile.name.clone(),
            email: record.profile.email.clone(),
            phone: record.profile.phone.clone(),
            score: record.final_score,
            completed_at: record.completed_at,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    Name,
    ScoreAsc,
    #[default]
    ScoreDesc,
}

/// Builds the dashboard rows: filter by the search term, then sort. Ties and
/// unscored candidates keep their insertion order (the sort is stable).
pub fn rows<'a>(
    candidates: impl Iterator<Item = &'a CandidateRecord>,
    query: Option<&str>,
    sort: SortKey,
) -> Vec<CandidateRow> {
    let needle = query.map(str::trim).filter(|q| !q.is_empty()).map(str::to_lowercase);
    let mut rows: Vec<CandidateRow> = candidates
        .filter(|record| match &needle {
            Some(needle) => {
                record.profile.name.to_lowercase().contains(needle)
                    || record.profile.email.to_lowercase().contains(needle)
            }
            None => true,
        })
        .map(CandidateRow::from_record)
        .collect();

    match sort {
        SortKey::Name => rows.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase())),
        // Unscored candidates sort after every scored one in both directions.
        SortKey::ScoreAsc => rows.sort_by_key(|r| match r.score {
            Some(score) => (0, score as i64),
            None => (1, 0),
        }),
        SortKey::ScoreDesc => rows.sort_by_key(|r| match r.score {
            Some(score) => (0, -(score as i64)),
            None => (1, 0),
        }),
    }
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::candidate::CandidateProfile;

    fn record(name: &str, email: &str, score: Option<u32>) -> CandidateRecord {
        CandidateRecord {
            id: Uuid::new_v4(),
            profile: CandidateProfile {
                name: name.to_string(),
                email: email.to_string(),
                phone: "+1 555 555 5555".to_string(),
                resume_meta: None,
            },
            qas: vec![],
            started_at: Utc::now(),
            completed_at: score.map(|_| Utc::now()),
            final_score: score,
            summary: None,
            chat_history: vec![],
        }
    }

    fn names(rows: &[CandidateRow]) -> Vec<&str> {
        rows.iter().map(|r| r.name.as_str()).collect()
    }

    #[test]
    fn test_default_sort_is_score_descending() {
        let records = [
            record("Low", "low@x.io", Some(30)),
            record("High", "high@x.io", Some(90)),
            record("Mid", "mid@x.io", Some(60)),
        ];
        let rows = rows(records.iter(), None, SortKey::default());
        assert_eq!(names(&rows), vec!["High", "Mid", "Low"]);
    }

    #[test]
    fn test_unscored_sort_last_both_directions() {
        let records = [
            record("Pending", "p@x.io", None),
            record("Ace", "a@x.io", Some(80)),
            record("Ben", "b@x.io", Some(40)),
        ];
        let desc = rows(records.iter(), None, SortKey::ScoreDesc);
        assert_eq!(names(&desc), vec!["Ace", "Ben", "Pending"]);
        let asc = rows(records.iter(), None, SortKey::ScoreAsc);
        assert_eq!(names(&asc), vec!["Ben", "Ace", "Pending"]);
    }

    #[test]
    fn test_sort_by_name_ignores_case() {
        let records = [
            record("zoe", "z@x.io", None),
            record("Ann", "a@x.io", None),
            record("ben", "b@x.io", None),
        ];
        let rows = rows(records.iter(), None, SortKey::Name);
        assert_eq!(names(&rows), vec!["Ann", "ben", "zoe"]);
    }

    #[test]
    fn test_search_matches_name_or_email_case_insensitively() {
        let records = [
            record("Jane Doe", "jane@acme.io", Some(70)),
            record("John Roe", "john@other.io", Some(50)),
        ];
        let by_name = rows(records.iter(), Some("JANE"), SortKey::default());
        assert_eq!(names(&by_name), vec!["Jane Doe"]);
        let by_email = rows(records.iter(), Some("acme"), SortKey::default());
        assert_eq!(names(&by_email), vec!["Jane Doe"]);
    }

    #[test]
    fn test_blank_query_matches_everything() {
        let records = [record("Jane Doe", "jane@x.io", None)];
        assert_eq!(rows(records.iter(), Some("  "), SortKey::default()).len(), 1);
    }

    #[test]
    fn test_score_ties_keep_insertion_order() {
        let records = [
            record("First", "f@x.io", Some(50)),
            record("Second", "s@x.io", Some(50)),
        ];
        let rows = rows(records.iter(), None, SortKey::ScoreDesc);
        assert_eq!(names(&rows), vec!["First", "Second"]);
    }
}

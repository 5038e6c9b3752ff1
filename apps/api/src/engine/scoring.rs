//! Heuristic answer scoring.
//!
//! Maps a question + free-text answer + elapsed time to a 0–100 score with a
//! full sub-score breakdown. Content relevance comes from case-insensitive
//! keyword coverage, structure from list/code/connector cues, length from word
//! count, all weighted by difficulty and penalized for running over the time
//! budget. Defensive on input: a missing or whitespace-only answer scores 0
//! with every sub-score zeroed, never an error.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::engine::questions::keywords_for;
use crate::models::candidate::QuestionItem;

/// Per-answer score breakdown, returned in full for UI transparency.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Evaluation {
    pub score: u32,
    pub content_score: u32,
    pub structure_score: u32,
    pub length_score: u32,
    /// Rounded to 2 decimals.
    pub time_penalty: f64,
    pub difficulty_weight: f64,
    pub keyword_hits: u32,
    pub keywords: Vec<String>,
}

// Structural cues: a list marker at a line start, code-ish tokens, or a
// reasoning connector.
static LIST_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n\s*[-*\d]|\d+\)").unwrap());
static CODE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"`[^`]+`|\b(?:const|function)\b|=>").unwrap());
static CONNECTOR_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)because|therefore|however|trade-?off|in addition|for example").unwrap()
});

pub fn evaluate(question: &QuestionItem, answer: Option<&str>, elapsed_secs: u32) -> Evaluation {
    let keywords = keywords_for(question);
    let keyword_list = keywords.iter().map(|k| k.to_string()).collect::<Vec<_>>();
    let difficulty_weight = question.difficulty.weight();

    let answer = answer.map(str::trim).unwrap_or_default();
    if answer.is_empty() {
        return Evaluation {
            score: 0,
            content_score: 0,
            structure_score: 0,
            length_score: 0,
            time_penalty: 0.0,
            difficulty_weight,
            keyword_hits: 0,
            keywords: keyword_list,
        };
    }

    let lower = answer.to_lowercase();

    // Content: keyword coverage, normalized against at least 3 expected terms.
    let hits = keywords.iter().filter(|kw| lower.contains(*kw)).count() as u32;
    let content_score =
        (((hits as f64 / keywords.len().max(3) as f64) * 12.0).round() as u32).min(10);

    // Structure: +3 list, +3 code, +2 connector, capped at 10.
    let mut structure_score = 0;
    if LIST_RE.is_match(answer) {
        structure_score += 3;
    }
    if CODE_RE.is_match(answer) {
        structure_score += 3;
    }
    if CONNECTOR_RE.is_match(answer) {
        structure_score += 2;
    }
    let structure_score = structure_score.min(10);

    // Length: concise but substantive answers score best; rambling is dinged.
    let word_count = answer.split_whitespace().count();
    let length_score = match word_count {
        0..=9 => 1,
        10..=29 => 4,
        30..=79 => 7,
        80..=149 => 9,
        _ => 8,
    };

    let mut raw = (content_score as f64 * 0.5
        + structure_score as f64 * 0.3
        + length_score as f64 * 0.2)
        * difficulty_weight;

    // Time penalty: up to 3 points once past the limit, scaling over half the
    // budget.
    let limit = question.difficulty.time_limit_secs();
    let over = elapsed_secs.saturating_sub(limit);
    let time_penalty = if over > 0 {
        (over as f64 / (limit as f64 * 0.5)).min(3.0)
    } else {
        0.0
    };
    raw -= time_penalty;

    // Normalize to 0..90, then add the keyword-coverage bonus. The bonus
    // double-counts coverage already in the content score; kept as observed
    // for score compatibility.
    let base = (raw.clamp(0.0, 10.0) * 9.0).round();
    let score = (base + (hits * 2).min(10) as f64).clamp(0.0, 100.0).round() as u32;

    Evaluation {
        score,
        content_score,
        structure_score,
        length_score,
        time_penalty: (time_penalty * 100.0).round() / 100.0,
        difficulty_weight,
        keyword_hits: hits,
        keywords: keyword_list,
    }
}

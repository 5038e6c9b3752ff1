//! Aggregates per-question scores into a one-sentence strengths/weaknesses
//! narrative for the dashboard.

use crate::models::candidate::{Difficulty, QuestionItem};

/// Mean of a difficulty bucket, rounded to 1 decimal. Empty bucket scores 0.
fn bucket_mean(qas: &[QuestionItem], difficulty: Difficulty) -> f64 {
    let scores: Vec<u32> = qas
        .iter()
        .filter(|q| q.difficulty == difficulty)
        .map(|q| q.score.unwrap_or(0))
        .collect();
    if scores.is_empty() {
        return 0.0;
    }
    let mean = scores.iter().sum::<u32>() as f64 / scores.len() as f64;
    (mean * 10.0).round() / 10.0
}

/// Fixed-template summary sentence. A tier is a strength when its mean is the
/// (tied-)highest, so several tags can apply at once; improvement areas flag
/// hard/medium means below 50, or "n/a" when neither triggers.
pub fn summarize(name: &str, qas: &[QuestionItem], final_score: u32) -> String {
    let avg_easy = bucket_mean(qas, Difficulty::Easy);
    let avg_medium = bucket_mean(qas, Difficulty::Medium);
    let avg_hard = bucket_mean(qas, Difficulty::Hard);

    let mut strengths = Vec::new();
    if avg_easy >= avg_medium && avg_easy >= avg_hard {
        strengths.push("fundamentals");
    }
    if avg_medium >= avg_easy && avg_medium >= avg_hard {
        strengths.push("application design");
    }
    if avg_hard >= avg_easy && avg_hard >= avg_medium {
        strengths.push("scalability and depth");
    }

    let mut areas = Vec::new();
    if avg_hard < 50.0 {
        areas.push("deep system understanding");
    }
    if avg_medium < 50.0 {
        areas.push("architecture and API design");
    }

    let areas = if areas.is_empty() {
        "n/a".to_string()
    } else {
        areas.join(", ")
    };

    format!(
        "{name} scored {final_score}. Strengths: {}. Improvement areas: {areas}.",
        strengths.join(", ")
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scored(difficulty: Difficulty, scores: &[u32]) -> Vec<QuestionItem> {
        scores
            .iter()
            .enumerate()
            .map(|(i, &s)| QuestionItem {
                id: format!("{}-{}", difficulty.as_str(), i),
                difficulty,
                question: "q".to_string(),
                answer: Some("a".to_string()),
                time_taken_secs: Some(5),
                score: Some(s),
            })
            .collect()
    }

    fn full_set(easy: [u32; 2], medium: [u32; 2], hard: [u32; 2]) -> Vec<QuestionItem> {
        let mut qas = scored(Difficulty::Easy, &easy);
        qas.extend(scored(Difficulty::Medium, &medium));
        qas.extend(scored(Difficulty::Hard, &hard));
        qas
    }

    #[test]
    fn test_strong_easy_weak_rest() {
        let qas = full_set([90, 90], [40, 40], [30, 30]);
        let summary = summarize("Jane Doe", &qas, 53);
        assert_eq!(
            summary,
            "Jane Doe scored 53. Strengths: fundamentals. \
             Improvement areas: deep system understanding, architecture and API design."
        );
    }

    #[test]
    fn test_all_strong_reports_na_improvements() {
        let qas = full_set([80, 80], [90, 90], [95, 95]);
        let summary = summarize("Sam", &qas, 88);
        assert!(summary.contains("Strengths: scalability and depth."));
        assert!(summary.ends_with("Improvement areas: n/a."));
    }

    #[test]
    fn test_ties_yield_multiple_strength_tags() {
        let qas = full_set([70, 70], [70, 70], [70, 70]);
        let summary = summarize("Ty", &qas, 70);
        assert!(summary
            .contains("Strengths: fundamentals, application design, scalability and depth."));
    }

    #[test]
    fn test_empty_bucket_counts_as_zero() {
        // Only easy questions answered: hard/medium buckets mean 0, both below 50.
        let qas = scored(Difficulty::Easy, &[60, 60]);
        let summary = summarize("Pat", &qas, 20);
        assert!(summary.contains("fundamentals"));
        assert!(summary.contains("deep system understanding"));
        assert!(summary.contains("architecture and API design"));
    }

    #[test]
    fn test_unscored_questions_count_as_zero() {
        let mut qas = full_set([90, 90], [80, 80], [70, 70]);
        for q in qas.iter_mut().filter(|q| q.difficulty == Difficulty::Hard) {
            q.score = None;
        }
        let summary = summarize("Lee", &qas, 57);
        assert!(summary.contains("deep system understanding"));
    }
}

//! Curated question pools and the fixed-shape set generator.
//!
//! `generate` always returns 6 items — 2 easy, 2 medium, 2 hard — each drawn
//! without replacement from its tier's pool by an explicit shuffle-then-take,
//! so a seeded RNG reproduces the exact set in tests.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::models::candidate::{Difficulty, QuestionItem};

const EASY_POOL: &[&str] = &[
    "Explain the difference between var, let, and const in JavaScript.",
    "What is JSX in React and why is it useful?",
    "What is the purpose of useState in React?",
    "What does HTTP status 200 vs 404 indicate?",
    "What is npm and what is package.json used for?",
];

const MEDIUM_POOL: &[&str] = &[
    "Describe how React Reconciliation works and what keys are used for.",
    "Explain how closures work in JavaScript and provide a use case.",
    "How would you structure a REST API in Node.js for a blog with posts and comments?",
    "What are React Context and Redux, and when would you choose one over the other?",
    "How does async/await compare to Promises and callbacks? Provide examples.",
];

const HARD_POOL: &[&str] = &[
    "Design a scalable architecture for a full-stack app with React frontend and Node.js backend handling 100k concurrent users. Discuss caching, DB, and deployment.",
    "Explain event loop and task/microtask queues in Node.js, and how they affect performance in real apps.",
    "How would you implement server-side rendering (SSR) with hydration in a React app and what trade-offs exist?",
    "Discuss strategies to prevent and mitigate XSS/CSRF in a full-stack application.",
    "Given a slow React page, how would you diagnose and optimize performance end-to-end?",
];

// Keyword lists are keyed by pool index so the scorer can recover them from a
// question id alone.
const EASY_KEYWORDS: &[&[&str]] = &[
    &["var", "let", "const", "scope", "hoisting", "reassignment", "temporal dead zone"],
    &["jsx", "react", "babel", "html", "components", "syntax"],
    &["usestate", "state", "hook", "functional component"],
    &["http", "status", "200", "404", "success", "not found"],
    &["npm", "package.json", "dependencies", "scripts", "registry"],
];

const MEDIUM_KEYWORDS: &[&[&str]] = &[
    &["reconciliation", "diffing", "virtual dom", "keys", "list", "identity"],
    &["closure", "lexical", "scope", "encapsulation", "factory", "module"],
    &["rest", "node", "express", "routes", "crud", "posts", "comments"],
    &["context", "redux", "state management", "provider", "store", "usereducer"],
    &["async", "await", "promises", "callbacks", "try", "catch"],
];

const HARD_KEYWORDS: &[&[&str]] = &[
    &["scalable", "caching", "redis", "load balancer", "horizontal", "cdn", "database", "sharding", "replication", "kubernetes"],
    &["event loop", "microtask", "task queue", "promise", "io", "non-blocking", "throughput"],
    &["ssr", "hydration", "next.js", "render", "seo", "trade-offs", "bundle"],
    &["xss", "csrf", "sanitize", "token", "samesite", "csp", "oauth"],
    &["profiling", "memo", "usememo", "usecallback", "virtualize", "lazy", "code splitting"],
];

fn pool(difficulty: Difficulty) -> &'static [&'static str] {
    match difficulty {
        Difficulty::Easy => EASY_POOL,
        Difficulty::Medium => MEDIUM_POOL,
        Difficulty::Hard => HARD_POOL,
    }
}

/// Keyword set associated with a question, recovered from its pool index
/// modulo the pool size.
pub fn keywords_for(question: &QuestionItem) -> &'static [&'static str] {
    let table = match question.difficulty {
        Difficulty::Easy => EASY_KEYWORDS,
        Difficulty::Medium => MEDIUM_KEYWORDS,
        Difficulty::Hard => HARD_KEYWORDS,
    };
    table[question.pool_index() % table.len()]
}

/// Builds the 6-question interview set: 2 per difficulty, in
/// easy/easy/medium/medium/hard/hard order, no repeats within a tier.
pub fn generate<R: Rng + ?Sized>(rng: &mut R) -> Vec<QuestionItem> {
    let mut out = Vec::with_capacity(6);
    for difficulty in [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard] {
        let entries = pool(difficulty);
        let mut indices: Vec<usize> = (0..entries.len()).collect();
        indices.shuffle(rng);
        for &idx in indices.iter().take(2) {
            out.push(QuestionItem {
                id: format!("{}-{}", difficulty.as_str(), idx),
                difficulty,
                question: entries[idx].to_string(),
                answer: None,
                time_taken_secs: None,
                score: None,
            });
        }
    }
    out
}

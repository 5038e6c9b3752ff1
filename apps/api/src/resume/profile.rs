//! Best-effort contact extraction from résumé text.
//!
//! Pattern-matching only: email and phone regexes, then a cascade of name
//! heuristics — an explicit "Name:" label, a header-like line near the top,
//! the email local-part, and finally the first line. Absent fields are filled
//! by the candidate during profile confirmation, so every heuristic may fail
//! without consequence.

use once_cell::sync::Lazy;
use regex::Regex;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExtractedProfile {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)[A-Z0-9._%+-]+@[A-Z0-9.-]+\.[A-Z]{2,}").unwrap());
static PHONE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:\+?\d{1,3}[\s-]?)?(?:\(?\d{3}\)?[\s-]?)?\d{3}[\s-]?\d{4}").unwrap()
});
static NAME_LABEL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)^name\s*[:\-]\s*(.+)$").unwrap());
static TITLE_WORD_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Z][a-zA-Z'\-]+$").unwrap());
static CAPS_WORD_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Z][A-Z'\-]+$").unwrap());
static NON_NAME_CHARS_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^A-Za-z'\-\s]").unwrap());
static NAME_PART_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z][A-Za-z'\-]*$").unwrap());

// Section headings that would otherwise be mistaken for a name.
const HEADINGS: &[&str] = &[
    "RESUME",
    "CURRICULUM VITAE",
    "CV",
    "PROFILE",
    "SUMMARY",
    "CONTACT",
    "EXPERIENCE",
    "WORK EXPERIENCE",
    "EDUCATION",
    "SKILLS",
    "PROJECTS",
    "CERTIFICATIONS",
];

fn is_heading(line: &str) -> bool {
    HEADINGS.contains(&line.to_uppercase().as_str())
}

pub fn extract_profile(text: &str) -> ExtractedProfile {
    let email = EMAIL_RE.find(text).map(|m| m.as_str().to_string());
    let phone = PHONE_RE
        .find(text)
        .map(|m| m.as_str().split_whitespace().collect::<Vec<_>>().join(" "));

    let lines: Vec<&str> = text
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect();

    let name = name_from_label(&lines)
        .or_else(|| name_from_header_line(&lines, email.as_deref(), phone.as_deref()))
        .or_else(|| name_from_email_local_part(email.as_deref()))
        .or_else(|| name_from_first_line(&lines));

    ExtractedProfile { name, email, phone }
}

/// Explicit label like "Name: John Doe" in the first 15 lines.
fn name_from_label(lines: &[&str]) -> Option<String> {
    for line in lines.iter().take(15) {
        if is_heading(line) {
            continue;
        }
        if let Some(caps) = NAME_LABEL_RE.captures(line) {
            let value = caps[1].trim();
            if value.split_whitespace().count() <= 6 {
                let cleaned = NON_NAME_CHARS_RE.replace_all(value, "");
                return Some(title_case(cleaned.trim()));
            }
        }
    }
    None
}

/// First header-like line near the top: 2–4 words, Title Case or ALL CAPS,
/// skipping headings and contact lines.
fn name_from_header_line(lines: &[&str], email: Option<&str>, phone: Option<&str>) -> Option<String> {
    for line in lines.iter().take(10) {
        if is_heading(line) {
            continue;
        }
        if email.is_some_and(|e| line.contains(e)) || phone.is_some_and(|p| line.contains(p)) {
            continue;
        }
        let alpha_parts: Vec<&str> = line
            .split_whitespace()
            .filter(|p| p.chars().any(|c| c.is_alphabetic()))
            .collect();
        if !(2..=4).contains(&alpha_parts.len()) {
            continue;
        }
        let titled = alpha_parts.iter().all(|p| TITLE_WORD_RE.is_match(p));
        let all_caps = alpha_parts.iter().all(|p| CAPS_WORD_RE.is_match(p));
        if titled || all_caps {
            return Some(title_case(&alpha_parts.join(" ")));
        }
    }
    None
}

/// Derives "John Doe" from "john.doe@…".
fn name_from_email_local_part(email: Option<&str>) -> Option<String> {
    let local = email?.split('@').next()?;
    let cleaned: String = local
        .chars()
        .map(|c| if c == '_' || c == '.' || c == '-' || c.is_ascii_digit() { ' ' } else { c })
        .collect();
    let parts: Vec<&str> = cleaned.split_whitespace().filter(|p| p.len() >= 2).collect();
    if (2..=4).contains(&parts.len()) {
        Some(title_case(&parts.join(" ")))
    } else {
        None
    }
}

/// Last resort: the first non-empty line, if it is short enough to be a name.
fn name_from_first_line(lines: &[&str]) -> Option<String> {
    let first = lines.first()?;
    let cleaned = NON_NAME_CHARS_RE.replace_all(first, "");
    let cleaned = cleaned.trim();
    if !cleaned.is_empty() && cleaned.split_whitespace().count() <= 5 {
        Some(title_case(cleaned))
    } else {
        None
    }
}

/// Derives a probable name from a file name, e.g.
/// "LOMADA_VITESH_REDDY_Resume.pdf" → "Lomada Vitesh Reddy".
pub fn derive_name_from_filename(file_name: &str) -> Option<String> {
    static RESUME_WORDS_RE: Lazy<Regex> =
        Lazy::new(|| Regex::new(r"(?i)resume|cv|curriculum|vitae|profile|final|updated|new").unwrap());

    let base = file_name
        .rsplit_once('.')
        .map(|(stem, _)| stem)
        .unwrap_or(file_name);
    let cleaned = RESUME_WORDS_RE.replace_all(base, " ");
    let cleaned: String = cleaned
        .chars()
        .map(|c| if c == '_' || c == '-' || c.is_ascii_digit() { ' ' } else { c })
        .collect();
    let parts: Vec<&str> = cleaned
        .split_whitespace()
        .filter(|p| NAME_PART_RE.is_match(p))
        .collect();
    if (2..=4).contains(&parts.len()) {
        Some(title_case(&parts.join(" ")))
    } else {
        None
    }
}

fn title_case(s: &str) -> String {
    s.split_whitespace()
        .map(|w| {
            // ALL-CAPS words are lowered first so "REDDY" becomes "Reddy".
            if w.to_uppercase() == w {
                capitalize(&w.to_lowercase())
            } else {
                capitalize(w)
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn capitalize(w: &str) -> String {
    let mut chars = w.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

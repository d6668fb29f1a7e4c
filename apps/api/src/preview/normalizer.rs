//! Input normalization: raw form fields to a canonical [`ResumeRecord`].
//!
//! `normalize` is total. Missing or mistyped fields become empty values and
//! only narrow the produced lists and summary; nothing here returns an error.

use crate::models::resume::{scalar_to_string, FieldValue, ResumeInput, ResumeRecord};

/// Placeholder used in the summary when no name was given.
pub const FALLBACK_NAME: &str = "Candidate";

/// Summary returned when name, skills and experience are all empty.
pub const EMPTY_SUMMARY: &str =
    "No resume details provided yet. Add your name, skills, or experience to generate a summary.";

/// Number of leading skills mentioned in the summary sentence.
pub const SUMMARY_SKILL_LIMIT: usize = 3;

/// Maps untrusted form input to the canonical record.
pub fn normalize(input: ResumeInput) -> ResumeRecord {
    let name = clean_text(input.name);
    let email = clean_text(input.email);
    let skills = input.skills.map(split_skills).unwrap_or_default();
    let experience = input.experience.map(split_experience).unwrap_or_default();
    let summary = build_summary(&name, &skills, &experience);

    ResumeRecord {
        name,
        email,
        skills,
        experience,
        summary,
    }
}

/// Comma-separated text or a list, collapsed to trimmed non-empty entries.
pub fn split_skills(value: FieldValue) -> Vec<String> {
    match value {
        FieldValue::Text(text) => collect_trimmed(text.split(',')),
        FieldValue::List(items) => collect_trimmed(FieldValue::list_items(&items)),
        FieldValue::Other(other) => scalar_to_string(&other)
            .map(|text| collect_trimmed(text.split(',')))
            .unwrap_or_default(),
    }
}

/// One entry per non-blank line (`\n` or `\r\n`), or a list passed through.
pub fn split_experience(value: FieldValue) -> Vec<String> {
    match value {
        FieldValue::Text(text) => collect_trimmed(text.lines()),
        FieldValue::List(items) => collect_trimmed(FieldValue::list_items(&items)),
        FieldValue::Other(other) => scalar_to_string(&other)
            .map(|text| collect_trimmed(text.lines()))
            .unwrap_or_default(),
    }
}

/// Deterministic one-sentence summary for the preview.
///
/// ```text
/// Jane Doe is skilled in React, Node, and SQL, with 2 highlighted experience entries.
/// ```
pub fn build_summary(name: &str, skills: &[String], experience: &[String]) -> String {
    if name.is_empty() && skills.is_empty() && experience.is_empty() {
        return EMPTY_SUMMARY.to_string();
    }

    let who = if name.is_empty() { FALLBACK_NAME } else { name };
    let shown: Vec<&str> = skills
        .iter()
        .take(SUMMARY_SKILL_LIMIT)
        .map(String::as_str)
        .collect();

    match (shown.is_empty(), experience.len()) {
        (false, 0) => format!("{who} is skilled in {}.", join_list(&shown)),
        (false, n) => format!(
            "{who} is skilled in {}, with {}.",
            join_list(&shown),
            experience_phrase(n)
        ),
        (true, 0) => format!("{who} has not listed skills or experience yet."),
        (true, n) => format!("{who} brings {}.", experience_phrase(n)),
    }
}

fn clean_text(value: Option<String>) -> String {
    value.map(|s| s.trim().to_string()).unwrap_or_default()
}

fn collect_trimmed<I, S>(pieces: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    pieces
        .into_iter()
        .filter_map(|piece| {
            let trimmed = piece.as_ref().trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        })
        .collect()
}

fn join_list(items: &[&str]) -> String {
    match items {
        [] => String::new(),
        [one] => (*one).to_string(),
        [first, second] => format!("{first} and {second}"),
        [init @ .., last] => format!("{}, and {last}", init.join(", ")),
    }
}

fn experience_phrase(count: usize) -> String {
    if count == 1 {
        "1 highlighted experience entry".to_string()
    } else {
        format!("{count} highlighted experience entries")
    }
}

//! URL slugs for question pages.
//!
//! Slugs are derived from the question content only, so the same set of questions always produces the same slugs,
//! build after build. Duplicates are disambiguated by question number, never by input order.
use rustc_hash::FxHashMap;

use crate::question::{Question, Statement};

/// Token standing in for the statement of questions whose statement is an image.
pub const VISUAL_QUESTION_TOKEN: &str = "visual-question";

const STATEMENT_MAX_WORDS: usize = 8;
const STATEMENT_MAX_LEN: usize = 50;
const SEGMENT_MAX_LEN: usize = 30;
const SLUG_MAX_LEN: usize = 200;
const SLUG_TRUNCATED_LEN: usize = 180;

/// Final slug of every question in a batch, keyed by question number.
pub type SlugMap = FxHashMap<u64, String>;

/// Builds the slug of a question before any duplicate disambiguation.
///
/// Never fails: questions missing a statement, an exam or a topic get `question-<number>`.
pub fn build_base_slug(question: &Question) -> String {
    let fallback = || format!("question-{}", question.question_number);

    let (Some(statement), Some(exam), Some(topic)) =
        (&question.statement, &question.exam, &question.topic)
    else {
        return fallback();
    };

    let mut parts = vec![
        statement_token(statement),
        sanitize_segment(exam, SEGMENT_MAX_LEN),
    ];
    if let Some(sub_exam) = question.specific_sub_exam() {
        parts.push(sanitize_segment(sub_exam, SEGMENT_MAX_LEN));
    }
    parts.push(sanitize_segment(topic, SEGMENT_MAX_LEN));

    let joined = parts
        .into_iter()
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("-");

    let slug = finalize_slug(&joined, question.question_number);
    if slug.is_empty() { fallback() } else { slug }
}

/// Computes the final, unique slug of every question.
///
/// Questions sharing a base slug get `-1`, `-2`, ... in ascending question number order. If a suffixed slug then
/// clashes with another question's slug, every clashing question but the lowest-numbered one gets `-q<number>`.
pub fn generate_all_slugs(questions: &[Question]) -> SlugMap {
    let base_slugs: Vec<(u64, String)> = questions
        .iter()
        .map(|question| (question.question_number, build_base_slug(question)))
        .collect();

    let mut collisions: FxHashMap<&str, Vec<u64>> = FxHashMap::default();
    for (number, base_slug) in &base_slugs {
        collisions
            .entry(base_slug.as_str())
            .or_default()
            .push(*number);
    }
    for numbers in collisions.values_mut() {
        numbers.sort_unstable();
        numbers.dedup();
    }

    let mut slugs = SlugMap::default();
    for (number, base_slug) in &base_slugs {
        let siblings = &collisions[base_slug.as_str()];
        let slug = if siblings.len() > 1 {
            let rank = siblings
                .iter()
                .position(|sibling| sibling == number)
                .map_or(1, |index| index + 1);
            format!("{base_slug}-{rank}")
        } else {
            base_slug.clone()
        };
        slugs.insert(*number, slug);
    }

    while resolve_slug_clashes(&mut slugs) {}

    slugs
}

/// One pass of clash resolution. Returns whether anything was renamed.
fn resolve_slug_clashes(slugs: &mut SlugMap) -> bool {
    let mut owners: FxHashMap<&str, Vec<u64>> = FxHashMap::default();
    for (number, slug) in slugs.iter() {
        owners.entry(slug.as_str()).or_default().push(*number);
    }

    let renames: Vec<(u64, String)> = owners
        .into_iter()
        .filter(|(_, numbers)| numbers.len() > 1)
        .flat_map(|(slug, mut numbers)| {
            numbers.sort_unstable();
            numbers
                .into_iter()
                .skip(1)
                .map(move |number| (number, format!("{slug}-q{number}")))
        })
        .collect();

    let renamed = !renames.is_empty();
    for (number, slug) in renames {
        log::debug!(target: "slug", "question {} renamed to {} to keep slugs unique", number, slug);
        slugs.insert(number, slug);
    }

    renamed
}

fn statement_token(statement: &Statement) -> String {
    match statement {
        Statement::ImageRef(_) => VISUAL_QUESTION_TOKEN.to_string(),
        Statement::Text(text) => {
            let cleaned: String = text
                .to_lowercase()
                .chars()
                .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c.is_whitespace())
                .collect();

            let token = cleaned
                .split_whitespace()
                .take(STATEMENT_MAX_WORDS)
                .collect::<Vec<_>>()
                .join("-");

            truncate_chars(&token, STATEMENT_MAX_LEN)
        }
    }
}

fn sanitize_segment(value: &str, max_len: usize) -> String {
    let cleaned: String = value
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c.is_whitespace() || *c == '-')
        .collect();

    let hyphenated = cleaned.split_whitespace().collect::<Vec<_>>().join("-");

    tidy_hyphens(&truncate_chars(&tidy_hyphens(&hyphenated), max_len))
}

fn finalize_slug(raw: &str, question_number: u64) -> String {
    let slug = if raw.chars().count() > SLUG_MAX_LEN {
        format!(
            "{}-q{}",
            truncate_chars(raw, SLUG_TRUNCATED_LEN),
            question_number
        )
    } else {
        raw.to_string()
    };

    let valid: String = slug
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || *c == '-')
        .collect();

    tidy_hyphens(&valid)
}

/// Collapses runs of hyphens and trims them from both ends.
fn tidy_hyphens(value: &str) -> String {
    value
        .split('-')
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}

fn truncate_chars(value: &str, max_len: usize) -> String {
    value.chars().take(max_len).collect()
}

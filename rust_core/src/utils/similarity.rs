//! String similarity scores on a 0-100 integer scale.
//!
//! - `ratio`: character-level Indel ratio, `2 * LCS / (len_a + len_b)`
//! - `token_set_ratio`: order- and duplicate-insensitive comparison over
//!   whitespace tokens, tolerant of one name being a subset of the other

use std::collections::BTreeSet;
use rapidfuzz::distance::indel;

/// Indel ratio (insertions and deletions only, so a substitution costs two).
/// Identical strings (including two empty ones) score 100; an empty string
/// against a non-empty one scores 0.
pub fn ratio(a: &str, b: &str) -> u8 {
    if a == b {
        return 100;
    }
    if a.is_empty() || b.is_empty() {
        return 0;
    }
    to_score(indel::normalized_similarity(a.chars(), b.chars()))
}

/// Token-set ratio.
///
/// Both sides are lowercased with every non-alphanumeric char turned into a
/// space. With `sect` the sorted shared tokens, the best of
/// `ratio(sect, sect+rest_a)`, `ratio(sect, sect+rest_b)` and
/// `ratio(sect+rest_a, sect+rest_b)` wins, so "University of Texas" against
/// "Texas" scores 100.
pub fn token_set_ratio(a: &str, b: &str) -> u8 {
    let a_processed = full_process(a);
    let b_processed = full_process(b);
    if a_processed.is_empty() || b_processed.is_empty() {
        return 0;
    }

    let a_tokens: BTreeSet<&str> = a_processed.split_whitespace().collect();
    let b_tokens: BTreeSet<&str> = b_processed.split_whitespace().collect();

    let sect = join_tokens(a_tokens.intersection(&b_tokens));
    let a_rest = join_tokens(a_tokens.difference(&b_tokens));
    let b_rest = join_tokens(b_tokens.difference(&a_tokens));

    let combined_a = join_parts(&sect, &a_rest);
    let combined_b = join_parts(&sect, &b_rest);

    [
        ratio(&sect, &combined_a),
        ratio(&sect, &combined_b),
        ratio(&combined_a, &combined_b),
    ]
    .into_iter()
    .max()
    .unwrap_or(0)
}

/// Lowercase, replace non-alphanumerics with spaces, trim.
pub fn full_process(s: &str) -> String {
    s.chars()
        .map(|c| if c.is_alphanumeric() { c } else { ' ' })
        .collect::<String>()
        .to_lowercase()
        .trim()
        .to_string()
}

// Halves round to even: 12.5 scores 12
fn to_score(similarity: f64) -> u8 {
    (similarity * 100.0).round_ties_even().clamp(0.0, 100.0) as u8
}

// BTreeSet iterators are already sorted
fn join_tokens<'a, 'b: 'a>(tokens: impl Iterator<Item = &'a &'b str>) -> String {
    tokens.copied().collect::<Vec<_>>().join(" ")
}

fn join_parts(head: &str, tail: &str) -> String {
    format!("{} {}", head, tail).trim().to_string()
}

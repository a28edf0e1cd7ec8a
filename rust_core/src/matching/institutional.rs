//! Institutional (college) name policy.
//!
//! Official university names arrive with campus or city qualifiers ("University
//! of California, Berkeley", "University at Buffalo", "Texas A&M University at
//! College Station"). Normalization strips them down to the core institution
//! name; scoring is token-set based so "University of Texas" and "Texas"
//! still line up. Home/away ordering is trusted for this league's sources, so
//! no swap detection is attempted.

use tracing::debug;

use super::{normalize_candidates, validate_threshold, validate_vocabulary, MatchHit, MatchKind, NamePolicy};
use crate::error::ConfigError;
use crate::models::{Orientation, SourceGameRecord};
use crate::utils::similarity::token_set_ratio;

pub const DEFAULT_INSTITUTIONAL_THRESHOLD: u8 = 85;

const UNIVERSITY_AT: &str = "university at ";
const UNIVERSITY_OF: &str = "University of ";
const AT_DELIMITER: &str = " at ";

#[derive(Debug, Clone)]
pub struct InstitutionalPolicy {
    qualifiers: Vec<String>,
    fuzzy_threshold: u8,
}

impl InstitutionalPolicy {
    /// `qualifiers` are the campus/location tokens to strip, applied in list
    /// order.
    pub fn new(qualifiers: Vec<String>, fuzzy_threshold: u8) -> Result<Self, ConfigError> {
        Ok(Self {
            qualifiers: validate_vocabulary("campus qualifier", qualifiers)?,
            fuzzy_threshold: validate_threshold(fuzzy_threshold)?,
        })
    }

    /// Repeats the list until a full pass changes nothing, so "Lamar Park
    /// Park" ends as "Lamar" in one call.
    fn strip_qualifiers(&self, mut name: String) -> String {
        loop {
            let before = name.len();
            for qualifier in &self.qualifiers {
                let suffix = format!(" {}", qualifier);
                if name.ends_with(&suffix) {
                    name.truncate(name.len() - suffix.len());
                } else {
                    let interior = format!(" {} ", qualifier);
                    if name.contains(&interior) {
                        name = name.replace(&interior, " ");
                    }
                }
            }
            if name.len() == before {
                return name;
            }
        }
    }
}

impl NamePolicy for InstitutionalPolicy {
    fn policy_name(&self) -> &str {
        "institutional"
    }

    fn normalize(&self, raw: &str) -> String {
        if raw.is_empty() {
            return String::new();
        }

        let mut name = raw.trim().to_string();

        if let Some(rest) = strip_prefix_ignore_ascii_case(&name, UNIVERSITY_AT) {
            name = format!("{}{}", UNIVERSITY_OF, rest);
        }

        if let Some(pos) = name.find(',') {
            name = name[..pos].trim_end().to_string();
        }

        if let Some(pos) = find_ignore_ascii_case(&name, AT_DELIMITER) {
            name = name[..pos].trim_end().to_string();
        }

        self.strip_qualifiers(name).trim().to_string()
    }

    fn similarity(&self, a: &str, b: &str) -> u8 {
        token_set_ratio(a, b)
    }

    fn fuzzy_threshold(&self) -> u8 {
        self.fuzzy_threshold
    }

    fn locate(
        &self,
        away: &str,
        home: &str,
        candidates: &[&SourceGameRecord],
    ) -> Option<MatchHit> {
        let away = self.normalize(away);
        let home = self.normalize(home);
        let normalized = normalize_candidates(self, candidates);

        // Exact pass
        if let Some(index) = normalized
            .iter()
            .position(|(c_away, c_home)| *c_away == away && *c_home == home)
        {
            return Some(MatchHit {
                index,
                orientation: Orientation::Natural,
                kind: MatchKind::Exact,
            });
        }

        // Fuzzy pass: first candidate clearing the threshold on both sides
        let threshold = self.fuzzy_threshold;
        let hit = normalized
            .iter()
            .enumerate()
            .find_map(|(index, (c_away, c_home))| {
                let away_score = self.similarity(&away, c_away);
                let home_score = self.similarity(&home, c_home);
                (away_score >= threshold && home_score >= threshold).then(|| MatchHit {
                    index,
                    orientation: Orientation::Natural,
                    kind: MatchKind::Fuzzy {
                        score: (f64::from(away_score) + f64::from(home_score)) / 2.0,
                    },
                })
            });

        if hit.is_none() {
            debug!("No match found for {} @ {}", away, home);
        }
        hit
    }
}

fn strip_prefix_ignore_ascii_case<'a>(s: &'a str, prefix: &str) -> Option<&'a str> {
    s.get(..prefix.len())
        .filter(|head| head.eq_ignore_ascii_case(prefix))
        .map(|_| &s[prefix.len()..])
}

fn find_ignore_ascii_case(haystack: &str, needle: &str) -> Option<usize> {
    let (h, n) = (haystack.as_bytes(), needle.as_bytes());
    if n.is_empty() || n.len() > h.len() {
        return None;
    }
    (0..=h.len() - n.len()).find(|&i| h[i..i + n.len()].eq_ignore_ascii_case(n))
}

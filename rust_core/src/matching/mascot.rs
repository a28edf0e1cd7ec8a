//! Mascot name policy for pro leagues.
//!
//! "Kansas City Chiefs", "Chiefs" and "KC Chiefs" all reduce to "chiefs"
//! when the last token is a known mascot. Sources are not consistent about
//! home/away, so both orientations are tried in the exact and fuzzy passes.

use std::collections::HashSet;

use tracing::debug;

use super::{normalize_candidates, validate_threshold, validate_vocabulary, MatchHit, MatchKind, NamePolicy};
use crate::error::ConfigError;
use crate::models::{Orientation, SourceGameRecord};
use crate::utils::similarity::ratio;

pub const DEFAULT_MASCOT_THRESHOLD: u8 = 80;

#[derive(Debug, Clone)]
pub struct MascotPolicy {
    /// Lowercased for case-insensitive lookup
    mascots: HashSet<String>,
    fuzzy_threshold: u8,
}

impl MascotPolicy {
    pub fn new(mascots: Vec<String>, fuzzy_threshold: u8) -> Result<Self, ConfigError> {
        let mascots = validate_vocabulary("mascot", mascots)?
            .into_iter()
            .map(|m| m.trim().to_lowercase())
            .collect();
        Ok(Self {
            mascots,
            fuzzy_threshold: validate_threshold(fuzzy_threshold)?,
        })
    }

    pub fn is_mascot(&self, token: &str) -> bool {
        self.mascots.contains(&token.to_lowercase())
    }

    /// Mean of the away and home scores for one orientation.
    fn pair_score(&self, away: &str, home: &str, c_away: &str, c_home: &str) -> f64 {
        let away_score = f64::from(self.similarity(away, c_away));
        let home_score = f64::from(self.similarity(home, c_home));
        (away_score + home_score) / 2.0
    }
}

impl NamePolicy for MascotPolicy {
    fn policy_name(&self) -> &str {
        "mascot"
    }

    fn normalize(&self, raw: &str) -> String {
        if raw.is_empty() {
            return String::new();
        }

        let name = raw.trim();
        let tokens: Vec<&str> = name.split_whitespace().collect();
        let name = match tokens.last() {
            Some(&last) if tokens.len() > 1 && self.is_mascot(last) => last,
            _ => name,
        };
        name.to_lowercase()
    }

    fn similarity(&self, a: &str, b: &str) -> u8 {
        ratio(a, b)
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

        // Exact pass, natural orientation checked before swapped per candidate
        for (index, (c_away, c_home)) in normalized.iter().enumerate() {
            let orientation = if *c_away == away && *c_home == home {
                Orientation::Natural
            } else if *c_away == home && *c_home == away {
                Orientation::Swapped
            } else {
                continue;
            };
            return Some(MatchHit {
                index,
                orientation,
                kind: MatchKind::Exact,
            });
        }

        // Fuzzy pass: strictly better scores replace the current best, so
        // the earliest candidate wins ties
        let threshold = f64::from(self.fuzzy_threshold);
        let mut best: Option<MatchHit> = None;
        let mut best_score = 0.0;

        for (index, (c_away, c_home)) in normalized.iter().enumerate() {
            let natural = self.pair_score(&away, &home, c_away, c_home);
            let swapped = self.pair_score(&away, &home, c_home, c_away);

            let (score, orientation) = if natural >= threshold && natural > best_score {
                (natural, Orientation::Natural)
            } else if swapped >= threshold && swapped > best_score {
                (swapped, Orientation::Swapped)
            } else {
                continue;
            };

            best_score = score;
            best = Some(MatchHit {
                index,
                orientation,
                kind: MatchKind::Fuzzy { score },
            });
        }

        if best.is_none() {
            debug!("No match found for {} @ {}", away, home);
        }
        best
    }
}

//! Name policies
//!
//! A `NamePolicy` bundles everything that differs between leagues: how a
//! raw team name is reduced to its comparison form, how two names are
//! scored, and how the single best source record is picked for a scheduled
//! game. Two implementations exist:
//! - `InstitutionalPolicy`: college names with campus qualifiers
//!   (token-set scoring, first fuzzy hit wins, never swaps home/away)
//! - `MascotPolicy`: pro-league mascot names (edit-distance scoring, best
//!   fuzzy hit wins, detects swapped home/away)

use crate::error::ConfigError;
use crate::models::{Orientation, SourceGameRecord};

pub mod institutional;
pub mod mascot;

pub use institutional::InstitutionalPolicy;
pub use mascot::MascotPolicy;

/// How a hit was found.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MatchKind {
    /// Both names normalized to identical strings
    Exact,
    /// Similarity fallback; `score` is the mean of the away and home scores
    Fuzzy { score: f64 },
}

/// Position of the winning candidate and how to read it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatchHit {
    pub index: usize,
    pub orientation: Orientation,
    pub kind: MatchKind,
}

pub trait NamePolicy: Send + Sync {
    /// Policy name for logging
    fn policy_name(&self) -> &str;

    /// Reduce a raw team name to its comparison form. Empty input comes
    /// back unchanged.
    fn normalize(&self, raw: &str) -> String;

    /// Symmetric similarity of two normalized names, 0-100.
    fn similarity(&self, a: &str, b: &str) -> u8;

    fn fuzzy_threshold(&self) -> u8;

    /// Find the record for `away` @ `home` among `candidates`.
    ///
    /// An exact hit anywhere in the list beats every fuzzy hit.
    fn locate(&self, away: &str, home: &str, candidates: &[&SourceGameRecord])
        -> Option<MatchHit>;

    /// Matched record, already read from the schedule's point of view
    /// (names and payload swapped back when the source listed the game the
    /// other way round). Team names are left as the source wrote them.
    fn find_match(
        &self,
        away: &str,
        home: &str,
        candidates: &[SourceGameRecord],
    ) -> Option<SourceGameRecord> {
        let refs: Vec<&SourceGameRecord> = candidates.iter().collect();
        let hit = self.locate(away, home, &refs)?;
        refs.get(hit.index)
            .map(|record| record.oriented(hit.orientation))
    }
}

/// Normalized (away, home) for every candidate, computed once per lookup.
pub(crate) fn normalize_candidates<P: NamePolicy + ?Sized>(
    policy: &P,
    candidates: &[&SourceGameRecord],
) -> Vec<(String, String)> {
    candidates
        .iter()
        .map(|record| {
            (
                policy.normalize(&record.away_team),
                policy.normalize(&record.home_team),
            )
        })
        .collect()
}

pub(crate) fn validate_threshold(threshold: u8) -> Result<u8, ConfigError> {
    if threshold > 100 {
        return Err(ConfigError::ThresholdOutOfRange(threshold));
    }
    Ok(threshold)
}

pub(crate) fn validate_vocabulary(
    kind: &'static str,
    entries: Vec<String>,
) -> Result<Vec<String>, ConfigError> {
    if entries.iter().any(|entry| entry.trim().is_empty()) {
        return Err(ConfigError::BlankVocabularyEntry(kind));
    }
    Ok(entries)
}

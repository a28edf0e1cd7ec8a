//! League presets.
//!
//! This module provides:
//! - Static configuration for the leagues the matcher runs on
//! - The campus-qualifier and mascot vocabularies behind each name policy

use crate::error::ConfigError;
use crate::matching::institutional::DEFAULT_INSTITUTIONAL_THRESHOLD;
use crate::matching::mascot::DEFAULT_MASCOT_THRESHOLD;
use crate::matching::{InstitutionalPolicy, MascotPolicy, NamePolicy};

/// Which name policy a league uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolicyKind {
    Institutional,
    Mascot,
}

/// Configuration for a single league.
#[derive(Debug, Clone)]
pub struct LeagueConfig {
    /// League code (e.g., "nfl", "ncaaf")
    pub league_code: &'static str,
    pub policy: PolicyKind,
    pub fuzzy_threshold: u8,
    /// Directory (under the league dir) holding LLM-normalized files
    pub llm_dir: &'static str,
    /// Prediction sources, in output order
    pub sources: &'static [&'static str],
}

/// Campus/location qualifiers stripped from college names, applied in order.
pub static CAMPUS_QUALIFIERS: &[&str] = &[
    "Berkeley",
    "Los Angeles",
    "Santa Barbara",
    "Santa Cruz",
    "Riverside",
    "Davis",
    "Irvine",
    "Merced",
    "Boulder",
    "Colorado Springs",
    "Austin",
    "Arlington",
    "Dallas",
    "El Paso",
    "San Antonio",
    "Chapel Hill",
    "Charlotte",
    "Greensboro",
    "Wilmington",
    "Asheville",
    "Amherst",
    "Lowell",
    "Boston",
    "Dartmouth",
    "Las Vegas",
    "Reno",
    "Manoa",
    "Hilo",
    "Lafayette",
    "Monroe",
    "Shreveport",
    "Birmingham",
    "Huntsville",
    "Park",
    "College Station",
    "Storrs",
    "Kennesaw",
    "Lubbock",
];

/// NFL mascots.
pub static NFL_MASCOTS: &[&str] = &[
    "Raiders",
    "Ravens",
    "Bills",
    "Bengals",
    "Browns",
    "Broncos",
    "Texans",
    "Colts",
    "Jaguars",
    "Chiefs",
    "Chargers",
    "Dolphins",
    "Patriots",
    "Jets",
    "Steelers",
    "Titans",
    "Cowboys",
    "Giants",
    "Eagles",
    "Commanders",
    "Bears",
    "Lions",
    "Packers",
    "Vikings",
    "Falcons",
    "Panthers",
    "Saints",
    "Buccaneers",
    "Cardinals",
    "Rams",
    "49ers",
    "Seahawks",
];

/// Static configuration for all supported leagues.
pub static LEAGUE_CONFIGS: &[LeagueConfig] = &[
    LeagueConfig {
        league_code: "ncaaf",
        policy: PolicyKind::Institutional,
        fuzzy_threshold: DEFAULT_INSTITUTIONAL_THRESHOLD,
        llm_dir: "llm_university",
        sources: &["dimers", "oddshark", "espn", "dratings"],
    },
    LeagueConfig {
        league_code: "nfl",
        policy: PolicyKind::Mascot,
        fuzzy_threshold: DEFAULT_MASCOT_THRESHOLD,
        llm_dir: "llm_mascot",
        sources: &[
            "fantasynerds",
            "sportsline",
            "florio",
            "simms",
            "dimers",
            "oddshark",
            "espn",
            "dratings",
        ],
    },
];

impl LeagueConfig {
    /// Name policy with this league's vocabulary; `threshold_override`
    /// replaces the preset threshold.
    pub fn build_policy(
        &self,
        threshold_override: Option<u8>,
    ) -> Result<Box<dyn NamePolicy>, ConfigError> {
        let threshold = threshold_override.unwrap_or(self.fuzzy_threshold);
        Ok(match self.policy {
            PolicyKind::Institutional => {
                Box::new(InstitutionalPolicy::new(to_owned(CAMPUS_QUALIFIERS), threshold)?)
            }
            PolicyKind::Mascot => Box::new(MascotPolicy::new(to_owned(NFL_MASCOTS), threshold)?),
        })
    }

    pub fn source_names(&self) -> Vec<String> {
        to_owned(self.sources)
    }
}

fn to_owned(words: &[&str]) -> Vec<String> {
    words.iter().map(|w| w.to_string()).collect()
}

/// Get league configuration by code (case-insensitive).
pub fn get_league_config(league: &str) -> Option<&'static LeagueConfig> {
    LEAGUE_CONFIGS
        .iter()
        .find(|c| c.league_code.eq_ignore_ascii_case(league))
}

/// Like `get_league_config`, but an unknown code is an error.
pub fn require_league_config(league: &str) -> Result<&'static LeagueConfig, ConfigError> {
    get_league_config(league).ok_or_else(|| ConfigError::UnknownLeague(league.to_string()))
}

/// Get list of all league codes.
pub fn get_all_league_codes() -> Vec<&'static str> {
    LEAGUE_CONFIGS.iter().map(|c| c.league_code).collect()
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_league_config() {
        let nfl = get_league_config("nfl").unwrap();
        assert_eq!(nfl.policy, PolicyKind::Mascot);
        assert_eq!(nfl.fuzzy_threshold, 80);
        assert_eq!(nfl.llm_dir, "llm_mascot");
        assert_eq!(nfl.sources.len(), 8);

        let ncaaf = get_league_config("ncaaf").unwrap();
        assert_eq!(ncaaf.policy, PolicyKind::Institutional);
        assert_eq!(ncaaf.fuzzy_threshold, 85);
        assert_eq!(ncaaf.sources, &["dimers", "oddshark", "espn", "dratings"]);
    }

    #[test]
    fn test_case_insensitivity() {
        assert!(get_league_config("NFL").is_some());
        assert!(get_league_config("Ncaaf").is_some());
    }

    #[test]
    fn test_missing_league() {
        assert!(get_league_config("nba").is_none());
        assert_eq!(
            require_league_config("nba").unwrap_err(),
            ConfigError::UnknownLeague("nba".to_string())
        );
    }

    #[test]
    fn test_vocabulary_sizes() {
        assert_eq!(CAMPUS_QUALIFIERS.len(), 38);
        assert_eq!(NFL_MASCOTS.len(), 32);
    }

    #[test]
    fn test_build_policy() {
        let policy = get_league_config("nfl").unwrap().build_policy(None).unwrap();
        assert_eq!(policy.policy_name(), "mascot");
        assert_eq!(policy.fuzzy_threshold(), 80);
        assert_eq!(policy.normalize("Kansas City Chiefs"), "chiefs");

        let policy = get_league_config("ncaaf")
            .unwrap()
            .build_policy(Some(90))
            .unwrap();
        assert_eq!(policy.policy_name(), "institutional");
        assert_eq!(policy.fuzzy_threshold(), 90);
    }

    #[test]
    fn test_build_policy_rejects_bad_override() {
        let err = get_league_config("nfl")
            .unwrap()
            .build_policy(Some(101))
            .err()
            .unwrap();
        assert_eq!(err, ConfigError::ThresholdOutOfRange(101));
    }

    #[test]
    fn test_all_league_codes() {
        assert_eq!(get_all_league_codes(), vec!["ncaaf", "nfl"]);
    }
}

//! Runtime configuration for the game matcher
//!
//! Everything comes from the environment (a `.env` file is honored), except
//! that a league selection on the command line wins over `MATCH_LEAGUES`.

use gridiron_match_core::league_config::get_all_league_codes;
use std::collections::HashMap;
use std::env;
use std::path::PathBuf;
use tracing::warn;

pub const DEFAULT_DATA_DIR: &str = "data";
pub const DEFAULT_LEAGUES: &str = "ncaaf,nfl";
pub const DEFAULT_OUTPUT_FILE: &str = "matched_games.json";

#[derive(Debug, Clone, PartialEq)]
pub struct MatcherConfig {
    pub data_dir: PathBuf,
    /// Lowercased league codes, in run order
    pub leagues: Vec<String>,
    /// Per-league fuzzy threshold overrides
    pub threshold_overrides: HashMap<String, u8>,
    /// File name written under each league directory
    pub output_file: String,
}

impl MatcherConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(env::args().nth(1), |key| env::var(key).ok())
    }

    fn from_lookup(cli_leagues: Option<String>, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let leagues_raw = cli_leagues
            .or_else(|| lookup("MATCH_LEAGUES"))
            .unwrap_or_else(|| DEFAULT_LEAGUES.to_string());

        let threshold_overrides = get_all_league_codes()
            .into_iter()
            .filter_map(|code| {
                let var = format!("{}_FUZZY_THRESHOLD", code.to_uppercase());
                let raw = lookup(&var)?;
                parse_threshold(&var, &raw).map(|t| (code.to_string(), t))
            })
            .collect();

        Self {
            data_dir: lookup("DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR)),
            leagues: parse_leagues(&leagues_raw),
            threshold_overrides,
            output_file: lookup("MATCH_OUTPUT_FILE")
                .filter(|f| !f.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_OUTPUT_FILE.to_string()),
        }
    }

    pub fn threshold_for(&self, league: &str) -> Option<u8> {
        self.threshold_overrides.get(league).copied()
    }
}

/// Comma-separated league codes; `all` expands to every preset.
fn parse_leagues(raw: &str) -> Vec<String> {
    let mut leagues: Vec<String> = Vec::new();
    for code in raw.split(',').map(|c| c.trim().to_lowercase()) {
        if code.is_empty() {
            continue;
        }
        let expanded = if code == "all" {
            get_all_league_codes().iter().map(|c| c.to_string()).collect()
        } else {
            vec![code]
        };
        for code in expanded {
            if !leagues.contains(&code) {
                leagues.push(code);
            }
        }
    }
    leagues
}

fn parse_threshold(var: &str, raw: &str) -> Option<u8> {
    match raw.trim().parse::<u8>() {
        Ok(t) if t <= 100 => Some(t),
        _ => {
            warn!("Ignoring {}={:?}: expected an integer 0-100", var, raw);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(cli: Option<&str>, vars: &[(&str, &str)]) -> MatcherConfig {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        MatcherConfig::from_lookup(cli.map(str::to_string), |key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config(None, &[]);
        assert_eq!(config.data_dir, PathBuf::from("data"));
        assert_eq!(config.leagues, vec!["ncaaf", "nfl"]);
        assert!(config.threshold_overrides.is_empty());
        assert_eq!(config.output_file, "matched_games.json");
    }

    #[test]
    fn test_cli_overrides_env_leagues() {
        let config = config(Some("NFL"), &[("MATCH_LEAGUES", "ncaaf")]);
        assert_eq!(config.leagues, vec!["nfl"]);
    }

    #[test]
    fn test_all_expands_and_dedupes() {
        assert_eq!(parse_leagues("nfl, all"), vec!["nfl", "ncaaf"]);
        assert_eq!(parse_leagues(" , ncaaf,,"), vec!["ncaaf"]);
    }

    #[test]
    fn test_threshold_overrides() {
        let config = config(
            None,
            &[("NFL_FUZZY_THRESHOLD", "75"), ("NCAAF_FUZZY_THRESHOLD", "high")],
        );
        assert_eq!(config.threshold_for("nfl"), Some(75));
        assert_eq!(config.threshold_for("ncaaf"), None);

        assert_eq!(parse_threshold("NFL_FUZZY_THRESHOLD", "101"), None);
        assert_eq!(parse_threshold("NFL_FUZZY_THRESHOLD", " 0 "), Some(0));
    }
}

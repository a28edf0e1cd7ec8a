//! Attaches every source's prediction to the schedule rows it belongs to.

use std::collections::{BTreeMap, HashMap};

use serde_json::Value;
use tracing::{error, info, warn};

use crate::error::ConfigError;
use crate::league_config::LeagueConfig;
use crate::matching::NamePolicy;
use crate::models::{
    CanonicalGame, MatchSummary, MatchedGame, SourceGameRecord, SourceMatchCount, TeamPair,
    SHEETS_KEY,
};

/// Candidate records per source name.
pub type SourceCandidates = HashMap<String, Vec<SourceGameRecord>>;

pub struct GameAggregator {
    policy: Box<dyn NamePolicy>,
    source_names: Vec<String>,
}

impl GameAggregator {
    /// `source_names` fixes both which sources are consulted and their
    /// order in the summary.
    pub fn new(
        policy: Box<dyn NamePolicy>,
        source_names: Vec<String>,
    ) -> Result<Self, ConfigError> {
        if source_names.is_empty() {
            return Err(ConfigError::NoSources);
        }
        for (i, name) in source_names.iter().enumerate() {
            if name.trim().is_empty() || name == SHEETS_KEY {
                return Err(ConfigError::InvalidSourceName(name.clone()));
            }
            if source_names[..i].contains(name) {
                return Err(ConfigError::DuplicateSource(name.clone()));
            }
        }
        Ok(Self {
            policy,
            source_names,
        })
    }

    /// Aggregator with a league's preset policy and sources.
    pub fn for_league(
        config: &LeagueConfig,
        threshold_override: Option<u8>,
    ) -> Result<Self, ConfigError> {
        Self::new(config.build_policy(threshold_override)?, config.source_names())
    }

    pub fn policy(&self) -> &dyn NamePolicy {
        self.policy.as_ref()
    }

    pub fn source_names(&self) -> &[String] {
        &self.source_names
    }

    /// Match every schedule entry against every configured source.
    ///
    /// A candidate is attached to at most one schedule row per run; rows
    /// earlier in the schedule get first pick. Sources missing from
    /// `sources` simply match nothing.
    pub fn match_games(&self, schedule: &[Value], sources: &SourceCandidates) -> MatchSummary {
        let policy = self.policy.as_ref();
        let pools: Vec<&[SourceGameRecord]> = self
            .source_names
            .iter()
            .map(|name| sources.get(name).map(Vec::as_slice).unwrap_or(&[]))
            .collect();
        let mut claimed: Vec<Vec<bool>> = pools.iter().map(|pool| vec![false; pool.len()]).collect();
        let mut counts = vec![0usize; pools.len()];
        let mut rows: BTreeMap<String, MatchedGame> = BTreeMap::new();

        for (i, entry) in schedule.iter().enumerate() {
            let game = match CanonicalGame::from_value(entry) {
                Ok(game) => game,
                Err(e) if e.is_missing_data() => {
                    warn!("Skipping schedule entry {}: {}", i, e);
                    continue;
                }
                Err(e) => {
                    error!("Skipping schedule entry {}: {}", i, e);
                    continue;
                }
            };

            let mut matched = MatchedGame::new(TeamPair::new(
                policy.normalize(&game.away_team),
                policy.normalize(&game.home_team),
            ));

            for (s, pool) in pools.iter().enumerate() {
                let taken = &mut claimed[s];
                let (open_index, open): (Vec<usize>, Vec<&SourceGameRecord>) = pool
                    .iter()
                    .enumerate()
                    .filter(|(j, _)| !taken[*j])
                    .unzip();

                let Some(hit) = policy.locate(&game.away_team, &game.home_team, &open) else {
                    continue;
                };
                let (Some(&original), Some(record)) = (open_index.get(hit.index), open.get(hit.index))
                else {
                    continue;
                };

                taken[original] = true;
                counts[s] += 1;

                let record = record.oriented(hit.orientation);
                let record = record.with_team_names(
                    policy.normalize(&record.away_team),
                    policy.normalize(&record.home_team),
                );
                matched
                    .per_source
                    .insert(self.source_names[s].clone(), record);
            }

            if rows.insert(game.row_number.clone(), matched).is_some() {
                warn!(
                    "Duplicate row_number {}; keeping the later game",
                    game.row_number
                );
            }
        }

        let matched: Vec<SourceMatchCount> = self
            .source_names
            .iter()
            .zip(counts)
            .map(|(source, matched)| SourceMatchCount {
                source: source.clone(),
                matched,
            })
            .collect();

        info!(
            "{} matching: {} schedule games; {}",
            policy.policy_name(),
            schedule.len(),
            matched
                .iter()
                .map(|c| format!("{}={}", c.source, c.matched))
                .collect::<Vec<_>>()
                .join(", ")
        );

        MatchSummary {
            sheets_total: schedule.len(),
            matched,
            matched_sheets_rows: rows,
        }
    }
}

//! Gridiron Match Core - links scraped game predictions to a schedule.
//!
//! This module provides:
//! - Per-league team-name normalization (college campus qualifiers, NFL mascots)
//! - Exact-then-fuzzy matching with home/away swap detection
//! - Aggregation of many prediction sources onto schedule rows
//! - Loading of raw and LLM-normalized source files

pub mod aggregator;
pub mod error;
pub mod league_config;
pub mod matching;
pub mod models;
pub mod source_loader;
pub mod utils;

pub use aggregator::{GameAggregator, SourceCandidates};
pub use error::{ConfigError, RecordError};
pub use league_config::{get_league_config, LeagueConfig, PolicyKind};
pub use matching::{InstitutionalPolicy, MascotPolicy, MatchHit, MatchKind, NamePolicy};
pub use models::{
    CanonicalGame, MatchSummary, MatchedGame, Orientation, PayloadValue, ScorePair,
    SourceGameRecord, SourceMatchCount, SpreadPair, TeamPair,
};
pub use source_loader::{
    load_games_file, resolve_preferred, save_summary, GamesFile, LoadedSource, SourceOrigin,
    SourcePaths,
};

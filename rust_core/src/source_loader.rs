//! Prediction and schedule file loading.
//!
//! Every league directory holds raw scraped files and, optionally, an
//! LLM-normalized copy of each with cleaner team names. Loading never fails
//! to the caller: unreadable files resolve to an empty source and the
//! problem is logged.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::{debug, error, info, warn};

use crate::league_config::LeagueConfig;
use crate::models::{MatchSummary, SourceGameRecord};

pub const SCHEDULE_NAME: &str = "sheets";
const SCRAPED_DIR: &str = "games_scraped";

/// A parsed `{"games": [...]}` file.
#[derive(Debug, Clone, PartialEq)]
pub struct GamesFile {
    pub path: PathBuf,
    pub games: Vec<Value>,
}

/// Which file a source was resolved from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceOrigin {
    Normalized,
    Scraped,
    Missing,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LoadedSource {
    pub origin: SourceOrigin,
    pub path: Option<PathBuf>,
    games: Vec<Value>,
}

impl LoadedSource {
    pub fn missing() -> Self {
        Self {
            origin: SourceOrigin::Missing,
            path: None,
            games: Vec::new(),
        }
    }

    fn from_file(origin: SourceOrigin, file: GamesFile) -> Self {
        Self {
            origin,
            path: Some(file.path),
            games: file.games,
        }
    }

    pub fn len(&self) -> usize {
        self.games.len()
    }

    pub fn is_empty(&self) -> bool {
        self.games.is_empty()
    }

    /// Typed prediction records; malformed entries are dropped.
    pub fn candidates(&self) -> Vec<SourceGameRecord> {
        self.games
            .iter()
            .enumerate()
            .filter_map(|(i, entry)| match SourceGameRecord::from_value(entry) {
                Ok(record) => Some(record),
                Err(e) => {
                    debug!("Dropping entry {} from {:?}: {}", i, self.path, e);
                    None
                }
            })
            .collect()
    }

    /// Raw schedule rows, validated later by the aggregator.
    pub fn schedule_entries(&self) -> &[Value] {
        &self.games
    }
}

/// Read a games file. `None` when the file is absent or unusable.
pub fn load_games_file(path: &Path) -> Option<GamesFile> {
    if !path.exists() {
        warn!("Games file not found: {}", path.display());
        return None;
    }

    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            error!("Failed to read {}: {}", path.display(), e);
            return None;
        }
    };

    let data: Value = match serde_json::from_str(&content) {
        Ok(data) => data,
        Err(e) => {
            error!("Invalid JSON in {}: {}", path.display(), e);
            return None;
        }
    };

    let Value::Object(mut obj) = data else {
        error!("Top level of {} is not an object", path.display());
        return None;
    };

    let games = match obj.remove("games") {
        Some(Value::Array(games)) => games,
        Some(_) => {
            warn!("`games` in {} is not a list", path.display());
            Vec::new()
        }
        None => {
            warn!("No `games` key in {}", path.display());
            Vec::new()
        }
    };

    Some(GamesFile {
        path: path.to_path_buf(),
        games,
    })
}

/// Prefer the normalized file when it has at least one game, then the
/// scraped file, then nothing.
pub fn resolve_preferred(preferred: &Path, fallback: &Path) -> LoadedSource {
    if let Some(file) = load_games_file(preferred).filter(|f| !f.games.is_empty()) {
        info!("Using normalized data from {} ({} games)", file.path.display(), file.games.len());
        return LoadedSource::from_file(SourceOrigin::Normalized, file);
    }

    match load_games_file(fallback) {
        Some(file) => {
            info!("Using scraped data from {} ({} games)", file.path.display(), file.games.len());
            LoadedSource::from_file(SourceOrigin::Scraped, file)
        }
        None => {
            warn!(
                "No data at {} or {}; treating source as empty",
                preferred.display(),
                fallback.display()
            );
            LoadedSource::missing()
        }
    }
}

/// File locations for one league under the data directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourcePaths {
    league_dir: PathBuf,
    llm_dir: String,
}

impl SourcePaths {
    pub fn new(data_dir: impl AsRef<Path>, config: &LeagueConfig) -> Self {
        Self {
            league_dir: data_dir.as_ref().join(config.league_code),
            llm_dir: config.llm_dir.to_string(),
        }
    }

    pub fn league_dir(&self) -> &Path {
        &self.league_dir
    }

    pub fn scraped(&self, name: &str) -> PathBuf {
        self.league_dir
            .join(SCRAPED_DIR)
            .join(format!("{}_games.json", name))
    }

    pub fn normalized(&self, name: &str) -> PathBuf {
        self.league_dir
            .join(&self.llm_dir)
            .join(format!("{}_games_llm.json", name))
    }

    /// Resolve `name` (a source or `sheets`) to its preferred file.
    pub fn resolve(&self, name: &str) -> LoadedSource {
        resolve_preferred(&self.normalized(name), &self.scraped(name))
    }

    pub fn output(&self, file_name: &str) -> PathBuf {
        self.league_dir.join(file_name)
    }
}

/// Write a run's summary as pretty JSON, creating the parent directory.
pub fn save_summary(path: &Path, summary: &MatchSummary) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let content = serde_json::to_string_pretty(summary)?;
    fs::write(path, content)
}

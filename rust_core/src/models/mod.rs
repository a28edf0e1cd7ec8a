// Shared models for schedule rows, scraped predictions and match output
use chrono::{DateTime, NaiveDateTime};
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use tracing::debug;

use crate::error::RecordError;

/// Key of the schedule block inside a serialized matched game.
pub const SHEETS_KEY: &str = "sheets";

// ============================================================================
// Schedule (canonical games)
// ============================================================================

/// Away/home pair as written to the `sheets` block of a matched game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamPair {
    pub away_team: String,
    pub home_team: String,
}

impl TeamPair {
    pub fn new(away_team: impl Into<String>, home_team: impl Into<String>) -> Self {
        Self {
            away_team: away_team.into(),
            home_team: home_team.into(),
        }
    }
}

/// One row of the authoritative schedule. `row_number` is the stable key
/// every downstream consumer uses, already coerced to its string form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonicalGame {
    pub away_team: String,
    pub home_team: String,
    pub row_number: String,
}

impl CanonicalGame {
    /// Build from a raw schedule entry.
    ///
    /// `row_number` may be a JSON number or a string; `5` becomes `"5"`.
    pub fn from_value(value: &Value) -> Result<Self, RecordError> {
        let obj = value.as_object().ok_or(RecordError::NotAnObject)?;

        let away_team = required_str(obj, "away_team")?;
        let home_team = required_str(obj, "home_team")?;
        let row_number = match required(obj, "row_number")? {
            Value::Number(n) => n.to_string(),
            Value::String(s) => s.clone(),
            _ => {
                return Err(RecordError::WrongType {
                    field: "row_number",
                    expected: "an integer or string",
                })
            }
        };

        Ok(Self {
            away_team,
            home_team,
            row_number,
        })
    }
}

// ============================================================================
// Source records (scraped predictions)
// ============================================================================

/// Which way round a source lists a game relative to the schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Natural,
    Swapped,
}

/// One payload number exactly as the source wrote it (a JSON number or a
/// numeric string). The parsed value rides along for comparisons; output
/// always carries the raw form.
#[derive(Debug, Clone, PartialEq)]
pub struct PayloadValue {
    raw: Value,
    value: f64,
}

impl PayloadValue {
    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn raw(&self) -> &Value {
        &self.raw
    }
}

impl From<f64> for PayloadValue {
    fn from(value: f64) -> Self {
        Self {
            raw: Value::from(value),
            value,
        }
    }
}

impl PartialEq<f64> for PayloadValue {
    fn eq(&self, other: &f64) -> bool {
        self.value == *other
    }
}

impl Serialize for PayloadValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.raw.serialize(serializer)
    }
}

/// Predicted final score per side.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScorePair {
    pub predicted_score_away: PayloadValue,
    pub predicted_score_home: PayloadValue,
}

impl ScorePair {
    pub fn swapped(self) -> Self {
        Self {
            predicted_score_away: self.predicted_score_home,
            predicted_score_home: self.predicted_score_away,
        }
    }
}

/// Win-probability percentage per side (not a point handicap).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpreadPair {
    pub spread_away: PayloadValue,
    pub spread_home: PayloadValue,
}

impl SpreadPair {
    pub fn swapped(self) -> Self {
        Self {
            spread_away: self.spread_home,
            spread_home: self.spread_away,
        }
    }
}

const RECORD_FIELDS: &[&str] = &[
    "away_team",
    "home_team",
    "predicted_score_away",
    "predicted_score_home",
    "spread_away",
    "spread_home",
];

/// A game as one prediction source published it.
///
/// Serializes flat: team names, whichever payload pairs are present,
/// `scraped_at`, then any extra keys the source carried (e.g. `game_id`).
/// Payload values and `scraped_at` are written back exactly as read.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SourceGameRecord {
    pub away_team: String,
    pub home_team: String,
    #[serde(flatten)]
    pub score: Option<ScorePair>,
    #[serde(flatten)]
    pub spread: Option<SpreadPair>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scraped_at: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl SourceGameRecord {
    pub fn with_score(
        away_team: impl Into<String>,
        home_team: impl Into<String>,
        predicted_score_away: f64,
        predicted_score_home: f64,
    ) -> Self {
        Self {
            away_team: away_team.into(),
            home_team: home_team.into(),
            score: Some(ScorePair {
                predicted_score_away: predicted_score_away.into(),
                predicted_score_home: predicted_score_home.into(),
            }),
            spread: None,
            scraped_at: None,
            extra: Map::new(),
        }
    }

    pub fn with_spread(
        away_team: impl Into<String>,
        home_team: impl Into<String>,
        spread_away: f64,
        spread_home: f64,
    ) -> Self {
        Self {
            away_team: away_team.into(),
            home_team: home_team.into(),
            score: None,
            spread: Some(SpreadPair {
                spread_away: spread_away.into(),
                spread_home: spread_home.into(),
            }),
            scraped_at: None,
            extra: Map::new(),
        }
    }

    /// Build from a raw source entry. Both team names and at least one
    /// complete payload pair are required.
    ///
    /// A string `scraped_at` is kept verbatim even when it does not parse;
    /// any other `scraped_at` value stays with the extra keys.
    pub fn from_value(value: &Value) -> Result<Self, RecordError> {
        let obj = value.as_object().ok_or(RecordError::NotAnObject)?;

        let away_team = required_str(obj, "away_team")?;
        let home_team = required_str(obj, "home_team")?;

        let score = number_pair(obj, "predicted_score_away", "predicted_score_home")?.map(
            |(away, home)| ScorePair {
                predicted_score_away: away,
                predicted_score_home: home,
            },
        );
        let spread = number_pair(obj, "spread_away", "spread_home")?.map(|(away, home)| {
            SpreadPair {
                spread_away: away,
                spread_home: home,
            }
        });
        if score.is_none() && spread.is_none() {
            return Err(RecordError::MissingPayload);
        }

        let scraped_at = obj
            .get("scraped_at")
            .and_then(Value::as_str)
            .map(str::to_string);
        if let Some(raw) = &scraped_at {
            if parse_timestamp(raw).is_none() {
                debug!("Keeping unparseable scraped_at {:?} as written", raw);
            }
        }

        let extra = obj
            .iter()
            .filter(|(key, _)| !RECORD_FIELDS.contains(&key.as_str()))
            .filter(|(key, _)| !(key.as_str() == "scraped_at" && scraped_at.is_some()))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();

        Ok(Self {
            away_team,
            home_team,
            score,
            spread,
            scraped_at,
            extra,
        })
    }

    /// `scraped_at` as a naive UTC timestamp, when it parses.
    pub fn scraped_at_utc(&self) -> Option<NaiveDateTime> {
        self.scraped_at.as_deref().and_then(parse_timestamp)
    }

    /// Copy of this record read from the schedule's point of view: when
    /// swapped, team names and every payload pair trade sides.
    pub fn oriented(&self, orientation: Orientation) -> Self {
        match orientation {
            Orientation::Natural => self.clone(),
            Orientation::Swapped => Self {
                away_team: self.home_team.clone(),
                home_team: self.away_team.clone(),
                score: self.score.clone().map(ScorePair::swapped),
                spread: self.spread.clone().map(SpreadPair::swapped),
                scraped_at: self.scraped_at.clone(),
                extra: self.extra.clone(),
            },
        }
    }

    /// Copy with replacement team names and the original payload.
    pub fn with_team_names(&self, away_team: String, home_team: String) -> Self {
        Self {
            away_team,
            home_team,
            ..self.clone()
        }
    }
}

// ============================================================================
// Match output
// ============================================================================

/// Everything matched for one schedule row. Serializes as
/// `{"sheets": {...}, "<source>": {...}, ...}`; unmatched sources are absent.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchedGame {
    pub sheets: TeamPair,
    #[serde(flatten)]
    pub per_source: BTreeMap<String, SourceGameRecord>,
}

impl MatchedGame {
    pub fn new(sheets: TeamPair) -> Self {
        Self {
            sheets,
            per_source: BTreeMap::new(),
        }
    }

    pub fn source(&self, source: &str) -> Option<&SourceGameRecord> {
        self.per_source.get(source)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceMatchCount {
    pub source: String,
    pub matched: usize,
}

/// Result of one matching run.
///
/// Serializes as `{"sheets_total": n, "<source>_matched": k, ...,
/// "matched_sheets_rows": {...}}` with sources in configured order.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchSummary {
    pub sheets_total: usize,
    pub matched: Vec<SourceMatchCount>,
    pub matched_sheets_rows: BTreeMap<String, MatchedGame>,
}

impl MatchSummary {
    pub fn matched_count(&self, source: &str) -> Option<usize> {
        self.matched
            .iter()
            .find(|count| count.source == source)
            .map(|count| count.matched)
    }

    pub fn row(&self, row_number: &str) -> Option<&MatchedGame> {
        self.matched_sheets_rows.get(row_number)
    }
}

impl Serialize for MatchSummary {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.matched.len() + 2))?;
        map.serialize_entry("sheets_total", &self.sheets_total)?;
        for count in &self.matched {
            map.serialize_entry(&format!("{}_matched", count.source), &count.matched)?;
        }
        map.serialize_entry("matched_sheets_rows", &self.matched_sheets_rows)?;
        map.end()
    }
}

// ============================================================================
// Field helpers
// ============================================================================

fn required<'a>(obj: &'a Map<String, Value>, field: &'static str) -> Result<&'a Value, RecordError> {
    match obj.get(field) {
        None | Some(Value::Null) => Err(RecordError::MissingField(field)),
        Some(value) => Ok(value),
    }
}

fn required_str(obj: &Map<String, Value>, field: &'static str) -> Result<String, RecordError> {
    required(obj, field)?
        .as_str()
        .map(str::to_string)
        .ok_or(RecordError::WrongType {
            field,
            expected: "a string",
        })
}

fn optional_number(
    obj: &Map<String, Value>,
    field: &'static str,
) -> Result<Option<PayloadValue>, RecordError> {
    let raw = match obj.get(field) {
        None | Some(Value::Null) => return Ok(None),
        Some(raw) => raw,
    };
    let value = match raw {
        Value::Number(n) => n.as_f64(),
        // Some scrapers emit numbers as text
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    value
        .map(|value| {
            Some(PayloadValue {
                raw: raw.clone(),
                value,
            })
        })
        .ok_or(RecordError::WrongType {
            field,
            expected: "a number",
        })
}

/// Both halves of a payload pair, or neither.
fn number_pair(
    obj: &Map<String, Value>,
    away_field: &'static str,
    home_field: &'static str,
) -> Result<Option<(PayloadValue, PayloadValue)>, RecordError> {
    match (optional_number(obj, away_field)?, optional_number(obj, home_field)?) {
        (Some(away), Some(home)) => Ok(Some((away, home))),
        (None, None) => Ok(None),
        (Some(_), None) => Err(RecordError::MissingField(home_field)),
        (None, Some(_)) => Err(RecordError::MissingField(away_field)),
    }
}

/// Naive ISO-8601 (what the scrapers write) or RFC 3339 with an offset,
/// the latter converted to UTC.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    raw.parse::<NaiveDateTime>()
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.naive_utc()))
}

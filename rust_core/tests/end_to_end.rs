//! Full runs: files on disk through aggregation to serialized output.

use gridiron_match_core::league_config::get_league_config;
use gridiron_match_core::source_loader::SCHEDULE_NAME;
use gridiron_match_core::{
    resolve_preferred, save_summary, GameAggregator, SourceCandidates, SourceGameRecord,
    SourceOrigin, SourcePaths, TeamPair,
};
use serde_json::{json, Value};
use std::fs;
use std::path::{Path, PathBuf};

fn temp_dir(tag: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("gridiron_e2e_{}_{}", tag, std::process::id()));
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(&dir).unwrap();
    dir
}

fn write_games(path: &Path, games: Value) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, json!({ "games": games }).to_string()).unwrap();
}

fn nfl() -> GameAggregator {
    GameAggregator::for_league(get_league_config("nfl").unwrap(), None).unwrap()
}

#[test]
fn test_chargers_at_chiefs() {
    let schedule = vec![json!({
        "away_team": "Los Angeles Chargers", "home_team": "Kansas City Chiefs", "row_number": 5
    })];
    let mut sources = SourceCandidates::new();
    sources.insert(
        "espn".to_string(),
        vec![SourceGameRecord::with_score("LA Chargers", "KC Chiefs", 20.0, 27.0)],
    );

    let summary = nfl().match_games(&schedule, &sources);
    assert_eq!(summary.sheets_total, 1);
    assert_eq!(summary.matched_count("espn"), Some(1));

    let row = summary.row("5").unwrap();
    assert_eq!(row.sheets, TeamPair::new("chargers", "chiefs"));
    let espn = row.source("espn").unwrap();
    assert_eq!((espn.away_team.as_str(), espn.home_team.as_str()), ("chargers", "chiefs"));
    assert_eq!(espn.score.as_ref().unwrap().predicted_score_home, 27.0);
}

#[test]
fn test_exact_after_normalization_keeps_payload() {
    let schedule = vec![json!({"away_team": "Chargers", "home_team": "Chiefs", "row_number": 5})];
    let candidate = json!({
        "away_team": "chargers", "home_team": "Chiefs",
        "predicted_score_away": 21, "predicted_score_home": 27
    });
    let mut sources = SourceCandidates::new();
    sources.insert(
        "x".to_string(),
        vec![SourceGameRecord::from_value(&candidate).unwrap()],
    );
    let aggregator = GameAggregator::new(
        get_league_config("nfl").unwrap().build_policy(None).unwrap(),
        vec!["x".to_string()],
    )
    .unwrap();

    let summary = aggregator.match_games(&schedule, &sources);
    let written = serde_json::to_value(&summary).unwrap();
    assert_eq!(written["x_matched"], 1);
    assert_eq!(
        written["matched_sheets_rows"]["5"]["x"],
        json!({"away_team": "chargers", "home_team": "chiefs",
               "predicted_score_away": 21, "predicted_score_home": 27})
    );
}

#[test]
fn test_missing_source_matches_nothing() {
    let teams = [
        ("Bills", "Ravens"),
        ("Chiefs", "Jets"),
        ("Bears", "Lions"),
        ("Packers", "Vikings"),
        ("Falcons", "Saints"),
        ("Rams", "49ers"),
        ("Cowboys", "Giants"),
        ("Eagles", "Commanders"),
        ("Browns", "Steelers"),
        ("Texans", "Colts"),
    ];
    let schedule: Vec<Value> = teams
        .iter()
        .enumerate()
        .map(|(i, (away, home))| json!({"away_team": away, "home_team": home, "row_number": i + 1}))
        .collect();
    let mut sources = SourceCandidates::new();
    sources.insert(
        "espn".to_string(),
        vec![SourceGameRecord::with_score("Bills", "Ravens", 20.0, 24.0)],
    );

    let summary = nfl().match_games(&schedule, &sources);
    assert_eq!(summary.sheets_total, 10);
    assert_eq!(summary.matched_count("oddshark"), Some(0));
    assert_eq!(summary.matched_count("espn"), Some(1));
    assert_eq!(summary.matched_sheets_rows.len(), 10);
    assert!(summary
        .matched_sheets_rows
        .values()
        .all(|game| game.source("oddshark").is_none()));
}

#[test]
fn test_claimed_candidate_not_reused() {
    // the second row is a near-miss for the same record
    let schedule = vec![
        json!({"away_team": "Bills", "home_team": "Ravens", "row_number": 1}),
        json!({"away_team": "Bill", "home_team": "Ravens", "row_number": 2}),
    ];
    let mut sources = SourceCandidates::new();
    sources.insert(
        "dimers".to_string(),
        vec![SourceGameRecord::with_spread("Buffalo Bills", "Baltimore Ravens", 48.0, 52.0)],
    );

    let summary = nfl().match_games(&schedule, &sources);
    assert!(summary.row("1").unwrap().source("dimers").is_some());
    assert!(summary.row("2").unwrap().source("dimers").is_none());
    assert_eq!(summary.matched_count("dimers"), Some(1));
}

#[test]
fn test_loader_preference_order() {
    let dir = temp_dir("preference");
    let normalized = dir.join("llm.json");
    let scraped = dir.join("raw.json");

    assert_eq!(resolve_preferred(&normalized, &scraped).origin, SourceOrigin::Missing);

    write_games(&scraped, json!([{"away_team": "Bills", "home_team": "Ravens", "spread_away": 40, "spread_home": 60}]));
    assert_eq!(resolve_preferred(&normalized, &scraped).origin, SourceOrigin::Scraped);

    // an empty normalized file does not shadow the scraped one
    write_games(&normalized, json!([]));
    assert_eq!(resolve_preferred(&normalized, &scraped).origin, SourceOrigin::Scraped);

    fs::write(&normalized, "{ broken").unwrap();
    assert_eq!(resolve_preferred(&normalized, &scraped).origin, SourceOrigin::Scraped);

    write_games(&normalized, json!([{"away_team": "Bills", "home_team": "Ravens", "spread_away": 41, "spread_home": 59}]));
    let source = resolve_preferred(&normalized, &scraped);
    assert_eq!(source.origin, SourceOrigin::Normalized);
    assert_eq!(source.candidates()[0].spread.as_ref().unwrap().spread_away, 41.0);
}

#[test]
fn test_league_directory_run_and_output_shape() {
    let dir = temp_dir("shape");
    let paths = SourcePaths::new(&dir, get_league_config("nfl").unwrap());
    write_games(
        &paths.scraped(SCHEDULE_NAME),
        json!([
            {"away_team": "Baltimore Ravens", "home_team": "Buffalo Bills", "row_number": "7"},
            {"home_team": "Jets"}
        ]),
    );
    write_games(
        &paths.normalized("sportsline"),
        json!([{"away_team": "Bills", "home_team": "Ravens",
                "predicted_score_away": 24, "predicted_score_home": "20",
                "game_id": "BUF-BAL", "scraped_at": "2025-10-14T09:00:00+02:00"}]),
    );

    let aggregator = nfl();
    let schedule = paths.resolve(SCHEDULE_NAME);
    let mut sources = SourceCandidates::new();
    for name in aggregator.source_names() {
        sources.insert(name.clone(), paths.resolve(name).candidates());
    }
    let summary = aggregator.match_games(schedule.schedule_entries(), &sources);

    let output = paths.output("matched_games.json");
    save_summary(&output, &summary).unwrap();
    let text = fs::read_to_string(&output).unwrap();

    // counts follow configured source order, rows come last
    let position = |key: &str| text.find(key).unwrap();
    assert!(position("\"sheets_total\"") < position("\"fantasynerds_matched\""));
    assert!(position("\"fantasynerds_matched\"") < position("\"sportsline_matched\""));
    assert!(position("\"dratings_matched\"") < position("\"matched_sheets_rows\""));

    let written: Value = serde_json::from_str(&text).unwrap();
    assert_eq!(written["sheets_total"], 2);
    assert_eq!(written["sportsline_matched"], 1);
    let row = &written["matched_sheets_rows"]["7"];
    assert_eq!(row["sheets"], json!({"away_team": "ravens", "home_team": "bills"}));
    assert_eq!(row["sportsline"]["away_team"], "ravens");
    // swapped, and written exactly as the source had them
    assert_eq!(row["sportsline"]["predicted_score_away"], json!("20"));
    assert_eq!(row["sportsline"]["predicted_score_home"], json!(24));
    assert_eq!(row["sportsline"]["game_id"], "BUF-BAL");
    assert_eq!(row["sportsline"]["scraped_at"], "2025-10-14T09:00:00+02:00");
    assert!(row.get("espn").is_none());
}

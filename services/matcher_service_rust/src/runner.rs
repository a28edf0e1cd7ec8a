//! One matching run for one league: load, match, write.

use anyhow::{bail, Context, Result};
use futures_util::future::join_all;
use gridiron_match_core::league_config::require_league_config;
use gridiron_match_core::source_loader::SCHEDULE_NAME;
use gridiron_match_core::{
    save_summary, GameAggregator, MatchSummary, SourceCandidates, SourceOrigin, SourcePaths,
};
use std::path::PathBuf;
use tracing::info;

use crate::config::MatcherConfig;

#[derive(Debug)]
pub struct LeagueRun {
    pub league: String,
    pub output_path: PathBuf,
    pub summary: MatchSummary,
}

pub async fn run_league(config: &MatcherConfig, league: &str) -> Result<LeagueRun> {
    let preset = require_league_config(league)?;
    let aggregator =
        GameAggregator::for_league(preset, config.threshold_for(preset.league_code))
            .with_context(|| format!("Invalid matcher configuration for {}", league))?;
    let paths = SourcePaths::new(&config.data_dir, preset);

    info!(
        "Matching {} ({} policy, threshold {})",
        preset.league_code,
        aggregator.policy().policy_name(),
        aggregator.policy().fuzzy_threshold()
    );

    let schedule_paths = paths.clone();
    let schedule = tokio::task::spawn_blocking(move || schedule_paths.resolve(SCHEDULE_NAME))
        .await
        .context("Schedule loader task failed")?;
    if schedule.origin == SourceOrigin::Missing {
        bail!(
            "No schedule file for {} under {}",
            league,
            paths.league_dir().display()
        );
    }

    let sources = load_sources(&paths, aggregator.source_names()).await?;
    let summary = aggregator.match_games(schedule.schedule_entries(), &sources);

    let output_path = paths.output(&config.output_file);
    save_summary(&output_path, &summary)
        .with_context(|| format!("Failed to write {}", output_path.display()))?;
    info!(
        "Saved {} matched rows to {}",
        summary.matched_sheets_rows.len(),
        output_path.display()
    );

    Ok(LeagueRun {
        league: preset.league_code.to_string(),
        output_path,
        summary,
    })
}

/// Resolve every source concurrently; each gets its own blocking task.
async fn load_sources(paths: &SourcePaths, names: &[String]) -> Result<SourceCandidates> {
    let source_tasks: Vec<_> = names
        .iter()
        .cloned()
        .map(|name| {
            let paths = paths.clone();
            tokio::task::spawn_blocking(move || {
                let candidates = paths.resolve(&name).candidates();
                (name, candidates)
            })
        })
        .collect();

    let source_results = join_all(source_tasks).await;

    let mut sources = SourceCandidates::new();
    for result in source_results {
        let (name, candidates) = result.context("Source loader task failed")?;
        sources.insert(name, candidates);
    }
    Ok(sources)
}

/// Human-readable block printed after each league.
pub fn format_summary(run: &LeagueRun) -> String {
    let mut lines = vec![
        format!("=== {} MATCHING SUMMARY ===", run.league.to_uppercase()),
        format!("Total games in sheets: {}", run.summary.sheets_total),
    ];
    for count in &run.summary.matched {
        lines.push(format!("{} matched: {}", count.source, count.matched));
    }
    lines.push(format!("Saved to: {}", run.output_path.display()));
    lines.join("\n")
}

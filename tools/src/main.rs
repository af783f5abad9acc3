//! race-finance-runner: headless scrape-and-reconcile run.
//!
//! Usage:
//!   race-finance-runner
//!   race-finance-runner --data-repo ../election-data --delay-ms 2000
//!   race-finance-runner --snapshots ./rendered --dry-run --events
//!
//! Flags:
//!   --data-repo <dir>     data repository (default $DATA_REPO_PATH or ../election-data)
//!   --races <file>        JSON race catalog (default: built-in Georgia 2026 races)
//!   --snapshots <dir>     read pre-rendered <race key>.html files instead of HTTP
//!   --delay-ms <ms>       pause after each race (default 2000)
//!   --timeout-ms <ms>     HTTP timeout (default 30000)
//!   --user-agent <ua>     HTTP user agent
//!   --dry-run             print the outputs instead of writing them
//!   --events              print the run's event log as JSON lines

use anyhow::{Context, Result};
use race_finance_core::{
    config::RunConfig,
    engine::{RunReport, ScrapeEngine},
    event::RunEvent,
    report::ReportWriter,
    roster,
};
use std::io::{self, Write};

const RULE: &str = "============================================================";

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if std::env::args().any(|a| a == "-h" || a == "--help") {
        println!("{}", usage());
        return Ok(());
    }

    let config = RunConfig::from_env().context("invalid arguments")?;
    log::debug!("{config:?}");
    let catalog = config.catalog().context("cannot load race catalog")?;

    println!("{RULE}");
    println!("Campaign finance race scraper");
    println!("{RULE}");
    println!("  data repo: {}", config.data_repo.display());
    println!("  races:     {}", catalog.len());
    println!("  dry run:   {}", config.dry_run);
    println!();

    let known = roster::load_known_ids(&config.roster_path())
        .with_context(|| format!("cannot load roster {}", config.roster_path().display()))?;
    if known.is_empty() {
        println!("No existing candidates loaded; every candidate will be reported as new");
    } else {
        println!("Loaded {} existing candidates", known.len());
    }

    let mut source = config.page_source()?;
    let engine = ScrapeEngine::new(catalog, known, config.clock())?;
    let report = engine.run(source.as_mut())?;

    println!();
    print_progress(&report);

    if config.dump_events {
        let mut stdout = io::stdout().lock();
        for event in &report.events {
            writeln!(stdout, "{}", serde_json::to_string(event)?)?;
        }
    }

    if config.dry_run {
        println!("{}", serde_json::to_string_pretty(&report.financials_file())?);
        println!("{}", serde_json::to_string_pretty(&report.pending_file())?);
    } else {
        let written = ReportWriter::new(&config.data_repo)
            .write(&report)
            .context("cannot write run outputs")?;
        println!();
        println!("Saved financial data for {} candidates", report.financials.len());
        println!("  {}", written.financials.display());
        println!("  {}", written.pending.display());
    }

    print_summary(&report);
    Ok(())
}

/// One line per race: rows found, how many were new, and any problems.
fn print_progress(report: &RunReport) {
    let mut new_in_race = 0usize;
    for event in &report.events {
        match event {
            RunEvent::RaceStarted { display_name, .. } => {
                new_in_race = 0;
                print!("  {display_name:<28}");
            }
            RunEvent::NewCandidateDetected { .. } => new_in_race += 1,
            RunEvent::TableMissing { status, .. } => print!(" [{status}]"),
            RunEvent::RowSkipped { skipped, .. } => print!(" [{skipped} malformed row(s) skipped]"),
            RunEvent::RaceCompleted { rows, rows_seen, .. } => {
                println!(" {rows:>3} candidates (of {rows_seen} rows), {new_in_race:>3} new");
            }
            RunEvent::CandidateIdCollision { candidate_id, previous_race, race } => {
                print!(" [{candidate_id}: {previous_race} replaced by {race}]");
            }
            RunEvent::RunStarted { .. }
            | RunEvent::RunCompleted { .. }
            | RunEvent::CandidateRecorded { .. } => {}
        }
    }
}

fn print_summary(report: &RunReport) {
    println!();
    if report.pending.is_empty() {
        println!("All candidates already in repo");
    } else {
        println!("Found {} new candidates!", report.pending.len());
        for candidate in &report.pending {
            println!("   - {} ({})", candidate.name, candidate.race);
        }
    }

    let collisions = report.collisions().count();
    if collisions > 0 {
        println!("{collisions} candidate id collision(s); later races overwrote earlier entries");
    }

    println!();
    println!("{RULE}");
    println!("Scraping complete ({})", report.timestamp);
    println!("{RULE}");
}

fn usage() -> &'static str {
    "Usage: race-finance-runner [--data-repo <dir>] [--races <file>] [--snapshots <dir>]\n\
     \x20                          [--delay-ms <ms>] [--timeout-ms <ms>] [--user-agent <ua>]\n\
     \x20                          [--dry-run] [--events]"
}

//! Integration tests for run outputs on disk.
//!
//! 1. Both output files are written with the expected JSON shape
//! 2. Outputs are replaced wholesale on the next run
//! 3. A missing roster fails open; a present roster is honoured
//! 4. Snapshot pages feed a full run from a data repository
//! 5. A failed write leaves the previous outputs untouched

use chrono::{Local, TimeZone};
use race_finance_core::{
    catalog::{Race, RaceCatalog},
    clock::RunClock,
    engine::{RunReport, ScrapeEngine},
    event::RunEvent,
    fetch::{PageSource, SnapshotPageSource, StaticPageSource},
    report::ReportWriter,
    roster::{self, KnownCandidateSet},
};
use serde_json::Value;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const GOVERNOR_PAGE: &str = r#"<html><body>
<table role="table">
  <thead><tr role="row"><th>Candidate</th><th>Party</th><th>Contributions</th>
    <th>Loans</th><th>Expenditures</th><th>Status</th></tr></thead>
  <tbody>
    <tr role="row">
      <td><a href="/ga/candidate/keisha">Keisha Waites Democratic</a></td>
      <td>Democratic</td><td>$120,500.00</td><td>$0.00</td><td>$98,210.15</td><td>Active</td>
    </tr>
    <tr role="row">
      <td><a href="/ga/candidate/burt">Burt Jones Republican</a></td>
      <td>Republican</td><td>$2,400,000.00</td><td>$10,000,000.00</td><td>$1,100,000.00</td><td>Active</td>
    </tr>
    <tr role="row"><td>Loading</td></tr>
  </tbody>
</table>
</body></html>"#;

fn catalog() -> RaceCatalog {
    RaceCatalog::new(vec![Race::new(
        "governor",
        "Governor",
        "https://example.test/governor",
        "ga_governor",
    )])
    .unwrap()
}

fn clock() -> RunClock {
    RunClock::fixed(Local.with_ymd_and_hms(2026, 10, 19, 9, 0, 0).unwrap())
}

fn run_with(source: &mut dyn PageSource, known: KnownCandidateSet) -> RunReport {
    ScrapeEngine::new(catalog(), known, clock())
        .unwrap()
        .run(source)
        .unwrap()
}

fn read_json(path: &Path) -> Value {
    serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
}

#[test]
fn writes_both_outputs_with_expected_shape() {
    let repo = TempDir::new().unwrap();
    let mut source = StaticPageSource::new().with_page("governor", GOVERNOR_PAGE);
    let report = run_with(&mut source, KnownCandidateSet::empty());

    let written = ReportWriter::new(repo.path()).write(&report).unwrap();
    assert_eq!(written.financials, repo.path().join("financials/state-financials.json"));
    assert_eq!(written.pending, repo.path().join("candidates/pending-candidates.json"));

    let financials = read_json(&written.financials);
    assert_eq!(financials["lastUpdated"], report.timestamp.as_str());
    let candidates = financials["candidates"].as_object().unwrap();
    assert_eq!(candidates.len(), 2);
    assert_eq!(
        financials["candidates"]["keisha_waites"],
        serde_json::json!({
            "name": "Keisha Waites",
            "race": "ga_governor",
            "party": "Democratic",
            "contributions": "$120,500.00",
            "loans": "$0.00",
            "expenditures": "$98,210.15",
            "status": "Active"
        })
    );

    let pending = read_json(&written.pending);
    assert_eq!(pending["lastChecked"], report.timestamp.as_str());
    let list = pending["pendingCandidates"].as_array().unwrap();
    assert_eq!(list.len(), 2);
    assert_eq!(list[1]["suggestedId"], "burt_jones");
    assert_eq!(list[1]["name"], "Burt Jones");
    assert_eq!(list[1]["race"], "ga_governor");
    assert_eq!(list[1]["contributions"], "$2,400,000.00");
    assert_eq!(list[1]["detectedOn"], report.timestamp.as_str());

    // Pretty-printed with two-space indentation.
    let raw = fs::read_to_string(&written.financials).unwrap();
    assert!(raw.starts_with("{\n  \"lastUpdated\""));
}

#[test]
fn outputs_are_replaced_not_merged() {
    let repo = TempDir::new().unwrap();
    let writer = ReportWriter::new(repo.path());

    let mut first = StaticPageSource::new().with_page("governor", GOVERNOR_PAGE);
    writer.write(&run_with(&mut first, KnownCandidateSet::empty())).unwrap();

    let known: KnownCandidateSet = ["keisha_waites", "burt_jones"].into_iter().collect();
    let empty_page = r#"<table role="table"><tbody></tbody></table>"#;
    let mut second = StaticPageSource::new().with_page("governor", empty_page);
    writer.write(&run_with(&mut second, known)).unwrap();

    let financials = read_json(&writer.financials_path());
    assert!(financials["candidates"].as_object().unwrap().is_empty());
    let pending = read_json(&writer.pending_path());
    assert!(pending["pendingCandidates"].as_array().unwrap().is_empty());
}

#[test]
fn roster_in_data_repo_filters_pending() {
    let repo = TempDir::new().unwrap();

    // No roster yet: everything is new.
    let known = roster::load_known_ids(&roster::roster_path(repo.path())).unwrap();
    let mut source = StaticPageSource::new().with_page("governor", GOVERNOR_PAGE);
    assert_eq!(run_with(&mut source, known).pending.len(), 2);

    fs::create_dir_all(repo.path().join("candidates")).unwrap();
    fs::write(
        roster::roster_path(repo.path()),
        r#"[{"id": "burt_jones", "name": "Burt Jones"}]"#,
    )
    .unwrap();

    let known = roster::load_known_ids(&roster::roster_path(repo.path())).unwrap();
    let mut source = StaticPageSource::new().with_page("governor", GOVERNOR_PAGE);
    let report = run_with(&mut source, known);
    assert_eq!(report.pending.len(), 1);
    assert_eq!(report.pending[0].suggested_id, "keisha_waites");
}

#[test]
fn snapshot_pages_drive_a_full_run() {
    let pages = TempDir::new().unwrap();
    fs::write(pages.path().join("governor.html"), GOVERNOR_PAGE).unwrap();

    let mut source = SnapshotPageSource::new(pages.path());
    let report = run_with(&mut source, KnownCandidateSet::empty());

    assert_eq!(report.rows_for_race("governor"), Some(2));
    assert!(report.events.contains(&RunEvent::RaceCompleted {
        race_key:  "governor".into(),
        rows:      2,
        rows_seen: 3,
    }));
    let ids: Vec<_> = report.financials.ids().map(String::as_str).collect();
    assert_eq!(ids, vec!["keisha_waites", "burt_jones"]);
}

#[test]
fn failed_write_leaves_previous_outputs_untouched() {
    let repo = TempDir::new().unwrap();
    let writer = ReportWriter::new(repo.path());
    fs::create_dir_all(repo.path().join("financials")).unwrap();
    fs::write(writer.financials_path(), "old").unwrap();
    // A plain file where the pending directory belongs.
    fs::write(repo.path().join("candidates"), "").unwrap();

    let mut source = StaticPageSource::new().with_page("governor", GOVERNOR_PAGE);
    let report = run_with(&mut source, KnownCandidateSet::empty());
    assert!(writer.write(&report).is_err());

    assert_eq!(fs::read_to_string(writer.financials_path()).unwrap(), "old");
    let leftovers: Vec<_> = fs::read_dir(repo.path().join("financials"))
        .unwrap()
        .map(|e| e.unwrap().file_name())
        .collect();
    assert_eq!(leftovers, vec!["state-financials.json"]);
}

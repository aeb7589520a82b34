use std::fs;
use std::path::PathBuf;

use mise_terminal::analysis::analyze;
use mise_terminal::import::parse_records_json;
use mise_terminal::record::{MIN_COTE, normalize_records};
use mise_terminal::score::ScoreVariant;

fn read_fixture(name: &str) -> String {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(name);
    fs::read_to_string(path).expect("fixture file should be readable")
}

#[test]
fn parses_records_fixture() {
    let raw = read_fixture("records.json");
    let records = parse_records_json(&raw).expect("fixture should parse");
    assert_eq!(records.len(), 4);
    assert_eq!(records[0].home_team, "Paris SG");
    assert!(!records[0].has_recent_form());
    assert!(records[2].has_recent_form());
    assert_eq!(records[2].away_last5.unwrap().wins, 4);
}

#[test]
fn normalization_repairs_fixture_odds() {
    let raw = read_fixture("records.json");
    let records = parse_records_json(&raw).expect("fixture should parse");
    let (normalized, warnings) = normalize_records(&records);

    // The Nice row carries odds below the bookmaker floor.
    assert_eq!(warnings.len(), 1);
    assert!(warnings[0].contains("Row 4"));
    assert_eq!(normalized[3].cote_home, MIN_COTE);
    // Everything else is untouched.
    assert_eq!(normalized[0].cote_home, 1.50);
}

#[test]
fn fixture_analyses_end_to_end() {
    let raw = read_fixture("records.json");
    let records = parse_records_json(&raw).expect("fixture should parse");
    let (normalized, _) = normalize_records(&records);
    let scored = analyze(&normalized);

    assert_eq!(scored.len(), 4);
    // Output order follows input order.
    assert_eq!(scored[0].home_team, "Paris SG");
    assert_eq!(scored[2].home_team, "Lille");

    // Strong favourite clamps to the ceiling.
    assert_eq!(scored[0].score_securite, 100.0);
    assert_eq!(scored[0].winner, "Paris SG");

    // The all-zero Lyon/Monaco row is the exact tie: away by convention.
    assert_eq!(scored[1].score_securite, 50.0);
    assert_eq!(scored[1].winner, "Monaco");

    // Only the row with both last-5 blocks uses the recent-form formula.
    assert_eq!(scored[0].variant, ScoreVariant::Basic);
    assert_eq!(scored[2].variant, ScoreVariant::RecentForm);
}

#[test]
fn null_records_file_is_empty() {
    let records = parse_records_json("null").expect("null should parse");
    assert!(records.is_empty());
}

use std::path::PathBuf;

use mise_terminal::analysis;
use mise_terminal::import;
use mise_terminal::record::normalize_records;
use mise_terminal::score::variant_label;

// Headless pipeline run: load a records file, print the analysis table.
// Meant for quick checks of a record set without the TUI.
fn main() -> anyhow::Result<()> {
    let path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("tests/fixtures/records.json"));
    let budget = std::env::args()
        .nth(2)
        .or_else(|| std::env::var("STAKE_BUDGET").ok())
        .and_then(|val| val.parse::<f64>().ok())
        .filter(|b| b.is_finite() && *b > 0.0)
        .unwrap_or(100.0);

    let records = import::load_records_json(&path)?;
    let (normalized, warnings) = normalize_records(&records);
    for warning in &warnings {
        eprintln!("{warning}");
    }

    let scored = analysis::analyze(&normalized);
    if scored.is_empty() {
        println!("No matches in {}", path.display());
        return Ok(());
    }
    let stakes = analysis::allocate_stakes(&scored, budget);

    println!("Budget: {budget:.2}");
    println!(
        "{:<32}{:>8}{:>8}{:>10}  {:<16}{:>10}",
        "MATCH", "VAR", "SCORE", "P(HOME)", "WINNER", "STAKE"
    );
    for (m, advice) in scored.iter().zip(&stakes) {
        println!(
            "{:<32}{:>8}{:>8.1}{:>9.1}%  {:<16}{:>10.2}",
            format!("{} vs {}", m.home_team, m.away_team),
            variant_label(m.variant),
            m.score_securite,
            m.prob_home * 100.0,
            m.winner,
            advice.stake_amount,
        );
    }

    let total: f64 = stakes.iter().map(|s| s.stake_amount).sum();
    println!("Advised total: {total:.2} (per-match, not capped at budget)");

    Ok(())
}

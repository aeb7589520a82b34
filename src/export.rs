use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::Local;
use rust_xlsxwriter::{Workbook, Worksheet};

use crate::analysis::ScoredMatch;
use crate::kelly::StakeAdvice;
use crate::score::variant_label;

/// One row per analysed match; stake columns stay blank when the stake
/// sequence is not aligned with the scored one.
fn analysis_rows(scored: &[ScoredMatch], stakes: &[StakeAdvice]) -> Vec<Vec<String>> {
    let mut rows = vec![vec![
        "Home".to_string(),
        "Away".to_string(),
        "Home Odds".to_string(),
        "Away Odds".to_string(),
        "Variant".to_string(),
        "Safety Score".to_string(),
        "P(Home)".to_string(),
        "P(Away)".to_string(),
        "Winner".to_string(),
        "Stake Fraction".to_string(),
        "Stake Amount".to_string(),
        "Home Form".to_string(),
        "Away Form".to_string(),
    ]];

    for (idx, m) in scored.iter().enumerate() {
        let advice = stakes.get(idx);
        rows.push(vec![
            m.home_team.clone(),
            m.away_team.clone(),
            format!("{:.2}", m.cote_home),
            format!("{:.2}", m.cote_away),
            variant_label(m.variant).to_string(),
            format!("{:.1}", m.score_securite),
            format!("{:.4}", m.prob_home),
            format!("{:.4}", m.prob_away),
            m.winner.clone(),
            advice
                .map(|a| format!("{:.4}", a.stake_fraction))
                .unwrap_or_default(),
            advice
                .map(|a| format!("{:.2}", a.stake_amount))
                .unwrap_or_default(),
            m.home_form_note.clone(),
            m.away_form_note.clone(),
        ]);
    }

    rows
}

/// Write the analysis table as CSV. Returns the number of data rows.
pub fn export_csv(path: &Path, scored: &[ScoredMatch], stakes: &[StakeAdvice]) -> Result<usize> {
    let rows = analysis_rows(scored, stakes);
    let mut out = String::new();
    for row in &rows {
        let line: Vec<String> = row.iter().map(|cell| csv_field(cell)).collect();
        out.push_str(&line.join(","));
        out.push('\n');
    }
    fs::write(path, out).with_context(|| format!("write csv {}", path.display()))?;
    Ok(rows.len().saturating_sub(1))
}

/// Write the analysis table as a single-sheet workbook. Returns the
/// number of data rows.
pub fn export_xlsx(path: &Path, scored: &[ScoredMatch], stakes: &[StakeAdvice]) -> Result<usize> {
    let rows = analysis_rows(scored, stakes);
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name("Analysis").context("name sheet")?;
    write_rows(worksheet, &rows)?;
    workbook
        .save(path)
        .with_context(|| format!("save workbook {}", path.display()))?;
    Ok(rows.len().saturating_sub(1))
}

/// `prefix_YYYYMMDD_HHMMSS.ext` in the current directory.
pub fn timestamped_name(prefix: &str, ext: &str) -> String {
    let stamp = Local::now().format("%Y%m%d_%H%M%S");
    format!("{prefix}_{stamp}.{ext}")
}

fn csv_field(raw: &str) -> String {
    if raw.contains(',') || raw.contains('"') || raw.contains('\n') {
        format!("\"{}\"", raw.replace('"', "\"\""))
    } else {
        raw.to_string()
    }
}

fn write_rows(worksheet: &mut Worksheet, rows: &[Vec<String>]) -> Result<()> {
    for (row_idx, row) in rows.iter().enumerate() {
        for (col_idx, value) in row.iter().enumerate() {
            worksheet
                .write_string(row_idx as u32, col_idx as u16, value)
                .with_context(|| format!("write cell ({row_idx},{col_idx})"))?;
        }
    }
    Ok(())
}

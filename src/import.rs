use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use crate::record::MatchRecord;

/// Load a JSON array of match records from disk. Import is real I/O, so
/// unlike the pipeline it does fail: unreadable files and malformed
/// documents are errors with context, not silent zeros.
pub fn load_records_json(path: &Path) -> Result<Vec<MatchRecord>> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("read records file {}", path.display()))?;
    parse_records_json(&raw).with_context(|| format!("parse records file {}", path.display()))
}

pub fn parse_records_json(raw: &str) -> Result<Vec<MatchRecord>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return Ok(Vec::new());
    }
    let records = serde_json::from_str::<Vec<MatchRecord>>(trimmed).context("records json")?;
    Ok(records)
}

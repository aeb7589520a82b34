use serde::{Deserialize, Serialize};

/// Lowest odds a bookmaker will quote; anything under this is a data-entry
/// mistake, not a price.
pub const MIN_COTE: f64 = 1.01;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Side {
    Home,
    Away,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct TeamStats {
    pub wins: u32,
    pub draws: u32,
    pub losses: u32,
    pub goals_scored: u32,
    pub goals_against: u32,
}

impl TeamStats {
    pub fn goal_balance(&self) -> f64 {
        self.goals_scored as f64 - self.goals_against as f64
    }
}

/// Win/draw/loss split over a team's last five matches. `wins + draws +
/// losses <= 5` is the record invariant; `normalize_records` drops rows
/// that break it.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct RecentForm {
    pub wins: u32,
    pub draws: u32,
    pub losses: u32,
}

impl RecentForm {
    pub fn matches_played(&self) -> u32 {
        self.wins + self.draws + self.losses
    }
}

/// One manually-entered match: teams, decimal bookmaker odds, season
/// history per side, and optionally the last-5 form per side. The two
/// recent-form fields travel together; a record counts as the "recent
/// form" shape only when both sides carry one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchRecord {
    pub home_team: String,
    pub away_team: String,
    pub cote_home: f64,
    pub cote_away: f64,
    pub home_stats: TeamStats,
    pub away_stats: TeamStats,
    #[serde(default)]
    pub home_last5: Option<RecentForm>,
    #[serde(default)]
    pub away_last5: Option<RecentForm>,
}

impl MatchRecord {
    pub fn has_recent_form(&self) -> bool {
        self.home_last5.is_some() && self.away_last5.is_some()
    }

    pub fn team_name(&self, side: Side) -> &str {
        match side {
            Side::Home => &self.home_team,
            Side::Away => &self.away_team,
        }
    }

    pub fn cote(&self, side: Side) -> f64 {
        match side {
            Side::Home => self.cote_home,
            Side::Away => self.cote_away,
        }
    }
}

/// Explicit validation/coercion pass over raw records. Returns cleaned
/// copies plus one warning line per repair so callers can surface data
/// quality without the core ever raising. Coercion is fail-soft: a bad
/// numeric field becomes 0, never an error.
pub fn normalize_records(records: &[MatchRecord]) -> (Vec<MatchRecord>, Vec<String>) {
    let mut out = Vec::with_capacity(records.len());
    let mut warnings = Vec::new();

    for (idx, record) in records.iter().enumerate() {
        let mut cleaned = record.clone();
        let row = idx + 1;

        if cleaned.home_team.trim().is_empty() {
            warnings.push(format!("[WARN] Row {row}: empty home team name"));
        }
        if cleaned.away_team.trim().is_empty() {
            warnings.push(format!("[WARN] Row {row}: empty away team name"));
        }

        cleaned.cote_home = normalize_cote(cleaned.cote_home, row, "home", &mut warnings);
        cleaned.cote_away = normalize_cote(cleaned.cote_away, row, "away", &mut warnings);

        cleaned.home_last5 = normalize_last5(cleaned.home_last5, row, "home", &mut warnings);
        cleaned.away_last5 = normalize_last5(cleaned.away_last5, row, "away", &mut warnings);

        out.push(cleaned);
    }

    (out, warnings)
}

fn normalize_cote(raw: f64, row: usize, side: &str, warnings: &mut Vec<String>) -> f64 {
    if !raw.is_finite() || raw < 0.0 {
        warnings.push(format!(
            "[WARN] Row {row}: unusable {side} odds {raw}, coerced to 0"
        ));
        return 0.0;
    }
    if raw > 0.0 && raw < MIN_COTE {
        warnings.push(format!(
            "[WARN] Row {row}: {side} odds {raw} below {MIN_COTE}, raised"
        ));
        return MIN_COTE;
    }
    raw
}

fn normalize_last5(
    raw: Option<RecentForm>,
    row: usize,
    side: &str,
    warnings: &mut Vec<String>,
) -> Option<RecentForm> {
    let form = raw?;
    if form.matches_played() > 5 {
        warnings.push(format!(
            "[WARN] Row {row}: {side} last-5 form sums to {}, dropped",
            form.matches_played()
        ));
        return None;
    }
    Some(form)
}

/// Parse a user-typed numeric cell the fail-soft way: empty or garbage
/// input is worth 0, not an error.
pub fn parse_num_cell(raw: &str) -> f64 {
    let s = raw.trim();
    if s.is_empty() {
        return 0.0;
    }
    let s = s.replace(',', ".");
    s.parse::<f64>().unwrap_or(0.0)
}

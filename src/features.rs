use serde::{Deserialize, Serialize};

use crate::record::{MatchRecord, RecentForm};

const FORM_WIN_PTS: f64 = 3.0;
const RECENT_FORM_MAX_PTS: f64 = 15.0;

/// Normalized numeric signals derived from one record. Immutable once
/// computed; the recent-form indices exist only for records carrying the
/// last-5 shape.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct DerivedMetrics {
    pub diff_cote: f64,
    pub home_form: f64,
    pub away_form: f64,
    pub goal_diff: f64,
    pub home_recent_form: Option<f64>,
    pub away_recent_form: Option<f64>,
}

/// Pure derivation, no failure modes: non-finite odds count as 0.
pub fn derive_metrics(record: &MatchRecord) -> DerivedMetrics {
    let cote_home = finite_or_zero(record.cote_home);
    let cote_away = finite_or_zero(record.cote_away);

    let (home_recent_form, away_recent_form) = if record.has_recent_form() {
        (
            record.home_last5.as_ref().map(recent_form_index),
            record.away_last5.as_ref().map(recent_form_index),
        )
    } else {
        (None, None)
    };

    DerivedMetrics {
        diff_cote: (cote_home - cote_away).abs(),
        home_form: form_points(record.home_stats.wins, record.home_stats.draws, record.home_stats.losses),
        away_form: form_points(record.away_stats.wins, record.away_stats.draws, record.away_stats.losses),
        goal_diff: record.home_stats.goal_balance() - record.away_stats.goal_balance(),
        home_recent_form,
        away_recent_form,
    }
}

/// 3 points per win, 1 per draw, -1 per loss.
fn form_points(wins: u32, draws: u32, losses: u32) -> f64 {
    FORM_WIN_PTS * wins as f64 + draws as f64 - losses as f64
}

/// Last-5 index in [0,1]: points taken over the 15 available.
pub fn recent_form_index(form: &RecentForm) -> f64 {
    (FORM_WIN_PTS * form.wins as f64 + form.draws as f64) / RECENT_FORM_MAX_PTS
}

fn finite_or_zero(v: f64) -> f64 {
    if v.is_finite() { v } else { 0.0 }
}

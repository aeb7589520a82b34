use serde::{Deserialize, Serialize};

use crate::features::DerivedMetrics;

// Basic variant weights: odds gap / season form / goal differential.
const W_COTE_BASIC: f64 = 50.0;
const W_FORM_BASIC: f64 = 30.0;
const W_GOALS_BASIC: f64 = 20.0;

// Recent-form variant shifts weight onto the last-5 signal.
const W_COTE_RECENT: f64 = 40.0;
const W_FORM_RECENT: f64 = 25.0;
const W_GOALS_RECENT: f64 = 15.0;
const W_LAST5_RECENT: f64 = 20.0;

/// Which scoring formula produced a score. One pipeline, two shapes: the
/// record's fields decide, not a separate code path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScoreVariant {
    Basic,
    RecentForm,
}

/// Weighted linear safety score, hard-clamped to [0,100]. Inputs outside
/// the expected odds/stat ranges can push the raw sum out of bounds, so
/// the clamp is unconditional.
pub fn safety_score(metrics: &DerivedMetrics) -> (f64, ScoreVariant) {
    let cote_term = 1.0 - metrics.diff_cote / 10.0;
    let form_term = (metrics.home_form - metrics.away_form) / 20.0;
    let goals_term = (metrics.goal_diff + 10.0) / 20.0;

    let (raw, variant) = match (metrics.home_recent_form, metrics.away_recent_form) {
        (Some(home_recent), Some(away_recent)) => {
            let last5_term = (home_recent - away_recent) * 100.0;
            (
                cote_term * W_COTE_RECENT
                    + form_term * W_FORM_RECENT
                    + goals_term * W_GOALS_RECENT
                    + last5_term * W_LAST5_RECENT,
                ScoreVariant::RecentForm,
            )
        }
        _ => (
            cote_term * W_COTE_BASIC + form_term * W_FORM_BASIC + goals_term * W_GOALS_BASIC,
            ScoreVariant::Basic,
        ),
    };

    (raw.clamp(0.0, 100.0), variant)
}

pub fn variant_label(variant: ScoreVariant) -> &'static str {
    match variant {
        ScoreVariant::Basic => "BASIC",
        ScoreVariant::RecentForm => "RECENT",
    }
}

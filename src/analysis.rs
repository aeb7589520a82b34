//! The analytical pipeline: derive -> score -> probabilities -> winner,
//! plus stake sizing over the scored results. Pure compute over borrowed
//! slices; callers own the record collection and re-run the whole thing
//! whenever inputs change.

use serde::{Deserialize, Serialize};

use crate::features::{self, DerivedMetrics};
use crate::form;
use crate::kelly::{self, StakeAdvice};
use crate::record::{MatchRecord, Side};
use crate::score::{self, ScoreVariant};
use crate::win_prob;

/// One fully analysed match. Recomputed fresh on every trigger, never
/// persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredMatch {
    pub home_team: String,
    pub away_team: String,
    pub cote_home: f64,
    pub cote_away: f64,
    pub metrics: DerivedMetrics,
    pub variant: ScoreVariant,
    pub score_securite: f64,
    pub prob_home: f64,
    pub prob_away: f64,
    pub winner_side: Side,
    pub winner: String,
    pub home_form_note: String,
    pub away_form_note: String,
}

impl ScoredMatch {
    pub fn winner_cote(&self) -> f64 {
        match self.winner_side {
            Side::Home => self.cote_home,
            Side::Away => self.cote_away,
        }
    }

    pub fn winner_prob(&self) -> f64 {
        match self.winner_side {
            Side::Home => self.prob_home,
            Side::Away => self.prob_away,
        }
    }
}

/// Full pipeline over the record collection, output aligned with input
/// order. Empty in, empty out; surfacing the "add at least one match"
/// state is the caller's concern.
pub fn analyze(records: &[MatchRecord]) -> Vec<ScoredMatch> {
    records.iter().map(analyze_one).collect()
}

fn analyze_one(record: &MatchRecord) -> ScoredMatch {
    let metrics = features::derive_metrics(record);
    let (score_securite, variant) = score::safety_score(&metrics);
    let (prob_home, prob_away) = win_prob::win_probabilities(score_securite);
    let winner_side = win_prob::pick_winner(prob_home, prob_away);

    ScoredMatch {
        home_team: record.home_team.clone(),
        away_team: record.away_team.clone(),
        cote_home: record.cote_home,
        cote_away: record.cote_away,
        metrics,
        variant,
        score_securite,
        prob_home,
        prob_away,
        winner_side,
        winner: record.team_name(winner_side).to_string(),
        home_form_note: form::form_sentence(&record.home_team, record.home_last5.as_ref()),
        away_form_note: form::form_sentence(&record.away_team, record.away_last5.as_ref()),
    }
}

/// Stake sizing for every scored match under one budget, index-aligned
/// with the input. Matches are advised independently; the summed advice
/// may exceed the budget and is deliberately not scaled down.
pub fn allocate_stakes(scored: &[ScoredMatch], budget: f64) -> Vec<StakeAdvice> {
    scored
        .iter()
        .map(|m| kelly::advise(m.winner_cote() - 1.0, m.winner_prob(), budget))
        .collect()
}

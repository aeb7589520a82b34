use serde::{Deserialize, Serialize};

use crate::record::RecentForm;

/// Verdict on a team's last five matches, keyed off the win ratio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FormVerdict {
    Blazing,
    Good,
    Average,
    Struggling,
    NoRecentMatches,
}

pub fn form_verdict(last5: Option<&RecentForm>) -> FormVerdict {
    let Some(form) = last5 else {
        return FormVerdict::NoRecentMatches;
    };
    let total = form.matches_played();
    if total == 0 {
        return FormVerdict::NoRecentMatches;
    }
    let win_ratio = form.wins as f64 / total as f64;
    if win_ratio >= 0.8 {
        FormVerdict::Blazing
    } else if win_ratio >= 0.6 {
        FormVerdict::Good
    } else if win_ratio >= 0.4 {
        FormVerdict::Average
    } else {
        FormVerdict::Struggling
    }
}

pub fn verdict_label(verdict: FormVerdict) -> &'static str {
    match verdict {
        FormVerdict::Blazing => "BLAZING",
        FormVerdict::Good => "GOOD",
        FormVerdict::Average => "AVERAGE",
        FormVerdict::Struggling => "STRUGGLING",
        FormVerdict::NoRecentMatches => "NO DATA",
    }
}

/// One display sentence per team, in the shape the detail pane and the
/// export sheet both use.
pub fn form_sentence(team: &str, last5: Option<&RecentForm>) -> String {
    let Some(form) = last5 else {
        return format!("{team} has no recent matches on record.");
    };
    let total = form.matches_played();
    if total == 0 {
        return format!("{team} has no recent matches on record.");
    }
    let wins = form.wins;
    match form_verdict(Some(form)) {
        FormVerdict::Blazing => format!("{team} is in blazing form ({wins}W in the last {total})."),
        FormVerdict::Good => format!("{team} is in good form ({wins}W in the last {total})."),
        FormVerdict::Average => format!("{team} is in average form ({wins}W in the last {total})."),
        _ => format!("{team} is struggling ({wins}W in the last {total})."),
    }
}

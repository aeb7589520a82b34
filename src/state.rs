use std::collections::VecDeque;

use crate::analysis::{self, ScoredMatch};
use crate::kelly::StakeAdvice;
use crate::record::{self, MatchRecord, RecentForm, TeamStats};

const LOG_CAP: usize = 200;
pub const DEFAULT_BUDGET: f64 = 100.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Matches,
    Analysis,
    Detail,
    Form,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortMode {
    Entry,
    Score,
    Stake,
}

/// Field-by-field entry buffer for one match record. The last six fields
/// are the last-5 section and only show when the toggle is on.
#[derive(Debug, Clone)]
pub struct RecordForm {
    pub fields: Vec<FormField>,
    pub selected: usize,
    pub with_recent_form: bool,
    pub editing: Option<usize>,
}

#[derive(Debug, Clone)]
pub struct FormField {
    pub label: &'static str,
    pub value: String,
}

const FORM_LABELS: [&str; 20] = [
    "Home team",
    "Away team",
    "Home odds",
    "Away odds",
    "Home wins",
    "Home draws",
    "Home losses",
    "Home goals scored",
    "Home goals against",
    "Away wins",
    "Away draws",
    "Away losses",
    "Away goals scored",
    "Away goals against",
    "Home last-5 wins",
    "Home last-5 draws",
    "Home last-5 losses",
    "Away last-5 wins",
    "Away last-5 draws",
    "Away last-5 losses",
];

const BASE_FIELDS: usize = 14;

impl RecordForm {
    pub fn new() -> Self {
        let mut fields: Vec<FormField> = FORM_LABELS
            .into_iter()
            .map(|label| FormField {
                label,
                value: String::new(),
            })
            .collect();
        // Odds start at the bookmaker floor-ish default instead of blank.
        fields[2].value = "1.50".to_string();
        fields[3].value = "1.50".to_string();
        Self {
            fields,
            selected: 0,
            with_recent_form: false,
            editing: None,
        }
    }

    pub fn from_record(record: &MatchRecord, index: usize) -> Self {
        let mut form = Self::new();
        form.editing = Some(index);
        form.with_recent_form = record.has_recent_form();
        let values = [
            record.home_team.clone(),
            record.away_team.clone(),
            format!("{:.2}", record.cote_home),
            format!("{:.2}", record.cote_away),
            record.home_stats.wins.to_string(),
            record.home_stats.draws.to_string(),
            record.home_stats.losses.to_string(),
            record.home_stats.goals_scored.to_string(),
            record.home_stats.goals_against.to_string(),
            record.away_stats.wins.to_string(),
            record.away_stats.draws.to_string(),
            record.away_stats.losses.to_string(),
            record.away_stats.goals_scored.to_string(),
            record.away_stats.goals_against.to_string(),
        ];
        for (field, value) in form.fields.iter_mut().zip(values.into_iter()) {
            field.value = value;
        }
        if let (Some(home), Some(away)) = (record.home_last5, record.away_last5) {
            form.fields[14].value = home.wins.to_string();
            form.fields[15].value = home.draws.to_string();
            form.fields[16].value = home.losses.to_string();
            form.fields[17].value = away.wins.to_string();
            form.fields[18].value = away.draws.to_string();
            form.fields[19].value = away.losses.to_string();
        }
        form
    }

    pub fn visible_len(&self) -> usize {
        if self.with_recent_form {
            self.fields.len()
        } else {
            BASE_FIELDS
        }
    }

    pub fn select_next(&mut self) {
        self.selected = (self.selected + 1) % self.visible_len();
    }

    pub fn select_prev(&mut self) {
        let len = self.visible_len();
        self.selected = (self.selected + len - 1) % len;
    }

    pub fn toggle_recent_form(&mut self) {
        self.with_recent_form = !self.with_recent_form;
        if self.selected >= self.visible_len() {
            self.selected = self.visible_len() - 1;
        }
    }

    pub fn push_char(&mut self, c: char) {
        self.fields[self.selected].value.push(c);
    }

    pub fn backspace(&mut self) {
        self.fields[self.selected].value.pop();
    }

    /// Build the record with fail-soft numeric parsing: garbage cells are
    /// worth 0, never an error.
    pub fn to_record(&self) -> MatchRecord {
        let num = |idx: usize| record::parse_num_cell(&self.fields[idx].value).max(0.0);
        let count = |idx: usize| num(idx) as u32;

        let (home_last5, away_last5) = if self.with_recent_form {
            (
                Some(RecentForm {
                    wins: count(14),
                    draws: count(15),
                    losses: count(16),
                }),
                Some(RecentForm {
                    wins: count(17),
                    draws: count(18),
                    losses: count(19),
                }),
            )
        } else {
            (None, None)
        };

        MatchRecord {
            home_team: self.fields[0].value.trim().to_string(),
            away_team: self.fields[1].value.trim().to_string(),
            cote_home: num(2),
            cote_away: num(3),
            home_stats: TeamStats {
                wins: count(4),
                draws: count(5),
                losses: count(6),
                goals_scored: count(7),
                goals_against: count(8),
            },
            away_stats: TeamStats {
                wins: count(9),
                draws: count(10),
                losses: count(11),
                goals_scored: count(12),
                goals_against: count(13),
            },
            home_last5,
            away_last5,
        }
    }
}

impl Default for RecordForm {
    fn default() -> Self {
        Self::new()
    }
}

/// All mutable application state. The record list lives here, owned by
/// the UI layer; the pipeline borrows it per run and owns nothing.
pub struct AppState {
    pub screen: Screen,
    pub sort: SortMode,
    pub records: Vec<MatchRecord>,
    pub analysis: Vec<ScoredMatch>,
    pub stakes: Vec<StakeAdvice>,
    pub analysis_dirty: bool,
    pub budget: f64,
    pub budget_input: Option<String>,
    pub selected: usize,
    pub analysis_selected: usize,
    pub logs: VecDeque<String>,
    pub help_overlay: bool,
    pub form: Option<RecordForm>,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

impl AppState {
    pub fn new() -> Self {
        Self {
            screen: Screen::Matches,
            sort: SortMode::Entry,
            records: Vec::new(),
            analysis: Vec::new(),
            stakes: Vec::new(),
            analysis_dirty: false,
            budget: DEFAULT_BUDGET,
            budget_input: None,
            selected: 0,
            analysis_selected: 0,
            logs: VecDeque::new(),
            help_overlay: false,
            form: None,
        }
    }

    pub fn push_log(&mut self, msg: impl Into<String>) {
        self.logs.push_back(msg.into());
        while self.logs.len() > LOG_CAP {
            self.logs.pop_front();
        }
    }

    /// Re-run the whole pipeline over the current record list. Coercion
    /// warnings land on the console; the analysis itself never fails.
    pub fn run_analysis(&mut self) {
        let (normalized, warnings) = record::normalize_records(&self.records);
        for warning in warnings {
            self.push_log(warning);
        }
        self.analysis = analysis::analyze(&normalized);
        self.stakes = analysis::allocate_stakes(&self.analysis, self.budget);
        self.analysis_dirty = false;
        self.clamp_selection();
        if self.analysis.is_empty() {
            self.push_log("[INFO] No matches to analyse yet");
        } else {
            self.push_log(format!(
                "[INFO] Analysed {} match(es), budget {:.2}",
                self.analysis.len(),
                self.budget
            ));
        }
    }

    pub fn set_budget(&mut self, budget: f64) {
        if !budget.is_finite() || budget <= 0.0 {
            self.push_log("[WARN] Budget must be a positive amount");
            return;
        }
        self.budget = budget;
        if !self.analysis.is_empty() {
            self.stakes = analysis::allocate_stakes(&self.analysis, self.budget);
        }
        self.push_log(format!("[INFO] Budget set to {budget:.2}"));
    }

    pub fn add_record(&mut self, record: MatchRecord) {
        self.records.push(record);
        self.analysis_dirty = true;
        self.selected = self.records.len() - 1;
    }

    pub fn replace_record(&mut self, index: usize, record: MatchRecord) {
        if let Some(slot) = self.records.get_mut(index) {
            *slot = record;
            self.analysis_dirty = true;
        }
    }

    pub fn delete_selected(&mut self) -> Option<MatchRecord> {
        if self.records.is_empty() {
            return None;
        }
        let removed = self.records.remove(self.selected);
        self.analysis_dirty = true;
        self.clamp_selection();
        Some(removed)
    }

    pub fn selected_record(&self) -> Option<&MatchRecord> {
        self.records.get(self.selected)
    }

    /// Indices into `analysis`/`stakes` in display order for the current
    /// sort mode. The underlying sequences always stay in input order.
    pub fn analysis_order(&self) -> Vec<usize> {
        let mut order: Vec<usize> = (0..self.analysis.len()).collect();
        match self.sort {
            SortMode::Entry => {}
            SortMode::Score => {
                order.sort_by(|&a, &b| {
                    self.analysis[b]
                        .score_securite
                        .total_cmp(&self.analysis[a].score_securite)
                });
            }
            SortMode::Stake => {
                let amount = |idx: usize| {
                    self.stakes
                        .get(idx)
                        .map(|s| s.stake_amount)
                        .unwrap_or(0.0)
                };
                order.sort_by(|&a, &b| amount(b).total_cmp(&amount(a)));
            }
        }
        order
    }

    /// Maps the highlighted analysis row back to its input index.
    pub fn selected_analysis_index(&self) -> Option<usize> {
        self.analysis_order().get(self.analysis_selected).copied()
    }

    pub fn cycle_sort(&mut self) {
        self.sort = match self.sort {
            SortMode::Entry => SortMode::Score,
            SortMode::Score => SortMode::Stake,
            SortMode::Stake => SortMode::Entry,
        };
    }

    pub fn select_next(&mut self) {
        let len = self.active_list_len();
        if len == 0 {
            return;
        }
        match self.screen {
            Screen::Matches => self.selected = (self.selected + 1).min(len - 1),
            Screen::Analysis | Screen::Detail => {
                self.analysis_selected = (self.analysis_selected + 1).min(len - 1)
            }
            Screen::Form => {}
        }
    }

    pub fn select_prev(&mut self) {
        match self.screen {
            Screen::Matches => self.selected = self.selected.saturating_sub(1),
            Screen::Analysis | Screen::Detail => {
                self.analysis_selected = self.analysis_selected.saturating_sub(1)
            }
            Screen::Form => {}
        }
    }

    pub fn clamp_selection(&mut self) {
        if self.records.is_empty() {
            self.selected = 0;
        } else if self.selected >= self.records.len() {
            self.selected = self.records.len() - 1;
        }
        if self.analysis.is_empty() {
            self.analysis_selected = 0;
        } else if self.analysis_selected >= self.analysis.len() {
            self.analysis_selected = self.analysis.len() - 1;
        }
    }

    fn active_list_len(&self) -> usize {
        match self.screen {
            Screen::Matches => self.records.len(),
            Screen::Analysis | Screen::Detail => self.analysis.len(),
            Screen::Form => 0,
        }
    }

    /// Sum of all recommended stakes. Shown in the footer; deliberately
    /// allowed to exceed the budget since matches are advised
    /// independently.
    pub fn total_staked(&self) -> f64 {
        self.stakes.iter().map(|s| s.stake_amount).sum()
    }
}

pub fn sort_label(sort: SortMode) -> &'static str {
    match sort {
        SortMode::Entry => "ENTRY",
        SortMode::Score => "SCORE",
        SortMode::Stake => "STAKE",
    }
}

pub fn screen_label(screen: Screen) -> &'static str {
    match screen {
        Screen::Matches => "MATCHES",
        Screen::Analysis => "ANALYSIS",
        Screen::Detail => "DETAIL",
        Screen::Form => "ADD MATCH",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::TeamStats;

    fn record(home: &str, wins: u32) -> MatchRecord {
        MatchRecord {
            home_team: home.to_string(),
            away_team: "Opp".to_string(),
            cote_home: 1.80,
            cote_away: 2.10,
            home_stats: TeamStats {
                wins,
                ..TeamStats::default()
            },
            away_stats: TeamStats::default(),
            home_last5: None,
            away_last5: None,
        }
    }

    #[test]
    fn run_analysis_fills_aligned_results() {
        let mut state = AppState::new();
        state.add_record(record("A", 2));
        state.add_record(record("B", 8));
        state.run_analysis();
        assert_eq!(state.analysis.len(), 2);
        assert_eq!(state.stakes.len(), 2);
        assert!(!state.analysis_dirty);
    }

    #[test]
    fn score_sort_orders_view_not_data() {
        let mut state = AppState::new();
        state.add_record(record("Weak", 0));
        state.add_record(record("Strong", 15));
        state.run_analysis();
        state.sort = SortMode::Score;
        let order = state.analysis_order();
        assert_eq!(order, vec![1, 0]);
        // Underlying sequence untouched.
        assert_eq!(state.analysis[0].home_team, "Weak");
    }

    #[test]
    fn budget_change_recomputes_stakes_only() {
        let mut state = AppState::new();
        state.add_record(record("Strong", 15));
        state.run_analysis();
        let before = state.stakes[0].stake_amount;
        state.set_budget(200.0);
        assert!((state.stakes[0].stake_amount - before * 2.0).abs() < 0.011);
        assert_eq!(state.analysis.len(), 1);
    }

    #[test]
    fn non_positive_budget_rejected() {
        let mut state = AppState::new();
        state.set_budget(0.0);
        assert_eq!(state.budget, DEFAULT_BUDGET);
        state.set_budget(-5.0);
        assert_eq!(state.budget, DEFAULT_BUDGET);
    }

    #[test]
    fn delete_clamps_selection() {
        let mut state = AppState::new();
        state.add_record(record("A", 1));
        state.add_record(record("B", 1));
        state.selected = 1;
        state.delete_selected();
        assert_eq!(state.selected, 0);
        state.delete_selected();
        assert!(state.delete_selected().is_none());
    }

    #[test]
    fn form_round_trips_a_record() {
        let mut original = record("Nantes", 7);
        original.home_last5 = Some(RecentForm {
            wins: 3,
            draws: 1,
            losses: 1,
        });
        original.away_last5 = Some(RecentForm {
            wins: 1,
            draws: 1,
            losses: 3,
        });
        let form = RecordForm::from_record(&original, 0);
        assert!(form.with_recent_form);
        let rebuilt = form.to_record();
        assert_eq!(rebuilt.home_team, "Nantes");
        assert_eq!(rebuilt.home_stats.wins, 7);
        assert_eq!(rebuilt.home_last5.unwrap().wins, 3);
        assert_eq!(rebuilt.away_last5.unwrap().losses, 3);
    }

    #[test]
    fn form_parses_garbage_cells_to_zero() {
        let mut form = RecordForm::new();
        form.fields[0].value = "Lyon".to_string();
        form.fields[4].value = "not a number".to_string();
        form.fields[2].value = "abc".to_string();
        let built = form.to_record();
        assert_eq!(built.home_stats.wins, 0);
        assert_eq!(built.cote_home, 0.0);
    }

    #[test]
    fn form_toggle_hides_last5_section() {
        let mut form = RecordForm::new();
        assert_eq!(form.visible_len(), 14);
        form.toggle_recent_form();
        assert_eq!(form.visible_len(), 20);
        form.selected = 19;
        form.toggle_recent_form();
        assert_eq!(form.selected, 13);
    }

    #[test]
    fn log_is_bounded() {
        let mut state = AppState::new();
        for i in 0..300 {
            state.push_log(format!("[INFO] line {i}"));
        }
        assert_eq!(state.logs.len(), 200);
        assert!(state.logs.front().unwrap().contains("line 100"));
    }
}

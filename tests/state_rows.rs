use mise_terminal::record::{MatchRecord, TeamStats};
use mise_terminal::state::{AppState, Screen, SortMode};

fn record(home: &str, wins: u32, cote_home: f64) -> MatchRecord {
    MatchRecord {
        home_team: home.to_string(),
        away_team: format!("{home} Opp"),
        cote_home,
        cote_away: 2.00,
        home_stats: TeamStats {
            wins,
            draws: 1,
            losses: 1,
            goals_scored: wins * 2,
            goals_against: 3,
        },
        away_stats: TeamStats::default(),
        home_last5: None,
        away_last5: None,
    }
}

#[test]
fn score_sort_view_leaves_input_order_alone() {
    let mut state = AppState::new();
    state.add_record(record("Weak", 0, 3.50));
    state.add_record(record("Strong", 14, 1.40));
    state.add_record(record("Middle", 6, 2.00));
    state.run_analysis();

    state.sort = SortMode::Score;
    let order = state.analysis_order();
    assert_eq!(order[0], 1);
    assert_eq!(order[2], 0);

    // The analysis sequence itself still matches the records.
    for (record, scored) in state.records.iter().zip(&state.analysis) {
        assert_eq!(record.home_team, scored.home_team);
    }
}

#[test]
fn selected_analysis_index_follows_the_sorted_view() {
    let mut state = AppState::new();
    state.add_record(record("Weak", 0, 3.50));
    state.add_record(record("Strong", 14, 1.40));
    state.run_analysis();

    state.screen = Screen::Analysis;
    state.sort = SortMode::Score;
    state.analysis_selected = 0;
    // Top row of the score-sorted view is the strong side, input index 1.
    assert_eq!(state.selected_analysis_index(), Some(1));

    state.select_next();
    assert_eq!(state.selected_analysis_index(), Some(0));
    // Selection saturates at the end of the list.
    state.select_next();
    assert_eq!(state.analysis_selected, 1);
}

#[test]
fn stake_sort_uses_the_stake_amounts() {
    let mut state = AppState::new();
    state.add_record(record("Tiny", 0, 1.10));
    state.add_record(record("Juicy", 14, 2.50));
    state.run_analysis();

    state.sort = SortMode::Stake;
    let order = state.analysis_order();
    let first = state.stakes[order[0]].stake_amount;
    let second = state.stakes[order[1]].stake_amount;
    assert!(first >= second);
}

#[test]
fn rerunning_analysis_discards_previous_results() {
    let mut state = AppState::new();
    state.add_record(record("One", 3, 2.00));
    state.run_analysis();
    assert_eq!(state.analysis.len(), 1);

    state.add_record(record("Two", 5, 1.80));
    assert!(state.analysis_dirty);
    state.run_analysis();
    assert_eq!(state.analysis.len(), 2);
    assert_eq!(state.stakes.len(), 2);
    assert!(!state.analysis_dirty);
}

#[test]
fn empty_state_analysis_is_a_no_op() {
    let mut state = AppState::new();
    state.run_analysis();
    assert!(state.analysis.is_empty());
    assert!(state.stakes.is_empty());
    assert_eq!(state.selected_analysis_index(), None);
    assert_eq!(state.total_staked(), 0.0);
}

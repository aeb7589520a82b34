use rand::Rng;

use crate::record::{MatchRecord, RecentForm, TeamStats};

const TEAMS: [&str; 16] = [
    "Paris SG",
    "Marseille",
    "Lyon",
    "Monaco",
    "Lille",
    "Rennes",
    "Nice",
    "Lens",
    "Nantes",
    "Reims",
    "Strasbourg",
    "Toulouse",
    "Montpellier",
    "Brest",
    "Le Havre",
    "Metz",
];

/// Plausible random records for demo or empty-start sessions. About half
/// of them carry the last-5 shape so both formula variants show up.
pub fn sample_records(n: usize, rng: &mut impl Rng) -> Vec<MatchRecord> {
    (0..n).map(|_| sample_record(rng)).collect()
}

fn sample_record(rng: &mut impl Rng) -> MatchRecord {
    let home_idx = rng.gen_range(0..TEAMS.len());
    let mut away_idx = rng.gen_range(0..TEAMS.len());
    if away_idx == home_idx {
        away_idx = (away_idx + 1) % TEAMS.len();
    }

    let with_recent_form = rng.gen_bool(0.5);
    let (home_last5, away_last5) = if with_recent_form {
        (Some(sample_last5(rng)), Some(sample_last5(rng)))
    } else {
        (None, None)
    };

    MatchRecord {
        home_team: TEAMS[home_idx].to_string(),
        away_team: TEAMS[away_idx].to_string(),
        cote_home: sample_cote(rng),
        cote_away: sample_cote(rng),
        home_stats: sample_stats(rng),
        away_stats: sample_stats(rng),
        home_last5,
        away_last5,
    }
}

fn sample_cote(rng: &mut impl Rng) -> f64 {
    let raw: f64 = rng.gen_range(1.10..5.00);
    (raw * 100.0).round() / 100.0
}

fn sample_stats(rng: &mut impl Rng) -> TeamStats {
    let wins = rng.gen_range(0..15);
    let draws = rng.gen_range(0..8);
    let losses = rng.gen_range(0..12);
    let goals_scored = wins * 2 + rng.gen_range(0..10);
    TeamStats {
        wins,
        draws,
        losses,
        goals_scored,
        goals_against: losses * 2 + rng.gen_range(0..10),
    }
}

fn sample_last5(rng: &mut impl Rng) -> RecentForm {
    let wins = rng.gen_range(0..=5u32);
    let draws = rng.gen_range(0..=(5 - wins));
    let losses = 5 - wins - draws;
    RecentForm {
        wins,
        draws,
        losses,
    }
}

//! Flattening of raw match inputs into the numeric feature vector consumed by the simulation
//! and value stages.
//!
//! Every function here is pure: the same inputs always yield bit-identical features.

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::domain::{
    sanitise_avg_goals, HistoricalData, MarketData, MatchInput, MotivationFactors, PlayerData,
    TeamStats, VenueData,
};

/// Weights of the five most recent results, most recent first.
pub const FORM_WEIGHTS: [f64; 5] = [0.4, 0.3, 0.2, 0.08, 0.02];

pub const BASE_RATING: f64 = 1500.0;
pub const RATING_SPREAD: f64 = 300.0;

/// Floor applied to goals conceded before it is used as a divisor.
pub const MIN_GOALS_AGAINST: f64 = 0.1;

pub const MAX_VENUE_ADVANTAGE: f64 = 0.5;

const SQUAD_SIZE: f64 = 11.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FormResult {
    Win,
    Draw,
    Loss,
}
impl FormResult {
    fn points(self) -> f64 {
        match self {
            FormResult::Win => 3.0,
            FormResult::Draw => 1.0,
            FormResult::Loss => 0.0,
        }
    }
}

impl TryFrom<char> for FormResult {
    type Error = char;

    fn try_from(symbol: char) -> Result<Self, Self::Error> {
        match symbol.to_ascii_uppercase() {
            'W' => Ok(FormResult::Win),
            'D' => Ok(FormResult::Draw),
            'L' => Ok(FormResult::Loss),
            other => Err(other),
        }
    }
}

/// Decaying-weight points average over the five most recent results, normalised to `[0, 1]`.
/// The form string runs oldest to newest, so the last symbol carries the most weight.
/// Unrecognised symbols are skipped.
pub fn weighted_form(form: &str) -> f64 {
    let points = form
        .chars()
        .rev()
        .filter_map(|symbol| match FormResult::try_from(symbol) {
            Ok(result) => Some(result),
            Err(other) => {
                trace!("skipping form symbol {other:?}");
                None
            }
        })
        .zip(FORM_WEIGHTS.iter())
        .map(|(result, weight)| result.points() * weight)
        .sum::<f64>();
    points / 3.0
}

/// Rating derived from weighted form rather than from an iterative Elo process.
pub fn elo_rating(form: &str) -> f64 {
    BASE_RATING + weighted_form(form) * RATING_SPREAD
}

pub fn head_to_head_win_rate(historical: &HistoricalData) -> f64 {
    historical.home_wins as f64 / u32::max(historical.matches, 1) as f64
}

pub fn attack_strength(goals_for: f64, league_avg_goals: f64) -> f64 {
    goals_for / sanitise_avg_goals(league_avg_goals)
}

pub fn defense_strength(goals_against: f64, league_avg_goals: f64) -> f64 {
    sanitise_avg_goals(league_avg_goals) / f64::max(goals_against, MIN_GOALS_AGAINST)
}

pub fn xg_differential(stats: &TeamStats, league_avg_goals: f64) -> f64 {
    (stats.xg_for - stats.xg_against) / sanitise_avg_goals(league_avg_goals)
}

pub fn key_player_impact(players: &PlayerData) -> f64 {
    let mut impact = 0.5;
    if players.top_scorer_available {
        impact += 0.2;
    }
    impact += 0.3 * (players.key_players_available as f64 / SQUAD_SIZE);
    impact -= 0.1 * players.injuries as f64;
    impact -= 0.15 * players.suspensions as f64;
    impact += 0.2 * (players.fitness / 100.0);
    impact.clamp(0.0, 1.0)
}

/// The travel term can turn the product negative for long trips; the clamp absorbs that.
pub fn venue_advantage(venue: &VenueData) -> f64 {
    let advantage = venue.home_advantage
        * (1.0 + venue.weather_impact * 0.1)
        * (1.0 + venue.pitch_condition * 0.05)
        * (1.0 - venue.travel_distance * 0.02);
    advantage.clamp(0.0, MAX_VENUE_ADVANTAGE)
}

pub fn motivation_score(motivation: &MotivationFactors) -> f64 {
    let score = 0.5
        + 0.3 * motivation.importance / 10.0
        + 0.2 * motivation.table_pressure / 10.0
        + 0.2 * motivation.momentum / 10.0
        + 0.1 * motivation.revenge / 10.0
        - 0.15 * motivation.congestion / 10.0
        + 0.1 * motivation.rest_days / 7.0;
    score.clamp(0.0, 1.0)
}

pub fn market_confidence(market: &MarketData) -> f64 {
    market.odds_movement.abs() * 0.3
        + f64::min(market.volume / 1_000_000.0, 1.0) * 0.4
        + market.sharp_money * 0.3
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Features {
    pub home_elo: f64,
    pub away_elo: f64,
    pub elo_difference: f64,
    pub home_form: f64,
    pub away_form: f64,
    pub head_to_head_win_rate: f64,
    pub home_attack_strength: f64,
    pub away_attack_strength: f64,
    pub home_defense_strength: f64,
    pub away_defense_strength: f64,
    pub home_xg_differential: f64,
    pub away_xg_differential: f64,
    pub home_key_players: f64,
    pub away_key_players: f64,
    pub venue_advantage: f64,
    pub home_motivation: f64,
    pub away_motivation: f64,
    pub motivation_differential: f64,
    pub market_confidence: f64,
    pub league_competitiveness: f64,
    pub season_stage: f64,
}
impl Features {
    pub fn form_differential(&self) -> f64 {
        self.home_form - self.away_form
    }
}

pub fn extract(input: &MatchInput, season_stage: f64) -> Features {
    let league_avg_goals = sanitise_avg_goals(input.league.avg_goals);
    if !input.historical.is_consistent() {
        debug!(
            "{} v {}: history counts do not add up to {} matches",
            input.home_team, input.away_team, input.historical.matches
        );
    }

    let home_form = weighted_form(&input.home.form);
    let away_form = weighted_form(&input.away.form);
    let home_elo = BASE_RATING + home_form * RATING_SPREAD;
    let away_elo = BASE_RATING + away_form * RATING_SPREAD;
    let home_motivation = motivation_score(&input.home_motivation);
    let away_motivation = motivation_score(&input.away_motivation);

    let features = Features {
        home_elo,
        away_elo,
        elo_difference: home_elo - away_elo,
        home_form,
        away_form,
        head_to_head_win_rate: head_to_head_win_rate(&input.historical),
        home_attack_strength: attack_strength(input.home.goals_for, league_avg_goals),
        away_attack_strength: attack_strength(input.away.goals_for, league_avg_goals),
        home_defense_strength: defense_strength(input.home.goals_against, league_avg_goals),
        away_defense_strength: defense_strength(input.away.goals_against, league_avg_goals),
        home_xg_differential: xg_differential(&input.home, league_avg_goals),
        away_xg_differential: xg_differential(&input.away, league_avg_goals),
        home_key_players: key_player_impact(&input.home_players),
        away_key_players: key_player_impact(&input.away_players),
        venue_advantage: venue_advantage(&input.venue),
        home_motivation,
        away_motivation,
        motivation_differential: home_motivation - away_motivation,
        market_confidence: market_confidence(&input.market),
        league_competitiveness: input.league.competitiveness,
        season_stage,
    };
    debug!(
        "{} v {}: elo {:.1}/{:.1}, form {:.3}/{:.3}, venue {:.3}",
        input.home_team,
        input.away_team,
        features.home_elo,
        features.away_elo,
        features.home_form,
        features.away_form,
        features.venue_advantage
    );
    features
}

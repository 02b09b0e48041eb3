//! Deterministic placeholder data for fixtures that have no real statistics wired up.
//!
//! Team profiles are seeded from the team name alone, so a side looks the same in every
//! fixture. Fixture-level data (history, venue, market) is seeded from both names.

use std::hash::{Hash, Hasher};

use rustc_hash::FxHasher;
use tinyrand::{Rand, Seeded, StdRand};

use crate::domain::{
    HeadToHead, HistoricalData, LeagueConfig, MarketData, MatchInput, MotivationFactors, Odds,
    PlayerData, TeamStats, VenueData,
};

const BOOKMAKER_MARGIN: f64 = 1.05;

pub fn team_seed(team: &str) -> u64 {
    let mut hasher = FxHasher::default();
    team.hash(&mut hasher);
    hasher.finish()
}

pub fn fixture_seed(home_team: &str, away_team: &str) -> u64 {
    team_seed(home_team) ^ team_seed(away_team).rotate_left(17)
}

pub struct Synthetic {
    rand: StdRand,
}
impl Synthetic {
    pub fn new(seed: u64) -> Self {
        Self {
            rand: StdRand::seed(seed),
        }
    }

    pub fn for_team(team: &str) -> Self {
        Self::new(team_seed(team))
    }

    pub fn for_fixture(home_team: &str, away_team: &str) -> Self {
        Self::new(fixture_seed(home_team, away_team))
    }

    #[inline]
    fn random_f64(&mut self) -> f64 {
        self.rand.next_u64() as f64 / u64::MAX as f64
    }

    fn uniform(&mut self, lower: f64, upper: f64) -> f64 {
        lower + self.random_f64() * (upper - lower)
    }

    /// Uniform integer in `lower..=upper`.
    fn count(&mut self, lower: u32, upper: u32) -> u32 {
        lower + (self.rand.next_u64() % (upper - lower + 1) as u64) as u32
    }

    fn form(&mut self) -> String {
        (0..5)
            .map(|_| {
                let roll = self.random_f64();
                if roll < 0.45 {
                    'W'
                } else if roll < 0.72 {
                    'D'
                } else {
                    'L'
                }
            })
            .collect()
    }

    pub fn team_stats(&mut self) -> TeamStats {
        let goals_for = round(self.uniform(0.8, 2.4), 2);
        let goals_against = round(self.uniform(0.6, 2.0), 2);
        TeamStats {
            form: self.form(),
            goals_for,
            goals_against,
            xg_for: round(goals_for * self.uniform(0.85, 1.15), 2),
            xg_against: round(goals_against * self.uniform(0.85, 1.15), 2),
            shots_per_game: round(self.uniform(8.0, 18.0), 1),
            possession: round(self.uniform(38.0, 65.0), 1),
            pass_accuracy: round(self.uniform(72.0, 90.0), 1),
            set_piece_goals: round(self.uniform(0.1, 0.6), 2),
            cards_per_game: round(self.uniform(1.0, 3.0), 1),
            home_advantage: None,
            away_form: None,
            fallback: false,
        }
    }

    pub fn players(&mut self) -> PlayerData {
        PlayerData {
            key_players_available: self.count(7, 11) as u8,
            top_scorer_available: self.random_f64() < 0.85,
            injuries: self.count(0, 4) as u8,
            suspensions: self.count(0, 2) as u8,
            fitness: round(self.uniform(65.0, 95.0), 0),
        }
    }

    pub fn motivation(&mut self) -> MotivationFactors {
        MotivationFactors {
            importance: self.count(1, 10) as f64,
            table_pressure: self.count(1, 10) as f64,
            momentum: self.count(1, 10) as f64,
            revenge: self.count(1, 10) as f64,
            congestion: self.count(1, 10) as f64,
            rest_days: self.count(2, 7) as f64,
        }
    }

    pub fn venue(&mut self) -> VenueData {
        VenueData {
            home_advantage: round(self.uniform(0.05, 0.2), 3),
            altitude: round(self.uniform(0.0, 500.0), 0),
            weather_impact: round(self.uniform(0.0, 1.0), 2),
            pitch_condition: round(self.uniform(0.0, 1.0), 2),
            travel_distance: round(self.uniform(0.0, 5.0), 2),
        }
    }

    /// A record whose outcome counts always add up to the number of matches.
    pub fn historical(&mut self) -> HistoricalData {
        let matches = self.count(0, 20);
        let home_wins = self.count(0, matches);
        let away_wins = self.count(0, matches - home_wins);
        let draws = matches - home_wins - away_wins;
        let avg_goals = round(self.uniform(1.8, 3.4), 2);
        let recent = u32::min(matches, 5);
        let recent_home_wins = u32::min(home_wins, recent);
        let recent_away_wins = u32::min(away_wins, recent - recent_home_wins);
        HistoricalData {
            matches,
            home_wins,
            away_wins,
            draws,
            avg_goals,
            head_to_head: HeadToHead {
                matches: recent,
                home_wins: recent_home_wins,
                away_wins: recent_away_wins,
                draws: recent - recent_home_wins - recent_away_wins,
                avg_goals,
            },
        }
    }

    /// Prices carrying a fixed bookmaker margin, with a small drift from the opening line.
    pub fn market(&mut self) -> MarketData {
        let home = self.uniform(0.3, 0.55);
        let draw = self.uniform(0.22, 0.3);
        let away = 1.0 - home - draw;
        let price = |prob: f64| round(1.0 / (prob * BOOKMAKER_MARGIN), 2);
        let current = Odds::new(price(home), price(draw), price(away));
        let drift = round(self.uniform(-0.15, 0.15), 2);
        let opening = Odds::new(
            f64::max(current.home - drift, 1.01),
            current.draw,
            current.away,
        );
        let mut market = MarketData::with_opening(opening, current);
        market.volume = round(self.uniform(50_000.0, 2_000_000.0), 0);
        market.sharp_money = round(self.random_f64(), 2);
        market
    }
}

fn round(value: f64, decimals: i32) -> f64 {
    let scale = 10f64.powi(decimals);
    (value * scale).round() / scale
}

/// A complete, reproducible input for the given fixture.
pub fn synthesise(home_team: &str, away_team: &str, league: LeagueConfig) -> MatchInput {
    let mut home = Synthetic::for_team(home_team);
    let mut away = Synthetic::for_team(away_team);
    let mut fixture = Synthetic::for_fixture(home_team, away_team);
    MatchInput {
        home_team: home_team.into(),
        away_team: away_team.into(),
        league,
        home: home.team_stats(),
        away: away.team_stats(),
        historical: fixture.historical(),
        home_players: home.players(),
        away_players: away.players(),
        venue: fixture.venue(),
        market: fixture.market(),
        home_motivation: home.motivation(),
        away_motivation: away.motivation(),
    }
}

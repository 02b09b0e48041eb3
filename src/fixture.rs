//! Validation of loosely-shaped provider records into typed match inputs.
//!
//! Sparse data is never an error: absent or zero numbers take documented defaults. Only a
//! record that is malformed in shape, such as one without a team or with a nonsensical
//! price, is rejected.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::domain::{
    HistoricalData, MarketData, MatchInput, MatchResult, MotivationFactors, Odds, PlayerData, Side,
    TeamStats, VenueData, DEFAULT_GOALS_PER_MATCH,
};
use crate::league::league_config;

#[derive(Debug, Error)]
pub enum FixtureError {
    #[error("missing {0} team")]
    MissingTeam(Side),

    #[error("{0}")]
    InvalidOdds(#[from] InvalidOdds),
}

#[derive(Debug, Error)]
#[error("invalid {result} price {price}")]
pub struct InvalidOdds {
    pub result: MatchResult,
    pub price: f64,
}

/// Season aggregates as reported by a stats provider. Goal counts are season totals.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawTeamStats {
    pub form: Option<String>,
    pub games_played: Option<u32>,
    pub goals_for: Option<f64>,
    pub goals_against: Option<f64>,
    /// Expected goals per match, not a season total. Falls back to the per-match goal rate.
    pub xg_for: Option<f64>,
    /// Expected goals conceded per match.
    pub xg_against: Option<f64>,
    pub shots_per_game: Option<f64>,
    pub possession: Option<f64>,
    pub pass_accuracy: Option<f64>,
    pub set_piece_goals: Option<f64>,
    pub cards_per_game: Option<f64>,
    pub home_advantage: Option<f64>,
    pub away_form: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawOdds {
    pub home: Option<f64>,
    pub draw: Option<f64>,
    pub away: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawFixture {
    pub sport_key: Option<String>,
    pub commence_time: Option<String>,
    pub home_team: Option<String>,
    pub away_team: Option<String>,
    pub home_stats: Option<RawTeamStats>,
    pub away_stats: Option<RawTeamStats>,
    pub odds: Option<RawOdds>,
    pub opening_odds: Option<RawOdds>,
    pub volume: Option<f64>,
    pub sharp_money: Option<f64>,
    pub historical: Option<HistoricalData>,
    pub home_players: Option<PlayerData>,
    pub away_players: Option<PlayerData>,
    pub venue: Option<VenueData>,
    pub home_motivation: Option<MotivationFactors>,
    pub away_motivation: Option<MotivationFactors>,
}

/// A validated fixture, ready for prediction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fixture {
    pub sport_key: Option<String>,
    pub commence_time: Option<DateTime<Utc>>,
    pub input: MatchInput,
}

impl TryFrom<RawFixture> for Fixture {
    type Error = FixtureError;

    fn try_from(raw: RawFixture) -> Result<Self, Self::Error> {
        let home_team = team_name(raw.home_team, Side::Home)?;
        let away_team = team_name(raw.away_team, Side::Away)?;
        let league = match &raw.sport_key {
            Some(sport_key) => league_config(sport_key),
            None => Default::default(),
        };
        let current = odds_or_even(raw.odds)?;
        let mut market = match raw.opening_odds {
            Some(opening) => MarketData::with_opening(odds_or_even(Some(opening))?, current),
            None => MarketData::from_odds(current),
        };
        market.volume = f64::max(raw.volume.unwrap_or(0.0), 0.0);
        market.sharp_money = raw.sharp_money.unwrap_or(0.0).clamp(0.0, 1.0);

        let commence_time = raw.commence_time.as_deref().and_then(|time| {
            match DateTime::parse_from_rfc3339(time) {
                Ok(time) => Some(time.with_timezone(&Utc)),
                Err(err) => {
                    debug!("ignoring commence time {time:?}: {err}");
                    None
                }
            }
        });

        let input = MatchInput {
            home: team_stats(&home_team, raw.home_stats),
            away: team_stats(&away_team, raw.away_stats),
            home_team,
            away_team,
            league,
            historical: raw.historical.unwrap_or_default(),
            home_players: raw.home_players.unwrap_or_default(),
            away_players: raw.away_players.unwrap_or_default(),
            venue: raw.venue.unwrap_or_default(),
            market,
            home_motivation: raw.home_motivation.unwrap_or_default(),
            away_motivation: raw.away_motivation.unwrap_or_default(),
        };
        Ok(Self {
            sport_key: raw.sport_key,
            commence_time,
            input,
        })
    }
}

fn team_name(name: Option<String>, side: Side) -> Result<String, FixtureError> {
    match name {
        Some(name) if !name.trim().is_empty() => Ok(name.trim().to_string()),
        _ => Err(FixtureError::MissingTeam(side)),
    }
}

/// Season total divided by games played, or the default rate when either is unusable.
fn per_match(total: Option<f64>, games_played: Option<u32>) -> f64 {
    match (total, games_played) {
        (Some(total), Some(games)) if games > 0 && total.is_finite() && total >= 0.0 => {
            total / games as f64
        }
        _ => DEFAULT_GOALS_PER_MATCH,
    }
}

fn team_stats(team: &str, raw: Option<RawTeamStats>) -> TeamStats {
    let Some(raw) = raw else {
        debug!("no stats for {team}, using fallback");
        return TeamStats::fallback();
    };
    let defaults = TeamStats::default();
    let goals_for = per_match(raw.goals_for, raw.games_played);
    let goals_against = per_match(raw.goals_against, raw.games_played);
    TeamStats {
        form: raw.form.unwrap_or(defaults.form),
        goals_for,
        goals_against,
        xg_for: raw.xg_for.unwrap_or(goals_for),
        xg_against: raw.xg_against.unwrap_or(goals_against),
        shots_per_game: raw.shots_per_game.unwrap_or(defaults.shots_per_game),
        possession: raw.possession.unwrap_or(defaults.possession),
        pass_accuracy: raw.pass_accuracy.unwrap_or(defaults.pass_accuracy),
        set_piece_goals: raw.set_piece_goals.unwrap_or(defaults.set_piece_goals),
        cards_per_game: raw.cards_per_game.unwrap_or(defaults.cards_per_game),
        home_advantage: raw.home_advantage,
        away_form: raw.away_form,
        fallback: false,
    }
}

/// Negative or non-finite prices are malformed. Missing, zero and sub-unit prices are merely
/// unusable, and leave the market at even odds.
fn odds_or_even(raw: Option<RawOdds>) -> Result<Odds, InvalidOdds> {
    let Some(raw) = raw else {
        return Ok(Odds::even());
    };
    let prices = [
        (MatchResult::HomeWin, raw.home),
        (MatchResult::Draw, raw.draw),
        (MatchResult::AwayWin, raw.away),
    ];
    for (result, price) in prices {
        if let Some(price) = price {
            if !price.is_finite() || price < 0.0 {
                return Err(InvalidOdds { result, price });
            }
        }
    }
    match (raw.home, raw.draw, raw.away) {
        (Some(home), Some(draw), Some(away)) => {
            let odds = Odds::new(home, draw, away);
            if odds.is_valid() {
                Ok(odds)
            } else {
                debug!("unusable odds {odds:?}, assuming even");
                Ok(Odds::even())
            }
        }
        _ => {
            debug!("incomplete odds {raw:?}, assuming even");
            Ok(Odds::even())
        }
    }
}

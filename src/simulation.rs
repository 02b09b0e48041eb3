//! Heuristic outcome model: an Elo-implied home probability nudged by a fixed linear
//! combination of the remaining features.
//!
//! The draw is not modelled. It takes a fixed baseline share and then whatever remains after
//! the home and away probabilities are settled, which keeps the three outcomes summing to one.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::OutcomeProbs;
use crate::features::Features;

pub const MIN_HOME_PROB: f64 = 0.1;
pub const MAX_HOME_PROB: f64 = 0.9;

/// Share withheld from the away side for the draw.
pub const DRAW_BASELINE: f64 = 0.25;

/// Floor applied to every outcome probability.
pub const PROB_FLOOR: f64 = 0.05;

pub const MAX_CONFIDENCE: f64 = 95.0;

const FORM_COEFFICIENT: f64 = 0.15;
const HEAD_TO_HEAD_COEFFICIENT: f64 = 0.1;
const XG_COEFFICIENT: f64 = 0.1;
const KEY_PLAYER_COEFFICIENT: f64 = 0.1;
const VENUE_COEFFICIENT: f64 = 0.2;
const MOTIVATION_COEFFICIENT: f64 = 0.1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulatedOutcome {
    pub probs: OutcomeProbs,
    /// The unadjusted logistic probability from the rating difference.
    pub elo_probability: f64,
    /// 50 to 95.
    pub confidence: f64,
}

/// Logistic Elo expectation for the home side.
pub fn elo_win_probability(elo_difference: f64) -> f64 {
    1.0 / (1.0 + 10f64.powf(-elo_difference / 400.0))
}

/// Confidence grows with the distance of the home probability from a coin toss.
pub fn confidence(home_prob: f64) -> f64 {
    f64::min(MAX_CONFIDENCE, 50.0 + (home_prob - 0.5).abs() * 90.0)
}

pub fn simulate(features: &Features) -> SimulatedOutcome {
    let elo_probability = elo_win_probability(features.elo_difference);
    let adjusted = elo_probability
        + FORM_COEFFICIENT * features.home_form
        - FORM_COEFFICIENT * features.away_form
        + HEAD_TO_HEAD_COEFFICIENT * features.head_to_head_win_rate
        + XG_COEFFICIENT * (features.home_xg_differential - features.away_xg_differential)
        + KEY_PLAYER_COEFFICIENT * (features.home_key_players - features.away_key_players)
        + VENUE_COEFFICIENT * features.venue_advantage
        + MOTIVATION_COEFFICIENT * features.motivation_differential;

    // home is settled first, then away, and the draw takes the remainder
    let home = adjusted.clamp(MIN_HOME_PROB, MAX_HOME_PROB);
    let away = f64::max(1.0 - home - DRAW_BASELINE, PROB_FLOOR);
    let draw = f64::max(1.0 - home - away, PROB_FLOOR);

    let outcome = SimulatedOutcome {
        probs: OutcomeProbs::new(home, draw, away),
        elo_probability,
        confidence: confidence(home),
    };
    debug!(
        "simulated: elo {:.4}, adjusted {adjusted:.4}, probs {:?}",
        elo_probability, outcome.probs
    );
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::assert_probs_bounded;
    use assert_float_eq::*;

    fn neutral_features() -> Features {
        Features {
            home_elo: 1600.0,
            away_elo: 1600.0,
            elo_difference: 0.0,
            home_form: 1.0 / 3.0,
            away_form: 1.0 / 3.0,
            head_to_head_win_rate: 0.0,
            home_attack_strength: 0.5,
            away_attack_strength: 0.5,
            home_defense_strength: 2.0,
            away_defense_strength: 2.0,
            home_xg_differential: 0.0,
            away_xg_differential: 0.0,
            home_key_players: 0.8,
            away_key_players: 0.8,
            venue_advantage: 0.0,
            home_motivation: 0.7,
            away_motivation: 0.7,
            motivation_differential: 0.0,
            market_confidence: 0.0,
            league_competitiveness: 0.8,
            season_stage: 0.5,
        }
    }

    #[test]
    fn elo_expectation() {
        assert_eq!(0.5, elo_win_probability(0.0));
        assert_float_absolute_eq!(1.0 / 1.1, elo_win_probability(400.0), 1e-12);
        assert_float_absolute_eq!(
            1.0,
            elo_win_probability(150.0) + elo_win_probability(-150.0),
            1e-12
        );
    }

    #[test]
    fn neutral_match() {
        let outcome = simulate(&neutral_features());
        assert_float_absolute_eq!(0.5, outcome.probs.home, 1e-12);
        assert_float_absolute_eq!(0.25, outcome.probs.away, 1e-12);
        assert_float_absolute_eq!(0.25, outcome.probs.draw, 1e-12);
        assert_float_absolute_eq!(50.0, outcome.confidence, 1e-9);
    }

    #[test]
    fn dominant_home_side_is_capped() {
        let features = Features {
            home_elo: 1800.0,
            away_elo: 1500.0,
            elo_difference: 300.0,
            home_form: 1.0,
            away_form: 0.0,
            head_to_head_win_rate: 1.0,
            venue_advantage: 0.5,
            ..neutral_features()
        };
        let outcome = simulate(&features);
        assert_eq!(MAX_HOME_PROB, outcome.probs.home);
        assert_eq!(PROB_FLOOR, outcome.probs.away);
        assert_float_absolute_eq!(PROB_FLOOR, outcome.probs.draw, 1e-12);
        assert_float_absolute_eq!(86.0, outcome.confidence, 1e-9);
    }

    #[test]
    fn dominant_away_side_is_capped() {
        let features = Features {
            home_elo: 1500.0,
            away_elo: 1800.0,
            elo_difference: -300.0,
            home_form: 0.0,
            away_form: 1.0,
            home_key_players: 0.0,
            away_key_players: 1.0,
            motivation_differential: -1.0,
            ..neutral_features()
        };
        let outcome = simulate(&features);
        assert_eq!(MIN_HOME_PROB, outcome.probs.home);
        assert_float_absolute_eq!(0.65, outcome.probs.away, 1e-12);
        assert_float_absolute_eq!(DRAW_BASELINE, outcome.probs.draw, 1e-12);
    }

    #[test]
    fn probabilities_bounded_and_complete() {
        for elo_difference in [-400.0, -150.0, -20.0, 0.0, 35.0, 120.0, 400.0] {
            for form_gap in [-1.0, -0.4, 0.0, 0.3, 1.0] {
                for venue in [0.0, 0.25, 0.5] {
                    let features = Features {
                        elo_difference,
                        home_form: f64::max(form_gap, 0.0),
                        away_form: f64::max(-form_gap, 0.0),
                        venue_advantage: venue,
                        ..neutral_features()
                    };
                    let outcome = simulate(&features);
                    assert_probs_bounded(&outcome.probs.as_array(), PROB_FLOOR, MAX_HOME_PROB);
                    assert!((50.0..=MAX_CONFIDENCE).contains(&outcome.confidence));
                }
            }
        }
    }

    #[test]
    fn confidence_is_capped() {
        assert_eq!(50.0, confidence(0.5));
        assert_float_absolute_eq!(77.0, confidence(0.2), 1e-9);
        assert_eq!(MAX_CONFIDENCE, confidence(1.0));
    }
}

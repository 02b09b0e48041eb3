//! Bookmaker prices: overround removal, blending with model probabilities, and value/Kelly
//! detection.

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::domain::{MatchResult, Odds, OutcomeProbs};
use crate::probs::SliceExt;

pub const MIN_BLENDED_PROB: f64 = 0.05;
pub const MAX_BLENDED_PROB: f64 = 0.9;

/// A fitted market: the fair probabilities implied by a set of decimal prices.
#[derive(Debug, Clone, PartialEq)]
pub struct Market {
    pub probs: Vec<f64>,
    pub prices: Vec<f64>,
    /// Booksum divided by the fair sum; above 1 is the bookmaker's margin.
    pub overround: f64,
}
impl Market {
    /// Removes the overround multiplicatively so that the probabilities add up to `fair_sum`.
    pub fn fit(prices: Vec<f64>, fair_sum: f64) -> Self {
        let mut probs = prices.invert();
        let overround = probs.normalise(fair_sum) / fair_sum;
        Self {
            probs,
            prices,
            overround,
        }
    }
}

/// Margin-free home/draw/away probabilities. Malformed odds fall back to the equal-odds
/// assumption.
pub fn implied_probabilities(odds: &Odds) -> OutcomeProbs {
    if !odds.is_valid() {
        debug!("odds {odds:?} are unusable, assuming an even market");
        return implied_probabilities(&Odds::even());
    }
    let market = Market::fit(odds.as_array().to_vec(), 1.0);
    OutcomeProbs::new(market.probs[0], market.probs[1], market.probs[2])
}

/// Booksum of the supplied odds, or 1 if they are unusable.
pub fn overround(odds: &Odds) -> f64 {
    if odds.is_valid() {
        Market::fit(odds.as_array().to_vec(), 1.0).overround
    } else {
        1.0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlendWeights {
    /// Weight of the market; the model takes the rest.
    pub market: f64,
    /// Scale of the form-differential nudge.
    pub form_adjustment: f64,
}

impl Default for BlendWeights {
    fn default() -> Self {
        Self {
            market: 0.6,
            form_adjustment: 0.1,
        }
    }
}

/// Weighted average of market and model probabilities, nudged towards the side in better
/// form. Home and away are clamped before the draw takes the remainder. If the draw then needs
/// lifting to its floor, the surplus comes off the larger of home and away.
pub fn blend(
    model: &OutcomeProbs,
    market: &OutcomeProbs,
    form_differential: f64,
    weights: &BlendWeights,
) -> OutcomeProbs {
    let model_weight = 1.0 - weights.market;
    let nudge = form_differential * weights.form_adjustment;
    let mut home = (weights.market * market.home + model_weight * model.home + nudge)
        .clamp(MIN_BLENDED_PROB, MAX_BLENDED_PROB);
    let mut away = (weights.market * market.away + model_weight * model.away - nudge)
        .clamp(MIN_BLENDED_PROB, MAX_BLENDED_PROB);
    let remainder = 1.0 - home - away;
    let draw = f64::max(remainder, MIN_BLENDED_PROB);
    let surplus = draw - remainder;
    if surplus > 0.0 {
        trace!("draw floored, shedding {surplus:.6} from the favourite");
        if home >= away {
            home -= surplus;
        } else {
            away -= surplus;
        }
    }
    let blended = OutcomeProbs::new(home, draw, away);
    debug!("blended {model:?} with {market:?}: {blended:?}");
    blended
}

/// Full Kelly stake fraction for a decimal price.
pub fn kelly_fraction(prob: f64, odds: f64) -> f64 {
    (prob * odds - 1.0) / (odds - 1.0)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValueThresholds {
    /// Minimum additive edge, `prob - 1/odds`, for a price to count as value.
    pub edge: f64,
    /// Upper bound on the suggested stake.
    pub kelly_cap: f64,
}

impl Default for ValueThresholds {
    fn default() -> Self {
        Self {
            edge: 0.05,
            kelly_cap: 0.25,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValueBet {
    pub result: MatchResult,
    pub probability: f64,
    pub odds: f64,
    pub edge: f64,
    pub is_value: bool,
    pub kelly_fraction: f64,
}
impl ValueBet {
    pub fn edge_percentage(&self) -> f64 {
        self.edge * 100.0
    }

    pub fn label(&self) -> &'static str {
        if self.is_value {
            "Value"
        } else {
            "No Value"
        }
    }
}

pub fn detect_value(
    result: MatchResult,
    probability: f64,
    odds: f64,
    thresholds: &ValueThresholds,
) -> ValueBet {
    if !(odds.is_finite() && odds > 1.0) {
        return ValueBet {
            result,
            probability,
            odds,
            edge: 0.0,
            is_value: false,
            kelly_fraction: 0.0,
        };
    }
    let edge = probability - 1.0 / odds;
    let is_value = edge > thresholds.edge;
    let kelly_fraction = if is_value {
        kelly_fraction(probability, odds).clamp(0.0, thresholds.kelly_cap)
    } else {
        0.0
    };
    ValueBet {
        result,
        probability,
        odds,
        edge,
        is_value,
        kelly_fraction,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValueBets {
    pub home: ValueBet,
    pub draw: ValueBet,
    pub away: ValueBet,
}
impl ValueBets {
    pub fn get(&self, result: MatchResult) -> &ValueBet {
        match result {
            MatchResult::HomeWin => &self.home,
            MatchResult::Draw => &self.draw,
            MatchResult::AwayWin => &self.away,
        }
    }

    pub fn any(&self) -> bool {
        self.home.is_value || self.draw.is_value || self.away.is_value
    }
}

pub fn detect_values(probs: &OutcomeProbs, odds: &Odds, thresholds: &ValueThresholds) -> ValueBets {
    let detect = |result| detect_value(result, probs.get(result), odds.get(result), thresholds);
    ValueBets {
        home: detect(MatchResult::HomeWin),
        draw: detect(MatchResult::Draw),
        away: detect(MatchResult::AwayWin),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{assert_probs_bounded, assert_slice_f64_relative};
    use assert_float_eq::*;
    use strum::IntoEnumIterator;

    #[test]
    fn fit_multiplicative() {
        {
            let market = Market::fit(vec![10.0, 5.0, 3.333, 2.5], 1.0);
            assert_slice_f64_relative(&[0.1, 0.2, 0.3, 0.4], &market.probs, 0.001);
            assert_float_absolute_eq!(1.0, market.overround, 0.001);
        }
        {
            let market = Market::fit(vec![9.0909, 4.5454, 3.0303, 2.273], 1.0);
            assert_slice_f64_relative(&[0.1, 0.2, 0.3, 0.4], &market.probs, 0.001);
            assert_float_absolute_eq!(1.1, market.overround, 0.001);
        }
    }

    #[test]
    fn implied_from_odds() {
        let probs = implied_probabilities(&Odds::new(2.0, 3.2, 4.0));
        let booksum = 0.5 + 0.3125 + 0.25;
        assert_float_relative_eq!(0.5 / booksum, probs.home);
        assert_float_relative_eq!(0.3125 / booksum, probs.draw);
        assert_float_relative_eq!(0.25 / booksum, probs.away);
        assert_float_absolute_eq!(1.0, probs.sum(), 1e-12);
        assert_float_absolute_eq!(booksum, overround(&Odds::new(2.0, 3.2, 4.0)), 1e-12);
    }

    #[test]
    fn implied_from_malformed_odds() {
        let probs = implied_probabilities(&Odds::new(0.0, 3.2, 4.0));
        assert_float_absolute_eq!(1.0 / 3.0, probs.home, 1e-12);
        assert_float_absolute_eq!(1.0 / 3.0, probs.draw, 1e-12);
        assert_float_absolute_eq!(1.0 / 3.0, probs.away, 1e-12);
        assert_eq!(1.0, overround(&Odds::new(2.0, 0.5, 4.0)));
    }

    #[test]
    fn blend_weighted_average() {
        let model = OutcomeProbs::new(0.5, 0.3, 0.2);
        let market = OutcomeProbs::new(0.4, 0.3, 0.3);
        let blended = blend(&model, &market, 0.0, &BlendWeights::default());
        assert_float_absolute_eq!(0.44, blended.home, 1e-12);
        assert_float_absolute_eq!(0.26, blended.away, 1e-12);
        assert_float_absolute_eq!(0.3, blended.draw, 1e-12);
    }

    #[test]
    fn blend_form_nudge() {
        let model = OutcomeProbs::new(0.5, 0.3, 0.2);
        let market = OutcomeProbs::new(0.4, 0.3, 0.3);
        let blended = blend(&model, &market, 0.5, &BlendWeights::default());
        assert_float_absolute_eq!(0.49, blended.home, 1e-12);
        assert_float_absolute_eq!(0.21, blended.away, 1e-12);
        assert_float_absolute_eq!(0.3, blended.draw, 1e-12);
    }

    #[test]
    fn blend_clamps_before_draw() {
        let model = OutcomeProbs::new(0.9, 0.05, 0.05);
        let market = OutcomeProbs::new(0.95, 0.03, 0.02);
        let blended = blend(&model, &market, 1.0, &BlendWeights::default());
        assert_eq!(MIN_BLENDED_PROB, blended.away);
        assert_eq!(MIN_BLENDED_PROB, blended.draw);
        assert_float_absolute_eq!(0.9, blended.home, 1e-12);
        assert_float_absolute_eq!(1.0, blended.sum(), 1e-12);
    }

    #[test]
    fn blend_sheds_surplus_from_favourite() {
        let model = OutcomeProbs::new(0.55, 0.02, 0.43);
        let market = OutcomeProbs::new(0.55, 0.02, 0.43);
        let blended = blend(&model, &market, 0.0, &BlendWeights::default());
        assert_eq!(MIN_BLENDED_PROB, blended.draw);
        assert_float_absolute_eq!(0.52, blended.home, 1e-12);
        assert_float_absolute_eq!(0.43, blended.away, 1e-12);
    }

    #[test]
    fn blend_always_bounded() {
        let candidates = [
            OutcomeProbs::new(0.9, 0.05, 0.05),
            OutcomeProbs::new(0.05, 0.05, 0.9),
            OutcomeProbs::new(0.34, 0.33, 0.33),
            OutcomeProbs::new(0.6, 0.01, 0.39),
            OutcomeProbs::new(0.2, 0.6, 0.2),
        ];
        for model in &candidates {
            for market in &candidates {
                for form_differential in [-1.0, -0.3, 0.0, 0.45, 1.0] {
                    let blended = blend(model, market, form_differential, &BlendWeights::default());
                    assert_probs_bounded(&blended.as_array(), MIN_BLENDED_PROB, MAX_BLENDED_PROB);
                }
            }
        }
    }

    #[test]
    fn kelly() {
        assert_float_absolute_eq!(0.2, kelly_fraction(0.6, 2.0), 1e-12);
        assert!(kelly_fraction(0.4, 2.0) < 0.0);
    }

    #[test]
    fn value_detected() {
        let bet = detect_value(MatchResult::HomeWin, 0.6, 2.0, &ValueThresholds::default());
        assert!(bet.is_value);
        assert_float_absolute_eq!(0.1, bet.edge, 1e-12);
        assert_float_absolute_eq!(10.0, bet.edge_percentage(), 1e-9);
        assert_float_absolute_eq!(0.2, bet.kelly_fraction, 1e-12);
        assert_eq!("Value", bet.label());
    }

    #[test]
    fn kelly_capped() {
        let bet = detect_value(MatchResult::AwayWin, 0.5, 5.0, &ValueThresholds::default());
        assert!(bet.is_value);
        assert_eq!(0.25, bet.kelly_fraction);
    }

    #[test]
    fn marginal_edge_is_not_value() {
        let bet = detect_value(MatchResult::Draw, 0.33, 3.2, &ValueThresholds::default());
        assert!(!bet.is_value);
        assert_eq!(0.0, bet.kelly_fraction);
        assert_eq!("No Value", bet.label());
    }

    #[test]
    fn unusable_price_is_not_value() {
        let bet = detect_value(MatchResult::HomeWin, 0.9, 0.0, &ValueThresholds::default());
        assert!(!bet.is_value);
        assert_eq!(0.0, bet.edge);
        assert_eq!(0.0, bet.kelly_fraction);
    }

    #[test]
    fn kelly_bounded_and_zero_without_value() {
        let thresholds = ValueThresholds::default();
        for prob in [0.05, 0.2, 0.35, 0.5, 0.65, 0.8, 0.9] {
            for odds in [1.01, 1.5, 2.0, 3.2, 4.0, 7.5, 21.0] {
                let bet = detect_value(MatchResult::HomeWin, prob, odds, &thresholds);
                assert!((0.0..=thresholds.kelly_cap).contains(&bet.kelly_fraction));
                if !bet.is_value {
                    assert_eq!(0.0, bet.kelly_fraction);
                }
            }
        }
    }

    #[test]
    fn fair_odds_yield_no_value() {
        let probs = OutcomeProbs::new(0.5, 0.28, 0.22);
        let odds = Odds::new(1.0 / 0.5, 1.0 / 0.28, 1.0 / 0.22);
        let bets = detect_values(&probs, &odds, &ValueThresholds::default());
        assert!(!bets.any());
        for result in MatchResult::iter() {
            assert_eq!("No Value", bets.get(result).label());
            assert_eq!(result, bets.get(result).result);
        }
    }
}

//! Assembly of the full prediction record: features, heuristic simulation, expected goals,
//! scoreline aggregation, market blending and value detection.

use std::ops::RangeInclusive;

use anyhow::bail;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::cache::TtlCache;
use crate::domain::{MatchInput, MatchResult, OutcomeProbs, Score, Side};
use crate::factorial::MAX_FACTORIAL;
use crate::features::{extract, Features};
use crate::goals::{expected_goals, ExpectedGoals};
use crate::market::{
    blend, detect_values, implied_probabilities, overround, BlendWeights, ValueBets,
    ValueThresholds,
};
use crate::scoregrid::{most_likely, poisson_grid, Outcome};
use crate::simulation::{confidence, simulate};

/// Tunable constants of the prediction pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Weight of the bookmaker-implied probabilities in the blend; the model takes the rest.
    pub market_weight: f64,
    pub form_adjustment: f64,
    /// Minimum additive edge, `prob - 1/odds`, for a value flag.
    pub value_threshold: f64,
    pub kelly_cap: f64,
    pub season_stage: f64,
    /// Grid bound for the Poisson home/draw/away probabilities.
    pub outcome_max_goals: u8,
    /// Grid bound for the totals and both-teams-to-score markets.
    pub totals_max_goals: u8,
    /// Grid bound for the most-likely scoreline search.
    pub correct_score_max_goals: u8,
    /// Over means strictly more goals than this; 2 gives the usual 2.5 line.
    pub totals_line: u8,
}
impl Config {
    pub fn validate(&self) -> Result<(), anyhow::Error> {
        const UNIT_INTERVAL: RangeInclusive<f64> = 0.0..=1.0;
        const VALID_MAX_GOALS: RangeInclusive<u8> = 1..=MAX_FACTORIAL;
        if !UNIT_INTERVAL.contains(&self.market_weight) {
            bail!("market weight must be in the range {UNIT_INTERVAL:?}");
        }
        if !UNIT_INTERVAL.contains(&self.form_adjustment) {
            bail!("form adjustment must be in the range {UNIT_INTERVAL:?}");
        }
        if !UNIT_INTERVAL.contains(&self.value_threshold) {
            bail!("value threshold must be in the range {UNIT_INTERVAL:?}");
        }
        if !(self.kelly_cap > 0.0 && self.kelly_cap <= 1.0) {
            bail!("Kelly cap must be in the range (0, 1]");
        }
        if !UNIT_INTERVAL.contains(&self.season_stage) {
            bail!("season stage must be in the range {UNIT_INTERVAL:?}");
        }
        for (name, max_goals) in [
            ("outcome", self.outcome_max_goals),
            ("totals", self.totals_max_goals),
            ("correct score", self.correct_score_max_goals),
        ] {
            if !VALID_MAX_GOALS.contains(&max_goals) {
                bail!("{name} max goals must be in the range {VALID_MAX_GOALS:?}");
            }
        }
        if self.totals_line >= self.totals_max_goals.saturating_mul(2) {
            bail!("totals line must be below the combined totals grid bound");
        }
        Ok(())
    }

    pub fn blend_weights(&self) -> BlendWeights {
        BlendWeights {
            market: self.market_weight,
            form_adjustment: self.form_adjustment,
        }
    }

    pub fn value_thresholds(&self) -> ValueThresholds {
        ValueThresholds {
            edge: self.value_threshold,
            kelly_cap: self.kelly_cap,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            market_weight: 0.6,
            form_adjustment: 0.1,
            value_threshold: 0.05,
            kelly_cap: 0.25,
            season_stage: 0.5,
            outcome_max_goals: 6,
            totals_max_goals: 8,
            correct_score_max_goals: 5,
            totals_line: 2,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BothTeamsToScore {
    pub flag: bool,
    pub probability: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverUnder {
    /// The half-goal line, e.g. 2.5.
    pub line: f64,
    pub over: bool,
    pub over_probability: f64,
    pub under_probability: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdvancedStats {
    pub home_elo: f64,
    pub away_elo: f64,
    pub home_form: f64,
    pub away_form: f64,
    pub home_attack_strength: f64,
    pub away_attack_strength: f64,
    pub venue_advantage: f64,
    pub motivation_differential: f64,
    pub market_confidence: f64,
    pub total_expected_goals: f64,
    pub league_competitiveness: f64,
    /// Heuristic probabilities before blending.
    pub model: OutcomeProbs,
    /// Margin-free bookmaker probabilities.
    pub market_implied: OutcomeProbs,
    /// Independent-Poisson probabilities from the expected goals; reported only.
    pub poisson: OutcomeProbs,
    pub overround: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub home_team: String,
    pub away_team: String,
    pub result: MatchResult,
    /// 50 to 95.
    pub confidence: f64,
    pub probabilities: OutcomeProbs,
    pub expected_goals: ExpectedGoals,
    pub expected_goals_label: String,
    pub btts: BothTeamsToScore,
    pub over_under: OverUnder,
    pub most_likely_score: Score,
    pub most_likely_score_probability: f64,
    pub value: ValueBets,
    pub advanced: AdvancedStats,
}

/// Picks the strictly most probable outcome. Any tie at the top goes to the draw.
pub fn select_result(probs: &OutcomeProbs) -> MatchResult {
    if probs.home > f64::max(probs.draw, probs.away) {
        MatchResult::HomeWin
    } else if probs.away > f64::max(probs.home, probs.draw) {
        MatchResult::AwayWin
    } else {
        MatchResult::Draw
    }
}

/// Memoisation key for a fixture.
pub fn fixture_key(input: &MatchInput) -> String {
    format!("{} v {}", input.home_team, input.away_team)
}

#[derive(Debug, Clone, Default)]
pub struct Predictor {
    config: Config,
}
impl Predictor {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn predict(&self, input: &MatchInput) -> Prediction {
        let config = &self.config;
        let features = extract(input, config.season_stage);
        let simulated = simulate(&features);
        let xg = expected_goals(&input.home, &input.away, &input.league);

        let odds = &input.market.current;
        let market_implied = implied_probabilities(odds);
        let probabilities = blend(
            &simulated.probs,
            &market_implied,
            features.form_differential(),
            &config.blend_weights(),
        );
        let result = select_result(&probabilities);
        let value = detect_values(&probabilities, odds, &config.value_thresholds());

        let totals_grid = poisson_grid(xg.home, xg.away, config.totals_max_goals);
        let btts_probability = Outcome::BothTeamsScore.gather(&totals_grid);
        let over_probability = Outcome::GoalsOver(config.totals_line).gather(&totals_grid);
        let under_probability =
            Outcome::GoalsUnder(config.totals_line.saturating_add(1)).gather(&totals_grid);

        let score_grid = poisson_grid(xg.home, xg.away, config.correct_score_max_goals);
        let scoreline = most_likely(&score_grid);

        let outcome_grid = poisson_grid(xg.home, xg.away, config.outcome_max_goals);
        let poisson = OutcomeProbs::new(
            Outcome::Win(Side::Home).gather(&outcome_grid),
            Outcome::Draw.gather(&outcome_grid),
            Outcome::Win(Side::Away).gather(&outcome_grid),
        );

        let prediction = Prediction {
            home_team: input.home_team.clone(),
            away_team: input.away_team.clone(),
            result,
            confidence: confidence(probabilities.home),
            probabilities,
            expected_goals_label: xg.to_string(),
            btts: BothTeamsToScore {
                flag: btts_probability > 0.5,
                probability: btts_probability,
            },
            over_under: OverUnder {
                line: config.totals_line as f64 + 0.5,
                over: over_probability > 0.5,
                over_probability,
                under_probability,
            },
            most_likely_score: scoreline.score,
            most_likely_score_probability: scoreline.probability,
            value,
            advanced: advanced_stats(
                &features,
                &xg,
                simulated.probs,
                market_implied,
                poisson,
                overround(odds),
            ),
            expected_goals: xg,
        };
        debug!(
            "{} v {}: {} at {:.1}%, xG {}",
            prediction.home_team,
            prediction.away_team,
            prediction.result,
            prediction.confidence,
            prediction.expected_goals_label
        );
        prediction
    }

    /// Returns a memoised prediction for the fixture while it is younger than the cache TTL,
    /// otherwise predicts afresh and caches the outcome.
    pub fn predict_cached(
        &self,
        cache: &mut TtlCache<Prediction>,
        input: &MatchInput,
        now: DateTime<Utc>,
    ) -> Prediction {
        let key = fixture_key(input);
        if let Some(prediction) = cache.get(&key, now) {
            debug!("cache hit for {key}");
            return prediction.clone();
        }
        let prediction = self.predict(input);
        cache.insert(key, prediction.clone(), now);
        prediction
    }
}

fn advanced_stats(
    features: &Features,
    xg: &ExpectedGoals,
    model: OutcomeProbs,
    market_implied: OutcomeProbs,
    poisson: OutcomeProbs,
    overround: f64,
) -> AdvancedStats {
    AdvancedStats {
        home_elo: features.home_elo,
        away_elo: features.away_elo,
        home_form: features.home_form,
        away_form: features.away_form,
        home_attack_strength: features.home_attack_strength,
        away_attack_strength: features.away_attack_strength,
        venue_advantage: features.venue_advantage,
        motivation_differential: features.motivation_differential,
        market_confidence: features.market_confidence,
        total_expected_goals: xg.total(),
        league_competitiveness: features.league_competitiveness,
        model,
        market_implied,
        poisson,
        overround,
    }
}

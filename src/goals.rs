//! Expected-goal rates from attack and defence ratios relative to the league average.

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::{LeagueConfig, TeamStats};
use crate::features::MIN_GOALS_AGAINST;

/// Lowest rate handed to the Poisson distribution.
pub const MIN_EXPECTED_GOALS: f64 = 0.1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpectedGoals {
    pub home: f64,
    pub away: f64,
}
impl ExpectedGoals {
    pub fn new(home: f64, away: f64) -> Self {
        Self { home, away }
    }

    pub fn total(&self) -> f64 {
        self.home + self.away
    }
}

impl Display for ExpectedGoals {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.1} - {:.1}", self.home, self.away)
    }
}

/// Scoring rate relative to an average side in the league.
fn attack_ratio(stats: &TeamStats, team_avg_goals: f64) -> f64 {
    f64::max(stats.goals_for, 0.0) / team_avg_goals
}

/// Conceding rate relative to an average side; above 1 is a leaky defence.
fn defense_ratio(stats: &TeamStats, team_avg_goals: f64) -> f64 {
    f64::max(stats.goals_against, MIN_GOALS_AGAINST) / team_avg_goals
}

/// The home side gets the full league home advantage plus its own bonus; the away side loses
/// half the league advantage and gains its away-form bonus.
pub fn expected_goals(home: &TeamStats, away: &TeamStats, league: &LeagueConfig) -> ExpectedGoals {
    let team_avg_goals = league.team_avg_goals();
    let home_bonus = home.home_advantage.unwrap_or(0.0);
    let away_bonus = away.away_form.unwrap_or(0.0);

    let home_rate = attack_ratio(home, team_avg_goals)
        * defense_ratio(away, team_avg_goals)
        * team_avg_goals
        * (1.0 + league.home_advantage + home_bonus);
    let away_rate = attack_ratio(away, team_avg_goals)
        * defense_ratio(home, team_avg_goals)
        * team_avg_goals
        * (1.0 - league.home_advantage / 2.0 + away_bonus);

    let expected = ExpectedGoals::new(
        f64::max(home_rate, MIN_EXPECTED_GOALS),
        f64::max(away_rate, MIN_EXPECTED_GOALS),
    );
    debug!("expected goals: {expected}");
    expected
}

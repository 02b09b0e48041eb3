//! Joint scoreline distributions over a truncated `(max_goals + 1)²` grid of independent
//! Poisson goal counts. Rows index home goals, columns index away goals.
//!
//! Truncation drops the mass where either side exceeds `max_goals`, so aggregates fall short of
//! one by roughly the two Poisson tails. A bound of 8 keeps that shortfall below the third
//! decimal for realistic rates; smaller bounds are fine for correct-score searches.

use tracing::trace;

use crate::domain::{Score, Side};
use crate::factorial::Lookup;
use crate::linear::Matrix;
use crate::poisson;

#[derive(Debug, Clone, PartialEq)]
pub struct ProbableScoreOutcome {
    pub score: Score,
    pub probability: f64,
}

pub fn allocate(max_goals: u8) -> Matrix<f64> {
    let dim = max_goals as usize + 1;
    Matrix::allocate(dim, dim)
}

/// Fills `scoregrid` with the product of two independent Poisson mass functions.
pub fn from_univariate_poisson(home_rate: f64, away_rate: f64, scoregrid: &mut Matrix<f64>) {
    let factorial = Lookup::default();
    let home_probs = (0..scoregrid.rows())
        .map(|goals| poisson::univariate(goals as u8, home_rate, &factorial))
        .collect::<Vec<_>>();
    let away_probs = (0..scoregrid.cols())
        .map(|goals| poisson::univariate(goals as u8, away_rate, &factorial))
        .collect::<Vec<_>>();
    for (home_goals, home_prob) in home_probs.iter().enumerate() {
        let row_slice = scoregrid.row_slice_mut(home_goals);
        for (away_goals, away_prob) in away_probs.iter().enumerate() {
            row_slice[away_goals] = home_prob * away_prob;
        }
    }
}

pub fn poisson_grid(home_rate: f64, away_rate: f64, max_goals: u8) -> Matrix<f64> {
    let mut scoregrid = allocate(max_goals);
    from_univariate_poisson(home_rate, away_rate, &mut scoregrid);
    trace!("scoregrid for {home_rate:.3}/{away_rate:.3}:\n{}", scoregrid.verbose());
    scoregrid
}

/// Sums the cells whose `(home_goals, away_goals)` satisfy `predicate`.
pub fn sum_where(scoregrid: &Matrix<f64>, predicate: impl Fn(u8, u8) -> bool) -> f64 {
    let mut prob = 0.0;
    for row in 0..scoregrid.rows() {
        for col in 0..scoregrid.cols() {
            if predicate(row as u8, col as u8) {
                prob += scoregrid[(row, col)];
            }
        }
    }
    prob
}

/// Joint probability of the scorelines satisfying `predicate`, with both counts in
/// `0..=max_goals`.
pub fn joint_sum(
    home_rate: f64,
    away_rate: f64,
    max_goals: u8,
    predicate: impl Fn(u8, u8) -> bool,
) -> f64 {
    sum_where(&poisson_grid(home_rate, away_rate, max_goals), predicate)
}

/// The single most probable scoreline. Ties go to the first cell in ascending
/// `(home, away)` order.
pub fn most_likely(scoregrid: &Matrix<f64>) -> ProbableScoreOutcome {
    let mut best = ProbableScoreOutcome {
        score: Score::new(0, 0),
        probability: f64::NEG_INFINITY,
    };
    for row in 0..scoregrid.rows() {
        for col in 0..scoregrid.cols() {
            let probability = scoregrid[(row, col)];
            if probability > best.probability {
                best = ProbableScoreOutcome {
                    score: Score::new(row as u8, col as u8),
                    probability,
                };
            }
        }
    }
    best
}

#[derive(Clone, Debug, Hash, PartialEq, Eq)]
pub enum Outcome {
    Win(Side),
    Draw,
    /// Total goals strictly below the given count.
    GoalsUnder(u8),
    /// Total goals strictly above the given count.
    GoalsOver(u8),
    BothTeamsScore,
    CorrectScore(Score),
}
impl Outcome {
    pub fn gather(&self, scoregrid: &Matrix<f64>) -> f64 {
        match self {
            Outcome::Win(Side::Home) => sum_where(scoregrid, |home, away| home > away),
            Outcome::Win(Side::Away) => sum_where(scoregrid, |home, away| home < away),
            Outcome::Draw => sum_where(scoregrid, |home, away| home == away),
            Outcome::GoalsUnder(goals) => {
                sum_where(scoregrid, |home, away| (home as u16 + away as u16) < *goals as u16)
            }
            Outcome::GoalsOver(goals) => {
                sum_where(scoregrid, |home, away| (home as u16 + away as u16) > *goals as u16)
            }
            Outcome::BothTeamsScore => sum_where(scoregrid, |home, away| home > 0 && away > 0),
            Outcome::CorrectScore(score) => Self::gather_correct_score(score, scoregrid),
        }
    }

    fn gather_correct_score(score: &Score, scoregrid: &Matrix<f64>) -> f64 {
        let (row, col) = (score.home as usize, score.away as usize);
        if row < scoregrid.rows() && col < scoregrid.cols() {
            scoregrid[(row, col)]
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests;

use super::*;
use crate::factorial::Lookup;
use crate::probs::SliceExt;
use assert_float_eq::*;

fn create_test_4x4_scoregrid() -> Matrix<f64> {
    let mut scoregrid = Matrix::allocate(4, 4);
    scoregrid.row_slice_mut(0).copy_from_slice(&[0.04, 0.03, 0.02, 0.01]);
    scoregrid.row_slice_mut(1).copy_from_slice(&[0.08, 0.06, 0.04, 0.02]);
    scoregrid.row_slice_mut(2).copy_from_slice(&[0.12, 0.09, 0.06, 0.03]);
    scoregrid.row_slice_mut(3).copy_from_slice(&[0.16, 0.12, 0.08, 0.04]);
    scoregrid
}

#[test]
pub fn outcome_win_gather() {
    let scoregrid = create_test_4x4_scoregrid();
    assert_float_absolute_eq!(0.65, Outcome::Win(Side::Home).gather(&scoregrid), 1e-12);
    assert_float_absolute_eq!(0.15, Outcome::Win(Side::Away).gather(&scoregrid), 1e-12);
}

#[test]
pub fn outcome_draw_gather() {
    let scoregrid = create_test_4x4_scoregrid();
    assert_float_absolute_eq!(0.2, Outcome::Draw.gather(&scoregrid), 1e-12);
}

#[test]
pub fn outcome_goals_ou_gather() {
    let scoregrid = create_test_4x4_scoregrid();
    assert_float_absolute_eq!(0.35, Outcome::GoalsUnder(3).gather(&scoregrid), 1e-12);
    assert_float_absolute_eq!(0.65, Outcome::GoalsOver(2).gather(&scoregrid), 1e-12);
}

#[test]
pub fn outcome_btts_gather() {
    let scoregrid = create_test_4x4_scoregrid();
    assert_float_absolute_eq!(0.54, Outcome::BothTeamsScore.gather(&scoregrid), 1e-12);
}

#[test]
pub fn outcome_correct_score_gather() {
    let scoregrid = create_test_4x4_scoregrid();
    assert_eq!(0.04, Outcome::CorrectScore(Score::new(0, 0)).gather(&scoregrid));
    assert_eq!(0.09, Outcome::CorrectScore(Score::new(2, 1)).gather(&scoregrid));
    assert_eq!(0.0, Outcome::CorrectScore(Score::new(4, 0)).gather(&scoregrid));
}

#[test]
pub fn most_likely_in_fixture() {
    let scoregrid = create_test_4x4_scoregrid();
    let outcome = most_likely(&scoregrid);
    assert_eq!(Score::new(3, 0), outcome.score);
    assert_eq!(0.16, outcome.probability);
}

#[test]
pub fn most_likely_tie_goes_to_first_cell() {
    let mut scoregrid = Matrix::allocate(3, 3);
    scoregrid[(1, 1)] = 0.3;
    scoregrid[(0, 2)] = 0.3;
    scoregrid[(2, 0)] = 0.3;
    assert_eq!(Score::new(0, 2), most_likely(&scoregrid).score);
}

#[test]
pub fn poisson_cells() {
    let factorial = Lookup::default();
    let scoregrid = poisson_grid(1.4, 0.9, 6);
    assert_eq!(7, scoregrid.rows());
    assert_eq!(7, scoregrid.cols());
    assert_float_relative_eq!(
        poisson::univariate(2, 1.4, &factorial) * poisson::univariate(1, 0.9, &factorial),
        scoregrid[(2, 1)]
    );
}

#[test]
pub fn partition_shortfall_bounded_by_tails() {
    let factorial = Lookup::default();
    for (home_rate, away_rate) in [(1.5, 1.2), (2.8, 0.4), (0.3, 3.1)] {
        for max_goals in [5, 6, 8] {
            let scoregrid = poisson_grid(home_rate, away_rate, max_goals);
            let home = Outcome::Win(Side::Home).gather(&scoregrid);
            let draw = Outcome::Draw.gather(&scoregrid);
            let away = Outcome::Win(Side::Away).gather(&scoregrid);
            let total = home + draw + away;
            assert_float_absolute_eq!(scoregrid.flatten().sum(), total, 1e-12);

            let covered = poisson::cdf(max_goals, home_rate, &factorial)
                * poisson::cdf(max_goals, away_rate, &factorial);
            assert_float_absolute_eq!(covered, total, 1e-12);

            let tails = poisson::tail(max_goals, home_rate, &factorial)
                + poisson::tail(max_goals, away_rate, &factorial);
            assert!(total <= 1.0);
            assert!(1.0 - total <= tails + 1e-12, "shortfall {} exceeds tails {tails}", 1.0 - total);
        }
    }
}

#[test]
pub fn wider_grid_is_more_complete() {
    let narrow = poisson_grid(1.7, 1.3, 5).flatten().sum();
    let wide = poisson_grid(1.7, 1.3, 8).flatten().sum();
    assert!(wide > narrow);
    assert!(1.0 - wide < 1e-3);
}

#[test]
pub fn joint_sum_matches_gather() {
    let scoregrid = poisson_grid(1.6, 1.1, 8);
    assert_float_absolute_eq!(
        Outcome::GoalsOver(2).gather(&scoregrid),
        joint_sum(1.6, 1.1, 8, |home, away| home + away > 2),
        1e-15
    );
    assert_float_absolute_eq!(
        Outcome::BothTeamsScore.gather(&scoregrid),
        joint_sum(1.6, 1.1, 8, |home, away| home > 0 && away > 0),
        1e-15
    );
    assert_float_absolute_eq!(
        1.0,
        Outcome::GoalsOver(2).gather(&scoregrid) + Outcome::GoalsUnder(3).gather(&scoregrid),
        1e-4
    );
}

#[test]
pub fn lopsided_rates_favour_home_scorelines() {
    let scoregrid = poisson_grid(3.0, 0.3, 8);
    let outcome = most_likely(&scoregrid);
    assert!(outcome.score.home > outcome.score.away, "{:?}", outcome);
    assert!(
        [Score::new(2, 0), Score::new(3, 0)].contains(&outcome.score),
        "{:?}",
        outcome
    );
    assert!(Outcome::GoalsOver(2).gather(&scoregrid) > 0.5);
}

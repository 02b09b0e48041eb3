//! Testing helpers.

use assert_float_eq::*;

pub fn assert_slice_f64_near(expected: &[f64], actual: &[f64], distance: u32) {
    assert_eq!(
        expected.len(),
        actual.len(),
        "lengths do not match: {} ≠ {}",
        expected.len(),
        actual.len()
    );
    for (index, &expected) in expected.iter().enumerate() {
        let actual = actual[index];
        if actual != expected {
            assert_f64_near!(expected, actual, distance);
        }
    }
}

pub fn assert_slice_f64_relative(expected: &[f64], actual: &[f64], epsilon: f64) {
    assert_eq!(
        expected.len(),
        actual.len(),
        "lengths do not match: {} ≠ {}",
        expected.len(),
        actual.len()
    );
    for (index, &expected) in expected.iter().enumerate() {
        let actual = actual[index];
        if actual != expected {
            assert_float_relative_eq!(expected, actual, epsilon);
        }
    }
}

/// Asserts that every probability lies within `[lower, upper]` and that they sum to one.
pub fn assert_probs_bounded(probs: &[f64], lower: f64, upper: f64) {
    for &prob in probs {
        assert!(
            (lower..=upper).contains(&prob),
            "probability {prob} outside [{lower}, {upper}] in {probs:?}"
        );
    }
    let sum: f64 = probs.iter().sum();
    assert_float_absolute_eq!(1.0, sum, 1e-12);
}

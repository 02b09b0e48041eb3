use crate::factorial::{Factorial, MAX_FACTORIAL};

/// Probability of exactly `k` events given the rate `lambda`. Counts past the factorial table
/// bound contribute nothing.
#[inline]
pub fn univariate(k: u8, lambda: f64, factorial: &impl Factorial) -> f64 {
    if k > MAX_FACTORIAL {
        return 0.0;
    }
    lambda.powi(k as i32) * f64::exp(-lambda) / factorial.get(k) as f64
}

/// Probability of at most `k` events.
pub fn cdf(k: u8, lambda: f64, factorial: &impl Factorial) -> f64 {
    (0..=k).map(|i| univariate(i, lambda, factorial)).sum()
}

/// Probability mass lying strictly above `k`.
pub fn tail(k: u8, lambda: f64, factorial: &impl Factorial) -> f64 {
    f64::max(0.0, 1.0 - cdf(k, lambda, factorial))
}

//! Integer factorials for the Poisson mass function.
//!
//! Factorials are exact in `u128` and converted to `f64` only at the point of division.

/// Largest `n` whose factorial fits in a `u128`. `35!` is roughly `1.03e40`, past
/// `u128::MAX` at roughly `3.4e38`. Goal grid bounds are validated against this.
pub const MAX_FACTORIAL: u8 = 34;

pub trait Factorial {
    fn get(&self, n: u8) -> u128;
}

#[derive(Default)]
pub struct Calculator;

impl Factorial for Calculator {
    #[inline]
    fn get(&self, n: u8) -> u128 {
        assert!(n <= MAX_FACTORIAL, "{n}! overflows");
        let mut product = 1u128;
        for i in 2..=n {
            product *= i as u128;
        }
        product
    }
}

const MAX_ENTRIES: usize = MAX_FACTORIAL as usize + 1;

/// Precomputed factorials for `0..=34`.
pub struct Lookup {
    entries: [u128; MAX_ENTRIES],
}
impl Factorial for Lookup {
    #[inline]
    fn get(&self, n: u8) -> u128 {
        assert!(n <= MAX_FACTORIAL, "{n}! overflows");
        self.entries[n as usize]
    }
}

impl Default for Lookup {
    fn default() -> Self {
        let mut entries = [1u128; MAX_ENTRIES];
        for i in 2..MAX_ENTRIES {
            entries[i] = i as u128 * entries[i - 1];
        }
        Self { entries }
    }
}

//! Utilities for working with probabilities.

pub trait SliceExt {
    fn sum(&self) -> f64;
    fn normalise(&mut self, target: f64) -> f64;
    fn scale(&mut self, factor: f64);
    fn invert(&self) -> Vec<f64>;
}
impl SliceExt for [f64] {
    fn sum(&self) -> f64 {
        self.iter().sum()
    }

    /// Scales the elements so that they add up to `target`, returning the original sum. A slice
    /// summing to zero is left untouched.
    fn normalise(&mut self, target: f64) -> f64 {
        let sum = self.sum();
        if sum > 0.0 {
            self.scale(target / sum);
        }
        sum
    }

    fn scale(&mut self, factor: f64) {
        for element in self {
            *element *= factor;
        }
    }

    fn invert(&self) -> Vec<f64> {
        self.iter().map(|element| 1.0 / element).collect()
    }
}

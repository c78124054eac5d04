use crate::errors::Advisories;
use crate::models::CumulativeNormal;
use statrs::distribution::{ContinuousCDF, Normal};

/// Reference CDF backed by statrs. Only used to benchmark the polynomial;
/// it never raises advisories.
pub struct ExactNormal {
    /// Standard normal distribution (created once, reused)
    normal: Normal,
}

impl ExactNormal {
    pub fn new() -> Self {
        Self { normal: Normal::standard() }
    }
}

impl Default for ExactNormal {
    fn default() -> Self {
        Self::new()
    }
}

impl CumulativeNormal for ExactNormal {
    #[inline]
    fn name(&self) -> &'static str {
        "statrs Normal(0, 1)"
    }

    #[inline]
    fn cdf(&self, x: f64, _advisories: &mut Advisories) -> f64 {
        self.normal.cdf(x)
    }
}

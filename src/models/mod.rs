pub mod black_scholes;
pub mod exact_normal;
pub mod normal_approx;

use crate::errors::Advisories;

/// Standard normal CDF used by the pricer.
/// cdf() must be a pure function: deterministic output from x only.
/// Implementations report accuracy concerns by pushing onto `advisories`,
/// never by failing.
pub trait CumulativeNormal: Send + Sync {
    fn name(&self) -> &'static str;

    fn cdf(&self, x: f64, advisories: &mut Advisories) -> f64;
}

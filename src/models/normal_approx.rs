use crate::errors::{Advised, Advisories, Advisory};
use crate::models::CumulativeNormal;

/// 1 / sqrt(2 * pi)
const INV_SQRT_2PI: f64 = 0.398_942_280_401_432_7;

/// Upper edge of the range the truncated series was derived for.
pub const VALIDATED_DOMAIN: f64 = 1.0;

/// Standard normal CDF from the Maclaurin series of the Gaussian integral,
/// truncated after the x^9 term:
///
/// Phi(x) ~= 0.5 + (x - x^3/6 + x^5/40 - x^7/336 + x^9/3456) / sqrt(2*pi)
///
/// Negative inputs use Phi(-x) = 1 - Phi(x). Inputs with |x| > 1 still run
/// through the polynomial but raise one `CdfOutOfDomain` advisory.
#[derive(Debug, Clone, Copy, Default)]
pub struct MaclaurinNormal;

impl MaclaurinNormal {
    pub fn new() -> Self {
        Self
    }
}

impl CumulativeNormal for MaclaurinNormal {
    #[inline]
    fn name(&self) -> &'static str {
        "Maclaurin (5 terms)"
    }

    fn cdf(&self, x: f64, advisories: &mut Advisories) -> f64 {
        if x == 0.0 {
            return 0.5;
        }
        if x < 0.0 {
            return 1.0 - self.cdf(-x, advisories);
        }
        if x > VALIDATED_DOMAIN {
            advisories.push(Advisory::CdfOutOfDomain { x });
        }
        0.5 + INV_SQRT_2PI * series(x)
    }
}

/// Horner form of x - x^3/6 + x^5/40 - x^7/336 + x^9/3456.
#[inline]
fn series(x: f64) -> f64 {
    let x2 = x * x;
    x * (1.0 + x2 * (-1.0 / 6.0 + x2 * (1.0 / 40.0 + x2 * (-1.0 / 336.0 + x2 / 3456.0))))
}

/// Convenience wrapper for one-off evaluations.
pub fn norm_cdf_approx(x: f64) -> Advised<f64> {
    let mut advisories = Advisories::new();
    let value = MaclaurinNormal.cdf(x, &mut advisories);
    Advised::new(value, advisories)
}

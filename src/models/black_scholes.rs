use crate::errors::{Advised, Advisories, PricerError, PricerResult};
use crate::models::normal_approx::MaclaurinNormal;
use crate::models::CumulativeNormal;
use crate::state::{MarketParameters, PricingResult};

/// Black-Scholes European call with continuous dividend yield.
///
/// d1 = (ln(S/K) + (r - q + sigma^2/2)*T) / (sigma * sqrt(T))
/// d2 = d1 - sigma * sqrt(T)
/// C  = S*e^(-qT)*Phi(d1) - K*e^(-rT)*Phi(d2)
/// delta = e^(-qT)*Phi(d1)
///
/// Price and delta are scaled by the share count. Nothing is clamped:
/// a non-finite result is reported as a domain error.
pub fn price(params: MarketParameters) -> PricerResult<Advised<PricingResult>> {
    price_with(params, &MaclaurinNormal)
}

/// Same as [`price`] with a caller-chosen CDF.
pub fn price_with(
    params: MarketParameters,
    cdf: &dyn CumulativeNormal,
) -> PricerResult<Advised<PricingResult>> {
    let (d1, d2) = d1_d2(params)?;

    let mut advisories = Advisories::new();
    let phi_d1 = cdf.cdf(d1, &mut advisories);
    let phi_d2 = cdf.cdf(d2, &mut advisories);

    let dividend_discount = (-params.dividend_yield * params.time_to_expiry).exp();
    let rate_discount = (-params.risk_free_rate * params.time_to_expiry).exp();

    let call_per_share =
        params.spot * dividend_discount * phi_d1 - params.strike * rate_discount * phi_d2;
    let delta_per_share = dividend_discount * phi_d1;

    let n = params.multiplier();
    let result = PricingResult {
        d1,
        d2,
        call_price: n * call_per_share,
        delta: n * delta_per_share,
    };

    if !result.call_price.is_finite() || !result.delta.is_finite() {
        return Err(PricerError::Domain(format!(
            "non-finite valuation (call={}, delta={}) for {params:?}",
            result.call_price, result.delta
        )));
    }

    Ok(Advised::new(result, advisories))
}

/// Standardized distances. Fails if sigma*sqrt(T) is not a positive number.
pub fn d1_d2(params: MarketParameters) -> PricerResult<(f64, f64)> {
    let sigma_sqrt_t = params.volatility * params.time_to_expiry.sqrt();
    // Also rejects NaN from a negative T
    let usable = sigma_sqrt_t.is_finite() && sigma_sqrt_t > 0.0;
    if !usable {
        return Err(PricerError::Domain(format!(
            "sigma*sqrt(T) = {sigma_sqrt_t} (sigma={}, T={})",
            params.volatility, params.time_to_expiry
        )));
    }

    let log_moneyness = (params.spot / params.strike).ln();
    let drift = (params.risk_free_rate - params.dividend_yield
        + 0.5 * params.volatility * params.volatility)
        * params.time_to_expiry;

    let d1 = (log_moneyness + drift) / sigma_sqrt_t;
    Ok((d1, d1 - sigma_sqrt_t))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::Advisory;
    use crate::models::exact_normal::ExactNormal;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_reference_scenario() {
        let out = price(MarketParameters::reference()).unwrap();
        assert!(out.is_clean(), "reference d1/d2 sit inside [-1, 1]");
        let r = out.value;
        assert_abs_diff_eq!(r.d1, 0.507206, epsilon = 1e-6);
        assert_abs_diff_eq!(r.d2, 0.331644, epsilon = 1e-6);
        assert_abs_diff_eq!(r.call_price, 3770.33, epsilon = 0.01);
        assert_abs_diff_eq!(r.delta, 687.184, epsilon = 0.01);
    }

    #[test]
    fn test_repeat_pricing_is_bit_identical() {
        let params = MarketParameters::reference();
        let a = price(params).unwrap();
        let b = price(params).unwrap();
        assert_eq!(a.value.call_price.to_bits(), b.value.call_price.to_bits());
        assert_eq!(a.value.delta.to_bits(), b.value.delta.to_bits());
    }

    #[test]
    fn test_close_to_exact_cdf() {
        let params = MarketParameters::reference();
        let approx = price(params).unwrap().value;
        let exact = price_with(params, &ExactNormal::new()).unwrap().value;
        assert_abs_diff_eq!(approx.call_price, exact.call_price, epsilon = 0.01);
        assert_abs_diff_eq!(approx.delta, exact.delta, epsilon = 0.01);
    }

    #[test]
    fn test_zero_time_is_domain_error() {
        let params = MarketParameters::reference().with_time_to_expiry(0.0);
        assert!(matches!(price(params), Err(PricerError::Domain(_))));

        let params = MarketParameters::reference().with_time_to_expiry(-0.1);
        assert!(matches!(d1_d2(params), Err(PricerError::Domain(_))));
    }

    #[test]
    fn test_deep_itm_warns_per_evaluation() {
        let out = price(MarketParameters::reference().with_spot(60.0)).unwrap();
        assert!(out.value.d2 > 1.0);
        assert_eq!(out.advisories.len(), 2);
        assert!(out
            .advisories
            .iter()
            .all(|a| matches!(a, Advisory::CdfOutOfDomain { .. })));
    }

    #[test]
    fn test_delta_within_share_count() {
        for spot in [30.0, 33.0, 35.0, 36.0] {
            let params = MarketParameters::reference().with_spot(spot);
            let r = price(params).unwrap().value;
            assert!(r.delta > 0.0 && r.delta < params.multiplier(), "spot={spot}");
        }
    }
}

use crate::errors::{Advised, Advisories, Advisory, PricerError, PricerResult};

// ── Market / Contract Inputs ──

/// Inputs for a single European call position. Stack-allocated, Copy.
///
/// Only [`MarketParameters::new`] validates. The `with_*` helpers used by the
/// hedge simulator substitute one field into an already validated set, so
/// the pricer still guards its own numerical preconditions.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct MarketParameters {
    pub spot: f64,
    pub strike: f64,
    pub volatility: f64,
    pub dividend_yield: f64,
    pub risk_free_rate: f64,
    /// Years.
    pub time_to_expiry: f64,
    /// Shares underlying the position.
    pub shares: u32,
}

impl MarketParameters {
    /// Validate and build. Fails fast on non-positive S, K, sigma, T or N;
    /// economically odd rates only produce advisories.
    pub fn new(
        spot: f64,
        strike: f64,
        volatility: f64,
        dividend_yield: f64,
        risk_free_rate: f64,
        time_to_expiry: f64,
        shares: i64,
    ) -> PricerResult<Advised<Self>> {
        require_positive("spot", spot)?;
        require_positive("strike", strike)?;
        require_positive("volatility", volatility)?;
        require_positive("time_to_expiry", time_to_expiry)?;
        if !dividend_yield.is_finite() || !risk_free_rate.is_finite() {
            return Err(PricerError::InvalidParameter(format!(
                "rates must be finite (q={dividend_yield}, r={risk_free_rate})"
            )));
        }
        if shares <= 0 {
            return Err(PricerError::InvalidParameter(format!(
                "shares must be positive, got {shares}"
            )));
        }
        let shares = u32::try_from(shares).map_err(|_| {
            PricerError::InvalidParameter(format!("shares out of range: {shares}"))
        })?;

        let mut advisories = Advisories::new();
        if risk_free_rate < 0.0 {
            advisories.push(Advisory::NegativeRiskFreeRate { rate: risk_free_rate });
        }
        if dividend_yield < 0.0 {
            advisories.push(Advisory::NegativeDividendYield { dividend_yield });
        }
        if dividend_yield > risk_free_rate + volatility {
            advisories.push(Advisory::DividendAboveCarry {
                dividend_yield,
                risk_free_rate,
                volatility,
            });
        }

        Ok(Advised::new(
            Self {
                spot,
                strike,
                volatility,
                dividend_yield,
                risk_free_rate,
                time_to_expiry,
                shares,
            },
            advisories,
        ))
    }

    /// The reference scenario: S=35, K=33, sigma=25%, q=2%, r=5%, T=180/365, N=1000.
    pub fn reference() -> Self {
        Self {
            spot: 35.0,
            strike: 33.0,
            volatility: 0.25,
            dividend_yield: 0.02,
            risk_free_rate: 0.05,
            time_to_expiry: 180.0 / 365.0,
            shares: 1000,
        }
    }

    #[inline]
    pub fn with_spot(self, spot: f64) -> Self {
        Self { spot, ..self }
    }

    #[inline]
    pub fn with_time_to_expiry(self, time_to_expiry: f64) -> Self {
        Self { time_to_expiry, ..self }
    }

    #[inline]
    pub fn multiplier(&self) -> f64 {
        f64::from(self.shares)
    }
}

fn require_positive(name: &str, value: f64) -> PricerResult<()> {
    // NaN fails this comparison too
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(PricerError::InvalidParameter(format!(
            "{name} must be positive, got {value}"
        )))
    }
}

// ── Pricing Output ──

/// Black-Scholes output for the whole position (per-share values times N).
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct PricingResult {
    pub d1: f64,
    pub d2: f64,
    pub call_price: f64,
    /// Share-equivalent delta, in [0, N].
    pub delta: f64,
}

// ── Hedge State Machine ──

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HedgeDay {
    Day0,
    Day1,
    Day2,
}

impl HedgeDay {
    /// Day2 is terminal.
    pub fn next(self) -> Option<Self> {
        match self {
            Self::Day0 => Some(Self::Day1),
            Self::Day1 => Some(Self::Day2),
            Self::Day2 => None,
        }
    }

    pub fn index(self) -> u32 {
        match self {
            Self::Day0 => 0,
            Self::Day1 => 1,
            Self::Day2 => 2,
        }
    }
}

impl std::fmt::Display for HedgeDay {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "day {}", self.index())
    }
}

/// Replicating portfolio after a given day's rebalance.
/// Steps consume one state and return the next; nothing mutates in place.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct HedgeState {
    pub day: HedgeDay,
    /// Spot at which the portfolio was last marked.
    pub spot: f64,
    /// Option liability at the last mark.
    pub option_value: f64,
    pub shares_held: f64,
    /// Debt funding the share position, interest included.
    pub cash_borrowed: f64,
    pub cumulative_profit_loss: f64,
    pub cumulative_rebalancing_cost: f64,
}

impl HedgeState {
    pub fn is_terminal(&self) -> bool {
        self.day.next().is_none()
    }

    /// Shares minus option minus debt. Zero right after initialization.
    pub fn portfolio_value(&self) -> f64 {
        self.shares_held * self.spot - self.option_value - self.cash_borrowed
    }
}

/// What a single hedge transition reports.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct DayRecord {
    pub day: HedgeDay,
    pub spot: f64,
    pub time_to_expiry: f64,
    pub call_price: f64,
    pub delta: f64,
    pub interest_accrued: f64,
    pub profit_loss: f64,
    pub rebalancing_cost: f64,
    pub shares_held: f64,
    pub cash_borrowed: f64,
    pub cumulative_profit_loss: f64,
    pub cumulative_rebalancing_cost: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build(spot: f64, strike: f64, vol: f64, t: f64, n: i64) -> PricerResult<Advised<MarketParameters>> {
        MarketParameters::new(spot, strike, vol, 0.02, 0.05, t, n)
    }

    #[test]
    fn test_reference_is_clean() {
        let p = build(35.0, 33.0, 0.25, 180.0 / 365.0, 1000).unwrap();
        assert!(p.is_clean());
        assert_eq!(p.value, MarketParameters::reference());
    }

    #[test]
    fn test_non_positive_inputs_rejected() {
        let t = 180.0 / 365.0;
        for result in [
            build(0.0, 33.0, 0.25, t, 1000),
            build(35.0, -5.0, 0.25, t, 1000),
            build(35.0, 33.0, 0.0, t, 1000),
            build(35.0, 33.0, 0.25, 0.0, 1000),
            build(35.0, 33.0, 0.25, t, 0),
            build(f64::NAN, 33.0, 0.25, t, 1000),
        ] {
            assert!(matches!(result, Err(PricerError::InvalidParameter(_))), "{result:?}");
        }
    }

    #[test]
    fn test_unusual_rates_warn_but_build() {
        let p = MarketParameters::new(35.0, 33.0, 0.25, -0.01, -0.02, 0.5, 100).unwrap();
        assert!(p.advisories.contains(&Advisory::NegativeRiskFreeRate { rate: -0.02 }));
        assert!(p
            .advisories
            .contains(&Advisory::NegativeDividendYield { dividend_yield: -0.01 }));
        assert_eq!(p.advisories.len(), 2);

        let high_q = MarketParameters::new(35.0, 33.0, 0.25, 0.40, 0.05, 0.5, 100).unwrap();
        assert!(matches!(
            high_q.advisories.as_slice(),
            [Advisory::DividendAboveCarry { .. }]
        ));
    }

    #[test]
    fn test_hedge_day_is_linear() {
        assert_eq!(HedgeDay::Day0.next(), Some(HedgeDay::Day1));
        assert_eq!(HedgeDay::Day1.next(), Some(HedgeDay::Day2));
        assert_eq!(HedgeDay::Day2.next(), None);
    }
}

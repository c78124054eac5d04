use crate::errors::{Advised, Advisories, PricerError, PricerResult};
use crate::hedge::report::{Benchmark, HedgeReport, HedgeSetup};
use crate::models::black_scholes;
use crate::models::exact_normal::ExactNormal;
use crate::models::CumulativeNormal;
use crate::state::*;
use smallvec::SmallVec;

// ═══════════════════════════════════════════════════════════════════════════════
// TWO-DAY DELTA HEDGE
//
// Day 0: hold delta(S0) shares, funded by borrowing shares*S0 - C(S0).
//        The portfolio (shares - option - debt) starts at exactly zero.
// Day n: reprice at the new spot with one day less to expiry, then
//   P/L       = shares*(S_n - S_{n-1}) - interest - (C_n - C_{n-1})
//   rebalance = (delta_n - shares)*S_n
//   debt     += interest + rebalance
// Day 2 is terminal.
// ═══════════════════════════════════════════════════════════════════════════════

/// Spot observations and day basis for the two hedge days.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct HedgeSchedule {
    pub day1_spot: f64,
    pub day2_spot: f64,
    /// Days per year; one simulated day is 1/day_count years.
    pub day_count: f64,
}

impl HedgeSchedule {
    pub fn new(day1_spot: f64, day2_spot: f64, day_count: f64) -> PricerResult<Self> {
        for (name, value) in [("day1_spot", day1_spot), ("day2_spot", day2_spot), ("day_count", day_count)] {
            if !(value.is_finite() && value > 0.0) {
                return Err(PricerError::InvalidParameter(format!(
                    "{name} must be positive, got {value}"
                )));
            }
        }
        Ok(Self { day1_spot, day2_spot, day_count })
    }

    /// $35.50 then $34.80 on a 365-day year.
    pub fn reference() -> Self {
        Self { day1_spot: 35.50, day2_spot: 34.80, day_count: 365.0 }
    }

    #[inline]
    pub fn day_fraction(&self) -> f64 {
        1.0 / self.day_count
    }
}

/// Price the option at day 0 and set up the replicating portfolio.
pub fn initialize(params: MarketParameters) -> PricerResult<Advised<(HedgeState, PricingResult)>> {
    let priced = black_scholes::price(params)?;
    let pricing = priced.value;

    let shares_held = pricing.delta;
    let state = HedgeState {
        day: HedgeDay::Day0,
        spot: params.spot,
        option_value: pricing.call_price,
        shares_held,
        cash_borrowed: shares_held * params.spot - pricing.call_price,
        cumulative_profit_loss: 0.0,
        cumulative_rebalancing_cost: 0.0,
    };

    tracing::debug!(
        call_price = pricing.call_price,
        delta = pricing.delta,
        borrowed = state.cash_borrowed,
        "hedge initialized"
    );

    Ok(Advised::new((state, pricing), priced.advisories))
}

/// Advance the hedge by one day. Pure: the input state is untouched and the
/// successor comes back together with that day's record.
pub fn step(
    state: HedgeState,
    new_spot: f64,
    params: MarketParameters,
    day_fraction: f64,
) -> PricerResult<Advised<(HedgeState, DayRecord)>> {
    let day = state.day.next().ok_or(PricerError::HedgeTerminal)?;
    if !(new_spot.is_finite() && new_spot > 0.0) {
        return Err(PricerError::InvalidParameter(format!(
            "{day} spot must be positive, got {new_spot}"
        )));
    }

    let time_to_expiry = params.time_to_expiry - day_fraction * f64::from(day.index());
    let priced = black_scholes::price(
        params.with_spot(new_spot).with_time_to_expiry(time_to_expiry),
    )?;
    let pricing = priced.value;

    let interest_accrued =
        state.cash_borrowed * ((params.risk_free_rate * day_fraction).exp() - 1.0);
    let profit_loss = state.shares_held * (new_spot - state.spot)
        - interest_accrued
        - (pricing.call_price - state.option_value);
    let rebalancing_cost = (pricing.delta - state.shares_held) * new_spot;

    let next = HedgeState {
        day,
        spot: new_spot,
        option_value: pricing.call_price,
        shares_held: pricing.delta,
        cash_borrowed: state.cash_borrowed + interest_accrued + rebalancing_cost,
        cumulative_profit_loss: state.cumulative_profit_loss + profit_loss,
        cumulative_rebalancing_cost: state.cumulative_rebalancing_cost + rebalancing_cost,
    };

    let record = DayRecord {
        day,
        spot: new_spot,
        time_to_expiry,
        call_price: pricing.call_price,
        delta: pricing.delta,
        interest_accrued,
        profit_loss,
        rebalancing_cost,
        shares_held: next.shares_held,
        cash_borrowed: next.cash_borrowed,
        cumulative_profit_loss: next.cumulative_profit_loss,
        cumulative_rebalancing_cost: next.cumulative_rebalancing_cost,
    };

    tracing::debug!(
        day = %day,
        spot = new_spot,
        pnl = profit_loss,
        rebalance = rebalancing_cost,
        shares = next.shares_held,
        "hedge rebalanced"
    );

    Ok(Advised::new((next, record), priced.advisories))
}

/// Run day 0 through day 2 and assemble the report. Advisories raised while
/// building `params` are carried into the report alongside the ones raised here.
pub fn run(params: Advised<MarketParameters>, schedule: HedgeSchedule) -> PricerResult<HedgeReport> {
    let mut advisories: Advisories = params.advisories;
    let params = params.value;

    let (mut state, initial) = initialize(params)?.drain_into(&mut advisories);
    let setup = HedgeSetup {
        shares_purchased: state.shares_held,
        amount_borrowed: state.cash_borrowed,
    };

    let mut days: SmallVec<[DayRecord; 2]> = SmallVec::new();
    for spot in [schedule.day1_spot, schedule.day2_spot] {
        let (next, record) =
            step(state, spot, params, schedule.day_fraction())?.drain_into(&mut advisories);
        state = next;
        days.push(record);
    }
    debug_assert!(state.is_terminal());

    let exact = ExactNormal::new();
    let reference = black_scholes::price_with(params, &exact)?.value;
    let benchmark = Benchmark {
        cdf: exact.name(),
        call_price: reference.call_price,
        delta: reference.delta,
        call_price_error: initial.call_price - reference.call_price,
        delta_error: initial.delta - reference.delta,
    };

    Ok(HedgeReport {
        run_id: uuid::Uuid::new_v4(),
        generated_at: chrono::Utc::now().to_rfc3339(),
        parameters: params,
        schedule,
        initial,
        hedge_setup: setup,
        days,
        cumulative_profit_loss: state.cumulative_profit_loss,
        cumulative_rebalancing_cost: state.cumulative_rebalancing_cost,
        benchmark,
        advisories,
    })
}

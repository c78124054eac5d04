//! Report assembly and rendering.
//! All functions are pure -- they take a finished report and return text.

use crate::errors::{Advisories, PricerResult};
use crate::hedge::simulator::HedgeSchedule;
use crate::state::{DayRecord, MarketParameters, PricingResult};
use smallvec::SmallVec;
use std::fmt::Write as _;

/// Full trace of one simulation run. Serialized as-is for JSON output.
#[derive(Debug, Clone, serde::Serialize)]
pub struct HedgeReport {
    pub run_id: uuid::Uuid,
    pub generated_at: String,
    pub parameters: MarketParameters,
    pub schedule: HedgeSchedule,
    pub initial: PricingResult,
    pub hedge_setup: HedgeSetup,
    pub days: SmallVec<[DayRecord; 2]>,
    pub cumulative_profit_loss: f64,
    pub cumulative_rebalancing_cost: f64,
    pub benchmark: Benchmark,
    pub advisories: Advisories,
}

#[derive(Debug, Clone, Copy, serde::Serialize)]
pub struct HedgeSetup {
    pub shares_purchased: f64,
    pub amount_borrowed: f64,
}

/// Day-0 valuation under an exact normal CDF, for auditing the polynomial.
#[derive(Debug, Clone, Copy, serde::Serialize)]
pub struct Benchmark {
    pub cdf: &'static str,
    pub call_price: f64,
    pub delta: f64,
    /// Approximation minus exact.
    pub call_price_error: f64,
    pub delta_error: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    Text,
    Json,
}

impl std::str::FromStr for ReportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            other => Err(format!("unknown report format '{other}' (expected text or json)")),
        }
    }
}

pub fn render(report: &HedgeReport, format: ReportFormat) -> PricerResult<String> {
    match format {
        ReportFormat::Text => Ok(render_text(report)),
        ReportFormat::Json => render_json(report),
    }
}

pub fn render_json(report: &HedgeReport) -> PricerResult<String> {
    Ok(serde_json::to_string_pretty(report)?)
}

/// Console layout.
pub fn render_text(report: &HedgeReport) -> String {
    let n = report.parameters.shares;
    let mut out = String::new();

    // Writing to a String cannot fail
    let _ = writeln!(out, "Black-Scholes Delta Hedging Simulation Results");
    let _ = writeln!(out, "=============================================");
    let _ = writeln!(out, "Initial Setup:");
    let _ = writeln!(
        out,
        "  Call Option Value ({n} shares): {}",
        money(report.initial.call_price)
    );
    let _ = writeln!(out, "  Delta ({n} shares): {:.3} shares", report.initial.delta);
    let _ = writeln!(out, "Hedging Strategy:");
    let _ = writeln!(out, "  Shares Purchased: {:.3}", report.hedge_setup.shares_purchased);
    let _ = writeln!(out, "  Amount Borrowed: {}", money(report.hedge_setup.amount_borrowed));

    for day in &report.days {
        let _ = writeln!(
            out,
            "Day {} (Stock Price = {}):",
            day.day.index(),
            money(day.spot)
        );
        let _ = writeln!(out, "  Profit/Loss: {}", money(day.profit_loss));
        let _ = writeln!(out, "  Rebalancing Cost: {}", money(day.rebalancing_cost));
        let _ = writeln!(out, "  Shares Held: {:.3}", day.shares_held);
        let _ = writeln!(out, "  Amount Borrowed: {}", money(day.cash_borrowed));
    }

    let _ = writeln!(out, "Totals:");
    let _ = writeln!(out, "  Profit/Loss: {}", money(report.cumulative_profit_loss));
    let _ = writeln!(
        out,
        "  Rebalancing Cost: {}",
        money(report.cumulative_rebalancing_cost)
    );

    let b = &report.benchmark;
    let _ = writeln!(out, "Benchmark ({}):", b.cdf);
    let _ = writeln!(
        out,
        "  Call Option Value: {} (approximation error {:+.4})",
        money(b.call_price),
        b.call_price_error
    );
    let _ = writeln!(
        out,
        "  Delta: {:.3} shares (approximation error {:+.4})",
        b.delta, b.delta_error
    );

    if report.advisories.is_empty() {
        let _ = writeln!(out, "Advisories: none");
    } else {
        let _ = writeln!(out, "Advisories:");
        for advisory in &report.advisories {
            let _ = writeln!(out, "  - {advisory}");
        }
    }

    out
}

/// Dollars with the sign in front: -$2.43, $984.52.
pub fn money(amount: f64) -> String {
    let cents = (amount * 100.0).round();
    if cents < 0.0 {
        format!("-${:.2}", -cents / 100.0)
    } else {
        format!("${:.2}", cents.abs() / 100.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::Advised;
    use crate::hedge::simulator;

    fn reference_report() -> HedgeReport {
        simulator::run(
            Advised::clean(MarketParameters::reference()),
            HedgeSchedule::reference(),
        )
        .unwrap()
    }

    #[test]
    fn test_money_formatting() {
        assert_eq!(money(984.5214), "$984.52");
        assert_eq!(money(-2.4311), "-$2.43");
        assert_eq!(money(-1351.267), "-$1351.27");
        assert_eq!(money(-0.001), "$0.00");
        assert_eq!(money(0.0), "$0.00");
    }

    #[test]
    fn test_text_report_lines() {
        let text = render_text(&reference_report());
        for line in [
            "  Call Option Value (1000 shares): $3770.33",
            "  Delta (1000 shares): 687.184 shares",
            "  Shares Purchased: 687.184",
            "  Amount Borrowed: $20281.10",
            "Day 1 (Stock Price = $35.50):",
            "  Profit/Loss: -$2.43",
            "  Rebalancing Cost: $984.52",
            "Day 2 (Stock Price = $34.80):",
            "  Profit/Loss: -$8.93",
            "  Rebalancing Cost: -$1351.27",
            "Advisories: none",
        ] {
            assert!(text.contains(line), "missing {line:?} in\n{text}");
        }
    }

    #[test]
    fn test_json_report_shape() {
        let json = render(&reference_report(), ReportFormat::Json).unwrap();
        let v: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(v["days"].as_array().map(|d| d.len()), Some(2));
        assert_eq!(v["days"][0]["day"], "day1");
        assert_eq!(v["parameters"]["shares"], 1000);
        assert!(v["run_id"].is_string());
    }

    #[test]
    fn test_report_format_parse() {
        assert_eq!("JSON".parse::<ReportFormat>(), Ok(ReportFormat::Json));
        assert_eq!(" text ".parse::<ReportFormat>(), Ok(ReportFormat::Text));
        assert!("yaml".parse::<ReportFormat>().is_err());
    }
}

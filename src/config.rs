use crate::errors::{Advised, PricerError, PricerResult};
use crate::hedge::report::ReportFormat;
use crate::hedge::simulator::HedgeSchedule;
use crate::state::MarketParameters;
use std::str::FromStr;

/// Runtime configuration. Every field defaults to the reference scenario,
/// so an empty environment reproduces it.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub spot: f64,
    pub strike: f64,
    pub volatility: f64,
    pub dividend_yield: f64,
    pub risk_free_rate: f64,
    pub time_to_expiry: f64,
    pub shares: i64,
    pub day1_spot: f64,
    pub day2_spot: f64,
    pub day_count: f64,
    pub report_format: ReportFormat,
}

impl AppConfig {
    pub fn from_env() -> PricerResult<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Parse from any key/value source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> PricerResult<Self> {
        let time_to_expiry = match lookup("TIME_TO_EXPIRY") {
            Some(raw) => parse("TIME_TO_EXPIRY", &raw)?,
            None => 180.0 / 365.0,
        };

        Ok(Self {
            spot: parse_or(&lookup, "SPOT", "35")?,
            strike: parse_or(&lookup, "STRIKE", "33")?,
            volatility: parse_or(&lookup, "VOLATILITY", "0.25")?,
            dividend_yield: parse_or(&lookup, "DIVIDEND_YIELD", "0.02")?,
            risk_free_rate: parse_or(&lookup, "RISK_FREE_RATE", "0.05")?,
            time_to_expiry,
            shares: parse_or(&lookup, "SHARES", "1000")?,
            day1_spot: parse_or(&lookup, "DAY1_SPOT", "35.50")?,
            day2_spot: parse_or(&lookup, "DAY2_SPOT", "34.80")?,
            day_count: parse_or(&lookup, "DAY_COUNT", "365")?,
            report_format: parse_or(&lookup, "REPORT_FORMAT", "text")?,
        })
    }

    pub fn market_parameters(&self) -> PricerResult<Advised<MarketParameters>> {
        MarketParameters::new(
            self.spot,
            self.strike,
            self.volatility,
            self.dividend_yield,
            self.risk_free_rate,
            self.time_to_expiry,
            self.shares,
        )
    }

    pub fn schedule(&self) -> PricerResult<HedgeSchedule> {
        HedgeSchedule::new(self.day1_spot, self.day2_spot, self.day_count)
    }
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: &str) -> PricerResult<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let raw = lookup(key).unwrap_or_else(|| default.to_string());
    parse(key, &raw)
}

fn parse<T>(key: &str, raw: &str) -> PricerResult<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim()
        .parse::<T>()
        .map_err(|e| PricerError::Config(format!("{key}: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_are_reference_scenario() {
        let cfg = AppConfig::from_lookup(lookup_from(&[])).unwrap();
        let params = cfg.market_parameters().unwrap();
        assert!(params.is_clean());
        assert_eq!(params.value, MarketParameters::reference());
        assert_eq!(cfg.schedule().unwrap(), HedgeSchedule::reference());
        assert_eq!(cfg.report_format, ReportFormat::Text);
    }

    #[test]
    fn test_overrides() {
        let cfg = AppConfig::from_lookup(lookup_from(&[
            ("SPOT", "40"),
            ("SHARES", "500"),
            ("REPORT_FORMAT", "json"),
        ]))
        .unwrap();
        assert_eq!(cfg.spot, 40.0);
        assert_eq!(cfg.shares, 500);
        assert_eq!(cfg.report_format, ReportFormat::Json);
    }

    #[test]
    fn test_parse_failure_names_key() {
        let err = AppConfig::from_lookup(lookup_from(&[("VOLATILITY", "high")])).unwrap_err();
        assert!(matches!(&err, PricerError::Config(msg) if msg.starts_with("VOLATILITY")));
    }

    #[test]
    fn test_invalid_values_fail_at_construction() {
        let cfg = AppConfig::from_lookup(lookup_from(&[("STRIKE", "-5")])).unwrap();
        assert!(matches!(
            cfg.market_parameters(),
            Err(PricerError::InvalidParameter(_))
        ));
    }
}

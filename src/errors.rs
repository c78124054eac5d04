use smallvec::SmallVec;

/// Domain-specific error types for the pricer and hedge simulator.
/// Parameters are validated once, at construction. After that the only
/// failures are numerical (an undefined formula) or misuse of the
/// simulator's state machine.
#[derive(Debug, thiserror::Error)]
pub enum PricerError {
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("domain error: {0}")]
    Domain(String),

    #[error("hedge simulation already finished after day 2")]
    HedgeTerminal,

    #[error("config error: {0}")]
    Config(String),

    #[error("serialize error: {0}")]
    Serialize(String),
}

impl From<serde_json::Error> for PricerError {
    fn from(e: serde_json::Error) -> Self {
        PricerError::Serialize(e.to_string())
    }
}

pub type PricerResult<T> = Result<T, PricerError>;

/// Non-fatal advisories. These never halt a computation; they travel
/// next to the value so callers can inspect or log them.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Advisory {
    /// The CDF polynomial was evaluated outside |x| <= 1.
    CdfOutOfDomain { x: f64 },
    NegativeRiskFreeRate { rate: f64 },
    NegativeDividendYield { dividend_yield: f64 },
    /// q > r + sigma: legal, but unusual enough to flag.
    DividendAboveCarry {
        dividend_yield: f64,
        risk_free_rate: f64,
        volatility: f64,
    },
}

impl std::fmt::Display for Advisory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::CdfOutOfDomain { x } => {
                write!(f, "CDF input x={x} outside [-1, 1]; polynomial approximation is less accurate")
            }
            Self::NegativeRiskFreeRate { rate } => write!(f, "negative risk-free rate r={rate}"),
            Self::NegativeDividendYield { dividend_yield } => {
                write!(f, "negative dividend yield q={dividend_yield}")
            }
            Self::DividendAboveCarry { dividend_yield, risk_free_rate, volatility } => write!(
                f,
                "dividend yield q={dividend_yield} exceeds r+sigma={}",
                risk_free_rate + volatility
            ),
        }
    }
}

/// Most calls raise zero or two advisories; four keeps them on the stack.
pub type Advisories = SmallVec<[Advisory; 4]>;

/// A computed value plus whatever advisories were raised producing it.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct Advised<T> {
    pub value: T,
    pub advisories: Advisories,
}

impl<T> Advised<T> {
    pub fn new(value: T, advisories: Advisories) -> Self {
        Self { value, advisories }
    }

    pub fn clean(value: T) -> Self {
        Self { value, advisories: Advisories::new() }
    }

    pub fn is_clean(&self) -> bool {
        self.advisories.is_empty()
    }

    /// Move this value's advisories into `sink` and return the bare value.
    pub fn drain_into(self, sink: &mut Advisories) -> T {
        sink.extend(self.advisories);
        self.value
    }
}

use dividend_core::{PlannerError, PlannerResult, ProjectionRecord, Snapshot};
use serde::{Deserialize, Serialize};

/// Abgeltungsteuer (25%) plus Solidaritätszuschlag (5.5% of the tax).
pub const GERMAN_FLAT_TAX_RATE: f64 = 0.26375;

/// Month of the year (1..=12) in which annual payers distribute.
///
/// Annual distributions are modelled as a single mid-year payout. Moving it
/// changes how much of the allowance is left for later payers in the same year.
pub const ANNUAL_PAYOUT_MONTH: u32 = 6;

pub const MONTHS_PER_YEAR: u32 = 12;

/// Longest horizon a projection accepts.
pub const MAX_HORIZON_YEARS: u32 = 1000;

/// Parameters for a projection run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionConfig {
    /// Number of simulated years (1..=MAX_HORIZON_YEARS)
    pub horizon_years: u32,
    /// Tax-free dividend allowance per calendar year (Sparerpauschbetrag)
    pub annual_allowance: f64,
    /// Payout month for positions with an annual frequency
    #[serde(default = "default_annual_payout_month")]
    pub annual_payout_month: u32,
    /// Flat withholding rate applied above the allowance, as a fraction
    #[serde(default = "default_tax_rate")]
    pub tax_rate: f64,
}

fn default_annual_payout_month() -> u32 {
    ANNUAL_PAYOUT_MONTH
}

fn default_tax_rate() -> f64 {
    GERMAN_FLAT_TAX_RATE
}

impl ProjectionConfig {
    pub fn new(horizon_years: u32, annual_allowance: f64) -> Self {
        Self {
            horizon_years,
            annual_allowance,
            annual_payout_month: ANNUAL_PAYOUT_MONTH,
            tax_rate: GERMAN_FLAT_TAX_RATE,
        }
    }

    pub fn with_annual_payout_month(mut self, month: u32) -> Self {
        self.annual_payout_month = month;
        self
    }

    pub fn with_tax_rate(mut self, rate: f64) -> Self {
        self.tax_rate = rate;
        self
    }

    pub fn total_months(&self) -> u32 {
        self.horizon_years.saturating_mul(MONTHS_PER_YEAR)
    }

    pub fn validate(&self) -> PlannerResult<()> {
        if self.horizon_years == 0 {
            return Err(PlannerError::InvalidConfig(
                "horizon_years must be at least 1".to_string(),
            ));
        }
        if self.horizon_years > MAX_HORIZON_YEARS {
            return Err(PlannerError::InvalidConfig(format!(
                "horizon_years must be at most {}, got {}",
                MAX_HORIZON_YEARS, self.horizon_years
            )));
        }
        if !self.annual_allowance.is_finite() || self.annual_allowance < 0.0 {
            return Err(PlannerError::InvalidConfig(format!(
                "annual_allowance must be a non-negative number, got {}",
                self.annual_allowance
            )));
        }
        if !(1..=MONTHS_PER_YEAR).contains(&self.annual_payout_month) {
            return Err(PlannerError::InvalidConfig(format!(
                "annual_payout_month must be within 1..=12, got {}",
                self.annual_payout_month
            )));
        }
        if !(0.0..=1.0).contains(&self.tax_rate) {
            return Err(PlannerError::InvalidConfig(format!(
                "tax_rate must be within 0..=1, got {}",
                self.tax_rate
            )));
        }
        Ok(())
    }
}

/// What to do with positions that fail validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvalidPositionPolicy {
    /// Fail the whole projection on the first invalid position
    #[default]
    Reject,
    /// Drop invalid positions and report them
    Exclude,
}

impl std::str::FromStr for InvalidPositionPolicy {
    type Err = PlannerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "reject" => Ok(Self::Reject),
            "exclude" => Ok(Self::Exclude),
            other => Err(PlannerError::InvalidConfig(format!(
                "unknown invalid-position policy '{}'",
                other
            ))),
        }
    }
}

/// A position left out of a projection under `InvalidPositionPolicy::Exclude`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExcludedPosition {
    pub symbol: String,
    pub reason: String,
}

/// Result of a projection run with a validation policy applied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionOutcome {
    pub records: Vec<ProjectionRecord>,
    pub excluded: Vec<ExcludedPosition>,
}

impl ProjectionOutcome {
    pub fn final_year(&self) -> Option<&ProjectionRecord> {
        self.records.last()
    }
}

/// Current-state metrics of a snapshot, before any simulation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotSummary {
    pub positions: usize,
    pub invested_capital: f64,
    pub market_value: f64,
    pub unrealized_gain: f64,
    pub unrealized_gain_pct: f64,
    /// Σ shares × price × yield, the next twelve months at today's yield
    pub forward_gross_dividend: f64,
}

impl SnapshotSummary {
    pub fn from_snapshot(snapshot: &Snapshot) -> Self {
        let invested_capital = snapshot.invested_capital();
        let market_value = snapshot.market_value();
        let unrealized_gain = market_value - invested_capital;
        let unrealized_gain_pct = if invested_capital > 0.0 {
            unrealized_gain / invested_capital * 100.0
        } else {
            0.0
        };
        let forward_gross_dividend = snapshot
            .iter()
            .map(|p| p.shares * p.annual_dividend_per_unit())
            .sum();

        Self {
            positions: snapshot.len(),
            invested_capital,
            market_value,
            unrealized_gain,
            unrealized_gain_pct,
            forward_gross_dividend,
        }
    }
}

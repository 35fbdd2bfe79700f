use anyhow::{Context, Result};
use projection_engine::{InvalidPositionPolicy, ProjectionConfig, ANNUAL_PAYOUT_MONTH};
use std::env;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq)]
pub struct PlannerConfig {
    pub snapshot_path: PathBuf,
    pub tax_free_allowance: f64, // Sparerpauschbetrag, EUR per year
    pub projection_years: u32,
    pub annual_payout_month: u32, // 1..=12
    pub reference_currency: String,
    pub invalid_position_policy: InvalidPositionPolicy,
    pub default_growth_pct: f64, // used when a provider has no estimate
}

impl PlannerConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the config from any key lookup, falling back to defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let config = Self {
            snapshot_path: PathBuf::from(var("SNAPSHOT_PATH", "portfolio.csv")),
            tax_free_allowance: var("TAX_FREE_ALLOWANCE", "1000")
                .parse()
                .context("TAX_FREE_ALLOWANCE must be a number")?,
            projection_years: var("PROJECTION_YEARS", "15")
                .parse()
                .context("PROJECTION_YEARS must be a whole number")?,
            annual_payout_month: var("ANNUAL_PAYOUT_MONTH", &ANNUAL_PAYOUT_MONTH.to_string())
                .parse()
                .context("ANNUAL_PAYOUT_MONTH must be a month number")?,
            reference_currency: var("REFERENCE_CURRENCY", "EUR").trim().to_uppercase(),
            invalid_position_policy: var("INVALID_POSITION_POLICY", "reject").parse()?,
            default_growth_pct: var("DEFAULT_GROWTH_PCT", "5.0")
                .parse()
                .context("DEFAULT_GROWTH_PCT must be a number")?,
        };

        config.projection_config().validate()?;
        Ok(config)
    }

    /// Engine settings derived from this config.
    pub fn projection_config(&self) -> ProjectionConfig {
        ProjectionConfig::new(self.projection_years, self.tax_free_allowance)
            .with_annual_payout_month(self.annual_payout_month)
    }
}

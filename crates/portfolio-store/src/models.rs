use dividend_core::{PayoutFrequency, PlannerError, Position, QuoteSource};
use serde::{Deserialize, Serialize};

/// One CSV row of a stored snapshot.
///
/// Only `symbol`, `shares` and `cost_basis_price` are required so that
/// hand-written files load; every other column falls back to a default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotRow {
    pub symbol: String,
    #[serde(default)]
    pub name: Option<String>,
    pub shares: f64,
    pub cost_basis_price: f64,
    #[serde(default)]
    pub current_price: Option<f64>,
    #[serde(default)]
    pub dividend_yield_pct: Option<f64>,
    #[serde(default)]
    pub dividend_growth_rate_pct: Option<f64>,
    #[serde(default)]
    pub price_growth_rate_pct: Option<f64>,
    #[serde(default)]
    pub contribution_per_month: Option<f64>,
    #[serde(default)]
    pub payout_frequency: Option<u32>,
    #[serde(default)]
    pub reinvest: Option<bool>,
    #[serde(default)]
    pub source: Option<QuoteSource>,
}

impl From<&Position> for SnapshotRow {
    fn from(p: &Position) -> Self {
        Self {
            symbol: p.symbol.clone(),
            name: Some(p.name.clone()),
            shares: p.shares,
            cost_basis_price: p.cost_basis_price,
            current_price: Some(p.current_price),
            dividend_yield_pct: Some(p.dividend_yield_pct),
            dividend_growth_rate_pct: Some(p.dividend_growth_rate_pct),
            price_growth_rate_pct: Some(p.price_growth_rate_pct),
            contribution_per_month: Some(p.contribution_per_month),
            payout_frequency: Some(p.payout_frequency.payouts_per_year()),
            reinvest: Some(p.reinvest),
            source: Some(p.source),
        }
    }
}

impl TryFrom<SnapshotRow> for Position {
    type Error = PlannerError;

    fn try_from(row: SnapshotRow) -> Result<Self, Self::Error> {
        let symbol = row.symbol.trim().to_string();
        if symbol.is_empty() {
            return Err(PlannerError::Parse("row without symbol".to_string()));
        }

        let payout_frequency = match row.payout_frequency {
            Some(n) => PayoutFrequency::try_from(n)
                .map_err(|e| PlannerError::invalid_input(&symbol, e.to_string()))?,
            None => PayoutFrequency::default(),
        };

        Ok(Position {
            name: row
                .name
                .map(|n| n.trim().to_string())
                .filter(|n| !n.is_empty())
                .unwrap_or_else(|| symbol.clone()),
            current_price: row.current_price.unwrap_or(row.cost_basis_price),
            shares: row.shares,
            cost_basis_price: row.cost_basis_price,
            dividend_yield_pct: row.dividend_yield_pct.unwrap_or(0.0),
            dividend_growth_rate_pct: row.dividend_growth_rate_pct.unwrap_or(0.0),
            price_growth_rate_pct: row.price_growth_rate_pct.unwrap_or(0.0),
            contribution_per_month: row.contribution_per_month.unwrap_or(0.0),
            payout_frequency,
            reinvest: row.reinvest.unwrap_or(true),
            source: row.source.unwrap_or_default(),
            symbol,
        })
    }
}

use dividend_core::{
    PlannerError, PlannerResult, Position, PositionYear, ProjectionRecord, Snapshot,
};

use crate::models::*;
use crate::tax::DividendTax;
use crate::validation::{validate_position, validate_snapshot};

/// Month-by-month dividend compounding simulation.
///
/// Each month every position first buys units with its savings-plan
/// contribution, then, if it pays that month, distributes
/// `shares × annual dividend / frequency`. Dividends are taxed against the
/// shared yearly allowance and, with DRIP enabled, bought back into the same
/// position at the current price. Prices and dividends step up once per
/// year, after the year's record has been written.
pub struct ProjectionEngine {
    config: ProjectionConfig,
}

/// Mutable simulation state of one position. The input `Position` is never touched.
struct SimPosition<'a> {
    input: &'a Position,
    price: f64,
    annual_dividend_per_unit: f64,
    shares: f64,
    year_gross: f64,
}

impl<'a> SimPosition<'a> {
    fn new(input: &'a Position) -> Self {
        Self {
            input,
            price: input.current_price,
            annual_dividend_per_unit: input.annual_dividend_per_unit(),
            shares: input.shares,
            year_gross: 0.0,
        }
    }

    fn symbol(&self) -> &str {
        &self.input.symbol
    }

    fn market_value(&self) -> f64 {
        self.shares * self.price
    }

    /// Buy units worth `amount` at the current price.
    fn buy(&mut self, amount: f64, year: u32) -> PlannerResult<()> {
        if self.price <= 0.0 {
            return Err(PlannerError::invalid_input(
                self.symbol(),
                format!(
                    "cannot buy at non-positive price {} in year {}",
                    self.price, year
                ),
            ));
        }
        self.shares += amount / self.price;
        Ok(())
    }

    fn apply_annual_growth(&mut self) {
        self.price *= 1.0 + self.input.price_growth_rate_pct / 100.0;
        self.annual_dividend_per_unit *= 1.0 + self.input.dividend_growth_rate_pct / 100.0;
    }

    fn year_end(&self, effective_tax_rate: f64) -> PositionYear {
        PositionYear {
            symbol: self.input.symbol.clone(),
            shares: self.shares,
            market_value: self.market_value(),
            gross_dividend: self.year_gross,
            net_dividend: self.year_gross * (1.0 - effective_tax_rate),
        }
    }
}

/// Per-year accumulators, reset at every year boundary.
#[derive(Default)]
struct YearTotals {
    gross: f64,
    net: f64,
    tax: f64,
}

impl YearTotals {
    fn effective_tax_rate(&self) -> f64 {
        if self.gross > 0.0 {
            self.tax / self.gross
        } else {
            0.0
        }
    }
}

impl ProjectionEngine {
    pub fn new(config: ProjectionConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ProjectionConfig {
        &self.config
    }

    /// Project the snapshot, rejecting it if any position is invalid.
    ///
    /// Returns `horizon_years + 1` records, year 0 being the starting state.
    pub fn project(&self, snapshot: &Snapshot) -> PlannerResult<Vec<ProjectionRecord>> {
        self.config.validate()?;
        validate_snapshot(snapshot)?;
        let positions: Vec<&Position> = snapshot.iter().collect();
        self.simulate(&positions)
    }

    /// Project the snapshot, handling invalid positions according to `policy`.
    pub fn project_with_policy(
        &self,
        snapshot: &Snapshot,
        policy: InvalidPositionPolicy,
    ) -> PlannerResult<ProjectionOutcome> {
        self.config.validate()?;

        let mut positions = Vec::with_capacity(snapshot.len());
        let mut excluded = Vec::new();
        for position in snapshot {
            match validate_position(position) {
                Ok(()) => positions.push(position),
                Err(err) if policy == InvalidPositionPolicy::Exclude => {
                    tracing::warn!(symbol = %position.symbol, "Excluding position from projection: {}", err);
                    excluded.push(ExcludedPosition {
                        symbol: position.symbol.clone(),
                        reason: err.to_string(),
                    });
                }
                Err(err) => return Err(err),
            }
        }

        let records = self.simulate(&positions)?;
        Ok(ProjectionOutcome { records, excluded })
    }

    fn simulate(&self, positions: &[&Position]) -> PlannerResult<Vec<ProjectionRecord>> {
        let config = &self.config;
        let mut book: Vec<SimPosition> = positions.iter().map(|p| SimPosition::new(p)).collect();
        let mut invested_capital: f64 = positions.iter().map(|p| p.cost_basis()).sum();
        let mut tax = DividendTax::new(config.tax_rate, config.annual_allowance);
        let mut totals = YearTotals::default();

        let mut records = Vec::with_capacity(config.horizon_years as usize + 1);
        records.push(Self::record(0, invested_capital, &book, &totals));

        tracing::debug!(
            positions = book.len(),
            years = config.horizon_years,
            allowance = config.annual_allowance,
            "Starting dividend projection"
        );

        for month in 1..=config.total_months() {
            let month_in_year = (month - 1) % MONTHS_PER_YEAR + 1;
            let year = (month - 1) / MONTHS_PER_YEAR + 1;
            let mut monthly_savings = 0.0;

            for sim in book.iter_mut() {
                let contribution = sim.input.contribution_per_month;
                if contribution > 0.0 {
                    sim.buy(contribution, year)?;
                    monthly_savings += contribution;
                }

                let frequency = sim.input.payout_frequency;
                if !frequency.pays_in(month_in_year, config.annual_payout_month) {
                    continue;
                }

                let gross =
                    sim.shares * sim.annual_dividend_per_unit / frequency.payouts_per_year() as f64;
                if gross <= 0.0 {
                    continue;
                }

                let payout = tax.withhold(gross);
                totals.gross += payout.gross;
                totals.net += payout.net;
                totals.tax += payout.tax;
                sim.year_gross += payout.gross;

                tracing::trace!(
                    symbol = sim.symbol(),
                    month,
                    gross = payout.gross,
                    tax = payout.tax,
                    "Dividend payout"
                );

                if sim.input.reinvest {
                    sim.buy(payout.net, year)?;
                }
            }

            invested_capital += monthly_savings;

            if month_in_year == MONTHS_PER_YEAR {
                let record = Self::record(year, invested_capital, &book, &totals);
                tracing::debug!(
                    year,
                    portfolio_value = record.portfolio_value,
                    net_dividend = record.net_dividend,
                    taxes = record.taxes,
                    "Closed projection year"
                );
                records.push(record);

                totals = YearTotals::default();
                tax.reset_year();
                for sim in book.iter_mut() {
                    sim.year_gross = 0.0;
                    sim.apply_annual_growth();
                }
            }
        }

        Ok(records)
    }

    fn record(
        year: u32,
        invested_capital: f64,
        book: &[SimPosition],
        totals: &YearTotals,
    ) -> ProjectionRecord {
        let effective_tax_rate = totals.effective_tax_rate();
        let portfolio_value = book.iter().map(SimPosition::market_value).sum();
        let yield_on_cost_pct = if invested_capital > 0.0 {
            totals.net / invested_capital * 100.0
        } else {
            0.0
        };

        ProjectionRecord {
            year,
            invested_capital,
            portfolio_value,
            gross_dividend: totals.gross,
            net_dividend: totals.net,
            taxes: totals.tax,
            yield_on_cost_pct,
            positions: book.iter().map(|s| s.year_end(effective_tax_rate)).collect(),
        }
    }
}

/// Project `snapshot` over `horizon_years` with the default German tax
/// setup and the given yearly allowance.
pub fn project(
    snapshot: &Snapshot,
    horizon_years: u32,
    annual_allowance: f64,
) -> PlannerResult<Vec<ProjectionRecord>> {
    ProjectionEngine::new(ProjectionConfig::new(horizon_years, annual_allowance)).project(snapshot)
}

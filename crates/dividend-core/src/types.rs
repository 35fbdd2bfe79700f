use serde::{Deserialize, Serialize};

use crate::{PlannerError, PlannerResult};

/// How often a position distributes dividends per year.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum PayoutFrequency {
    #[default]
    Annual,
    SemiAnnual,
    Quarterly,
    Monthly,
}

impl PayoutFrequency {
    pub fn payouts_per_year(&self) -> u32 {
        match self {
            PayoutFrequency::Annual => 1,
            PayoutFrequency::SemiAnnual => 2,
            PayoutFrequency::Quarterly => 4,
            PayoutFrequency::Monthly => 12,
        }
    }

    /// Whether a payout falls in `month_in_year` (1..=12).
    ///
    /// Quarterly payers distribute in months 3, 6, 9 and 12, semi-annual payers
    /// in 6 and 12. Annual payers distribute once, in `annual_payout_month`.
    pub fn pays_in(&self, month_in_year: u32, annual_payout_month: u32) -> bool {
        match self {
            PayoutFrequency::Monthly => true,
            PayoutFrequency::Quarterly => month_in_year % 3 == 0,
            PayoutFrequency::SemiAnnual => month_in_year % 6 == 0,
            PayoutFrequency::Annual => month_in_year == annual_payout_month,
        }
    }
}

impl TryFrom<u32> for PayoutFrequency {
    type Error = PlannerError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(PayoutFrequency::Annual),
            2 => Ok(PayoutFrequency::SemiAnnual),
            4 => Ok(PayoutFrequency::Quarterly),
            12 => Ok(PayoutFrequency::Monthly),
            other => Err(PlannerError::InvalidFrequency(other)),
        }
    }
}

impl From<PayoutFrequency> for u32 {
    fn from(value: PayoutFrequency) -> Self {
        value.payouts_per_year()
    }
}

impl std::fmt::Display for PayoutFrequency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PayoutFrequency::Annual => write!(f, "annual"),
            PayoutFrequency::SemiAnnual => write!(f, "semi-annual"),
            PayoutFrequency::Quarterly => write!(f, "quarterly"),
            PayoutFrequency::Monthly => write!(f, "monthly"),
        }
    }
}

/// Where the market fields of a position came from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuoteSource {
    /// Fetched from a live quote service
    Live,
    /// Taken from the offline table
    Fallback,
    /// Entered by hand
    #[default]
    Manual,
}

impl std::fmt::Display for QuoteSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            QuoteSource::Live => write!(f, "live"),
            QuoteSource::Fallback => write!(f, "fallback"),
            QuoteSource::Manual => write!(f, "manual"),
        }
    }
}

/// One row of the holdings snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub symbol: String,
    /// Display name, informational only
    pub name: String,
    pub shares: f64,
    /// Average purchase price per unit
    pub cost_basis_price: f64,
    pub current_price: f64,
    /// Trailing annual yield in percent of `current_price`
    pub dividend_yield_pct: f64,
    pub dividend_growth_rate_pct: f64,
    pub price_growth_rate_pct: f64,
    /// Recurring monthly purchase amount (savings plan)
    pub contribution_per_month: f64,
    pub payout_frequency: PayoutFrequency,
    /// Reinvest net dividends into the same position
    pub reinvest: bool,
    pub source: QuoteSource,
}

impl Position {
    /// A position bought at `price` with no dividend, growth or savings plan.
    pub fn new(symbol: impl Into<String>, shares: f64, price: f64) -> Self {
        let symbol = symbol.into();
        Self {
            name: symbol.clone(),
            symbol,
            shares,
            cost_basis_price: price,
            current_price: price,
            dividend_yield_pct: 0.0,
            dividend_growth_rate_pct: 0.0,
            price_growth_rate_pct: 0.0,
            contribution_per_month: 0.0,
            payout_frequency: PayoutFrequency::Annual,
            reinvest: false,
            source: QuoteSource::Manual,
        }
    }

    pub fn with_cost_basis(mut self, cost_basis_price: f64) -> Self {
        self.cost_basis_price = cost_basis_price;
        self
    }

    pub fn with_dividend(mut self, yield_pct: f64, frequency: PayoutFrequency) -> Self {
        self.dividend_yield_pct = yield_pct;
        self.payout_frequency = frequency;
        self
    }

    pub fn with_growth(mut self, dividend_growth_pct: f64, price_growth_pct: f64) -> Self {
        self.dividend_growth_rate_pct = dividend_growth_pct;
        self.price_growth_rate_pct = price_growth_pct;
        self
    }

    pub fn with_contribution(mut self, per_month: f64) -> Self {
        self.contribution_per_month = per_month;
        self
    }

    pub fn with_reinvest(mut self, reinvest: bool) -> Self {
        self.reinvest = reinvest;
        self
    }

    pub fn with_source(mut self, source: QuoteSource) -> Self {
        self.source = source;
        self
    }

    /// Annual dividend per unit implied by the trailing yield.
    pub fn annual_dividend_per_unit(&self) -> f64 {
        self.current_price * self.dividend_yield_pct / 100.0
    }

    /// Cash committed to the position at its average purchase price.
    pub fn cost_basis(&self) -> f64 {
        self.shares * self.cost_basis_price
    }

    pub fn market_value(&self) -> f64 {
        self.shares * self.current_price
    }
}

/// Ordered collection of positions with unique symbols.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Position>", into = "Vec<Position>")]
pub struct Snapshot {
    positions: Vec<Position>,
}

impl Snapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a snapshot, rejecting repeated symbols.
    pub fn from_positions(positions: Vec<Position>) -> PlannerResult<Self> {
        let mut snapshot = Self::new();
        for position in positions {
            snapshot.push(position)?;
        }
        Ok(snapshot)
    }

    /// Append a position at the end of the snapshot order.
    pub fn push(&mut self, position: Position) -> PlannerResult<()> {
        if self.contains(&position.symbol) {
            return Err(PlannerError::DuplicateSymbol(position.symbol));
        }
        self.positions.push(position);
        Ok(())
    }

    pub fn remove(&mut self, symbol: &str) -> Option<Position> {
        let idx = self.positions.iter().position(|p| p.symbol == symbol)?;
        Some(self.positions.remove(idx))
    }

    pub fn contains(&self, symbol: &str) -> bool {
        self.positions.iter().any(|p| p.symbol == symbol)
    }

    pub fn get(&self, symbol: &str) -> Option<&Position> {
        self.positions.iter().find(|p| p.symbol == symbol)
    }

    /// Mutable access for editors. The symbol must not be changed through it.
    pub fn get_mut(&mut self, symbol: &str) -> Option<&mut Position> {
        self.positions.iter_mut().find(|p| p.symbol == symbol)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Position> {
        self.positions.iter()
    }

    pub fn positions(&self) -> &[Position] {
        &self.positions
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Σ shares × cost basis price
    pub fn invested_capital(&self) -> f64 {
        self.positions.iter().map(Position::cost_basis).sum()
    }

    /// Σ shares × current price
    pub fn market_value(&self) -> f64 {
        self.positions.iter().map(Position::market_value).sum()
    }
}

impl TryFrom<Vec<Position>> for Snapshot {
    type Error = PlannerError;

    fn try_from(positions: Vec<Position>) -> Result<Self, Self::Error> {
        Self::from_positions(positions)
    }
}

impl From<Snapshot> for Vec<Position> {
    fn from(snapshot: Snapshot) -> Self {
        snapshot.positions
    }
}

impl<'a> IntoIterator for &'a Snapshot {
    type Item = &'a Position;
    type IntoIter = std::slice::Iter<'a, Position>;

    fn into_iter(self) -> Self::IntoIter {
        self.positions.iter()
    }
}

/// Year-end state of one position inside a projection record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionYear {
    pub symbol: String,
    pub shares: f64,
    pub market_value: f64,
    pub gross_dividend: f64,
    /// Gross scaled by the portfolio's effective tax rate for the year.
    /// The allowance is shared, so this is an attribution, not a ledger value.
    pub net_dividend: f64,
}

/// One year of the projection ledger. Year 0 is the starting baseline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionRecord {
    pub year: u32,
    pub invested_capital: f64,
    pub portfolio_value: f64,
    pub gross_dividend: f64,
    pub net_dividend: f64,
    pub taxes: f64,
    pub yield_on_cost_pct: f64,
    pub positions: Vec<PositionYear>,
}

impl ProjectionRecord {
    pub fn average_monthly_net(&self) -> f64 {
        self.net_dividend / 12.0
    }

    pub fn effective_tax_rate(&self) -> f64 {
        if self.gross_dividend > 0.0 {
            self.taxes / self.gross_dividend
        } else {
            0.0
        }
    }

    pub fn unrealized_gain(&self) -> f64 {
        self.portfolio_value - self.invested_capital
    }

    pub fn position(&self, symbol: &str) -> Option<&PositionYear> {
        self.positions.iter().find(|p| p.symbol == symbol)
    }
}

/// Market data for one ticker as returned by a provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    pub symbol: String,
    pub name: String,
    /// Price in `currency`
    pub price: f64,
    pub currency: String,
    pub dividend_yield_pct: f64,
    pub payout_frequency: PayoutFrequency,
    /// Five-year price CAGR, when history was available
    pub price_growth_pct: Option<f64>,
    /// Five-year dividend CAGR, when history was available
    pub dividend_growth_pct: Option<f64>,
    pub source: QuoteSource,
}

/// Outcome of a provider lookup.
#[derive(Debug, Clone, PartialEq)]
pub enum Lookup {
    Found(Quote),
    NotFound,
}

impl Lookup {
    pub fn found(self) -> Option<Quote> {
        match self {
            Lookup::Found(quote) => Some(quote),
            Lookup::NotFound => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_enum_defaults() {
        assert_eq!(PayoutFrequency::default(), PayoutFrequency::Annual);
        assert_eq!(QuoteSource::default(), QuoteSource::Manual);
    }

    #[test]
    fn test_frequency_from_u32() {
        assert_eq!(PayoutFrequency::try_from(12).unwrap(), PayoutFrequency::Monthly);
        assert_eq!(PayoutFrequency::try_from(2).unwrap(), PayoutFrequency::SemiAnnual);
        assert_eq!(
            PayoutFrequency::try_from(3),
            Err(PlannerError::InvalidFrequency(3))
        );
        assert_eq!(u32::from(PayoutFrequency::Quarterly), 4);
    }

    #[test]
    fn test_payout_months() {
        let quarterly: Vec<u32> = (1..=12)
            .filter(|m| PayoutFrequency::Quarterly.pays_in(*m, 6))
            .collect();
        assert_eq!(quarterly, vec![3, 6, 9, 12]);

        let semi: Vec<u32> = (1..=12)
            .filter(|m| PayoutFrequency::SemiAnnual.pays_in(*m, 6))
            .collect();
        assert_eq!(semi, vec![6, 12]);

        assert!(PayoutFrequency::Annual.pays_in(5, 5));
        assert!(!PayoutFrequency::Annual.pays_in(6, 5));
        assert_eq!((1..=12).filter(|m| PayoutFrequency::Monthly.pays_in(*m, 6)).count(), 12);
    }

    #[test]
    fn test_frequency_serde_as_integer() {
        let json = serde_json::to_string(&PayoutFrequency::Monthly).unwrap();
        assert_eq!(json, "12");
        let parsed: PayoutFrequency = serde_json::from_str("4").unwrap();
        assert_eq!(parsed, PayoutFrequency::Quarterly);
        assert!(serde_json::from_str::<PayoutFrequency>("5").is_err());
    }

    #[test]
    fn test_snapshot_rejects_duplicates() {
        let mut snapshot = Snapshot::new();
        snapshot.push(Position::new("O", 10.0, 50.0)).unwrap();
        let err = snapshot.push(Position::new("O", 5.0, 51.0)).unwrap_err();
        assert_eq!(err, PlannerError::DuplicateSymbol("O".to_string()));
        assert_eq!(snapshot.len(), 1);
    }

    #[test]
    fn test_snapshot_totals() {
        let snapshot = Snapshot::from_positions(vec![
            Position::new("O", 10.0, 50.0).with_cost_basis(40.0),
            Position::new("KO", 4.0, 60.0),
        ])
        .unwrap();
        assert_relative_eq!(snapshot.invested_capital(), 640.0);
        assert_relative_eq!(snapshot.market_value(), 740.0);
    }

    #[test]
    fn test_snapshot_remove_keeps_order() {
        let mut snapshot = Snapshot::from_positions(vec![
            Position::new("A", 1.0, 1.0),
            Position::new("B", 1.0, 1.0),
            Position::new("C", 1.0, 1.0),
        ])
        .unwrap();
        assert!(snapshot.remove("B").is_some());
        assert!(snapshot.remove("B").is_none());
        let symbols: Vec<&str> = snapshot.iter().map(|p| p.symbol.as_str()).collect();
        assert_eq!(symbols, vec!["A", "C"]);
    }

    #[test]
    fn test_annual_dividend_per_unit() {
        let position = Position::new("X", 100.0, 50.0).with_dividend(4.0, PayoutFrequency::Monthly);
        assert_relative_eq!(position.annual_dividend_per_unit(), 2.0);
    }

    #[test]
    fn test_record_helpers() {
        let record = ProjectionRecord {
            year: 1,
            invested_capital: 5000.0,
            portfolio_value: 5500.0,
            gross_dividend: 200.0,
            net_dividend: 180.0,
            taxes: 20.0,
            yield_on_cost_pct: 3.6,
            positions: Vec::new(),
        };
        assert_relative_eq!(record.average_monthly_net(), 15.0);
        assert_relative_eq!(record.effective_tax_rate(), 0.1);
        assert_relative_eq!(record.unrealized_gain(), 500.0);
    }
}

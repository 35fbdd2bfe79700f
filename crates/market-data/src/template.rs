use dividend_core::{PayoutFrequency, Position, Quote, QuoteSource};

/// New holding from a provider quote, bought at the quoted price.
///
/// Growth estimates the provider could not derive fall back to
/// `default_growth_pct`. Dividends are reinvested by default.
pub fn position_from_quote(
    quote: &Quote,
    shares: f64,
    contribution_per_month: f64,
    default_growth_pct: f64,
) -> Position {
    let mut position = Position::new(quote.symbol.clone(), shares, quote.price)
        .with_dividend(quote.dividend_yield_pct, quote.payout_frequency)
        .with_growth(
            quote.dividend_growth_pct.unwrap_or(default_growth_pct),
            quote.price_growth_pct.unwrap_or(default_growth_pct),
        )
        .with_contribution(contribution_per_month)
        .with_reinvest(true)
        .with_source(quote.source);
    position.name = quote.name.clone();
    position
}

/// Placeholder for a symbol no provider knows. It has no price, so it is
/// invalid for projection until the user fills it in.
pub fn manual_position(
    symbol: &str,
    shares: f64,
    contribution_per_month: f64,
    default_growth_pct: f64,
) -> Position {
    Position::new(symbol.trim().to_uppercase(), shares, 0.0)
        .with_dividend(0.0, PayoutFrequency::Annual)
        .with_growth(default_growth_pct, default_growth_pct)
        .with_contribution(contribution_per_month)
        .with_reinvest(true)
        .with_source(QuoteSource::Manual)
}

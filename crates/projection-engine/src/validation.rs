use dividend_core::{PlannerError, PlannerResult, Position, Snapshot};

/// Check that a position can be simulated.
///
/// Payout frequency needs no check here: `PayoutFrequency` only admits 1, 2, 4 and 12.
pub fn validate_position(position: &Position) -> PlannerResult<()> {
    let symbol = position.symbol.as_str();
    if symbol.trim().is_empty() {
        return Err(PlannerError::invalid_input(symbol, "symbol is empty"));
    }

    let numbers = [
        ("shares", position.shares),
        ("cost_basis_price", position.cost_basis_price),
        ("current_price", position.current_price),
        ("dividend_yield_pct", position.dividend_yield_pct),
        ("dividend_growth_rate_pct", position.dividend_growth_rate_pct),
        ("price_growth_rate_pct", position.price_growth_rate_pct),
        ("contribution_per_month", position.contribution_per_month),
    ];
    for (field, value) in numbers {
        if !value.is_finite() {
            return Err(PlannerError::invalid_input(
                symbol,
                format!("{} is not a finite number", field),
            ));
        }
    }

    if position.current_price <= 0.0 {
        return Err(PlannerError::invalid_input(
            symbol,
            format!("current_price must be positive, got {}", position.current_price),
        ));
    }

    let non_negative = [
        ("shares", position.shares),
        ("cost_basis_price", position.cost_basis_price),
        ("dividend_yield_pct", position.dividend_yield_pct),
        ("contribution_per_month", position.contribution_per_month),
    ];
    for (field, value) in non_negative {
        if value < 0.0 {
            return Err(PlannerError::invalid_input(
                symbol,
                format!("{} must not be negative, got {}", field, value),
            ));
        }
    }

    // A step-up below -100% would flip the price or dividend negative
    let growth = [
        ("dividend_growth_rate_pct", position.dividend_growth_rate_pct),
        ("price_growth_rate_pct", position.price_growth_rate_pct),
    ];
    for (field, value) in growth {
        if value < -100.0 {
            return Err(PlannerError::invalid_input(
                symbol,
                format!("{} must not be below -100, got {}", field, value),
            ));
        }
    }

    Ok(())
}

/// Validate every position, failing on the first invalid one.
pub fn validate_snapshot(snapshot: &Snapshot) -> PlannerResult<()> {
    snapshot.iter().try_for_each(validate_position)
}

use dividend_core::{PayoutFrequency, PlannerError, PlannerResult, Snapshot};

/// Editable position fields. The symbol is the key and cannot be edited.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PositionField {
    Name,
    Shares,
    CostBasis,
    Price,
    Yield,
    DividendGrowth,
    PriceGrowth,
    Contribution,
    Frequency,
    Reinvest,
}

impl std::str::FromStr for PositionField {
    type Err = PlannerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "name" => Ok(Self::Name),
            "shares" => Ok(Self::Shares),
            "cost_basis" | "cost_basis_price" => Ok(Self::CostBasis),
            "price" | "current_price" => Ok(Self::Price),
            "yield" | "dividend_yield_pct" => Ok(Self::Yield),
            "div_growth" | "dividend_growth_rate_pct" => Ok(Self::DividendGrowth),
            "price_growth" | "price_growth_rate_pct" => Ok(Self::PriceGrowth),
            "contribution" | "contribution_per_month" => Ok(Self::Contribution),
            "frequency" | "payout_frequency" => Ok(Self::Frequency),
            "reinvest" => Ok(Self::Reinvest),
            other => Err(PlannerError::Parse(format!("unknown field '{}'", other))),
        }
    }
}

fn parse_number(symbol: &str, value: &str) -> PlannerResult<f64> {
    let n: f64 = value
        .trim()
        .parse()
        .map_err(|_| PlannerError::invalid_input(symbol, format!("'{}' is not a number", value)))?;
    if !n.is_finite() {
        return Err(PlannerError::invalid_input(symbol, format!("'{}' is not finite", value)));
    }
    Ok(n)
}

fn parse_non_negative(symbol: &str, value: &str) -> PlannerResult<f64> {
    let n = parse_number(symbol, value)?;
    if n < 0.0 {
        return Err(PlannerError::invalid_input(symbol, format!("{} must not be negative", n)));
    }
    Ok(n)
}

/// Set one field of the position `symbol` from user text.
pub fn apply_edit(
    snapshot: &mut Snapshot,
    symbol: &str,
    field: PositionField,
    value: &str,
) -> PlannerResult<()> {
    let position = snapshot
        .get_mut(symbol)
        .ok_or_else(|| PlannerError::UnknownSymbol(symbol.to_string()))?;

    match field {
        PositionField::Name => position.name = value.trim().to_string(),
        PositionField::Shares => position.shares = parse_non_negative(symbol, value)?,
        PositionField::CostBasis => position.cost_basis_price = parse_non_negative(symbol, value)?,
        PositionField::Price => {
            let price = parse_number(symbol, value)?;
            if price <= 0.0 {
                return Err(PlannerError::invalid_input(symbol, "price must be positive"));
            }
            position.current_price = price;
        }
        PositionField::Yield => position.dividend_yield_pct = parse_non_negative(symbol, value)?,
        PositionField::DividendGrowth => {
            position.dividend_growth_rate_pct = parse_number(symbol, value)?
        }
        PositionField::PriceGrowth => position.price_growth_rate_pct = parse_number(symbol, value)?,
        PositionField::Contribution => {
            position.contribution_per_month = parse_non_negative(symbol, value)?
        }
        PositionField::Frequency => {
            let n: u32 = value.trim().parse().map_err(|_| {
                PlannerError::invalid_input(symbol, format!("'{}' is not a frequency", value))
            })?;
            position.payout_frequency = PayoutFrequency::try_from(n)?;
        }
        PositionField::Reinvest => {
            position.reinvest = match value.trim().to_lowercase().as_str() {
                "true" | "yes" | "1" | "on" => true,
                "false" | "no" | "0" | "off" => false,
                other => {
                    return Err(PlannerError::invalid_input(
                        symbol,
                        format!("'{}' is not a boolean", other),
                    ))
                }
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use dividend_core::Position;

    fn snapshot() -> Snapshot {
        Snapshot::from_positions(vec![Position::new("KO", 10.0, 59.5)]).unwrap()
    }

    #[test]
    fn test_edit_numeric_fields() {
        let mut s = snapshot();
        apply_edit(&mut s, "KO", "shares".parse().unwrap(), "12.5").unwrap();
        apply_edit(&mut s, "KO", "div_growth".parse().unwrap(), "-1.5").unwrap();
        apply_edit(&mut s, "KO", PositionField::Contribution, "25").unwrap();
        let ko = s.get("KO").unwrap();
        assert_eq!(ko.shares, 12.5);
        assert_eq!(ko.dividend_growth_rate_pct, -1.5);
        assert_eq!(ko.contribution_per_month, 25.0);
    }

    #[test]
    fn test_edit_frequency_and_reinvest() {
        let mut s = snapshot();
        apply_edit(&mut s, "KO", PositionField::Frequency, "4").unwrap();
        apply_edit(&mut s, "KO", PositionField::Reinvest, "yes").unwrap();
        let ko = s.get("KO").unwrap();
        assert_eq!(ko.payout_frequency, PayoutFrequency::Quarterly);
        assert!(ko.reinvest);

        assert_eq!(
            apply_edit(&mut s, "KO", PositionField::Frequency, "3").unwrap_err(),
            PlannerError::InvalidFrequency(3)
        );
    }

    #[test]
    fn test_edit_rejects_bad_values() {
        let mut s = snapshot();
        assert!(apply_edit(&mut s, "KO", PositionField::Shares, "-1").is_err());
        assert!(apply_edit(&mut s, "KO", PositionField::Price, "0").is_err());
        assert!(apply_edit(&mut s, "KO", PositionField::Yield, "abc").is_err());
        assert!(apply_edit(&mut s, "KO", PositionField::Reinvest, "maybe").is_err());
        assert_eq!(s, snapshot());
    }

    #[test]
    fn test_edit_unknown_symbol() {
        let mut s = snapshot();
        assert_eq!(
            apply_edit(&mut s, "PEP", PositionField::Shares, "1").unwrap_err(),
            PlannerError::UnknownSymbol("PEP".to_string())
        );
        assert!("colour".parse::<PositionField>().is_err());
    }
}

use dividend_core::Snapshot;
use projection_engine::{ProjectionOutcome, SnapshotSummary};
use std::fmt::Write;

/// Holdings table followed by the current-state summary.
pub fn format_snapshot(snapshot: &Snapshot) -> String {
    let mut out = String::new();
    if snapshot.is_empty() {
        out.push_str("Portfolio is empty. Add a position with `dividend-planner add <SYMBOL>`.\n");
        return out;
    }

    let _ = writeln!(
        out,
        "{:<10} {:<24} {:>10} {:>10} {:>10} {:>7} {:>7} {:>7} {:>9} {:>5} {:>8} {:<8}",
        "Symbol", "Name", "Shares", "Cost", "Price", "Yield%", "DivG%", "PxG%", "Plan/mo", "Freq", "Reinvest", "Source"
    );
    for p in snapshot {
        let _ = writeln!(
            out,
            "{:<10} {:<24} {:>10.4} {:>10.2} {:>10.2} {:>7.2} {:>7.2} {:>7.2} {:>9.2} {:>5} {:>8} {:<8}",
            p.symbol,
            truncate(&p.name, 24),
            p.shares,
            p.cost_basis_price,
            p.current_price,
            p.dividend_yield_pct,
            p.dividend_growth_rate_pct,
            p.price_growth_rate_pct,
            p.contribution_per_month,
            p.payout_frequency.payouts_per_year(),
            if p.reinvest { "yes" } else { "no" },
            p.source.to_string(),
        );
    }

    let summary = SnapshotSummary::from_snapshot(snapshot);
    let _ = writeln!(out);
    let _ = writeln!(out, "Positions:         {}", summary.positions);
    let _ = writeln!(out, "Invested capital:  {:.2}", summary.invested_capital);
    let _ = writeln!(out, "Market value:      {:.2}", summary.market_value);
    let _ = writeln!(
        out,
        "Unrealized gain:   {:.2} ({:.2}%)",
        summary.unrealized_gain, summary.unrealized_gain_pct
    );
    let _ = writeln!(out, "Forward dividends: {:.2} gross per year", summary.forward_gross_dividend);
    out
}

/// Year-by-year projection table.
pub fn format_projection(outcome: &ProjectionOutcome) -> String {
    let mut out = String::new();
    for excluded in &outcome.excluded {
        let _ = writeln!(out, "Excluded {}: {}", excluded.symbol, excluded.reason);
    }
    if !outcome.excluded.is_empty() {
        let _ = writeln!(out);
    }

    let _ = writeln!(
        out,
        "{:>4} {:>14} {:>14} {:>12} {:>12} {:>10} {:>8} {:>11}",
        "Year", "Invested", "Value", "Gross div", "Net div", "Taxes", "YoC %", "Net/month"
    );
    for r in &outcome.records {
        let _ = writeln!(
            out,
            "{:>4} {:>14.2} {:>14.2} {:>12.2} {:>12.2} {:>10.2} {:>8.2} {:>11.2}",
            r.year,
            r.invested_capital,
            r.portfolio_value,
            r.gross_dividend,
            r.net_dividend,
            r.taxes,
            r.yield_on_cost_pct,
            r.average_monthly_net(),
        );
    }
    out
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let mut t: String = s.chars().take(max - 1).collect();
        t.push('…');
        t
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dividend_core::{PayoutFrequency, Position};
    use projection_engine::{InvalidPositionPolicy, ProjectionConfig, ProjectionEngine};

    fn snapshot() -> Snapshot {
        Snapshot::from_positions(vec![
            Position::new("O", 100.0, 50.0).with_dividend(6.0, PayoutFrequency::Monthly),
            Position::new("BAD", 1.0, 0.0),
        ])
        .unwrap()
    }

    #[test]
    fn test_snapshot_table_and_summary() {
        let text = format_snapshot(&snapshot());
        assert!(text.starts_with("Symbol"));
        assert!(text.contains("Market value:      5000.00"));
        assert!(text.contains("Forward dividends: 300.00"));
        assert!(format_snapshot(&Snapshot::new()).contains("empty"));
    }

    #[test]
    fn test_projection_table() {
        let engine = ProjectionEngine::new(ProjectionConfig::new(2, 1000.0));
        let outcome = engine
            .project_with_policy(&snapshot(), InvalidPositionPolicy::Exclude)
            .unwrap();
        let text = format_projection(&outcome);

        assert!(text.starts_with("Excluded BAD:"));
        // One row per year 0..=2
        assert_eq!(text.lines().filter(|l| l.trim_start().starts_with(char::is_numeric)).count(), 3);
        assert_eq!(outcome.excluded[0].symbol, "BAD");
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("Allianz SE", 24), "Allianz SE");
        assert_eq!(truncate("Main Street Capital Corporation", 10).chars().count(), 10);
    }
}

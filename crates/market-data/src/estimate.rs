//! Estimates derived from price and dividend history.

use chrono::{DateTime, Duration, Utc};
use dividend_core::PayoutFrequency;

const DAYS_PER_YEAR: f64 = 365.25;

/// A dated amount (close price or dividend).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DatedValue {
    pub timestamp: DateTime<Utc>,
    pub value: f64,
}

impl DatedValue {
    pub fn new(timestamp: DateTime<Utc>, value: f64) -> Self {
        Self { timestamp, value }
    }
}

/// Map the number of distributions seen in the last twelve months to a frequency.
pub fn estimate_payout_frequency(payouts_last_year: usize) -> PayoutFrequency {
    match payouts_last_year {
        n if n >= 10 => PayoutFrequency::Monthly,
        n if n >= 3 => PayoutFrequency::Quarterly,
        2 => PayoutFrequency::SemiAnnual,
        _ => PayoutFrequency::Annual,
    }
}

/// Compound annual growth rate in percent.
pub fn cagr_pct(start: f64, end: f64, years: f64) -> Option<f64> {
    if start <= 0.0 || end <= 0.0 || years <= 0.0 || !start.is_finite() || !end.is_finite() {
        return None;
    }
    Some(((end / start).powf(1.0 / years) - 1.0) * 100.0)
}

fn years_between(from: DateTime<Utc>, to: DateTime<Utc>) -> f64 {
    (to - from).num_days() as f64 / DAYS_PER_YEAR
}

/// Number of dividends paid in the twelve months up to `as_of`.
pub fn payouts_in_last_year(dividends: &[DatedValue], as_of: DateTime<Utc>) -> usize {
    let from = as_of - Duration::days(365);
    dividends
        .iter()
        .filter(|d| d.timestamp > from && d.timestamp <= as_of)
        .count()
}

/// Price CAGR between the first and last close.
pub fn price_growth_pct(closes: &[DatedValue]) -> Option<f64> {
    let first = closes.iter().find(|c| c.value > 0.0)?;
    let last = closes.iter().rev().find(|c| c.value > 0.0)?;
    cagr_pct(first.value, last.value, years_between(first.timestamp, last.timestamp))
}

fn trailing_year_sum(dividends: &[DatedValue], end: DateTime<Utc>) -> f64 {
    let from = end - Duration::days(365);
    dividends
        .iter()
        .filter(|d| d.timestamp > from && d.timestamp <= end)
        .map(|d| d.value)
        .sum()
}

/// Dividend CAGR comparing the trailing twelve-month sum with the
/// twelve-month sum a whole number of years earlier.
///
/// The look-back is the number of full years covered by the history, so at
/// least one year of data before the trailing window is needed.
pub fn dividend_growth_pct(dividends: &[DatedValue], as_of: DateTime<Utc>) -> Option<f64> {
    let start = dividends.iter().map(|d| d.timestamp).min()?;
    let years = years_between(start, as_of).floor();
    if years < 1.0 {
        return None;
    }

    let earlier_end = as_of - Duration::days((years * DAYS_PER_YEAR).round() as i64);
    cagr_pct(
        trailing_year_sum(dividends, earlier_end),
        trailing_year_sum(dividends, as_of),
        years,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::TimeZone;

    fn at(year: i32, month: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(year, month, 15, 0, 0, 0).unwrap()
    }

    #[test]
    fn test_frequency_buckets() {
        assert_eq!(estimate_payout_frequency(12), PayoutFrequency::Monthly);
        assert_eq!(estimate_payout_frequency(11), PayoutFrequency::Monthly);
        assert_eq!(estimate_payout_frequency(4), PayoutFrequency::Quarterly);
        assert_eq!(estimate_payout_frequency(3), PayoutFrequency::Quarterly);
        assert_eq!(estimate_payout_frequency(2), PayoutFrequency::SemiAnnual);
        assert_eq!(estimate_payout_frequency(1), PayoutFrequency::Annual);
        assert_eq!(estimate_payout_frequency(0), PayoutFrequency::Annual);
    }

    #[test]
    fn test_cagr() {
        assert_relative_eq!(cagr_pct(100.0, 121.0, 2.0).unwrap(), 10.0, epsilon = 1e-9);
        assert_relative_eq!(cagr_pct(100.0, 81.0, 2.0).unwrap(), -10.0, epsilon = 1e-9);
        assert!(cagr_pct(0.0, 10.0, 2.0).is_none());
        assert!(cagr_pct(10.0, 10.0, 0.0).is_none());
    }

    #[test]
    fn test_quarterly_history() {
        let dividends: Vec<DatedValue> = (2020..=2024)
            .flat_map(|y| [3, 6, 9, 12].map(|m| DatedValue::new(at(y, m), 0.5)))
            .collect();
        let as_of = at(2024, 12);
        assert_eq!(payouts_in_last_year(&dividends, as_of), 4);
        assert_eq!(
            estimate_payout_frequency(payouts_in_last_year(&dividends, as_of)),
            PayoutFrequency::Quarterly
        );
        assert_relative_eq!(dividend_growth_pct(&dividends, as_of).unwrap(), 0.0, epsilon = 1e-9);
    }

    #[test]
    fn test_dividend_growth_from_annual_payer() {
        let dividends = vec![
            DatedValue::new(at(2020, 5), 1.00),
            DatedValue::new(at(2021, 5), 1.10),
            DatedValue::new(at(2022, 5), 1.21),
            DatedValue::new(at(2023, 5), 1.331),
        ];
        // Three full years between the first and the trailing window.
        let growth = dividend_growth_pct(&dividends, at(2023, 6)).unwrap();
        assert_relative_eq!(growth, 10.0, epsilon = 1e-9);
    }

    #[test]
    fn test_dividend_growth_needs_a_full_year() {
        let dividends = vec![DatedValue::new(at(2024, 1), 1.0), DatedValue::new(at(2024, 7), 1.0)];
        assert!(dividend_growth_pct(&dividends, at(2024, 12)).is_none());
        assert!(dividend_growth_pct(&[], at(2024, 12)).is_none());
    }

    #[test]
    fn test_price_growth() {
        let closes = vec![
            DatedValue::new(at(2020, 1), 100.0),
            DatedValue::new(at(2021, 1), 0.0),
            DatedValue::new(at(2022, 1), 121.0),
        ];
        let growth = price_growth_pct(&closes).unwrap();
        assert!((growth - 10.0).abs() < 0.1, "growth was {}", growth);
    }
}

//! German dividend withholding
//!
//! Flat-rate tax on dividends above a yearly tax-free allowance
//! (Sparerpauschbetrag). The allowance is shared by every payout in the
//! year and consumed in the order payouts arrive.

use serde::{Deserialize, Serialize};

use crate::models::GERMAN_FLAT_TAX_RATE;

/// Tax split of a single payout.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TaxedPayout {
    pub gross: f64,
    pub tax: f64,
    pub net: f64,
    /// Part of the gross covered by the allowance
    pub allowance_used: f64,
}

/// Withholding state for one tax year.
#[derive(Debug, Clone, PartialEq)]
pub struct DividendTax {
    rate: f64,
    annual_allowance: f64,
    remaining_allowance: f64,
}

impl DividendTax {
    pub fn new(rate: f64, annual_allowance: f64) -> Self {
        Self {
            rate,
            annual_allowance,
            remaining_allowance: annual_allowance,
        }
    }

    /// Flat German rate with the given allowance.
    pub fn germany(annual_allowance: f64) -> Self {
        Self::new(GERMAN_FLAT_TAX_RATE, annual_allowance)
    }

    pub fn rate(&self) -> f64 {
        self.rate
    }

    pub fn remaining_allowance(&self) -> f64 {
        self.remaining_allowance
    }

    /// Withhold tax on a payout and consume allowance.
    ///
    /// A payout equal to the remaining allowance is untaxed and leaves the
    /// allowance at zero. Once exhausted, payouts are taxed in full until
    /// `reset_year`.
    pub fn withhold(&mut self, gross: f64) -> TaxedPayout {
        if gross <= 0.0 {
            return TaxedPayout {
                gross,
                tax: 0.0,
                net: gross,
                allowance_used: 0.0,
            };
        }

        let (tax, allowance_used) = if gross > self.remaining_allowance {
            let used = self.remaining_allowance;
            let taxable = gross - used;
            self.remaining_allowance = 0.0;
            (taxable * self.rate, used)
        } else {
            self.remaining_allowance -= gross;
            (0.0, gross)
        };

        TaxedPayout {
            gross,
            tax,
            net: gross - tax,
            allowance_used,
        }
    }

    /// Restore the full allowance at the start of a new tax year.
    pub fn reset_year(&mut self) {
        self.remaining_allowance = self.annual_allowance;
    }
}

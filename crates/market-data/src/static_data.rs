use async_trait::async_trait;
use dividend_core::{
    Lookup, MarketDataProvider, PayoutFrequency, PlannerResult, Quote, QuoteSource,
};

use dividend_core::PayoutFrequency::{Annual, Monthly, Quarterly};

struct Listing {
    symbol: &'static str,
    name: &'static str,
    price: f64,
    dividend_yield_pct: f64,
    dividend_growth_pct: f64,
    price_growth_pct: f64,
    payout_frequency: PayoutFrequency,
}

const fn listing(
    symbol: &'static str,
    name: &'static str,
    price: f64,
    dividend_yield_pct: f64,
    dividend_growth_pct: f64,
    price_growth_pct: f64,
    payout_frequency: PayoutFrequency,
) -> Listing {
    Listing {
        symbol,
        name,
        price,
        dividend_yield_pct,
        dividend_growth_pct,
        price_growth_pct,
        payout_frequency,
    }
}

// Offline prices in EUR. Order matters for partial matches.
const LISTINGS: &[Listing] = &[
    // Monthly payers
    listing("O", "Realty Income", 52.50, 5.8, 3.1, 2.5, Monthly),
    listing("MAIN", "Main Street Capital", 49.80, 6.1, 3.5, 4.2, Monthly),
    listing("STAG", "STAG Industrial", 36.20, 4.1, 0.7, 3.0, Monthly),
    listing("LTC", "LTC Properties", 33.50, 6.8, 0.5, 1.0, Monthly),
    listing("EPR", "EPR Properties", 42.00, 7.8, 1.5, -1.0, Monthly),
    listing("ADC", "Agree Realty", 61.00, 4.8, 5.5, 6.0, Monthly),
    // Quarterly payers, US
    listing("MSFT", "Microsoft Corp.", 405.00, 0.7, 10.2, 15.0, Quarterly),
    listing("AAPL", "Apple Inc.", 175.00, 0.5, 5.8, 12.0, Quarterly),
    listing("JNJ", "Johnson & Johnson", 148.00, 3.2, 5.4, 3.0, Quarterly),
    listing("KO", "Coca-Cola", 59.50, 3.3, 4.5, 4.0, Quarterly),
    listing("PEP", "PepsiCo", 168.00, 3.1, 7.2, 6.0, Quarterly),
    listing("PG", "Procter & Gamble", 162.00, 2.4, 5.1, 5.5, Quarterly),
    listing("MCD", "McDonald's", 275.00, 2.4, 8.0, 7.0, Quarterly),
    listing("SBUX", "Starbucks", 92.00, 2.5, 9.0, 8.0, Quarterly),
    listing("HD", "Home Depot", 360.00, 2.6, 12.0, 9.0, Quarterly),
    listing("LOW", "Lowe's", 235.00, 1.8, 15.0, 10.0, Quarterly),
    listing("AVGO", "Broadcom", 1250.00, 1.6, 12.0, 20.0, Quarterly),
    listing("CSCO", "Cisco Systems", 48.00, 3.3, 2.8, 3.0, Quarterly),
    listing("PFE", "Pfizer", 28.00, 6.0, 2.5, -2.0, Quarterly),
    listing("ABBV", "AbbVie", 175.00, 3.5, 6.5, 8.0, Quarterly),
    listing("MMM", "3M Company", 95.00, 6.2, 0.5, -4.0, Quarterly),
    listing("T", "AT&T", 17.20, 6.4, 0.0, 1.0, Quarterly),
    listing("VZ", "Verizon", 40.50, 6.6, 1.9, 0.5, Quarterly),
    listing("XOM", "Exxon Mobil", 115.00, 3.3, 3.5, 6.0, Quarterly),
    listing("CVX", "Chevron", 155.00, 4.2, 6.0, 4.0, Quarterly),
    listing("V", "Visa", 280.00, 0.7, 15.0, 12.0, Quarterly),
    listing("MA", "Mastercard", 460.00, 0.6, 16.0, 13.0, Quarterly),
    // Annual payers, Germany
    listing("ALV.DE", "Allianz SE", 285.00, 5.0, 5.8, 6.5, Annual),
    listing("BAS.DE", "BASF SE", 48.00, 7.1, 1.0, 0.0, Annual),
    listing("MUV2.DE", "Münchener Rück", 470.00, 3.2, 5.0, 8.0, Annual),
    listing("BMW.DE", "BMW AG", 105.00, 5.8, 9.0, 3.0, Annual),
    listing("DTE.DE", "Deutsche Telekom", 22.50, 3.4, 4.0, 5.0, Annual),
    listing("DHL.DE", "DHL Group", 39.00, 4.7, 3.5, 3.0, Annual),
    listing("SIE.DE", "Siemens AG", 180.00, 2.6, 6.0, 9.0, Annual),
    listing("SAP.DE", "SAP SE", 175.00, 1.2, 5.0, 12.0, Annual),
    listing("VNA.DE", "Vonovia SE", 27.50, 3.3, 2.0, 2.0, Annual),
    listing("MBG.DE", "Mercedes-Benz", 72.00, 7.0, 3.0, 2.0, Annual),
    // International
    listing("NESN.SW", "Nestlé", 95.00, 3.1, 2.5, 2.0, Annual),
    listing("ROG.SW", "Roche", 230.00, 3.9, 3.0, 1.0, Annual),
    listing("NOVN.SW", "Novartis", 90.00, 3.6, 3.5, 3.0, Annual),
    listing("SHEL", "Shell", 33.00, 3.8, 4.0, 5.0, Quarterly),
    listing("ASML", "ASML Holding", 900.00, 0.7, 20.0, 18.0, Quarterly),
];

/// Offline table of common dividend stocks, used when live data is unavailable.
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticMarketData;

impl StaticMarketData {
    pub fn new() -> Self {
        Self
    }

    /// Exact symbol match first, then the first listing whose symbol or name
    /// contains the input (so "allianz" finds ALV.DE).
    pub fn find(&self, input: &str) -> Option<Quote> {
        let needle = input.trim().to_uppercase();
        if needle.is_empty() {
            return None;
        }

        LISTINGS
            .iter()
            .find(|l| l.symbol == needle)
            .or_else(|| {
                LISTINGS.iter().find(|l| {
                    l.symbol.contains(&needle) || l.name.to_uppercase().contains(&needle)
                })
            })
            .map(to_quote)
    }
}

fn to_quote(listing: &Listing) -> Quote {
    Quote {
        symbol: listing.symbol.to_string(),
        name: listing.name.to_string(),
        price: listing.price,
        currency: "EUR".to_string(),
        dividend_yield_pct: listing.dividend_yield_pct,
        payout_frequency: listing.payout_frequency,
        price_growth_pct: Some(listing.price_growth_pct),
        dividend_growth_pct: Some(listing.dividend_growth_pct),
        source: QuoteSource::Fallback,
    }
}

#[async_trait]
impl MarketDataProvider for StaticMarketData {
    fn name(&self) -> &str {
        "static"
    }

    async fn lookup(&self, symbol: &str) -> PlannerResult<Lookup> {
        Ok(match self.find(symbol) {
            Some(quote) => Lookup::Found(quote),
            None => Lookup::NotFound,
        })
    }
}

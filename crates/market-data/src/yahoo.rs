use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dividend_core::{Lookup, MarketDataProvider, PlannerError, PlannerResult, Quote, QuoteSource};
use reqwest::StatusCode;
use serde_json::Value;
use std::time::Duration;

use crate::estimate::{
    dividend_growth_pct, estimate_payout_frequency, payouts_in_last_year, price_growth_pct,
    DatedValue,
};

const QUOTE_URL: &str = "https://query2.finance.yahoo.com/v7/finance/quote";
const CHART_URL: &str = "https://query2.finance.yahoo.com/v8/finance/chart";
const MAX_ATTEMPTS: u32 = 3;

/// Live quotes and dividend history from Yahoo Finance.
#[derive(Clone)]
pub struct YahooFinanceClient {
    client: reqwest::Client,
    reference_currency: String,
    retry_wait: Duration,
}

/// The fields of a Yahoo quote the planner uses.
#[derive(Debug, Clone, PartialEq)]
pub struct QuoteFields {
    pub symbol: String,
    pub name: String,
    pub price: f64,
    pub currency: String,
    pub dividend_yield_pct: f64,
}

/// Five years of monthly closes and dividend payments, oldest first.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct History {
    pub closes: Vec<DatedValue>,
    pub dividends: Vec<DatedValue>,
}

impl YahooFinanceClient {
    /// Client converting prices into `reference_currency` (e.g. "EUR").
    pub fn new(reference_currency: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .user_agent("Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36")
            .timeout(Duration::from_secs(30))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            client,
            reference_currency: reference_currency.into().to_uppercase(),
            retry_wait: Duration::from_secs(5),
        }
    }

    pub fn reference_currency(&self) -> &str {
        &self.reference_currency
    }

    /// Wait before the next attempt after a 429, `None` once attempts are used up.
    fn retry_delay(&self, attempt: u32) -> Option<Duration> {
        (attempt < MAX_ATTEMPTS).then_some(self.retry_wait)
    }

    /// GET returning parsed JSON, `None` on 404. Retries on 429.
    async fn get_json(&self, url: &str, query: &[(&str, &str)]) -> PlannerResult<Option<Value>> {
        for attempt in 1..=MAX_ATTEMPTS {
            let response = self
                .client
                .get(url)
                .query(query)
                .send()
                .await
                .map_err(|e| PlannerError::Provider(e.to_string()))?;

            match response.status() {
                StatusCode::TOO_MANY_REQUESTS => {
                    if let Some(wait) = self.retry_delay(attempt) {
                        tracing::warn!(
                            "Yahoo 429 rate limited, waiting {}s before retry {}/{}",
                            wait.as_secs(),
                            attempt + 1,
                            MAX_ATTEMPTS
                        );
                        tokio::time::sleep(wait).await;
                    }
                }
                StatusCode::NOT_FOUND => return Ok(None),
                status if !status.is_success() => {
                    return Err(PlannerError::Provider(format!("Yahoo returned {}", status)));
                }
                _ => {
                    let json = response
                        .json()
                        .await
                        .map_err(|e| PlannerError::Provider(e.to_string()))?;
                    return Ok(Some(json));
                }
            }
        }

        Err(PlannerError::Provider(format!(
            "rate limited by Yahoo after {} attempts",
            MAX_ATTEMPTS
        )))
    }

    /// Current quote, `None` when Yahoo does not know the symbol or has no price.
    pub async fn get_quote(&self, symbol: &str) -> PlannerResult<Option<QuoteFields>> {
        let json = self.get_json(QUOTE_URL, &[("symbols", symbol)]).await?;
        Ok(json.as_ref().and_then(parse_quote))
    }

    /// Monthly closes and dividends over the last five years.
    pub async fn get_history(&self, symbol: &str) -> PlannerResult<History> {
        let url = format!("{}/{}", CHART_URL, symbol);
        let json = self
            .get_json(&url, &[("range", "5y"), ("interval", "1mo"), ("events", "div")])
            .await?
            .ok_or_else(|| PlannerError::Provider(format!("no chart for {}", symbol)))?;
        parse_history(&json)
    }

    /// Units of `to` per unit of `from`, through the `{FROM}{TO}=X` pair.
    pub async fn fx_rate(&self, from: &str, to: &str) -> PlannerResult<Option<f64>> {
        let pair = format!("{}{}=X", from.to_uppercase(), to.to_uppercase());
        Ok(self.get_quote(&pair).await?.map(|q| q.price))
    }

    async fn to_reference_currency(&self, mut fields: QuoteFields) -> QuoteFields {
        if fields.currency.is_empty() || fields.currency.eq_ignore_ascii_case(&self.reference_currency)
        {
            return fields;
        }

        match self.fx_rate(&fields.currency, &self.reference_currency).await {
            Ok(Some(rate)) if rate > 0.0 => {
                tracing::debug!(
                    symbol = %fields.symbol,
                    from = %fields.currency,
                    to = %self.reference_currency,
                    rate,
                    "Converted quote price"
                );
                fields.price *= rate;
                fields.currency = self.reference_currency.clone();
            }
            Ok(_) => tracing::warn!(
                symbol = %fields.symbol,
                currency = %fields.currency,
                "No FX rate to {}, keeping quote currency",
                self.reference_currency
            ),
            Err(e) => tracing::warn!(
                symbol = %fields.symbol,
                currency = %fields.currency,
                "FX lookup failed, keeping quote currency: {}",
                e
            ),
        }
        fields
    }
}

impl Default for YahooFinanceClient {
    fn default() -> Self {
        Self::new("EUR")
    }
}

#[async_trait]
impl MarketDataProvider for YahooFinanceClient {
    fn name(&self) -> &str {
        "yahoo"
    }

    async fn lookup(&self, symbol: &str) -> PlannerResult<Lookup> {
        let symbol = symbol.trim().to_uppercase();
        let Some(fields) = self.get_quote(&symbol).await? else {
            tracing::debug!(symbol = %symbol, "Yahoo has no quote");
            return Ok(Lookup::NotFound);
        };

        // History only refines the estimates, a failure is not fatal
        let history = match self.get_history(&symbol).await {
            Ok(history) => history,
            Err(e) => {
                tracing::warn!(symbol = %symbol, "Dividend history unavailable: {}", e);
                History::default()
            }
        };

        let fields = self.to_reference_currency(fields).await;
        Ok(Lookup::Found(build_quote(fields, &history, Utc::now())))
    }
}

/// Combine a quote with its history into the planner's `Quote`.
pub fn build_quote(fields: QuoteFields, history: &History, as_of: DateTime<Utc>) -> Quote {
    let payouts = payouts_in_last_year(&history.dividends, as_of);
    Quote {
        symbol: fields.symbol,
        name: fields.name,
        price: fields.price,
        currency: fields.currency,
        dividend_yield_pct: fields.dividend_yield_pct,
        payout_frequency: estimate_payout_frequency(payouts),
        price_growth_pct: price_growth_pct(&history.closes),
        dividend_growth_pct: dividend_growth_pct(&history.dividends, as_of),
        source: QuoteSource::Live,
    }
}

/// Parse a `quoteResponse`. Returns `None` for an empty result or a
/// non-positive price.
pub fn parse_quote(json: &Value) -> Option<QuoteFields> {
    let quote = json
        .get("quoteResponse")
        .and_then(|v| v.get("result"))
        .and_then(|v| v.as_array())
        .and_then(|arr| arr.first())?;

    let price = quote
        .get("regularMarketPrice")
        .and_then(|v| v.as_f64())
        .or_else(|| quote.get("regularMarketPreviousClose").and_then(|v| v.as_f64()))
        .filter(|p| p.is_finite() && *p > 0.0)?;

    let symbol = quote.get("symbol").and_then(|v| v.as_str())?.to_string();
    let name = quote
        .get("longName")
        .or_else(|| quote.get("shortName"))
        .and_then(|v| v.as_str())
        .map(|s| s.to_string())
        .unwrap_or_else(|| symbol.clone());

    // Yahoo reports the trailing yield as a fraction
    let dividend_yield_pct = quote
        .get("trailingAnnualDividendYield")
        .and_then(|v| v.as_f64())
        .filter(|y| y.is_finite() && *y >= 0.0)
        .map(|y| y * 100.0)
        .unwrap_or(0.0);

    Some(QuoteFields {
        name,
        price,
        currency: quote
            .get("currency")
            .and_then(|v| v.as_str())
            .unwrap_or_default()
            .to_uppercase(),
        dividend_yield_pct,
        symbol,
    })
}

/// Parse a chart response with `events=div`.
pub fn parse_history(json: &Value) -> PlannerResult<History> {
    let chart = json
        .get("chart")
        .and_then(|v| v.get("result"))
        .and_then(|v| v.as_array())
        .and_then(|arr| arr.first())
        .ok_or_else(|| PlannerError::Parse("No chart data found".to_string()))?;

    let timestamps = chart
        .get("timestamp")
        .and_then(|v| v.as_array())
        .map(|v| v.as_slice())
        .unwrap_or_default();
    let closes = chart
        .get("indicators")
        .and_then(|v| v.get("quote"))
        .and_then(|v| v.as_array())
        .and_then(|arr| arr.first())
        .and_then(|q| q.get("close"))
        .and_then(|v| v.as_array())
        .map(|v| v.as_slice())
        .unwrap_or_default();

    let closes = timestamps
        .iter()
        .zip(closes)
        .filter_map(|(ts, close)| {
            let timestamp = DateTime::from_timestamp(ts.as_i64()?, 0)?;
            Some(DatedValue::new(timestamp, close.as_f64()?))
        })
        .collect();

    let mut dividends: Vec<DatedValue> = chart
        .get("events")
        .and_then(|v| v.get("dividends"))
        .and_then(|v| v.as_object())
        .map(|events| {
            events
                .values()
                .filter_map(|event| {
                    let timestamp = DateTime::from_timestamp(event.get("date")?.as_i64()?, 0)?;
                    Some(DatedValue::new(timestamp, event.get("amount")?.as_f64()?))
                })
                .collect()
        })
        .unwrap_or_default();
    dividends.sort_by_key(|d| d.timestamp);

    Ok(History { closes, dividends })
}

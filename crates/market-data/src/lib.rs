//! Quote providers used to populate holdings before projecting.
//!
//! `YahooFinanceClient` is the live source, `StaticMarketData` the offline
//! table, and `ChainedProvider` tries them in order with an explicit
//! found/not-found outcome.

pub mod chain;
pub mod estimate;
pub mod static_data;
pub mod template;
pub mod yahoo;

pub use chain::ChainedProvider;
pub use estimate::{cagr_pct, estimate_payout_frequency, DatedValue};
pub use static_data::StaticMarketData;
pub use template::{manual_position, position_from_quote};
pub use yahoo::YahooFinanceClient;

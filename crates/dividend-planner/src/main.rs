//! dividend-planner: keep a dividend portfolio in a CSV file and project its
//! income under savings plans, reinvestment and the German tax allowance.
//!
//! Usage:
//!   dividend-planner add ALV.DE --shares 12 --contribution 50
//!   dividend-planner set ALV.DE div_growth 6
//!   dividend-planner show
//!   dividend-planner project --years 20 --allowance 1000
//!   dividend-planner --file other.csv show

mod cli;
mod config;
mod report;

use anyhow::{Context, Result};
use cli::{Command, USAGE};
use config::PlannerConfig;
use dividend_core::{Lookup, MarketDataProvider, PlannerError, Snapshot, SnapshotStore};
use market_data::{
    manual_position, position_from_quote, ChainedProvider, StaticMarketData, YahooFinanceClient,
};
use portfolio_store::{apply_edit, CsvSnapshotStore, PositionField};
use projection_engine::ProjectionEngine;

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    let json_logging = std::env::var("RUST_LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    if json_logging {
        tracing_subscriber::fmt().json().with_env_filter(filter).init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let cli = cli::parse_args(&args)?;

    let mut config = PlannerConfig::from_env().context("invalid configuration")?;
    if let Some(file) = cli.file {
        config.snapshot_path = file;
    }
    let store = CsvSnapshotStore::new(&config.snapshot_path);

    match cli.command {
        Command::Help => println!("{}", USAGE),
        Command::Add {
            symbol,
            shares,
            contribution,
        } => add(&store, &config, &symbol, shares, contribution).await?,
        Command::Remove { symbol } => remove(&store, &symbol).await?,
        Command::Set {
            symbol,
            field,
            value,
        } => set(&store, &symbol, field, &value).await?,
        Command::Show => {
            let snapshot = store.load().await.context("failed to load snapshot")?;
            print!("{}", report::format_snapshot(&snapshot));
        }
        Command::Project { years, allowance } => {
            if let Some(years) = years {
                config.projection_years = years;
            }
            if let Some(allowance) = allowance {
                config.tax_free_allowance = allowance;
            }
            project(&store, &config).await?
        }
    }

    Ok(())
}

async fn add(
    store: &CsvSnapshotStore,
    config: &PlannerConfig,
    symbol: &str,
    shares: f64,
    contribution: f64,
) -> Result<()> {
    let mut snapshot = store.load().await.context("failed to load snapshot")?;

    let provider = ChainedProvider::new(Vec::new())
        .with(YahooFinanceClient::new(config.reference_currency.clone()))
        .with(StaticMarketData::new());

    let position = match provider.lookup(symbol).await? {
        Lookup::Found(quote) => {
            tracing::info!(
                symbol = %quote.symbol,
                source = %quote.source,
                price = quote.price,
                currency = %quote.currency,
                "Found quote"
            );
            position_from_quote(&quote, shares, contribution, config.default_growth_pct)
        }
        Lookup::NotFound => {
            tracing::warn!(
                symbol,
                "No market data, adding a manual template. Set its price before projecting."
            );
            manual_position(symbol, shares, contribution, config.default_growth_pct)
        }
    };

    let added = position.symbol.clone();
    snapshot.push(position)?;
    store.save(&snapshot).await.context("failed to save snapshot")?;
    println!("Added {} to {}", added, store.path().display());
    Ok(())
}

/// The snapshot's spelling of `symbol`, accepting lowercase input.
fn resolve_symbol(snapshot: &Snapshot, symbol: &str) -> String {
    let symbol = symbol.trim();
    if snapshot.contains(symbol) {
        symbol.to_string()
    } else {
        symbol.to_uppercase()
    }
}

async fn remove(store: &CsvSnapshotStore, symbol: &str) -> Result<()> {
    let mut snapshot = store.load().await.context("failed to load snapshot")?;
    let symbol = resolve_symbol(&snapshot, symbol);
    snapshot
        .remove(&symbol)
        .ok_or_else(|| PlannerError::UnknownSymbol(symbol.clone()))?;
    store.save(&snapshot).await.context("failed to save snapshot")?;
    println!("Removed {}", symbol);
    Ok(())
}

async fn set(
    store: &CsvSnapshotStore,
    symbol: &str,
    field: PositionField,
    value: &str,
) -> Result<()> {
    let mut snapshot = store.load().await.context("failed to load snapshot")?;
    let symbol = resolve_symbol(&snapshot, symbol);
    apply_edit(&mut snapshot, &symbol, field, value)?;
    store.save(&snapshot).await.context("failed to save snapshot")?;
    println!("Updated {} {:?}", symbol, field);
    Ok(())
}

async fn project(store: &CsvSnapshotStore, config: &PlannerConfig) -> Result<()> {
    let snapshot = store.load().await.context("failed to load snapshot")?;
    let engine = ProjectionEngine::new(config.projection_config());
    let outcome = engine
        .project_with_policy(&snapshot, config.invalid_position_policy)
        .context("projection failed")?;

    tracing::info!(
        positions = snapshot.len() - outcome.excluded.len(),
        excluded = outcome.excluded.len(),
        years = config.projection_years,
        "Projection complete"
    );
    print!("{}", report::format_projection(&outcome));
    Ok(())
}

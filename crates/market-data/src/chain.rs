use async_trait::async_trait;
use dividend_core::{Lookup, MarketDataProvider, PlannerResult};

/// Tries each provider in order. The first `Found` wins; errors are logged
/// and the next provider is asked.
pub struct ChainedProvider {
    providers: Vec<Box<dyn MarketDataProvider>>,
}

impl ChainedProvider {
    pub fn new(providers: Vec<Box<dyn MarketDataProvider>>) -> Self {
        Self { providers }
    }

    /// Append a provider to the end of the chain.
    pub fn with(mut self, provider: impl MarketDataProvider + 'static) -> Self {
        self.providers.push(Box::new(provider));
        self
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}

#[async_trait]
impl MarketDataProvider for ChainedProvider {
    fn name(&self) -> &str {
        "chain"
    }

    async fn lookup(&self, symbol: &str) -> PlannerResult<Lookup> {
        let mut failures = Vec::new();

        for provider in &self.providers {
            match provider.lookup(symbol).await {
                Ok(Lookup::Found(quote)) => {
                    tracing::debug!(symbol, provider = provider.name(), "Quote found");
                    return Ok(Lookup::Found(quote));
                }
                Ok(Lookup::NotFound) => {
                    tracing::debug!(symbol, provider = provider.name(), "Symbol not found");
                }
                Err(e) => {
                    tracing::warn!(symbol, provider = provider.name(), "Provider failed: {}", e);
                    failures.push(format!("{}: {}", provider.name(), e));
                }
            }
        }

        if !failures.is_empty() {
            tracing::warn!(
                symbol,
                "No provider found the symbol ({} failed: {})",
                failures.len(),
                failures.join("; ")
            );
        }
        Ok(Lookup::NotFound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::StaticMarketData;
    use dividend_core::{PlannerError, QuoteSource};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct Failing {
        calls: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl MarketDataProvider for Failing {
        fn name(&self) -> &str {
            "failing"
        }

        async fn lookup(&self, _symbol: &str) -> PlannerResult<Lookup> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Err(PlannerError::Provider("connection refused".to_string()))
        }
    }

    struct Empty;

    #[async_trait]
    impl MarketDataProvider for Empty {
        fn name(&self) -> &str {
            "empty"
        }

        async fn lookup(&self, _symbol: &str) -> PlannerResult<Lookup> {
            Ok(Lookup::NotFound)
        }
    }

    #[tokio::test]
    async fn test_error_falls_through_to_next_provider() {
        let calls = Arc::new(AtomicUsize::new(0));
        let chain = ChainedProvider::new(Vec::new())
            .with(Failing { calls: calls.clone() })
            .with(StaticMarketData::new());

        let quote = chain.lookup("KO").await.unwrap().found().unwrap();
        assert_eq!(quote.symbol, "KO");
        assert_eq!(quote.source, QuoteSource::Fallback);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_first_found_wins() {
        let calls = Arc::new(AtomicUsize::new(0));
        let chain = ChainedProvider::new(Vec::new())
            .with(Empty)
            .with(StaticMarketData::new())
            .with(Failing { calls: calls.clone() });

        assert!(matches!(chain.lookup("O").await.unwrap(), Lookup::Found(_)));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_all_missing_or_failing_is_not_found() {
        let calls = Arc::new(AtomicUsize::new(0));
        let chain = ChainedProvider::new(Vec::new())
            .with(Failing { calls: calls.clone() })
            .with(Empty);
        assert_eq!(chain.lookup("KO").await.unwrap(), Lookup::NotFound);

        assert!(ChainedProvider::new(Vec::new()).is_empty());
        assert_eq!(
            ChainedProvider::new(Vec::new()).lookup("KO").await.unwrap(),
            Lookup::NotFound
        );
    }
}

use async_trait::async_trait;

use crate::{Lookup, PlannerResult, Snapshot};

/// Source of quote data used to populate a `Position` before projecting.
///
/// Implementations report a missing ticker as `Lookup::NotFound` and reserve
/// `Err` for transport or decoding failures, so callers can tell the two apart.
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &str;

    async fn lookup(&self, symbol: &str) -> PlannerResult<Lookup>;
}

/// Persistence for a holdings snapshot.
#[async_trait]
pub trait SnapshotStore: Send + Sync {
    async fn load(&self) -> PlannerResult<Snapshot>;

    async fn save(&self, snapshot: &Snapshot) -> PlannerResult<()>;
}

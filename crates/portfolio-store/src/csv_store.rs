use async_trait::async_trait;
use dividend_core::{PlannerError, PlannerResult, Position, Snapshot, SnapshotStore};
use std::path::{Path, PathBuf};

use crate::models::SnapshotRow;

const REQUIRED_COLUMNS: [&str; 3] = ["symbol", "shares", "cost_basis_price"];

/// Snapshot persisted as a flat CSV file, one row per position.
#[derive(Debug, Clone)]
pub struct CsvSnapshotStore {
    path: PathBuf,
}

impl CsvSnapshotStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl SnapshotStore for CsvSnapshotStore {
    /// Load the snapshot. A missing file is an empty snapshot.
    async fn load(&self) -> PlannerResult<Snapshot> {
        let data = match tokio::fs::read_to_string(&self.path).await {
            Ok(data) => data,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!(path = %self.path.display(), "No snapshot file yet, starting empty");
                return Ok(Snapshot::new());
            }
            Err(e) => {
                return Err(PlannerError::Store(format!(
                    "failed to read {}: {}",
                    self.path.display(),
                    e
                )))
            }
        };

        let snapshot = parse_snapshot_csv(&data)?;
        tracing::info!(path = %self.path.display(), positions = snapshot.len(), "Loaded snapshot");
        Ok(snapshot)
    }

    async fn save(&self, snapshot: &Snapshot) -> PlannerResult<()> {
        let data = snapshot_to_csv(snapshot)?;
        tokio::fs::write(&self.path, data).await.map_err(|e| {
            PlannerError::Store(format!("failed to write {}: {}", self.path.display(), e))
        })?;
        tracing::info!(path = %self.path.display(), positions = snapshot.len(), "Saved snapshot");
        Ok(())
    }
}

/// Parse CSV text into a snapshot.
/// Expected columns: symbol, shares, cost_basis_price, then any of the optional position fields
pub fn parse_snapshot_csv(csv_data: &str) -> PlannerResult<Snapshot> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(csv_data.as_bytes());

    let headers = reader
        .headers()
        .map_err(|e| PlannerError::Parse(e.to_string()))?
        .clone();
    if headers.is_empty() {
        return Ok(Snapshot::new());
    }
    for column in REQUIRED_COLUMNS {
        if !headers.iter().any(|h| h == column) {
            return Err(PlannerError::Parse(format!("missing required column '{}'", column)));
        }
    }

    let mut snapshot = Snapshot::new();
    for result in reader.deserialize::<SnapshotRow>() {
        let row = result.map_err(|e| PlannerError::Parse(e.to_string()))?;
        snapshot.push(Position::try_from(row)?)?;
    }

    Ok(snapshot)
}

/// Serialize a snapshot to CSV text with every position field.
pub fn snapshot_to_csv(snapshot: &Snapshot) -> PlannerResult<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for position in snapshot {
        writer
            .serialize(SnapshotRow::from(position))
            .map_err(|e| PlannerError::Store(e.to_string()))?;
    }

    // An empty snapshot still gets a header so the file stays loadable.
    if snapshot.is_empty() {
        writer
            .write_record(SNAPSHOT_COLUMNS)
            .map_err(|e| PlannerError::Store(e.to_string()))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| PlannerError::Store(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| PlannerError::Store(e.to_string()))
}

const SNAPSHOT_COLUMNS: [&str; 12] = [
    "symbol",
    "name",
    "shares",
    "cost_basis_price",
    "current_price",
    "dividend_yield_pct",
    "dividend_growth_rate_pct",
    "price_growth_rate_pct",
    "contribution_per_month",
    "payout_frequency",
    "reinvest",
    "source",
];

#[cfg(test)]
mod tests {
    use super::*;
    use dividend_core::{PayoutFrequency, QuoteSource};
    use tempfile::tempdir;

    fn sample() -> Snapshot {
        let mut allianz = Position::new("ALV.DE", 12.0, 285.0)
            .with_cost_basis(251.37)
            .with_dividend(5.0, PayoutFrequency::Annual)
            .with_growth(5.8, 6.5)
            .with_reinvest(true);
        allianz.name = "Allianz SE".to_string();
        allianz.source = QuoteSource::Fallback;

        let mut realty = Position::new("O", 120.333333333, 52.5)
            .with_cost_basis(48.1)
            .with_dividend(5.8, PayoutFrequency::Monthly)
            .with_growth(3.1, 2.5)
            .with_contribution(50.0);
        realty.name = "Realty Income, Corp.".to_string();
        realty.source = QuoteSource::Live;

        Snapshot::from_positions(vec![allianz, realty]).unwrap()
    }

    #[test]
    fn test_csv_round_trip_is_lossless() {
        let snapshot = sample();
        let text = snapshot_to_csv(&snapshot).unwrap();
        assert!(text.starts_with("symbol,name,shares,cost_basis_price,current_price"));
        assert_eq!(parse_snapshot_csv(&text).unwrap(), snapshot);
    }

    #[test]
    fn test_minimal_columns_load() {
        let text = "symbol,shares,cost_basis_price\nKO,10,59.5\nPEP,4,168\n";
        let snapshot = parse_snapshot_csv(text).unwrap();
        assert_eq!(snapshot.len(), 2);
        let ko = snapshot.get("KO").unwrap();
        assert_eq!(ko.current_price, 59.5);
        assert_eq!(ko.payout_frequency, PayoutFrequency::Annual);
    }

    #[test]
    fn test_missing_required_column_rejected() {
        let text = "symbol,shares\nKO,10\n";
        let err = parse_snapshot_csv(text).unwrap_err();
        assert!(matches!(err, PlannerError::Parse(ref msg) if msg.contains("cost_basis_price")));
    }

    #[test]
    fn test_duplicate_symbol_rejected() {
        let text = "symbol,shares,cost_basis_price\nKO,10,59.5\nKO,1,60\n";
        assert_eq!(
            parse_snapshot_csv(text).unwrap_err(),
            PlannerError::DuplicateSymbol("KO".to_string())
        );
    }

    #[test]
    fn test_invalid_frequency_rejected() {
        let text = "symbol,shares,cost_basis_price,payout_frequency\nKO,10,59.5,3\n";
        assert!(matches!(
            parse_snapshot_csv(text),
            Err(PlannerError::InvalidInput { .. })
        ));
    }

    #[test]
    fn test_empty_snapshot_round_trip() {
        let text = snapshot_to_csv(&Snapshot::new()).unwrap();
        assert!(text.starts_with("symbol,"));
        assert!(parse_snapshot_csv(&text).unwrap().is_empty());
        assert!(parse_snapshot_csv("").unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_store_save_and_load() {
        let dir = tempdir().unwrap();
        let store = CsvSnapshotStore::new(dir.path().join("portfolio.csv"));

        assert!(store.load().await.unwrap().is_empty());

        let snapshot = sample();
        store.save(&snapshot).await.unwrap();
        assert_eq!(store.load().await.unwrap(), snapshot);
    }
}

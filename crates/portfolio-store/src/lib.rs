pub mod models;
pub mod csv_store;
pub mod edit;

pub use csv_store::{parse_snapshot_csv, snapshot_to_csv, CsvSnapshotStore};
pub use edit::{apply_edit, PositionField};
pub use models::SnapshotRow;

//! Shared data model for the dividend planner: the holdings snapshot, the
//! projection ledger, and the contracts of the external collaborators
//! (market data and snapshot persistence).

pub mod error;
pub mod traits;
pub mod types;

pub use error::*;
pub use traits::*;
pub use types::*;

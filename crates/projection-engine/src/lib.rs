pub mod models;
pub mod engine;
pub mod tax;
pub mod validation;


pub use models::*;
pub use engine::{project, ProjectionEngine};
pub use tax::{DividendTax, TaxedPayout};
pub use validation::{validate_position, validate_snapshot};

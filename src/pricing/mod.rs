//! Pricing engine module for charter quotes.
//!
//! Price table, selection snapshot, quote calculator, validator and display
//! formatting, plus the JSON routes the wizard front end calls on every
//! change.

pub mod calculators;
pub mod format;
pub mod leads;
pub mod models;
pub mod requests;
pub mod responses;
pub mod routes;
pub mod validation;

// Re-export commonly used items
pub use calculators::{compute_quote, compute_standard_quote, round_money, QuoteBreakdown};
pub use models::PriceTable;
pub use requests::{Selection, SelectionUpdate};
pub use routes::router;
pub use validation::{validate, Readiness, ValidationIssue};

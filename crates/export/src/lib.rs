//! Itemized CSV export of a ledger.
//!
//! Produces text only; writing it somewhere is the caller's job.

pub mod csv_export;

pub use csv_export::{DEFAULT_FILE_NAME, HEADER, format_amount, serialize};

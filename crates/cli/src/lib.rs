//! Command-line front end: replays a session description through the ledger
//! and renders the result.

pub mod render;
pub mod session;

pub use render::{render_summary, write_export, write_summary_json};
pub use session::{Session, SessionItem};

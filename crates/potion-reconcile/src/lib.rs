//! potion-reconcile
//!
//! Audit reconciliation and summary engine.
//!
//! - Per-cauldron "reported vs actual" rows for one calendar day
//!   (ticket mismatches + unlogged drains).
//! - Unlogged-drain-only projection for the simpler chart.
//! - Pass-through of the upstream summary counters, plus a local
//!   consistency check of those counters against the record lists.
//!
//! Deterministic, pure logic. No IO. No clock. No logging.

mod directory;
mod engine;
mod summary;
mod types;

pub use directory::CauldronDirectory;
pub use engine::{
    activity_dates, compare_for_date, compare_for_date_with_directory, unlogged_for_date,
    unlogged_for_date_with_directory,
};
pub use summary::{check_summary, derive_counters, summary_for_display, MISSING_VOLUME_TOLERANCE};
pub use types::*;

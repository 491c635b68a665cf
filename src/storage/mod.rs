//! Storage abstractions for pipeline datasets.
//!
//! Each dataset is one flat CSV file under the data directory. Stages
//! read their declared inputs and overwrite their declared output
//! wholesale; there are no append semantics and no schema versioning.
//!
//! ## Directory Structure
//!
//! ```text
//! data/
//! ├── leads_raw.csv          # Stage 1 output: search hits
//! ├── leads_enriched.csv     # Stage 2 output: + email addresses
//! ├── leads_scored.csv       # Stage 3 output: + score, ranked
//! ├── replies.csv            # Stage 5 output: inbound replies
//! └── leads_forecasted.csv   # Stage 6 output: per-address category
//! ```

pub mod local;

// Re-export for convenience
pub use local::LocalStore;

/// Dataset file names under the data directory.
pub const RAW_LEADS: &str = "leads_raw.csv";
pub const ENRICHED_LEADS: &str = "leads_enriched.csv";
pub const SCORED_LEADS: &str = "leads_scored.csv";
pub const REPLIES: &str = "replies.csv";
pub const FORECAST: &str = "leads_forecasted.csv";

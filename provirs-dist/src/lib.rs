//! Score distributions for proviral genome regions.
//!
//! Building on the joined records of `provirs-core`, this crate turns
//! per-region measurements into comparable distributions:
//!
//! - Metric extraction over joined records ([`scores::extract_scores`])
//! - Intact vs. defective population filtering ([`scores::filter_by_intactness`])
//! - Quantile-based outlier trimming ([`scores::ScoreSet::trim`])
//! - Gaussian kernel density estimation with adaptive bandwidth
//!   ([`density::estimate_density`])
//! - Histogram-compatible curve rescaling and descriptive statistics
//!
//! # Example
//!
//! ```no_run
//! use provirs_core::models::DataSource;
//! use provirs_core::store::RecordStore;
//! use provirs_dist::scores::{Metric, extract_scores};
//! use provirs_dist::summary::summarize;
//!
//! let mut store = RecordStore::from_output_dir("output");
//! let records = store.get_joined(DataSource::CfeIntactPlasma).unwrap();
//!
//! let scores = extract_scores("pol", Metric::Distance, records).unwrap();
//! let trimmed = scores.trim(0.01);
//! println!("{}", summarize(&trimmed.scores));
//! ```

pub mod density;
pub mod errors;
pub mod scores;
pub mod summary;

// re-exports
pub use density::{DensityCurve, estimate_density};
pub use scores::{Metric, ScoreSet, Selection};
pub use summary::{ScoreSummary, summarize};

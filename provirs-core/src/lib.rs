//! Core data model for proviral genome intactness analysis.
//!
//! This crate loads the measurement and defect tables produced by the
//! upstream sequence pipeline and classifies each sequence as intact or
//! defective. It provides:
//!
//! - A layered defect taxonomy ([`defects::DefectCode`], [`defects::DefectTier`])
//! - Per-sequence intactness predicates over loaded defect tables
//! - Joined per-region measurement records with precomputed intactness verdicts
//! - Lazy, explicitly clearable caches for tables and joined records
//!
//! # Example
//!
//! ```no_run
//! use provirs_core::models::DataSource;
//! use provirs_core::store::RecordStore;
//!
//! let mut store = RecordStore::from_output_dir("output");
//! let records = store.get_joined(DataSource::CfeIntactPlasma).unwrap();
//!
//! for record in records {
//!     println!("{}: {}", record.qseqid, record.distance_intact);
//! }
//! ```

pub mod defects;
pub mod errors;
pub mod models;
pub mod store;
pub mod utils;

// re-exports
pub use defects::{DefectCode, DefectTable, DefectTier};
pub use store::RecordStore;

/// The open reading frames reported by the measurement tables, in the
/// order reports sweep them.
pub const HIV_ORFS: [&str; 11] = [
    "gag",
    "pol",
    "env",
    "vif",
    "vpr",
    "tat_exon1",
    "rev_exon1",
    "vpu",
    "tat_exon2",
    "rev_exon2",
    "nef",
];

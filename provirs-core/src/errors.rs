use std::path::PathBuf;

use thiserror::Error;

use crate::models::DataSource;

/// Error type for table loading and source resolution.
#[derive(Error, Debug)]
pub enum TableError {
    /// The source identifier does not name a known data source.
    #[error("Invalid choice for source: {0:?}.")]
    UnknownSource(String),

    /// The source is known but no tables were registered for it.
    #[error("No tables registered for source: {0}")]
    UnconfiguredSource(DataSource),

    /// The table file could not be opened.
    #[error("Failed to read table: {path:?}")]
    TableRead {
        path: PathBuf,
        source: std::io::Error,
    },

    /// A table row could not be parsed.
    #[error(transparent)]
    Csv(#[from] csv::Error),
}

use thiserror::Error;

/// Error type for score extraction and report selection.
#[derive(Error, Debug)]
pub enum ScoreError {
    /// The metric name does not match any known selector.
    #[error("Invalid choice of metric: {0}")]
    UnknownMetric(String),

    /// The selection mode does not match any known selector.
    #[error("Invalid choice of select: {0}")]
    UnknownSelection(String),

    /// The indel-impact metric was requested for a record without the
    /// column.
    #[error("Missing indel impact for sequence {qseqid} in region {region}")]
    MissingIndelImpact { qseqid: String, region: String },

    /// The indel-impact value could not be parsed as a number.
    #[error("Invalid indel impact for sequence {qseqid}: {value:?}")]
    InvalidIndelImpact { qseqid: String, value: String },
}

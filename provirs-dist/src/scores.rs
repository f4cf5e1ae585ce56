//! Metric extraction and outlier trimming over joined region records.

use std::fmt;
use std::str::FromStr;

use provirs_core::models::RegionRecord;
use serde::Serialize;

use crate::errors::ScoreError;
use crate::summary::quantile;

/// A per-region measurement that can be scored across records.
///
/// Each metric is gated by the defect tier that can invalidate it: a
/// long deletion distorts region sizes but says nothing about point
/// divergence, so the size metrics and the distance metric consult
/// different intactness verdicts on the record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Metric {
    /// Normalized alignment distance to the subtype reference.
    Distance,
    /// Region length in nucleotides, from the reference coordinates.
    Size,
    /// Region length in nucleotides, from the translated protein.
    ProteinSize,
    /// Net reading-frame impact of insertions and deletions.
    IndelImpact,
}

impl Metric {
    /// Label used when naming score sets and report columns.
    pub fn label(&self) -> &'static str {
        match self {
            Metric::Distance => "Distance",
            Metric::Size | Metric::ProteinSize => "Size",
            Metric::IndelImpact => "indel_impact",
        }
    }

    /// Natural domain of the metric, when it has one.
    ///
    /// Distances are normalized into [0, 2]; the other metrics are
    /// unbounded and take their plotting range from the data.
    pub fn domain(&self) -> Option<(f64, f64)> {
        match self {
            Metric::Distance => Some((0.0, 2.0)),
            Metric::Size | Metric::ProteinSize | Metric::IndelImpact => None,
        }
    }

    /// The record's intactness verdict under the defect tier that gates
    /// this metric.
    pub fn intact_flag(&self, record: &RegionRecord) -> bool {
        match self {
            Metric::Size | Metric::ProteinSize => record.size_structural_intact,
            Metric::Distance => record.distance_intact,
            Metric::IndelImpact => record.indel_intact,
        }
    }
}

impl FromStr for Metric {
    type Err = ScoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "distance" => Ok(Metric::Distance),
            "size" => Ok(Metric::Size),
            "size (protein)" => Ok(Metric::ProteinSize),
            "indel impact" => Ok(Metric::IndelImpact),
            _ => Err(ScoreError::UnknownMetric(s.to_string())),
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Metric::Distance => "distance",
            Metric::Size => "size",
            Metric::ProteinSize => "size (protein)",
            Metric::IndelImpact => "indel impact",
        };
        write!(f, "{}", name)
    }
}

/// Which intactness populations a report covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    /// Only records whose gating verdict is intact.
    Intact,
    /// Only records whose gating verdict is defective.
    Nonintact,
    /// All records as one population.
    Together,
    /// Intact and defective as two populations, reported side by side.
    Separately,
}

impl FromStr for Selection {
    type Err = ScoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "intact" => Ok(Selection::Intact),
            "nonintact" => Ok(Selection::Nonintact),
            "together" => Ok(Selection::Together),
            "separately" => Ok(Selection::Separately),
            _ => Err(ScoreError::UnknownSelection(s.to_string())),
        }
    }
}

impl fmt::Display for Selection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Selection::Intact => "intact",
            Selection::Nonintact => "nonintact",
            Selection::Together => "together",
            Selection::Separately => "separately",
        };
        write!(f, "{}", name)
    }
}

/// Scores for one metric over one region, with the metric's natural
/// plotting range when it has one.
#[derive(Debug, Clone, Serialize)]
pub struct ScoreSet {
    pub name: String,
    pub scores: Vec<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end: Option<f64>,
}

impl ScoreSet {
    pub fn ranged(name: &str, scores: Vec<f64>, start: f64, end: f64) -> Self {
        ScoreSet {
            name: name.to_string(),
            scores,
            start: Some(start),
            end: Some(end),
        }
    }

    pub fn unranged(name: &str, scores: Vec<f64>) -> Self {
        ScoreSet {
            name: name.to_string(),
            scores,
            start: None,
            end: None,
        }
    }

    /// The natural plotting range, when both ends are known.
    pub fn range(&self) -> Option<(f64, f64)> {
        self.start.zip(self.end)
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    /// Drop scores outside the central quantile band.
    ///
    /// `fraction` is the tail mass trimmed from each end and is clamped
    /// into [0, 0.5]. Thresholds are linearly interpolated quantiles of
    /// the full set; scores equal to a threshold are kept, and the
    /// survivors keep their original order. Trimming an empty set is a
    /// no-op.
    pub fn trim(&self, fraction: f64) -> ScoreSet {
        let fraction = if fraction.is_nan() {
            0.0
        } else {
            fraction.clamp(0.0, 0.5)
        };

        let mut sorted = self.scores.clone();
        sorted.sort_by(f64::total_cmp);
        let lower = quantile(&sorted, fraction);
        let upper = quantile(&sorted, 1.0 - fraction);

        let scores = self
            .scores
            .iter()
            .copied()
            .filter(|score| *score >= lower && *score <= upper)
            .collect();

        ScoreSet {
            name: self.name.clone(),
            scores,
            start: self.start,
            end: self.end,
        }
    }
}

/// Collect `metric` scores for every record of `region`.
///
/// Records for other regions are skipped. The indel-impact metric is the
/// only fallible one: it reads an optional column, so a record missing
/// it, or carrying a non-numeric value, is an error rather than a silent
/// drop.
pub fn extract_scores<'a, I>(
    region: &str,
    metric: Metric,
    records: I,
) -> Result<ScoreSet, ScoreError>
where
    I: IntoIterator<Item = &'a RegionRecord>,
{
    let mut scores = Vec::new();
    for record in records {
        if record.region != region {
            continue;
        }
        let score = match metric {
            Metric::Distance => record.distance,
            Metric::Size => (record.end - record.start + 1) as f64,
            Metric::ProteinSize => (record.protein.len() * 3) as f64,
            Metric::IndelImpact => match &record.indel_impact {
                Some(raw) => {
                    raw.trim()
                        .parse()
                        .map_err(|_| ScoreError::InvalidIndelImpact {
                            qseqid: record.qseqid.clone(),
                            value: raw.clone(),
                        })?
                }
                None => {
                    return Err(ScoreError::MissingIndelImpact {
                        qseqid: record.qseqid.clone(),
                        region: record.region.clone(),
                    });
                }
            },
        };
        scores.push(score);
    }

    Ok(match metric.domain() {
        Some((start, end)) => ScoreSet::ranged(metric.label(), scores, start, end),
        None => ScoreSet::unranged(metric.label(), scores),
    })
}

/// Keep only records whose gating verdict for `metric` matches
/// `want_intact`.
pub fn filter_by_intactness<'a, I>(
    want_intact: bool,
    records: I,
    metric: Metric,
) -> impl Iterator<Item = &'a RegionRecord>
where
    I: IntoIterator<Item = &'a RegionRecord>,
{
    records
        .into_iter()
        .filter(move |record| metric.intact_flag(record) == want_intact)
}

//! Defect taxonomy and per-sequence defect tables.
//!
//! The upstream classifier (CFEIntact) emits one row per observed defect.
//! Codes are grouped into three progressively inclusive tiers, and a
//! sequence is intact at a tier when none of its codes belong to that
//! tier's set. The tiers keep the metrics from depending on each other:
//! size analysis only cares about structural damage, distance analysis
//! additionally counts reading-frame defects, indel analysis counts the
//! length-changing subset.

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::errors::TableError;
use crate::utils::get_dynamic_reader;

/// A single defect call emitted by the upstream classifier.
///
/// The variants cover every code the classifier is known to produce;
/// spellings follow the classifier's output exactly. Codes outside this
/// set parse to `None` and belong to no tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DefectCode {
    ApobecHypermutation,
    NonHiv,
    Scramble,
    InternalInversion,
    UnknownNucleotide,
    MissingOrf,
    LongDeletion,
    Deletion,
    Insertion,
    MutatedStartCodon,
    MutatedStopCodon,
    InternalStop,
    PackagingSignalDeletion,
    MajorSpliceDonorSiteMutated,
}

impl DefectCode {
    /// Parse the classifier's spelling of a defect code.
    pub fn from_code(code: &str) -> Option<DefectCode> {
        match code {
            "APOBECHypermutation" => Some(DefectCode::ApobecHypermutation),
            "NonHIV" => Some(DefectCode::NonHiv),
            "Scramble" => Some(DefectCode::Scramble),
            "InternalInversion" => Some(DefectCode::InternalInversion),
            "UnknownNucleotide" => Some(DefectCode::UnknownNucleotide),
            "MissingORF" => Some(DefectCode::MissingOrf),
            "LongDeletion" => Some(DefectCode::LongDeletion),
            "Deletion" => Some(DefectCode::Deletion),
            "Insertion" => Some(DefectCode::Insertion),
            "MutatedStartCodon" => Some(DefectCode::MutatedStartCodon),
            "MutatedStopCodon" => Some(DefectCode::MutatedStopCodon),
            "InternalStop" => Some(DefectCode::InternalStop),
            "PackagingSignalDeletion" => Some(DefectCode::PackagingSignalDeletion),
            "MajorSpliceDonorSiteMutated" => Some(DefectCode::MajorSpliceDonorSiteMutated),
            _ => None,
        }
    }

    /// The classifier's spelling of this code.
    pub fn as_code(&self) -> &'static str {
        match self {
            DefectCode::ApobecHypermutation => "APOBECHypermutation",
            DefectCode::NonHiv => "NonHIV",
            DefectCode::Scramble => "Scramble",
            DefectCode::InternalInversion => "InternalInversion",
            DefectCode::UnknownNucleotide => "UnknownNucleotide",
            DefectCode::MissingOrf => "MissingORF",
            DefectCode::LongDeletion => "LongDeletion",
            DefectCode::Deletion => "Deletion",
            DefectCode::Insertion => "Insertion",
            DefectCode::MutatedStartCodon => "MutatedStartCodon",
            DefectCode::MutatedStopCodon => "MutatedStopCodon",
            DefectCode::InternalStop => "InternalStop",
            DefectCode::PackagingSignalDeletion => "PackagingSignalDeletion",
            DefectCode::MajorSpliceDonorSiteMutated => "MajorSpliceDonorSiteMutated",
        }
    }

    /// Whether this code damages the genome architecture itself,
    /// independent of any single reading frame.
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            DefectCode::ApobecHypermutation
                | DefectCode::NonHiv
                | DefectCode::Scramble
                | DefectCode::InternalInversion
                | DefectCode::UnknownNucleotide
                | DefectCode::MissingOrf
                | DefectCode::LongDeletion
        )
    }
}

impl fmt::Display for DefectCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_code())
    }
}

/// The progressive defect tiers used by the intactness predicates.
///
/// Every tier includes the structural codes; the distance tier adds all
/// reading-frame defects, the indel tier only the length-changing ones.
/// The packaging-signal and splice-donor codes belong to no tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefectTier {
    Structural,
    Distance,
    Indel,
}

impl DefectTier {
    /// Whether `code` disqualifies a sequence at this tier.
    pub fn contains(&self, code: DefectCode) -> bool {
        // structural codes disqualify at every tier
        if code.is_structural() {
            return true;
        }
        match self {
            DefectTier::Structural => false,
            DefectTier::Distance => matches!(
                code,
                DefectCode::Deletion
                    | DefectCode::Insertion
                    | DefectCode::MutatedStartCodon
                    | DefectCode::MutatedStopCodon
                    | DefectCode::InternalStop
            ),
            DefectTier::Indel => matches!(code, DefectCode::Deletion | DefectCode::Insertion),
        }
    }

    /// Tier membership for a raw code string. Unknown codes belong to no
    /// tier.
    pub fn contains_code(&self, code: &str) -> bool {
        DefectCode::from_code(code).is_some_and(|c| self.contains(c))
    }
}

/// One row of a defect table: a single defect call against a sequence.
///
/// The code stays a raw string at this layer; the upstream vocabulary is
/// open-ended and extra columns in the table are ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct DefectRow {
    pub qseqid: String,
    pub code: String,
}

/// All defect calls from one table file, grouped by sequence identifier.
///
/// A sequence with no rows is intact at every tier: the upstream
/// classifier only writes rows for sequences it found fault with.
#[derive(Debug, Clone, Default)]
pub struct DefectTable {
    defects: HashMap<String, Vec<DefectRow>>,
}

impl TryFrom<&Path> for DefectTable {
    type Error = TableError;

    ///
    /// Load a [DefectTable] from a CSV file (gzip transparent).
    ///
    /// # Arguments:
    /// - value: path to the defect table on disk.
    fn try_from(value: &Path) -> Result<Self, TableError> {
        let reader = get_dynamic_reader(value)?;
        let mut csv_reader = csv::Reader::from_reader(reader);

        let mut defects: HashMap<String, Vec<DefectRow>> = HashMap::new();
        for result in csv_reader.deserialize() {
            let row: DefectRow = result?;
            defects.entry(row.qseqid.clone()).or_default().push(row);
        }

        Ok(DefectTable { defects })
    }
}

impl TryFrom<&str> for DefectTable {
    type Error = TableError;

    fn try_from(value: &str) -> Result<Self, TableError> {
        DefectTable::try_from(Path::new(value))
    }
}

impl TryFrom<PathBuf> for DefectTable {
    type Error = TableError;

    fn try_from(value: PathBuf) -> Result<Self, TableError> {
        DefectTable::try_from(value.as_path())
    }
}

impl FromIterator<DefectRow> for DefectTable {
    fn from_iter<I: IntoIterator<Item = DefectRow>>(iter: I) -> Self {
        let mut defects: HashMap<String, Vec<DefectRow>> = HashMap::new();
        for row in iter {
            defects.entry(row.qseqid.clone()).or_default().push(row);
        }
        DefectTable { defects }
    }
}

impl DefectTable {
    /// Defect calls recorded against `qseqid`, if any.
    pub fn defects_for(&self, qseqid: &str) -> Option<&[DefectRow]> {
        self.defects.get(qseqid).map(|rows| rows.as_slice())
    }

    /// Number of sequences with at least one recorded defect.
    pub fn len(&self) -> usize {
        self.defects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.defects.is_empty()
    }

    /// Whether `qseqid` is free of defects at the given tier.
    pub fn is_intact(&self, qseqid: &str, tier: DefectTier) -> bool {
        match self.defects.get(qseqid) {
            Some(rows) => !rows.iter().any(|row| tier.contains_code(&row.code)),
            None => true,
        }
    }

    /// No structural damage to the genome architecture.
    pub fn is_structurally_intact(&self, qseqid: &str) -> bool {
        self.is_intact(qseqid, DefectTier::Structural)
    }

    /// No structural damage and no reading-frame defects.
    pub fn is_distance_intact(&self, qseqid: &str) -> bool {
        self.is_intact(qseqid, DefectTier::Distance)
    }

    /// No structural damage and no length-changing indels.
    pub fn is_indel_intact(&self, qseqid: &str) -> bool {
        self.is_intact(qseqid, DefectTier::Indel)
    }
}

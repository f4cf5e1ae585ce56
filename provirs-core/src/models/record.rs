use serde::Deserialize;

use crate::defects::DefectTable;

/// Residues ignored at each end of a translated protein when scanning for
/// premature stop codons. Ragged alignment ends routinely produce stops
/// there.
const STOP_CODON_EDGE: usize = 10;

/// One row of a per-region measurement table.
///
/// `start`/`end` are inclusive reference coordinates and `distance` is the
/// normalized alignment distance to the subtype reference. `indel_impact`
/// is only written by the newer pipeline, so it stays optional at this
/// layer. Extra columns in the table are ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct RegionRow {
    pub qseqid: String,
    pub region: String,
    pub distance: f64,
    pub start: i64,
    pub end: i64,
    pub protein: String,
    pub aminoacids: String,
    #[serde(default)]
    pub indel_impact: Option<String>,
}

/// A measurement row annotated with its three intactness verdicts.
///
/// The verdicts are computed once at load time, one per defect tier, so
/// that downstream filtering never re-consults the defect table.
#[derive(Debug, Clone)]
pub struct RegionRecord {
    pub qseqid: String,
    pub region: String,
    pub distance: f64,
    pub start: i64,
    pub end: i64,
    pub protein: String,
    pub aminoacids: String,
    pub indel_impact: Option<String>,
    /// Free of structural defects; gates the size metrics.
    pub size_structural_intact: bool,
    /// Free of structural and reading-frame defects; gates distance.
    pub distance_intact: bool,
    /// Free of structural and length-changing defects; gates indel impact.
    pub indel_intact: bool,
}

impl RegionRecord {
    /// Annotate a row using the defect calls recorded against its
    /// sequence.
    pub fn classified(row: RegionRow, defects: &DefectTable) -> Self {
        let size_structural_intact = defects.is_structurally_intact(&row.qseqid);
        let distance_intact = defects.is_distance_intact(&row.qseqid);
        let indel_intact = defects.is_indel_intact(&row.qseqid);
        RegionRecord::annotated(row, size_structural_intact, distance_intact, indel_intact)
    }

    /// Annotate a row from its translated protein alone.
    ///
    /// Used for sources that ship no defect table: a premature stop codon
    /// in the protein interior marks the sequence defective under all
    /// three tiers at once.
    pub fn from_stop_codons(row: RegionRow) -> Self {
        let intact = !has_interior_stop(&row.aminoacids);
        RegionRecord::annotated(row, intact, intact, intact)
    }

    fn annotated(
        row: RegionRow,
        size_structural_intact: bool,
        distance_intact: bool,
        indel_intact: bool,
    ) -> Self {
        RegionRecord {
            qseqid: row.qseqid,
            region: row.region,
            distance: row.distance,
            start: row.start,
            end: row.end,
            protein: row.protein,
            aminoacids: row.aminoacids,
            indel_impact: row.indel_impact,
            size_structural_intact,
            distance_intact,
            indel_intact,
        }
    }
}

/// Whether a translated protein carries a stop codon away from its ends.
///
/// The first and last [`STOP_CODON_EDGE`] residues are excluded from the
/// scan; strings too short to have an interior report `false`.
pub fn has_interior_stop(aminos: &str) -> bool {
    let bytes = aminos.as_bytes();
    if bytes.len() <= 2 * STOP_CODON_EDGE {
        return false;
    }
    bytes[STOP_CODON_EDGE..bytes.len() - STOP_CODON_EDGE].contains(&b'*')
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::defects::DefectRow;

    use pretty_assertions::assert_eq;
    use rstest::*;

    fn row(qseqid: &str, aminos: &str) -> RegionRow {
        RegionRow {
            qseqid: qseqid.to_string(),
            region: "gag".to_string(),
            distance: 0.1,
            start: 790,
            end: 2292,
            protein: "MGARASVLSG".to_string(),
            aminoacids: aminos.to_string(),
            indel_impact: None,
        }
    }

    #[rstest]
    #[case("", false)]
    #[case("MGARASVLSG", false)]
    // a stop in the first ten residues sits outside the scanned window
    #[case("MGAR*SVLSGGELDRWEKIRLRPGG", false)]
    // exactly 21 residues: one interior position, holding a stop
    #[case("MGARASVLSG*GELDRWEKIR", true)]
    #[case("MGARASVLSGGELDRWEKIRLRPGGKKKY", false)]
    #[case("MGARASVLSGGELD*WEKIRLRPGGKKKY", true)]
    // stop only within the last ten residues
    #[case("MGARASVLSGGELDWEKIRLRPGG*KKY", false)]
    fn test_has_interior_stop(#[case] aminos: &str, #[case] expected: bool) {
        assert_eq!(has_interior_stop(aminos), expected);
    }

    #[rstest]
    fn test_classified_uses_defect_table() {
        let defects: DefectTable = [
            DefectRow {
                qseqid: "seq1".to_string(),
                code: "InternalStop".to_string(),
            },
        ]
        .into_iter()
        .collect();

        let record = RegionRecord::classified(row("seq1", "MGARASVLSG"), &defects);
        assert!(record.size_structural_intact);
        assert!(!record.distance_intact);
        assert!(record.indel_intact);

        let record = RegionRecord::classified(row("seq2", "MGARASVLSG"), &defects);
        assert!(record.size_structural_intact);
        assert!(record.distance_intact);
        assert!(record.indel_intact);
    }

    #[rstest]
    fn test_stop_codon_fallback_sets_all_three_flags() {
        let clean = RegionRecord::from_stop_codons(row("seq1", "MGARASVLSGGELDRWEKIRLRPGGKKKY"));
        assert!(clean.size_structural_intact);
        assert!(clean.distance_intact);
        assert!(clean.indel_intact);

        let stopped = RegionRecord::from_stop_codons(row("seq2", "MGARASVLSGGELD*WEKIRLRPGGKKKY"));
        assert!(!stopped.size_structural_intact);
        assert!(!stopped.distance_intact);
        assert!(!stopped.indel_intact);
    }

    #[rstest]
    fn test_edge_stop_codon_counts_as_intact() {
        // the stop sits inside the leading edge, outside the scanned window
        let record = RegionRecord::from_stop_codons(row("seq1", "MG*RASVLSGGELDRWEKIRLRPGGKKKY"));
        assert!(record.size_structural_intact);
        assert!(record.distance_intact);
        assert!(record.indel_intact);
    }
}

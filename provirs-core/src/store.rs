//! Explicit caches for defect tables and joined measurement records.
//!
//! Tables are read once and held for the life of the store; repeated
//! requests hand back the cached copy. There is no eviction and no
//! background invalidation, only [`RecordStore::clear`], which exists so
//! tests (and long-lived callers that re-generate their tables) can start
//! from a clean slate.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::defects::DefectTable;
use crate::errors::TableError;
use crate::models::{DataSource, RegionRecord, RegionRow, SourceTables};
use crate::utils::get_dynamic_reader;

/// Cache of defect tables keyed by file path.
#[derive(Debug, Default)]
pub struct DefectTableStore {
    tables: HashMap<PathBuf, DefectTable>,
}

impl DefectTableStore {
    pub fn new() -> Self {
        DefectTableStore {
            tables: HashMap::new(),
        }
    }

    /// The defect table at `path`, loading it on first use.
    pub fn get(&mut self, path: &Path) -> Result<&DefectTable, TableError> {
        if !self.tables.contains_key(path) {
            let table = DefectTable::try_from(path)?;
            self.tables.insert(path.to_path_buf(), table);
        }
        Ok(&self.tables[path])
    }

    /// Number of tables currently cached.
    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    /// Drop every cached table.
    pub fn clear(&mut self) {
        self.tables.clear();
    }
}

/// Joined measurement records per data source, loaded lazily and cached.
///
/// Owns the per-source table registry, a [`DefectTableStore`], and the
/// materialized record vectors. All loading goes through `&mut self`;
/// single-writer discipline is enforced by the borrow checker.
#[derive(Debug, Default)]
pub struct RecordStore {
    sources: HashMap<DataSource, SourceTables>,
    defect_tables: DefectTableStore,
    joined: HashMap<DataSource, Vec<RegionRecord>>,
}

impl RecordStore {
    /// A store with no sources registered.
    pub fn new() -> Self {
        RecordStore::default()
    }

    /// A store preconfigured with the conventional output layout for
    /// every known source.
    pub fn from_output_dir<P: AsRef<Path>>(dir: P) -> Self {
        let dir = dir.as_ref();
        let mut store = RecordStore::new();
        for source in DataSource::ALL {
            store.register(source, SourceTables::conventional(dir, source));
        }
        store
    }

    /// Register (or replace) the tables backing `source`.
    pub fn register(&mut self, source: DataSource, tables: SourceTables) {
        self.sources.insert(source, tables);
    }

    /// The joined records for `source`, loading and classifying them on
    /// first use. Later calls return the cached records without touching
    /// the filesystem.
    pub fn get_joined(&mut self, source: DataSource) -> Result<&[RegionRecord], TableError> {
        if !self.joined.contains_key(&source) {
            let tables = self
                .sources
                .get(&source)
                .ok_or(TableError::UnconfiguredSource(source))?;
            let records = load_joined(tables, &mut self.defect_tables)?;
            self.joined.insert(source, records);
        }
        Ok(&self.joined[&source])
    }

    /// Drop the cached records and defect tables. Registered sources
    /// stay.
    pub fn clear(&mut self) {
        self.joined.clear();
        self.defect_tables.clear();
    }
}

/// Read a source's measurement table and annotate every row with its
/// intactness verdicts.
///
/// Rows are classified against the source's defect table when one is
/// configured, and by the stop-codon scan otherwise. Malformed numeric
/// fields are fatal.
pub fn load_joined(
    tables: &SourceTables,
    defect_tables: &mut DefectTableStore,
) -> Result<Vec<RegionRecord>, TableError> {
    let reader = get_dynamic_reader(&tables.regions)?;
    let mut csv_reader = csv::Reader::from_reader(reader);

    let defects = match &tables.defects {
        Some(path) => Some(defect_tables.get(path)?),
        None => None,
    };

    let mut records = Vec::new();
    for result in csv_reader.deserialize() {
        let row: RegionRow = result?;
        let record = match defects {
            Some(table) => RegionRecord::classified(row, table),
            None => RegionRecord::from_stop_codons(row),
        };
        records.push(record);
    }

    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::fs;
    use std::path::PathBuf;

    use pretty_assertions::assert_eq;
    use rstest::*;
    use tempfile::TempDir;

    const REGIONS_CSV: &str = "\
qseqid,region,distance,start,end,protein,aminoacids,indel_impact
seq1,gag,0.10,790,2292,MGARASVLSG,MGARASVLSGGELDRWEKIRLRPGGKKKY,0.0
seq2,gag,0.35,790,2292,MGARASV,MGARASVLSGGELDRWEKIRLRPGGKKKY,3.0
seq1,pol,0.12,2085,5096,FFREDLAFLQ,FFREDLAFLQGKAREFSSEQTRANSPTR,0.0
";

    const DEFECTS_CSV: &str = "\
qseqid,code
seq2,Deletion
seq2,InternalStop
";

    const JOINED_CSV: &str = "\
qseqid,region,distance,start,end,protein,aminoacids
seq1,gag,0.10,790,2292,MGARASVLSG,MGARASVLSGGELDRWEKIRLRPGGKKKY
seq2,gag,0.40,790,2292,MGARASV,MGARASVLSGGELD*WEKIRLRPGGKKKY
";

    #[fixture]
    fn output_dir() -> TempDir {
        let dir = tempfile::tempdir().unwrap();

        let plasma = dir.path().join("fullgenomes-plasma");
        fs::create_dir_all(&plasma).unwrap();
        fs::write(plasma.join("regions.csv"), REGIONS_CSV).unwrap();
        fs::write(plasma.join("defects.csv"), DEFECTS_CSV).unwrap();

        let individual = dir.path().join("individual-plasma");
        fs::create_dir_all(&individual).unwrap();
        fs::write(individual.join("joined.csv"), JOINED_CSV).unwrap();

        dir
    }

    #[rstest]
    fn test_defect_table_store_caches_by_path(output_dir: TempDir) {
        let path = output_dir.path().join("fullgenomes-plasma/defects.csv");
        let mut store = DefectTableStore::new();

        let first = store.get(&path).unwrap().len();
        assert_eq!(first, 1);
        assert_eq!(store.len(), 1);

        // second lookup must not add another entry
        store.get(&path).unwrap();
        assert_eq!(store.len(), 1);

        store.clear();
        assert!(store.is_empty());
    }

    #[rstest]
    fn test_defect_table_store_propagates_read_errors() {
        let mut store = DefectTableStore::new();
        let result = store.get(Path::new("does/not/exist.csv"));
        assert!(matches!(result, Err(TableError::TableRead { .. })));
        assert!(store.is_empty());
    }

    #[rstest]
    fn test_get_joined_classifies_against_defects(output_dir: TempDir) {
        let mut store = RecordStore::from_output_dir(output_dir.path());
        let records = store.get_joined(DataSource::CfeIntactPlasma).unwrap();

        assert_eq!(records.len(), 3);

        let seq1_gag = &records[0];
        assert_eq!(seq1_gag.qseqid, "seq1");
        assert_eq!(seq1_gag.region, "gag");
        assert_eq!(seq1_gag.distance, 0.10);
        assert!(seq1_gag.size_structural_intact);
        assert!(seq1_gag.distance_intact);
        assert!(seq1_gag.indel_intact);

        // seq2 carries Deletion + InternalStop: structurally fine, but
        // defective for distance and indel analysis
        let seq2_gag = &records[1];
        assert!(seq2_gag.size_structural_intact);
        assert!(!seq2_gag.distance_intact);
        assert!(!seq2_gag.indel_intact);
        assert_eq!(seq2_gag.indel_impact.as_deref(), Some("3.0"));
    }

    #[rstest]
    fn test_get_joined_stop_codon_fallback(output_dir: TempDir) {
        let mut store = RecordStore::from_output_dir(output_dir.path());
        let records = store.get_joined(DataSource::LosAlamosPlasma).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].indel_impact, None);
        assert!(records[0].size_structural_intact);
        assert!(!records[1].size_structural_intact);
        assert!(!records[1].distance_intact);
        assert!(!records[1].indel_intact);
    }

    #[rstest]
    fn test_get_joined_is_cached(output_dir: TempDir) {
        let mut store = RecordStore::from_output_dir(output_dir.path());
        let first = store.get_joined(DataSource::CfeIntactPlasma).unwrap().len();

        // remove the backing file: the cached records must survive
        fs::remove_file(output_dir.path().join("fullgenomes-plasma/regions.csv")).unwrap();
        let second = store.get_joined(DataSource::CfeIntactPlasma).unwrap().len();
        assert_eq!(first, second);

        // once cleared, loading has to hit the (now missing) file again
        store.clear();
        let result = store.get_joined(DataSource::CfeIntactPlasma);
        assert!(matches!(result, Err(TableError::TableRead { .. })));
    }

    #[rstest]
    fn test_unconfigured_source_is_an_error() {
        let mut store = RecordStore::new();
        let result = store.get_joined(DataSource::CfeIntactAll);
        assert!(matches!(
            result,
            Err(TableError::UnconfiguredSource(DataSource::CfeIntactAll))
        ));
    }

    #[rstest]
    fn test_register_overrides_conventional_layout(output_dir: TempDir) {
        let mut store = RecordStore::from_output_dir(PathBuf::from("nowhere"));
        store.register(
            DataSource::CfeIntactPlasma,
            SourceTables::new(output_dir.path().join("fullgenomes-plasma/regions.csv"))
                .with_defects(output_dir.path().join("fullgenomes-plasma/defects.csv")),
        );

        let records = store.get_joined(DataSource::CfeIntactPlasma).unwrap();
        assert_eq!(records.len(), 3);
    }

    #[rstest]
    fn test_malformed_numeric_field_is_fatal(output_dir: TempDir) {
        let path = output_dir.path().join("broken.csv");
        fs::write(
            &path,
            "qseqid,region,distance,start,end,protein,aminoacids\n\
             seq1,gag,not-a-number,790,2292,MGARASVLSG,MGARASVLSG\n",
        )
        .unwrap();

        let mut store = RecordStore::new();
        store.register(DataSource::CfeIntactPlasma, SourceTables::new(&path));

        let result = store.get_joined(DataSource::CfeIntactPlasma);
        assert!(matches!(result, Err(TableError::Csv(_))));
    }
}

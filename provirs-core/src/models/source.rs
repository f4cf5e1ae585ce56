use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::errors::TableError;

/// The measurement collections this crate knows how to read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataSource {
    /// Los Alamos database sequences from plasma donors. Ships no defect
    /// table, so intactness falls back to the stop-codon scan.
    LosAlamosPlasma,
    /// CFEIntact calls on plasma-derived full genomes.
    CfeIntactPlasma,
    /// CFEIntact calls on the full cohort.
    CfeIntactAll,
}

impl DataSource {
    /// Every known source, in report order.
    pub const ALL: [DataSource; 3] = [
        DataSource::LosAlamosPlasma,
        DataSource::CfeIntactPlasma,
        DataSource::CfeIntactAll,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DataSource::LosAlamosPlasma => "los-alamos/plasma",
            DataSource::CfeIntactPlasma => "cfeintact/plasma",
            DataSource::CfeIntactAll => "cfeintact/all",
        }
    }
}

impl FromStr for DataSource {
    type Err = TableError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "los-alamos/plasma" => Ok(DataSource::LosAlamosPlasma),
            "cfeintact/plasma" => Ok(DataSource::CfeIntactPlasma),
            "cfeintact/all" => Ok(DataSource::CfeIntactAll),
            _ => Err(TableError::UnknownSource(s.to_string())),
        }
    }
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Paths to the tables backing one data source.
///
/// The measurement table is required; the defect table is optional and
/// its absence switches classification to the stop-codon fallback.
#[derive(Debug, Clone)]
pub struct SourceTables {
    pub regions: PathBuf,
    pub defects: Option<PathBuf>,
}

impl SourceTables {
    pub fn new<P: Into<PathBuf>>(regions: P) -> Self {
        SourceTables {
            regions: regions.into(),
            defects: None,
        }
    }

    pub fn with_defects<P: Into<PathBuf>>(mut self, defects: P) -> Self {
        self.defects = Some(defects.into());
        self
    }

    /// Table paths for `source` under the pipeline's conventional output
    /// layout.
    pub fn conventional(dir: &Path, source: DataSource) -> Self {
        match source {
            DataSource::LosAlamosPlasma => {
                SourceTables::new(dir.join("individual-plasma").join("joined.csv"))
            }
            DataSource::CfeIntactPlasma => {
                let base = dir.join("fullgenomes-plasma");
                SourceTables::new(base.join("regions.csv")).with_defects(base.join("defects.csv"))
            }
            DataSource::CfeIntactAll => {
                let base = dir.join("fullgenomes-all");
                SourceTables::new(base.join("regions.csv")).with_defects(base.join("defects.csv"))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use rstest::*;

    #[rstest]
    #[case("los-alamos/plasma", DataSource::LosAlamosPlasma)]
    #[case("cfeintact/plasma", DataSource::CfeIntactPlasma)]
    #[case("cfeintact/all", DataSource::CfeIntactAll)]
    fn test_source_round_trip(#[case] name: &str, #[case] source: DataSource) {
        assert_eq!(name.parse::<DataSource>().unwrap(), source);
        assert_eq!(source.to_string(), name);
    }

    #[rstest]
    #[case("cfeintact")]
    #[case("CFEIntact/Plasma")]
    #[case("")]
    fn test_unknown_source_is_rejected(#[case] name: &str) {
        let err = name.parse::<DataSource>().unwrap_err();
        assert!(matches!(err, TableError::UnknownSource(_)));
    }

    #[rstest]
    fn test_conventional_layout() {
        let dir = Path::new("output");

        let tables = SourceTables::conventional(dir, DataSource::LosAlamosPlasma);
        assert_eq!(tables.regions, dir.join("individual-plasma/joined.csv"));
        assert_eq!(tables.defects, None);

        let tables = SourceTables::conventional(dir, DataSource::CfeIntactPlasma);
        assert_eq!(tables.regions, dir.join("fullgenomes-plasma/regions.csv"));
        assert_eq!(
            tables.defects,
            Some(dir.join("fullgenomes-plasma/defects.csv"))
        );

        let tables = SourceTables::conventional(dir, DataSource::CfeIntactAll);
        assert_eq!(tables.regions, dir.join("fullgenomes-all/regions.csv"));
        assert_eq!(tables.defects, Some(dir.join("fullgenomes-all/defects.csv")));
    }

    #[rstest]
    fn test_with_defects_builder() {
        let tables = SourceTables::new("regions.csv").with_defects("defects.csv");
        assert_eq!(tables.regions, PathBuf::from("regions.csv"));
        assert_eq!(tables.defects, Some(PathBuf::from("defects.csv")));
    }
}

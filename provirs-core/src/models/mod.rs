pub mod record;
pub mod source;

// re-export for cleaner imports
pub use self::record::{RegionRecord, RegionRow, has_interior_stop};
pub use self::source::{DataSource, SourceTables};

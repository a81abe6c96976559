//! Historical market data loading.

mod csv_source;

pub use csv_source::CsvDataSource;

use aiquant_core::error::DataError;
use aiquant_core::types::Bar;

/// Load a validated bar series from a CSV file.
pub fn load_csv(path: &str) -> Result<Vec<Bar>, DataError> {
    let source = CsvDataSource::new(path)?;
    source.load_all()
}

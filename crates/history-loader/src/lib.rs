//! history-loader: read multiplier histories from tabular exports.
//!
//! Expects a headered CSV with a `multiplier` column; other columns are ignored.
//! A single bad cell fails the whole load so a caller never ends up with a
//! silently truncated history.

use multiplier_core::{ObservationSeries, PredictorError};
use std::fs::File;
use std::io::Read;
use std::path::Path;

pub use multiplier_core::parse_multiplier;

/// Column holding the observed outcomes
pub const MULTIPLIER_COLUMN: &str = "multiplier";

/// Load the multiplier column of a CSV file.
pub fn load_csv(path: impl AsRef<Path>) -> Result<ObservationSeries, PredictorError> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let series = parse_csv(file)?;
    tracing::info!("Loaded {} multipliers from {}", series.len(), path.display());
    Ok(series)
}

/// Parse the multiplier column from any CSV source, preserving row order.
pub fn parse_csv<R: Read>(reader: R) -> Result<ObservationSeries, PredictorError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let column = reader
        .headers()
        .map_err(|e| PredictorError::Csv(e.to_string()))?
        .iter()
        .position(|h| h == MULTIPLIER_COLUMN)
        .ok_or_else(|| PredictorError::MissingColumn(MULTIPLIER_COLUMN.to_string()))?;

    let mut values = Vec::new();
    for (idx, record) in reader.records().enumerate() {
        let record = record.map_err(|e| PredictorError::Csv(e.to_string()))?;
        let cell = record.get(column).unwrap_or("");
        let value = parse_multiplier(cell).map_err(|_| {
            PredictorError::InvalidNumberFormat(format!("row {}: '{}'", idx + 1, cell))
        })?;
        values.push(value);
    }

    Ok(ObservationSeries::from(values))
}

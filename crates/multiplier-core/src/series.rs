//! Observation Series
//!
//! Caller-owned, append-only history of multipliers in chronological order.

use serde::{Deserialize, Serialize};

use crate::PredictorError;

/// Parse a user-supplied multiplier.
///
/// Surrounding whitespace is ignored. Anything that is not a finite real
/// number is rejected with [`PredictorError::InvalidNumberFormat`].
pub fn parse_multiplier(text: &str) -> Result<f64, PredictorError> {
    let trimmed = text.trim();
    match trimmed.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(PredictorError::InvalidNumberFormat(trimmed.to_string())),
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ObservationSeries {
    values: Vec<f64>,
}

impl ObservationSeries {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, value: f64) {
        self.values.push(value);
    }

    /// Parse and append one value. On error the series is left untouched.
    pub fn push_text(&mut self, text: &str) -> Result<f64, PredictorError> {
        let value = parse_multiplier(text)?;
        self.values.push(value);
        Ok(value)
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn last(&self) -> Option<f64> {
        self.values.last().copied()
    }

    /// The most recent `n` observations (the whole series if it is shorter).
    pub fn recent(&self, n: usize) -> &[f64] {
        let start = self.values.len().saturating_sub(n);
        &self.values[start..]
    }
}

impl From<Vec<f64>> for ObservationSeries {
    fn from(values: Vec<f64>) -> Self {
        Self { values }
    }
}

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::PredictorError;

/// Default cutoff separating "above" from "under" outcomes.
pub const DEFAULT_THRESHOLD: f64 = 2.0;

/// Default number of most-recent observations used for the trend signal.
pub const DEFAULT_TREND_WINDOW: usize = 5;

/// Above-confidence strictly greater than this is a low-risk "above" call.
pub const LOW_RISK_ABOVE: f64 = 0.65;

/// Above-confidence strictly less than this is a low-risk "under" call.
pub const LOW_RISK_UNDER: f64 = 0.35;

/// Which side of the threshold an observation falls on.
///
/// Equality counts as `Under`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Above,
    Under,
}

impl Side {
    pub fn of(value: f64, threshold: f64) -> Self {
        if value > threshold {
            Side::Above
        } else {
            Side::Under
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Above => "Above",
            Side::Under => "Under",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Side {
    type Err = PredictorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "above" | "over" => Ok(Side::Above),
            "under" | "below" => Ok(Side::Under),
            other => Err(PredictorError::InvalidParameter(format!(
                "expected 'above' or 'under', got '{}'",
                other
            ))),
        }
    }
}

/// Discrete risk classification of a confidence estimate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskLevel {
    /// No observations yet
    Neutral,
    /// Above-confidence over 0.65
    LowRiskAbove,
    /// Above-confidence under 0.35
    LowRiskUnder,
    /// Anything in between
    HighRisk,
}

impl RiskLevel {
    pub fn from_confidence(above_confidence: f64) -> Self {
        match above_confidence {
            c if c > LOW_RISK_ABOVE => RiskLevel::LowRiskAbove,
            c if c < LOW_RISK_UNDER => RiskLevel::LowRiskUnder,
            _ => RiskLevel::HighRisk,
        }
    }

    /// Human-readable label, parameterized with the threshold it was judged against.
    pub fn label(&self, threshold: f64) -> String {
        match self {
            RiskLevel::Neutral => "Neutral".to_string(),
            RiskLevel::LowRiskAbove => format!("Low risk for Above {}", threshold),
            RiskLevel::LowRiskUnder => format!("Low risk for Under {}", threshold),
            RiskLevel::HighRisk => "High risk / uncertain".to_string(),
        }
    }

    /// The side this level leans toward, if it is confident enough to lean at all.
    pub fn favored_side(&self) -> Option<Side> {
        match self {
            RiskLevel::LowRiskAbove => Some(Side::Above),
            RiskLevel::LowRiskUnder => Some(Side::Under),
            RiskLevel::Neutral | RiskLevel::HighRisk => None,
        }
    }
}

/// Signal breakdown behind a confidence estimate
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceMetrics {
    /// Long-run share of observations above the threshold
    pub base_above: f64,

    /// Short-term trend adjustment (-0.05, 0 or +0.05)
    pub trend_bias: f64,

    /// Streak-reversal adjustment (-0.08, 0 or +0.08)
    pub streak_bias: f64,

    /// Length of the trailing same-side run
    pub streak_length: usize,

    /// Above count inside the trend window
    pub recent_above: usize,

    /// Under-or-equal count inside the trend window
    pub recent_under: usize,

    /// Number of observations analyzed
    pub sample_size: usize,
}

/// Probabilistic forecast for the next observation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceResult {
    pub above_confidence: f64,
    pub under_confidence: f64,
    pub risk: RiskLevel,
    pub threshold: f64,
    pub metrics: ConfidenceMetrics,
}

impl ConfidenceResult {
    /// Result for an empty history: an even split with no opinion.
    pub fn neutral(threshold: f64) -> Self {
        Self {
            above_confidence: 0.5,
            under_confidence: 0.5,
            risk: RiskLevel::Neutral,
            threshold,
            metrics: ConfidenceMetrics::default(),
        }
    }

    /// Build a result from an already-clamped above-confidence.
    /// The under side is always derived, never computed independently.
    pub fn from_above(above_confidence: f64, threshold: f64, metrics: ConfidenceMetrics) -> Self {
        Self {
            above_confidence,
            under_confidence: 1.0 - above_confidence,
            risk: RiskLevel::from_confidence(above_confidence),
            threshold,
            metrics,
        }
    }

    pub fn label(&self) -> String {
        self.risk.label(self.threshold)
    }

    pub fn confidence_for(&self, side: Side) -> f64 {
        match side {
            Side::Above => self.above_confidence,
            Side::Under => self.under_confidence,
        }
    }
}

/// Render a threshold as a percentage multiplier without float noise (2.0 -> "200").
pub fn threshold_percent(threshold: f64) -> String {
    let formatted = format!("{:.2}", threshold * 100.0);
    formatted
        .trim_end_matches('0')
        .trim_end_matches('.')
        .to_string()
}

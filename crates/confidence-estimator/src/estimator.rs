//! Confidence Estimation
//!
//! Turns a chronological multiplier history into a bounded above/under
//! probability pair and a risk classification.

use multiplier_core::{
    ConfidenceMetrics, ConfidenceResult, PredictorError, DEFAULT_THRESHOLD, DEFAULT_TREND_WINDOW,
};
use serde::{Deserialize, Serialize};

use crate::signals::{base_frequency, streak_bias, trailing_streak, trend_bias};

/// Stateless scorer parameterized by threshold and trend window
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceEstimator {
    /// Observations strictly greater than this count as "above"
    pub threshold: f64,

    /// How many recent observations feed the trend signal (>= 1)
    pub trend_window: usize,
}

impl Default for ConfidenceEstimator {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            trend_window: DEFAULT_TREND_WINDOW,
        }
    }
}

impl ConfidenceEstimator {
    pub fn new(threshold: f64, trend_window: usize) -> Result<Self, PredictorError> {
        if !threshold.is_finite() {
            return Err(PredictorError::InvalidParameter(format!(
                "threshold must be finite, got {}",
                threshold
            )));
        }
        if trend_window == 0 {
            return Err(PredictorError::InvalidParameter(
                "trend_window must be at least 1".to_string(),
            ));
        }

        Ok(Self {
            threshold,
            trend_window,
        })
    }

    /// Estimate the next outcome from the full history.
    pub fn estimate(&self, series: &[f64]) -> ConfidenceResult {
        if series.is_empty() {
            return ConfidenceResult::neutral(self.threshold);
        }

        let base = base_frequency(series, self.threshold);
        let trend = trend_bias(series, self.threshold, self.trend_window);
        let streak = trailing_streak(series, self.threshold);
        let streak_adj = streak_bias(streak);

        let base_above = base.above_ratio();
        let above_confidence = (base_above + trend.bias + streak_adj).clamp(0.0, 1.0);

        let metrics = ConfidenceMetrics {
            base_above,
            trend_bias: trend.bias,
            streak_bias: streak_adj,
            streak_length: streak.map(|s| s.length).unwrap_or(0),
            recent_above: trend.recent.above,
            recent_under: trend.recent.under,
            sample_size: series.len(),
        };

        tracing::debug!(
            sample_size = metrics.sample_size,
            base_above = metrics.base_above,
            trend_bias = metrics.trend_bias,
            streak_bias = metrics.streak_bias,
            streak_length = metrics.streak_length,
            above_confidence,
            "Estimated confidence"
        );

        ConfidenceResult::from_above(above_confidence, self.threshold, metrics)
    }
}

/// One-off estimate with explicit parameters.
///
/// A zero `trend_window` is treated as 1 rather than rejected.
pub fn estimate(series: &[f64], threshold: f64, trend_window: usize) -> ConfidenceResult {
    ConfidenceEstimator {
        threshold,
        trend_window: trend_window.max(1),
    }
    .estimate(series)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use multiplier_core::RiskLevel;

    /// Deterministic pseudo-random multipliers in [1.0, 4.0)
    fn sample_series(seed: u64, len: usize) -> Vec<f64> {
        let mut state = seed.wrapping_mul(6364136223846793005).wrapping_add(1);
        (0..len)
            .map(|_| {
                state = state
                    .wrapping_mul(6364136223846793005)
                    .wrapping_add(1442695040888963407);
                1.0 + ((state >> 33) as f64 / (1u64 << 31) as f64) * 3.0
            })
            .collect()
    }

    #[test]
    fn test_empty_series_is_neutral() {
        let result = ConfidenceEstimator::default().estimate(&[]);
        assert_eq!(result.above_confidence, 0.5);
        assert_eq!(result.under_confidence, 0.5);
        assert_eq!(result.risk, RiskLevel::Neutral);
        assert_eq!(result.label(), "Neutral");
    }

    #[test]
    fn test_all_above_series() {
        let result = ConfidenceEstimator::default().estimate(&[3.0, 3.0, 3.0, 3.0, 3.0]);

        // 1.0 base - 0.05 trend - 0.08 streak
        assert_relative_eq!(result.above_confidence, 0.87, epsilon = 1e-12);
        assert_relative_eq!(result.under_confidence, 0.13, epsilon = 1e-12);
        assert_eq!(result.label(), "Low risk for Above 2");
        assert_eq!(result.metrics.streak_length, 5);
        assert_relative_eq!(result.metrics.trend_bias, -0.05);
        assert_relative_eq!(result.metrics.streak_bias, -0.08);
    }

    #[test]
    fn test_under_heavy_series_ending_above() {
        let result = ConfidenceEstimator::default().estimate(&[1.0, 1.0, 1.0, 1.0, 3.0]);

        // 0.2 base + 0.05 trend, single-element streak contributes nothing
        assert_relative_eq!(result.above_confidence, 0.25, epsilon = 1e-12);
        assert_relative_eq!(result.under_confidence, 0.75, epsilon = 1e-12);
        assert_eq!(result.risk, RiskLevel::LowRiskUnder);
        assert_eq!(result.label(), "Low risk for Under 2");
        assert_eq!(result.metrics.streak_length, 1);
        assert_eq!(result.metrics.streak_bias, 0.0);
    }

    #[test]
    fn test_single_observation() {
        let result = ConfidenceEstimator::default().estimate(&[2.5]);

        // Base 1.0, trend -0.05, no streak
        assert_relative_eq!(result.above_confidence, 0.95, epsilon = 1e-12);
        assert_eq!(result.metrics.streak_length, 1);
        assert_eq!(result.metrics.streak_bias, 0.0);
    }

    #[test]
    fn test_mixed_series_is_uncertain() {
        let result = ConfidenceEstimator::default().estimate(&[1.2, 3.4, 1.1, 2.8, 1.9, 5.0]);

        // Base 0.5; window [3.4, 1.1, 2.8, 1.9, 5.0] leans above; streak 1
        assert_relative_eq!(result.above_confidence, 0.45, epsilon = 1e-12);
        assert_eq!(result.risk, RiskLevel::HighRisk);
        assert_eq!(result.label(), "High risk / uncertain");
    }

    #[test]
    fn test_clamps_at_one() {
        // Base 100/103 plus both positive biases overshoots 1.0
        let mut series = vec![3.0; 100];
        series.extend([1.0, 1.0, 1.0]);

        let result = ConfidenceEstimator::default().estimate(&series);
        assert_relative_eq!(result.metrics.trend_bias, 0.05);
        assert_relative_eq!(result.metrics.streak_bias, 0.08);
        assert_eq!(result.above_confidence, 1.0);
        assert_eq!(result.under_confidence, 0.0);
        assert_eq!(result.risk, RiskLevel::LowRiskAbove);
    }

    #[test]
    fn test_clamps_at_zero() {
        let mut series = vec![1.0; 100];
        series.extend([3.0, 3.0, 3.0]);

        let result = ConfidenceEstimator::default().estimate(&series);
        assert_eq!(result.above_confidence, 0.0);
        assert_eq!(result.under_confidence, 1.0);
        assert_eq!(result.risk, RiskLevel::LowRiskUnder);
    }

    #[test]
    fn test_custom_threshold_and_window() {
        let estimator = ConfidenceEstimator::new(1.5, 2).unwrap();
        let result = estimator.estimate(&[1.0, 1.2, 1.6, 1.7]);

        // Base 0.5, window [1.6, 1.7] all above, streak 2
        assert_relative_eq!(result.above_confidence, 0.45, epsilon = 1e-12);
        assert_eq!(result.threshold, 1.5);
        assert_eq!(result.metrics.recent_above, 2);
        assert_eq!(result.metrics.recent_under, 0);
    }

    #[test]
    fn test_label_uses_threshold() {
        let estimator = ConfidenceEstimator::new(1.5, 5).unwrap();
        let result = estimator.estimate(&[2.0, 2.0, 2.0, 2.0, 2.0]);
        assert_eq!(result.label(), "Low risk for Above 1.5");
    }

    #[test]
    fn test_new_rejects_bad_parameters() {
        assert!(matches!(
            ConfidenceEstimator::new(2.0, 0),
            Err(PredictorError::InvalidParameter(_))
        ));
        assert!(matches!(
            ConfidenceEstimator::new(f64::NAN, 5),
            Err(PredictorError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_free_function_matches_estimator() {
        let series = sample_series(7, 40);
        assert_eq!(
            estimate(&series, 2.0, 5),
            ConfidenceEstimator::default().estimate(&series)
        );
        // Zero window behaves like a window of one
        assert_eq!(estimate(&series, 2.0, 0), estimate(&series, 2.0, 1));
    }

    #[test]
    fn test_probabilities_are_complementary_and_bounded() {
        let estimator = ConfidenceEstimator::default();
        for seed in 0..200 {
            let series = sample_series(seed, (seed % 37) as usize);
            let result = estimator.estimate(&series);

            assert!((0.0..=1.0).contains(&result.above_confidence));
            assert!((0.0..=1.0).contains(&result.under_confidence));
            assert_relative_eq!(
                result.above_confidence + result.under_confidence,
                1.0,
                epsilon = 1e-12
            );
            assert_eq!(result.under_confidence, 1.0 - result.above_confidence);
        }
    }

    #[test]
    fn test_appending_above_never_lowers_base_frequency() {
        let estimator = ConfidenceEstimator::default();
        for seed in 0..100 {
            let mut series = sample_series(seed, 1 + (seed % 20) as usize);
            let before = estimator.estimate(&series).metrics.base_above;
            series.push(10.0);
            let after = estimator.estimate(&series).metrics.base_above;
            assert!(after >= before, "seed {}: {} -> {}", seed, before, after);
        }
    }

    #[test]
    fn test_estimate_is_idempotent() {
        let series = sample_series(42, 25);
        let estimator = ConfidenceEstimator::default();
        let first = estimator.estimate(&series);
        let second = estimator.estimate(&series);
        assert_eq!(first, second);
        assert_eq!(
            first.above_confidence.to_bits(),
            second.above_confidence.to_bits()
        );
    }
}

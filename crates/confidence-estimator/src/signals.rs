//! Individual signals feeding the confidence estimate.

use multiplier_core::Side;
use serde::{Deserialize, Serialize};

/// Magnitude of the short-term trend adjustment
pub const TREND_BIAS: f64 = 0.05;

/// Magnitude of the streak-reversal adjustment
pub const STREAK_BIAS: f64 = 0.08;

/// Shortest trailing run that triggers the streak adjustment
pub const MIN_STREAK: usize = 3;

/// Above/under tallies over a slice of observations
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaseFrequency {
    pub above: usize,
    pub under: usize,
}

impl BaseFrequency {
    pub fn total(&self) -> usize {
        self.above + self.under
    }

    /// Share of observations above the threshold. An empty tally is an even split.
    pub fn above_ratio(&self) -> f64 {
        if self.total() == 0 {
            return 0.5;
        }
        self.above as f64 / self.total() as f64
    }
}

pub fn base_frequency(series: &[f64], threshold: f64) -> BaseFrequency {
    let above = series.iter().filter(|&&x| x > threshold).count();
    BaseFrequency {
        above,
        under: series.len() - above,
    }
}

/// Tallies inside the trend window together with the resulting bias
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrendCounts {
    pub recent: BaseFrequency,
    pub bias: f64,
}

/// Short-term trend over the last `window` observations.
///
/// An under-heavy window nudges toward "above" and vice versa, on the
/// expectation that runs revert toward the mean.
pub fn trend_bias(series: &[f64], threshold: f64, window: usize) -> TrendCounts {
    let start = series.len().saturating_sub(window);
    let recent = base_frequency(&series[start..], threshold);

    let bias = if recent.under > recent.above {
        TREND_BIAS
    } else if recent.above > recent.under {
        -TREND_BIAS
    } else {
        0.0
    };

    TrendCounts { recent, bias }
}

/// Trailing run of same-side observations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Streak {
    pub side: Side,
    pub length: usize,
}

/// Length and side of the run ending at the last observation.
pub fn trailing_streak(series: &[f64], threshold: f64) -> Option<Streak> {
    let last = *series.last()?;
    let side = Side::of(last, threshold);

    let mut length = 1;
    for i in (0..series.len() - 1).rev() {
        if Side::of(series[i], threshold) != Side::of(series[i + 1], threshold) {
            break;
        }
        length += 1;
    }

    Some(Streak { side, length })
}

/// Bias toward a reversal once a run reaches [`MIN_STREAK`].
pub fn streak_bias(streak: Option<Streak>) -> f64 {
    match streak {
        Some(Streak { side, length }) if length >= MIN_STREAK => match side {
            Side::Under => STREAK_BIAS,
            Side::Above => -STREAK_BIAS,
        },
        _ => 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_base_frequency_counts_equal_as_under() {
        let freq = base_frequency(&[1.0, 2.0, 2.5, 3.0], 2.0);
        assert_eq!(freq.above, 2);
        assert_eq!(freq.under, 2);
        assert_relative_eq!(freq.above_ratio(), 0.5);
    }

    #[test]
    fn test_base_frequency_empty() {
        let freq = base_frequency(&[], 2.0);
        assert_eq!(freq.total(), 0);
        assert_relative_eq!(freq.above_ratio(), 0.5);
    }

    #[test]
    fn test_trend_bias_under_heavy_window() {
        let trend = trend_bias(&[1.0, 1.0, 1.0, 1.0, 3.0], 2.0, 5);
        assert_eq!(trend.recent.above, 1);
        assert_eq!(trend.recent.under, 4);
        assert_relative_eq!(trend.bias, TREND_BIAS);
    }

    #[test]
    fn test_trend_bias_only_looks_at_window() {
        // Old history is under-heavy, but the last three are all above
        let trend = trend_bias(&[1.0, 1.0, 1.0, 1.0, 3.0, 3.0, 3.0], 2.0, 3);
        assert_eq!(trend.recent.total(), 3);
        assert_relative_eq!(trend.bias, -TREND_BIAS);
    }

    #[test]
    fn test_trend_bias_short_series_uses_everything() {
        let trend = trend_bias(&[3.0, 1.0], 2.0, 5);
        assert_eq!(trend.recent.total(), 2);
        assert_eq!(trend.bias, 0.0);
    }

    #[test]
    fn test_trailing_streak() {
        let streak = trailing_streak(&[3.0, 1.0, 1.5, 2.0], 2.0).unwrap();
        assert_eq!(streak.side, Side::Under);
        assert_eq!(streak.length, 3);

        let streak = trailing_streak(&[1.0, 1.0, 1.0, 1.0, 3.0], 2.0).unwrap();
        assert_eq!(streak.side, Side::Above);
        assert_eq!(streak.length, 1);

        let streak = trailing_streak(&[5.0, 5.0, 5.0], 2.0).unwrap();
        assert_eq!(streak.length, 3);
    }

    #[test]
    fn test_trailing_streak_single_and_empty() {
        assert_eq!(
            trailing_streak(&[1.2], 2.0),
            Some(Streak { side: Side::Under, length: 1 })
        );
        assert_eq!(trailing_streak(&[], 2.0), None);
    }

    #[test]
    fn test_trailing_streak_long_history() {
        let series = vec![1.0; 100_000];
        assert_eq!(trailing_streak(&series, 2.0).unwrap().length, 100_000);
    }

    #[test]
    fn test_streak_bias_direction() {
        assert_relative_eq!(
            streak_bias(Some(Streak { side: Side::Under, length: 3 })),
            STREAK_BIAS
        );
        assert_relative_eq!(
            streak_bias(Some(Streak { side: Side::Above, length: 7 })),
            -STREAK_BIAS
        );
        assert_eq!(streak_bias(Some(Streak { side: Side::Above, length: 2 })), 0.0);
        assert_eq!(streak_bias(None), 0.0);
    }
}

//! Confidence Estimator
//!
//! Forecasts whether the next multiplier will land above a threshold by
//! combining long-run frequency, short-term trend, and streak-reversal signals.

pub mod estimator;
pub mod signals;

pub use estimator::{estimate, ConfidenceEstimator};
pub use signals::{
    base_frequency, streak_bias, trailing_streak, trend_bias, BaseFrequency, Streak, TrendCounts,
    MIN_STREAK, STREAK_BIAS, TREND_BIAS,
};

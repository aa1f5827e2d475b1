use crate::{ConfidenceResult, ObservationSeries, PredictorError};

/// Sink for freshly computed confidence results.
///
/// Presentation lives behind this trait so the estimator never depends on
/// how (or whether) a result is shown.
pub trait ConfidenceReporter {
    fn report(
        &mut self,
        series: &ObservationSeries,
        result: &ConfidenceResult,
    ) -> Result<(), PredictorError>;
}

impl<T: ConfidenceReporter + ?Sized> ConfidenceReporter for Box<T> {
    fn report(
        &mut self,
        series: &ObservationSeries,
        result: &ConfidenceResult,
    ) -> Result<(), PredictorError> {
        (**self).report(series, result)
    }
}

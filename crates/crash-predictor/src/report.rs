//! Rendering of confidence results for the terminal.

use multiplier_core::{
    threshold_percent, ConfidenceReporter, ConfidenceResult, ObservationSeries, PredictorError,
    Side,
};
use std::io::Write;

/// Color tag for the proportion bar
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BarTone {
    Green,
    Red,
}

impl BarTone {
    pub fn for_confidence(above_confidence: f64) -> Self {
        if above_confidence > 0.5 {
            BarTone::Green
        } else {
            BarTone::Red
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BarTone::Green => "green",
            BarTone::Red => "red",
        }
    }
}

/// Horizontal indicator driven by above-confidence alone
#[derive(Debug, Clone, PartialEq)]
pub struct ProportionBar {
    pub filled: usize,
    pub width: usize,
    pub tone: BarTone,
}

impl ProportionBar {
    pub fn new(above_confidence: f64, width: usize) -> Self {
        let scaled = above_confidence.clamp(0.0, 1.0) * width as f64;
        let filled = (scaled.round() as usize).min(width);
        Self {
            filled,
            width,
            tone: BarTone::for_confidence(above_confidence),
        }
    }

    pub fn render(&self) -> String {
        format!(
            "|{}{}|",
            "#".repeat(self.filled),
            "-".repeat(self.width - self.filled)
        )
    }
}

fn percent(value: f64) -> String {
    format!("{:.1}%", value * 100.0)
}

/// Message printed when the user commits to a side.
pub fn prediction_message(result: &ConfidenceResult, side: Side) -> String {
    format!(
        "Prediction: {} {}% ({} confidence)",
        side,
        threshold_percent(result.threshold),
        percent(result.confidence_for(side))
    )
}

pub fn format_history(values: &[f64]) -> String {
    if values.is_empty() {
        return "No data yet.".to_string();
    }
    let joined: Vec<String> = values.iter().map(|v| v.to_string()).collect();
    format!("[{}]", joined.join(", "))
}

/// Human-readable report
pub struct TextReporter<W: Write> {
    out: W,
    history_display: usize,
    bar_width: usize,
}

impl<W: Write> TextReporter<W> {
    pub fn new(out: W, history_display: usize, bar_width: usize) -> Self {
        Self {
            out,
            history_display,
            bar_width,
        }
    }

    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> ConfidenceReporter for TextReporter<W> {
    fn report(
        &mut self,
        series: &ObservationSeries,
        result: &ConfidenceResult,
    ) -> Result<(), PredictorError> {
        let pct = threshold_percent(result.threshold);

        writeln!(self.out, "Recent History (last {})", self.history_display)?;
        writeln!(self.out, "{}", format_history(series.recent(self.history_display)))?;
        writeln!(self.out)?;

        writeln!(self.out, "Prediction Confidence")?;
        writeln!(self.out, "Above {}%: {}", pct, percent(result.above_confidence))?;
        writeln!(self.out, "Under {}%: {}", pct, percent(result.under_confidence))?;
        writeln!(self.out, "Risk Level: {}", result.label())?;

        if !series.is_empty() {
            let bar = ProportionBar::new(result.above_confidence, self.bar_width);
            writeln!(self.out)?;
            writeln!(self.out, "Risk Visualization")?;
            writeln!(
                self.out,
                "Confidence {} {} ({})",
                bar.render(),
                percent(result.above_confidence),
                bar.tone.as_str()
            )?;
            writeln!(self.out, "           Above {} Confidence (%)", result.threshold)?;
        }

        self.out.flush()?;
        Ok(())
    }
}

/// One JSON object per report, newline-delimited
pub struct JsonReporter<W: Write> {
    out: W,
    history_display: usize,
}

impl<W: Write> JsonReporter<W> {
    pub fn new(out: W, history_display: usize) -> Self {
        Self {
            out,
            history_display,
        }
    }

    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> ConfidenceReporter for JsonReporter<W> {
    fn report(
        &mut self,
        series: &ObservationSeries,
        result: &ConfidenceResult,
    ) -> Result<(), PredictorError> {
        let payload = serde_json::json!({
            "observations": series.len(),
            "recent": series.recent(self.history_display),
            "above_confidence": result.above_confidence,
            "under_confidence": result.under_confidence,
            "risk_label": result.label(),
            "result": result,
        });

        serde_json::to_writer(&mut self.out, &payload)
            .map_err(|e| PredictorError::Report(e.to_string()))?;
        writeln!(self.out)?;
        self.out.flush()?;
        Ok(())
    }
}

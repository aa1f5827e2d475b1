//! Interactive session: owns the history for the lifetime of one run and
//! feeds every change through the estimator and reporter.

use confidence_estimator::ConfidenceEstimator;
use multiplier_core::{
    parse_multiplier, ConfidenceReporter, ConfidenceResult, ObservationSeries, PredictorError,
    Side,
};
use std::io::{BufRead, Write};

use crate::report::{format_history, prediction_message};

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Add(String),
    Predict(Side),
    History,
    Report,
    Help,
    Quit,
    Empty,
    Unknown(String),
}

impl Command {
    pub fn parse(line: &str) -> Self {
        let line = line.trim();
        if line.is_empty() {
            return Command::Empty;
        }

        let (head, rest) = match line.split_once(char::is_whitespace) {
            Some((head, rest)) => (head, rest.trim()),
            None => (line, ""),
        };

        match head.to_lowercase().as_str() {
            "add" => Command::Add(rest.to_string()),
            "predict" => match rest.parse::<Side>() {
                Ok(side) => Command::Predict(side),
                Err(_) => Command::Unknown(line.to_string()),
            },
            "history" => Command::History,
            "report" => Command::Report,
            "help" | "?" => Command::Help,
            "quit" | "exit" => Command::Quit,
            _ if parse_multiplier(line).is_ok() => Command::Add(line.to_string()),
            _ => Command::Unknown(line.to_string()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Stop,
}

pub struct Session<R: ConfidenceReporter, W: Write> {
    series: ObservationSeries,
    estimator: ConfidenceEstimator,
    reporter: R,
    out: W,
    history_display: usize,
}

impl<R: ConfidenceReporter, W: Write> Session<R, W> {
    pub fn new(
        estimator: ConfidenceEstimator,
        reporter: R,
        out: W,
        history_display: usize,
    ) -> Self {
        Self {
            series: ObservationSeries::new(),
            estimator,
            reporter,
            out,
            history_display,
        }
    }

    /// Replace the history with a freshly loaded one and tell the user how much arrived.
    pub fn load_history(&mut self, series: ObservationSeries) -> Result<(), PredictorError> {
        self.series = series;
        writeln!(self.out, "Loaded {} multipliers from file.", self.series.len())?;
        Ok(())
    }

    #[cfg(test)]
    pub fn series(&self) -> &ObservationSeries {
        &self.series
    }

    pub fn current(&self) -> ConfidenceResult {
        self.estimator.estimate(self.series.as_slice())
    }

    pub fn report(&mut self) -> Result<(), PredictorError> {
        let result = self.current();
        self.reporter.report(&self.series, &result)
    }

    /// Parse and append one value, telling the user either way.
    /// Returns whether the series grew.
    pub fn add_value(&mut self, text: &str) -> Result<bool, PredictorError> {
        match self.series.push_text(text) {
            Ok(value) => {
                tracing::info!("Added {} to history ({} total)", value, self.series.len());
                writeln!(self.out, "Added {} to history", value)?;
                Ok(true)
            }
            Err(e) => {
                tracing::warn!("Rejected input: {}", e);
                writeln!(self.out, "Invalid number: '{}'", text.trim())?;
                Ok(false)
            }
        }
    }

    pub fn predict(&mut self, side: Side) -> Result<(), PredictorError> {
        let message = prediction_message(&self.current(), side);
        writeln!(self.out, "{}", message)?;
        Ok(())
    }

    pub fn handle(&mut self, command: Command) -> Result<Flow, PredictorError> {
        match command {
            Command::Add(text) => {
                if self.add_value(&text)? {
                    self.report()?;
                }
            }
            Command::Predict(side) => self.predict(side)?,
            Command::History => {
                writeln!(self.out, "Recent History (last {})", self.history_display)?;
                writeln!(
                    self.out,
                    "{}",
                    format_history(self.series.recent(self.history_display))
                )?;
            }
            Command::Report => self.report()?,
            Command::Help => {
                writeln!(self.out, "Commands:")?;
                writeln!(self.out, "  <number> | add <number>   append a multiplier")?;
                writeln!(self.out, "  predict above|under       show a prediction")?;
                writeln!(self.out, "  history                   show recent multipliers")?;
                writeln!(self.out, "  report                    re-run the estimate")?;
                writeln!(self.out, "  quit                      leave")?;
            }
            Command::Quit => return Ok(Flow::Stop),
            Command::Empty => {}
            Command::Unknown(line) => {
                writeln!(self.out, "Unknown command: '{}' (type 'help')", line)?;
            }
        }
        Ok(Flow::Continue)
    }

    /// Process commands line by line until `quit` or end of input.
    pub fn run<B: BufRead>(&mut self, input: B) -> Result<(), PredictorError> {
        for line in input.lines() {
            if self.handle(Command::parse(&line?))? == Flow::Stop {
                break;
            }
        }
        tracing::debug!("Session ended with {} observations", self.series.len());
        Ok(())
    }

    #[cfg(test)]
    pub fn into_parts(self) -> (ObservationSeries, R, W) {
        (self.series, self.reporter, self.out)
    }
}

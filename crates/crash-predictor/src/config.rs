use anyhow::{bail, Context, Result};
use multiplier_core::{Side, DEFAULT_THRESHOLD, DEFAULT_TREND_WINDOW};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictorConfig {
    pub threshold: f64,           // 2.0
    pub trend_window: usize,      // 5
    pub history_display: usize,   // 10 most recent values shown
    pub bar_width: usize,         // 40 cells
    pub output: OutputFormat,     // text | json
    pub log_json: bool,           // JSON log lines on stderr
}

impl Default for PredictorConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            trend_window: DEFAULT_TREND_WINDOW,
            history_display: 10,
            bar_width: 40,
            output: OutputFormat::Text,
            log_json: false,
        }
    }
}

impl PredictorConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup; unset or empty keys keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();

        let output = match get("PREDICTOR_OUTPUT").as_deref().map(str::trim) {
            None | Some("text") => OutputFormat::Text,
            Some("json") => OutputFormat::Json,
            Some(other) => bail!("PREDICTOR_OUTPUT must be 'text' or 'json', got '{}'", other),
        };

        let config = Self {
            threshold: match get("PREDICTOR_THRESHOLD") {
                Some(v) => v.trim().parse().context("PREDICTOR_THRESHOLD")?,
                None => defaults.threshold,
            },
            trend_window: match get("PREDICTOR_TREND_WINDOW") {
                Some(v) => v.trim().parse().context("PREDICTOR_TREND_WINDOW")?,
                None => defaults.trend_window,
            },
            history_display: match get("PREDICTOR_HISTORY_DISPLAY") {
                Some(v) => v.trim().parse().context("PREDICTOR_HISTORY_DISPLAY")?,
                None => defaults.history_display,
            },
            bar_width: match get("PREDICTOR_BAR_WIDTH") {
                Some(v) => v.trim().parse().context("PREDICTOR_BAR_WIDTH")?,
                None => defaults.bar_width,
            },
            output,
            log_json: match get("PREDICTOR_LOG_JSON") {
                Some(v) => v.trim().parse().context("PREDICTOR_LOG_JSON")?,
                None => defaults.log_json,
            },
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if !self.threshold.is_finite() {
            bail!("threshold must be a finite number");
        }
        if self.trend_window == 0 {
            bail!("trend window must be at least 1");
        }
        if self.history_display == 0 {
            bail!("history display must show at least 1 value");
        }
        if self.bar_width == 0 {
            bail!("bar width must be at least 1");
        }
        Ok(())
    }
}

/// Command-line flags. Anything given here overrides the environment.
#[derive(Debug, Clone, Default)]
pub struct CliArgs {
    pub csv: Option<PathBuf>,
    pub add: Vec<String>,
    pub threshold: Option<f64>,
    pub trend_window: Option<usize>,
    pub json: bool,
    pub predict: Option<Side>,
    pub interactive: bool,
    pub help: bool,
}

impl CliArgs {
    pub fn parse(args: &[String]) -> Result<Self> {
        let mut add = Vec::new();
        for (i, arg) in args.iter().enumerate() {
            if arg == "--add" {
                let value = args.get(i + 1).context("--add requires a value")?;
                add.push(value.clone());
            }
        }

        Ok(Self {
            csv: flag_value(args, "--csv")?.map(PathBuf::from),
            add,
            threshold: flag_value(args, "--threshold")?
                .map(|v| v.parse::<f64>())
                .transpose()
                .context("--threshold")?,
            trend_window: flag_value(args, "--trend-window")?
                .map(|v| v.parse::<usize>())
                .transpose()
                .context("--trend-window")?,
            json: args.iter().any(|a| a == "--json"),
            predict: flag_value(args, "--predict")?
                .map(|v| v.parse::<Side>())
                .transpose()?,
            interactive: args.iter().any(|a| a == "--interactive" || a == "-i"),
            help: args.iter().any(|a| a == "--help" || a == "-h"),
        })
    }

    pub fn apply(&self, config: &mut PredictorConfig) -> Result<()> {
        if let Some(threshold) = self.threshold {
            config.threshold = threshold;
        }
        if let Some(window) = self.trend_window {
            config.trend_window = window;
        }
        if self.json {
            config.output = OutputFormat::Json;
        }
        config.validate()
    }
}

/// Value following `flag`, if the flag is present at all.
fn flag_value<'a>(args: &'a [String], flag: &str) -> Result<Option<&'a String>> {
    match args.iter().position(|a| a == flag) {
        Some(i) => args
            .get(i + 1)
            .map(Some)
            .with_context(|| format!("{} requires a value", flag)),
        None => Ok(None),
    }
}

pub fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  crash-predictor [--csv PATH] [--add VALUE]... [options]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --csv PATH           Load history from a CSV with a 'multiplier' column");
    eprintln!("  --add VALUE          Append a multiplier (repeatable)");
    eprintln!("  --threshold X        Above/under cutoff (default: {})", DEFAULT_THRESHOLD);
    eprintln!(
        "  --trend-window N     Recent observations for the trend signal (default: {})",
        DEFAULT_TREND_WINDOW
    );
    eprintln!("  --predict above|under  Print a prediction message");
    eprintln!("  --json               Emit reports as JSON");
    eprintln!("  -i, --interactive    Read commands from stdin after loading");
}

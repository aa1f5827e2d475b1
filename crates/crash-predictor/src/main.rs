//! crash-predictor: terminal front end for the multiplier confidence estimator.
//!
//! Loads a history (CSV and/or manual values), prints the above/under
//! confidence with a risk label, and optionally keeps reading commands.
//!
//! Usage:
//!   cargo run -p crash-predictor -- --csv history.csv
//!   cargo run -p crash-predictor -- --add 1.87 --add 3.2 --predict above
//!   cargo run -p crash-predictor -- --csv history.csv --interactive

mod config;
mod report;
mod session;

use anyhow::{Context, Result};
use confidence_estimator::ConfidenceEstimator;
use multiplier_core::ConfidenceReporter;
use std::io;

use config::{CliArgs, OutputFormat, PredictorConfig};
use report::{JsonReporter, TextReporter};
use session::Session;

fn init_tracing(json: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        "crash_predictor=info,history_loader=info,confidence_estimator=warn".into()
    });

    if json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(io::stderr)
            .init();
    }
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let args: Vec<String> = std::env::args().collect();
    let cli = CliArgs::parse(&args)?;
    if cli.help {
        config::print_usage();
        return Ok(());
    }

    let mut config = PredictorConfig::from_env().context("Invalid predictor configuration")?;
    cli.apply(&mut config)?;
    init_tracing(config.log_json);

    let estimator = ConfidenceEstimator::new(config.threshold, config.trend_window)?;
    tracing::info!(
        "Estimator ready (threshold: {}, trend window: {})",
        estimator.threshold,
        estimator.trend_window
    );

    let reporter: Box<dyn ConfidenceReporter> = match config.output {
        OutputFormat::Text => Box::new(TextReporter::new(
            io::stdout(),
            config.history_display,
            config.bar_width,
        )),
        OutputFormat::Json => Box::new(JsonReporter::new(io::stdout(), config.history_display)),
    };

    // Status messages go to stderr in JSON mode so stdout stays machine-readable
    let messages: Box<dyn io::Write> = match config.output {
        OutputFormat::Text => Box::new(io::stdout()),
        OutputFormat::Json => Box::new(io::stderr()),
    };

    let mut session = Session::new(estimator, reporter, messages, config.history_display);

    if let Some(path) = &cli.csv {
        let series = history_loader::load_csv(path)
            .with_context(|| format!("Failed to load {}", path.display()))?;
        session.load_history(series)?;
    }

    for value in &cli.add {
        session.add_value(value)?;
    }

    session.report()?;

    if let Some(side) = cli.predict {
        session.predict(side)?;
    }

    if cli.interactive {
        tracing::info!("Interactive mode, type 'help' for commands");
        session.run(io::stdin().lock())?;
    }

    Ok(())
}

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PredictorError {
    #[error("Invalid number format: {0}")]
    InvalidNumberFormat(String),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Missing column: {0}")]
    MissingColumn(String),

    #[error("CSV error: {0}")]
    Csv(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Report error: {0}")]
    Report(String),
}

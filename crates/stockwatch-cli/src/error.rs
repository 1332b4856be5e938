use stockwatch_core::{ChartError, FetchError, MetricError, ValidationError};
use thiserror::Error;

/// CLI-level error categories mapped to exit codes.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Metric(#[from] MetricError),

    #[error(transparent)]
    Chart(#[from] ChartError),

    #[error(transparent)]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Command(String),
}

impl CliError {
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::Validation(_) => 2,
            Self::Fetch(FetchError::InvalidRange { .. })
            | Self::Fetch(FetchError::NoSymbols)
            | Self::Fetch(FetchError::Validation(_)) => 2,
            Self::Fetch(_) => 3,
            Self::Metric(_) | Self::Chart(_) => 4,
            Self::Serialization(_) | Self::Io(_) | Self::Command(_) => 10,
        }
    }
}

use pairlens_core::{AnalysisError, AnalysisErrorKind};
use thiserror::Error;

/// CLI-level error categories mapped to exit codes.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Analysis(#[from] AnalysisError),

    #[error("command error: {0}")]
    Command(String),

    #[error("chart rendering failed: {0}")]
    Chart(String),

    #[error(transparent)]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::Analysis(error) => match error.kind() {
                AnalysisErrorKind::Validation => 2,
                AnalysisErrorKind::DataUnavailable => 3,
                AnalysisErrorKind::InsufficientData => 4,
            },
            Self::Serialization(_) => 5,
            Self::Command(_) | Self::Chart(_) | Self::Io(_) => 10,
        }
    }
}

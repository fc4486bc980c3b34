//! Domain error types.
//!
//! The numeric core (indicators, classifier, simulator, metrics) never fails:
//! short histories and degenerate denominators resolve to documented neutral
//! values. Errors only arise at the edges: configuration, data and weight
//! sources, and analyses that cannot produce a meaningful neutral value.

/// Top-level error type for mtftrader.
#[derive(Debug, thiserror::Error)]
pub enum MtftraderError {
    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("data source error: {reason}")]
    DataSource { reason: String },

    #[error("weight source error: {reason}")]
    WeightSource { reason: String },

    #[error("insufficient history: have {bars} bars, need {minimum}")]
    InsufficientHistory { bars: usize, minimum: usize },

    #[error("report error: {reason}")]
    Report { reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&MtftraderError> for std::process::ExitCode {
    fn from(err: &MtftraderError) -> Self {
        let code: u8 = match err {
            MtftraderError::Io(_) => 1,
            MtftraderError::ConfigParse { .. } | MtftraderError::ConfigInvalid { .. } => 2,
            MtftraderError::DataSource { .. } => 3,
            MtftraderError::WeightSource { .. } => 4,
            MtftraderError::InsufficientHistory { .. } => 5,
            MtftraderError::Report { .. } => 6,
        };
        std::process::ExitCode::from(code)
    }
}

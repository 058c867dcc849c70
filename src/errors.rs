// =============================================================================
// Error taxonomy for the scanner
// =============================================================================
//
// Two layers:
//   - `IndicatorError` is raised by a single strategy while evaluating one
//     series.  The voting aggregator catches it and counts a false vote.
//   - `ScanError` is raised per ticker by the scan driver.  `DataUnavailable`
//     is expected and skips the ticker; `InvalidConfig` is a programming
//     error and stops the run.
// =============================================================================

use thiserror::Error;

/// Failure of a single strategy to produce a vote for a series.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum IndicatorError {
    /// The series is shorter than the strategy's minimum look-back.
    #[error("{strategy}: insufficient history, need at least {required} bars, got {available}")]
    InsufficientHistory {
        strategy: &'static str,
        required: usize,
        available: usize,
    },

    /// The maths is undefined for this input (flat RSI window, non-finite
    /// intermediate values).
    #[error("{strategy}: numeric degeneracy: {detail}")]
    NumericDegeneracy {
        strategy: &'static str,
        detail: String,
    },

    /// The strategy was constructed with parameters it cannot work with.
    #[error("{strategy}: invalid parameter: {message}")]
    InvalidParameter {
        strategy: &'static str,
        message: String,
    },

    /// The strategy panicked (index fault, failed assertion).
    #[error("{strategy}: panicked: {message}")]
    Panicked {
        strategy: &'static str,
        message: String,
    },
}

impl IndicatorError {
    pub fn insufficient(strategy: &'static str, required: usize, available: usize) -> Self {
        Self::InsufficientHistory {
            strategy,
            required,
            available,
        }
    }

    pub fn degenerate(strategy: &'static str, detail: impl Into<String>) -> Self {
        Self::NumericDegeneracy {
            strategy,
            detail: detail.into(),
        }
    }

    pub fn invalid_parameter(strategy: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidParameter {
            strategy,
            message: message.into(),
        }
    }

    /// Expected failures are a property of the data; everything else points
    /// at a bug or a misconfiguration.
    pub fn is_expected(&self) -> bool {
        matches!(
            self,
            Self::InsufficientHistory { .. } | Self::NumericDegeneracy { .. }
        )
    }

    /// Short machine-friendly label used in logs and JSON output.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InsufficientHistory { .. } => "InsufficientHistory",
            Self::NumericDegeneracy { .. } => "NumericDegeneracy",
            Self::InvalidParameter { .. } => "InvalidParameter",
            Self::Panicked { .. } => "Panicked",
        }
    }
}

/// Per-ticker failure seen by the scan driver.
#[derive(Error, Debug)]
pub enum ScanError {
    /// The provider could not produce a usable series (network failure,
    /// unknown or delisted symbol, empty or malformed response).
    #[error("data unavailable for {ticker}: {reason}")]
    DataUnavailable { ticker: String, reason: String },

    /// The scan was asked to run with a configuration it cannot honour.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl ScanError {
    pub fn data_unavailable(ticker: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::DataUnavailable {
            ticker: ticker.into(),
            reason: reason.into(),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::DataUnavailable { .. } => "DataUnavailable",
            Self::InvalidConfig(_) => "InvalidConfig",
        }
    }
}

//! Prediction outcomes and the per-request error taxonomy.

use thiserror::Error;

/// Why a single prediction request failed
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PredictError {
    /// A required form field was not submitted
    #[error("missing field '{0}'")]
    MissingField(&'static str),

    /// A form field was present but is not a number
    #[error("could not convert field '{field}' to float: '{value}'")]
    InvalidNumber { field: &'static str, value: String },

    /// The classifier rejected the input or returned nothing
    #[error("{0}")]
    ModelInvocation(String),
}

/// Coarse category of a [`PredictError`], used for logging and status mapping
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    MissingField,
    InvalidNumber,
    ModelInvocation,
}

impl ErrorKind {
    /// Whether the client sent bad input (as opposed to the model failing)
    pub fn is_input_error(&self) -> bool {
        matches!(self, ErrorKind::MissingField | ErrorKind::InvalidNumber)
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorKind::MissingField => write!(f, "missing_field"),
            ErrorKind::InvalidNumber => write!(f, "invalid_number"),
            ErrorKind::ModelInvocation => write!(f, "model_invocation"),
        }
    }
}

impl PredictError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            PredictError::MissingField(_) => ErrorKind::MissingField,
            PredictError::InvalidNumber { .. } => ErrorKind::InvalidNumber,
            PredictError::ModelInvocation(_) => ErrorKind::ModelInvocation,
        }
    }
}

/// Result of one pass through the prediction pipeline
#[derive(Debug, Clone, PartialEq)]
pub enum PredictionOutcome {
    Success { label: String },
    Failure { error: PredictError },
}

impl PredictionOutcome {
    /// Text shown in place of the crop name on the result page
    pub fn display_text(&self) -> String {
        match self {
            PredictionOutcome::Success { label } => label.clone(),
            PredictionOutcome::Failure { error } => format!("Error: {}", error),
        }
    }
}

impl From<Result<String, PredictError>> for PredictionOutcome {
    fn from(result: Result<String, PredictError>) -> Self {
        match result {
            Ok(label) => PredictionOutcome::Success { label },
            Err(error) => PredictionOutcome::Failure { error },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_text() {
        let ok = PredictionOutcome::Success { label: "rice".to_string() };
        assert_eq!(ok.display_text(), "rice");

        let missing = PredictionOutcome::Failure {
            error: PredictError::MissingField("rainfall"),
        };
        assert_eq!(missing.display_text(), "Error: missing field 'rainfall'");

        let invalid = PredictionOutcome::Failure {
            error: PredictError::InvalidNumber { field: "N", value: "abc".to_string() },
        };
        assert_eq!(
            invalid.display_text(),
            "Error: could not convert field 'N' to float: 'abc'"
        );
    }

    #[test]
    fn test_kinds() {
        assert!(PredictError::MissingField("K").kind().is_input_error());
        assert!(!PredictError::ModelInvocation("boom".to_string()).kind().is_input_error());
        assert_eq!(ErrorKind::InvalidNumber.to_string(), "invalid_number");
    }
}

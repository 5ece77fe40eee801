//! Prediction endpoint

use std::collections::HashMap;

use axum::{
    extract::{rejection::FormRejection, State},
    http::StatusCode,
    response::Html,
    Form,
};
use tracing::warn;

use crate::inference::PredictionOutcome;
use crate::pages::render_result;
use crate::state::SharedState;

/// Collapse submitted pairs into a map, keeping the first value for repeated keys
fn first_value_per_key(pairs: Vec<(String, String)>) -> HashMap<String, String> {
    let mut fields = HashMap::with_capacity(pairs.len());
    for (key, value) in pairs {
        fields.entry(key).or_insert(value);
    }
    fields
}

/// Status code for an outcome
///
/// Without strict mode every rendered page is a 200, errors included.
fn status_for(outcome: &PredictionOutcome, strict: bool) -> StatusCode {
    match outcome {
        PredictionOutcome::Success { .. } => StatusCode::OK,
        PredictionOutcome::Failure { .. } if !strict => StatusCode::OK,
        PredictionOutcome::Failure { error } if error.kind().is_input_error() => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
        PredictionOutcome::Failure { .. } => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// POST /predict - Predict a crop from the submitted measurements
pub async fn predict(
    State(state): State<SharedState>,
    form: Result<Form<Vec<(String, String)>>, FormRejection>,
) -> (StatusCode, Html<String>) {
    let pairs = match form {
        Ok(Form(pairs)) => pairs,
        Err(rejection) => {
            warn!("Unreadable form body, treating as empty: {}", rejection);
            Vec::new()
        }
    };

    let outcome = state.service.handle_predict(&first_value_per_key(pairs));
    let status = status_for(&outcome, state.config.strict_status);

    (status, Html(render_result(&outcome)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inference::PredictError;

    #[test]
    fn test_first_value_wins() {
        let fields = first_value_per_key(vec![
            ("N".to_string(), "90".to_string()),
            ("N".to_string(), "12".to_string()),
        ]);
        assert_eq!(fields["N"], "90");
    }

    #[test]
    fn test_status_mapping() {
        let ok = PredictionOutcome::Success { label: "rice".to_string() };
        let input = PredictionOutcome::Failure { error: PredictError::MissingField("N") };
        let model = PredictionOutcome::Failure {
            error: PredictError::ModelInvocation("boom".to_string()),
        };

        assert_eq!(status_for(&ok, false), StatusCode::OK);
        assert_eq!(status_for(&input, false), StatusCode::OK);
        assert_eq!(status_for(&model, false), StatusCode::OK);

        assert_eq!(status_for(&ok, true), StatusCode::OK);
        assert_eq!(status_for(&input, true), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(status_for(&model, true), StatusCode::INTERNAL_SERVER_ERROR);
    }
}

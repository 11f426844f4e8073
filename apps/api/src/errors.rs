use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::workflow::{GatewayError, GatewayErrorKind, WorkflowError};

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    /// The submitted resume failed schema validation.
    #[error("Resume is invalid: {}", .0.join(" "))]
    InvalidResume(Vec<String>),

    /// A workflow action was triggered without what it needs.
    #[error("{0}")]
    Precondition(String),

    #[error("{0}")]
    Conflict(String),

    #[error(transparent)]
    Gateway(GatewayError),

    /// The model answered with something that is not a valid resume.
    #[error("Model output is invalid: {}", .0.join(" "))]
    InvalidModelOutput(Vec<String>),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<WorkflowError> for AppError {
    fn from(err: WorkflowError) -> Self {
        match err {
            WorkflowError::AlreadyRunning | WorkflowError::NotRunning => {
                AppError::Conflict(err.to_string())
            }
            WorkflowError::MissingCredential(_)
            | WorkflowError::MissingInstructions(_)
            | WorkflowError::MissingResume(_)
            | WorkflowError::NothingToRevert => AppError::Precondition(err.to_string()),
            WorkflowError::InvalidResult(errors) => AppError::InvalidModelOutput(errors),
            WorkflowError::Gateway(e) => AppError::Gateway(e),
        }
    }
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) | AppError::InvalidResume(_) | AppError::Precondition(_) => {
                StatusCode::BAD_REQUEST
            }
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Gateway(e) => match e.kind {
                GatewayErrorKind::AuthFailure => StatusCode::UNAUTHORIZED,
                GatewayErrorKind::QuotaExceeded => StatusCode::TOO_MANY_REQUESTS,
                GatewayErrorKind::NetworkFailure => StatusCode::BAD_GATEWAY,
                GatewayErrorKind::ParseFailure | GatewayErrorKind::Unknown => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
            AppError::InvalidModelOutput(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let (code, message, details) = match &self {
            AppError::Validation(msg) => ("VALIDATION_ERROR", msg.clone(), None),
            AppError::InvalidResume(errors) => (
                "INVALID_RESUME",
                "The resume does not match the expected format.".to_string(),
                Some(errors.clone()),
            ),
            AppError::Precondition(msg) => ("PRECONDITION_FAILED", msg.clone(), None),
            AppError::Conflict(msg) => ("CONFLICT", msg.clone(), None),
            AppError::Gateway(e) => {
                tracing::error!("Model gateway error ({:?}): {}", e.kind, e.detail);
                let code = match e.kind {
                    GatewayErrorKind::AuthFailure => "AUTH_FAILURE",
                    GatewayErrorKind::QuotaExceeded => "QUOTA_EXCEEDED",
                    GatewayErrorKind::NetworkFailure => "NETWORK_FAILURE",
                    GatewayErrorKind::ParseFailure => "PARSE_FAILURE",
                    GatewayErrorKind::Unknown => "LLM_ERROR",
                };
                (code, e.kind.user_message().to_string(), None)
            }
            AppError::InvalidModelOutput(errors) => {
                tracing::error!("Model returned an invalid resume: {errors:?}");
                (
                    "INVALID_MODEL_OUTPUT",
                    WorkflowError::InvalidResult(errors.clone()).to_string(),
                    Some(errors.clone()),
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                    None,
                )
            }
        };

        let mut error = json!({
            "code": code,
            "message": message
        });
        if let Some(details) = details {
            error["details"] = json!(details);
        }

        (status, Json(json!({ "error": error }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflow::state::RequestKind;

    #[test]
    fn test_gateway_kinds_map_to_statuses() {
        let cases = [
            (GatewayErrorKind::AuthFailure, StatusCode::UNAUTHORIZED),
            (GatewayErrorKind::QuotaExceeded, StatusCode::TOO_MANY_REQUESTS),
            (GatewayErrorKind::NetworkFailure, StatusCode::BAD_GATEWAY),
            (
                GatewayErrorKind::ParseFailure,
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (GatewayErrorKind::Unknown, StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (kind, expected) in cases {
            let err = AppError::Gateway(GatewayError::new(kind, "detail"));
            assert_eq!(err.into_response().status(), expected, "{kind:?}");
        }
    }

    #[test]
    fn test_missing_credential_is_precondition() {
        let err: AppError = WorkflowError::MissingCredential(RequestKind::Optimize).into();
        assert!(matches!(err, AppError::Precondition(ref m) if m.contains("API key")));
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_already_running_is_conflict() {
        let err: AppError = WorkflowError::AlreadyRunning.into();
        assert_eq!(err.into_response().status(), StatusCode::CONFLICT);
    }

    #[test]
    fn test_invalid_result_is_server_error() {
        let err: AppError =
            WorkflowError::InvalidResult(vec!["basics.name is required.".to_string()]).into();
        assert!(matches!(err, AppError::InvalidModelOutput(_)));
        assert_eq!(
            err.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}

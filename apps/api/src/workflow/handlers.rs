//! Axum route handlers for the tailoring API.
//!
//! Every endpoint is stateless: the browser sends the documents it holds
//! (current resume and, after the first AI call, the baseline) and gets the
//! next workflow state back. The API key travels in `x-api-key`.

use axum::{
    extract::State,
    http::{header, HeaderMap},
    response::IntoResponse,
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;

use crate::diff::{diff_documents, label_changes, merge, LabeledChange, OptimizationMetadata};
use crate::errors::AppError;
use crate::models::ResumeDocument;
use crate::schema::{parse_resume_input, SchemaValidator, ValidationReport};
use crate::state::AppState;
use crate::workflow::{Status, TailoringSession, WorkflowState};

const API_KEY_HEADER: &str = "x-api-key";

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct OptimizeRequest {
    pub resume: ResumeDocument,
    #[serde(default)]
    pub baseline: Option<ResumeDocument>,
    pub job_description: String,
}

#[derive(Debug, Deserialize)]
pub struct AdjustRequest {
    pub resume: ResumeDocument,
    #[serde(default)]
    pub baseline: Option<ResumeDocument>,
    pub instructions: String,
}

#[derive(Debug, Deserialize)]
pub struct RevertRequest {
    pub resume: ResumeDocument,
    pub baseline: Option<ResumeDocument>,
}

/// Pasted or uploaded JSON text for a fresh session.
#[derive(Debug, Deserialize)]
pub struct LoadRequest {
    pub text: String,
}

#[derive(Debug, Deserialize)]
pub struct ConvertRequest {
    pub text: String,
}

#[derive(Debug, Deserialize)]
pub struct DiffRequest {
    pub before: ResumeDocument,
    pub after: ResumeDocument,
    #[serde(default)]
    pub metadata: Option<Value>,
}

/// Either a parsed document or raw pasted text.
#[derive(Debug, Deserialize)]
pub struct ValidateRequest {
    #[serde(default)]
    pub resume: Option<ResumeDocument>,
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ExportRequest {
    pub resume: ResumeDocument,
}

#[derive(Debug, Serialize)]
pub struct WorkflowResponse {
    pub status: Status,
    pub resume: Option<ResumeDocument>,
    pub baseline: Option<ResumeDocument>,
    pub diff: Vec<LabeledChange>,
    pub metadata: Option<OptimizationMetadata>,
}

impl From<WorkflowState> for WorkflowResponse {
    fn from(state: WorkflowState) -> Self {
        Self {
            status: state.status,
            diff: label_changes(&state.diff_items),
            resume: state.current,
            baseline: state.baseline,
            metadata: state.metadata,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DiffResponse {
    pub diff: Vec<LabeledChange>,
    pub metadata: Option<OptimizationMetadata>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/resume/load
///
/// Parses and validates pasted JSON, returning a fresh session around it.
pub async fn handle_load(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<LoadRequest>,
) -> Result<Json<WorkflowResponse>, AppError> {
    let document = parse_resume_input(&request.text, state.validator.as_ref())
        .map_err(AppError::InvalidResume)?;

    let mut session = open_session(&state, &headers, WorkflowState::new());
    session.load(document)?;

    info!(
        "Loaded resume for {}",
        session
            .state()
            .current
            .as_ref()
            .and_then(ResumeDocument::name)
            .unwrap_or("unnamed candidate")
    );

    Ok(Json(session.into_state().into()))
}

/// POST /api/v1/resume/optimize
///
/// Tailors the resume to a job description. The diff is always against the
/// baseline the client sends back (or the submitted resume on the first call).
pub async fn handle_optimize(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<OptimizeRequest>,
) -> Result<Json<WorkflowResponse>, AppError> {
    ensure_valid(state.validator.as_ref(), &request.resume)?;

    let mut session = open_session(
        &state,
        &headers,
        WorkflowState::rehydrate(request.resume, request.baseline),
    );
    session.optimize(&request.job_description).await?;

    Ok(Json(session.into_state().into()))
}

/// POST /api/v1/resume/adjust
///
/// Applies a free-text instruction. Repeated adjustments accumulate against
/// the same baseline.
pub async fn handle_adjust(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<AdjustRequest>,
) -> Result<Json<WorkflowResponse>, AppError> {
    ensure_valid(state.validator.as_ref(), &request.resume)?;

    let mut session = open_session(
        &state,
        &headers,
        WorkflowState::rehydrate(request.resume, request.baseline),
    );
    session.adjust(&request.instructions).await?;

    Ok(Json(session.into_state().into()))
}

/// POST /api/v1/resume/revert
///
/// Returns the baseline as the new current document, keeping the baseline.
pub async fn handle_revert(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<RevertRequest>,
) -> Result<Json<WorkflowResponse>, AppError> {
    let mut session = open_session(
        &state,
        &headers,
        WorkflowState::rehydrate(request.resume, request.baseline),
    );
    session.revert()?;

    Ok(Json(session.into_state().into()))
}

/// POST /api/v1/resume/convert
///
/// Turns plain resume text into a structured document, starting a new session.
pub async fn handle_convert(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<ConvertRequest>,
) -> Result<Json<WorkflowResponse>, AppError> {
    let mut session = open_session(&state, &headers, WorkflowState::new());
    session.convert(&request.text).await?;

    Ok(Json(session.into_state().into()))
}

/// POST /api/v1/resume/diff
///
/// Pure diff of two documents plus normalized metadata. No model call.
pub async fn handle_diff(Json(request): Json<DiffRequest>) -> Json<DiffResponse> {
    let changes = diff_documents(&request.before, &request.after);
    let metadata = merge(request.metadata.as_ref(), &changes, Utc::now());

    Json(DiffResponse {
        diff: label_changes(&changes),
        metadata,
    })
}

/// POST /api/v1/resume/validate
pub async fn handle_validate(
    State(state): State<AppState>,
    Json(request): Json<ValidateRequest>,
) -> Result<Json<ValidationReport>, AppError> {
    let report = match (request.resume, request.text) {
        (Some(resume), _) => state.validator.validate(&resume),
        (None, Some(text)) => match parse_resume_input(&text, state.validator.as_ref()) {
            Ok(_) => ValidationReport {
                is_valid: true,
                errors: vec![],
            },
            Err(errors) => ValidationReport {
                is_valid: false,
                errors,
            },
        },
        (None, None) => {
            return Err(AppError::Validation(
                "Provide either resume or text to validate".to_string(),
            ))
        }
    };

    Ok(Json(report))
}

/// POST /api/v1/resume/export
///
/// Raw JSON download of the document exactly as stored, pretty-printed.
pub async fn handle_export_json(
    Json(request): Json<ExportRequest>,
) -> Result<impl IntoResponse, AppError> {
    let body = request
        .resume
        .to_pretty_json()
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to serialize resume: {e}")))?;

    info!("Exporting resume JSON ({} bytes)", body.len());

    Ok((
        [
            (header::CONTENT_TYPE, "application/json"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"resume.json\"",
            ),
        ],
        body,
    ))
}

// ────────────────────────────────────────────────────────────────────────────
// Helpers
// ────────────────────────────────────────────────────────────────────────────

fn open_session(state: &AppState, headers: &HeaderMap, workflow: WorkflowState) -> TailoringSession {
    TailoringSession::new(
        workflow,
        state.gateway.clone(),
        state.validator.clone(),
        credential(headers, state.config.anthropic_api_key.as_deref()),
    )
}

/// The browser's key wins; the server-side key is only a fallback.
fn credential(headers: &HeaderMap, fallback: Option<&str>) -> Option<String> {
    headers
        .get(API_KEY_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .or(fallback)
        .map(str::to_string)
}

/// Rejects a malformed submitted resume before anything is sent to the model.
fn ensure_valid(validator: &dyn SchemaValidator, resume: &ResumeDocument) -> Result<(), AppError> {
    let report = validator.validate(resume);
    if report.is_valid {
        Ok(())
    } else {
        Err(AppError::InvalidResume(report.errors))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_header_credential_wins_over_fallback() {
        let mut headers = HeaderMap::new();
        headers.insert(API_KEY_HEADER, HeaderValue::from_static("sk-browser"));
        assert_eq!(
            credential(&headers, Some("sk-server")).as_deref(),
            Some("sk-browser")
        );
    }

    #[test]
    fn test_blank_header_falls_back() {
        let mut headers = HeaderMap::new();
        headers.insert(API_KEY_HEADER, HeaderValue::from_static("   "));
        assert_eq!(
            credential(&headers, Some("sk-server")).as_deref(),
            Some("sk-server")
        );
        assert!(credential(&HeaderMap::new(), None).is_none());
    }

    #[test]
    fn test_optimize_request_baseline_is_optional() {
        let request: OptimizeRequest = serde_json::from_value(serde_json::json!({
            "resume": {"basics": {"name": "A"}, "sections": {}},
            "job_description": "Rust"
        }))
        .unwrap();
        assert!(request.baseline.is_none());
    }
}

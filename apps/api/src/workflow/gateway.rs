//! Model gateway: the boundary between the workflow and the generative model.
//!
//! The workflow only sees `invoke(credential, resume, request)` returning a new
//! document (plus whatever metadata the model volunteered) or a classified
//! error. `LlmGateway` is the production backend; tests substitute fakes.

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

use crate::llm_client::prompts::{FIDELITY_INSTRUCTION, JSON_ONLY_SYSTEM};
use crate::llm_client::{LlmClient, LlmError};
use crate::models::ResumeDocument;
use crate::workflow::prompts::{
    ADJUST_PROMPT_TEMPLATE, CONVERT_PROMPT_TEMPLATE, OPTIMIZE_PROMPT_TEMPLATE, TAILOR_SYSTEM,
};
use crate::workflow::state::RequestKind;

/// Keys under which models wrap the rewritten resume, in lookup order.
const RESUME_WRAPPER_KEYS: &[&str] = &["resume", "optimizedResume", "optimized_resume"];

// ────────────────────────────────────────────────────────────────────────────
// Errors
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GatewayErrorKind {
    AuthFailure,
    QuotaExceeded,
    NetworkFailure,
    /// The model answered, but not with a usable resume document.
    ParseFailure,
    Unknown,
}

impl GatewayErrorKind {
    pub fn user_message(self) -> &'static str {
        match self {
            GatewayErrorKind::AuthFailure => {
                "The API key was rejected. Check your key in settings and try again."
            }
            GatewayErrorKind::QuotaExceeded => {
                "The model provider's rate limit or quota was reached. Wait a moment and try again."
            }
            GatewayErrorKind::NetworkFailure => {
                "Could not reach the model provider. Check your connection and try again."
            }
            GatewayErrorKind::ParseFailure => {
                "The AI response could not be read as a resume. Try again."
            }
            GatewayErrorKind::Unknown => "The AI request failed unexpectedly. Try again.",
        }
    }
}

/// Classified gateway failure. Displays as the user-facing message; `detail`
/// carries the upstream cause for logs.
#[derive(Debug, Clone, Error)]
#[error("{}", .kind.user_message())]
pub struct GatewayError {
    pub kind: GatewayErrorKind,
    pub detail: String,
}

impl GatewayError {
    pub fn new(kind: GatewayErrorKind, detail: impl Into<String>) -> Self {
        Self {
            kind,
            detail: detail.into(),
        }
    }
}

impl From<LlmError> for GatewayError {
    fn from(e: LlmError) -> Self {
        let kind = match &e {
            LlmError::Api { status: 401 | 403, .. } => GatewayErrorKind::AuthFailure,
            LlmError::Api { status: 429, .. } => GatewayErrorKind::QuotaExceeded,
            LlmError::Api { message, .. } if message.to_lowercase().contains("credit balance") => {
                GatewayErrorKind::QuotaExceeded
            }
            LlmError::Api { status, .. } if *status >= 500 => GatewayErrorKind::NetworkFailure,
            LlmError::Api { .. } => GatewayErrorKind::Unknown,
            LlmError::Http(err) if err.is_decode() => GatewayErrorKind::ParseFailure,
            LlmError::Http(_) => GatewayErrorKind::NetworkFailure,
            LlmError::Parse(_) | LlmError::EmptyContent => GatewayErrorKind::ParseFailure,
        };
        GatewayError::new(kind, e.to_string())
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Trait
// ────────────────────────────────────────────────────────────────────────────

/// What the model is asked to do. Optimize and Adjust rewrite an existing
/// document; Convert builds one from plain text.
#[derive(Debug, Clone, PartialEq)]
pub enum ModelRequest {
    Optimize { job_description: String },
    Adjust { instructions: String },
    Convert { text: String },
}

impl ModelRequest {
    pub fn kind(&self) -> RequestKind {
        match self {
            ModelRequest::Optimize { .. } => RequestKind::Optimize,
            ModelRequest::Adjust { .. } => RequestKind::Adjust,
            ModelRequest::Convert { .. } => RequestKind::Convert,
        }
    }

    pub fn instructions(&self) -> &str {
        match self {
            ModelRequest::Optimize { job_description } => job_description,
            ModelRequest::Adjust { instructions } => instructions,
            ModelRequest::Convert { text } => text,
        }
    }
}

#[derive(Debug, Clone)]
pub struct GatewayOutput {
    pub resume: ResumeDocument,
    /// Raw, unnormalized metadata as the model sent it.
    pub metadata: Option<Value>,
}

/// Carried in `AppState` as `Arc<dyn ModelGateway>`.
#[async_trait]
pub trait ModelGateway: Send + Sync {
    async fn invoke(
        &self,
        credential: &str,
        resume: Option<&ResumeDocument>,
        request: &ModelRequest,
    ) -> Result<GatewayOutput, GatewayError>;
}

// ────────────────────────────────────────────────────────────────────────────
// LlmGateway
// ────────────────────────────────────────────────────────────────────────────

pub struct LlmGateway {
    llm: LlmClient,
}

impl LlmGateway {
    pub fn new(llm: LlmClient) -> Self {
        Self { llm }
    }
}

#[async_trait]
impl ModelGateway for LlmGateway {
    async fn invoke(
        &self,
        credential: &str,
        resume: Option<&ResumeDocument>,
        request: &ModelRequest,
    ) -> Result<GatewayOutput, GatewayError> {
        let prompt = build_prompt(resume, request)?;
        let system = match request {
            ModelRequest::Convert { .. } => JSON_ONLY_SYSTEM,
            _ => TAILOR_SYSTEM,
        };

        let value: Value = self
            .llm
            .call_json(credential, &prompt, system)
            .await
            .map_err(|e| {
                let err = GatewayError::from(e);
                warn!("{:?} gateway call failed: {}", request.kind(), err.detail);
                err
            })?;

        let output = split_output(value)?;
        debug!(
            "{:?} gateway call returned a document (metadata: {})",
            request.kind(),
            output.metadata.is_some()
        );
        Ok(output)
    }
}

/// Fills the template for `request`. Optimize and Adjust need a resume.
pub fn build_prompt(
    resume: Option<&ResumeDocument>,
    request: &ModelRequest,
) -> Result<String, GatewayError> {
    let resume_json = || -> Result<String, GatewayError> {
        let resume = resume.ok_or_else(|| {
            GatewayError::new(GatewayErrorKind::Unknown, "no resume supplied for rewrite")
        })?;
        resume.to_pretty_json().map_err(|e| {
            GatewayError::new(
                GatewayErrorKind::Unknown,
                format!("failed to serialize resume: {e}"),
            )
        })
    };

    Ok(match request {
        ModelRequest::Optimize { job_description } => OPTIMIZE_PROMPT_TEMPLATE
            .replace("{fidelity_instruction}", FIDELITY_INSTRUCTION)
            .replace("{job_description}", job_description)
            .replace("{resume_json}", &resume_json()?),
        ModelRequest::Adjust { instructions } => ADJUST_PROMPT_TEMPLATE
            .replace("{fidelity_instruction}", FIDELITY_INSTRUCTION)
            .replace("{instructions}", instructions)
            .replace("{resume_json}", &resume_json()?),
        ModelRequest::Convert { text } => CONVERT_PROMPT_TEMPLATE.replace("{resume_text}", text),
    })
}

/// Separates the resume from the metadata in the model's answer.
///
/// Accepts either a wrapper object (`{"resume": {..}, "metadata": {..}}`) or
/// a bare resume, optionally with a top-level `metadata` member.
pub fn split_output(value: Value) -> Result<GatewayOutput, GatewayError> {
    let Value::Object(mut obj) = value else {
        return Err(GatewayError::new(
            GatewayErrorKind::ParseFailure,
            "model output is not a JSON object",
        ));
    };

    let metadata = obj.shift_remove("metadata");

    for key in RESUME_WRAPPER_KEYS {
        if let Some(Value::Object(_)) = obj.get(*key) {
            if let Some(resume) = obj.shift_remove(*key) {
                return Ok(GatewayOutput {
                    resume: ResumeDocument::new(resume),
                    metadata,
                });
            }
        }
    }

    Ok(GatewayOutput {
        resume: ResumeDocument::new(Value::Object(obj)),
        metadata,
    })
}

//! Optimization workflow state machine.
//!
//! `reduce(&state, action)` is pure: it never calls the model, never reads a clock,
//! and leaves the input state untouched on error. `session.rs` is the async
//! shell that performs the gateway call and feeds the outcome back in.
//!
//! ```text
//!            Begin                 Accept / Converted
//!   idle ───────────► running ─────────────────────► success
//!    ▲                   │ Fail                        │
//!    │ Reset / Load      ▼                             │ Begin
//!    └────────────── error ◄───────────────────────────┘
//! ```
//!
//! Invariants:
//! - `baseline` is captured on the first Optimize/Adjust after a Load and
//!   survives until the next Load/Reset. Revert does not clear it.
//! - Every diff is `diff(baseline, candidate)`, never against the previous `current`.
//! - Failed transitions leave `baseline` and `current` exactly as they were.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::diff::{self, ChangeRecord, OptimizationMetadata};
use crate::models::ResumeDocument;
use crate::workflow::gateway::GatewayError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    #[default]
    Idle,
    Running,
    Success,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestKind {
    /// Tailor the current resume to a job description.
    Optimize,
    /// Apply a free-text manual instruction to the current resume.
    Adjust,
    /// Build a structured resume from plain text.
    Convert,
}

impl RequestKind {
    fn action_phrase(self) -> &'static str {
        match self {
            RequestKind::Optimize => "run optimization",
            RequestKind::Adjust => "apply adjustments",
            RequestKind::Convert => "convert your resume",
        }
    }

    fn missing_input_message(self) -> &'static str {
        match self {
            RequestKind::Optimize => "Paste a job description to optimize against.",
            RequestKind::Adjust => "Describe the adjustment you want to apply.",
            RequestKind::Convert => "Paste your resume text to convert.",
        }
    }

    /// Convert builds a fresh document; the other kinds rewrite `current`.
    fn rewrites_current(self) -> bool {
        !matches!(self, RequestKind::Convert)
    }
}

#[derive(Debug, Error)]
pub enum WorkflowError {
    #[error("Add your API key to {}.", .0.action_phrase())]
    MissingCredential(RequestKind),

    #[error("{}", .0.missing_input_message())]
    MissingInstructions(RequestKind),

    #[error("Load a resume to {}.", .0.action_phrase())]
    MissingResume(RequestKind),

    #[error("A request is already in progress. Wait for it to finish.")]
    AlreadyRunning,

    #[error("No request is in progress.")]
    NotRunning,

    #[error("There is no original resume to revert to.")]
    NothingToRevert,

    #[error("The AI response did not match the resume format: {}", .0.join(" "))]
    InvalidResult(Vec<String>),

    #[error(transparent)]
    Gateway(#[from] GatewayError),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct WorkflowState {
    pub baseline: Option<ResumeDocument>,
    pub current: Option<ResumeDocument>,
    pub status: Status,
    pub last_error: Option<String>,
    pub diff_items: Vec<ChangeRecord>,
    pub metadata: Option<OptimizationMetadata>,
}

impl WorkflowState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fresh session around a newly loaded document.
    pub fn loaded(document: ResumeDocument) -> Self {
        Self {
            current: Some(document),
            ..Self::default()
        }
    }

    /// Rebuilds a resting state from documents the client kept.
    ///
    /// The baseline is never persisted server-side; a client that sends none
    /// starts a new session relative to `current`.
    pub fn rehydrate(current: ResumeDocument, baseline: Option<ResumeDocument>) -> Self {
        Self {
            baseline,
            current: Some(current),
            ..Self::default()
        }
    }

    pub fn is_running(&self) -> bool {
        self.status == Status::Running
    }
}

#[derive(Debug, Clone)]
pub enum Action {
    /// New resume loaded (paste, upload, sample). Resets the session.
    Load(ResumeDocument),
    /// Explicit start-over.
    Reset,
    Begin {
        kind: RequestKind,
        instructions: String,
        has_credential: bool,
    },
    /// Gateway returned a document that already passed validation.
    Accept {
        candidate: ResumeDocument,
        model_metadata: Option<Value>,
        now: DateTime<Utc>,
    },
    /// Text conversion succeeded; the result starts a new session.
    Converted(ResumeDocument),
    Fail(String),
    Revert,
}

pub fn reduce(state: &WorkflowState, action: Action) -> Result<WorkflowState, WorkflowError> {
    match action {
        Action::Load(document) => Ok(WorkflowState::loaded(document)),

        Action::Reset => Ok(WorkflowState::new()),

        Action::Begin {
            kind,
            instructions,
            has_credential,
        } => {
            if state.is_running() {
                return Err(WorkflowError::AlreadyRunning);
            }
            if !has_credential {
                return Err(WorkflowError::MissingCredential(kind));
            }
            if kind.rewrites_current() && state.current.is_none() {
                return Err(WorkflowError::MissingResume(kind));
            }
            if instructions.trim().is_empty() {
                return Err(WorkflowError::MissingInstructions(kind));
            }

            let mut next = state.clone();
            if kind.rewrites_current() && next.baseline.is_none() {
                next.baseline = next.current.clone();
            }
            next.status = Status::Running;
            next.last_error = None;
            Ok(next)
        }

        Action::Accept {
            candidate,
            model_metadata,
            now,
        } => {
            if !state.is_running() {
                return Err(WorkflowError::NotRunning);
            }
            let diff_items = diff::diff(
                state.baseline.as_ref().map(ResumeDocument::as_value),
                Some(candidate.as_value()),
            );
            let metadata = diff::merge(model_metadata.as_ref(), &diff_items, now);

            Ok(WorkflowState {
                baseline: state.baseline.clone(),
                current: Some(candidate),
                status: Status::Success,
                last_error: None,
                diff_items,
                metadata,
            })
        }

        Action::Converted(document) => {
            if !state.is_running() {
                return Err(WorkflowError::NotRunning);
            }
            Ok(WorkflowState {
                status: Status::Success,
                ..WorkflowState::loaded(document)
            })
        }

        Action::Fail(message) => {
            if !state.is_running() {
                return Err(WorkflowError::NotRunning);
            }
            let mut next = state.clone();
            next.status = Status::Error;
            next.last_error = Some(message);
            Ok(next)
        }

        Action::Revert => {
            if state.is_running() {
                return Err(WorkflowError::AlreadyRunning);
            }
            let Some(baseline) = &state.baseline else {
                return Err(WorkflowError::NothingToRevert);
            };
            Ok(WorkflowState {
                baseline: Some(baseline.clone()),
                current: Some(baseline.clone()),
                status: Status::Idle,
                last_error: None,
                diff_items: Vec::new(),
                metadata: None,
            })
        }
    }
}

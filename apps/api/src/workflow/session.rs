//! Tailoring session: the imperative shell around the workflow reducer.
//!
//! Flow for optimize/adjust:
//!   Begin (preconditions, baseline snapshot) → gateway.invoke → validator →
//!   Accept (diff against baseline + metadata merge) | Fail
//!
//! Every failure is written to the state (`status = error`, `last_error`) and
//! also returned, so callers always know a request did not land.

use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};

use crate::models::ResumeDocument;
use crate::schema::SchemaValidator;
use crate::workflow::gateway::{ModelGateway, ModelRequest};
use crate::workflow::state::{reduce, Action, WorkflowError, WorkflowState};

pub struct TailoringSession {
    state: WorkflowState,
    gateway: Arc<dyn ModelGateway>,
    validator: Arc<dyn SchemaValidator>,
    credential: Option<String>,
}

impl TailoringSession {
    pub fn new(
        state: WorkflowState,
        gateway: Arc<dyn ModelGateway>,
        validator: Arc<dyn SchemaValidator>,
        credential: Option<String>,
    ) -> Self {
        Self {
            state,
            gateway,
            validator,
            credential: credential.filter(|c| !c.trim().is_empty()),
        }
    }

    /// Read-only view; mutation only happens through the transition methods.
    pub fn state(&self) -> &WorkflowState {
        &self.state
    }

    pub fn into_state(self) -> WorkflowState {
        self.state
    }

    /// Starts a new session around `document`. Always resets first, so the
    /// next optimize or adjust captures a fresh baseline.
    pub fn load(&mut self, document: ResumeDocument) -> Result<(), WorkflowError> {
        self.reset()?;
        self.state = reduce(&self.state, Action::Load(document))?;
        info!("Resume loaded");
        Ok(())
    }

    pub fn reset(&mut self) -> Result<(), WorkflowError> {
        self.state = reduce(&self.state, Action::Reset)?;
        info!("Session reset");
        Ok(())
    }

    pub fn revert(&mut self) -> Result<(), WorkflowError> {
        self.state = reduce(&self.state, Action::Revert)?;
        info!("Reverted to baseline");
        Ok(())
    }

    pub async fn optimize(&mut self, job_description: &str) -> Result<(), WorkflowError> {
        self.rewrite(ModelRequest::Optimize {
            job_description: job_description.to_string(),
        })
        .await
    }

    pub async fn adjust(&mut self, instructions: &str) -> Result<(), WorkflowError> {
        self.rewrite(ModelRequest::Adjust {
            instructions: instructions.to_string(),
        })
        .await
    }

    /// Converts plain resume text; on success the result becomes a fresh session.
    pub async fn convert(&mut self, text: &str) -> Result<(), WorkflowError> {
        let request = ModelRequest::Convert {
            text: text.to_string(),
        };
        let credential = self.begin(&request)?;

        let output = match self.gateway.invoke(&credential, None, &request).await {
            Ok(output) => output,
            Err(e) => return Err(self.fail(e.into())),
        };

        let report = self.validator.validate(&output.resume);
        if !report.is_valid {
            return Err(self.fail(WorkflowError::InvalidResult(report.errors)));
        }

        self.state = reduce(&self.state, Action::Converted(output.resume))?;
        info!("Converted plain text into a structured resume");
        Ok(())
    }

    async fn rewrite(&mut self, request: ModelRequest) -> Result<(), WorkflowError> {
        let credential = self.begin(&request)?;

        let result = self
            .gateway
            .invoke(&credential, self.state.current.as_ref(), &request)
            .await;
        let output = match result {
            Ok(output) => output,
            Err(e) => return Err(self.fail(e.into())),
        };

        let report = self.validator.validate(&output.resume);
        if !report.is_valid {
            return Err(self.fail(WorkflowError::InvalidResult(report.errors)));
        }

        self.state = reduce(
            &self.state,
            Action::Accept {
                candidate: output.resume,
                model_metadata: output.metadata,
                now: Utc::now(),
            },
        )?;
        info!(
            "{:?} succeeded: {} changes against baseline",
            request.kind(),
            self.state.diff_items.len()
        );
        Ok(())
    }

    /// Runs the Begin transition and hands back the credential to call with.
    fn begin(&mut self, request: &ModelRequest) -> Result<String, WorkflowError> {
        self.state = reduce(
            &self.state,
            Action::Begin {
                kind: request.kind(),
                instructions: request.instructions().to_string(),
                has_credential: self.credential.is_some(),
            },
        )?;
        info!("{:?} request started", request.kind());
        Ok(self.credential.clone().unwrap_or_default())
    }

    /// Moves to `error`, recording the message, and returns the error for the caller.
    fn fail(&mut self, error: WorkflowError) -> WorkflowError {
        warn!("Workflow request failed: {error}");
        match reduce(&self.state, Action::Fail(error.to_string())) {
            Ok(next) => self.state = next,
            Err(e) => warn!("Could not record failure: {e}"),
        }
        error
    }
}

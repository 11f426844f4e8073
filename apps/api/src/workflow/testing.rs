//! Test doubles for the model gateway.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::Value;

use crate::models::ResumeDocument;
use crate::workflow::gateway::{
    GatewayError, GatewayErrorKind, GatewayOutput, ModelGateway, ModelRequest,
};

/// Replays canned results in order and records every call it receives.
pub struct FakeGateway {
    results: Mutex<VecDeque<Result<GatewayOutput, GatewayError>>>,
    pub seen_resumes: Mutex<Vec<Option<ResumeDocument>>>,
    pub seen_credentials: Mutex<Vec<String>>,
}

impl FakeGateway {
    pub fn new(results: Vec<Result<GatewayOutput, GatewayError>>) -> Arc<Self> {
        Arc::new(Self {
            results: Mutex::new(results.into()),
            seen_resumes: Mutex::new(Vec::new()),
            seen_credentials: Mutex::new(Vec::new()),
        })
    }

    pub fn call_count(&self) -> usize {
        self.seen_resumes.lock().unwrap().len()
    }
}

pub fn ok(resume: ResumeDocument, metadata: Option<Value>) -> Result<GatewayOutput, GatewayError> {
    Ok(GatewayOutput { resume, metadata })
}

#[async_trait]
impl ModelGateway for FakeGateway {
    async fn invoke(
        &self,
        credential: &str,
        resume: Option<&ResumeDocument>,
        _request: &ModelRequest,
    ) -> Result<GatewayOutput, GatewayError> {
        self.seen_resumes.lock().unwrap().push(resume.cloned());
        self.seen_credentials
            .lock()
            .unwrap()
            .push(credential.to_string());
        self.results
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(GatewayError::new(GatewayErrorKind::Unknown, "exhausted")))
    }
}

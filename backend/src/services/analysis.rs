//! Body analysis workflow
//!
//! Sends the profile and photo to the vision model and retries until the
//! completion follows the required layout or the attempts run out.
//! Attempts are strictly sequential and reuse the same instruction and image.
//!
//! Only one run per session key may be in flight. The marker is a
//! [`RunGuard`] shared between the run future and its current attempt task.
//! Dropping the run aborts that task, and the key is released only once
//! both are gone, so a cancelled run never overlaps the next one.

use crate::vision::{VisionError, VisionModel};
use aquafit_shared::validation::get_missing_fields_labels;
use aquafit_shared::{
    parse_analysis_response, AnalysisRequest, AnalysisResult, BmiResult, ImageAsset, LayoutError,
    ParsedAnalysis, ProfileInput,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};
use thiserror::Error;
use tokio::task::JoinHandle;
use tracing::{error, info, instrument, warn, Span};
use uuid::Uuid;

// ============================================================================
// Inputs and outputs
// ============================================================================

/// What the caller has gathered so far
///
/// BMI and image are optional here because the dashboard allows submitting
/// before either exists; [`AnalysisWorkflow::run`] rejects that without
/// calling the model.
#[derive(Debug, Clone)]
pub struct AnalysisInput {
    pub profile: ProfileInput,
    pub bmi: Option<BmiResult>,
    pub image: Option<ImageAsset>,
}

impl AnalysisInput {
    fn into_request(self) -> Result<AnalysisRequest, AnalysisError> {
        match (self.bmi, self.image) {
            (Some(bmi), Some(image)) => Ok(AnalysisRequest::new(self.profile, bmi, image)),
            (bmi, image) => {
                let mut missing = Vec::new();
                if bmi.is_none() {
                    missing.push("bmi");
                }
                if image.is_none() {
                    missing.push("image");
                }
                Err(AnalysisError::Incomplete {
                    missing: get_missing_fields_labels(&missing),
                })
            }
        }
    }
}

/// Successful run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub run_id: Uuid,
    pub attempts: u32,
    pub completed_at: DateTime<Utc>,
    pub result: AnalysisResult,
}

// ============================================================================
// Attempt state machine
// ============================================================================

/// Why a single attempt did not produce a result
#[derive(Debug, Clone, PartialEq)]
pub enum AttemptFailure {
    Service(VisionError),
    Malformed(LayoutError),
}

impl fmt::Display for AttemptFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttemptFailure::Service(err) => write!(f, "service failure: {}", err),
            AttemptFailure::Malformed(err) => write!(f, "malformed response: {}", err),
        }
    }
}

/// Result of one request/response cycle
#[derive(Debug, Clone, PartialEq)]
pub enum AttemptOutcome {
    Conforming(ParsedAnalysis),
    Failed(AttemptFailure),
}

impl AttemptOutcome {
    /// Classify a model reply
    pub fn from_completion(completion: Result<String, VisionError>) -> Self {
        match completion {
            Ok(text) => match parse_analysis_response(&text) {
                Ok(parsed) => AttemptOutcome::Conforming(parsed),
                Err(err) => AttemptOutcome::Failed(AttemptFailure::Malformed(err)),
            },
            Err(err) => AttemptOutcome::Failed(AttemptFailure::Service(err)),
        }
    }

    fn metric_label(&self) -> &'static str {
        match self {
            AttemptOutcome::Conforming(_) => "conforming",
            AttemptOutcome::Failed(AttemptFailure::Service(_)) => "service_failure",
            AttemptOutcome::Failed(AttemptFailure::Malformed(_)) => "malformed",
        }
    }
}

/// What the loop does next
#[derive(Debug, Clone, PartialEq)]
pub enum Transition {
    Retry,
    Complete(ParsedAnalysis),
    Exhausted,
}

/// Tallies for one run
#[derive(Debug, Clone, PartialEq)]
pub struct WorkflowState {
    pub max_attempts: u32,
    pub attempts_made: u32,
    pub service_failures: u32,
    pub malformed_responses: u32,
    pub last_failure: Option<AttemptFailure>,
}

impl WorkflowState {
    pub fn new(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            attempts_made: 0,
            service_failures: 0,
            malformed_responses: 0,
            last_failure: None,
        }
    }

    /// Fold one attempt outcome into the state
    pub fn advance(mut self, outcome: AttemptOutcome) -> (Self, Transition) {
        self.attempts_made += 1;
        match outcome {
            AttemptOutcome::Conforming(parsed) => (self, Transition::Complete(parsed)),
            AttemptOutcome::Failed(failure) => {
                match failure {
                    AttemptFailure::Service(_) => self.service_failures += 1,
                    AttemptFailure::Malformed(_) => self.malformed_responses += 1,
                }
                self.last_failure = Some(failure);
                let next = if self.attempts_made >= self.max_attempts {
                    Transition::Exhausted
                } else {
                    Transition::Retry
                };
                (self, next)
            }
        }
    }

    fn into_exhausted(self) -> AnalysisError {
        AnalysisError::Exhausted {
            attempts: self.attempts_made,
            service_failures: self.service_failures,
            malformed_responses: self.malformed_responses,
            last_failure: self
                .last_failure
                .map(|f| f.to_string())
                .unwrap_or_default(),
        }
    }
}

// ============================================================================
// Errors
// ============================================================================

/// Terminal failure of a run
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnalysisError {
    #[error("Analysis needs: {}", .missing.join(", "))]
    Incomplete { missing: Vec<String> },

    #[error("An analysis is already running for this session")]
    AlreadyRunning,

    #[error(
        "Analysis failed after {attempts} attempts \
         ({service_failures} service failures, {malformed_responses} malformed responses)"
    )]
    Exhausted {
        attempts: u32,
        service_failures: u32,
        malformed_responses: u32,
        last_failure: String,
    },

    #[error("Analysis stopped unexpectedly: {0}")]
    Unexpected(String),
}

// ============================================================================
// Run guard
// ============================================================================

/// Session keys with a run in flight
#[derive(Debug, Clone, Default)]
pub struct RunRegistry {
    active: Arc<Mutex<HashSet<String>>>,
}

impl RunRegistry {
    /// Mark `key` as running, or fail if it already is
    pub fn try_acquire(&self, key: &str) -> Result<RunGuard, AnalysisError> {
        let mut active = self.active.lock().unwrap_or_else(PoisonError::into_inner);
        if !active.insert(key.to_string()) {
            return Err(AnalysisError::AlreadyRunning);
        }
        Ok(RunGuard {
            registry: self.clone(),
            key: key.to_string(),
        })
    }

    pub fn is_active(&self, key: &str) -> bool {
        self.active
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(key)
    }
}

/// In-flight marker for one session key
#[derive(Debug)]
pub struct RunGuard {
    registry: RunRegistry,
    key: String,
}

impl Drop for RunGuard {
    fn drop(&mut self) {
        self.registry
            .active
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&self.key);
    }
}

// ============================================================================
// Workflow
// ============================================================================

/// Bounded retry loop around a [`VisionModel`]
pub struct AnalysisWorkflow {
    model: Arc<dyn VisionModel>,
    max_attempts: u32,
    runs: RunRegistry,
}

impl AnalysisWorkflow {
    pub fn new(model: Arc<dyn VisionModel>, max_attempts: u32) -> Self {
        Self {
            model,
            max_attempts: max_attempts.max(1),
            runs: RunRegistry::default(),
        }
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub fn runs(&self) -> &RunRegistry {
        &self.runs
    }

    /// Run the analysis for one session
    #[instrument(
        name = "analysis_run",
        skip(self, input),
        fields(run_id = tracing::field::Empty, model = %self.model.model_name())
    )]
    pub async fn run(
        &self,
        session_key: &str,
        input: AnalysisInput,
    ) -> Result<AnalysisReport, AnalysisError> {
        let request = input.into_request().map_err(|err| {
            record_run("incomplete");
            err
        })?;
        let guard = Arc::new(self.runs.try_acquire(session_key).map_err(|err| {
            record_run("already_running");
            err
        })?);

        let run_id = Uuid::new_v4();
        Span::current().record("run_id", tracing::field::display(run_id));

        let targets = request.targets();
        let instruction: Arc<str> = Arc::from(request.instruction());
        let image = Arc::new(request.image);
        let mut state = WorkflowState::new(self.max_attempts);

        loop {
            let attempt = state.attempts_made + 1;
            let outcome = self
                .attempt(Arc::clone(&guard), Arc::clone(&instruction), Arc::clone(&image))
                .await?;
            metrics::counter!("aquafit_analysis_attempts_total", "outcome" => outcome.metric_label())
                .increment(1);

            let (next, transition) = state.advance(outcome);
            state = next;

            match transition {
                Transition::Complete(parsed) => {
                    info!(attempt, "Analysis completed");
                    record_run("success");
                    return Ok(AnalysisReport {
                        run_id,
                        attempts: state.attempts_made,
                        completed_at: Utc::now(),
                        result: parsed.into_result(targets),
                    });
                }
                Transition::Retry => {
                    if let Some(failure) = &state.last_failure {
                        warn!(attempt, max_attempts = state.max_attempts, %failure, "Analysis attempt failed, retrying");
                    }
                }
                Transition::Exhausted => {
                    let err = state.into_exhausted();
                    error!(error = %err, "Analysis attempts exhausted");
                    record_run("exhausted");
                    return Err(err);
                }
            }
        }
    }

    /// One request/response cycle on its own task
    ///
    /// A panic inside the model surfaces here as a join error. The task holds
    /// a share of the run guard until it ends.
    async fn attempt(
        &self,
        guard: Arc<RunGuard>,
        instruction: Arc<str>,
        image: Arc<ImageAsset>,
    ) -> Result<AttemptOutcome, AnalysisError> {
        let model = Arc::clone(&self.model);
        let mut task = AbortOnDrop(tokio::spawn(async move {
            let _guard = guard;
            AttemptOutcome::from_completion(model.complete(&instruction, &image).await)
        }));

        (&mut task.0).await.map_err(|join_err| {
            error!(error = %join_err, "Analysis attempt aborted");
            record_run("unexpected");
            let reason = if join_err.is_panic() {
                "attempt panicked"
            } else {
                "attempt was cancelled"
            };
            AnalysisError::Unexpected(reason.to_string())
        })
    }
}

/// Cancels the attempt task when the awaiting run is dropped
struct AbortOnDrop<T>(JoinHandle<T>);

impl<T> Drop for AbortOnDrop<T> {
    fn drop(&mut self) {
        self.0.abort();
    }
}

fn record_run(outcome: &'static str) {
    metrics::counter!("aquafit_analysis_runs_total", "outcome" => outcome).increment(1);
}

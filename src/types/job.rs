//! Job request/response types shared by every operation.

use crate::catalog::{categorize, default_input};
use crate::config::PollConfig;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Remote job status as reported by the job endpoints.
///
/// `IN_QUEUE` is accepted as an alias of `QUEUED`. The remote's own terminal
/// failure states (`CANCELLED`, `TIMED_OUT`) collapse into [`JobStatus::Failed`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum JobStatus {
    #[serde(rename = "QUEUED", alias = "IN_QUEUE")]
    Queued,
    #[serde(rename = "IN_PROGRESS")]
    InProgress,
    #[serde(rename = "COMPLETED")]
    Completed,
    #[serde(rename = "FAILED", alias = "CANCELLED", alias = "TIMED_OUT")]
    Failed,
}

impl JobStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Queued => "QUEUED",
            Self::InProgress => "IN_PROGRESS",
            Self::Completed => "COMPLETED",
            Self::Failed => "FAILED",
        }
    }

    /// No further transition happens after a terminal status.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Uniform result of the run, runsync and status endpoints.
///
/// Field names follow the wire format, so a result serializes back to the
/// object the remote returned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobResult {
    pub id: String,
    pub status: JobStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<Value>,
    #[serde(
        rename = "executionTime",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub execution_time_ms: Option<u64>,
    #[serde(rename = "delayTime", default, skip_serializing_if = "Option::is_none")]
    pub delay_time_ms: Option<u64>,
    #[serde(rename = "workerId", default, skip_serializing_if = "Option::is_none")]
    pub worker_id: Option<String>,
    /// Remote-reported failure detail, only meaningful for failed jobs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<Value>,
}

impl JobResult {
    /// Enforce `output` only on completed jobs.
    ///
    /// Failed jobs that report their reason in `output` keep it as `error`.
    pub(crate) fn normalized(mut self) -> Self {
        if self.status != JobStatus::Completed {
            let output = self.output.take();
            if self.status == JobStatus::Failed && self.error.is_none() {
                self.error = output;
            }
        }
        self
    }

    /// Best human-readable failure message for this result.
    pub fn error_message(&self) -> String {
        match &self.error {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Object(map)) => map
                .get("message")
                .and_then(Value::as_str)
                .map(str::to_string)
                .unwrap_or_else(|| Value::Object(map.clone()).to_string()),
            Some(other) => other.to_string(),
            None => format!("job {} reported status {}", self.id, self.status),
        }
    }
}

/// How a job with an input payload is run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    Sync,
    AsyncWait,
    AsyncNoWait,
}

/// Operation selected for one request.
///
/// Carrying the payload inside the variant makes "job id iff status check,
/// input iff not" a property of the type.
#[derive(Debug, Clone, PartialEq)]
pub enum Operation {
    /// Block on `runsync` until the remote answers
    Sync { input: Value },
    /// Submit via `run` and poll until terminal or timeout
    AsyncWait { input: Value },
    /// Submit via `run` and return the queued job
    AsyncNoWait { input: Value },
    /// Single status lookup of an existing job
    StatusCheck { job_id: String },
}

impl Operation {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Sync { .. } => "sync",
            Self::AsyncWait { .. } => "async_wait",
            Self::AsyncNoWait { .. } => "async_no_wait",
            Self::StatusCheck { .. } => "status_check",
        }
    }

    pub fn input(&self) -> Option<&Value> {
        match self {
            Self::Sync { input } | Self::AsyncWait { input } | Self::AsyncNoWait { input } => {
                Some(input)
            }
            Self::StatusCheck { .. } => None,
        }
    }

    pub fn job_id(&self) -> Option<&str> {
        match self {
            Self::StatusCheck { job_id } => Some(job_id),
            _ => None,
        }
    }
}

/// A single invocation against one endpoint. Immutable once built.
///
/// A request without its own polling budget uses the executing client's.
#[derive(Debug, Clone, PartialEq)]
pub struct JobRequest {
    model_id: String,
    operation: Operation,
    poll: Option<PollConfig>,
}

impl JobRequest {
    pub fn new(model_id: impl Into<String>, operation: Operation) -> Self {
        Self {
            model_id: model_id.into(),
            operation,
            poll: None,
        }
    }

    pub fn sync(model_id: impl Into<String>, input: Value) -> Self {
        Self::new(model_id, Operation::Sync { input })
    }

    pub fn run_and_wait(model_id: impl Into<String>, input: Value) -> Self {
        Self::new(model_id, Operation::AsyncWait { input })
    }

    pub fn submit(model_id: impl Into<String>, input: Value) -> Self {
        Self::new(model_id, Operation::AsyncNoWait { input })
    }

    pub fn status(model_id: impl Into<String>, job_id: impl Into<String>) -> Self {
        Self::new(
            model_id,
            Operation::StatusCheck {
                job_id: job_id.into(),
            },
        )
    }

    /// Build a request whose input is the template for the model's category.
    pub fn with_default_input(model_id: impl Into<String>, mode: RunMode) -> Self {
        let model_id = model_id.into();
        let input = default_input(categorize(&model_id));
        let operation = match mode {
            RunMode::Sync => Operation::Sync { input },
            RunMode::AsyncWait => Operation::AsyncWait { input },
            RunMode::AsyncNoWait => Operation::AsyncNoWait { input },
        };
        Self::new(model_id, operation)
    }

    pub fn with_poll_config(mut self, poll: PollConfig) -> Self {
        self.poll = Some(poll);
        self
    }

    pub fn model_id(&self) -> &str {
        &self.model_id
    }

    pub fn operation(&self) -> &Operation {
        &self.operation
    }

    pub fn poll(&self) -> Option<&PollConfig> {
        self.poll.as_ref()
    }
}

//! Remote job API contract.

use crate::types::{JobResult, ModelDescriptor};
use crate::Result;
use async_trait::async_trait;
use serde_json::Value;

/// The four remote operations the runtime is built on.
///
/// Each method performs exactly one outbound call, never retries, and
/// reports failures as classified [`crate::Error`]s.
#[async_trait]
pub trait JobApi: Send + Sync {
    /// Run a job and block until the remote returns its result.
    ///
    /// A `FAILED` result is reported as `RemoteFailure`.
    async fn run_sync(&self, model_id: &str, input: &Value) -> Result<JobResult>;

    /// Submit a job without waiting; the result is normally `QUEUED`.
    async fn run_async(&self, model_id: &str, input: &Value) -> Result<JobResult>;

    /// Look up the current status of a job.
    async fn get_status(&self, model_id: &str, job_id: &str) -> Result<JobResult>;

    /// Query the model registry.
    async fn list_models(&self) -> Result<Vec<ModelDescriptor>>;
}

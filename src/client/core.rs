use crate::catalog::{CatalogSnapshot, ModelCatalog};
use crate::client::executor::JobExecutor;
use crate::config::PollConfig;
use crate::types::{JobRequest, JobResult, ModelDescriptor};
use crate::Result;
use std::sync::Arc;

/// Unified client over one RunPod account: job execution plus model discovery.
pub struct RunpodClient {
    pub(crate) executor: JobExecutor,
    pub(crate) catalog: ModelCatalog,
}

impl RunpodClient {
    /// Create a client from environment configuration and credentials.
    pub fn from_env() -> Result<Self> {
        crate::client::builder::RunpodClientBuilder::new().build()
    }

    pub fn builder() -> crate::client::builder::RunpodClientBuilder {
        crate::client::builder::RunpodClientBuilder::new()
    }

    /// Execute one request (sync, async wait/no-wait, or status check).
    ///
    /// An `AsyncWait` request without its own budget polls with
    /// [`Self::default_poll_config`].
    pub async fn execute(&self, request: &JobRequest) -> Result<JobResult> {
        self.executor.execute(request).await
    }

    /// Execute several independent requests, results in input order.
    pub async fn execute_batch(
        &self,
        requests: &[JobRequest],
        concurrency: usize,
    ) -> Vec<Result<JobResult>> {
        self.executor.execute_batch(requests, concurrency).await
    }

    /// Polling budget from [`crate::ClientConfig`], used when a request has none.
    pub fn default_poll_config(&self) -> PollConfig {
        self.executor.default_poll()
    }

    /// Current model catalog (never fails; may be the fallback list).
    pub async fn models(&self) -> Arc<CatalogSnapshot> {
        self.catalog.get_models().await
    }

    pub async fn model(&self, id: &str) -> Result<ModelDescriptor> {
        self.catalog.get_model(id).await
    }

    pub fn catalog(&self) -> &ModelCatalog {
        &self.catalog
    }
}

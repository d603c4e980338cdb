//! 作业执行入口：按操作类型分派到同步、异步或状态查询路径。
//!
//! Single entry point for job requests.

use super::api::JobApi;
use super::polling::PollingOrchestrator;
use crate::clock::{Clock, TokioClock};
use crate::config::PollConfig;
use crate::types::{JobRequest, JobResult, Operation};
use crate::Result;
use futures::StreamExt;
use std::sync::Arc;
use tracing::{debug, warn};

/// Dispatches a [`JobRequest`] to the matching remote path.
///
/// Every path reports failures through the same [`crate::Error`] type.
pub struct JobExecutor {
    api: Arc<dyn JobApi>,
    orchestrator: PollingOrchestrator,
    default_poll: PollConfig,
}

impl JobExecutor {
    pub fn new(api: Arc<dyn JobApi>) -> Self {
        Self::with_clock(api, Arc::new(TokioClock))
    }

    pub fn with_clock(api: Arc<dyn JobApi>, clock: Arc<dyn Clock>) -> Self {
        let orchestrator = PollingOrchestrator::new(api.clone(), clock);
        Self {
            api,
            orchestrator,
            default_poll: PollConfig::default(),
        }
    }

    /// Polling budget for requests that do not carry their own.
    pub fn with_default_poll(mut self, poll: PollConfig) -> Self {
        self.default_poll = poll;
        self
    }

    pub fn default_poll(&self) -> PollConfig {
        self.default_poll
    }

    pub async fn execute(&self, request: &JobRequest) -> Result<JobResult> {
        let model_id = request.model_id();
        debug!(
            model_id,
            operation = request.operation().name(),
            "executing job request"
        );

        match request.operation() {
            Operation::Sync { input } => self.api.run_sync(model_id, input).await,
            Operation::AsyncNoWait { input } => self.api.run_async(model_id, input).await,
            Operation::AsyncWait { input } => self
                .orchestrator
                .run(model_id, input, request.poll().unwrap_or(&self.default_poll))
                .await
                .map(|outcome| outcome.result),
            Operation::StatusCheck { job_id } => self.api.get_status(model_id, job_id).await,
        }
    }

    /// Execute independent requests with at most `concurrency` in flight.
    ///
    /// Results preserve input order; one failure does not affect the others.
    pub async fn execute_batch(
        &self,
        requests: &[JobRequest],
        concurrency: usize,
    ) -> Vec<Result<JobResult>> {
        let limit = concurrency.max(1);
        let mut indexed: Vec<(usize, Result<JobResult>)> =
            futures::stream::iter(requests.iter().enumerate())
                .map(|(idx, req)| async move { (idx, self.execute(req).await) })
                .buffer_unordered(limit)
                .collect()
                .await;

        indexed.sort_by_key(|(idx, _)| *idx);
        let failed = indexed.iter().filter(|(_, r)| r.is_err()).count();
        if failed > 0 {
            warn!(total = requests.len(), failed, "batch finished with failures");
        }
        indexed.into_iter().map(|(_, r)| r).collect()
    }
}

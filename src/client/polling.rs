//! 异步作业轮询：提交后按固定间隔查询状态，直至终态或本地超时。
//!
//! Asynchronous job lifecycle.
//!
//! ```text
//! Submitted ──► Queued / InProgress ──► Completed | Failed | TimedOut
//! ```
//!
//! `TimedOut` is declared locally when the budget runs out; the remote job is
//! not cancelled and may keep running. Poll errors propagate immediately and
//! there is no retry or backoff.

use super::api::JobApi;
use super::error_classification::{classify, Failure};
use crate::clock::Clock;
use crate::config::PollConfig;
use crate::types::{JobResult, JobStatus};
use crate::{ErrorContext, Result};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

/// Terminal result plus bookkeeping about how it was reached.
#[derive(Debug, Clone, PartialEq)]
pub struct PollOutcome {
    pub result: JobResult,
    /// Status polls issued after submission
    pub polls: u32,
    /// Time from submission to the terminal observation
    pub elapsed: Duration,
}

pub struct PollingOrchestrator {
    api: Arc<dyn JobApi>,
    clock: Arc<dyn Clock>,
}

impl PollingOrchestrator {
    pub fn new(api: Arc<dyn JobApi>, clock: Arc<dyn Clock>) -> Self {
        Self { api, clock }
    }

    /// Submit `input` and wait for a completed result.
    ///
    /// Fails with `RemoteFailure` when the job fails remotely and `Timeout`
    /// (carrying the job id and last observed status) when the budget runs out.
    pub async fn run(
        &self,
        model_id: &str,
        input: &Value,
        config: &PollConfig,
    ) -> Result<PollOutcome> {
        let start = self.clock.now();
        let submitted = self.api.run_async(model_id, input).await?;
        let job_id = submitted.id.clone();
        let context = ErrorContext::new()
            .with_model_id(model_id)
            .with_job_id(&job_id);

        // remote short-circuited: no wait loop
        if submitted.status.is_terminal() {
            return self.finish(submitted, 0, self.clock.now() - start, context);
        }

        let mut polls: u32 = 0;
        loop {
            self.clock.sleep(config.poll_interval()).await;

            let current = self.api.get_status(model_id, &job_id).await?;
            polls += 1;
            let elapsed = self.clock.now() - start;
            debug!(
                model_id,
                job_id = job_id.as_str(),
                status = %current.status,
                poll = polls,
                elapsed_ms = elapsed.as_millis() as u64,
                "polled job status"
            );

            if current.status.is_terminal() {
                return self.finish(current, polls, elapsed, context);
            }
            let last_status = current.status;

            // at least one poll always happens before the budget is checked
            if elapsed >= config.timeout() {
                info!(
                    model_id,
                    job_id = job_id.as_str(),
                    last_status = %last_status,
                    polls,
                    "job timed out locally; remote job left running"
                );
                return Err(classify(
                    Failure::Elapsed {
                        elapsed,
                        budget: config.timeout(),
                    },
                    context.with_status(last_status),
                ));
            }
        }
    }

    fn finish(
        &self,
        result: JobResult,
        polls: u32,
        elapsed: Duration,
        context: ErrorContext,
    ) -> Result<PollOutcome> {
        info!(
            job_id = result.id.as_str(),
            status = %result.status,
            polls,
            elapsed_ms = elapsed.as_millis() as u64,
            "job reached terminal status"
        );
        match result.status {
            JobStatus::Failed => Err(classify(
                Failure::RemoteFailed {
                    message: result.error_message(),
                },
                context.with_status(JobStatus::Failed),
            )),
            _ => Ok(PollOutcome {
                result,
                polls,
                elapsed,
            }),
        }
    }
}

//! Scripted in-memory JobApi used by the orchestrator, executor and catalog tests.

#![allow(dead_code)]

use async_trait::async_trait;
use runpod_lib_rust::{Error, JobApi, JobResult, JobStatus, ModelDescriptor, Result};
use serde_json::{json, Value};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

pub fn job(id: &str, status: JobStatus) -> JobResult {
    let output = (status == JobStatus::Completed).then(|| json!({ "text": "done" }));
    JobResult {
        id: id.to_string(),
        status,
        output,
        execution_time_ms: None,
        delay_time_ms: None,
        worker_id: None,
        error: None,
    }
}

/// Each queue is consumed in order; the last entry repeats once the queue
/// is down to one element.
pub struct ScriptedApi {
    sync: Mutex<VecDeque<Result<JobResult>>>,
    submit: Mutex<VecDeque<Result<JobResult>>>,
    status: Mutex<VecDeque<Result<JobResult>>>,
    models: Mutex<VecDeque<Result<Vec<ModelDescriptor>>>>,
    list_delay: Option<Duration>,
    pub sync_calls: AtomicUsize,
    pub submit_calls: AtomicUsize,
    pub status_calls: AtomicUsize,
    pub list_calls: AtomicUsize,
    pub last_input: Mutex<Option<Value>>,
}

impl ScriptedApi {
    pub fn new() -> Self {
        Self {
            sync: Mutex::new(VecDeque::new()),
            submit: Mutex::new(VecDeque::new()),
            status: Mutex::new(VecDeque::new()),
            models: Mutex::new(VecDeque::new()),
            list_delay: None,
            sync_calls: AtomicUsize::new(0),
            submit_calls: AtomicUsize::new(0),
            status_calls: AtomicUsize::new(0),
            list_calls: AtomicUsize::new(0),
            last_input: Mutex::new(None),
        }
    }

    pub fn on_sync(self, r: Result<JobResult>) -> Self {
        self.sync.lock().unwrap().push_back(r);
        self
    }

    pub fn on_submit(self, r: Result<JobResult>) -> Self {
        self.submit.lock().unwrap().push_back(r);
        self
    }

    pub fn on_status(self, r: Result<JobResult>) -> Self {
        self.status.lock().unwrap().push_back(r);
        self
    }

    /// Queue one status response per entry, all for job `id`.
    pub fn on_statuses(self, id: &str, statuses: &[JobStatus]) -> Self {
        statuses
            .iter()
            .fold(self, |api, s| api.on_status(Ok(job(id, *s))))
    }

    pub fn on_list(self, r: Result<Vec<ModelDescriptor>>) -> Self {
        self.models.lock().unwrap().push_back(r);
        self
    }

    pub fn with_list_delay(mut self, delay: Duration) -> Self {
        self.list_delay = Some(delay);
        self
    }

    fn next<T: Clone>(queue: &Mutex<VecDeque<Result<T>>>, what: &str) -> Result<T> {
        let mut q = queue.lock().unwrap();
        if q.len() > 1 {
            q.pop_front().unwrap()
        } else {
            q.front()
                .cloned()
                .unwrap_or_else(|| panic!("no scripted response for {}", what))
        }
    }
}

#[async_trait]
impl JobApi for ScriptedApi {
    async fn run_sync(&self, _model_id: &str, input: &Value) -> Result<JobResult> {
        self.sync_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_input.lock().unwrap() = Some(input.clone());
        Self::next(&self.sync, "run_sync")
    }

    async fn run_async(&self, _model_id: &str, input: &Value) -> Result<JobResult> {
        self.submit_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_input.lock().unwrap() = Some(input.clone());
        Self::next(&self.submit, "run_async")
    }

    async fn get_status(&self, _model_id: &str, _job_id: &str) -> Result<JobResult> {
        self.status_calls.fetch_add(1, Ordering::SeqCst);
        Self::next(&self.status, "get_status")
    }

    async fn list_models(&self) -> Result<Vec<ModelDescriptor>> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.list_delay {
            tokio::time::sleep(delay).await;
        }
        Self::next(&self.models, "list_models")
    }
}

pub fn network_error() -> Error {
    Error::network("connection refused")
}

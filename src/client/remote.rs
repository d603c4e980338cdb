//! HTTP binding of [`JobApi`] for RunPod serverless endpoints.

use super::api::JobApi;
use super::error_classification::{classify, Failure};
use crate::transport::HttpTransport;
use crate::types::{JobResult, JobStatus, ModelDescriptor};
use crate::{Error, ErrorContext, Result};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Registry discovery query. Returns endpoint ids and their display names.
pub const MODELS_QUERY: &str = "query Endpoints { myself { endpoints { id name } } }";

/// Stateless transport binding: one outbound call per method, no retry.
pub struct RunpodApi {
    transport: Arc<HttpTransport>,
    sync_timeout: Duration,
}

impl RunpodApi {
    pub fn new(transport: Arc<HttpTransport>, sync_timeout: Duration) -> Self {
        Self {
            transport,
            sync_timeout,
        }
    }

    async fn post_input(
        &self,
        path: &str,
        input: &Value,
        timeout: Option<Duration>,
        context: &ErrorContext,
    ) -> Result<JobResult> {
        let body = json!({ "input": input });
        let raw = self
            .transport
            .post_json(path, &body, timeout)
            .await
            .map_err(|f| classify(f, context.clone()))?;
        let result: JobResult = raw.json(context)?;
        Ok(result.normalized())
    }
}

#[async_trait]
impl JobApi for RunpodApi {
    async fn run_sync(&self, model_id: &str, input: &Value) -> Result<JobResult> {
        let context = ErrorContext::new().with_model_id(model_id);
        let path = format!("/v2/{}/runsync", model_id);
        let result = self
            .post_input(&path, input, Some(self.sync_timeout), &context)
            .await?;
        debug!(model_id, job_id = result.id.as_str(), status = %result.status, "runsync returned");

        if result.status == JobStatus::Failed {
            return Err(classify(
                Failure::RemoteFailed {
                    message: result.error_message(),
                },
                context.with_job_id(&result.id).with_status(JobStatus::Failed),
            ));
        }
        Ok(result)
    }

    async fn run_async(&self, model_id: &str, input: &Value) -> Result<JobResult> {
        let context = ErrorContext::new().with_model_id(model_id);
        let path = format!("/v2/{}/run", model_id);
        let result = self.post_input(&path, input, None, &context).await?;
        debug!(model_id, job_id = result.id.as_str(), status = %result.status, "job submitted");
        Ok(result)
    }

    async fn get_status(&self, model_id: &str, job_id: &str) -> Result<JobResult> {
        let context = ErrorContext::new()
            .with_model_id(model_id)
            .with_job_id(job_id);
        let path = format!("/v2/{}/status/{}", model_id, job_id);
        let raw = self
            .transport
            .get(&path)
            .await
            .map_err(|f| classify(f, context.clone()))?;

        // Some gateways answer an unknown job with 200 and an error body.
        let value: Value = raw.json(&context)?;
        if value.get("status").is_none() {
            if let Some(err) = value.get("error") {
                let detail = err.as_str().map(str::to_string).unwrap_or_else(|| err.to_string());
                return Err(Error::not_found_with_context(detail, context));
            }
        }

        let result: JobResult =
            serde_json::from_value(value).map_err(|e| classify(e.into(), context.clone()))?;
        Ok(result.normalized())
    }

    async fn list_models(&self) -> Result<Vec<ModelDescriptor>> {
        let context = ErrorContext::new();
        let raw = self
            .transport
            .graphql(MODELS_QUERY)
            .await
            .map_err(|f| classify(f, context.clone()))?;
        let response: GraphQlResponse = raw.json(&context)?;

        let endpoints = match response.data.and_then(|d| d.myself) {
            Some(myself) => myself.endpoints,
            None => {
                let detail = response
                    .errors
                    .first()
                    .map(|e| e.message.clone())
                    .unwrap_or_else(|| "missing data.myself".to_string());
                return Err(classify(Failure::Parse(detail), context));
            }
        };

        let models: Vec<ModelDescriptor> = endpoints
            .into_iter()
            .map(|e| {
                let name = e.name.filter(|n| !n.trim().is_empty()).unwrap_or_else(|| e.id.clone());
                ModelDescriptor::new(e.id, name)
            })
            .collect();
        debug!(count = models.len(), "registry listed models");
        Ok(models)
    }
}

#[derive(Debug, Deserialize)]
struct GraphQlResponse {
    data: Option<GraphQlData>,
    #[serde(default)]
    errors: Vec<GraphQlError>,
}

#[derive(Debug, Deserialize)]
struct GraphQlData {
    myself: Option<GraphQlMyself>,
}

#[derive(Debug, Deserialize)]
struct GraphQlMyself {
    #[serde(default)]
    endpoints: Vec<GraphQlEndpoint>,
}

#[derive(Debug, Deserialize)]
struct GraphQlEndpoint {
    id: String,
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GraphQlError {
    message: String,
}

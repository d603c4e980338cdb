use crate::client::error_classification::{classify, Failure};
use crate::config::ClientConfig;
use crate::{Error, ErrorContext, Result};
use reqwest::{Proxy, RequestBuilder};
use serde_json::Value;
use std::time::{Duration, Instant};
use tracing::debug;
use uuid::Uuid;

/// Successful (2xx) response, body not yet parsed.
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub body: String,
}

/// Authenticated HTTP transport. One instance is shared by all calls of a client.
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
    graphql_url: String,
    api_key: String,
}

impl HttpTransport {
    pub fn new(config: &ClientConfig, api_key: String) -> Result<Self> {
        config.validate()?;

        let mut builder = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.http_timeout_secs.max(1)))
            .pool_max_idle_per_host(16)
            .pool_idle_timeout(Some(Duration::from_secs(90)))
            .user_agent(concat!("runpod-lib-rust/", env!("CARGO_PKG_VERSION")));

        if let Some(proxy_url) = &config.proxy_url {
            if let Ok(proxy) = Proxy::all(proxy_url) {
                builder = builder.proxy(proxy);
            }
        }

        let client = builder
            .build()
            .map_err(|e| Error::network(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            graphql_url: config.graphql_url.clone(),
            api_key,
        })
    }

    /// `GET {base_url}{path}`
    pub async fn get(&self, path: &str) -> std::result::Result<RawResponse, Failure> {
        let url = format!("{}{}", self.base_url, path);
        self.send(self.client.get(&url), "GET", &url).await
    }

    /// `POST {base_url}{path}` with a JSON body.
    ///
    /// `timeout` overrides the client-wide ceiling for this request only.
    pub async fn post_json(
        &self,
        path: &str,
        body: &Value,
        timeout: Option<Duration>,
    ) -> std::result::Result<RawResponse, Failure> {
        let url = format!("{}{}", self.base_url, path);
        let mut req = self.client.post(&url).json(body);
        if let Some(t) = timeout {
            req = req.timeout(t);
        }
        self.send(req, "POST", &url).await
    }

    /// Single GraphQL query against the registry endpoint.
    pub async fn graphql(&self, query: &str) -> std::result::Result<RawResponse, Failure> {
        let body = serde_json::json!({ "query": query });
        let req = self.client.post(&self.graphql_url).json(&body);
        self.send(req, "POST", &self.graphql_url).await
    }

    async fn send(
        &self,
        req: RequestBuilder,
        method: &str,
        url: &str,
    ) -> std::result::Result<RawResponse, Failure> {
        let request_id = Uuid::new_v4().to_string();
        let start = Instant::now();

        let resp = req
            .bearer_auth(&self.api_key)
            .header("x-request-id", request_id.as_str())
            .send()
            .await?;

        let status = resp.status().as_u16();
        let body = resp.text().await?;

        debug!(
            method,
            url,
            http_status = status,
            request_id = request_id.as_str(),
            duration_ms = start.elapsed().as_millis() as u64,
            "runpod request finished"
        );

        if !(200..300).contains(&status) {
            return Err(Failure::Http { status, body });
        }
        Ok(RawResponse { body })
    }
}

impl RawResponse {
    /// Parse the body as JSON, classifying a bad payload as `Malformed`.
    pub fn json<T: serde::de::DeserializeOwned>(&self, context: &ErrorContext) -> Result<T> {
        serde_json::from_str(&self.body).map_err(|e| classify(e.into(), context.clone()))
    }
}

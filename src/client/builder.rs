use crate::catalog::{CatalogConfig, ModelCatalog};
use crate::client::core::RunpodClient;
use crate::client::executor::JobExecutor;
use crate::client::remote::RunpodApi;
use crate::client::JobApi;
use crate::clock::{Clock, TokioClock};
use crate::config::ClientConfig;
use crate::credentials::{ChainCredential, CredentialProvider, StaticCredential};
use crate::transport::HttpTransport;
use crate::{Error, Result};
use std::sync::Arc;
use std::time::Duration;

/// Builder for [`RunpodClient`].
///
/// Keep this surface area small: configuration lives in [`ClientConfig`],
/// the builder only wires collaborators together.
pub struct RunpodClientBuilder {
    config: Option<ClientConfig>,
    credentials: Option<Box<dyn CredentialProvider>>,
    clock: Option<Arc<dyn Clock>>,
    api: Option<Arc<dyn JobApi>>,
    serve_stale_catalog: bool,
    /// Override base URL (primarily for testing with mock servers)
    base_url_override: Option<String>,
    graphql_url_override: Option<String>,
}

impl RunpodClientBuilder {
    pub fn new() -> Self {
        Self {
            config: None,
            credentials: None,
            clock: None,
            api: None,
            serve_stale_catalog: false,
            base_url_override: None,
            graphql_url_override: None,
        }
    }

    /// Use an explicit config instead of [`ClientConfig::from_env`].
    pub fn config(mut self, config: ClientConfig) -> Self {
        self.config = Some(config);
        self
    }

    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.credentials = Some(Box::new(StaticCredential::new(key)));
        self
    }

    pub fn credentials(mut self, provider: Box<dyn CredentialProvider>) -> Self {
        self.credentials = Some(provider);
        self
    }

    /// Inject the time source used for polling and catalog expiry.
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Replace the HTTP binding entirely (credentials and URLs are then unused).
    pub fn job_api(mut self, api: Arc<dyn JobApi>) -> Self {
        self.api = Some(api);
        self
    }

    pub fn serve_stale_catalog(mut self, enable: bool) -> Self {
        self.serve_stale_catalog = enable;
        self
    }

    pub fn base_url_override(mut self, base_url: impl Into<String>) -> Self {
        self.base_url_override = Some(base_url.into());
        self
    }

    pub fn graphql_url_override(mut self, url: impl Into<String>) -> Self {
        self.graphql_url_override = Some(url.into());
        self
    }

    pub fn build(self) -> Result<RunpodClient> {
        let mut config = self.config.unwrap_or_else(ClientConfig::from_env);
        if let Some(url) = self.base_url_override {
            config.base_url = url;
        }
        if let Some(url) = self.graphql_url_override {
            config.graphql_url = url;
        }

        let api: Arc<dyn JobApi> = match self.api {
            Some(api) => api,
            None => {
                let credentials = self
                    .credentials
                    .unwrap_or_else(|| Box::new(ChainCredential::default()));
                let api_key = credentials.api_key().ok_or_else(|| {
                    Error::unauthorized("no API key: set RUNPOD_API_KEY or pass one to the builder")
                })?;
                let transport = Arc::new(HttpTransport::new(&config, api_key)?);
                Arc::new(RunpodApi::new(
                    transport,
                    Duration::from_secs(config.sync_timeout_secs.max(1)),
                ))
            }
        };

        let clock = self.clock.unwrap_or_else(|| Arc::new(TokioClock));
        let catalog_config = CatalogConfig::new()
            .with_ttl(config.catalog_ttl())
            .with_serve_stale(self.serve_stale_catalog);

        Ok(RunpodClient {
            executor: JobExecutor::with_clock(api.clone(), clock.clone())
                .with_default_poll(config.poll_config()),
            catalog: ModelCatalog::with_clock(api, catalog_config, clock),
        })
    }
}

impl Default for RunpodClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

//! # runpod-lib-rust
//!
//! RunPod 无服务器推理作业运行时：统一同步、异步与状态查询三种调用方式。
//!
//! Job execution runtime for RunPod serverless inference endpoints.
//!
//! ## Overview
//!
//! A workflow engine hands this crate a [`JobRequest`] and gets back either a
//! uniform [`JobResult`] or a classified [`Error`]. Whether the job ran
//! synchronously, was submitted and polled to completion, or was only looked
//! up by id is invisible in the result shape.
//!
//! ## Key Features
//!
//! - **Unified execution**: [`JobExecutor`] dispatches the four operations over one error contract
//! - **Polling**: [`client::PollingOrchestrator`] drives submitted jobs to a terminal state within a local budget
//! - **Model discovery**: [`catalog::ModelCatalog`] caches the registry and degrades to an embedded list
//! - **Categorization**: [`catalog::categorize`] tags models as text, image, video or audio
//! - **Testability**: the remote API ([`JobApi`]) and time source ([`clock::Clock`]) are injectable
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use runpod_lib_rust::{JobRequest, RunpodClient};
//! use serde_json::json;
//!
//! #[tokio::main]
//! async fn main() -> runpod_lib_rust::Result<()> {
//!     let client = RunpodClient::builder().api_key("rp_xxx").build()?;
//!
//!     // polls with the client's configured interval and timeout
//!     let request = JobRequest::run_and_wait("whisper-large", json!({"audio": "https://..."}));
//!     let result = client.execute(&request).await?;
//!     println!("{:?}", result.output);
//!     Ok(())
//! }
//! ```
//!
//! ## Known limitations
//!
//! - No retry or backoff: transient failures end the attempt.
//! - A local polling timeout does not cancel the remote job.
//!
//! ## Module Organization
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`client`] | Remote API binding, classification, polling and execution |
//! | [`catalog`] | Model registry cache, fallback list and categorizer |
//! | [`types`] | Job and model data types |
//! | [`config`] | Client and polling configuration |
//! | [`credentials`] | API key providers |
//! | [`transport`] | Authenticated HTTP transport |
//! | [`clock`] | Injectable time source |

pub mod catalog;
pub mod client;
pub mod clock;
pub mod config;
pub mod credentials;
pub mod transport;
pub mod types;

// Re-export main types for convenience
pub use client::{JobApi, JobExecutor, RunpodClient, RunpodClientBuilder};
pub use config::{ClientConfig, PollConfig};
pub use types::{
    JobRequest, JobResult, JobStatus, ModelCategory, ModelDescriptor, Operation, RunMode,
};

/// Result type alias for the library
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for the library
pub mod error;
pub use error::{Error, ErrorContext, ErrorKind};

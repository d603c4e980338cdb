//! 客户端模块：远程作业 API、错误分类、轮询编排与统一执行入口。
//!
//! # Client Module
//!
//! | Item | Description |
//! |------|-------------|
//! | [`JobApi`] | The four remote operations (run-sync, run-async, status, list-models) |
//! | [`RunpodApi`] | HTTP binding of [`JobApi`] |
//! | [`error_classification`] | Total mapping from raw failures to [`crate::ErrorKind`] |
//! | [`PollingOrchestrator`] | Submit-then-poll state machine with a local timeout |
//! | [`JobExecutor`] | Dispatch of a [`crate::JobRequest`] to the right path |
//! | [`RunpodClient`] | Facade combining the executor and the model catalog |

mod api;
mod builder;
mod core;
pub mod error_classification;
mod executor;
mod polling;
mod remote;

pub use api::JobApi;
pub use builder::RunpodClientBuilder;
pub use self::core::RunpodClient;
pub use executor::JobExecutor;
pub use polling::{PollOutcome, PollingOrchestrator};
pub use remote::{RunpodApi, MODELS_QUERY};

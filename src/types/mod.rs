//! 类型系统模块：作业请求、作业结果与模型描述。
//!
//! # Types Module
//!
//! Strongly-typed representations of the job contract and the model registry.
//!
//! ## Key Types
//!
//! | Type | Description |
//! |------|-------------|
//! | [`JobRequest`] | One invocation: model id, operation and polling budget |
//! | [`Operation`] | Closed set of operations (sync, async wait/no-wait, status check) |
//! | [`JobResult`] | Uniform result shape shared by all job endpoints |
//! | [`JobStatus`] | Remote job lifecycle status |
//! | [`ModelDescriptor`] | Catalog entry with its content category |
//! | [`ModelCategory`] | Text / image / video / audio / unknown tag |

pub mod job;
pub mod model;

pub use job::{JobRequest, JobResult, JobStatus, Operation, RunMode};
pub use model::{ModelCategory, ModelDescriptor};

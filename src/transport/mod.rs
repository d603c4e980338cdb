//! 传输层：带鉴权的 HTTP 调用，供远程作业 API 使用。
//!
//! HTTP transport shared by the job and registry calls.

mod http;

pub use http::{HttpTransport, RawResponse};

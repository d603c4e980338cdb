use crate::types::job::JobStatus;
use std::fmt;
use thiserror::Error;

/// Category of a classified failure.
///
/// Every failure the runtime can observe maps onto exactly one of these kinds,
/// see [`crate::client::error_classification::classify`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// HTTP 401: missing, invalid or expired API key
    Unauthorized,
    /// HTTP 403: valid key without access to the endpoint
    Forbidden,
    /// HTTP 404 or unknown model/job
    NotFound,
    /// Local elapsed-time budget breached (transport ceiling or polling timeout)
    Timeout,
    /// The remote accepted the job but reported it as failed, or rejected the request
    RemoteFailure,
    /// A response body could not be parsed
    Malformed,
    /// Connection failure or 5xx from the remote
    Network,
}

impl ErrorKind {
    /// Stable snake_case name, suitable for logs and metrics labels.
    #[inline]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Unauthorized => "unauthorized",
            Self::Forbidden => "forbidden",
            Self::NotFound => "not_found",
            Self::Timeout => "timeout",
            Self::RemoteFailure => "remote_failure",
            Self::Malformed => "malformed",
            Self::Network => "network",
        }
    }

    /// Whether the failure is likely to go away on its own.
    ///
    /// Informational only: the runtime never retries.
    #[inline]
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Timeout | Self::Network)
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Identifying context captured at the failure site.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorContext {
    /// Endpoint / model identifier the call targeted
    pub model_id: Option<String>,
    /// Remote job id, when one was already assigned
    pub job_id: Option<String>,
    /// Last job status observed before the failure
    pub status: Option<JobStatus>,
    /// HTTP status code of the failing response
    pub http_status: Option<u16>,
}

impl ErrorContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_model_id(mut self, model_id: impl Into<String>) -> Self {
        self.model_id = Some(model_id.into());
        self
    }

    pub fn with_job_id(mut self, job_id: impl Into<String>) -> Self {
        self.job_id = Some(job_id.into());
        self
    }

    pub fn with_status(mut self, status: JobStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_http_status(mut self, status: u16) -> Self {
        self.http_status = Some(status);
        self
    }
}

/// Unified error type of the runtime.
///
/// Created once at the failure boundary and propagated unchanged to the caller.
#[derive(Debug, Clone, Error)]
#[error("{kind}: {message}{}", format_context(.context))]
pub struct Error {
    kind: ErrorKind,
    message: String,
    context: ErrorContext,
}

fn format_context(ctx: &ErrorContext) -> String {
    let mut parts = Vec::new();
    if let Some(ref model_id) = ctx.model_id {
        parts.push(format!("model: {}", model_id));
    }
    if let Some(ref job_id) = ctx.job_id {
        parts.push(format!("job: {}", job_id));
    }
    if let Some(status) = ctx.status {
        parts.push(format!("status: {}", status));
    }
    if let Some(code) = ctx.http_status {
        parts.push(format!("http: {}", code));
    }
    if parts.is_empty() {
        String::new()
    } else {
        format!(" ({})", parts.join(", "))
    }
}

impl Error {
    pub fn new(kind: ErrorKind, message: impl Into<String>, context: ErrorContext) -> Self {
        Self {
            kind,
            message: message.into(),
            context,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn context(&self) -> &ErrorContext {
        &self.context
    }

    pub fn unauthorized(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::Unauthorized, msg, ErrorContext::new())
    }

    pub fn not_found_with_context(msg: impl Into<String>, context: ErrorContext) -> Self {
        Self::new(ErrorKind::NotFound, msg, context)
    }

    pub fn malformed_with_context(msg: impl Into<String>, context: ErrorContext) -> Self {
        Self::new(ErrorKind::Malformed, msg, context)
    }

    pub fn network(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::Network, msg, ErrorContext::new())
    }

    pub fn timeout_with_context(msg: impl Into<String>, context: ErrorContext) -> Self {
        Self::new(ErrorKind::Timeout, msg, context)
    }

    pub fn remote_failure_with_context(msg: impl Into<String>, context: ErrorContext) -> Self {
        Self::new(ErrorKind::RemoteFailure, msg, context)
    }
}

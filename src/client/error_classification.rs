//! Error classification logic
//!
//! Maps every failure observed at the transport/response boundary onto one
//! [`ErrorKind`]. The mapping is total: there is no unclassified passthrough.

use crate::types::JobStatus;
use crate::{Error, ErrorContext, ErrorKind};
use serde_json::Value;
use std::time::Duration;

/// Longest raw body excerpt carried in an error message.
const MAX_BODY_EXCERPT: usize = 512;

/// Raw failure observed at a call site, before classification.
#[derive(Debug)]
pub enum Failure {
    /// Non-2xx HTTP response
    Http { status: u16, body: String },
    /// The request never produced a response (connect, TLS, timeout, body read)
    Transport(reqwest::Error),
    /// The remote reported the job itself as failed
    RemoteFailed { message: String },
    /// The response body did not match the expected shape
    Parse(String),
    /// A locally tracked time budget ran out
    Elapsed { elapsed: Duration, budget: Duration },
}

impl From<reqwest::Error> for Failure {
    fn from(e: reqwest::Error) -> Self {
        Failure::Transport(e)
    }
}

impl From<serde_json::Error> for Failure {
    fn from(e: serde_json::Error) -> Self {
        Failure::Parse(e.to_string())
    }
}

/// Map an HTTP status code onto a kind. Only meaningful for non-2xx codes.
pub fn kind_for_http_status(status: u16) -> ErrorKind {
    match status {
        401 => ErrorKind::Unauthorized,
        403 => ErrorKind::Forbidden,
        404 => ErrorKind::NotFound,
        500..=599 => ErrorKind::Network,
        // any other rejection (400, 409, 429, ...) is the remote refusing the job
        _ => ErrorKind::RemoteFailure,
    }
}

/// Classify a failure, attaching whatever context the call site had.
pub fn classify(failure: Failure, context: ErrorContext) -> Error {
    match failure {
        Failure::Http { status, body } => {
            let message = format!("HTTP {}: {}", status, message_from_body(&body));
            Error::new(
                kind_for_http_status(status),
                message,
                context.with_http_status(status),
            )
        }
        Failure::Transport(e) => {
            let kind = if e.is_timeout() {
                ErrorKind::Timeout
            } else if e.is_decode() {
                ErrorKind::Malformed
            } else if let Some(status) = e.status() {
                kind_for_http_status(status.as_u16())
            } else {
                ErrorKind::Network
            };
            Error::new(kind, e.to_string(), context)
        }
        Failure::RemoteFailed { message } => {
            let context = if context.status.is_none() {
                context.with_status(JobStatus::Failed)
            } else {
                context
            };
            Error::new(ErrorKind::RemoteFailure, message, context)
        }
        Failure::Parse(detail) => {
            Error::new(ErrorKind::Malformed, format!("invalid response: {}", detail), context)
        }
        Failure::Elapsed { elapsed, budget } => Error::new(
            ErrorKind::Timeout,
            format!(
                "no terminal status after {}ms (budget {}ms)",
                elapsed.as_millis(),
                budget.as_millis()
            ),
            context,
        ),
    }
}

/// Pull a readable message out of an error body.
///
/// Understands `{"error": "..."}`, `{"error": {"message": "..."}}` and
/// `{"message": "..."}`; anything else is returned as a trimmed excerpt.
fn message_from_body(body: &str) -> String {
    if let Ok(json) = serde_json::from_str::<Value>(body) {
        let candidate = json
            .get("error")
            .and_then(|e| e.as_str().or_else(|| e.get("message").and_then(Value::as_str)))
            .or_else(|| json.get("message").and_then(Value::as_str));
        if let Some(msg) = candidate {
            return msg.to_string();
        }
    }
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return "empty response body".to_string();
    }
    match trimmed.char_indices().nth(MAX_BODY_EXCERPT) {
        Some((idx, _)) => format!("{}...", &trimmed[..idx]),
        None => trimmed.to_string(),
    }
}

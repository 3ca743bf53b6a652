use std::error::Error;

use reqwest::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProbeError {
    /// The HTTP client could not be constructed
    #[error("{}", error_chain(.0))]
    ClientConfiguration(#[source] reqwest::Error),

    /// The target does not form a valid URL
    #[error("{0}")]
    RequestConfiguration(#[from] url::ParseError),

    /// No response was received (refused connection, DNS, TLS handshake, timeout)
    #[error("{}", error_chain(.0))]
    Transport(#[source] reqwest::Error),

    /// A response was received but its status code is 400 or above
    #[error("{}", status_text(.0))]
    HttpStatus(StatusCode),
}

impl ProbeError {
    /// Whether the failure happened while checking the target, as opposed to
    /// while preparing the client or the request.
    pub fn is_check_failure(&self) -> bool {
        matches!(self, ProbeError::Transport(_) | ProbeError::HttpStatus(_))
    }
}

/// `"503 Service Unavailable"`, or just the code when it has no registered reason.
fn status_text(status: &StatusCode) -> String {
    match status.canonical_reason() {
        Some(reason) => format!("{} {}", status.as_str(), reason),
        None => status.as_str().to_owned(),
    }
}

// reqwest keeps the root cause (e.g. "Connection refused") in the source chain
fn error_chain(err: &dyn Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let cause_message = cause.to_string();
        if !message.ends_with(&cause_message) {
            message.push_str(": ");
            message.push_str(&cause_message);
        }
        source = cause.source();
    }
    message
}

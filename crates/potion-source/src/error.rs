use std::fmt;

/// Operator-facing hint attached to a failed audit fetch.
pub const AUDIT_SERVICE_HINT: &str = "please ensure the audit service is running";

/// Errors an [`AuditSource`](crate::AuditSource) may return.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// Connection refused, DNS, timeout, body read failure.
    Transport { url: String, message: String },
    /// Upstream answered with a non-success status.
    Status { url: String, status: u16 },
    /// Body was not the expected JSON shape.
    Decode { url: String, message: String },
    /// Source has nothing to serve for this accessor (offline sources).
    Unavailable(String),
    /// HTTP client could not be built.
    Client(String),
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchError::Transport { url, message } => {
                write!(f, "transport error url={url}: {message}")
            }
            FetchError::Status { url, status } => {
                write!(f, "upstream http error status={status} url={url}")
            }
            FetchError::Decode { url, message } => {
                write!(f, "decode error url={url}: {message}")
            }
            FetchError::Unavailable(what) => write!(f, "unavailable: {what}"),
            FetchError::Client(msg) => write!(f, "http client error: {msg}"),
        }
    }
}

impl std::error::Error for FetchError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_url_and_status() {
        let e = FetchError::Status {
            url: "http://localhost:8000/api/audit/run".to_string(),
            status: 503,
        };
        assert_eq!(
            e.to_string(),
            "upstream http error status=503 url=http://localhost:8000/api/audit/run"
        );
    }

    #[test]
    fn error_is_boxable() {
        let e: Box<dyn std::error::Error + Send + Sync> =
            Box::new(FetchError::Unavailable("audit data".to_string()));
        assert_eq!(e.to_string(), "unavailable: audit data");
    }
}

use std::fmt;

/// Errors that can occur while reading from the catalog host.
#[derive(Debug)]
pub enum FetchError {
    /// Non-2xx response or connection failure (status 0).
    Transport { status: u16, message: String },
    /// The resource does not exist (HTTP 404).
    NotFound { url: String },
    /// 403/429 with an exhausted rate-limit budget.
    RateLimited { status: u16, message: String },
    /// Payload did not match its schema.
    Parse(String),
    /// A page or subtree failed; the whole aggregation was discarded.
    AggregationAborted(Box<FetchError>),
    /// Local file system failure while writing downloads.
    Io(std::io::Error),
}

impl FetchError {
    /// Classify a non-2xx response.
    pub fn from_status(
        url: &str,
        status: u16,
        body: &[u8],
        rate_limit_remaining: Option<u64>,
    ) -> Self {
        let message = error_message(body);
        match status {
            404 => FetchError::NotFound {
                url: url.to_string(),
            },
            403 | 429 if rate_limit_remaining == Some(0) => {
                FetchError::RateLimited { status, message }
            }
            _ => FetchError::Transport { status, message },
        }
    }

    /// HTTP status carried by the error, looking through aggregation wrappers.
    pub fn status(&self) -> Option<u16> {
        match self {
            FetchError::Transport { status, .. } | FetchError::RateLimited { status, .. } => {
                Some(*status)
            }
            FetchError::NotFound { .. } => Some(404),
            FetchError::AggregationAborted(inner) => inner.status(),
            FetchError::Parse(_) | FetchError::Io(_) => None,
        }
    }

    /// Short human-readable cause, without the status.
    pub fn message(&self) -> String {
        match self {
            FetchError::Transport { message, .. } | FetchError::RateLimited { message, .. } => {
                message.clone()
            }
            FetchError::NotFound { .. } => "Not Found".to_string(),
            FetchError::Parse(msg) => msg.clone(),
            FetchError::AggregationAborted(inner) => inner.message(),
            FetchError::Io(e) => e.to_string(),
        }
    }

    /// The originating error, looking through aggregation wrappers.
    pub fn root_cause(&self) -> &FetchError {
        match self {
            FetchError::AggregationAborted(inner) => inner.root_cause(),
            other => other,
        }
    }
}

/// GitHub error bodies are `{"message": "..."}`; anything else is used verbatim.
fn error_message(body: &[u8]) -> String {
    serde_json::from_slice::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(str::to_string))
        .unwrap_or_else(|| {
            let text = String::from_utf8_lossy(body).trim().to_string();
            if text.is_empty() {
                "unknown error".to_string()
            } else {
                text
            }
        })
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchError::Transport { status: 0, message } => write!(f, "network error: {message}"),
            FetchError::Transport { status, message } => {
                write!(f, "request failed (HTTP {status}): {message}")
            }
            FetchError::NotFound { url } => write!(f, "not found: {url}"),
            FetchError::RateLimited { status, message } => {
                write!(f, "rate limited (HTTP {status}): {message}")
            }
            FetchError::Parse(msg) => write!(f, "parse error: {msg}"),
            FetchError::AggregationAborted(inner) => write!(f, "aggregation aborted: {inner}"),
            FetchError::Io(e) => write!(f, "I/O error: {e}"),
        }
    }
}

impl std::error::Error for FetchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FetchError::AggregationAborted(inner) => Some(inner.as_ref()),
            FetchError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for FetchError {
    fn from(e: std::io::Error) -> Self {
        FetchError::Io(e)
    }
}

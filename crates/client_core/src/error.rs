use thiserror::Error;

#[derive(Debug, Error)]
pub enum RosterError {
    #[error("invalid server url: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("server url '{0}' cannot be used as a base for API paths")]
    UnsupportedBaseUrl(String),
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("server rejected request with status {status}: {}", detail.as_deref().unwrap_or("no detail"))]
    Rejected { status: u16, detail: Option<String> },
    #[error("malformed response body: {0}")]
    MalformedBody(#[from] serde_json::Error),
}

impl RosterError {
    /// Server-provided explanation of a rejected request.
    pub fn detail(&self) -> Option<&str> {
        match self {
            RosterError::Rejected { detail, .. } => detail.as_deref(),
            _ => None,
        }
    }

    /// True when the server answered with a non-2xx status, as opposed to the
    /// request never completing or the body being unreadable.
    pub fn is_rejection(&self) -> bool {
        matches!(self, RosterError::Rejected { .. })
    }
}

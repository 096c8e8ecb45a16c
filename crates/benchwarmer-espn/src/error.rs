use thiserror::Error;

#[derive(Debug, Error)]
pub enum EspnError {
    #[error("request to {url} failed: {source}")]
    Http {
        url: String,
        source: reqwest::Error,
    },

    #[error("ESPN returned HTTP {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("failed to decode ESPN response from {url}: {source}")]
    Decode {
        url: String,
        source: serde_json::Error,
    },

    #[error(
        "ESPN refused access (HTTP {status}); private leagues need espn_s2 and swid credentials"
    )]
    Unauthorized { status: u16 },

    #[error("invalid ESPN credentials: {message}")]
    InvalidCredentials { message: String },
}

impl EspnError {
    /// Classify a non-success HTTP status.
    pub fn from_status(url: &str, status: u16) -> Self {
        match status {
            401 | 403 => EspnError::Unauthorized { status },
            _ => EspnError::Status {
                url: url.to_string(),
                status,
            },
        }
    }
}

use thiserror::Error;

/// Errors talking to the feed API.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("network error: {0}")]
    Network(String),

    /// Non-success response; `code` is the API's `error` field when present.
    #[error("API error ({status}): {message}")]
    Api {
        status: u16,
        code: Option<String>,
        message: String,
    },

    #[error("parse error: {0}")]
    Parse(String),
}

impl ClientError {
    /// True when the server no longer knows the cursor (the posting behind it
    /// was removed). Reloading from the top recovers.
    pub fn is_stale_cursor(&self) -> bool {
        matches!(self, ClientError::Api { code: Some(code), .. } if code == "cursor_not_found")
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ClientError::Parse(err.to_string())
        } else {
            ClientError::Network(err.to_string())
        }
    }
}

/// Errors persisting preferences. Loading never fails; a broken record reads
/// as "no preferences".
#[derive(Debug, Error)]
pub enum PreferencesStoreError {
    #[error("preferences I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to encode preferences: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("preferences store unavailable: {0}")]
    Unavailable(String),
}

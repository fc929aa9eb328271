use thiserror::Error;

pub type Result<T> = std::result::Result<T, AppleMusicError>;

#[derive(Debug, Error)]
pub enum AppleMusicError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Parse error: {0}")]
    Parse(String),

    /// Library writes need a user token; search does not.
    #[error("No user token configured, cannot modify the library")]
    MissingUserToken,
}

impl From<reqwest::Error> for AppleMusicError {
    fn from(err: reqwest::Error) -> Self {
        AppleMusicError::Network(err.to_string())
    }
}

impl From<serde_json::Error> for AppleMusicError {
    fn from(err: serde_json::Error) -> Self {
        AppleMusicError::Parse(err.to_string())
    }
}

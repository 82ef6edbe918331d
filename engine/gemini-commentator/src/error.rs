use fantasy_leaderboard::CommentaryError;
use thiserror::Error;

/// Errors from the Gemini client
#[derive(Error, Debug)]
pub enum GeminiError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Request timed out")]
    Timeout,

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API request failed with status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Failed to decode response: {0}")]
    Decode(String),

    #[error("Response contained no text")]
    EmptyResponse,
}

pub type Result<T> = std::result::Result<T, GeminiError>;

impl GeminiError {
    /// Classify a failed send. The URL is stripped so error text stays free
    /// of request details.
    pub fn from_request(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            GeminiError::Timeout
        } else {
            GeminiError::Http(err.without_url())
        }
    }
}

impl From<GeminiError> for CommentaryError {
    fn from(err: GeminiError) -> Self {
        match err {
            GeminiError::Timeout => CommentaryError::Timeout,
            GeminiError::Http(e) if e.is_timeout() => CommentaryError::Timeout,
            GeminiError::EmptyResponse => CommentaryError::EmptyResponse,
            GeminiError::Http(e) => {
                CommentaryError::Provider(GeminiError::Http(e.without_url()).to_string())
            }
            other => CommentaryError::Provider(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_maps_onto_commentary_errors() {
        assert_eq!(CommentaryError::from(GeminiError::Timeout), CommentaryError::Timeout);
        assert_eq!(
            CommentaryError::from(GeminiError::EmptyResponse),
            CommentaryError::EmptyResponse
        );
        assert_eq!(
            CommentaryError::from(GeminiError::Status { status: 429, body: "quota".to_string() }),
            CommentaryError::Provider("API request failed with status 429: quota".to_string())
        );
    }
}

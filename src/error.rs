// src/error.rs
// =============================================================================
// Error taxonomy for everything that talks to an external service.
//
// None of these escape to the presentation layer: the orchestrator and the
// insight requester turn them into the message stored in their error state.
// The Display text of each variant IS that user-facing message.
// =============================================================================

use reqwest::StatusCode;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ExplorerError>;

pub const FETCH_USER_ERROR: &str = "Could not fetch user data.";
pub const FETCH_REPOS_ERROR: &str = "Could not fetch repositories.";

#[derive(Debug, Error)]
pub enum ExplorerError {
    /// The requested user does not exist upstream.
    #[error("User '{0}' not found.")]
    NotFound(String),

    /// GitHub answered 403.
    #[error("API rate limit exceeded. Please try again later.")]
    RateLimited,

    /// Any other non-success status.
    #[error("{message}")]
    Upstream { status: u16, message: String },

    /// A required credential or URL is missing or malformed.
    #[error("{0}")]
    Configuration(String),

    /// The response body did not have the expected shape.
    #[error("{0}")]
    Parse(String),

    /// The request never produced a response.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}

impl ExplorerError {
    /// Maps a failed GitHub response onto the three-way taxonomy:
    /// 404 → NotFound, 403 → RateLimited, anything else → Upstream with the
    /// given fallback message.
    pub fn from_github_status(status: StatusCode, username: &str, fallback: &str) -> Self {
        match status {
            StatusCode::NOT_FOUND => ExplorerError::NotFound(username.to_string()),
            StatusCode::FORBIDDEN => ExplorerError::RateLimited,
            other => ExplorerError::Upstream {
                status: other.as_u16(),
                message: fallback.to_string(),
            },
        }
    }

    pub fn missing_api_key() -> Self {
        ExplorerError::Configuration("Missing Gemini Api Key".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let err = ExplorerError::from_github_status(StatusCode::NOT_FOUND, "ghost-user-404", FETCH_USER_ERROR);
        assert_eq!(err.to_string(), "User 'ghost-user-404' not found.");

        let err = ExplorerError::from_github_status(StatusCode::FORBIDDEN, "octocat", FETCH_USER_ERROR);
        assert!(matches!(err, ExplorerError::RateLimited));

        let err = ExplorerError::from_github_status(
            StatusCode::INTERNAL_SERVER_ERROR,
            "octocat",
            FETCH_REPOS_ERROR,
        );
        assert_eq!(err.to_string(), FETCH_REPOS_ERROR);
        assert!(matches!(err, ExplorerError::Upstream { status: 500, .. }));
    }

    #[test]
    fn test_missing_api_key_message() {
        assert_eq!(ExplorerError::missing_api_key().to_string(), "Missing Gemini Api Key");
    }
}

// src/config.rs
// =============================================================================
// Runtime configuration for the explorer.
//
// Everything that points at an external service lives here:
// - GITHUB_BASE_URL: base URL of the GitHub REST API
// - GEMINI_API_URL:  generateContent endpoint, `{apiKey}` is substituted
// - GEMINI_API_KEY:  credential for the generative-language API
//
// The binary loads a .env file first (dotenvy), then calls Config::from_env().
// Tests build a Config by hand and point it at a wiremock server.
// =============================================================================

use std::time::Duration;

/// Page size used when crawling `/users/{name}/repos`.
pub const REPOS_PER_PAGE: usize = 100;

/// How long the username input must be stable before a fetch starts.
pub const USERNAME_DEBOUNCE: Duration = Duration::from_millis(500);

/// How long the repository-name filter must be stable before it applies.
pub const FILTER_DEBOUNCE: Duration = Duration::from_millis(300);

/// Repositories shown per page in the browser view.
pub const DISPLAY_PAGE_SIZE: usize = 10;

/// Number of repositories (by stars) included in the insight digest.
pub const TOP_REPOS: usize = 10;

/// Number of languages included in the insight digest.
pub const TOP_LANGUAGES: usize = 5;

/// GitHub does not allow usernames longer than this.
pub const MAX_USERNAME_LENGTH: usize = 39;

pub const DEFAULT_GITHUB_BASE_URL: &str = "https://api.github.com";

pub const DEFAULT_GEMINI_API_URL: &str =
    "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.0-flash:generateContent?key={apiKey}";

/// Placeholder in the Gemini URL template replaced by the API key.
pub const API_KEY_PLACEHOLDER: &str = "{apiKey}";

const USER_AGENT: &str = concat!("gh-explorer/", env!("CARGO_PKG_VERSION"));

// Cleans up raw username input before it reaches the fetcher
//
// Parameters:
//   raw: whatever the user typed (one stdin line, one CLI argument)
//
// Returns: the input trimmed and clipped to MAX_USERNAME_LENGTH characters,
// the same way a search box with a maxlength would hold it
pub fn clip_username(raw: &str) -> String {
    raw.trim().chars().take(MAX_USERNAME_LENGTH).collect()
}

#[derive(Debug, Clone)]
pub struct Config {
    pub github_base_url: String,
    pub gemini_api_url: String,
    pub gemini_api_key: Option<String>,
    pub user_agent: String,
    pub request_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            github_base_url: DEFAULT_GITHUB_BASE_URL.to_string(),
            gemini_api_url: DEFAULT_GEMINI_API_URL.to_string(),
            gemini_api_key: None,
            user_agent: USER_AGENT.to_string(),
            request_timeout: Duration::from_secs(30),
        }
    }
}

impl Config {
    /// Reads the configuration from environment variables, falling back to
    /// the public endpoints. An empty `GEMINI_API_KEY` counts as missing.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        Self {
            github_base_url: non_empty("GITHUB_BASE_URL").unwrap_or(defaults.github_base_url),
            gemini_api_url: non_empty("GEMINI_API_URL").unwrap_or(defaults.gemini_api_url),
            gemini_api_key: non_empty("GEMINI_API_KEY"),
            ..defaults
        }
    }

    pub fn with_github_base_url(mut self, url: impl Into<String>) -> Self {
        self.github_base_url = url.into();
        self
    }

    pub fn with_gemini_api_url(mut self, url: impl Into<String>) -> Self {
        self.gemini_api_url = url.into();
        self
    }

    pub fn with_gemini_api_key(mut self, key: Option<String>) -> Self {
        self.gemini_api_key = key.filter(|k| !k.trim().is_empty());
        self
    }

    /// Shared HTTP client for both external services.
    pub fn http_client(&self) -> reqwest::Result<reqwest::Client> {
        reqwest::Client::builder()
            .user_agent(self.user_agent.as_str())
            .timeout(self.request_timeout)
            .build()
    }
}

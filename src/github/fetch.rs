// src/github/fetch.rs
// =============================================================================
// This module talks to the GitHub REST API.
//
// Endpoints used (both read-only):
// - GET /users/{username}                          -> Profile
// - GET /users/{username}/repos?per_page=N&page=P  -> one page of Repository
//
// The repository crawl requests pages one at a time and stops at the first
// page shorter than the page size. A user with exactly N*100 repositories
// therefore costs one extra request that comes back empty; the API gives us
// no cheaper way to know we reached the end without parsing Link headers.
//
// Rust concepts:
// - async functions: For network I/O
// - Result: Every failure is an ExplorerError, mapped from the HTTP status
// - serde: JSON bodies are deserialized straight into our models
// =============================================================================

use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};
use url::Url;

use super::models::{Profile, Repository};
use crate::config::{Config, REPOS_PER_PAGE};
use crate::error::{ExplorerError, Result, FETCH_REPOS_ERROR, FETCH_USER_ERROR};

#[derive(Debug, Clone)]
pub struct GitHubClient {
    http: Client,
    base_url: Url,
    page_size: usize,
}

impl GitHubClient {
    pub fn new(http: Client, base_url: &str) -> Result<Self> {
        let base_url = Url::parse(base_url).map_err(|e| {
            ExplorerError::Configuration(format!("Invalid GitHub base URL '{}': {}", base_url, e))
        })?;

        if base_url.cannot_be_a_base() {
            return Err(ExplorerError::Configuration(format!(
                "GitHub base URL cannot be used as a base: {}",
                base_url
            )));
        }

        Ok(Self {
            http,
            base_url,
            page_size: REPOS_PER_PAGE,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(config.http_client()?, &config.github_base_url)
    }

    /// Overrides the crawl page size (GitHub caps it at 100).
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    // Fetches a user's public profile
    //
    // Parameters:
    //   username: the login to look up (percent-encoded into the path)
    //
    // Returns: the Profile, or NotFound on 404, RateLimited on 403 and
    // "Could not fetch user data." for any other failure status
    pub async fn fetch_profile(&self, username: &str) -> Result<Profile> {
        let url = self.endpoint(&["users", username])?;
        debug!(%url, "fetching profile");

        let response = self.http.get(url).send().await?;
        let response = check_status(response, username, FETCH_USER_ERROR)?;
        read_json(response).await
    }

    // Fetches one page of a user's repositories, in the order the API returns them
    //
    // Parameters:
    //   username: the login whose repositories we want
    //   page: 1-based page number, sent together with per_page=page_size
    //
    // Returns: at most page_size repositories; fewer means this was the last page
    pub async fn fetch_repos_page(&self, username: &str, page: u32) -> Result<Vec<Repository>> {
        let mut url = self.endpoint(&["users", username, "repos"])?;
        url.query_pairs_mut()
            .append_pair("per_page", &self.page_size.to_string())
            .append_pair("page", &page.to_string());
        debug!(%url, page, "fetching repository page");

        let response = self.http.get(url).send().await?;
        let response = check_status(response, username, FETCH_REPOS_ERROR)?;
        read_json(response).await
    }

    // Crawls every repository page, starting at 1
    //
    // Keeps going while the last page came back full. Pages are requested
    // strictly one after another since the stop condition needs the previous
    // page's length.
    //
    // Returns: every public repository, or the first page's error
    pub async fn fetch_all_repos(&self, username: &str) -> Result<Vec<Repository>> {
        let mut all = Vec::new();
        let mut page = 1;

        loop {
            let repos = self.fetch_repos_page(username, page).await?;
            let full_page = repos.len() == self.page_size;
            all.extend(repos);

            if !full_page {
                break;
            }
            page += 1;
        }

        debug!(username, pages = page, total = all.len(), "repository crawl finished");
        Ok(all)
    }

    // Builds base_url + /seg1/seg2/..., percent-encoding each segment
    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ExplorerError::Configuration("GitHub base URL cannot be a base".to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }
}

fn check_status(response: Response, username: &str, fallback: &str) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    warn!(status = status.as_u16(), url = %response.url(), "GitHub request failed");
    Err(ExplorerError::from_github_status(status, username, fallback))
}

// Reads the body as text first so a malformed body is a ParseError rather
// than a network error.
async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T> {
    let body = response.text().await?;
    serde_json::from_str(&body)
        .map_err(|e| ExplorerError::Parse(format!("Unexpected GitHub response: {}", e)))
}

// BEGINNER NOTES:
//
// 1. Why path_segments_mut() instead of format!()?
//    - A username is user input; pushing it as a path segment percent-encodes
//      anything that would otherwise change the URL ("a/b", "?x", spaces)
//    - It also keeps any path prefix on the base URL (GitHub Enterprise uses
//      https://host/api/v3)
//
// 2. Why read the body as text before parsing?
//    - response.json() reports a bad body as a reqwest error, which would look
//      like a network problem
//    - serde_json::from_str gives us a Parse error with the real reason
//
// 3. Why not request all pages at once?
//    - We don't know how many pages there are until one comes back short
//    - Sequential requests also stay friendly to GitHub's rate limit

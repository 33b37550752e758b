// src/lib.rs
// =============================================================================
// gh-explorer: look up a GitHub user, browse their repositories, and ask a
// text-generation model for a short developer insight.
//
// Data flow:
//
//   raw username ──► Debouncer ──► ProfileFetcher ──► FetchResult
//                                      │  (cache / GitHub API)
//                                      ▼
//                 RepoBrowser (filter ─► sort ─► paginate)
//                 InsightRequester (on demand) ──► InsightState
//
// Rendering is left to the caller; the binary in main.rs is one such caller.
// =============================================================================

pub mod config;
pub mod debounce;
pub mod error;
pub mod github;
pub mod insight;
pub mod repos;
pub mod state;

pub use config::Config;
pub use debounce::Debouncer;
pub use error::{ExplorerError, Result};
pub use github::{FetchResult, GitHubClient, Profile, ProfileBundle, ProfileCache, ProfileFetcher, Repository, SessionCache};
pub use insight::{GeminiClient, Insight, InsightRequester, InsightState};
pub use repos::{RepoBrowser, SortKey};
pub use state::{Status, TaskState};

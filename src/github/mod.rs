// src/github/mod.rs
// =============================================================================
// This module handles everything GitHub-side.
//
// Submodules:
// - models:       Profile / Repository as returned by the REST API
// - fetch:        HTTP client (profile request, paginated repository crawl)
// - cache:        Session cache keyed by the exact username string
// - orchestrator: Turns a (debounced) username into a FetchResult
// =============================================================================

mod cache;
mod fetch;
mod models;
mod orchestrator;

pub use cache::{ProfileCache, SessionCache};
pub use fetch::GitHubClient;
pub use models::{Profile, ProfileBundle, Repository};
pub use orchestrator::{FetchResult, ProfileFetcher};

#[cfg(test)]
pub(crate) use models::fixtures;

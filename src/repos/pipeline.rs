// src/repos/pipeline.rs
// =============================================================================
// Pure functions that shape a repository list for display.
//
// Composition order is always: filter -> sort -> paginate.
// Nothing here touches the network or mutates its input.
// =============================================================================

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::github::Repository;

/// Field to sort by. Every key sorts descending (largest / newest first).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    #[default]
    Stars,
    Forks,
    Updated,
}

impl SortKey {
    pub const ALL: [SortKey; 3] = [SortKey::Stars, SortKey::Forks, SortKey::Updated];

    pub fn as_str(self) -> &'static str {
        match self {
            SortKey::Stars => "stars",
            SortKey::Forks => "forks",
            SortKey::Updated => "updated",
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SortKey::ALL
            .into_iter()
            .find(|key| key.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown sort key '{}', expected stars, forks or updated", s))
    }
}

/// Repositories whose name contains `query`, ignoring case, in input order.
/// An empty query keeps everything.
pub fn filter_by_name(repos: &[Repository], query: &str) -> Vec<Repository> {
    let needle = query.to_lowercase();
    repos
        .iter()
        .filter(|repo| repo.name.to_lowercase().contains(&needle))
        .cloned()
        .collect()
}

/// Stable descending sort; equal keys keep their relative order.
pub fn sort_repos(repos: &[Repository], key: SortKey) -> Vec<Repository> {
    let mut sorted = repos.to_vec();
    match key {
        SortKey::Stars => sorted.sort_by(|a, b| b.star_count.cmp(&a.star_count)),
        SortKey::Forks => sorted.sort_by(|a, b| b.fork_count.cmp(&a.fork_count)),
        SortKey::Updated => sorted.sort_by(|a, b| b.last_updated_at.cmp(&a.last_updated_at)),
    }
    sorted
}

/// The 1-based `page` of `repos`. Pages past the end (and page 0) are empty.
pub fn paginate(repos: &[Repository], page: usize, page_size: usize) -> &[Repository] {
    if page == 0 || page_size == 0 {
        return &[];
    }

    let start = (page - 1).saturating_mul(page_size);
    if start >= repos.len() {
        return &[];
    }
    let end = start.saturating_add(page_size).min(repos.len());
    &repos[start..end]
}

/// `ceil(total / page_size)`; zero items means zero pages.
pub fn page_count(total: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return 0;
    }
    total.div_ceil(page_size)
}

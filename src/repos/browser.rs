// src/repos/browser.rs
// =============================================================================
// View state for the repository list: query + sort key + current page.
//
// The browser owns the full repository list of one profile and keeps the
// filtered+sorted view up to date. Changing the query or the sort key always
// sends the user back to page 1; a page number from a bigger result set
// must never survive into a smaller one.
// =============================================================================

use super::pipeline::{filter_by_name, page_count, paginate, sort_repos, SortKey};
use crate::github::Repository;

#[derive(Debug, Clone)]
pub struct RepoBrowser {
    repos: Vec<Repository>,
    query: String,
    sort: SortKey,
    page: usize,
    page_size: usize,
    shaped: Vec<Repository>,
}

impl RepoBrowser {
    pub fn new(repos: Vec<Repository>, page_size: usize) -> Self {
        let mut browser = Self {
            repos,
            query: String::new(),
            sort: SortKey::default(),
            page: 1,
            page_size: page_size.max(1),
            shaped: Vec::new(),
        };
        browser.reshape();
        browser
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn sort_key(&self) -> SortKey {
        self.sort
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Applies a (debounced) filter query.
    pub fn set_query(&mut self, query: impl Into<String>) {
        let query = query.into();
        if query != self.query {
            self.query = query;
            self.reshape();
        }
    }

    pub fn set_sort(&mut self, sort: SortKey) {
        if sort != self.sort {
            self.sort = sort;
            self.reshape();
        }
    }

    /// Jumps to `page` as-is; a page past the end simply shows nothing.
    pub fn set_page(&mut self, page: usize) {
        self.page = page.max(1);
    }

    pub fn next_page(&mut self) {
        self.page = (self.page + 1).min(self.total_pages().max(1));
    }

    pub fn prev_page(&mut self) {
        self.page = self.page.saturating_sub(1).max(1);
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages()
    }

    pub fn has_prev(&self) -> bool {
        self.page > 1
    }

    /// Number of repositories left after filtering.
    pub fn total_count(&self) -> usize {
        self.shaped.len()
    }

    pub fn total_pages(&self) -> usize {
        page_count(self.shaped.len(), self.page_size)
    }

    /// The repositories on the current page.
    pub fn visible(&self) -> &[Repository] {
        paginate(&self.shaped, self.page, self.page_size)
    }

    /// True when the profile has no repositories at all (before filtering).
    pub fn is_empty(&self) -> bool {
        self.repos.is_empty()
    }

    fn reshape(&mut self) {
        let filtered = filter_by_name(&self.repos, &self.query);
        self.shaped = sort_repos(&filtered, self.sort);
        self.page = 1;
    }
}

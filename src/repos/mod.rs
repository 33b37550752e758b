// src/repos/mod.rs
// =============================================================================
// Repository list shaping.
//
// - pipeline: pure filter / sort / paginate / page-count functions
// - browser:  view state that applies them and resets the page when needed
// =============================================================================

mod browser;
mod pipeline;

pub use browser::RepoBrowser;
pub use pipeline::{filter_by_name, page_count, paginate, sort_repos, SortKey};

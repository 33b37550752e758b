// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// Two ways to use the explorer from a terminal:
// - `user`:  look up one username, print a page of repositories (and,
//            with --insight, an AI summary of the developer)
// - `watch`: type usernames line by line; input is debounced like a search
//            box and every state change is printed as it happens
//
// Service URLs can be given as flags or through the environment (.env is
// loaded first), the Gemini API key only through the environment.
// =============================================================================

use clap::{Args, Parser, Subcommand};
use gh_explorer::config::DISPLAY_PAGE_SIZE;
use gh_explorer::SortKey;

#[derive(Parser, Debug)]
#[command(
    name = "gh-explorer",
    version,
    about = "Explore a GitHub user's profile and repositories",
    long_about = "gh-explorer fetches a GitHub user's public profile and every public repository, \
                  lets you filter, sort and page through them, and can ask Gemini for a short \
                  developer insight (needs GEMINI_API_KEY)."
)]
pub struct Cli {
    #[command(flatten)]
    pub endpoints: Endpoints,

    /// Log debug output to stderr (RUST_LOG takes precedence)
    #[arg(long, short, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Args, Debug)]
pub struct Endpoints {
    /// Base URL of the GitHub REST API
    #[arg(long = "github-url", env = "GITHUB_BASE_URL", global = true)]
    pub github_url: Option<String>,

    /// Gemini generateContent URL; `{apiKey}` is replaced by GEMINI_API_KEY
    #[arg(long = "gemini-url", env = "GEMINI_API_URL", global = true)]
    pub gemini_url: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show one user's profile and a page of their repositories
    ///
    /// Example: gh-explorer user octocat --sort updated --filter hello
    User {
        /// GitHub username
        username: String,

        /// Only show repositories whose name contains this (case-insensitive)
        #[arg(long, default_value = "")]
        filter: String,

        /// Sort key: stars, forks or updated
        #[arg(long, default_value_t = SortKey::Stars)]
        sort: SortKey,

        /// Page to show (1-based)
        #[arg(long, default_value_t = 1)]
        page: usize,

        /// Repositories per page
        #[arg(long, default_value_t = DISPLAY_PAGE_SIZE)]
        per_page: usize,

        /// Also request an AI-generated developer insight
        #[arg(long)]
        insight: bool,

        /// Output JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Read usernames from stdin and follow them like a live search box
    Watch,
}

// src/main.rs
// =============================================================================
// This is the entry point of the gh-explorer binary.
//
// What happens here:
// 1. Load .env, parse command-line arguments, set up logging
// 2. Build the GitHub client + fetch orchestrator from the configuration
// 3. Dispatch to the subcommand (one-shot `user` or interactive `watch`)
// 4. Exit with proper code (0 = success, 1 = lookup failed, 2 = error)
//
// All the real work lives in the library; this file only renders states.
// =============================================================================

mod cli;

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::task::JoinHandle;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands, Endpoints};
use gh_explorer::config::{clip_username, DISPLAY_PAGE_SIZE, FILTER_DEBOUNCE, USERNAME_DEBOUNCE};
use gh_explorer::{
    Config, Debouncer, FetchResult, GeminiClient, GitHubClient, Insight, InsightRequester,
    InsightState, Profile, ProfileBundle, ProfileFetcher, RepoBrowser, Repository, SessionCache,
    SortKey, TaskState,
};

#[tokio::main]
async fn main() {
    // A missing .env file is fine, the environment may already be set
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let exit_code = match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

// Logs go to stderr so `--json` output on stdout stays machine-readable
fn init_tracing(verbose: bool) {
    let default = if verbose { "gh_explorer=debug" } else { "gh_explorer=warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli) -> Result<i32> {
    let config = build_config(&cli.endpoints);

    let github = GitHubClient::from_config(&config).context("could not set up the GitHub client")?;
    let fetcher = ProfileFetcher::new(github, Arc::new(SessionCache::new()));

    match cli.command {
        Commands::User {
            username,
            filter,
            sort,
            page,
            per_page,
            insight,
            json,
        } => {
            let view = ViewOptions { filter, sort, page, per_page, json };
            let gemini = if insight {
                Some(GeminiClient::from_config(&config).context("could not set up the Gemini client")?)
            } else {
                None
            };
            handle_user(&fetcher, &clip_username(&username), view, gemini).await
        }
        Commands::Watch => handle_watch(&fetcher).await,
    }
}

// Flags win over the environment, the environment wins over defaults
fn build_config(endpoints: &Endpoints) -> Config {
    let mut config = Config::from_env();
    if let Some(url) = &endpoints.github_url {
        config = config.with_github_base_url(url.clone());
    }
    if let Some(url) = &endpoints.gemini_url {
        config = config.with_gemini_api_url(url.clone());
    }
    config
}

struct ViewOptions {
    filter: String,
    sort: SortKey,
    page: usize,
    per_page: usize,
    json: bool,
}

#[derive(Serialize)]
struct Report<'a> {
    profile: &'a Profile,
    filter: &'a str,
    sort: SortKey,
    page: usize,
    total_pages: usize,
    total_count: usize,
    repositories: &'a [Repository],
    #[serde(skip_serializing_if = "Option::is_none")]
    insight: Option<&'a InsightState>,
}

// Handles the 'user' subcommand
//
// Parameters:
//   fetcher:  orchestrator with an empty session cache
//   username: already trimmed and clipped to GitHub's length limit
//   view:     filter / sort / page requested on the command line
//   gemini:   Some(client) when --insight was passed
//
// Returns: exit code 0 on success, 1 when the lookup or the insight failed
async fn handle_user(
    fetcher: &ProfileFetcher,
    username: &str,
    view: ViewOptions,
    gemini: Option<GeminiClient>,
) -> Result<i32> {
    // Nothing else runs on this fetcher, so the cycle cannot be superseded
    let state = fetcher.load(username).await.unwrap_or_else(|| fetcher.current());

    let bundle = match state {
        TaskState::Success(bundle) => bundle,
        TaskState::Error(message) => {
            eprintln!("❌ {}", message);
            return Ok(1);
        }
        TaskState::Idle | TaskState::Loading => {
            eprintln!("Enter a GitHub username to get started.");
            return Ok(1);
        }
    };

    let mut browser = RepoBrowser::new(bundle.repositories.clone(), view.per_page);
    browser.set_query(view.filter.as_str());
    browser.set_sort(view.sort);
    browser.set_page(view.page);

    let insight = match gemini {
        Some(client) => {
            if !view.json {
                println!("✨ Generating AI insight for {}...", bundle.profile.login);
            }
            Some(InsightRequester::new(client, bundle.clone()).trigger().await)
        }
        None => None,
    };

    if view.json {
        let report = Report {
            profile: &bundle.profile,
            filter: browser.query(),
            sort: browser.sort_key(),
            page: browser.page(),
            total_pages: browser.total_pages(),
            total_count: browser.total_count(),
            repositories: browser.visible(),
            insight: insight.as_ref(),
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_profile(&bundle);
        print_repositories(&browser);
        if let Some(state) = &insight {
            print_insight(state);
        }
    }

    let insight_failed = insight.as_ref().is_some_and(|s| s.error_message().is_some());
    Ok(if insight_failed { 1 } else { 0 })
}

// Handles the 'watch' subcommand
//
// Each stdin line is a keystroke burst in a search box: it goes through the
// username debouncer, and only the settled value reaches the fetcher. Loads
// run as their own tasks so a slow one never blocks newer input.
//
// Lines starting with '/' act on the last loaded profile instead:
//   /filter <text>   refine by name (debounced like the filter box)
//   /sort <key>      stars, forks or updated
//   /next, /prev     page through the list
//
// Returns: exit code 0 once stdin is closed and every load has settled
async fn handle_watch(fetcher: &ProfileFetcher) -> Result<i32> {
    let mut usernames_in = Debouncer::new(String::new(), USERNAME_DEBOUNCE);
    let mut filters_in = Debouncer::new(String::new(), FILTER_DEBOUNCE);

    println!(
        "Type a GitHub username and press enter (Ctrl-D to quit). \
         Input settles after {}ms, filters after {}ms.",
        usernames_in.delay().as_millis(),
        filters_in.delay().as_millis()
    );
    println!("Commands: /filter <text>, /sort <stars|forks|updated>, /next, /prev");

    let mut usernames = usernames_in.subscribe();
    let mut filters = filters_in.subscribe();
    let mut states = fetcher.subscribe();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    // View over the most recent successful profile, None otherwise
    let mut browser: Option<RepoBrowser> = None;
    let mut stdin_open = true;
    let mut in_flight: Vec<JoinHandle<Option<FetchResult>>> = Vec::new();

    loop {
        tokio::select! {
            line = lines.next_line(), if stdin_open => match line.context("failed to read stdin")? {
                Some(line) => match WatchInput::parse(&line) {
                    WatchInput::Username(name) => usernames_in.push(name),
                    WatchInput::Filter(text) => filters_in.push(text),
                    WatchInput::Sort(key) => {
                        if let Some(b) = browser.as_mut() {
                            b.set_sort(key);
                            print_repositories(b);
                        }
                    }
                    WatchInput::NextPage => {
                        if let Some(b) = browser.as_mut() {
                            b.next_page();
                            print_repositories(b);
                        }
                    }
                    WatchInput::PrevPage => {
                        if let Some(b) = browser.as_mut() {
                            b.prev_page();
                            print_repositories(b);
                        }
                    }
                    WatchInput::Invalid(message) => println!("⚠️  {}", message),
                },
                None => stdin_open = false,
            },
            Ok(()) = usernames.changed() => {
                let username = usernames.borrow_and_update().clone();
                let fetcher = fetcher.clone();
                in_flight.push(tokio::spawn(async move { fetcher.load(&username).await }));
            },
            Ok(()) = filters.changed() => {
                let query = filters.borrow_and_update().clone();
                if let Some(b) = browser.as_mut() {
                    b.set_query(query);
                    print_repositories(b);
                }
            },
            Ok(()) = states.changed() => {
                let state = states.borrow_and_update().clone();
                print_fetch_state(&state);
                browser = watch_browser(&state, &filters_in.current());
                if let Some(b) = &browser {
                    print_repositories(b);
                }
            },
            _ = tokio::time::sleep(Duration::from_millis(50)), if !stdin_open => {
                in_flight.retain(|task| !task.is_finished());
                let settling = usernames_in.is_pending() || filters_in.is_pending();
                if !settling && in_flight.is_empty() {
                    break;
                }
            },
        }
    }

    if states.has_changed().unwrap_or(false) {
        print_fetch_state(&states.borrow_and_update());
    }
    Ok(0)
}

// A fresh browser for every successful load, with the current filter applied
fn watch_browser(state: &FetchResult, filter: &str) -> Option<RepoBrowser> {
    let bundle = state.data()?;
    let mut browser = RepoBrowser::new(bundle.repositories.clone(), DISPLAY_PAGE_SIZE);
    browser.set_query(filter);
    Some(browser)
}

// One stdin line in watch mode
#[derive(Debug, PartialEq)]
enum WatchInput {
    Username(String),
    Filter(String),
    Sort(SortKey),
    NextPage,
    PrevPage,
    Invalid(String),
}

impl WatchInput {
    fn parse(line: &str) -> Self {
        let line = line.trim();
        let Some(command) = line.strip_prefix('/') else {
            return WatchInput::Username(clip_username(line));
        };

        let (name, arg) = command.split_once(char::is_whitespace).unwrap_or((command, ""));
        let arg = arg.trim();
        match name {
            "filter" => WatchInput::Filter(arg.to_string()),
            "sort" => match arg.parse::<SortKey>() {
                Ok(key) => WatchInput::Sort(key),
                Err(e) => WatchInput::Invalid(e),
            },
            "next" => WatchInput::NextPage,
            "prev" => WatchInput::PrevPage,
            other => WatchInput::Invalid(format!("Unknown command '/{}'", other)),
        }
    }
}

fn print_fetch_state(state: &FetchResult) {
    match state {
        TaskState::Idle => println!("💤 Waiting for a username"),
        TaskState::Loading => println!("⏳ Fetching data..."),
        TaskState::Success(bundle) => {
            let p = &bundle.profile;
            println!(
                "✅ {} ({}) · {} repositories · {} followers · {} following",
                p.login,
                p.name_or_login(),
                bundle.repositories.len(),
                p.follower_count,
                p.following_count
            );
        }
        TaskState::Error(message) => println!("❌ {}", message),
    }
}

fn print_profile(bundle: &ProfileBundle) {
    let p = &bundle.profile;
    println!("👤 {} (@{})", p.name_or_login(), p.login);
    if let Some(bio) = p.bio.as_deref().filter(|b| !b.is_empty()) {
        println!("   {}", bio);
    }
    println!("   {}", p.profile_url);
    println!(
        "   📦 {} public repos   👥 {} followers   ➡️  {} following",
        p.public_repo_count, p.follower_count, p.following_count
    );
    println!();
}

// Prints the current page as a table, like the link-check results table
fn print_repositories(browser: &RepoBrowser) {
    if browser.is_empty() {
        println!("This user has no public repositories.");
        return;
    }

    println!(
        "📚 Repositories ({}) sorted by {}{}",
        browser.total_count(),
        browser.sort_key(),
        if browser.query().is_empty() {
            String::new()
        } else {
            format!(", filtered by '{}'", browser.query())
        }
    );
    println!("{:<40} {:>8} {:>8} {:<12} {:<20}", "NAME", "STARS", "FORKS", "UPDATED", "LANGUAGE");
    println!("{}", "=".repeat(92));

    for repo in browser.visible() {
        let name = if repo.name.chars().count() > 37 {
            format!("{}...", repo.name.chars().take(37).collect::<String>())
        } else {
            repo.name.clone()
        };
        println!(
            "{:<40} {:>8} {:>8} {:<12} {:<20}",
            name,
            repo.star_count,
            repo.fork_count,
            repo.last_updated_at.format("%Y-%m-%d").to_string(),
            repo.primary_language.as_deref().unwrap_or("-")
        );
    }

    println!();
    if browser.total_pages() > 1 {
        println!("Page {} of {}", browser.page(), browser.total_pages());
    } else if browser.visible().is_empty() {
        println!("No repositories on this page.");
    }
}

fn print_insight(state: &InsightState) {
    println!();
    match state {
        TaskState::Success(insight) => print_insight_details(insight),
        TaskState::Error(message) => println!("❌ {}", message),
        TaskState::Idle | TaskState::Loading => println!("No summary was generated."),
    }
}

fn print_insight_details(insight: &Insight) {
    println!("🧠 Developer Insight");
    println!("   {}", insight.main_expertise);

    let tech = &insight.technologies;
    for (label, items) in [
        ("Languages", &tech.languages),
        ("Frameworks & libraries", &tech.frameworks),
        ("Concepts", &tech.concepts),
    ] {
        if !items.is_empty() {
            println!("   {}: {}", label, items.join(", "));
        }
    }

    if !insight.strengths.is_empty() {
        println!("   Strengths:");
        for strength in &insight.strengths {
            println!("   - {}", strength);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gh_explorer::config::MAX_USERNAME_LENGTH;

    #[test]
    fn test_watch_input_parsing() {
        assert_eq!(WatchInput::parse("  octocat "), WatchInput::Username("octocat".into()));
        assert_eq!(WatchInput::parse(""), WatchInput::Username(String::new()));
        assert_eq!(WatchInput::parse("/filter  rust cli "), WatchInput::Filter("rust cli".into()));
        assert_eq!(WatchInput::parse("/filter"), WatchInput::Filter(String::new()));
        assert_eq!(WatchInput::parse("/sort forks"), WatchInput::Sort(SortKey::Forks));
        assert_eq!(WatchInput::parse("/next"), WatchInput::NextPage);
        assert_eq!(WatchInput::parse("/prev"), WatchInput::PrevPage);
        assert!(matches!(WatchInput::parse("/sort size"), WatchInput::Invalid(_)));
        assert!(matches!(WatchInput::parse("/quit"), WatchInput::Invalid(_)));
    }

    #[test]
    fn test_watch_input_clips_long_usernames() {
        let long = "x".repeat(MAX_USERNAME_LENGTH + 10);
        match WatchInput::parse(&long) {
            WatchInput::Username(name) => assert_eq!(name.len(), MAX_USERNAME_LENGTH),
            other => panic!("expected a username, got {:?}", other),
        }
    }

    #[test]
    fn test_watch_browser_applies_current_filter() {
        let repo = |id: u64, name: &str| -> Repository {
            serde_json::from_value(serde_json::json!({
                "id": id,
                "name": name,
                "html_url": format!("https://github.com/octocat/{}", name),
                "description": null,
                "language": "Rust",
                "stargazers_count": id,
                "forks_count": 0,
                "updated_at": "2024-01-01T00:00:00Z"
            }))
            .unwrap()
        };
        let profile: Profile = serde_json::from_value(serde_json::json!({
            "login": "octocat",
            "name": null,
            "avatar_url": "https://avatars.githubusercontent.com/u/1",
            "html_url": "https://github.com/octocat",
            "bio": null,
            "public_repos": 2,
            "followers": 0,
            "following": 0
        }))
        .unwrap();
        let state = FetchResult::Success(ProfileBundle {
            profile,
            repositories: vec![repo(1, "rust-cli"), repo(2, "dotfiles")],
        });

        let browser = watch_browser(&state, "rust").unwrap();
        assert_eq!(browser.query(), "rust");
        assert_eq!(browser.total_count(), 1);
        assert_eq!(browser.page(), 1);

        assert!(watch_browser(&FetchResult::Loading, "rust").is_none());
    }
}

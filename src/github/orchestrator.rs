// src/github/orchestrator.rs
// =============================================================================
// Fetch orchestration for one session: username in, FetchResult out.
//
// For every load(username):
// 1. Empty username        -> Idle, no network
// 2. Cached username       -> Success straight from the cache, no network
// 3. Anything else         -> Loading, then profile + repository crawl joined
//                             together; both must succeed, only then cache
//
// Ordering: each load() takes the next sequence number. A result is written
// to the shared state only while its number is still the latest one, so a
// slow response for "alic" can never overwrite the state for "alice".
// Nothing is cancelled on the network side, stale responses are just dropped.
// =============================================================================

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use futures::future::try_join;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use super::cache::ProfileCache;
use super::fetch::GitHubClient;
use super::models::ProfileBundle;
use crate::state::TaskState;

pub type FetchResult = TaskState<ProfileBundle>;

#[derive(Clone)]
pub struct ProfileFetcher {
    client: GitHubClient,
    cache: Arc<dyn ProfileCache>,
    latest: Arc<AtomicU64>,
    state: Arc<watch::Sender<FetchResult>>,
}

impl ProfileFetcher {
    pub fn new(client: GitHubClient, cache: Arc<dyn ProfileCache>) -> Self {
        let (state, _rx) = watch::channel(FetchResult::Idle);
        Self {
            client,
            cache,
            latest: Arc::new(AtomicU64::new(0)),
            state: Arc::new(state),
        }
    }

    /// Receives every state transition that was actually applied.
    pub fn subscribe(&self) -> watch::Receiver<FetchResult> {
        self.state.subscribe()
    }

    pub fn current(&self) -> FetchResult {
        self.state.borrow().clone()
    }

    // Runs one fetch cycle for `username`
    //
    // Parameters:
    //   username: the settled (debounced) input; "" means "nothing to show"
    //
    // Returns: the final state of this cycle, or None when a newer load()
    // superseded it before it finished (its result was discarded)
    pub async fn load(&self, username: &str) -> Option<FetchResult> {
        let seq = self.latest.fetch_add(1, Ordering::SeqCst) + 1;

        if username.is_empty() {
            return self.apply(seq, FetchResult::Idle);
        }

        if let Some(bundle) = self.cache.get(username) {
            debug!(seq, username, "cache hit");
            return self.apply(seq, FetchResult::Success(bundle));
        }

        self.apply(seq, FetchResult::Loading)?;
        info!(seq, username, "fetching profile and repositories");

        let result = try_join(
            self.client.fetch_profile(username),
            self.client.fetch_all_repos(username),
        )
        .await;

        let next = match result {
            Ok((profile, repositories)) => {
                let bundle = ProfileBundle { profile, repositories };
                // Even a superseded cycle fetched complete data; keeping it
                // makes switching back to this username free.
                self.cache.set(username.to_string(), bundle.clone());
                FetchResult::Success(bundle)
            }
            Err(err) => {
                warn!(seq, username, error = %err, "fetch failed");
                FetchResult::Error(err.to_string())
            }
        };

        self.apply(seq, next)
    }

    fn apply(&self, seq: u64, next: FetchResult) -> Option<FetchResult> {
        let mut applied = false;
        self.state.send_if_modified(|state| {
            if self.latest.load(Ordering::SeqCst) != seq {
                return false;
            }
            *state = next.clone();
            applied = true;
            true
        });

        if applied {
            Some(next)
        } else {
            debug!(seq, "dropping superseded result");
            None
        }
    }
}

// BEGINNER NOTES:
//
// 1. Why is ProfileFetcher Clone?
//    - Every field is an Arc, so a clone is a second handle to the SAME
//      sequence counter, cache and state channel
//    - The watch loop clones it into each spawned load task
//
// 2. What does send_if_modified() buy us?
//    - The closure runs while the channel holds its lock
//    - So "is my sequence number still the latest?" and "write the state"
//      happen as one step; no other load can slip in between
//
// 3. Why try_join and not join?
//    - try_join stops at the first error, and both halves must succeed
//      anyway: a profile without its repositories is not shown

#[cfg(test)]
mod tests {
    use super::*;
    use crate::github::cache::SessionCache;
    use crate::github::models::fixtures::{profile, profile_json, repo, repo_json};
    use crate::state::Status;
    use futures::FutureExt;
    use std::time::Duration;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn fetcher_for(server: &MockServer, cache: Arc<SessionCache>) -> ProfileFetcher {
        let client = GitHubClient::new(reqwest::Client::new(), &server.uri()).unwrap();
        ProfileFetcher::new(client, cache)
    }

    async fn mount_user(server: &MockServer, login: &str, repo_count: u64, delay: Duration) {
        Mock::given(method("GET"))
            .and(path(format!("/users/{login}")))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(profile_json(login))
                    .set_delay(delay),
            )
            .mount(server)
            .await;
        Mock::given(method("GET"))
            .and(path(format!("/users/{login}/repos")))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::Value::Array((0..repo_count).map(repo_json).collect()))
                    .set_delay(delay),
            )
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn test_empty_username_is_idle() {
        let server = MockServer::start().await;
        let fetcher = fetcher_for(&server, Arc::new(SessionCache::new()));

        let state = fetcher.load("").await.unwrap();
        assert_eq!(state, FetchResult::Idle);
        assert!(server.received_requests().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_successful_fetch_is_cached() {
        let server = MockServer::start().await;
        mount_user(&server, "octocat", 3, Duration::ZERO).await;
        let cache = Arc::new(SessionCache::new());
        let fetcher = fetcher_for(&server, cache.clone());

        let state = fetcher.load("octocat").await.unwrap();
        let bundle = state.data().unwrap();
        assert_eq!(bundle.profile.login, "octocat");
        assert_eq!(bundle.repositories.len(), 3);
        assert!(cache.contains("octocat"));
        assert_eq!(fetcher.current().status(), Status::Success);
    }

    #[tokio::test]
    async fn test_cache_hit_skips_network_and_resolves_immediately() {
        let server = MockServer::start().await;
        let cache = Arc::new(SessionCache::new());
        cache.set(
            "octocat".to_string(),
            ProfileBundle {
                profile: profile("octocat"),
                repositories: vec![repo(1, "hello-world", 10, 2, 3)],
            },
        );
        let fetcher = fetcher_for(&server, cache);

        // Resolves on the first poll: nothing to wait for.
        let state = fetcher.load("octocat").now_or_never().flatten().unwrap();
        assert_eq!(state.data().unwrap().repositories[0].name, "hello-world");
        assert!(server.received_requests().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_not_found_is_error_and_not_cached() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/users/ghost-user-404"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/users/ghost-user-404/repos"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;
        let cache = Arc::new(SessionCache::new());
        let fetcher = fetcher_for(&server, cache.clone());

        let state = fetcher.load("ghost-user-404").await.unwrap();
        assert_eq!(state.error_message(), Some("User 'ghost-user-404' not found."));
        assert!(state.data().is_none());
        assert!(cache.is_empty());
    }

    #[tokio::test]
    async fn test_repository_failure_fails_whole_cycle() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/users/octocat"))
            .respond_with(ResponseTemplate::new(200).set_body_json(profile_json("octocat")))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/users/octocat/repos"))
            .respond_with(ResponseTemplate::new(403))
            .mount(&server)
            .await;
        let cache = Arc::new(SessionCache::new());
        let fetcher = fetcher_for(&server, cache.clone());

        let state = fetcher.load("octocat").await.unwrap();
        assert_eq!(
            state.error_message(),
            Some("API rate limit exceeded. Please try again later.")
        );
        assert!(cache.is_empty());
    }

    #[tokio::test]
    async fn test_stale_response_never_overwrites_newer_username() {
        let server = MockServer::start().await;
        mount_user(&server, "slowpoke", 2, Duration::from_millis(300)).await;
        mount_user(&server, "speedy", 1, Duration::ZERO).await;
        let cache = Arc::new(SessionCache::new());
        let fetcher = fetcher_for(&server, cache.clone());

        let slow = {
            let fetcher = fetcher.clone();
            tokio::spawn(async move { fetcher.load("slowpoke").await })
        };
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(fetcher.current().is_loading());

        let fast = fetcher.load("speedy").await.unwrap();
        assert_eq!(fast.data().unwrap().profile.login, "speedy");

        // The slow cycle finishes later and is dropped.
        assert!(slow.await.unwrap().is_none());
        assert_eq!(fetcher.current().data().unwrap().profile.login, "speedy");

        // Its data was complete, so it still went into the cache.
        assert!(cache.contains("slowpoke"));
        assert!(cache.contains("speedy"));
        let again = fetcher.load("slowpoke").await.unwrap();
        assert_eq!(again.data().unwrap().repositories.len(), 2);
    }

    #[tokio::test]
    async fn test_empty_username_supersedes_in_flight_fetch() {
        let server = MockServer::start().await;
        mount_user(&server, "slowpoke", 1, Duration::from_millis(200)).await;
        let fetcher = fetcher_for(&server, Arc::new(SessionCache::new()));

        let slow = {
            let fetcher = fetcher.clone();
            tokio::spawn(async move { fetcher.load("slowpoke").await })
        };
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert_eq!(fetcher.load("").await, Some(FetchResult::Idle));

        assert!(slow.await.unwrap().is_none());
        assert_eq!(fetcher.current(), FetchResult::Idle);
    }

    #[tokio::test]
    async fn test_subscriber_sees_loading_then_success() {
        let server = MockServer::start().await;
        mount_user(&server, "octocat", 1, Duration::from_millis(100)).await;
        let fetcher = fetcher_for(&server, Arc::new(SessionCache::new()));
        let mut rx = fetcher.subscribe();

        let task = {
            let fetcher = fetcher.clone();
            tokio::spawn(async move { fetcher.load("octocat").await })
        };

        rx.changed().await.unwrap();
        assert!(rx.borrow_and_update().is_loading());
        rx.changed().await.unwrap();
        assert_eq!(rx.borrow_and_update().status(), Status::Success);
        task.await.unwrap();
    }
}

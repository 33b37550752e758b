// src/insight/mod.rs
// =============================================================================
// AI insight for one loaded profile.
//
// Submodules:
// - digest: top repositories / languages and the prompt built from them
// - gemini: HTTP client for the generative-language endpoint
//
// InsightRequester is the state machine the presentation layer talks to:
//
//   Idle --trigger()--> Loading --> Success(Insight)
//                               \-> Error(message)
//
// It is created per profile: when the user loads another profile the old
// requester (and its state) is simply dropped. It never retries on its own,
// and it does not deduplicate overlapping triggers; the caller disables the
// trigger while state() is Loading.
// =============================================================================

mod digest;
mod gemini;

use std::sync::Arc;

use tokio::sync::watch;
use tracing::{info, warn};

pub use digest::{build_user_query, top_languages, top_repos_by_stars, SYSTEM_PROMPT};
pub use gemini::{GeminiClient, Insight, Technologies};

use crate::error::{ExplorerError, Result};
use crate::github::ProfileBundle;
use crate::state::TaskState;

pub type InsightState = TaskState<Insight>;

pub struct InsightRequester {
    client: GeminiClient,
    bundle: Arc<ProfileBundle>,
    state: watch::Sender<InsightState>,
}

impl InsightRequester {
    pub fn new(client: GeminiClient, bundle: impl Into<Arc<ProfileBundle>>) -> Self {
        let (state, _rx) = watch::channel(InsightState::Idle);
        Self {
            client,
            bundle: bundle.into(),
            state,
        }
    }

    pub fn state(&self) -> InsightState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<InsightState> {
        self.state.subscribe()
    }

    // Runs one full request cycle
    //
    // Returns: the state it ended in (Success or Error), which is also what
    // subscribers see last
    pub async fn trigger(&self) -> InsightState {
        // A missing key goes straight to Error, no Loading and no request.
        if !self.client.has_api_key() {
            warn!(login = %self.bundle.profile.login, "no Gemini API key configured");
            return self.finish(Err(ExplorerError::missing_api_key()));
        }

        self.state.send_replace(InsightState::Loading);

        info!(login = %self.bundle.profile.login, "generating developer insight");
        let result = self.client.generate_insight(&self.bundle).await;
        if let Err(err) = &result {
            warn!(error = %err, "developer insight failed");
        }
        self.finish(result)
    }

    fn finish(&self, result: Result<Insight>) -> InsightState {
        let next = InsightState::from(result);
        self.state.send_replace(next.clone());
        next
    }
}

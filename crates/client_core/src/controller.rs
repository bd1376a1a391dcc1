use std::{
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc,
    },
    time::Duration,
};

use shared::domain::ActivityCatalog;
use tokio::sync::Mutex;
use tracing::{error, info, warn};

use crate::{
    error::RosterError,
    settings::ClientSettings,
    transport::RosterApi,
    view::{RosterView, StatusMessage},
};

pub const LOAD_FAILURE_TEXT: &str = "Failed to load activities. Please try again later.";
pub const SIGNUP_REJECTED_FALLBACK: &str = "An error occurred";
pub const SIGNUP_FAILURE_TEXT: &str = "Failed to sign up. Please try again.";
pub const UNREGISTER_REJECTED_FALLBACK: &str = "Failed to unregister participant";
pub const UNREGISTER_FAILURE_TEXT: &str = "Failed to unregister participant. Please try again.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RosterPhase {
    NotLoaded,
    Loaded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    Applied,
    Failed,
    /// A newer load or an unregister patch was issued while this one was in
    /// flight; its result was dropped.
    Superseded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignupOutcome {
    Accepted,
    Rejected,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnregisterOutcome {
    Removed,
    Rejected,
    Failed,
}

struct RosterState {
    catalog: ActivityCatalog,
    phase: RosterPhase,
}

/// Drives the roster page: catalog loading, signup and participant removal.
///
/// The controller owns the in-memory catalog. Views are only ever told what
/// changed; they never read state back.
pub struct RosterController {
    api: Arc<dyn RosterApi>,
    view: Arc<dyn RosterView>,
    status_hide_after: Duration,
    state: Mutex<RosterState>,
    latest_token: AtomicU64,
}

impl RosterController {
    pub fn new(
        api: Arc<dyn RosterApi>,
        view: Arc<dyn RosterView>,
        settings: &ClientSettings,
    ) -> Self {
        Self {
            api,
            view,
            status_hide_after: settings.status_hide_after,
            state: Mutex::new(RosterState {
                catalog: ActivityCatalog::new(),
                phase: RosterPhase::NotLoaded,
            }),
            latest_token: AtomicU64::new(0),
        }
    }

    pub async fn catalog(&self) -> ActivityCatalog {
        self.state.lock().await.catalog.clone()
    }

    pub async fn phase(&self) -> RosterPhase {
        self.state.lock().await.phase
    }

    fn issue_token(&self) -> u64 {
        self.latest_token.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn is_latest(&self, token: u64) -> bool {
        self.latest_token.load(Ordering::SeqCst) == token
    }

    /// Fetches the catalog and re-renders the activity list. Failures are
    /// rendered and logged, never returned.
    pub async fn load_activities(&self) -> LoadOutcome {
        let token = self.issue_token();
        let result = self.api.fetch_activities().await;

        let mut state = self.state.lock().await;
        if !self.is_latest(token) {
            warn!(token, "roster: dropping superseded catalog load");
            return LoadOutcome::Superseded;
        }

        match result {
            Ok(catalog) => {
                self.view.show_catalog(&catalog);
                info!(token, activities = catalog.len(), "roster: catalog applied");
                state.catalog = catalog;
                state.phase = RosterPhase::Loaded;
                LoadOutcome::Applied
            }
            Err(err) => {
                error!("roster: error fetching activities: {err}");
                self.view.show_load_failure(LOAD_FAILURE_TEXT);
                LoadOutcome::Failed
            }
        }
    }

    /// Handles a signup form submission. On success the form is cleared and
    /// the whole catalog is reloaded.
    pub async fn submit_signup(&self, email: &str, activity: &str) -> SignupOutcome {
        match self.api.signup(activity, email).await {
            Ok(response) => {
                info!(activity, "roster: signup accepted");
                self.show_status(StatusMessage::success(response.message));
                self.view.reset_form();
                self.load_activities().await;
                SignupOutcome::Accepted
            }
            Err(err) if err.is_rejection() => {
                warn!(activity, "roster: signup rejected: {err}");
                let text = err.detail().unwrap_or(SIGNUP_REJECTED_FALLBACK);
                self.show_status(StatusMessage::error(text));
                SignupOutcome::Rejected
            }
            Err(err) => {
                error!(activity, "roster: error signing up: {err}");
                self.show_status(StatusMessage::error(SIGNUP_FAILURE_TEXT));
                SignupOutcome::Failed
            }
        }
    }

    /// Handles a click on a participant's remove control. Success patches the
    /// catalog and the view in place without refetching.
    pub async fn unregister(&self, email: &str, activity: &str) -> UnregisterOutcome {
        match self.api.unregister(activity, email).await {
            Ok(_) => {
                let mut state = self.state.lock().await;
                // Any load still in flight predates this removal.
                self.issue_token();
                let remaining = state.catalog.remove_participant(activity, email);
                self.view.remove_participant(activity, email);
                if remaining == Some(0) {
                    self.view.show_no_participants(activity);
                }
                info!(activity, ?remaining, "roster: participant removed");
                UnregisterOutcome::Removed
            }
            Err(err) => self.report_unregister_failure(activity, &err),
        }
    }

    fn report_unregister_failure(&self, activity: &str, err: &RosterError) -> UnregisterOutcome {
        if err.is_rejection() {
            warn!(activity, "roster: unregister rejected: {err}");
            self.view
                .alert(err.detail().unwrap_or(UNREGISTER_REJECTED_FALLBACK));
            UnregisterOutcome::Rejected
        } else {
            error!(activity, "roster: error unregistering participant: {err}");
            self.view.alert(UNREGISTER_FAILURE_TEXT);
            UnregisterOutcome::Failed
        }
    }

    // Each message schedules its own hide; an earlier timer is not cancelled
    // and may hide a newer message early.
    fn show_status(&self, status: StatusMessage) {
        self.view.show_status(&status);
        let view = Arc::clone(&self.view);
        let delay = self.status_hide_after;
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            view.hide_status();
        });
    }
}

#[cfg(test)]
#[path = "tests/controller_tests.rs"]
mod tests;

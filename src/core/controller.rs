use std::sync::Arc;

use thiserror::Error;
use tokio::sync::watch;
use tracing::{debug, error, info, warn};

use crate::core::state::{Resource, ResourceKind, ViewState};
use crate::models::{same_selection, PreferenceChange, PreferenceWrite, Student};
use crate::services::{ApiError, TwinApi};

/// Errors surfaced by controller operations
#[derive(Debug, Error)]
pub enum ControllerError {
    #[error("API error: {0}")]
    Api(#[from] ApiError),
}

/// Result of a call to [`PreferenceController::save`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    /// The server confirmed the write and now holds this preference
    Saved(Option<Student>),
    /// Pending selection already matches the committed preference, nothing sent
    Unchanged,
    /// Another save is still outstanding, nothing sent
    InFlight,
}

/// Result of [`PreferenceController::load`] or [`PreferenceController::retry_failed`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub failed: Vec<ResourceKind>,
}

impl LoadReport {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Controller behind the preference page
///
/// Owns the [`ViewState`] and publishes it through a `watch` channel, so every
/// mutation is visible to subscribers as soon as it happens. State is only
/// changed through `load`, `select` and `save`.
///
/// # Save policy
/// - A save while another is in flight is ignored.
/// - A save whose pending selection matches the committed preference is a no-op.
/// - The committed preference is taken from the server's response.
pub struct PreferenceController {
    api: Arc<dyn TwinApi>,
    state: watch::Sender<ViewState>,
}

impl PreferenceController {
    pub fn new(api: Arc<dyn TwinApi>) -> Self {
        Self {
            api,
            state: watch::Sender::new(ViewState::default()),
        }
    }

    /// Subscribe to state changes. The receiver sees the current state immediately.
    pub fn subscribe(&self) -> watch::Receiver<ViewState> {
        self.state.subscribe()
    }

    /// Copy of the current state
    pub fn snapshot(&self) -> ViewState {
        self.state.borrow().clone()
    }

    /// Issue the three initial fetches concurrently
    ///
    /// Each result is applied as soon as its own request completes; there is no
    /// ordering between them. A failed fetch leaves its resource `Failed` and is
    /// reported, the others are unaffected.
    pub async fn load(&self) -> LoadReport {
        info!("Loading roster, user and preference");

        let (roster, user, preference) = tokio::join!(
            self.load_roster(),
            self.load_user(),
            self.load_preference(),
        );

        Self::report([roster, user, preference])
    }

    /// Re-issue only the fetches that failed previously
    pub async fn retry_failed(&self) -> LoadReport {
        let snapshot = self.snapshot();
        let retry_roster = snapshot.resource_failed(ResourceKind::Roster);
        let retry_user = snapshot.resource_failed(ResourceKind::User);
        let retry_preference = snapshot.resource_failed(ResourceKind::Preference);

        if !(retry_roster || retry_user || retry_preference) {
            debug!("Nothing to retry");
            return LoadReport::default();
        }

        let (roster, user, preference) = tokio::join!(
            async {
                if retry_roster {
                    self.load_roster().await
                } else {
                    None
                }
            },
            async {
                if retry_user {
                    self.load_user().await
                } else {
                    None
                }
            },
            async {
                if retry_preference {
                    self.load_preference().await
                } else {
                    None
                }
            },
        );

        Self::report([roster, user, preference])
    }

    fn report(results: [Option<ResourceKind>; 3]) -> LoadReport {
        let failed: Vec<ResourceKind> = results.into_iter().flatten().collect();
        if !failed.is_empty() {
            warn!("Initial load incomplete, failed: {:?}", failed);
        }
        LoadReport { failed }
    }

    async fn load_roster(&self) -> Option<ResourceKind> {
        self.state.send_modify(|s| s.roster = Resource::Loading);

        match self.api.fetch_students().await {
            Ok(students) => {
                debug!("Roster loaded with {} students", students.len());
                self.state.send_modify(|s| s.roster = Resource::Loaded(students));
                None
            }
            Err(e) => {
                warn!("Failed to load roster: {}", e);
                self.state
                    .send_modify(|s| s.roster = Resource::Failed(e.to_string()));
                Some(ResourceKind::Roster)
            }
        }
    }

    async fn load_user(&self) -> Option<ResourceKind> {
        self.state.send_modify(|s| s.user = Resource::Loading);

        match self.api.fetch_user().await {
            Ok(user) => {
                debug!("Current user is {}", user.username);
                self.state.send_modify(|s| s.user = Resource::Loaded(user));
                None
            }
            Err(e) => {
                warn!("Failed to load current user: {}", e);
                self.state
                    .send_modify(|s| s.user = Resource::Failed(e.to_string()));
                Some(ResourceKind::User)
            }
        }
    }

    async fn load_preference(&self) -> Option<ResourceKind> {
        self.state.send_modify(|s| s.preference = Resource::Loading);

        match self.api.fetch_preference().await {
            Ok(preference) => {
                debug!(
                    "Preference loaded: {:?}",
                    preference.as_ref().map(|p| p.student_number)
                );
                self.state.send_modify(|s| {
                    // A selection made before the preference arrived wins
                    if !s.touched {
                        s.pending = preference.clone();
                    }
                    s.preference = Resource::Loaded(preference);
                });
                None
            }
            Err(e) => {
                warn!("Failed to load preference: {}", e);
                self.state
                    .send_modify(|s| s.preference = Resource::Failed(e.to_string()));
                Some(ResourceKind::Preference)
            }
        }
    }

    /// Set the pending selection. `None` clears it. Never contacts the server.
    pub fn select(&self, candidate: Option<Student>) {
        debug!(
            "Selected {:?}",
            candidate.as_ref().map(|c| c.student_number)
        );

        self.state.send_modify(|s| {
            s.pending = candidate;
            s.touched = true;
        });
    }

    /// Persist the pending selection if it differs from the committed preference
    pub async fn save(&self) -> Result<SaveOutcome, ControllerError> {
        let mut outcome = None;
        let mut write = PreferenceWrite::NoPreference;

        self.state.send_if_modified(|s| {
            if s.save_in_flight {
                outcome = Some(SaveOutcome::InFlight);
                return false;
            }
            if same_selection(s.pending(), s.preference()) {
                outcome = Some(SaveOutcome::Unchanged);
                return false;
            }

            write = PreferenceWrite::from(s.pending());
            s.save_in_flight = true;
            true
        });

        if let Some(outcome) = outcome {
            debug!("Save skipped: {:?}", outcome);
            return Ok(outcome);
        }

        info!("Saving preference: {:?}", write);

        match self.api.save_preference(&write).await {
            Ok(confirmed) => {
                info!(
                    "Preference confirmed: {:?}",
                    confirmed.as_ref().map(|c| c.student_number)
                );
                self.state.send_modify(|s| {
                    s.save_in_flight = false;
                    s.last_error = None;
                    s.history.push(PreferenceChange::now(confirmed.clone()));
                    s.preference = Resource::Loaded(confirmed.clone());
                });
                Ok(SaveOutcome::Saved(confirmed))
            }
            Err(e) => {
                error!("Failed to save preference: {}", e);
                self.state.send_modify(|s| {
                    s.save_in_flight = false;
                    s.last_error = Some(e.to_string());
                });
                Err(e.into())
            }
        }
    }
}

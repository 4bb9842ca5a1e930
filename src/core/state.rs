use std::fmt;

use crate::models::{same_selection, CurrentUser, PreferenceChange, Student};

/// Load state of one of the three initial fetches
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resource<T> {
    Loading,
    Loaded(T),
    Failed(String),
}

impl<T> Default for Resource<T> {
    fn default() -> Self {
        Resource::Loading
    }
}

impl<T> Resource<T> {
    pub fn loaded(&self) -> Option<&T> {
        match self {
            Resource::Loaded(value) => Some(value),
            _ => None,
        }
    }

    pub fn is_loaded(&self) -> bool {
        matches!(self, Resource::Loaded(_))
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Resource::Failed(_))
    }
}

/// Which of the initial fetches a report or resource refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Roster,
    User,
    Preference,
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ResourceKind::Roster => "roster",
            ResourceKind::User => "user",
            ResourceKind::Preference => "preference",
        };
        f.write_str(name)
    }
}

/// Everything the preference page renders
///
/// Fields are only written by [`PreferenceController`](super::PreferenceController);
/// observers get read access through the getters.
#[derive(Debug, Clone, Default)]
pub struct ViewState {
    pub(crate) roster: Resource<Vec<Student>>,
    pub(crate) user: Resource<CurrentUser>,
    pub(crate) preference: Resource<Option<Student>>,
    pub(crate) pending: Option<Student>,
    pub(crate) touched: bool,
    pub(crate) save_in_flight: bool,
    pub(crate) last_error: Option<String>,
    pub(crate) history: Vec<PreferenceChange>,
}

impl ViewState {
    /// Loaded roster, empty while loading or after a failed fetch
    pub fn roster(&self) -> &[Student] {
        self.roster.loaded().map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn roster_resource(&self) -> &Resource<Vec<Student>> {
        &self.roster
    }

    pub fn user(&self) -> Option<&CurrentUser> {
        self.user.loaded()
    }

    pub fn user_resource(&self) -> &Resource<CurrentUser> {
        &self.user
    }

    /// The server-confirmed preference. An unloaded preference counts as none.
    pub fn preference(&self) -> Option<&Student> {
        self.preference.loaded().and_then(Option::as_ref)
    }

    pub fn preference_resource(&self) -> &Resource<Option<Student>> {
        &self.preference
    }

    /// The user's unsaved choice
    pub fn pending(&self) -> Option<&Student> {
        self.pending.as_ref()
    }

    /// True once the user has selected or cleared anything
    pub fn is_touched(&self) -> bool {
        self.touched
    }

    pub fn is_saving(&self) -> bool {
        self.save_in_flight
    }

    /// True when saving would send a write
    pub fn is_dirty(&self) -> bool {
        !same_selection(self.pending(), self.preference())
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn history(&self) -> &[PreferenceChange] {
        &self.history
    }

    pub fn resource_failed(&self, kind: ResourceKind) -> bool {
        match kind {
            ResourceKind::Roster => self.roster.is_failed(),
            ResourceKind::User => self.user.is_failed(),
            ResourceKind::Preference => self.preference.is_failed(),
        }
    }

    /// True once all three initial fetches have succeeded
    pub fn is_ready(&self) -> bool {
        self.roster.is_loaded() && self.user.is_loaded() && self.preference.is_loaded()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_state_is_loading_and_clean() {
        let state = ViewState::default();
        assert_eq!(state.roster_resource(), &Resource::Loading);
        assert!(state.roster().is_empty());
        assert!(state.preference().is_none());
        assert!(!state.is_dirty());
        assert!(!state.is_saving());
        assert!(!state.is_ready());
    }

    #[test]
    fn test_dirty_compares_by_student_number() {
        let mut state = ViewState {
            preference: Resource::Loaded(Some(Student::new(1, "Ann"))),
            pending: Some(Student::new(1, "Ann").with_reciprocal(true)),
            ..Default::default()
        };
        assert!(!state.is_dirty());

        state.pending = None;
        assert!(state.is_dirty());
    }

    #[test]
    fn test_resource_kind_display() {
        assert_eq!(ResourceKind::Roster.to_string(), "roster");
        assert_eq!(ResourceKind::Preference.to_string(), "preference");
    }
}

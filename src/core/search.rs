//! Autocomplete wiring for the student search box
//!
//! The widget itself (matching, dropdown, keyboard handling) lives outside this
//! crate. This module supplies its data source and reacts to its two signals.

use crate::core::controller::PreferenceController;
use crate::models::Student;

/// Class applied to dropdown items for students who picked the current user
pub const RECIPROCAL_CLASS: &str = "reciprocal";

/// One autocomplete entry: the text shown and the student behind it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Suggestion {
    pub label: String,
    pub student: Student,
}

/// Roster projected into autocomplete entries, in roster order
#[derive(Debug, Clone, Default)]
pub struct Suggestions {
    items: Vec<Suggestion>,
}

impl Suggestions {
    pub fn from_roster(roster: &[Student]) -> Self {
        let items = roster
            .iter()
            .map(|student| Suggestion {
                label: student.name.clone(),
                student: student.clone(),
            })
            .collect();

        Self { items }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Suggestion> {
        self.items.iter()
    }

    /// Case-insensitive substring match on the label. An empty term matches everything.
    pub fn filter(&self, term: &str) -> Vec<&Suggestion> {
        let needle = term.trim().to_lowercase();
        if needle.is_empty() {
            return self.items.iter().collect();
        }

        self.items
            .iter()
            .filter(|s| s.label.to_lowercase().contains(&needle))
            .collect()
    }
}

/// How a dropdown item should be drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderedItem<'a> {
    pub label: &'a str,
    pub class: Option<&'static str>,
}

/// Item render hook: reciprocal students get [`RECIPROCAL_CLASS`]
pub fn render_item(suggestion: &Suggestion) -> RenderedItem<'_> {
    RenderedItem {
        label: &suggestion.label,
        class: suggestion.student.reciprocal.then_some(RECIPROCAL_CLASS),
    }
}

impl PreferenceController {
    /// Autocomplete source for the currently loaded roster
    pub fn suggestions(&self) -> Suggestions {
        Suggestions::from_roster(self.snapshot().roster())
    }

    /// Widget signal: an item was picked from the dropdown
    pub fn on_item_chosen(&self, suggestion: &Suggestion) {
        self.select(Some(suggestion.student.clone()));
    }

    /// Widget signal: the input text changed. Emptying the box clears the selection.
    pub fn on_input_changed(&self, text: &str) {
        if text.is_empty() {
            self.select(None);
        }
    }
}

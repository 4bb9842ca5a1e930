// Core controller exports
pub mod controller;
pub mod search;
pub mod state;

pub use controller::{ControllerError, LoadReport, PreferenceController, SaveOutcome};
pub use search::{render_item, RenderedItem, Suggestion, Suggestions, RECIPROCAL_CLASS};
pub use state::{Resource, ResourceKind, ViewState};

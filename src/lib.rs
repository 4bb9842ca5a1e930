//! TWIN client - preference selection for the TWIN student pairing service
//!
//! This library drives the "who do you want to pair with" page: it loads the
//! roster, the current user and their stored preference, tracks the user's
//! pending choice and writes it back to the server only when it changed.

pub mod config;
pub mod core;
#[cfg(feature = "debug-quickswitch")]
pub mod debug;
pub mod models;
pub mod services;

// Re-export commonly used types
pub use crate::core::{LoadReport, PreferenceController, SaveOutcome, Suggestions, ViewState};
pub use models::{CurrentUser, PreferenceWrite, Student};
pub use services::{ApiError, HttpTwinApi, TwinApi};

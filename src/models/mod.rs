// Model exports
pub mod domain;
pub mod requests;

pub use domain::{same_selection, CurrentUser, PreferenceChange, Student};
pub use requests::PreferenceWrite;

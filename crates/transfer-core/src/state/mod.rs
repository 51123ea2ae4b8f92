//! Session state for the live transfer submission.

mod submission;

pub use submission::SessionState;

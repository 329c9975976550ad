//! Submissions domain - candidate listings and their review lifecycle

pub mod activities;
pub mod data;
pub mod error;
pub mod models;
pub mod validation;

// Re-export commonly used types
pub use data::{CreateSubmissionInput, SubmissionData, UpdateSubmissionInput};
pub use error::SubmissionError;
pub use models::{Submission, SubmissionFilter, SubmissionStatus};

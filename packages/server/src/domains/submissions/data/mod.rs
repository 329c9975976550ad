pub mod submission;

pub use submission::{CreateSubmissionInput, SubmissionData, UpdateSubmissionInput};

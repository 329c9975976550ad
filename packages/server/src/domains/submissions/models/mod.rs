pub mod drafts;
pub mod patch;
pub mod status;
pub mod submission;

pub use drafts::*;
pub use patch::{SubmissionChanges, SubmissionPatch};
pub use status::{StatusFlags, SubmissionStatus};
pub use submission::{NewSubmission, Submission, SubmissionFilter};

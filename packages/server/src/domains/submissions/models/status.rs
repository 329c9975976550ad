use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Review status of a submission.
///
/// The only stored representation of a submission's lifecycle state. The
/// public `isApproved` / `isRejected` / `isUnderReview` flags are derived from
/// it with [`SubmissionStatus::flags`].
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SubmissionStatus {
    Pending,
    UnderReview,
    Approved,
    Rejected,
}

impl std::fmt::Display for SubmissionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SubmissionStatus::Pending => write!(f, "PENDING"),
            SubmissionStatus::UnderReview => write!(f, "UNDER_REVIEW"),
            SubmissionStatus::Approved => write!(f, "APPROVED"),
            SubmissionStatus::Rejected => write!(f, "REJECTED"),
        }
    }
}

impl std::str::FromStr for SubmissionStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "PENDING" => Ok(SubmissionStatus::Pending),
            "UNDER_REVIEW" => Ok(SubmissionStatus::UnderReview),
            "APPROVED" => Ok(SubmissionStatus::Approved),
            "REJECTED" => Ok(SubmissionStatus::Rejected),
            _ => Err(anyhow::anyhow!("Invalid submission status: {}", s)),
        }
    }
}

/// The public boolean view of a status. At most one flag is ever true.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatusFlags {
    pub is_under_review: bool,
    pub is_approved: bool,
    pub is_rejected: bool,
}

impl SubmissionStatus {
    pub fn flags(self) -> StatusFlags {
        StatusFlags {
            is_under_review: self == SubmissionStatus::UnderReview,
            is_approved: self == SubmissionStatus::Approved,
            is_rejected: self == SubmissionStatus::Rejected,
        }
    }

    /// Inverse of [`flags`](Self::flags). All-false is `Pending`; more than one
    /// true flag has no status.
    pub fn from_flags(flags: StatusFlags) -> Option<Self> {
        match (flags.is_under_review, flags.is_approved, flags.is_rejected) {
            (false, false, false) => Some(SubmissionStatus::Pending),
            (true, false, false) => Some(SubmissionStatus::UnderReview),
            (false, true, false) => Some(SubmissionStatus::Approved),
            (false, false, true) => Some(SubmissionStatus::Rejected),
            _ => None,
        }
    }

    pub fn is_approved(self) -> bool {
        self == SubmissionStatus::Approved
    }
}

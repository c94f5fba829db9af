//! Write-once audit log of captured submissions (`browsingNetwork` key).
//!
//! Entries are appended at capture time and never updated. The `status`
//! field is a fixed capture marker kept for layout compatibility; it does
//! not follow the submission's own status and nothing reads it back.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::submission::{Submission, SubmissionId};

/// Contact details copied from the submission at capture time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserInfo {
    pub name: String,
    pub email: String,
    pub phone: String,
}

/// Marker recorded on every audit entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CaptureMarker {
    #[default]
    Submitted,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackingRecord {
    pub submission_id: SubmissionId,
    pub timestamp: DateTime<Utc>,
    pub user_info: UserInfo,
    pub service: String,
    pub status: CaptureMarker,
}

impl From<&Submission> for TrackingRecord {
    fn from(s: &Submission) -> Self {
        Self {
            submission_id: s.id.clone(),
            timestamp: s.timestamp,
            user_info: UserInfo {
                name: s.name.clone(),
                email: s.email.clone(),
                phone: s.phone.clone(),
            },
            service: s.service.clone(),
            status: CaptureMarker::Submitted,
        }
    }
}

pub mod badge;
pub mod clock;
pub mod export;
pub mod form;
pub mod handoff;
pub mod retention;
pub mod storage;
pub mod store;
pub mod submission;
pub mod theme;
pub mod tracking;

pub use badge::{BadgeProjection, BadgeState};
pub use clock::{Clock, ManualClock};
#[cfg(feature = "std")]
pub use clock::SystemClock;
pub use storage::{MemoryScope, StorageError, StorageScope};
pub use store::SubmissionStore;
pub use submission::{ContactMethod, Submission, SubmissionDraft, SubmissionId, SubmissionStatus};

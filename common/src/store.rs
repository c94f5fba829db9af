//! Persisted submission history.
//!
//! Two blobs live in the storage scope: the submission collection and the
//! write-once tracking log. Every operation re-reads the scope, so changes
//! made through another handle to the same scope are always observed. A
//! missing, unreadable, or corrupt blob reads as an empty collection.

use std::sync::Mutex;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::clock::Clock;
use crate::export::{self, ExportArtifact, ExportFormat, CSV_MEDIA_TYPE};
use crate::retention::RetentionPolicy;
use crate::storage::StorageScope;
use crate::submission::{IdGenerator, Submission, SubmissionDraft, SubmissionId, SubmissionStatus};
use crate::tracking::TrackingRecord;

pub const SUBMISSIONS_KEY: &str = "submissions";
pub const TRACKING_KEY: &str = "browsingNetwork";

pub struct SubmissionStore<S, C> {
    scope: S,
    clock: C,
    retention: RetentionPolicy,
    export_format: ExportFormat,
    file_prefix: Option<String>,
    ids: Mutex<IdGenerator>,
}

impl<S: StorageScope, C: Clock> SubmissionStore<S, C> {
    pub fn new(scope: S, clock: C) -> Self {
        Self {
            scope,
            clock,
            retention: RetentionPolicy::default(),
            export_format: ExportFormat::default(),
            file_prefix: None,
            ids: Mutex::new(IdGenerator::new()),
        }
    }

    pub fn with_retention(mut self, retention: RetentionPolicy) -> Self {
        self.retention = retention;
        self
    }

    pub fn with_export_format(mut self, format: ExportFormat) -> Self {
        self.export_format = format;
        self
    }

    /// Prefix for export file names, e.g. the business name.
    pub fn with_file_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.file_prefix = Some(prefix.into());
        self
    }

    pub fn scope(&self) -> &S {
        &self.scope
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Append a submission and write the whole collection back.
    ///
    /// The caller supplies a unique id; nothing is deduplicated.
    pub fn append(&self, submission: Submission) {
        let mut submissions: Vec<Submission> = self.read_collection(SUBMISSIONS_KEY);
        tracing::debug!(id = %submission.id, stored = submissions.len(), "appending submission");
        submissions.push(submission);
        let dropped = self.retention.apply(&mut submissions, self.clock.now());
        if dropped > 0 {
            tracing::info!(dropped, policy = ?self.retention, "retention evicted submissions");
        }
        self.write_collection(SUBMISSIONS_KEY, &submissions);
    }

    /// All submissions, newest first. Equal timestamps keep insertion order.
    pub fn list(&self) -> Vec<Submission> {
        let mut submissions: Vec<Submission> = self.read_collection(SUBMISSIONS_KEY);
        // `sort_by` is stable.
        submissions.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        submissions
    }

    pub fn pending_count(&self) -> usize {
        self.list().iter().filter(|s| s.is_pending()).count()
    }

    /// Remove the submission collection and the tracking log.
    pub fn clear(&self) {
        for key in [SUBMISSIONS_KEY, TRACKING_KEY] {
            if let Err(e) = self.scope.remove(key) {
                tracing::warn!(key, error = %e, "failed to remove stored history");
            }
        }
        tracing::info!("submission history cleared");
    }

    /// The history as CSV text, newest first. Header only when empty.
    pub fn export_as_delimited_text(&self) -> String {
        export::render_table(&self.list(), self.export_format)
    }

    /// The history packaged as a date-stamped download.
    pub fn export(&self) -> ExportArtifact {
        ExportArtifact {
            file_name: export::file_name_for(
                self.file_prefix.as_deref(),
                self.clock.now().date_naive(),
            ),
            media_type: CSV_MEDIA_TYPE,
            body: self.export_as_delimited_text(),
        }
    }

    /// Turn raw form values into a stored pending submission and record it
    /// in the tracking log.
    pub fn capture(&self, draft: SubmissionDraft) -> Submission {
        let now = self.clock.now();
        let id = match self.ids.lock() {
            Ok(mut ids) => ids.next_id(now),
            Err(poisoned) => poisoned.into_inner().next_id(now),
        };
        let submission = Submission::from_draft(id, draft, now);
        self.append(submission.clone());
        self.track(&submission);
        submission
    }

    /// The write-once audit log, in capture order.
    pub fn tracking_log(&self) -> Vec<TrackingRecord> {
        self.read_collection(TRACKING_KEY)
    }

    /// Mark a stored submission as acted upon. Returns `false` when no
    /// submission has that id.
    pub fn mark_submitted(&self, id: &SubmissionId) -> bool {
        let mut submissions: Vec<Submission> = self.read_collection(SUBMISSIONS_KEY);
        let Some(found) = submissions.iter_mut().find(|s| &s.id == id) else {
            return false;
        };
        found.status = SubmissionStatus::Submitted;
        self.write_collection(SUBMISSIONS_KEY, &submissions);
        true
    }

    fn track(&self, submission: &Submission) {
        let mut log: Vec<TrackingRecord> = self.read_collection(TRACKING_KEY);
        log.push(TrackingRecord::from(submission));
        self.write_collection(TRACKING_KEY, &log);
    }

    fn read_collection<T: DeserializeOwned>(&self, key: &str) -> Vec<T> {
        let raw = match self.scope.get(key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(e) => {
                tracing::warn!(key, error = %e, "storage read failed, treating as empty");
                return Vec::new();
            }
        };
        match serde_json::from_str(&raw) {
            Ok(items) => items,
            Err(e) => {
                tracing::warn!(key, error = %e, "stored data is corrupt, treating as empty");
                Vec::new()
            }
        }
    }

    fn write_collection<T: Serialize>(&self, key: &str, items: &[T]) {
        let json = match serde_json::to_string(items) {
            Ok(json) => json,
            Err(e) => {
                tracing::error!(key, error = %e, "failed to serialize collection");
                return;
            }
        };
        if let Err(e) = self.scope.set(key, &json) {
            tracing::warn!(key, error = %e, "storage write failed");
        }
    }
}

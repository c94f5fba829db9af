//! Runs planned hand-offs on the tokio runtime.

use std::io::Write;
use std::sync::Arc;

use tokio::task::JoinHandle;

use contact_ledger_common::handoff::{
    HandoffError, HandoffOutcome, HandoffRequest, HandoffTarget, Opener,
};

/// In-flight hand-offs. Each request runs in its own task, so a slow or
/// failing opener never holds up the rest.
pub struct HandoffDispatch {
    tasks: Vec<(HandoffTarget, JoinHandle<HandoffOutcome>)>,
}

/// Spawn one task per request. Each task waits out the request's delay,
/// then calls the opener.
pub fn dispatch(requests: Vec<HandoffRequest>, opener: Arc<dyn Opener>) -> HandoffDispatch {
    let tasks = requests
        .into_iter()
        .map(|request| {
            let opener = Arc::clone(&opener);
            let target = request.target;
            let handle = tokio::spawn(async move {
                tokio::time::sleep(request.delay).await;
                let result = opener.open(&request);
                if let Err(e) = &result {
                    tracing::warn!(channel = target.as_str(), error = %e, "hand-off failed");
                }
                HandoffOutcome { target, result }
            });
            (target, handle)
        })
        .collect();
    HandoffDispatch { tasks }
}

impl HandoffDispatch {
    /// Abort every hand-off that has not fired yet.
    pub fn cancel(&self) {
        for (_, handle) in &self.tasks {
            handle.abort();
        }
    }

    /// Wait for all hand-offs. Cancelled or panicked tasks are reported as
    /// failures of their own target only.
    pub async fn join(self) -> Vec<HandoffOutcome> {
        let mut outcomes = Vec::with_capacity(self.tasks.len());
        for (target, handle) in self.tasks {
            let outcome = match handle.await {
                Ok(outcome) => outcome,
                Err(e) => {
                    let reason = if e.is_cancelled() {
                        "cancelled".to_string()
                    } else {
                        "opener panicked".to_string()
                    };
                    HandoffOutcome {
                        target,
                        result: Err(HandoffError {
                            target: target.as_str(),
                            reason,
                        }),
                    }
                }
            };
            outcomes.push(outcome);
        }
        outcomes
    }
}

/// Prints each URL for the user to open.
pub struct StdoutOpener;

impl Opener for StdoutOpener {
    fn open(&self, request: &HandoffRequest) -> Result<(), HandoffError> {
        let mut out = std::io::stdout().lock();
        writeln!(out, "open {}: {}", request.target.as_str(), request.url).map_err(|e| {
            HandoffError {
                target: request.target.as_str(),
                reason: e.to_string(),
            }
        })
    }
}

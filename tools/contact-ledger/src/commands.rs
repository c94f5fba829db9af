//! Text rendering for the CLI commands.

use contact_ledger_common::badge::BadgeState;
use contact_ledger_common::handoff::HandoffOutcome;
use contact_ledger_common::submission::{Submission, NOT_PROVIDED};

pub const EMPTY_HISTORY: &str = "No submissions yet. Submit a request to get started!";
pub const NOTHING_TO_EXPORT: &str = "No history to export!";

/// The history view, one block per submission, newest first.
pub fn render_history(submissions: &[Submission]) -> String {
    if submissions.is_empty() {
        return EMPTY_HISTORY.to_string();
    }
    submissions
        .iter()
        .map(render_entry)
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn render_entry(s: &Submission) -> String {
    let service = if s.service == NOT_PROVIDED {
        "Not specified"
    } else {
        s.service.as_str()
    };
    format!(
        "[{status}] {title} ({date})\n  id: {id}\n  Email: {email}\n  Phone: {phone}\n  \
         Service: {service}\n  Message: {message}\n  Contact Methods: {methods}",
        status = s.status.as_str(),
        title = s.title(),
        date = s.timestamp.format("%Y-%m-%d %H:%M:%S UTC"),
        id = s.id,
        email = s.email,
        phone = s.phone,
        message = s.message,
        methods = s.joined_methods(", "),
    )
}

pub fn render_badge(state: BadgeState) -> String {
    match state {
        BadgeState::Hidden => "badge: hidden".to_string(),
        BadgeState::Visible(n) => format!("badge: {n} pending"),
    }
}

/// Closing line after hand-offs ran.
pub fn render_handoff_summary(outcomes: &[HandoffOutcome]) -> String {
    let methods = outcomes
        .iter()
        .map(HandoffOutcome::summary)
        .collect::<Vec<_>>()
        .join(", ");
    format!("Request submitted! Methods: {methods}. Check submission history.")
}

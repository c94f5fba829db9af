use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Stored in place of an optional field the visitor left blank.
pub const NOT_PROVIDED: &str = "N/A";

/// Unique submission identifier.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubmissionId(pub String);

impl std::fmt::Display for SubmissionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Channels a visitor can ask to be reached through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContactMethod {
    /// Reply by email.
    Email,
    /// Message on WhatsApp.
    Whatsapp,
    /// DM on Instagram.
    Instagram,
    /// Message on Telegram.
    Telegram,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown contact method: {0}")]
pub struct UnknownContactMethod(pub String);

impl ContactMethod {
    pub const ALL: [ContactMethod; 4] = [
        ContactMethod::Email,
        ContactMethod::Whatsapp,
        ContactMethod::Instagram,
        ContactMethod::Telegram,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ContactMethod::Email => "email",
            ContactMethod::Whatsapp => "whatsapp",
            ContactMethod::Instagram => "instagram",
            ContactMethod::Telegram => "telegram",
        }
    }
}

impl std::str::FromStr for ContactMethod {
    type Err = UnknownContactMethod;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "email" => Ok(ContactMethod::Email),
            "whatsapp" => Ok(ContactMethod::Whatsapp),
            "instagram" => Ok(ContactMethod::Instagram),
            "telegram" => Ok(ContactMethod::Telegram),
            other => Err(UnknownContactMethod(other.to_string())),
        }
    }
}

/// Whether the business has acted on a submission yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubmissionStatus {
    /// Captured, not yet acted upon. Counted by the badge.
    Pending,
    /// Acted upon by the business.
    Submitted,
}

impl SubmissionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubmissionStatus::Pending => "pending",
            SubmissionStatus::Submitted => "submitted",
        }
    }
}

/// One captured contact request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
    pub id: SubmissionId,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub service: String,
    pub message: String,
    pub contact_methods: Vec<ContactMethod>,
    pub timestamp: DateTime<Utc>,
    pub status: SubmissionStatus,
}

impl Submission {
    /// Build a pending submission from raw form values.
    ///
    /// Blank `phone` and `service` become [`NOT_PROVIDED`]; duplicate
    /// contact methods are dropped, keeping first occurrence order.
    pub fn from_draft(id: SubmissionId, draft: SubmissionDraft, timestamp: DateTime<Utc>) -> Self {
        let mut contact_methods = Vec::with_capacity(draft.contact_methods.len());
        for method in draft.contact_methods {
            if !contact_methods.contains(&method) {
                contact_methods.push(method);
            }
        }
        Self {
            id,
            name: draft.name,
            email: draft.email,
            phone: or_not_provided(draft.phone),
            service: or_not_provided(draft.service),
            message: draft.message,
            contact_methods,
            timestamp,
            status: SubmissionStatus::Pending,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.status == SubmissionStatus::Pending
    }

    /// Label used by the history view: the service, or a generic one.
    pub fn title(&self) -> String {
        let service = if self.service == NOT_PROVIDED {
            "General Inquiry"
        } else {
            self.service.as_str()
        };
        format!("{} - {}", self.name, service)
    }

    pub fn joined_methods(&self, separator: &str) -> String {
        self.contact_methods
            .iter()
            .map(ContactMethod::as_str)
            .collect::<Vec<_>>()
            .join(separator)
    }
}

fn or_not_provided(value: Option<String>) -> String {
    match value {
        Some(v) if !v.is_empty() => v,
        _ => NOT_PROVIDED.to_string(),
    }
}

/// Raw form values before an id and timestamp are assigned.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SubmissionDraft {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub service: Option<String>,
    pub message: String,
    pub contact_methods: Vec<ContactMethod>,
}

/// Generates time-based ids that stay unique within one session.
///
/// Ids are the millisecond timestamp as a decimal string. When two
/// captures land in the same millisecond (or the clock steps back),
/// the id is bumped one past the last one handed out.
#[derive(Debug, Default)]
pub struct IdGenerator {
    last: Option<i64>,
}

impl IdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_id(&mut self, now: DateTime<Utc>) -> SubmissionId {
        let millis = now.timestamp_millis();
        let id = match self.last {
            Some(last) if millis <= last => last + 1,
            _ => millis,
        };
        self.last = Some(id);
        SubmissionId(id.to_string())
    }
}

//! Best-effort hand-offs to external contact channels.
//!
//! After a capture the site offers to open the visitor's mail client and
//! any messaging apps they picked. Each target is planned as its own
//! request with a staggered delay; openers report per-request outcomes
//! and a failing target never affects the others or the stored record.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::submission::{ContactMethod, Submission};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HandoffConfig {
    /// Inbox that receives the mailto hand-off.
    pub email: String,
    /// WhatsApp number in international format, digits only.
    pub whatsapp_number: String,
    pub instagram_handle: String,
    pub telegram_handle: String,
    /// Name used in the mail body and WhatsApp greeting.
    pub business_name: String,
}

impl Default for HandoffConfig {
    fn default() -> Self {
        Self {
            email: "vichuufx2@gmail.com".to_string(),
            whatsapp_number: "916369986674".to_string(),
            instagram_handle: "vichuufx_".to_string(),
            telegram_handle: "vichuupage".to_string(),
            business_name: "Vichuufx".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HandoffTarget {
    /// `mailto:` link to the business inbox. Always planned.
    Email,
    /// `wa.me` chat with a prefilled greeting.
    Whatsapp,
    /// The business Instagram profile.
    Instagram,
    /// The business Telegram page.
    Telegram,
}

impl HandoffTarget {
    pub fn as_str(&self) -> &'static str {
        match self {
            HandoffTarget::Email => "email",
            HandoffTarget::Whatsapp => "whatsapp",
            HandoffTarget::Instagram => "instagram",
            HandoffTarget::Telegram => "telegram",
        }
    }

    /// Delay after capture before this target is opened.
    pub fn delay(&self) -> Duration {
        match self {
            HandoffTarget::Email => Duration::from_millis(500),
            HandoffTarget::Whatsapp => Duration::from_millis(1000),
            HandoffTarget::Instagram => Duration::from_millis(1500),
            HandoffTarget::Telegram => Duration::from_millis(2000),
        }
    }
}

/// One external target to open.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandoffRequest {
    pub target: HandoffTarget,
    pub url: String,
    pub delay: Duration,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("could not open {target}: {reason}")]
pub struct HandoffError {
    pub target: &'static str,
    pub reason: String,
}

/// Something that can open a URL (a browser window, a desktop handler,
/// a terminal that prints it).
pub trait Opener: Send + Sync {
    fn open(&self, request: &HandoffRequest) -> Result<(), HandoffError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandoffOutcome {
    pub target: HandoffTarget,
    pub result: Result<(), HandoffError>,
}

impl HandoffOutcome {
    /// Short status line, e.g. "WhatsApp opened".
    pub fn summary(&self) -> String {
        let (name, verb) = match self.target {
            HandoffTarget::Email => ("Email", "sent"),
            HandoffTarget::Whatsapp => ("WhatsApp", "opened"),
            HandoffTarget::Instagram => ("Instagram", "opened"),
            HandoffTarget::Telegram => ("Telegram", "opened"),
        };
        match &self.result {
            Ok(()) => format!("{name} {verb}"),
            Err(e) => format!("{name} failed ({})", e.reason),
        }
    }
}

/// Plan the hand-offs for a captured submission.
///
/// Email is always planned; the messaging apps only when the visitor
/// selected them. Requests come back in delay order.
pub fn plan_handoffs(submission: &Submission, config: &HandoffConfig) -> Vec<HandoffRequest> {
    let mut requests = vec![HandoffRequest {
        target: HandoffTarget::Email,
        url: mailto_link(submission, config),
        delay: HandoffTarget::Email.delay(),
    }];

    let wants = |m: ContactMethod| submission.contact_methods.contains(&m);
    if wants(ContactMethod::Whatsapp) {
        requests.push(HandoffRequest {
            target: HandoffTarget::Whatsapp,
            url: whatsapp_link(submission, config),
            delay: HandoffTarget::Whatsapp.delay(),
        });
    }
    if wants(ContactMethod::Instagram) {
        requests.push(HandoffRequest {
            target: HandoffTarget::Instagram,
            url: format!("https://www.instagram.com/{}/", config.instagram_handle),
            delay: HandoffTarget::Instagram.delay(),
        });
    }
    if wants(ContactMethod::Telegram) {
        requests.push(HandoffRequest {
            target: HandoffTarget::Telegram,
            url: format!("https://t.me/{}", config.telegram_handle),
            delay: HandoffTarget::Telegram.delay(),
        });
    }
    requests
}

fn mailto_link(s: &Submission, config: &HandoffConfig) -> String {
    let body = format!(
        "New Contact Form Submission from {business} Website\n\n\
         Name: {name}\n\
         Email: {email}\n\
         Phone: {phone}\n\
         Service: {service}\n\
         Message: {message}\n\
         Preferred Contact Methods: {methods}\n\
         Submitted: {submitted}",
        business = config.business_name,
        name = s.name,
        email = s.email,
        phone = s.phone,
        service = s.service,
        message = s.message,
        methods = s.joined_methods(", "),
        submitted = s.timestamp.format("%Y-%m-%d %H:%M:%S UTC"),
    );
    let subject = format!("New Contact Form Submission from {}", s.name);
    format!(
        "mailto:{}?subject={}&body={}",
        config.email,
        percent_encode(&subject),
        percent_encode(&body)
    )
}

fn whatsapp_link(s: &Submission, config: &HandoffConfig) -> String {
    let text = format!(
        "Hello {}! I'm {}. {}. Email: {}, Phone: {}",
        config.business_name, s.name, s.message, s.email, s.phone
    );
    format!(
        "https://wa.me/{}?text={}",
        config.whatsapp_number,
        percent_encode(&text)
    )
}

/// Percent-encode everything outside the URI unreserved set, byte-wise
/// over UTF-8.
pub fn percent_encode(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for b in s.bytes() {
        match b {
            b'a'..=b'z' | b'A'..=b'Z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(b as char)
            }
            _ => out.push_str(&format!("%{b:02X}")),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::submission::{SubmissionDraft, SubmissionId};
    use chrono::{TimeZone, Utc};

    fn submission(methods: Vec<ContactMethod>) -> Submission {
        Submission::from_draft(
            SubmissionId("1".into()),
            SubmissionDraft {
                name: "Ravi K".into(),
                email: "ravi@example.com".into(),
                phone: Some("+91 1234".into()),
                service: None,
                message: "Wedding edit & color".into(),
                contact_methods: methods,
            },
            Utc.with_ymd_and_hms(2024, 2, 10, 18, 0, 0).unwrap(),
        )
    }

    #[test]
    fn test_email_always_planned() {
        let plan = plan_handoffs(&submission(vec![]), &HandoffConfig::default());
        assert_eq!(plan.len(), 1);
        assert_eq!(plan[0].target, HandoffTarget::Email);
        assert!(plan[0]
            .url
            .starts_with("mailto:vichuufx2@gmail.com?subject=New%20Contact%20Form%20Submission%20from%20Ravi%20K&body="));
        assert!(plan[0].url.contains("Wedding%20edit%20%26%20color"));
    }

    #[test]
    fn test_selected_apps_are_planned_in_delay_order() {
        let plan = plan_handoffs(
            &submission(vec![ContactMethod::Telegram, ContactMethod::Whatsapp]),
            &HandoffConfig::default(),
        );
        let targets: Vec<_> = plan.iter().map(|r| r.target).collect();
        assert_eq!(
            targets,
            vec![
                HandoffTarget::Email,
                HandoffTarget::Whatsapp,
                HandoffTarget::Telegram
            ]
        );
        assert!(plan.windows(2).all(|w| w[0].delay < w[1].delay));
        assert!(plan[1].url.starts_with("https://wa.me/916369986674?text=Hello%20Vichuufx%21"));
        assert_eq!(plan[2].url, "https://t.me/vichuupage");
    }

    #[test]
    fn test_instagram_link() {
        let plan = plan_handoffs(
            &submission(vec![ContactMethod::Instagram]),
            &HandoffConfig::default(),
        );
        assert_eq!(plan[1].url, "https://www.instagram.com/vichuufx_/");
    }

    #[test]
    fn test_percent_encode_utf8() {
        assert_eq!(percent_encode("a b~"), "a%20b~");
        assert_eq!(percent_encode("é"), "%C3%A9");
    }

    #[test]
    fn test_outcome_summary() {
        let ok = HandoffOutcome {
            target: HandoffTarget::Whatsapp,
            result: Ok(()),
        };
        assert_eq!(ok.summary(), "WhatsApp opened");
        let failed = HandoffOutcome {
            target: HandoffTarget::Email,
            result: Err(HandoffError {
                target: "email",
                reason: "no mail client".into(),
            }),
        };
        assert_eq!(failed.summary(), "Email failed (no mail client)");
    }
}

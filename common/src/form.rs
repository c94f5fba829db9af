//! Checks the contact form runs before a draft reaches the store.

use crate::submission::SubmissionDraft;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormError {
    #[error("Please enter your name")]
    MissingName,

    #[error("Please enter your email address")]
    MissingEmail,

    #[error("Please enter a valid email address")]
    InvalidEmail,

    #[error("Please enter a message")]
    MissingMessage,
}

/// `local@domain.tld` shape: exactly one `@`, no whitespace, and a dot in
/// the domain with something on both sides of it.
pub fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    domain
        .char_indices()
        .any(|(i, c)| c == '.' && i > 0 && i + 1 < domain.len())
}

/// Keep digits and the punctuation people type into phone numbers.
pub fn filter_phone(input: &str) -> String {
    input
        .chars()
        .filter(|c| c.is_ascii_digit() || matches!(c, '+' | '-' | '(' | ')' | ' '))
        .collect()
}

impl SubmissionDraft {
    /// Check required fields and the email shape. A phone number, if
    /// present, is filtered in place.
    pub fn validate(&mut self) -> Result<(), FormError> {
        if self.name.trim().is_empty() {
            return Err(FormError::MissingName);
        }
        if self.email.trim().is_empty() {
            return Err(FormError::MissingEmail);
        }
        if !is_valid_email(&self.email) {
            return Err(FormError::InvalidEmail);
        }
        if self.message.trim().is_empty() {
            return Err(FormError::MissingMessage);
        }
        if let Some(phone) = self.phone.as_mut() {
            *phone = filter_phone(phone);
        }
        Ok(())
    }
}

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use thiserror::Error;

// Deliberately liberal: one @, at least one dot in the host part.
static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex"));

#[derive(Deserialize, Clone, Debug)]
pub struct ContactInput {
    pub subject: String,
    pub name: String,
    pub email: String,
    pub message: String,
}

/// Messages are user-facing; the HTTP layer forwards them verbatim.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ContactError {
    #[error("Please fill in all fields.")]
    MissingFields,
    #[error("Please provide a valid email address.")]
    InvalidEmail,
}

/// Trims every field, requires all four, and checks the email shape.
/// Returns the cleaned-up submission ready for insertion.
pub fn validate(input: &ContactInput) -> Result<ContactInput, ContactError> {
    let subject = input.subject.trim();
    let name = input.name.trim();
    let email = input.email.trim();
    let message = input.message.trim();

    if subject.is_empty() || name.is_empty() || email.is_empty() || message.is_empty() {
        return Err(ContactError::MissingFields);
    }
    if !EMAIL_RE.is_match(email) {
        return Err(ContactError::InvalidEmail);
    }

    Ok(ContactInput {
        subject: subject.to_string(),
        name: name.to_string(),
        email: email.to_string(),
        message: message.to_string(),
    })
}

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

use crate::contract::model::{NewUser, UserInput};

/// Inclusive bounds on the trimmed name length, in characters.
pub const MIN_NAME_LEN: usize = 2;
pub const MAX_NAME_LEN: usize = 100;

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid"));

/// Shape errors in a create/replace request. The display text is the
/// client-facing message.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Name and email are required")]
    MissingField,

    #[error("Name must be between 2 and 100 characters")]
    NameLength,

    #[error("Invalid email format")]
    InvalidEmail,
}

/// Check a candidate user. On success the name and email are returned
/// exactly as supplied; trimming only affects the length check.
pub fn validate_user(input: UserInput) -> Result<NewUser, ValidationError> {
    let (name, email) = match (input.name, input.email) {
        (Some(name), Some(email)) if !name.is_empty() && !email.is_empty() => (name, email),
        _ => return Err(ValidationError::MissingField),
    };

    let name_len = name.trim().chars().count();
    if !(MIN_NAME_LEN..=MAX_NAME_LEN).contains(&name_len) {
        return Err(ValidationError::NameLength);
    }

    if !is_valid_email(&email) {
        return Err(ValidationError::InvalidEmail);
    }

    Ok(NewUser { name, email })
}

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

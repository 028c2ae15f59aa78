//! Registration input validation
//!
//! All checks run before any I/O. Every variant carries a message suitable
//! for direct display to the user.

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

/// Minimum accepted password length.
pub const MIN_PASSWORD_LEN: usize = 6;

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    // Same permissive shape the legacy form used: something@something.tld
    #[allow(clippy::expect_used)]
    Regex::new(r"^\S+@\S+\.\S+$").expect("email regex is valid")
});

/// Validation failures for registration input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please fill in all required fields")]
    MissingField(&'static str),

    #[error("Please enter a valid email address")]
    InvalidEmail,

    #[error("Passwords do not match")]
    PasswordMismatch,

    #[error("Password must be at least {MIN_PASSWORD_LEN} characters")]
    PasswordTooShort,
}

/// Raw registration form fields, prior to validation.
#[derive(Debug, Clone, Default)]
pub struct RegistrationInput {
    pub email: String,
    pub nombre: String,
    pub password: String,
    pub confirm_password: String,
}

impl RegistrationInput {
    /// Trim the text fields the way the form layer would before submitting.
    pub fn normalized(mut self) -> Self {
        self.email = self.email.trim().to_string();
        self.nombre = self.nombre.trim().to_string();
        self
    }
}

/// Validate registration input. Field presence first, then shape checks.
pub fn validate_registration(input: &RegistrationInput) -> Result<(), ValidationError> {
    if input.email.is_empty() {
        return Err(ValidationError::MissingField("email"));
    }
    if input.nombre.is_empty() {
        return Err(ValidationError::MissingField("nombre"));
    }
    if input.password.is_empty() {
        return Err(ValidationError::MissingField("password"));
    }
    if input.confirm_password.is_empty() {
        return Err(ValidationError::MissingField("confirm_password"));
    }

    if !EMAIL_RE.is_match(&input.email) {
        return Err(ValidationError::InvalidEmail);
    }

    if input.password != input.confirm_password {
        return Err(ValidationError::PasswordMismatch);
    }

    if input.password.len() < MIN_PASSWORD_LEN {
        return Err(ValidationError::PasswordTooShort);
    }

    Ok(())
}

//! Pure validation rules for the deprovisioning form.
//!
//! Everything here is string-in, verdict-out. Applying a verdict to the
//! rendered page (border colors, button enablement) is the controller's and
//! view's job, which keeps these rules testable without a front end.

use regex::Regex;
use std::sync::LazyLock;

/// Lenient live-typing email check: local@domain.tld with no whitespace.
static EMAIL_BASIC: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid regex"));

/// Stricter submit-time email check.
static EMAIL_STRICT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").expect("valid regex")
});

/// Literal the operator must type before a run may proceed.
pub const CONFIRMATION_PHRASE: &str = "CONFIRM";

pub const MIN_USERNAME_LEN: usize = 3;
pub const MIN_PASSWORD_LEN: usize = 8;

/// Form inputs the view can highlight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    TargetEmail,
    DirectoryUsername,
    DirectoryPassword,
}

/// Visual validity of a single input: neutral while empty, red/green once
/// the operator has typed something.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldState {
    Neutral,
    Invalid,
    Valid,
}

pub fn email_is_valid(email: &str) -> bool {
    EMAIL_BASIC.is_match(email)
}

pub fn email_field_state(email: &str) -> FieldState {
    if email.is_empty() {
        FieldState::Neutral
    } else if email_is_valid(email) {
        FieldState::Valid
    } else {
        FieldState::Invalid
    }
}

/// Credential fields only distinguish empty from present while typing.
pub fn presence_state(value: &str) -> FieldState {
    if value.is_empty() {
        FieldState::Neutral
    } else {
        FieldState::Valid
    }
}

pub fn credentials_present(username: &str, password: &str) -> bool {
    !username.is_empty() && !password.is_empty()
}

/// Full-form gate for the start control.
pub fn form_is_valid(email: &str, username: &str, password: &str) -> bool {
    email_is_valid(email) && credentials_present(username, password)
}

/// Case-folded comparison against [`CONFIRMATION_PHRASE`]. No trimming:
/// "Confirm!" does not pass.
pub fn confirmation_valid(text: &str) -> bool {
    text.to_uppercase() == CONFIRMATION_PHRASE
}

/// Submit-time credential failure, in check order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialIssue {
    UsernameMissing,
    PasswordMissing,
    UsernameTooShort,
    PasswordTooShort,
}

impl CredentialIssue {
    pub fn field(&self) -> Field {
        match self {
            CredentialIssue::UsernameMissing | CredentialIssue::UsernameTooShort => {
                Field::DirectoryUsername
            }
            CredentialIssue::PasswordMissing | CredentialIssue::PasswordTooShort => {
                Field::DirectoryPassword
            }
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            CredentialIssue::UsernameMissing => "Directory username is required",
            CredentialIssue::PasswordMissing => "Directory password is required",
            CredentialIssue::UsernameTooShort => "Username must be at least 3 characters",
            CredentialIssue::PasswordTooShort => "Password seems too short",
        }
    }
}

/// Strict credential check used on submit attempts. Short-circuits on the
/// first failure: username presence, password presence, username length,
/// password length.
pub fn check_credentials(username: &str, password: &str) -> Result<(), CredentialIssue> {
    if username.is_empty() {
        return Err(CredentialIssue::UsernameMissing);
    }
    if password.is_empty() {
        return Err(CredentialIssue::PasswordMissing);
    }
    if username.len() < MIN_USERNAME_LEN {
        return Err(CredentialIssue::UsernameTooShort);
    }
    if password.len() < MIN_PASSWORD_LEN {
        return Err(CredentialIssue::PasswordTooShort);
    }
    Ok(())
}

/// Submit-time email failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmailIssue {
    Missing,
    Malformed,
}

impl EmailIssue {
    pub fn message(&self) -> &'static str {
        match self {
            EmailIssue::Missing => "Target user email is required",
            EmailIssue::Malformed => "Please enter a valid email address",
        }
    }
}

/// Strict email check used on submit attempts.
pub fn check_email_strict(email: &str) -> Result<(), EmailIssue> {
    if email.is_empty() {
        return Err(EmailIssue::Missing);
    }
    if !EMAIL_STRICT.is_match(email) {
        return Err(EmailIssue::Malformed);
    }
    Ok(())
}

//! Sign-up validation.

use super::model::NewAccount;

/// Minimum number of characters in a secret.
pub const MIN_PASSWORD_LEN: usize = 8;

/// Validation error for sign-up profile data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    /// Email address is empty.
    EmptyEmail,
    /// Email address format is invalid.
    InvalidEmail,
    /// Given name is empty.
    EmptyGivenName,
    /// Family name is empty.
    EmptyFamilyName,
}

impl ValidationError {
    /// Get human-readable error message.
    #[must_use]
    pub const fn message(&self) -> &'static str {
        match self {
            Self::EmptyEmail => "Email address is required",
            Self::InvalidEmail => "Invalid email address format",
            Self::EmptyGivenName => "Given name is required",
            Self::EmptyFamilyName => "Family name is required",
        }
    }

    /// Get the field name this error relates to.
    #[must_use]
    pub const fn field(&self) -> &'static str {
        match self {
            Self::EmptyEmail | Self::InvalidEmail => "email",
            Self::EmptyGivenName => "given_name",
            Self::EmptyFamilyName => "family_name",
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for ValidationError {}

/// Result of validating a sign-up request.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// Validate the profile half of a sign-up request.
///
/// Returns `Ok(())` if valid, or `Err(Vec<ValidationError>)` with all errors.
///
/// # Errors
///
/// Returns a vector of `ValidationError` if any fields are invalid.
pub fn validate_new_account(account: &NewAccount) -> ValidationResult {
    let mut errors = Vec::new();

    if account.email.trim().is_empty() {
        errors.push(ValidationError::EmptyEmail);
    } else if !is_valid_email(&account.email) {
        errors.push(ValidationError::InvalidEmail);
    }

    if account.given_name.trim().is_empty() {
        errors.push(ValidationError::EmptyGivenName);
    }
    if account.family_name.trim().is_empty() {
        errors.push(ValidationError::EmptyFamilyName);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Check a secret against the password policy.
///
/// At least [`MIN_PASSWORD_LEN`] characters with one uppercase letter, one
/// lowercase letter, one ASCII digit and one symbol. Any character that is
/// neither alphanumeric nor a control character counts as a symbol, so
/// spaces and non-ASCII signs such as `€` qualify.
#[must_use]
pub fn is_valid_password(secret: &str) -> bool {
    let mut upper = false;
    let mut lower = false;
    let mut digit = false;
    let mut symbol = false;

    for c in secret.chars() {
        if c.is_uppercase() {
            upper = true;
        } else if c.is_lowercase() {
            lower = true;
        } else if c.is_ascii_digit() {
            digit = true;
        } else if !c.is_alphanumeric() && !c.is_control() {
            symbol = true;
        }
    }

    secret.chars().count() >= MIN_PASSWORD_LEN && upper && lower && digit && symbol
}

/// Basic email validation.
fn is_valid_email(email: &str) -> bool {
    let email = email.trim();

    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };

    if local.is_empty() || domain.contains('@') {
        return false;
    }

    // Domain must have at least two non-empty labels
    domain.contains('.') && domain.split('.').all(|label| !label.is_empty())
}

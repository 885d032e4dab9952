//! Client-side form validation
//!
//! Checks run before a request is made; failures are shown inline on the
//! offending field rather than surfaced as notifications.

use serde::Serialize;
use thiserror::Error;

/// A single failed form field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// One or more failed form checks.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}", joined(.0))]
pub struct ValidationError(pub Vec<FieldError>);

impl ValidationError {
    /// Message for a specific field, if that field failed.
    pub fn field(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|err| err.field == name)
            .map(|err| err.message.as_str())
    }
}

fn joined(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|err| err.message.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Individual field validators.
pub mod validators {
    use super::FieldError;

    pub fn validate_required(value: &str, field: &str) -> Result<(), FieldError> {
        if value.trim().is_empty() {
            return Err(FieldError::new(field, format!("{field} is required")));
        }
        Ok(())
    }

    pub fn validate_email(value: &str) -> Result<(), FieldError> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(FieldError::new("email", "email is required"));
        }
        let valid = trimmed
            .split_once('@')
            .is_some_and(|(local, domain)| !local.is_empty() && domain.contains('.'));
        if !valid {
            return Err(FieldError::new("email", "Enter a valid email address"));
        }
        Ok(())
    }

    pub fn validate_password(value: &str) -> Result<(), FieldError> {
        let message = if value.len() < 8 {
            Some("Password must be at least 8 characters")
        } else if !value.chars().any(|c| c.is_ascii_uppercase()) {
            Some("Password must contain at least one uppercase letter")
        } else if !value.chars().any(|c| c.is_ascii_lowercase()) {
            Some("Password must contain at least one lowercase letter")
        } else if !value.chars().any(|c| c.is_ascii_digit()) {
            Some("Password must contain at least one digit")
        } else if value.chars().all(|c| c.is_ascii_alphanumeric()) {
            Some("Password must contain at least one special character")
        } else {
            None
        };
        match message {
            Some(message) => Err(FieldError::new("password", message)),
            None => Ok(()),
        }
    }
}

/// Validate a login form. Login only checks presence; complexity rules
/// apply at registration time.
pub fn validate_login(email: &str, password: &str) -> Result<(), ValidationError> {
    let mut errors = Vec::new();
    if let Err(err) = validators::validate_email(email) {
        errors.push(err);
    }
    if let Err(err) = validators::validate_required(password, "password") {
        errors.push(err);
    }
    if errors.is_empty() {
        Ok(())
    } else {
        Err(ValidationError(errors))
    }
}

/// Validate a registration form.
pub fn validate_registration(
    email: &str,
    password: &str,
    confirm_password: &str,
    first_name: &str,
    last_name: &str,
) -> Result<(), ValidationError> {
    let mut errors = Vec::new();
    if let Err(err) = validators::validate_required(first_name, "firstName") {
        errors.push(err);
    }
    if let Err(err) = validators::validate_required(last_name, "lastName") {
        errors.push(err);
    }
    if let Err(err) = validators::validate_email(email) {
        errors.push(err);
    }
    if let Err(err) = validators::validate_password(password) {
        errors.push(err);
    }
    if password != confirm_password {
        errors.push(FieldError::new("confirmPassword", "Passwords don't match"));
    }
    if errors.is_empty() {
        Ok(())
    } else {
        Err(ValidationError(errors))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_a_complete_registration() {
        assert!(validate_registration(
            "seller@example.com",
            "Str0ng!pass",
            "Str0ng!pass",
            "Ada",
            "Seller"
        )
        .is_ok());
    }

    #[test]
    fn password_rules_are_reported_one_at_a_time() {
        let check = |pw: &str| validators::validate_password(pw).unwrap_err().message;
        assert_eq!(check("Ab1!"), "Password must be at least 8 characters");
        assert_eq!(
            check("lowercase1!"),
            "Password must contain at least one uppercase letter"
        );
        assert_eq!(
            check("UPPERCASE1!"),
            "Password must contain at least one lowercase letter"
        );
        assert_eq!(
            check("NoDigits!!"),
            "Password must contain at least one digit"
        );
        assert_eq!(
            check("NoSpecial1x"),
            "Password must contain at least one special character"
        );
    }

    #[test]
    fn mismatched_confirmation_is_flagged_on_the_confirm_field() {
        let err = validate_registration(
            "seller@example.com",
            "Str0ng!pass",
            "different",
            "Ada",
            "Seller",
        )
        .unwrap_err();
        assert_eq!(err.field("confirmPassword"), Some("Passwords don't match"));
    }

    #[test]
    fn login_checks_shape_not_complexity() {
        assert!(validate_login("seller@example.com", "weak").is_ok());
        let err = validate_login("not-an-email", "").unwrap_err();
        assert!(err.field("email").is_some());
        assert!(err.field("password").is_some());
    }

    #[test]
    fn email_needs_local_part_and_dotted_domain() {
        assert!(validators::validate_email("a@b.co").is_ok());
        assert!(validators::validate_email("@b.co").is_err());
        assert!(validators::validate_email("a@nodot").is_err());
    }
}

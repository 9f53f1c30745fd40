//! crates/move_right_core/src/validation.rs
//!
//! Server-side signup and profile validation rules. These are product
//! rules, not transport concerns, so they live in the core crate where
//! both the REST handlers and tests can reach them.

use std::sync::OnceLock;

use regex::Regex;

/// Domains that are never accepted at signup: RFC 2606 placeholder
/// domains plus well-known throwaway mail hosts.
const BLOCKED_DOMAINS: &[&str] = &[
    "example.com",
    "example.org",
    "example.net",
    "test.com",
    "email.com",
    "mailinator.com",
    "localhost",
];

const MIN_PASSWORD_LEN: usize = 8;

fn email_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$").expect("valid regex")
    })
}

/// A single rejected field, with a user-facing message.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Please enter your first name")]
    MissingFirstName,
    #[error("Please enter your last name")]
    MissingLastName,
    #[error("Please enter a valid email address")]
    InvalidEmail,
    #[error("Email addresses from placeholder or disposable domains are not accepted")]
    BlockedEmailDomain,
    #[error("Password must be at least 8 characters and contain a letter and a digit")]
    WeakPassword,
    #[error("You must be at least 13 years old")]
    InvalidAge,
    #[error("Please enter a valid feet measurement (3-7)")]
    InvalidFeet,
    #[error("Please enter a valid measurement in inches (0-11)")]
    InvalidInches,
    #[error("Enter your valid weight")]
    InvalidWeight,
}

/// Checks email syntax and the placeholder-domain blocklist.
pub fn validate_email(email: &str) -> Result<(), ValidationError> {
    if !email_regex().is_match(email) {
        return Err(ValidationError::InvalidEmail);
    }
    let domain = email
        .rsplit_once('@')
        .map(|(_, domain)| domain.to_lowercase())
        .ok_or(ValidationError::InvalidEmail)?;
    if BLOCKED_DOMAINS.contains(&domain.as_str()) {
        return Err(ValidationError::BlockedEmailDomain);
    }
    Ok(())
}

/// The light strength bar: length plus at least one letter and one digit.
pub fn validate_password(password: &str) -> Result<(), ValidationError> {
    let long_enough = password.chars().count() >= MIN_PASSWORD_LEN;
    let has_letter = password.chars().any(|c| c.is_alphabetic());
    let has_digit = password.chars().any(|c| c.is_ascii_digit());
    if long_enough && has_letter && has_digit {
        Ok(())
    } else {
        Err(ValidationError::WeakPassword)
    }
}

/// The profile fields a signup must supply, before hashing.
#[derive(Debug, Clone)]
pub struct SignupInput<'a> {
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub email: &'a str,
    pub password: &'a str,
    pub age: i32,
    pub height_feet: i32,
    pub height_inches: i32,
    pub weight_lbs: f64,
}

/// Validates a full signup, collecting every violation rather than
/// stopping at the first so the client can show them all at once.
pub fn validate_signup(input: &SignupInput<'_>) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if input.first_name.trim().is_empty() {
        errors.push(ValidationError::MissingFirstName);
    }
    if input.last_name.trim().is_empty() {
        errors.push(ValidationError::MissingLastName);
    }
    if let Err(e) = validate_email(input.email) {
        errors.push(e);
    }
    if let Err(e) = validate_password(input.password) {
        errors.push(e);
    }
    if input.age < 13 {
        errors.push(ValidationError::InvalidAge);
    }
    if !(3..=7).contains(&input.height_feet) {
        errors.push(ValidationError::InvalidFeet);
    }
    if !(0..=11).contains(&input.height_inches) {
        errors.push(ValidationError::InvalidInches);
    }
    if input.weight_lbs <= 0.0 {
        errors.push(ValidationError::InvalidWeight);
    }

    errors
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_input() -> SignupInput<'static> {
        SignupInput {
            first_name: "Jordan",
            last_name: "Lee",
            email: "jordan.lee@yahoo.com",
            password: "trackmyform1",
            age: 29,
            height_feet: 5,
            height_inches: 11,
            weight_lbs: 168.5,
        }
    }

    #[test]
    fn accepts_a_complete_signup() {
        assert!(validate_signup(&valid_input()).is_empty());
    }

    #[test]
    fn rejects_malformed_emails() {
        for email in ["not-an-email", "missing@domain", "@nouser.com", "a b@x.com"] {
            assert_eq!(validate_email(email), Err(ValidationError::InvalidEmail), "{email}");
        }
    }

    #[test]
    fn rejects_placeholder_domains() {
        assert_eq!(
            validate_email("someone@example.com"),
            Err(ValidationError::BlockedEmailDomain)
        );
        assert_eq!(
            validate_email("someone@MAILINATOR.COM"),
            Err(ValidationError::BlockedEmailDomain)
        );
    }

    #[test]
    fn accepts_ordinary_domains() {
        assert!(validate_email("coach@gmail.com").is_ok());
        assert!(validate_email("first.last+tag@fitness.co.uk").is_ok());
    }

    #[test]
    fn rejects_weak_passwords() {
        for password in ["short1", "allletters", "0123456789", "seven7!"] {
            assert_eq!(
                validate_password(password),
                Err(ValidationError::WeakPassword),
                "{password}"
            );
        }
    }

    #[test]
    fn accepts_passwords_meeting_the_bar() {
        assert!(validate_password("letters4ndNumbers").is_ok());
    }

    #[test]
    fn collects_every_violation() {
        let input = SignupInput {
            first_name: "  ",
            last_name: "",
            email: "bad@example.com",
            password: "weak",
            age: 9,
            height_feet: 9,
            height_inches: 12,
            weight_lbs: 0.0,
        };
        let errors = validate_signup(&input);
        assert_eq!(errors.len(), 8);
        assert!(errors.contains(&ValidationError::BlockedEmailDomain));
        assert!(errors.contains(&ValidationError::WeakPassword));
    }
}

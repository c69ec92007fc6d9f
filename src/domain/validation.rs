//! Auth form validation
//!
//! Field rules for the sign-in and sign-up forms. All violations are
//! collected so the caller can report every bad field at once.

use regex::Regex;
use std::fmt;
use std::sync::OnceLock;

use super::user::{SignInParams, SignUpParams};

/// A single rejected field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: &'static str,
}

/// Every field that failed validation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors(pub Vec<FieldError>);

impl ValidationErrors {
    fn push(&mut self, field: &'static str, message: &'static str) {
        self.0.push(FieldError { field, message });
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn fields(&self) -> Vec<&'static str> {
        self.0.iter().map(|e| e.field).collect()
    }

    fn into_result(self) -> Result<(), ValidationErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .0
            .iter()
            .map(|e| format!("{}: {}", e.field, e.message))
            .collect();
        write!(f, "{}", parts.join("; "))
    }
}

fn is_valid_email(email: &str) -> bool {
    static EMAIL_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = EMAIL_REGEX.get_or_init(|| {
        Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$")
            .expect("Failed to compile email regex")
    });
    regex.is_match(email)
}

fn check_credentials(errors: &mut ValidationErrors, email: &str, password: &str) {
    if !is_valid_email(email) {
        errors.push("email", "Invalid email address");
    }
    if password.chars().count() < 8 {
        errors.push("password", "Password must be at least 8 characters long");
    }
}

/// Validate the sign-in form
pub fn validate_sign_in(params: &SignInParams) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::default();
    check_credentials(&mut errors, &params.email, &params.password);
    errors.into_result()
}

/// Validate the sign-up form
pub fn validate_sign_up(params: &SignUpParams) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::default();
    let len = |s: &str| s.trim().chars().count();

    if len(&params.first_name) < 3 {
        errors.push("first_name", "Must be at least 3 characters");
    }
    if len(&params.last_name) < 3 {
        errors.push("last_name", "Must be at least 3 characters");
    }
    if len(&params.address1) == 0 || len(&params.address1) > 50 {
        errors.push("address1", "Must be between 1 and 50 characters");
    }
    if len(&params.city) == 0 || len(&params.city) > 50 {
        errors.push("city", "Must be between 1 and 50 characters");
    }
    if len(&params.state) != 2 {
        errors.push("state", "Must be exactly 2 characters");
    }
    if !(3..=6).contains(&len(&params.postal_code)) {
        errors.push("postal_code", "Must be between 3 and 6 characters");
    }
    if len(&params.date_of_birth) < 3 {
        errors.push("date_of_birth", "Must be at least 3 characters");
    }
    if len(&params.ssn) < 3 {
        errors.push("ssn", "Must be at least 3 characters");
    }
    check_credentials(&mut errors, &params.email, &params.password);

    errors.into_result()
}

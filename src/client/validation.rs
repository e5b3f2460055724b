//! Form checks run before anything is sent to the server.

use std::collections::BTreeMap;
use std::fmt;

pub const TITLE_MIN_LEN: usize = 3;
pub const DESCRIPTION_MIN_LEN: usize = 10;
pub const PASSWORD_MIN_LEN: usize = 6;

/// Per-field error messages, keyed by field name
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(BTreeMap<String, String>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, field: &str, message: impl Into<String>) {
        self.0.entry(field.to_string()).or_insert_with(|| message.into());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn into_result(self) -> Result<(), FieldErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.iter().map(|(k, v)| format!("{}: {}", k, v)).collect();
        f.write_str(&parts.join("; "))
    }
}

fn char_len(value: &str) -> usize {
    value.trim().chars().count()
}

pub fn validate_record(title: &str, description: &str) -> Result<(), FieldErrors> {
    let mut errors = FieldErrors::new();

    if title.trim().is_empty() {
        errors.insert("title", "Title is required");
    } else if char_len(title) < TITLE_MIN_LEN {
        errors.insert("title", format!("Title must be at least {} characters", TITLE_MIN_LEN));
    }

    if description.trim().is_empty() {
        errors.insert("description", "Description is required");
    } else if char_len(description) < DESCRIPTION_MIN_LEN {
        errors.insert(
            "description",
            format!("Description must be at least {} characters", DESCRIPTION_MIN_LEN),
        );
    }

    errors.into_result()
}

pub fn validate_login(email: &str, password: &str) -> Result<(), FieldErrors> {
    let mut errors = FieldErrors::new();

    if email.trim().is_empty() {
        errors.insert("email", "Email is required");
    } else if !email.contains('@') {
        errors.insert("email", "Email format is invalid");
    }

    if password.is_empty() {
        errors.insert("password", "Password is required");
    }

    errors.into_result()
}

pub fn validate_profile_name(name: &str) -> Result<(), FieldErrors> {
    let mut errors = FieldErrors::new();
    if name.trim().is_empty() {
        errors.insert("name", "Name is required");
    }
    errors.into_result()
}

pub fn validate_password_change(current: &str, new: &str, confirm: &str) -> Result<(), FieldErrors> {
    let mut errors = FieldErrors::new();

    if current.is_empty() {
        errors.insert("currentPassword", "Current password is required");
    }

    if new.is_empty() {
        errors.insert("newPassword", "New password is required");
    } else if new.chars().count() < PASSWORD_MIN_LEN {
        errors.insert(
            "newPassword",
            format!("New password must be at least {} characters", PASSWORD_MIN_LEN),
        );
    }

    if confirm != new {
        errors.insert("confirmPassword", "Passwords do not match");
    }

    errors.into_result()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_lengths_are_measured_after_trimming() {
        let errors = validate_record("  ab  ", "   short   ").unwrap_err();
        assert_eq!(errors.get("title"), Some("Title must be at least 3 characters"));
        assert_eq!(
            errors.get("description"),
            Some("Description must be at least 10 characters")
        );

        assert!(validate_record("abc", "0123456789").is_ok());
    }

    #[test]
    fn blank_record_fields_are_required() {
        let errors = validate_record("   ", "").unwrap_err();
        assert_eq!(errors.get("title"), Some("Title is required"));
        assert_eq!(errors.get("description"), Some("Description is required"));
        assert_eq!(errors.len(), 2);
    }

    #[test]
    fn multibyte_titles_count_characters() {
        assert!(validate_record("ñañ", "descripción larga").is_ok());
    }

    #[test]
    fn login_checks() {
        let errors = validate_login("nuevo.test.com", "").unwrap_err();
        assert_eq!(errors.get("email"), Some("Email format is invalid"));
        assert_eq!(errors.get("password"), Some("Password is required"));
        assert!(validate_login("nuevo@test.com", "password123").is_ok());
    }

    #[test]
    fn password_change_checks() {
        let errors = validate_password_change("", "12345", "54321").unwrap_err();
        assert!(errors.get("currentPassword").is_some());
        assert_eq!(
            errors.get("newPassword"),
            Some("New password must be at least 6 characters")
        );
        assert_eq!(errors.get("confirmPassword"), Some("Passwords do not match"));

        assert!(validate_password_change("password123", "secret99", "secret99").is_ok());
    }

    #[test]
    fn display_joins_fields() {
        let errors = validate_profile_name(" ").unwrap_err();
        assert_eq!(errors.to_string(), "name: Name is required");
    }
}

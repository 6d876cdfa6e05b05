//! Contact-form payload validation.
//!
//! Field rules match the site's form: every field is trimmed, the name needs
//! 2 characters, the subject 5, the message 10, and the email a
//! `local@domain.tld` shape.

use std::fmt;
use std::sync::LazyLock;

use folio_core::Error;
use regex::Regex;
use serde::{Deserialize, Serialize};

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap());

/// A contact-form submission.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub message: String,
}

/// Per-field validation messages.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormErrors {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl FormErrors {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.email.is_none() && self.subject.is_none() && self.message.is_none()
    }
}

impl fmt::Display for FormErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages: Vec<&str> = [&self.name, &self.email, &self.subject, &self.message]
            .into_iter()
            .filter_map(|m| m.as_deref())
            .collect();
        f.write_str(&messages.join("; "))
    }
}

fn min_length(value: &str, min: usize, label: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Some(format!("{label} is required"))
    } else if trimmed.chars().count() < min {
        Some(format!("{label} must be at least {min} characters"))
    } else {
        None
    }
}

impl ContactForm {
    /// Interpret an opaque JSON payload as a contact form.
    pub fn from_value(value: &serde_json::Value) -> Result<Self, Error> {
        serde_json::from_value(value.clone()).map_err(|e| Error::InvalidInput(format!("malformed contact form: {e}")))
    }

    /// Check every field, collecting all failures.
    pub fn validate(&self) -> Result<(), FormErrors> {
        let email = self.email.trim();
        let errors = FormErrors {
            name: min_length(&self.name, 2, "Name"),
            email: if email.is_empty() {
                Some("Email is required".to_string())
            } else if !EMAIL_RE.is_match(email) {
                Some("Please enter a valid email address".to_string())
            } else {
                None
            },
            subject: min_length(&self.subject, 5, "Subject"),
            message: min_length(&self.message, 10, "Message"),
        };

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}

/// Validate an opaque payload, mapping failures to `INVALID_INPUT`.
pub fn validate_payload(value: &serde_json::Value) -> Result<(), Error> {
    ContactForm::from_value(value)?
        .validate()
        .map_err(|errors| Error::InvalidInput(errors.to_string()))
}

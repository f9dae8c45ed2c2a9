//! Presence and format checks for submitted forms.

use std::collections::BTreeMap;

use crate::form::FormFields;
use crate::ticket::{Priority, TicketDraft, TicketStatus, TicketUpdate};

pub const MIN_PASSWORD_LEN: usize = 6;

/// Field-scoped validation messages, keyed by form field name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(BTreeMap<String, String>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, field: &str, message: impl Into<String>) {
        self.0.insert(field.to_string(), message.into());
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
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SignupForm {
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

impl SignupForm {
    pub fn from_fields(fields: &FormFields) -> Self {
        Self {
            email: fields.get("email").trim().to_string(),
            password: fields.get("password").to_string(),
            confirm_password: fields.get("confirmPassword").to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

impl LoginForm {
    pub fn from_fields(fields: &FormFields) -> Self {
        Self {
            email: fields.get("email").trim().to_string(),
            password: fields.get("password").to_string(),
        }
    }
}

/// Submitted ticket fields, echoed back into the form on a failed create.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TicketForm {
    pub title: String,
    pub description: String,
    pub status: String,
    pub priority: String,
}

impl TicketForm {
    /// Reads the ticket fields; missing `status`/`priority` fall back to
    /// `open`/`medium`.
    pub fn from_fields(fields: &FormFields) -> Self {
        let or_default = |name: &str, default: &str| {
            fields.raw(name).unwrap_or(default).to_string()
        };
        Self {
            title: fields.get("title").trim().to_string(),
            description: fields.get("description").trim().to_string(),
            status: or_default("status", TicketStatus::default().as_str()),
            priority: or_default("priority", Priority::default().as_str()),
        }
    }

    /// Draft for a new ticket. Unknown enum values become the defaults.
    pub fn to_draft(&self) -> TicketDraft {
        TicketDraft {
            title: self.title.clone(),
            description: self.description.clone(),
            status: self.status.parse().unwrap_or_default(),
            priority: self.priority.parse().unwrap_or_default(),
        }
    }

    /// Update for an existing ticket. Unknown enum values are dropped.
    pub fn to_update(&self) -> TicketUpdate {
        TicketUpdate {
            title: self.title.clone(),
            description: self.description.clone(),
            status: self.status.parse().ok(),
            priority: self.priority.parse().ok(),
        }
    }
}

pub fn validate_signup(form: &SignupForm) -> FieldErrors {
    let mut errors = FieldErrors::new();
    check_email(&form.email, &mut errors);
    check_password(&form.password, &mut errors);

    if form.confirm_password.is_empty() {
        errors.insert("confirmPassword", "Please confirm your password");
    } else if form.confirm_password != form.password {
        errors.insert("confirmPassword", "Passwords do not match");
    }
    errors
}

pub fn validate_login(form: &LoginForm) -> FieldErrors {
    let mut errors = FieldErrors::new();
    check_email(&form.email, &mut errors);
    check_password(&form.password, &mut errors);
    errors
}

pub fn validate_ticket_title(title: &str) -> FieldErrors {
    let mut errors = FieldErrors::new();
    if title.trim().is_empty() {
        errors.insert("title", "Title is required");
    }
    errors
}

fn check_email(email: &str, errors: &mut FieldErrors) {
    let email = email.trim();
    if email.is_empty() {
        errors.insert("email", "Email is required");
    } else if !is_valid_email(email) {
        errors.insert("email", "Please enter a valid email address");
    }
}

fn check_password(password: &str, errors: &mut FieldErrors) {
    if password.is_empty() {
        errors.insert("password", "Password is required");
    } else if password.chars().count() < MIN_PASSWORD_LEN {
        errors.insert(
            "password",
            format!("Password must be at least {MIN_PASSWORD_LEN} characters"),
        );
    }
}

/// Checks the `local@domain.tld` shape. No deliverability checks.
pub fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    let labels: Vec<&str> = domain.split('.').collect();
    labels.len() >= 2 && labels.iter().all(|label| !label.is_empty())
}

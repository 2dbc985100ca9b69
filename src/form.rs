//! Registration form state and validation.
//!
use std::collections::BTreeMap;

use crate::api::{RegisterUserDto, UserDirectory};

/// Minimum password length in UTF-16 code units.
pub const MIN_PASSWORD_LEN: usize = 6;
pub const DEFAULT_SUCCESS_MESSAGE: &str = "User registered successfully!";
pub const DEFAULT_FAILURE_MESSAGE: &str = "An error occurred during registration";

/// Input fields of the registration form, in display order.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Field {
    Email,
    Password,
    FullName,
}

impl Field {
    pub const ALL: [Field; 3] = [Field::Email, Field::Password, Field::FullName];

    pub fn label(self) -> &'static str {
        match self {
            Field::Email => "Email",
            Field::Password => "Password",
            Field::FullName => "Full Name",
        }
    }

    pub fn placeholder(self) -> &'static str {
        match self {
            Field::Email => "user@example.com",
            Field::Password => "Enter your password",
            Field::FullName => "John Doe (optional)",
        }
    }

    pub fn required(self) -> bool {
        !matches!(self, Field::FullName)
    }

    pub fn masked(self) -> bool {
        matches!(self, Field::Password)
    }
}

/// `local@domain.tld`: one `@`, no whitespace, a dot inside the domain part.
pub fn is_valid_email(s: &str) -> bool {
    if s.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = s.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    domain
        .char_indices()
        .any(|(i, c)| c == '.' && i > 0 && i + 1 < domain.len())
}

/// Field-level error messages for the given input. Empty when valid.
pub fn validate(email: &str, password: &str) -> BTreeMap<Field, &'static str> {
    let mut errors = BTreeMap::new();
    if email.is_empty() {
        errors.insert(Field::Email, "Email is required");
    } else if !is_valid_email(email) {
        errors.insert(Field::Email, "Please enter a valid email address");
    }
    if password.is_empty() {
        errors.insert(Field::Password, "Password is required");
    } else if password.encode_utf16().count() < MIN_PASSWORD_LEN {
        errors.insert(Field::Password, "Password must be at least 6 characters long");
    }
    errors
}

/// Outcome of a submit attempt.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Validation failed; nothing was sent.
    Invalid,
    /// The service accepted the registration.
    Registered { message: String },
    /// The service or the transport failed; `api_error` is set on the form.
    Failed,
}

#[derive(Clone, Debug, Default)]
pub struct RegisterForm {
    pub email: String,
    pub password: String,
    pub full_name: String,
    errors: BTreeMap<Field, &'static str>,
    pub api_error: Option<String>,
    pub submitting: bool,
}

impl RegisterForm {
    pub fn value(&self, field: Field) -> &str {
        match field {
            Field::Email => &self.email,
            Field::Password => &self.password,
            Field::FullName => &self.full_name,
        }
    }

    fn value_mut(&mut self, field: Field) -> &mut String {
        match field {
            Field::Email => &mut self.email,
            Field::Password => &mut self.password,
            Field::FullName => &mut self.full_name,
        }
    }

    pub fn error(&self, field: Field) -> Option<&'static str> {
        self.errors.get(&field).copied()
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Editing a field clears its error.
    pub fn push_char(&mut self, field: Field, c: char) {
        self.value_mut(field).push(c);
        self.errors.remove(&field);
    }

    pub fn pop_char(&mut self, field: Field) {
        self.value_mut(field).pop();
        self.errors.remove(&field);
    }

    pub fn validate(&mut self) -> bool {
        self.errors = validate(&self.email, &self.password);
        self.errors.is_empty()
    }

    pub fn to_dto(&self) -> RegisterUserDto {
        RegisterUserDto {
            email: self.email.clone(),
            password: self.password.clone(),
            full_name: (!self.full_name.is_empty()).then(|| self.full_name.clone()),
        }
    }

    /// Clear values, errors and the submitting flag.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Validate and, if valid, send the registration.
    pub fn submit(&mut self, directory: &dyn UserDirectory) -> SubmitOutcome {
        self.api_error = None;
        if !self.validate() {
            self.submitting = false;
            return SubmitOutcome::Invalid;
        }
        self.submitting = true;
        let result = directory.register_user(&self.to_dto());
        self.submitting = false;
        match result {
            Ok(res) => {
                tracing::info!(email = %self.email, "registration accepted");
                let message = res
                    .message
                    .filter(|m| !m.is_empty())
                    .unwrap_or_else(|| DEFAULT_SUCCESS_MESSAGE.to_string());
                self.reset();
                SubmitOutcome::Registered { message }
            }
            Err(err) => {
                tracing::warn!(status = ?err.status(), error = %err, "registration failed");
                let mut message = err.user_message(DEFAULT_FAILURE_MESSAGE);
                let details = err.field_messages();
                if !details.is_empty() {
                    message = format!("{message} ({})", details.join("; "));
                }
                self.api_error = Some(message);
                SubmitOutcome::Failed
            }
        }
    }
}

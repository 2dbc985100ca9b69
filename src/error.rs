use std::collections::BTreeMap;

use thiserror::Error;

/// Result alias for calls to the registration service.
pub type ApiResult<T> = std::result::Result<T, ApiError>;

/// Failure talking to the registration service.
#[derive(Error, Debug)]
pub enum ApiError {
    /// The server answered with a non-success status.
    #[error("{}", rejected_message(.status, .message))]
    Rejected {
        status: u16,
        message: Option<String>,
        field_errors: BTreeMap<String, Vec<String>>,
    },

    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("invalid response body: {0}")]
    Decode(#[from] serde_json::Error),
}

fn rejected_message(status: &u16, message: &Option<String>) -> String {
    match message {
        Some(m) => m.clone(),
        None => format!("HTTP error! status: {status}"),
    }
}

impl ApiError {
    /// Text to show the user: the server's own message when it sent one,
    /// otherwise `fallback` for rejections and the error itself for
    /// transport or decoding failures.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            ApiError::Rejected { message: Some(m), .. } if !m.is_empty() => m.clone(),
            ApiError::Rejected { .. } => fallback.to_string(),
            other => other.to_string(),
        }
    }

    /// Per-field messages from a rejection, as `field: message` lines in
    /// field order.
    pub fn field_messages(&self) -> Vec<String> {
        match self {
            ApiError::Rejected { field_errors, .. } => field_errors
                .iter()
                .flat_map(|(field, msgs)| msgs.iter().map(move |m| format!("{field}: {m}")))
                .collect(),
            _ => Vec::new(),
        }
    }

    /// Text for a failed user listing. Rejections always use `fallback`;
    /// transport and decoding failures describe themselves.
    pub fn listing_message(&self, fallback: &str) -> String {
        match self {
            ApiError::Rejected { .. } => fallback.to_string(),
            other => other.to_string(),
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Rejected { status, .. } => Some(*status),
            ApiError::Transport(e) => e.status().map(|s| s.as_u16()),
            ApiError::Decode(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejected_prefers_server_message() {
        let err = ApiError::Rejected {
            status: 409,
            message: Some("Email already registered".into()),
            field_errors: BTreeMap::new(),
        };
        assert_eq!(err.to_string(), "Email already registered");
        assert_eq!(err.user_message("fallback"), "Email already registered");
        assert_eq!(err.status(), Some(409));
    }

    #[test]
    fn rejected_without_message_uses_fallback() {
        let err = ApiError::Rejected {
            status: 500,
            message: None,
            field_errors: BTreeMap::new(),
        };
        assert_eq!(err.to_string(), "HTTP error! status: 500");
        assert_eq!(
            err.user_message("An error occurred during registration"),
            "An error occurred during registration"
        );
    }

    #[test]
    fn field_messages_flatten_in_field_order() {
        let mut field_errors = BTreeMap::new();
        field_errors.insert("password".to_string(), vec!["too weak".to_string()]);
        field_errors.insert(
            "email".to_string(),
            vec!["taken".to_string(), "blocked domain".to_string()],
        );
        let err = ApiError::Rejected {
            status: 400,
            message: Some("Validation failed".into()),
            field_errors,
        };
        assert_eq!(
            err.field_messages(),
            vec!["email: taken", "email: blocked domain", "password: too weak"]
        );
    }

    #[test]
    fn listing_rejections_use_fallback() {
        let err = ApiError::Rejected {
            status: 502,
            message: Some("HTTP error! status: 502".into()),
            field_errors: BTreeMap::new(),
        };
        assert_eq!(err.listing_message("Failed to fetch users."), "Failed to fetch users.");
        let decode = ApiError::from(serde_json::from_str::<u32>("nope").unwrap_err());
        assert!(decode.listing_message("x").starts_with("invalid response body"));
    }

    #[test]
    fn decode_errors_show_themselves() {
        let source = serde_json::from_str::<u32>("nope").unwrap_err();
        let err = ApiError::from(source);
        assert!(err.user_message("fallback").starts_with("invalid response body"));
        assert_eq!(err.status(), None);
    }
}

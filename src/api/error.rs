//! API Errors
//!
//! Classification of failed backend calls and their user-facing messages.

use std::fmt;

use serde_json::Value;
use thiserror::Error;

pub type ApiResult<T> = Result<T, ApiError>;

/// Keys the service uses for non-field messages
const GENERAL_KEYS: [&str; 3] = ["detail", "error", "non_field_errors"];

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ApiError {
    /// 401: the session is no longer valid
    #[error("authentication required")]
    Unauthorized { detail: Option<String> },
    /// 403
    #[error("permission denied")]
    Forbidden { detail: Option<String> },
    /// 404
    #[error("not found")]
    NotFound,
    /// 400 with field-level messages
    #[error("validation failed: {0}")]
    Validation(FieldErrors),
    /// Any other non-success status
    #[error("server responded with status {status}")]
    Server { status: u16, detail: Option<String> },
    /// Request never produced a response
    #[error("network error: {0}")]
    Network(String),
    /// Response body did not have the expected shape
    #[error("unexpected response: {0}")]
    Decode(String),
}

impl ApiError {
    pub fn from_response(status: u16, body: &Value) -> Self {
        let detail = general_message(body);
        match status {
            401 => ApiError::Unauthorized { detail },
            403 => ApiError::Forbidden { detail },
            404 => ApiError::NotFound,
            400 => ApiError::Validation(FieldErrors::from_value(body)),
            _ => ApiError::Server { status, detail },
        }
    }

    /// Server-provided explanation, if any
    pub fn detail(&self) -> Option<String> {
        match self {
            ApiError::Unauthorized { detail }
            | ApiError::Forbidden { detail }
            | ApiError::Server { detail, .. } => detail.clone(),
            ApiError::Validation(fields) => fields.general(),
            ApiError::NotFound | ApiError::Network(_) | ApiError::Decode(_) => None,
        }
    }

    pub fn is_forbidden(&self) -> bool {
        matches!(self, ApiError::Forbidden { .. })
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::NotFound)
    }

    /// Message suitable for showing next to the failed action
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Unauthorized { .. } => "Your session has expired. Please sign in again.".to_string(),
            ApiError::Forbidden { detail } => detail
                .clone()
                .unwrap_or_else(|| "You do not have permission to perform this action.".to_string()),
            ApiError::NotFound => "The requested item could not be found.".to_string(),
            ApiError::Validation(fields) if fields.is_empty() => "Please check the form and try again.".to_string(),
            ApiError::Validation(fields) => fields.to_string(),
            ApiError::Server { detail: Some(detail), .. } => detail.clone(),
            ApiError::Server { .. } => "Something went wrong on the server. Please try again.".to_string(),
            ApiError::Network(_) => "Could not reach the server. Check your connection and try again.".to_string(),
            ApiError::Decode(_) => "Received an unexpected response from the server.".to_string(),
        }
    }
}

fn general_message(body: &Value) -> Option<String> {
    let object = body.as_object()?;
    GENERAL_KEYS
        .iter()
        .filter_map(|key| object.get(*key))
        .find_map(|value| messages_of(value).into_iter().next())
}

fn messages_of(value: &Value) -> Vec<String> {
    match value {
        Value::Null => Vec::new(),
        Value::String(message) => vec![message.clone()],
        Value::Array(values) => values.iter().flat_map(messages_of).collect(),
        other => vec![other.to_string()],
    }
}

/// Field name → messages, in the order the service sent them
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldErrors(Vec<(String, Vec<String>)>);

impl FieldErrors {
    pub fn from_value(body: &Value) -> Self {
        match body {
            Value::Object(map) => Self(
                map.iter()
                    .map(|(field, value)| (field.clone(), messages_of(value)))
                    .filter(|(_, messages)| !messages.is_empty())
                    .collect(),
            ),
            Value::String(message) => Self(vec![("error".to_string(), vec![message.clone()])]),
            _ => Self::default(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Add a message, grouped under an existing field entry if present
    pub fn push(&mut self, field: &str, message: impl Into<String>) {
        match self.0.iter_mut().find(|(name, _)| name == field) {
            Some((_, messages)) => messages.push(message.into()),
            None => self.0.push((field.to_string(), vec![message.into()])),
        }
    }

    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, messages)| messages.as_slice())
    }

    /// First non-field message (`detail`, `error` or `non_field_errors`)
    pub fn general(&self) -> Option<String> {
        GENERAL_KEYS
            .iter()
            .find_map(|key| self.get(key).and_then(|messages| messages.first().cloned()))
    }

    /// One `field: message, message` line per field
    pub fn lines(&self) -> Vec<String> {
        self.0
            .iter()
            .map(|(field, messages)| {
                if GENERAL_KEYS.contains(&field.as_str()) {
                    messages.join(", ")
                } else {
                    format!("{}: {}", field, messages.join(", "))
                }
            })
            .collect()
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.lines().join("\n"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_status_classification() {
        assert!(matches!(
            ApiError::from_response(401, &json!({"error": "Invalid credentials"})),
            ApiError::Unauthorized { detail: Some(d) } if d == "Invalid credentials"
        ));
        assert!(ApiError::from_response(403, &json!({})).is_forbidden());
        assert!(ApiError::from_response(404, &Value::Null).is_not_found());
        assert_eq!(
            ApiError::from_response(502, &json!({"detail": "Bad gateway"})),
            ApiError::Server { status: 502, detail: Some("Bad gateway".to_string()) }
        );
    }

    #[test]
    fn test_validation_messages_keep_server_order() {
        let err = ApiError::from_response(
            400,
            &json!({"title": ["Ensure this field has at least 5 characters."], "board": ["This field is required.", "Invalid pk."]}),
        );
        assert_eq!(
            err.user_message(),
            "title: Ensure this field has at least 5 characters.\nboard: This field is required., Invalid pk."
        );
    }

    #[test]
    fn test_general_message_from_validation() {
        let err = ApiError::from_response(400, &json!({"error": "Username and password are required"}));
        assert_eq!(err.detail().as_deref(), Some("Username and password are required"));
        assert_eq!(err.user_message(), "Username and password are required");
    }

    #[test]
    fn test_forbidden_prefers_server_detail() {
        let err = ApiError::Forbidden { detail: Some("Only moderators can do that.".to_string()) };
        assert_eq!(err.user_message(), "Only moderators can do that.");
        let err = ApiError::Forbidden { detail: None };
        assert!(err.user_message().contains("permission"));
    }
}

//! Error translation
//!
//! Maps a backend status and raw body onto the gateway's error taxonomy and
//! the messages shown to the user. Every flow goes through here so the same
//! body always reads the same way.

use crate::forms::FieldErrors;
use reqwest::StatusCode;
use serde_json::Value;

pub const CONNECTION_FAILED: &str =
    "Unable to connect to the API server. Please ensure the backend is running.";
pub const SESSION_EXPIRED: &str = "Session expired. Please sign in again.";
pub const MALFORMED_RESPONSE: &str = "Invalid response from server.";

/// Body keys that describe the whole request rather than one field
const NON_FIELD_KEYS: [&str; 2] = ["detail", "non_field_errors"];

/// Loose error body resolved once into a tagged shape
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorDetail {
    FieldErrors(FieldErrors),
    PlainMessage(String),
    None,
}

/// Why an operation did not succeed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorOutcome {
    ValidationFailed(FieldErrors),
    /// `None` when the backend was unreachable, otherwise the transport fault
    ConnectionFailed { detail: Option<String> },
    SessionExpired,
    ApiRejected { status: StatusCode, detail: ErrorDetail },
    MalformedResponse,
}

impl ErrorOutcome {
    pub fn messages(&self) -> Vec<String> {
        match self {
            ErrorOutcome::ValidationFailed(errors) => errors.messages(),
            ErrorOutcome::ConnectionFailed { detail: None } => vec![CONNECTION_FAILED.to_string()],
            ErrorOutcome::ConnectionFailed {
                detail: Some(detail),
            } => vec![format!("Request failed: {}", detail)],
            ErrorOutcome::SessionExpired => vec![SESSION_EXPIRED.to_string()],
            ErrorOutcome::ApiRejected { status, detail } => match detail {
                ErrorDetail::FieldErrors(errors) => errors.messages(),
                ErrorDetail::PlainMessage(message) => vec![message.clone()],
                ErrorDetail::None => vec![generic_failure(*status)],
            },
            ErrorOutcome::MalformedResponse => vec![MALFORMED_RESPONSE.to_string()],
        }
    }
}

/// Translate a response whose status is not the operation's success code
pub fn translate(status: StatusCode, body: &str) -> ErrorOutcome {
    if status == StatusCode::UNAUTHORIZED {
        return ErrorOutcome::SessionExpired;
    }

    ErrorOutcome::ApiRejected {
        status,
        detail: parse_detail(body),
    }
}

pub fn parse_detail(body: &str) -> ErrorDetail {
    let body = body.trim();
    if body.is_empty() {
        return ErrorDetail::None;
    }

    match serde_json::from_str::<Value>(body) {
        Ok(Value::Object(map)) => {
            let mut errors = FieldErrors::default();
            for (key, value) in &map {
                for message in value_messages(value) {
                    if NON_FIELD_KEYS.contains(&key.as_str()) {
                        errors.push_non_field(message);
                    } else {
                        errors.push(key, message);
                    }
                }
            }

            if errors.is_empty() {
                ErrorDetail::None
            } else {
                ErrorDetail::FieldErrors(errors)
            }
        }
        Ok(value) => ErrorDetail::PlainMessage(stringify(&value)),
        Err(_) => ErrorDetail::None,
    }
}

pub fn generic_failure(status: StatusCode) -> String {
    format!("operation failed (status {})", status.as_u16())
}

fn value_messages(value: &Value) -> Vec<String> {
    match value {
        Value::Array(items) => items.iter().map(stringify).collect(),
        other => vec![stringify(other)],
    }
}

fn stringify(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unauthorized_is_session_expiry_whatever_the_body() {
        assert_eq!(
            translate(StatusCode::UNAUTHORIZED, r#"{"detail": "Token is invalid"}"#),
            ErrorOutcome::SessionExpired
        );
        assert_eq!(
            translate(StatusCode::UNAUTHORIZED, "").messages(),
            vec![SESSION_EXPIRED.to_string()]
        );
    }

    #[test]
    fn field_errors_are_humanized_in_order() {
        let outcome = translate(
            StatusCode::BAD_REQUEST,
            r#"{"employee_email": ["Enter a valid email address."]}"#,
        );
        assert_eq!(
            outcome.messages(),
            vec!["Employee Email: Enter a valid email address.".to_string()]
        );
    }

    #[test]
    fn several_errors_per_field_each_get_a_message() {
        let outcome = translate(
            StatusCode::BAD_REQUEST,
            r#"{"username": ["A user with that username already exists.", "Too short."], "email": ["Taken."]}"#,
        );
        assert_eq!(
            outcome.messages(),
            vec![
                "Username: A user with that username already exists.".to_string(),
                "Username: Too short.".to_string(),
                "Email: Taken.".to_string(),
            ]
        );
    }

    #[test]
    fn detail_keys_are_not_prefixed() {
        let outcome = translate(
            StatusCode::FORBIDDEN,
            r#"{"detail": "You do not have permission to perform this action."}"#,
        );
        assert_eq!(
            outcome.messages(),
            vec!["You do not have permission to perform this action.".to_string()]
        );

        let outcome = translate(
            StatusCode::BAD_REQUEST,
            r#"{"non_field_errors": ["Passwords must match."]}"#,
        );
        assert_eq!(outcome.messages(), vec!["Passwords must match.".to_string()]);
    }

    #[test]
    fn non_string_values_are_stringified() {
        let outcome = translate(
            StatusCode::BAD_REQUEST,
            r#"{"employee_contact": [12, {"code": "x"}]}"#,
        );
        assert_eq!(
            outcome.messages(),
            vec![
                "Employee Contact: 12".to_string(),
                r#"Employee Contact: {"code":"x"}"#.to_string(),
            ]
        );
    }

    #[test]
    fn non_mapping_bodies_become_a_single_message() {
        assert_eq!(
            parse_detail(r#""Service temporarily unavailable""#),
            ErrorDetail::PlainMessage("Service temporarily unavailable".to_string())
        );
        assert_eq!(
            parse_detail(r#"["a", "b"]"#),
            ErrorDetail::PlainMessage(r#"["a","b"]"#.to_string())
        );
    }

    #[test]
    fn absent_or_unparseable_body_is_generic() {
        let outcome = translate(StatusCode::INTERNAL_SERVER_ERROR, "");
        assert_eq!(outcome.messages(), vec!["operation failed (status 500)".to_string()]);

        let outcome = translate(StatusCode::BAD_GATEWAY, "<html>Bad Gateway</html>");
        assert_eq!(outcome.messages(), vec!["operation failed (status 502)".to_string()]);

        let outcome = translate(StatusCode::BAD_REQUEST, "{}");
        assert_eq!(outcome.messages(), vec!["operation failed (status 400)".to_string()]);
    }

    #[test]
    fn transport_messages() {
        assert_eq!(
            ErrorOutcome::ConnectionFailed { detail: None }.messages(),
            vec![CONNECTION_FAILED.to_string()]
        );
        assert_eq!(
            ErrorOutcome::ConnectionFailed {
                detail: Some("operation timed out".to_string())
            }
            .messages(),
            vec!["Request failed: operation timed out".to_string()]
        );
        assert_eq!(
            ErrorOutcome::MalformedResponse.messages(),
            vec![MALFORMED_RESPONSE.to_string()]
        );
    }
}

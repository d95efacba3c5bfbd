//! Flow handlers
//!
//! One orchestration per use case: validate, check the session, call the
//! backend, translate failures. Flows never touch HTTP types or cookies
//! directly; they return an [`Outcome`] that the `api` layer turns into a
//! response.

pub mod account;
pub mod employees;

use crate::auth::SessionChange;
use crate::forms::EmployeeInput;
use crate::services::translator::{self, ErrorOutcome};
use crate::services::{ApiOutcome, ApiRequest, ApiResponse, Backend};
use empdesk_protocol::EmployeeRecord;
use reqwest::StatusCode;
use serde::{de::DeserializeOwned, Deserialize, Serialize};

pub const SIGN_IN_REQUIRED: &str = "Please sign in to access this page.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Success,
    Warning,
    Error,
}

/// A one-shot notice shown on the next rendered page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub level: Level,
    pub text: String,
}

impl Message {
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            level: Level::Success,
            text: text.into(),
        }
    }

    pub fn warning(text: impl Into<String>) -> Self {
        Self {
            level: Level::Warning,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            level: Level::Error,
            text: text.into(),
        }
    }
}

/// Redirect targets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    SignIn,
    SignUp,
    EmployeeList,
}

impl Page {
    pub fn path(&self) -> &'static str {
        match self {
            Page::SignIn => "/signin/",
            Page::SignUp => "/signup/",
            Page::EmployeeList => "/list/",
        }
    }
}

/// Pages rendered in place, with whatever the user typed kept for redisplay
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum View {
    SignIn { username: String },
    SignUp { username: String, email: String },
    EmployeeList { employees: Vec<EmployeeRecord> },
    CreateEmployee { form: EmployeeInput },
    UpdateEmployee { id: u64, form: EmployeeInput },
    DeleteEmployee { id: u64, employee: EmployeeRecord },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Redirect(Page),
    Render(View),
}

/// Terminal state of one flow invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub reply: Reply,
    pub messages: Vec<Message>,
    pub session: SessionChange,
}

impl Outcome {
    pub fn redirect(page: Page) -> Self {
        Self {
            reply: Reply::Redirect(page),
            messages: Vec::new(),
            session: SessionChange::Keep,
        }
    }

    pub fn render(view: View) -> Self {
        Self {
            reply: Reply::Render(view),
            messages: Vec::new(),
            session: SessionChange::Keep,
        }
    }

    pub fn with_message(mut self, message: Message) -> Self {
        self.messages.push(message);
        self
    }

    /// Attach each text as an error-level message
    pub fn with_errors(mut self, texts: Vec<String>) -> Self {
        self.messages.extend(texts.into_iter().map(Message::error));
        self
    }

    pub fn with_session(mut self, session: SessionChange) -> Self {
        self.session = session;
        self
    }

    /// Any 401 ends here: both cookies cleared, back to sign-in
    pub fn session_expired() -> Self {
        Self::redirect(Page::SignIn)
            .with_message(Message::error(translator::SESSION_EXPIRED))
            .with_session(SessionChange::Terminate)
    }

    pub fn sign_in_required() -> Self {
        Self::redirect(Page::SignIn).with_message(Message::warning(SIGN_IN_REQUIRED))
    }
}

/// Routes a failure: 401 always logs the user out, anything else goes to
/// `otherwise` with the translated messages.
pub(crate) fn on_failure(
    error: ErrorOutcome,
    otherwise: impl FnOnce(Vec<String>) -> Outcome,
) -> Outcome {
    match error {
        ErrorOutcome::SessionExpired => {
            tracing::info!("Backend rejected the access token, ending session");
            Outcome::session_expired()
        }
        other => otherwise(other.messages()),
    }
}

/// Single backend call; any status but `expected` is translated
pub(crate) async fn expect_status(
    backend: &dyn Backend,
    request: ApiRequest,
    expected: StatusCode,
) -> Result<ApiResponse, ErrorOutcome> {
    match backend.call(request).await {
        ApiOutcome::Responded(response) if response.status == expected => Ok(response),
        ApiOutcome::Responded(response) => {
            tracing::debug!(status = %response.status, %expected, "Unexpected backend status");
            Err(translator::translate(response.status, &response.body))
        }
        ApiOutcome::ConnectionFailed => Err(ErrorOutcome::ConnectionFailed { detail: None }),
        ApiOutcome::RequestFailed(detail) => Err(ErrorOutcome::ConnectionFailed {
            detail: Some(detail),
        }),
    }
}

/// [`expect_status`] with a JSON body. A body that cannot be encoded fails
/// the call before anything is sent.
pub(crate) async fn send_json<T: Serialize + ?Sized + Sync>(
    backend: &dyn Backend,
    request: ApiRequest,
    body: &T,
    expected: StatusCode,
) -> Result<ApiResponse, ErrorOutcome> {
    let request = request.json(body).map_err(|e| {
        tracing::error!("Could not encode request body: {}", e);
        ErrorOutcome::ConnectionFailed {
            detail: Some(e.to_string()),
        }
    })?;
    expect_status(backend, request, expected).await
}

/// Decode a success body; anything unexpected is a malformed response
pub(crate) fn decode<T: DeserializeOwned>(response: &ApiResponse) -> Result<T, ErrorOutcome> {
    serde_json::from_str(&response.body).map_err(|e| {
        tracing::warn!("Could not decode backend response: {}", e);
        ErrorOutcome::MalformedResponse
    })
}


#[cfg(test)]
mod tests {
    use super::testing::ScriptedBackend;
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn expected_status_passes_through() {
        let backend = ScriptedBackend::new().respond(StatusCode::CREATED, json!({ "id": 1 }));
        let response = expect_status(&backend, ApiRequest::post("employees/"), StatusCode::CREATED)
            .await
            .unwrap();
        assert_eq!(response.status, StatusCode::CREATED);
    }

    #[tokio::test]
    async fn a_different_success_code_is_still_a_failure() {
        let backend = ScriptedBackend::new().respond(StatusCode::OK, json!({}));
        let error = expect_status(&backend, ApiRequest::post("employees/"), StatusCode::CREATED)
            .await
            .unwrap_err();
        assert!(matches!(
            error,
            ErrorOutcome::ApiRejected { status, .. } if status == StatusCode::OK
        ));
    }

    #[tokio::test]
    async fn transport_failures_map_to_connection_failed() {
        let backend = ScriptedBackend::new()
            .then(ApiOutcome::ConnectionFailed)
            .then(ApiOutcome::RequestFailed("operation timed out".to_string()));

        let first = expect_status(&backend, ApiRequest::get("employees/"), StatusCode::OK).await;
        assert_eq!(first, Err(ErrorOutcome::ConnectionFailed { detail: None }));

        let second = expect_status(&backend, ApiRequest::get("employees/"), StatusCode::OK).await;
        assert_eq!(
            second,
            Err(ErrorOutcome::ConnectionFailed {
                detail: Some("operation timed out".to_string())
            })
        );
    }

    #[tokio::test]
    async fn send_json_serializes_protocol_types() {
        let backend = ScriptedBackend::new().respond(StatusCode::CREATED, json!({ "id": 3 }));
        let record = EmployeeRecord {
            id: None,
            employee_id: "E-3".to_string(),
            employee_name: "Grace".to_string(),
            employee_email: "grace@example.com".to_string(),
            employee_contact: "1".to_string(),
        };

        send_json(&backend, ApiRequest::post("employees/"), &record, StatusCode::CREATED)
            .await
            .unwrap();

        assert_eq!(
            backend.calls()[0].body,
            Some(json!({
                "employee_id": "E-3",
                "employee_name": "Grace",
                "employee_email": "grace@example.com",
                "employee_contact": "1",
            }))
        );
    }

    #[tokio::test]
    async fn unencodable_body_fails_without_a_call() {
        let backend = ScriptedBackend::new();
        let body = std::collections::HashMap::from([((1u8, 2u8), 3u8)]);

        let error = send_json(&backend, ApiRequest::post("employees/"), &body, StatusCode::OK)
            .await
            .unwrap_err();

        assert!(matches!(error, ErrorOutcome::ConnectionFailed { detail: Some(_) }));
        assert!(backend.calls().is_empty());
    }

    #[test]
    fn levels_serialize_lowercase() {
        let json = serde_json::to_string(&[Level::Success, Level::Warning, Level::Error]).unwrap();
        assert_eq!(json, r#"["success","warning","error"]"#);
    }

    #[test]
    fn session_expired_terminates_and_redirects() {
        let outcome = on_failure(ErrorOutcome::SessionExpired, |_| unreachable!());
        assert_eq!(outcome.reply, Reply::Redirect(Page::SignIn));
        assert_eq!(outcome.session, SessionChange::Terminate);
        assert_eq!(outcome.messages, vec![Message::error(translator::SESSION_EXPIRED)]);
    }

    #[test]
    fn decode_failure_is_malformed() {
        let response = ApiResponse {
            status: StatusCode::OK,
            body: "not json".to_string(),
        };
        assert_eq!(
            decode::<Vec<EmployeeRecord>>(&response),
            Err(ErrorOutcome::MalformedResponse)
        );
    }
}

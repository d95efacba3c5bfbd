//! Register, sign-in and sign-out

use super::{decode, on_failure, send_json, Message, Outcome, Page, View};
use crate::auth::SessionChange;
use crate::forms::{self, LoginInput, RegistrationInput};
use crate::services::backend::{REGISTER_PATH, TOKEN_PATH};
use crate::services::{ApiRequest, Backend, ErrorOutcome};
use empdesk_protocol::TokenPair;
use reqwest::StatusCode;

pub const ACCOUNT_CREATED: &str = "Account created successfully! Please sign in.";
pub const SIGNED_IN: &str = "Successfully signed in!";
pub const SIGNED_OUT: &str = "Successfully signed out!";
pub const INVALID_CREDENTIALS: &str = "Invalid username or password.";

pub fn sign_up_form() -> Outcome {
    Outcome::render(View::SignUp {
        username: String::new(),
        email: String::new(),
    })
}

pub fn sign_in_form() -> Outcome {
    Outcome::render(View::SignIn {
        username: String::new(),
    })
}

pub async fn register(backend: &dyn Backend, input: RegistrationInput) -> Outcome {
    let redisplay = View::SignUp {
        username: input.username.trim().to_string(),
        email: input.email.trim().to_string(),
    };

    let registration = match forms::validate_registration(&input) {
        Ok(registration) => registration,
        Err(errors) => {
            return Outcome::render(redisplay).with_errors(errors.messages());
        }
    };

    tracing::info!(username = %registration.username, "Registering account");

    let request = ApiRequest::post(REGISTER_PATH);
    match send_json(backend, request, &registration, StatusCode::CREATED).await {
        Ok(_) => Outcome::redirect(Page::SignIn).with_message(Message::success(ACCOUNT_CREATED)),
        Err(error) => on_failure(error, |messages| {
            Outcome::render(redisplay).with_errors(messages)
        }),
    }
}

pub async fn sign_in(backend: &dyn Backend, input: LoginInput) -> Outcome {
    let redisplay = View::SignIn {
        username: input.username.trim().to_string(),
    };

    let credentials = match forms::validate_login(&input) {
        Ok(credentials) => credentials,
        Err(errors) => {
            return Outcome::render(redisplay).with_errors(errors.messages());
        }
    };

    tracing::info!(username = %credentials.username, "Attempting sign in");

    let request = ApiRequest::post(TOKEN_PATH);
    let result = send_json(backend, request, &credentials, StatusCode::OK)
        .await
        .and_then(|response| decode::<TokenPair>(&response))
        .and_then(|tokens| {
            if tokens.access.is_empty() || tokens.refresh.is_empty() {
                Err(ErrorOutcome::MalformedResponse)
            } else {
                Ok(tokens)
            }
        });

    match result {
        Ok(tokens) => {
            tracing::info!("Sign in succeeded");
            Outcome::redirect(Page::EmployeeList)
                .with_message(Message::success(SIGNED_IN))
                .with_session(SessionChange::Establish(tokens))
        }
        // A 401 here means bad credentials, not an expired session
        Err(ErrorOutcome::SessionExpired) => {
            tracing::info!("Sign in rejected");
            Outcome::render(redisplay)
                .with_message(Message::error(INVALID_CREDENTIALS))
                .with_session(SessionChange::Terminate)
        }
        Err(error) => Outcome::render(redisplay).with_errors(error.messages()),
    }
}

pub fn sign_out() -> Outcome {
    Outcome::redirect(Page::SignIn)
        .with_message(Message::success(SIGNED_OUT))
        .with_session(SessionChange::Terminate)
}

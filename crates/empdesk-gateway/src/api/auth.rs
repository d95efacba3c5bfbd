use super::{form_or_default, render::respond};
use crate::flows::account;
use crate::forms::{LoginInput, RegistrationInput};
use crate::state::AppState;
use axum::{
    extract::{rejection::FormRejection, State},
    response::Response,
    Form,
};
use axum_extra::extract::cookie::CookieJar;

pub async fn sign_up_page(jar: CookieJar) -> Response {
    respond(jar, account::sign_up_form())
}

pub async fn sign_up(
    State(state): State<AppState>,
    jar: CookieJar,
    form: Result<Form<RegistrationInput>, FormRejection>,
) -> Response {
    let outcome = account::register(state.backend.as_ref(), form_or_default(form)).await;
    respond(jar, outcome)
}

pub async fn sign_in_page(jar: CookieJar) -> Response {
    respond(jar, account::sign_in_form())
}

pub async fn sign_in(
    State(state): State<AppState>,
    jar: CookieJar,
    form: Result<Form<LoginInput>, FormRejection>,
) -> Response {
    let outcome = account::sign_in(state.backend.as_ref(), form_or_default(form)).await;
    respond(jar, outcome)
}

pub async fn sign_out(jar: CookieJar) -> Response {
    respond(jar, account::sign_out())
}

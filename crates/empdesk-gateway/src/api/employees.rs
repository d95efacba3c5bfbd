use super::{form_or_default, render::respond};
use crate::auth::SessionCookies;
use crate::flows::employees;
use crate::forms::EmployeeInput;
use crate::state::AppState;
use axum::{
    extract::{rejection::FormRejection, Path, State},
    response::Response,
    Form,
};
use axum_extra::extract::cookie::CookieJar;

pub async fn list(State(state): State<AppState>, jar: CookieJar) -> Response {
    let session = SessionCookies::from_jar(&jar);
    let outcome = employees::list(state.backend.as_ref(), &session).await;
    respond(jar, outcome)
}

pub async fn create_page(jar: CookieJar) -> Response {
    let session = SessionCookies::from_jar(&jar);
    respond(jar, employees::new_form(&session))
}

pub async fn create(
    State(state): State<AppState>,
    jar: CookieJar,
    form: Result<Form<EmployeeInput>, FormRejection>,
) -> Response {
    let session = SessionCookies::from_jar(&jar);
    let input = form_or_default(form);
    let outcome = employees::create(state.backend.as_ref(), &session, input).await;
    respond(jar, outcome)
}

pub async fn update_page(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    jar: CookieJar,
) -> Response {
    let session = SessionCookies::from_jar(&jar);
    let outcome = employees::edit(state.backend.as_ref(), &session, id).await;
    respond(jar, outcome)
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    jar: CookieJar,
    form: Result<Form<EmployeeInput>, FormRejection>,
) -> Response {
    let session = SessionCookies::from_jar(&jar);
    let input = form_or_default(form);
    let outcome = employees::update(state.backend.as_ref(), &session, id, input).await;
    respond(jar, outcome)
}

pub async fn delete_page(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    jar: CookieJar,
) -> Response {
    let session = SessionCookies::from_jar(&jar);
    let outcome = employees::confirm_delete(state.backend.as_ref(), &session, id).await;
    respond(jar, outcome)
}

pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    jar: CookieJar,
) -> Response {
    let session = SessionCookies::from_jar(&jar);
    let outcome = employees::delete(state.backend.as_ref(), &session, id).await;
    respond(jar, outcome)
}

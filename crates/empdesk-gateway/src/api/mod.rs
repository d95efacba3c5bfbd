mod auth;
mod employees;
mod flash;
mod render;
mod views;

use crate::state::AppState;
use axum::{extract::rejection::FormRejection, routing::get, Form, Router};
use tower_http::trace::TraceLayer;

/// A body that is not a readable urlencoded form counts as an empty form, so
/// the session guard and field validation still run
fn form_or_default<T: Default>(form: Result<Form<T>, FormRejection>) -> T {
    match form {
        Ok(Form(input)) => input,
        Err(rejection) => {
            tracing::debug!("Treating unreadable form body as empty: {}", rejection);
            T::default()
        }
    }
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(|| async { "OK" }))
        // Account routes
        .route("/", get(auth::sign_in_page).post(auth::sign_in))
        .route("/signin/", get(auth::sign_in_page).post(auth::sign_in))
        .route("/signup/", get(auth::sign_up_page).post(auth::sign_up))
        .route("/signout/", get(auth::sign_in_page).post(auth::sign_out))
        // Employee routes
        .route("/list/", get(employees::list))
        .route("/create/", get(employees::create_page).post(employees::create))
        .route("/update/{id}/", get(employees::update_page).post(employees::update))
        .route("/delete/{id}/", get(employees::delete_page).post(employees::delete))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

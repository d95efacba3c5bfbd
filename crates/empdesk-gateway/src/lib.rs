//! Employee desk gateway
//!
//! Serves the sign-in, sign-up and employee pages and forwards every action
//! to the employee REST backend with the visitor's bearer token.

pub mod api;
pub mod auth;
pub mod error;
pub mod flows;
pub mod forms;
pub mod services;
pub mod state;

use error::Result;

/// Create and configure the gateway application
pub fn create_app(config: state::Config) -> Result<axum::Router> {
    let app_state = state::AppState::new(config)?;
    Ok(api::create_router(app_state))
}

//! Cookie-held sessions
//!
//! The whole session is two cookies carrying the backend's token pair. A
//! request is authenticated when it carries a non-empty access token; the
//! backend decides whether that token is still good.

use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use empdesk_protocol::TokenPair;

pub const ACCESS_TOKEN_COOKIE: &str = "access_token";
pub const REFRESH_TOKEN_COOKIE: &str = "refresh_token";

/// Session state read from an inbound request
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionCookies {
    pub access_token: Option<String>,
    /// Kept alongside the access token; never used to renew it
    pub refresh_token: Option<String>,
}

impl SessionCookies {
    pub fn from_jar(jar: &CookieJar) -> Self {
        Self {
            access_token: non_empty(jar, ACCESS_TOKEN_COOKIE),
            refresh_token: non_empty(jar, REFRESH_TOKEN_COOKIE),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.access_token.is_some()
    }

    pub fn bearer_token(&self) -> Option<&str> {
        self.access_token.as_deref()
    }
}

/// What a flow wants done to the session cookies
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SessionChange {
    #[default]
    Keep,
    Establish(TokenPair),
    Terminate,
}

/// Set both session cookies for the lifetime of the browser session
pub fn establish(jar: CookieJar, tokens: &TokenPair) -> CookieJar {
    jar.add(session_cookie(ACCESS_TOKEN_COOKIE, tokens.access.clone()))
        .add(session_cookie(REFRESH_TOKEN_COOKIE, tokens.refresh.clone()))
}

/// Clear both session cookies, whether or not the request carried them
pub fn terminate(jar: CookieJar) -> CookieJar {
    jar.add(removal_cookie(ACCESS_TOKEN_COOKIE))
        .add(removal_cookie(REFRESH_TOKEN_COOKIE))
}

pub fn apply(jar: CookieJar, change: &SessionChange) -> CookieJar {
    match change {
        SessionChange::Keep => jar,
        SessionChange::Establish(tokens) => {
            tracing::debug!("Establishing session cookies");
            establish(jar, tokens)
        }
        SessionChange::Terminate => {
            tracing::debug!("Clearing session cookies");
            terminate(jar)
        }
    }
}

pub(crate) fn session_cookie(name: &'static str, value: String) -> Cookie<'static> {
    Cookie::build((name, value))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Strict)
        .build()
}

pub(crate) fn removal_cookie(name: &'static str) -> Cookie<'static> {
    let mut cookie = session_cookie(name, String::new());
    cookie.make_removal();
    cookie
}

fn non_empty(jar: &CookieJar, name: &str) -> Option<String> {
    jar.get(name)
        .map(|c| c.value().to_string())
        .filter(|value| !value.is_empty())
}

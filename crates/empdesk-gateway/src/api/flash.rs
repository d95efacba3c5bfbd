//! One-shot messages carried across a redirect in a cookie

use crate::auth::{removal_cookie, session_cookie};
use crate::flows::Message;
use axum_extra::extract::cookie::{Cookie, CookieJar};

pub const FLASH_COOKIE: &str = "flash";

/// Upper bound for the whole encoded `Set-Cookie` value. Browsers drop
/// cookies past 4096 bytes without telling anyone.
pub const MAX_FLASH_BYTES: usize = 4000;

/// Store messages for the page the redirect lands on
pub fn store(jar: CookieJar, messages: &[Message]) -> CookieJar {
    if messages.is_empty() {
        return jar;
    }

    match fit(messages) {
        Ok(cookie) => jar.add(cookie),
        Err(e) => {
            tracing::warn!("Failed to encode flash messages: {}", e);
            jar
        }
    }
}

/// Read pending messages and clear the cookie
pub fn take(jar: CookieJar) -> (CookieJar, Vec<Message>) {
    let Some(raw) = jar.get(FLASH_COOKIE).map(|c| c.value().to_string()) else {
        return (jar, Vec::new());
    };

    let messages = serde_json::from_str::<Vec<Message>>(&raw).unwrap_or_else(|_| {
        tracing::debug!("Discarding unreadable flash cookie");
        Vec::new()
    });

    (jar.add(removal_cookie(FLASH_COOKIE)), messages)
}

/// Keep as many leading messages as fit, folding the rest into one
/// "...and N more." notice
fn fit(messages: &[Message]) -> serde_json::Result<Cookie<'static>> {
    let mut kept = messages.len();
    loop {
        let mut batch = messages[..kept].to_vec();
        if let Some(first_dropped) = messages.get(kept) {
            batch.push(Message {
                level: first_dropped.level,
                text: format!("...and {} more.", messages.len() - kept),
            });
        }

        let cookie = session_cookie(FLASH_COOKIE, serde_json::to_string(&batch)?);
        if kept == 0 || cookie.encoded().to_string().len() <= MAX_FLASH_BYTES {
            if kept < messages.len() {
                tracing::debug!(
                    dropped = messages.len() - kept,
                    "Flash messages truncated to fit the cookie"
                );
            }
            return Ok(cookie);
        }
        kept -= 1;
    }
}

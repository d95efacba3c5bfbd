use super::{flash, views};
use crate::auth;
use crate::flows::{Outcome, Reply};
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum_extra::extract::cookie::CookieJar;

/// Turn a flow outcome into an HTTP response, applying its cookie changes
pub fn respond(jar: CookieJar, outcome: Outcome) -> Response {
    let Outcome {
        reply,
        messages,
        session,
    } = outcome;

    let jar = auth::apply(jar, &session);

    match reply {
        Reply::Redirect(page) => {
            let jar = flash::store(jar, &messages);
            (jar, Redirect::to(page.path())).into_response()
        }
        Reply::Render(view) => {
            let (jar, mut pending) = flash::take(jar);
            pending.extend(messages);
            (jar, Html(views::render(&view, &pending))).into_response()
        }
    }
}

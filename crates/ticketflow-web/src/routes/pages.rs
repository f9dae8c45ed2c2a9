use std::collections::HashMap;

use axum::extract::rejection::FormRejection;
use axum::extract::State;
use axum::http::{Method as HttpMethod, StatusCode, Uri};
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::Form;
use ticketflow_core::{dispatch, FormFields, Method, Outcome, PageStatus, Request, Session};

use crate::error::AppError;
use crate::session::STATE_KEY;
use crate::state::AppState;

/// Runs every page request through the core dispatcher.
///
/// A visitor without a stored session gets a freshly seeded one. The result
/// is written back only when dispatch changed it, so requests that leave a
/// fresh session untouched never create a cookie or a store record.
pub async fn handle(
    State(state): State<AppState>,
    method: HttpMethod,
    uri: Uri,
    cookie_session: tower_sessions::Session,
    form: Result<Form<HashMap<String, String>>, FormRejection>,
) -> Result<Response, AppError> {
    let form = match form {
        Ok(Form(fields)) => FormFields::from(fields),
        Err(rejection) => {
            tracing::debug!("Ignoring unreadable form body: {rejection}");
            FormFields::new()
        }
    };

    let before = cookie_session
        .get::<Session>(STATE_KEY)
        .await?
        .unwrap_or_default();

    let request = Request {
        method: Method::parse(method.as_str()),
        path: uri.path().to_string(),
        form,
    };
    let (outcome, after) = dispatch(&request, before.clone());
    tracing::debug!("{} {} -> {}", method, request.path, outcome.status_code());

    if after != before {
        cookie_session.insert(STATE_KEY, &after).await?;
    }

    let response = match outcome {
        Outcome::Redirect(to) => Redirect::to(&to).into_response(),
        Outcome::Page(page) => {
            let status = match page.status {
                PageStatus::Ok => StatusCode::OK,
                PageStatus::NotFound => StatusCode::NOT_FOUND,
            };
            (status, Html(state.renderer.render(&page))).into_response()
        }
    };
    Ok(response)
}

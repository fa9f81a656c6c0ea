//! Session middleware for protected routes

use auth::AuthState;
use axum::{
    body::Body,
    extract::State,
    http::{HeaderMap, Request},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::headers::{Authorization, Cookie, HeaderMapExt, authorization::Bearer};
use uuid::Uuid;

use crate::{error::ApiError, state::AppState};

/// Name of the cookie carrying the session token
pub const SESSION_COOKIE: &str = "session";

/// Entry point anonymous callers are sent to
pub const LOGIN_PATH: &str = "/login";

/// The signed-in user of a protected request
#[derive(Debug, Clone, Copy)]
pub struct CurrentUser(pub Uuid);

/// Extract the session token from `Authorization: Bearer` or the session cookie
pub fn session_token(headers: &HeaderMap) -> Option<String> {
    if let Some(Authorization(bearer)) = headers.typed_get::<Authorization<Bearer>>() {
        return Some(bearer.token().to_string());
    }

    headers
        .typed_get::<Cookie>()
        .and_then(|cookie| cookie.get(SESSION_COOKIE).map(str::to_string))
}

/// Authentication middleware
///
/// Authenticated requests carry a `CurrentUser` extension; anonymous ones are
/// redirected to the login entry point instead of failing.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, ApiError> {
    let token = session_token(req.headers());

    match state.auth_gate.resolve(token.as_deref()).await? {
        AuthState::Authenticated(user_id) => {
            req.extensions_mut().insert(CurrentUser(user_id));
            Ok(next.run(req).await)
        }
        AuthState::Anonymous => Ok(Redirect::to(LOGIN_PATH).into_response()),
    }
}

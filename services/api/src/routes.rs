//! API service routes

use auth::validation::{validate_email, validate_name, validate_password, validate_username};
use axum::{
    Extension, Json, Router,
    extract::{Path, State},
    http::{HeaderMap, StatusCode, header},
    middleware,
    response::{IntoResponse, Redirect},
    routing::{get, post},
};
use serde_json::json;
use std::collections::HashSet;
use tracing::{info, warn};
use uuid::Uuid;

use crate::{
    AppState,
    error::ApiError,
    middleware::{CurrentUser, LOGIN_PATH, SESSION_COOKIE, auth_middleware, session_token},
    models::{
        DirectoryEntry, HomeResponse, LoginRequest, LoginResponse, NewPost, NewUser,
        RegisterRequest, RegisterResponse,
    },
};

const INVALID_LOGIN: &str = "Invalid username or password";

/// Create the router for the API service
pub fn create_router(state: AppState) -> Router {
    let protected_routes = Router::new()
        .route("/", get(index))
        .route("/home", get(home))
        .route("/users", get(list_users))
        .route("/follow/:id", get(follow))
        .route("/unfollow/:id", get(unfollow))
        .route("/posts", post(create_post))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    Router::new()
        .route("/health", get(health_check))
        .route("/login", get(login_page).post(login))
        .route("/register", post(register))
        .route("/logout", get(logout).post(logout))
        .merge(protected_routes)
        .with_state(state)
}

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let database = common::database::health_check(&state.db_pool)
        .await
        .unwrap_or(false);

    let status = if database {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        status,
        Json(json!({
            "status": if database { "ok" } else { "degraded" },
            "service": "pinboard-api"
        })),
    )
}

/// Login entry point for anonymous callers
pub async fn login_page() -> impl IntoResponse {
    Json(json!({
        "message": "Authentication required",
        "login": "POST /login with {\"username\", \"password\"}",
        "register": "POST /register"
    }))
}

/// Register a new user
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_name("Name", &payload.name)
        .and_then(|_| validate_name("Surname", &payload.surname))
        .and_then(|_| validate_email(&payload.email))
        .and_then(|_| validate_username(&payload.username))
        .and_then(|_| validate_password(&payload.password, &payload.repeat_password))
        .map_err(ApiError::BadRequest)?;

    let password_hash = state.credentials.hash_password(&payload.password).await?;

    let new_user = NewUser {
        name: payload.name.trim().to_string(),
        surname: payload.surname.trim().to_string(),
        email: payload.email,
        username: payload.username,
        password_hash,
    };

    let id = state
        .user_repository
        .create(&new_user)
        .await
        .map_err(|e| match e {
            common::StoreError::UniqueConstraintViolation(_) => {
                ApiError::Conflict("Username or email is already registered".to_string())
            }
            other => other.into(),
        })?;

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            id,
            username: new_user.username,
        }),
    ))
}

/// Log in with username and password
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    info!("Login attempt for user: {}", payload.username);

    let Some(user) = state
        .user_repository
        .find_by_username(&payload.username)
        .await?
    else {
        state.credentials.dummy_verify(&payload.password).await;
        warn!("Login rejected for unknown user: {}", payload.username);
        return Err(ApiError::BadRequest(INVALID_LOGIN.to_string()));
    };

    if !state
        .credentials
        .verify_password(&payload.password, &user.password_hash)
        .await?
    {
        warn!("Login rejected for user: {}", payload.username);
        return Err(ApiError::BadRequest(INVALID_LOGIN.to_string()));
    }

    let token = state.auth_gate.login(user.id).await?;
    let expires_in = state.auth_gate.ttl().as_secs();
    let cookie = format!(
        "{}={}; HttpOnly; SameSite=Lax; Path=/; Max-Age={}",
        SESSION_COOKIE,
        token.as_str(),
        expires_in
    );

    let response = LoginResponse {
        token: token.into_inner(),
        token_type: "Bearer".to_string(),
        expires_in,
    };

    Ok((StatusCode::OK, [(header::SET_COOKIE, cookie)], Json(response)))
}

/// End the caller's session, if any
pub async fn logout(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, ApiError> {
    if let Some(token) = session_token(&headers) {
        state.auth_gate.logout(&token).await?;
    }

    let cookie = format!("{}=; HttpOnly; SameSite=Lax; Path=/; Max-Age=0", SESSION_COOKIE);
    Ok(([(header::SET_COOKIE, cookie)], Redirect::to(LOGIN_PATH)))
}

/// Root redirects to the home feed
pub async fn index() -> Redirect {
    Redirect::to("/home")
}

/// Home view: the signed-in user and the posts of the users they follow
pub async fn home(
    State(state): State<AppState>,
    Extension(CurrentUser(user_id)): Extension<CurrentUser>,
) -> Result<impl IntoResponse, ApiError> {
    let user = state
        .user_repository
        .find_by_id(user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    let posts = state.feed_repository.feed_for(user_id).await?;

    Ok(Json(HomeResponse { user, posts }))
}

/// User directory with the viewer's follow state
pub async fn list_users(
    State(state): State<AppState>,
    Extension(CurrentUser(user_id)): Extension<CurrentUser>,
) -> Result<impl IntoResponse, ApiError> {
    let users = state.user_repository.list_all().await?;
    let followed: HashSet<Uuid> = state
        .follow_repository
        .list_followed(user_id)
        .await?
        .into_iter()
        .collect();

    let entries: Vec<DirectoryEntry> = users
        .into_iter()
        .map(|user| DirectoryEntry {
            followed: followed.contains(&user.id),
            user,
        })
        .collect();

    Ok(Json(entries))
}

/// Follow a user and return to the directory
pub async fn follow(
    State(state): State<AppState>,
    Extension(CurrentUser(user_id)): Extension<CurrentUser>,
    Path(followed_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    state.follow_repository.follow(user_id, followed_id).await?;
    Ok(Redirect::to("/users"))
}

/// Unfollow a user and return to the directory
pub async fn unfollow(
    State(state): State<AppState>,
    Extension(CurrentUser(user_id)): Extension<CurrentUser>,
    Path(followed_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    state.follow_repository.unfollow(user_id, followed_id).await?;
    Ok(Redirect::to("/users"))
}

/// Create a post for the signed-in user
pub async fn create_post(
    State(state): State<AppState>,
    Extension(CurrentUser(user_id)): Extension<CurrentUser>,
    Json(payload): Json<NewPost>,
) -> Result<impl IntoResponse, ApiError> {
    if payload.image_path.trim().is_empty() {
        return Err(ApiError::BadRequest("An image is required".to_string()));
    }

    let id = state.post_repository.create(&payload, user_id).await?;
    let post = state
        .post_repository
        .find_by_id(id)
        .await?
        .ok_or(ApiError::Store(common::StoreError::NotFound))?;

    Ok((StatusCode::CREATED, Json(post)))
}

//! Authentication HTTP handlers.

use axum::{extract::State, http::StatusCode, Form, Json};
use shared_types::{CreateUserRequest, UserResponse};
use validator::Validate;

use crate::db::{self, users};
use crate::error::{ApiError, ApiResult};
use crate::models::NewUser;
use crate::AppState;

use super::error::AuthError;
use super::types::{AuthUser, AuthUserResponse, Credentials, TokenResponse};

/// Exchange a form-encoded username and password for a bearer token.
pub async fn login_for_access_token(
    State(state): State<AppState>,
    Form(credentials): Form<Credentials>,
) -> Result<Json<TokenResponse>, AuthError> {
    let token = state.auth.login(&credentials).await?;
    Ok(Json(token))
}

/// Register a new user. The password is stored only as a bcrypt digest.
pub async fn create_user(
    State(state): State<AppState>,
    Json(payload): Json<CreateUserRequest>,
) -> ApiResult<(StatusCode, Json<UserResponse>)> {
    payload.validate()?;

    let hashed_password = state.auth.hash_password(&payload.password).await?;

    let mut conn = db::get_conn(&state.pool).await?;
    let new_user = NewUser {
        email: &payload.email,
        username: &payload.username,
        first_name: &payload.first_name,
        last_name: &payload.last_name,
        hashed_password: &hashed_password,
        is_active: true,
        role: &payload.role,
    };

    match users::create(&mut conn, new_user).await {
        Ok(user) => {
            tracing::info!("Registered user {} ({})", user.username, user.id);
            Ok((StatusCode::CREATED, Json(user.into())))
        }
        Err(e) if db::is_unique_violation(&e) => Err(ApiError::Conflict(
            "Username or email already exists".to_string(),
        )),
        Err(e) => Err(e.into()),
    }
}

/// Get current authenticated user info.
pub async fn auth_me(user: AuthUser) -> Json<AuthUserResponse> {
    Json(user.into())
}

/// List all registered users, without password digests.
pub async fn list_users(
    State(state): State<AppState>,
    _user: AuthUser,
) -> ApiResult<Json<Vec<UserResponse>>> {
    let mut conn = db::get_conn(&state.pool).await?;
    let all = users::list_all(&mut conn).await?;

    Ok(Json(all.into_iter().map(Into::into).collect()))
}

use crate::{
    dto::{
        auth::{AuthResponse, LoginRequest},
        users::{UserRequest, UserResponse},
    },
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    response::{ApiResponse, Meta},
    security::verify_password,
    services::user_service::{create_account, normalize_email},
    state::AppState,
};

fn invalid_credentials() -> AppError {
    AppError::Unauthorized("Invalid email or password".into())
}

pub async fn register_user(
    state: &AppState,
    payload: UserRequest,
) -> AppResult<ApiResponse<AuthResponse>> {
    let user = create_account(state, payload).await?;
    let token = state.tokens.issue(&user)?;
    Ok(ApiResponse::success(
        "User registered",
        AuthResponse {
            token,
            user: user.into(),
        },
        Some(Meta::empty()),
    ))
}

pub async fn login_user(
    state: &AppState,
    payload: LoginRequest,
) -> AppResult<ApiResponse<AuthResponse>> {
    let email = normalize_email(&payload.email);
    let user = state
        .users
        .find_by_email(&email)
        .await?
        .ok_or_else(invalid_credentials)?;

    if !verify_password(&payload.password, &user.password_hash)? {
        tracing::warn!(user_id = %user.id, "failed login attempt");
        return Err(invalid_credentials());
    }

    let token = state.tokens.issue(&user)?;
    tracing::info!(user_id = %user.id, "user logged in");
    Ok(ApiResponse::success(
        "Login successful",
        AuthResponse {
            token,
            user: user.into(),
        },
        Some(Meta::empty()),
    ))
}

pub async fn current_user(
    state: &AppState,
    user: &AuthUser,
) -> AppResult<ApiResponse<UserResponse>> {
    let user = state
        .users
        .find_by_id(user.user_id)
        .await?
        .ok_or_else(|| AppError::not_found("User"))?;
    Ok(ApiResponse::success("Current user", user.into(), Some(Meta::empty())))
}

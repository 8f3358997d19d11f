use uuid::Uuid;

use crate::{
    dto::users::{UpdateUserRequest, UserList, UserRequest, UserResponse},
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_self_or_admin},
    models::{NewUser, Role, User},
    response::{ApiResponse, Meta},
    security::hash_password,
    state::AppState,
};

pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn email_taken() -> AppError {
    AppError::Conflict("Email is already registered".into())
}

/// Create a USER account after checking the email is free.
pub async fn create_account(state: &AppState, payload: UserRequest) -> AppResult<User> {
    let email = normalize_email(&payload.email);
    if state.users.find_by_email(&email).await?.is_some() {
        return Err(email_taken());
    }

    let password_hash = hash_password(&payload.password)?;
    let user = state
        .users
        .create(NewUser {
            email,
            password_hash,
            role: Role::User,
        })
        .await?;

    tracing::info!(user_id = %user.id, "user created");
    Ok(user)
}

pub async fn create_user(
    state: &AppState,
    payload: UserRequest,
) -> AppResult<ApiResponse<UserResponse>> {
    let user = create_account(state, payload).await?;
    Ok(ApiResponse::success(
        "User created",
        user.into(),
        Some(Meta::empty()),
    ))
}

async fn find_user(state: &AppState, id: Uuid) -> AppResult<User> {
    state
        .users
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::not_found("User"))
}

pub async fn get_user(
    state: &AppState,
    actor: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<UserResponse>> {
    ensure_self_or_admin(actor, id)?;
    let user = find_user(state, id).await?;
    Ok(ApiResponse::success("User", user.into(), Some(Meta::empty())))
}

pub async fn list_users(state: &AppState) -> AppResult<ApiResponse<UserList>> {
    let items = state
        .users
        .list()
        .await?
        .into_iter()
        .map(UserResponse::from)
        .collect();
    Ok(ApiResponse::success(
        "Users",
        UserList { items },
        Some(Meta::empty()),
    ))
}

pub async fn update_user(
    state: &AppState,
    actor: &AuthUser,
    id: Uuid,
    payload: UpdateUserRequest,
) -> AppResult<ApiResponse<UserResponse>> {
    ensure_self_or_admin(actor, id)?;
    if payload.email.is_none() && payload.password.is_none() {
        return Err(AppError::BadRequest("No fields to update".into()));
    }

    let mut user = find_user(state, id).await?;

    if let Some(email) = payload.email {
        let email = normalize_email(&email);
        if email != user.email {
            if let Some(other) = state.users.find_by_email(&email).await? {
                if other.id != user.id {
                    return Err(email_taken());
                }
            }
            user.email = email;
        }
    }

    if let Some(password) = payload.password {
        user.password_hash = hash_password(&password)?;
    }

    let user = state.users.update(user).await?;
    tracing::info!(user_id = %user.id, actor = %actor.user_id, "user updated");
    Ok(ApiResponse::success(
        "User updated",
        user.into(),
        Some(Meta::empty()),
    ))
}

pub async fn delete_user(state: &AppState, actor: &AuthUser, id: Uuid) -> AppResult<()> {
    if !state.users.delete(id).await? {
        return Err(AppError::not_found("User"));
    }
    tracing::info!(user_id = %id, actor = %actor.user_id, "user deleted");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::normalize_email;

    #[test]
    fn emails_are_compared_case_insensitively() {
        assert_eq!(normalize_email("  Momo@Example.COM "), "momo@example.com");
    }
}

use axum::{
    extract::{FromRequestParts, Request},
    http::{header, request::Parts},
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use crate::{error::AppError, models::Role, state::AppState};

/// The authenticated caller, decoded from the `Authorization: Bearer` token.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: Uuid,
    pub email: String,
    pub role: Role,
}

impl AuthUser {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

pub fn ensure_role(user: &AuthUser, role: Role) -> Result<(), AppError> {
    if user.role != role {
        return Err(AppError::Forbidden(
            "You do not have permission to perform this action".into(),
        ));
    }
    Ok(())
}

pub fn ensure_admin(user: &AuthUser) -> Result<(), AppError> {
    ensure_role(user, Role::Admin)
}

/// Users may act on their own account; admins on any.
pub fn ensure_self_or_admin(user: &AuthUser, target: Uuid) -> Result<(), AppError> {
    if user.user_id == target || user.is_admin() {
        return Ok(());
    }
    Err(AppError::Forbidden(
        "You can only access your own account".into(),
    ))
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        if let Some(user) = parts.extensions.get::<AuthUser>() {
            return Ok(user.clone());
        }

        let auth_header = parts
            .headers
            .get(header::AUTHORIZATION)
            .ok_or_else(|| AppError::Unauthorized("Missing Authorization header".into()))?;

        let auth_str = auth_header
            .to_str()
            .map_err(|_| AppError::Unauthorized("Invalid Authorization header".into()))?;

        let token = auth_str
            .strip_prefix("Bearer ")
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| AppError::Unauthorized("Invalid Authorization scheme".into()))?;

        let claims = state.tokens.verify(token)?;
        let user = AuthUser {
            user_id: claims.user_id()?,
            email: claims.email,
            role: claims.role,
        };
        parts.extensions.insert(user.clone());
        Ok(user)
    }
}

/// Gate for the `/admin` tree: 401 without a valid token, 403 for non-admins.
pub async fn require_admin(
    user: AuthUser,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    ensure_admin(&user)?;
    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn caller(role: Role) -> AuthUser {
        AuthUser {
            user_id: Uuid::new_v4(),
            email: "caller@example.com".into(),
            role,
        }
    }

    #[test]
    fn users_may_only_touch_their_own_account() {
        let user = caller(Role::User);
        assert!(ensure_self_or_admin(&user, user.user_id).is_ok());
        assert!(matches!(
            ensure_self_or_admin(&user, Uuid::new_v4()),
            Err(AppError::Forbidden(_))
        ));
    }

    #[test]
    fn admins_may_touch_any_account() {
        let admin = caller(Role::Admin);
        assert!(ensure_self_or_admin(&admin, Uuid::new_v4()).is_ok());
        assert!(ensure_admin(&admin).is_ok());
        assert!(ensure_admin(&caller(Role::User)).is_err());
    }
}

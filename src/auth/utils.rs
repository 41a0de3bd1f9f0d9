use crate::{
    auth::Claims,
    errors::{AppError, AppResult},
    services::UserService,
};

fn forbidden() -> AppError {
    AppError::Forbidden("forbidden".to_string())
}

/// Roles live on the stored user, not in the token, so the caller's email
/// is looked up on every admin request.
pub async fn require_admin(users: &UserService, claims: &Claims) -> AppResult<()> {
    match users.find_by_email(&claims.email).await? {
        Some(user) if user.is_admin() => Ok(()),
        _ => {
            log::warn!("Admin access denied for {}", claims.email);
            Err(forbidden())
        }
    }
}

pub async fn require_self_or_admin(
    users: &UserService,
    claims: &Claims,
    email: &str,
) -> AppResult<()> {
    if claims.email.eq_ignore_ascii_case(email) {
        return Ok(());
    }
    require_admin(users, claims).await
}

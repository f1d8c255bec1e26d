//! Authentication: salted password hashes, opaque bearer tokens, and the
//! superuser guard injected on admin-prefixed route modules.

use crate::error::AppError;
use crate::state::AppContext;
use async_trait::async_trait;
use axum::{
    extract::{FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::Response,
};
use sha2::{Digest, Sha256};
use std::fmt::Write as _;

/// Access token lifetime: 8 days.
pub const TOKEN_TTL_HOURS: i64 = 8 * 24;

/// Refresh token lifetime: 30 days.
pub const REFRESH_TOKEN_TTL_DAYS: i64 = 30;

/// Hash a password with a fresh random salt. Format: `sha256$<salt>$<hex>`.
pub fn hash_password(password: &str) -> String {
    let salt = uuid::Uuid::new_v4().simple().to_string();
    hash_with_salt(password, &salt)
}

fn hash_with_salt(password: &str, salt: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(password.as_bytes());
    let digest = hasher.finalize();
    let mut hex = String::with_capacity(digest.len() * 2);
    for byte in digest {
        let _ = write!(hex, "{:02x}", byte);
    }
    format!("sha256${}${}", salt, hex)
}

pub fn verify_password(password: &str, stored: &str) -> bool {
    let mut parts = stored.splitn(3, '$');
    match (parts.next(), parts.next(), parts.next()) {
        (Some("sha256"), Some(salt), Some(_)) => hash_with_salt(password, salt) == stored,
        _ => false,
    }
}

/// Optional bearer token from the `Authorization` header.
#[derive(Clone, Debug)]
pub struct BearerToken(pub Option<String>);

#[async_trait]
impl<S> FromRequestParts<S> for BearerToken
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let value = parts
            .headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.strip_prefix("Bearer "))
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());
        Ok(BearerToken(value))
    }
}

fn bearer_from_request(req: &Request) -> Option<String> {
    req.headers()
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.strip_prefix("Bearer "))
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Admin guard: resolves the bearer token to a user and requires an active
/// superuser. Applied to whole route modules whose prefix contains `admin`.
pub async fn require_superuser(
    State(ctx): State<AppContext>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = bearer_from_request(&req)
        .ok_or_else(|| AppError::Unauthorized("missing bearer token".into()))?;
    let user = crate::models::token::find_user_by_token(&ctx.pool, &token)
        .await?
        .ok_or_else(|| AppError::Unauthorized("invalid or expired token".into()))?;
    if !user.is_active {
        return Err(AppError::Forbidden("inactive user".into()));
    }
    if !user.is_superuser {
        return Err(AppError::Forbidden("superuser required".into()));
    }
    Ok(next.run(req).await)
}

/// Resolve the current user for non-admin endpoints (e.g. `/auth/me`).
pub async fn current_user(
    ctx: &AppContext,
    token: &BearerToken,
) -> Result<crate::models::user::User, AppError> {
    let token = token
        .0
        .as_deref()
        .ok_or_else(|| AppError::Unauthorized("missing bearer token".into()))?;
    let user = crate::models::token::find_user_by_token(&ctx.pool, token)
        .await?
        .ok_or_else(|| AppError::Unauthorized("invalid or expired token".into()))?;
    if !user.is_active {
        return Err(AppError::Forbidden("inactive user".into()));
    }
    Ok(user)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_round_trip() {
        let stored = hash_password("s3cret");
        assert!(stored.starts_with("sha256$"));
        assert!(verify_password("s3cret", &stored));
        assert!(!verify_password("wrong", &stored));
    }

    #[test]
    fn hashes_are_salted() {
        assert_ne!(hash_password("same"), hash_password("same"));
    }

    #[test]
    fn malformed_stored_hash_never_verifies() {
        assert!(!verify_password("x", ""));
        assert!(!verify_password("x", "plaintext"));
        assert!(!verify_password("x", "md5$salt$digest"));
    }
}

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use subtle::ConstantTimeEq;
use tracing::warn;

use super::{claims::AuthIdentity, keys::JwtKeys};
use crate::{error::AppError, state::AppState};

pub const ADMIN_TOKEN_HEADER: &str = "x-admin-token";

/// Extracts and validates the provider JWT, returning the caller identity.
pub struct AuthUser(pub AuthIdentity);

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth = parts
            .headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .ok_or(AppError::Unauthenticated)?;

        let token = auth
            .strip_prefix("Bearer ")
            .or_else(|| auth.strip_prefix("bearer "))
            .ok_or(AppError::Unauthenticated)?;

        let claims = JwtKeys::from_ref(state).verify(token).map_err(|e| {
            warn!(error = %e, "invalid or expired token");
            AppError::Unauthenticated
        })?;

        Ok(AuthUser(claims.into()))
    }
}

/// Guards internal routes with the shared `ADMIN_TOKEN`.
pub struct AdminToken;

#[async_trait]
impl FromRequestParts<AppState> for AdminToken {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Some(expected) = state.config.admin_token.as_deref() else {
            warn!("internal route called but ADMIN_TOKEN is not configured");
            return Err(AppError::Forbidden);
        };

        let given = parts
            .headers
            .get(ADMIN_TOKEN_HEADER)
            .and_then(|h| h.to_str().ok());

        match given {
            Some(token) if tokens_match(token, expected) => Ok(AdminToken),
            _ => {
                warn!("internal route called with missing or wrong admin token");
                Err(AppError::Forbidden)
            }
        }
    }
}

fn tokens_match(given: &str, expected: &str) -> bool {
    if given.is_empty() || expected.is_empty() {
        return false;
    }
    given.as_bytes().ct_eq(expected.as_bytes()).into()
}

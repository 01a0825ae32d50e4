//! Operator authentication for `/admin/*` routes.
//!
//! When an admin token is configured the request must carry
//! `Authorization: Bearer <token>`. Without a configured token the routes stay
//! open, which is only allowed outside production.

use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::{header, request::Parts};
use secrecy::ExposeSecret;
use service_core::error::AppError;
use subtle::ConstantTimeEq;

use crate::startup::AppState;

/// Proof that the caller passed the admin check.
#[derive(Debug, Clone, Copy)]
pub struct AdminGuard;

#[async_trait]
impl FromRequestParts<AppState> for AdminGuard {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Some(expected) = state.config.admin.token.as_ref() else {
            return Ok(AdminGuard);
        };

        let provided = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
            .ok_or_else(|| {
                tracing::warn!("Admin request without bearer token");
                AppError::AuthError(anyhow::anyhow!("Missing admin bearer token"))
            })?;

        let matches: bool = provided
            .as_bytes()
            .ct_eq(expected.expose_secret().as_bytes())
            .into();

        if !matches {
            tracing::warn!("Admin request with invalid bearer token");
            return Err(AppError::AuthError(anyhow::anyhow!("Invalid admin token")));
        }

        Ok(AdminGuard)
    }
}

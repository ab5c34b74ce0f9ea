use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use std::sync::Arc;

use super::{AuthContext, AuthError};
use crate::app::AppState;
use crate::error::ErrorResponse;

/// Extractor that requires authentication
///
/// Runs before any body extractor, so an unauthenticated request is
/// rejected without its body ever being read.
///
/// Example:
/// ```ignore
/// async fn protected_route(auth: RequireAuth) -> impl IntoResponse {
///     format!("Hello, user {}", auth.user_id)
/// }
/// ```
#[derive(Debug, Clone)]
pub struct RequireAuth(pub AuthContext);

impl std::ops::Deref for RequireAuth {
    type Target = AuthContext;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let body = ErrorResponse {
            code: "UNAUTHORIZED".to_string(),
            detail: self.to_string(),
        };

        (StatusCode::UNAUTHORIZED, Json(body)).into_response()
    }
}

#[async_trait]
impl FromRequestParts<Arc<AppState>> for RequireAuth {
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .map(|value| value.to_str().map_err(|_| AuthError::InvalidFormat))
            .transpose()?;

        let context = state.verifier.authenticate(header).map_err(|e| {
            tracing::warn!(error = %e, "Authentication failed");
            e
        })?;

        tracing::debug!(
            user_id = %context.user_id,
            role = ?context.role,
            has_email = context.email.is_some(),
            "Request authenticated"
        );
        Ok(RequireAuth(context))
    }
}

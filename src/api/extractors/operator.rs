use axum::{extract::FromRequestParts, http::request::Parts};
use crate::error::AppError;
use crate::state::AppState;
use std::sync::Arc;
use tracing::warn;

pub const OPERATOR_KEY_HEADER: &str = "X-Operator-Key";

/// Guards operator routes: the request must carry the configured shared key.
pub struct OperatorKey;

impl FromRequestParts<Arc<AppState>> for OperatorKey {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &Arc<AppState>) -> Result<Self, Self::Rejection> {
        let presented = parts.headers.get(OPERATOR_KEY_HEADER)
            .and_then(|v| v.to_str().ok())
            .ok_or(AppError::Unauthorized)?;

        if presented != state.config.operator_api_key {
            warn!(path = %parts.uri.path(), "Rejected operator request with wrong key");
            return Err(AppError::Unauthorized);
        }
        Ok(OperatorKey)
    }
}

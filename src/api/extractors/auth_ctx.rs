use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::error::AppError;
use crate::state::AppState;

/// Verified caller identity, inserted by the scope-guard middleware.
/// Only the subject survives the guard; the scope check itself already
/// happened there, so handlers never re-inspect permissions.
#[derive(Debug, Clone)]
pub struct AuthCtx {
    pub sub: String,
}

impl AuthCtx {
    pub fn new(sub: String) -> Self {
        Self { sub }
    }
}

/// Extractor over request extensions.
/// The guard middleware must have run on this route; a missing AuthCtx is a
/// routing misconfiguration on our side, so it surfaces as a 500 rather
/// than blaming the caller.
pub struct AuthCtxExtractor(pub AuthCtx);

impl FromRequestParts<AppState> for AuthCtxExtractor {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthCtx>()
            .cloned()
            .map(AuthCtxExtractor)
            .ok_or(AppError::Internal)
    }
}

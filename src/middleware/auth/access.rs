//! Permission guard: bearer token verification + scope check → AuthCtx in
//! request extensions.
//!
//! Each guarded sub-router is wrapped with the scope it requires:
//! ```ignore
//! let guarded = access::require(
//!     Router::new().route("/drinks", post(create_drink)),
//!     state.clone(),
//!     "post:drinks",
//! );
//! ```
//!
//! Failure contract:
//! - verifier failures propagate unchanged (their own 401/500 + message)
//! - claims without a `permissions` field at all → 400 (issuer is not
//!   configured for RBAC; deliberately distinct from the next case)
//! - `permissions` present but lacking the scope → 401

use axum::{
    Router,
    body::Body,
    extract::State,
    http::{Request, header},
    middleware::{self, Next},
    response::Response,
};

use crate::api::extractors::AuthCtx;
use crate::error::AppError;
use crate::services::auth::{self, AuthError};
use crate::state::AppState;

#[derive(Clone)]
struct ScopeGuard {
    state: AppState,
    scope: &'static str,
}

/// Guard every route of `router` behind `scope`.
pub fn require(
    router: Router<AppState>,
    state: AppState,
    scope: &'static str,
) -> Router<AppState> {
    // from_fn cannot take a State extractor on its own, so the guard data
    // is passed explicitly via from_fn_with_state
    router.route_layer(middleware::from_fn_with_state(
        ScopeGuard { state, scope },
        access_middleware,
    ))
}

async fn access_middleware(
    State(guard): State<ScopeGuard>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let header = match req.headers().get(header::AUTHORIZATION) {
        Some(value) => Some(value.to_str().map_err(|_| AuthError::InvalidHeaderFormat)?),
        None => None,
    };
    let token = auth::bearer_token(header)?;

    let claims = match guard.state.auth.verify(token).await {
        Ok(claims) => claims,
        Err(err) => {
            tracing::warn!(error = %err, "access token verification failed");
            return Err(err.into());
        }
    };

    let permissions = claims
        .permissions
        .ok_or(AuthError::PermissionsMissing)?;

    if !permissions.iter().any(|p| p == guard.scope) {
        tracing::warn!(sub = %claims.sub, scope = guard.scope, "insufficient scope");
        return Err(AuthError::InsufficientScope(guard.scope).into());
    }

    req.extensions_mut().insert(AuthCtx::new(claims.sub));

    Ok(next.run(req).await)
}

//! Bearer-token verification against the issuer's key set.
//!
//! Contract: given the raw `Authorization` header value, produce either a
//! verified claim set or a typed `AuthError`. Each variant carries its own
//! HTTP status so the error layer never has to guess.

use axum::http::StatusCode;
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode, decode_header};
use serde::Deserialize;
use thiserror::Error;

use super::jwks::{JwksClient, JwksError};

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("authorization header is expected")]
    MissingAuthorization,
    #[error("authorization header must be a bearer token")]
    InvalidHeaderFormat,
    #[error("authorization token header is malformed")]
    MalformedKeyHeader,
    #[error("no signing key matches the token key id")]
    InvalidKeyId,
    #[error("token is expired")]
    TokenExpired,
    #[error("incorrect claims, check the audience and issuer")]
    InvalidClaims,
    #[error("unable to parse authentication token")]
    InvalidHeader,
    #[error("permissions are not included in the token")]
    PermissionsMissing,
    #[error("permission '{0}' not found in token")]
    InsufficientScope(&'static str),
    #[error("signing key set is unavailable")]
    KeySetUnavailable,
}

impl AuthError {
    pub fn status(&self) -> StatusCode {
        match self {
            // The issuer omitting RBAC entirely is a configuration defect,
            // not a credential defect. Kept distinct on purpose.
            Self::PermissionsMissing => StatusCode::BAD_REQUEST,
            Self::KeySetUnavailable => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::UNAUTHORIZED,
        }
    }
}

/// Verified access-token claims.
///
/// `aud` stays a Value because JWT allows both string and array; the
/// audience check itself happens in `Validation`. A token without a
/// `permissions` claim at all deserializes to `None`, which the guard
/// treats differently from an empty list.
#[derive(Debug, Clone, Deserialize)]
pub struct Claims {
    pub iss: String,
    #[serde(default)]
    pub aud: serde_json::Value,
    pub sub: String,
    pub exp: u64,

    #[serde(default)]
    pub permissions: Option<Vec<String>>,
}

/// Extract the token from an `Authorization` header value.
///
/// The header must be exactly two whitespace-separated parts and the
/// scheme must be `bearer` (case-insensitive).
pub fn bearer_token(header: Option<&str>) -> Result<&str, AuthError> {
    let header = header.ok_or(AuthError::MissingAuthorization)?;

    let mut parts = header.split_whitespace();
    let (scheme, token) = match (parts.next(), parts.next(), parts.next()) {
        (Some(scheme), Some(token), None) => (scheme, token),
        _ => return Err(AuthError::InvalidHeaderFormat),
    };

    if !scheme.eq_ignore_ascii_case("bearer") {
        return Err(AuthError::InvalidHeaderFormat);
    }

    Ok(token)
}

/// RS256 access-token verifier.
#[derive(Clone)]
pub struct AuthService {
    jwks: JwksClient,
    validation: Validation,
}

impl AuthService {
    pub fn new(jwks: JwksClient, issuer: &str, audience: &str, leeway_seconds: u64) -> Self {
        let mut validation = Validation::new(Algorithm::RS256);
        validation.set_issuer(&[issuer]);
        validation.set_audience(&[audience]);
        validation.leeway = leeway_seconds;

        Self { jwks, validation }
    }

    /// Verify signature + standard claims and return the decoded claim set.
    pub async fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        let key = self.resolve_key(token).await?;

        let data = decode::<Claims>(token, &key, &self.validation).map_err(classify)?;

        Ok(data.claims)
    }

    // Match the token's `kid` against the issuer's key set.
    async fn resolve_key(&self, token: &str) -> Result<DecodingKey, AuthError> {
        let header = decode_header(token).map_err(|_| AuthError::MalformedKeyHeader)?;
        let kid = header.kid.ok_or(AuthError::MalformedKeyHeader)?;

        self.jwks.decoding_key(&kid).await.map_err(|err| match err {
            JwksError::UnknownKid | JwksError::UnsupportedKey => AuthError::InvalidKeyId,
            JwksError::Fetch(err) => {
                tracing::warn!(error = %err, "signing key set fetch failed");
                AuthError::KeySetUnavailable
            }
        })
    }
}

fn classify(err: jsonwebtoken::errors::Error) -> AuthError {
    use jsonwebtoken::errors::ErrorKind;

    match err.kind() {
        ErrorKind::ExpiredSignature => AuthError::TokenExpired,
        ErrorKind::InvalidAudience | ErrorKind::InvalidIssuer => AuthError::InvalidClaims,
        // Bad signature, truncated token, wrong algorithm: all read as an
        // unparseable/unverifiable token to the caller.
        _ => AuthError::InvalidHeader,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::errors::ErrorKind;

    #[test]
    fn bearer_token_requires_a_header() {
        assert!(matches!(
            bearer_token(None),
            Err(AuthError::MissingAuthorization)
        ));
    }

    #[test]
    fn bearer_token_requires_exactly_two_parts() {
        assert!(matches!(
            bearer_token(Some("Bearer")),
            Err(AuthError::InvalidHeaderFormat)
        ));
        assert!(matches!(
            bearer_token(Some("Bearer a b")),
            Err(AuthError::InvalidHeaderFormat)
        ));
        assert!(matches!(
            bearer_token(Some("")),
            Err(AuthError::InvalidHeaderFormat)
        ));
    }

    #[test]
    fn bearer_token_scheme_is_case_insensitive() {
        assert_eq!(bearer_token(Some("bearer abc")).unwrap(), "abc");
        assert_eq!(bearer_token(Some("BEARER abc")).unwrap(), "abc");
        assert_eq!(bearer_token(Some("Bearer abc")).unwrap(), "abc");
    }

    #[test]
    fn bearer_token_rejects_other_schemes() {
        assert!(matches!(
            bearer_token(Some("Basic abc")),
            Err(AuthError::InvalidHeaderFormat)
        ));
    }

    #[test]
    fn verification_failures_are_classified() {
        let expired: jsonwebtoken::errors::Error = ErrorKind::ExpiredSignature.into();
        assert!(matches!(classify(expired), AuthError::TokenExpired));

        let audience: jsonwebtoken::errors::Error = ErrorKind::InvalidAudience.into();
        assert!(matches!(classify(audience), AuthError::InvalidClaims));

        let issuer: jsonwebtoken::errors::Error = ErrorKind::InvalidIssuer.into();
        assert!(matches!(classify(issuer), AuthError::InvalidClaims));

        let signature: jsonwebtoken::errors::Error = ErrorKind::InvalidSignature.into();
        assert!(matches!(classify(signature), AuthError::InvalidHeader));
    }

    #[test]
    fn claims_without_permissions_deserialize_to_none() {
        let claims: Claims = serde_json::from_value(serde_json::json!({
            "iss": "https://issuer.test/",
            "aud": "drinks",
            "sub": "auth0|abc",
            "exp": 1_900_000_000u64
        }))
        .unwrap();
        assert!(claims.permissions.is_none());

        let claims: Claims = serde_json::from_value(serde_json::json!({
            "iss": "https://issuer.test/",
            "aud": "drinks",
            "sub": "auth0|abc",
            "exp": 1_900_000_000u64,
            "permissions": []
        }))
        .unwrap();
        assert_eq!(claims.permissions, Some(vec![]));
    }
}

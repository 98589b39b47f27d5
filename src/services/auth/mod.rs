/*!
 * Bearer-token verification.
 *
 * Responsibility:
 * - JwksClient: fetch + cache the issuer's signing key set
 * - AuthService: header parsing, signature/claim verification, typed failures
 */
mod jwks;
mod verifier;

pub use jwks::{JwksClient, JwksError};
pub use verifier::{AuthError, AuthService, Claims, bearer_token};

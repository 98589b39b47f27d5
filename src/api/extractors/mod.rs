/*!
 * Authentication context extractor
 *
 * Responsibility:
 * - hand the verified claim context (AuthCtx) to handlers
 *
 * Public API:
 * - AuthCtx
 * - AuthCtxExtractor
 */
mod auth_ctx;

pub use auth_ctx::{AuthCtx, AuthCtxExtractor};

/*
 * Responsibility
 * - shared context attached to the Router (AppState)
 * - Clone is cheap: PgPool is internally pooled, AuthService sits behind Arc
 */
use std::sync::Arc;

use sqlx::PgPool;

use crate::services::auth::AuthService;

#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub auth: Arc<AuthService>,
}

impl AppState {
    pub fn new(db: PgPool, auth: Arc<AuthService>) -> Self {
        Self { db, auth }
    }
}

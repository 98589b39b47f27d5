/*
 * Responsibility
 * - URL structure of the API
 * - which routes sit behind which permission scope; each guarded
 *   sub-router gets its own scope via route_layer before merging
 */
use axum::{
    Router,
    routing::{delete, get, patch, post},
};

use crate::api::handlers::{
    drinks::{create_drink, delete_drink, list_drinks, list_drinks_detail, update_drink},
    health::health,
};
use crate::middleware::auth::access;
use crate::state::AppState;

pub fn routes(state: AppState) -> Router<AppState> {
    let public = Router::new()
        .route("/health", get(health))
        .route("/drinks", get(list_drinks));

    let detail = access::require(
        Router::new().route("/drinks-detail", get(list_drinks_detail)),
        state.clone(),
        "get:drinks-detail",
    );

    let create = access::require(
        Router::new().route("/drinks", post(create_drink)),
        state.clone(),
        "post:drinks",
    );

    let update = access::require(
        Router::new().route("/drinks/{id}", patch(update_drink)),
        state.clone(),
        "patch:drinks",
    );

    let remove = access::require(
        Router::new().route("/drinks/{id}", delete(delete_drink)),
        state,
        "delete:drinks",
    );

    public
        .merge(detail)
        .merge(create)
        .merge(update)
        .merge(remove)
}

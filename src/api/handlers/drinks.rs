/*
 * Responsibility
 * - /drinks CRUD handlers: validate request shape, call repo, shape response
 * - authorization happens in the scope-guard middleware; guarded handlers
 *   receive the verified AuthCtx through the extractor
 * - store failures map to 422 on writes and 500 on reads
 */
use axum::{
    Json,
    extract::{
        Path, State,
        rejection::{JsonRejection, PathRejection},
    },
};

use crate::{
    api::{
        dto::drinks::{
            CreateDrinkRequest, DeleteResponse, DrinkLong, DrinkShort, DrinksResponse,
            UpdateDrinkRequest,
        },
        extractors::AuthCtxExtractor,
    },
    error::AppError,
    repos::drink_repo,
    state::AppState,
};

/// GET /drinks: public listing, short projection only.
pub async fn list_drinks(
    State(state): State<AppState>,
) -> Result<Json<DrinksResponse<DrinkShort>>, AppError> {
    let rows = drink_repo::list(&state.db).await?;

    let mut drinks = Vec::with_capacity(rows.len());
    for row in rows {
        drinks.push(DrinkShort::from_row(row)?);
    }

    Ok(Json(DrinksResponse {
        success: true,
        drinks,
    }))
}

/// GET /drinks-detail: long projection, requires `get:drinks-detail`.
pub async fn list_drinks_detail(
    State(state): State<AppState>,
    AuthCtxExtractor(ctx): AuthCtxExtractor,
) -> Result<Json<DrinksResponse<DrinkLong>>, AppError> {
    tracing::debug!(sub = %ctx.sub, "drink detail listing");

    let rows = drink_repo::list(&state.db).await?;

    let mut drinks = Vec::with_capacity(rows.len());
    for row in rows {
        drinks.push(DrinkLong::from_row(row)?);
    }

    Ok(Json(DrinksResponse {
        success: true,
        drinks,
    }))
}

/// POST /drinks, requires `post:drinks`.
pub async fn create_drink(
    State(state): State<AppState>,
    AuthCtxExtractor(ctx): AuthCtxExtractor,
    payload: Result<Json<CreateDrinkRequest>, JsonRejection>,
) -> Result<Json<DrinksResponse<DrinkLong>>, AppError> {
    let Json(req) = payload.map_err(|_| AppError::BadRequest)?;
    let (title, recipe) = req.validate()?;

    let recipe_json = serde_json::to_string(&recipe).map_err(|_| AppError::Internal)?;

    let row = drink_repo::create(&state.db, &title, &recipe_json)
        .await
        .map_err(|err| {
            tracing::error!(error = %err, "drink insert failed");
            AppError::Unprocessable
        })?;

    tracing::info!(sub = %ctx.sub, drink_id = row.drink_id, "drink created");

    Ok(Json(DrinksResponse {
        success: true,
        drinks: vec![DrinkLong::from_row(row)?],
    }))
}

/// PATCH /drinks/{id}, requires `patch:drinks`. Omitted fields are left
/// unchanged. An unknown id is a 404, and wins over a bad body: the row
/// lookup runs before the payload is validated.
pub async fn update_drink(
    State(state): State<AppState>,
    AuthCtxExtractor(ctx): AuthCtxExtractor,
    path: Result<Path<i64>, PathRejection>,
    payload: Result<Json<UpdateDrinkRequest>, JsonRejection>,
) -> Result<Json<DrinksResponse<DrinkLong>>, AppError> {
    let Path(drink_id) = path.map_err(|_| AppError::NotFound)?;

    drink_repo::get(&state.db, drink_id)
        .await?
        .ok_or(AppError::NotFound)?;

    let Json(req) = payload.map_err(|_| AppError::BadRequest)?;
    let (title, recipe) = req.validate()?;

    let recipe_json = match &recipe {
        Some(recipe) => Some(serde_json::to_string(recipe).map_err(|_| AppError::Internal)?),
        None => None,
    };

    let row = drink_repo::update(&state.db, drink_id, title.as_deref(), recipe_json.as_deref())
        .await
        .map_err(|err| {
            tracing::error!(error = %err, "drink update failed");
            AppError::Unprocessable
        })?
        .ok_or(AppError::NotFound)?;

    tracing::info!(sub = %ctx.sub, drink_id, "drink updated");

    Ok(Json(DrinksResponse {
        success: true,
        drinks: vec![DrinkLong::from_row(row)?],
    }))
}

/// DELETE /drinks/{id}, requires `delete:drinks`.
pub async fn delete_drink(
    State(state): State<AppState>,
    AuthCtxExtractor(ctx): AuthCtxExtractor,
    path: Result<Path<i64>, PathRejection>,
) -> Result<Json<DeleteResponse>, AppError> {
    let Path(drink_id) = path.map_err(|_| AppError::NotFound)?;

    let deleted = drink_repo::delete(&state.db, drink_id)
        .await
        .map_err(|err| {
            tracing::error!(error = %err, "drink delete failed");
            AppError::Unprocessable
        })?;

    if !deleted {
        return Err(AppError::NotFound);
    }

    tracing::info!(sub = %ctx.sub, drink_id, "drink deleted");

    Ok(Json(DeleteResponse {
        success: true,
        delete: drink_id,
    }))
}

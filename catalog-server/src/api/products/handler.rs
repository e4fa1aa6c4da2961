//! Product API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;

use crate::catalog::filter::ProductQuery;
use crate::catalog::projection::ProductView;
use crate::catalog::{DeleteOutcome, ProductPage};
use crate::core::ServerState;
use crate::db::models::{ProductCreate, ProductUpdate};
use crate::utils::AppResult;

/// GET /api/products - filtered, sorted, paginated listing
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ProductQuery>,
) -> AppResult<Json<ProductPage>> {
    let page = state.product_service().list(&query).await?;
    Ok(Json(page))
}

/// GET /api/products/:id - one product, fully resolved
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<ProductView>> {
    let product = state.product_service().get(&id).await?;
    Ok(Json(product))
}

/// POST /api/products - create a product
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<ProductCreate>,
) -> AppResult<Json<ProductView>> {
    let product = state.product_service().create(payload).await?;
    Ok(Json(product))
}

/// PUT /api/products/:id - sparse update
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<ProductUpdate>,
) -> AppResult<Json<ProductView>> {
    let product = state.product_service().update(&id, payload).await?;
    Ok(Json(product))
}

#[derive(Debug, Deserialize)]
pub struct DeleteBatch {
    pub ids: Vec<String>,
}

/// POST /api/products/delete-batch - batched irreversible delete
pub async fn delete_batch(
    State(state): State<ServerState>,
    Json(payload): Json<DeleteBatch>,
) -> AppResult<Json<DeleteOutcome>> {
    let outcome = state.product_service().delete(&payload.ids).await?;
    Ok(Json(outcome))
}

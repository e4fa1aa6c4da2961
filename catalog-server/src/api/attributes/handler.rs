//! Attribute API Handlers
//!
//! The attribute catalog is maintained by an external admin system;
//! these endpoints only read it, for admin UIs that need to show the
//! available axes of variation.

use axum::{
    Json,
    extract::{Path, State},
};

use crate::core::ServerState;
use crate::db::models::Attribute;
use crate::db::oid;
use crate::db::repository::{AttributeRepository, strip_table_prefix};
use crate::utils::{AppError, AppResult};

/// GET /api/attributes - all active attributes
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<Attribute>>> {
    let repo = AttributeRepository::new(state.db.clone());
    let attributes = repo.find_all().await?;
    Ok(Json(attributes))
}

/// GET /api/attributes/:id - one attribute
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<Attribute>> {
    let key = strip_table_prefix("attribute", &id);
    if !oid::is_valid(key) {
        return Err(AppError::validation(format!("Malformed attribute id: {id}")));
    }
    let repo = AttributeRepository::new(state.db.clone());
    let attribute = repo
        .find_by_id(key)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Attribute {id} not found")))?;
    Ok(Json(attribute))
}

//! Product Repository
//!
//! Owns every product write. Each create/save/delete is a single
//! store statement, so per-document atomicity comes from the engine;
//! validation happens entirely before any call lands here.

use super::{BaseRepository, RepoError, RepoResult, make_thing, strip_table_prefix};
use crate::db::models::Product;
use serde_json::{Map, Value};
use surrealdb::Surreal;
use surrealdb::engine::local::Db;
use surrealdb::sql::Thing;

const PRODUCT_TABLE: &str = "product";

// =============================================================================
// Product Repository
// =============================================================================

#[derive(Clone)]
pub struct ProductRepository {
    base: BaseRepository,
}

impl ProductRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find product by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Product>> {
        let pure_id = strip_table_prefix(PRODUCT_TABLE, id);
        let product: Option<Product> = self.base.db().select((PRODUCT_TABLE, pure_id)).await?;
        Ok(product)
    }

    /// Create a product under the given key in one statement.
    ///
    /// A duplicate slug (or any other unique index violation) comes
    /// back as [`RepoError::Duplicate`].
    pub async fn create(&self, id: &str, data: Product) -> RepoResult<Product> {
        let created: Option<Product> = self
            .base
            .db()
            .create((PRODUCT_TABLE, id))
            .content(data)
            .await?;
        created.ok_or_else(|| RepoError::Database("Failed to create product".to_string()))
    }

    /// Replace the full document content of an existing product.
    pub async fn save(&self, id: &str, mut data: Product) -> RepoResult<Product> {
        // The record key comes from the target, never the payload.
        data.id = None;
        let pure_id = strip_table_prefix(PRODUCT_TABLE, id);
        let updated: Option<Product> = self
            .base
            .db()
            .update((PRODUCT_TABLE, pure_id))
            .content(data)
            .await?;
        updated.ok_or_else(|| RepoError::NotFound(format!("Product {id} not found")))
    }

    /// Count products matching a rendered filter clause.
    pub async fn count(&self, clause: &str, binds: Map<String, Value>) -> RepoResult<usize> {
        #[derive(serde::Deserialize)]
        struct CountRow {
            total: usize,
        }

        let sql = format!("SELECT count() AS total FROM product WHERE {clause} GROUP ALL");
        let mut result = self.base.db().query(sql).bind(binds).await?;
        let row: Option<CountRow> = result.take(0)?;
        Ok(row.map(|r| r.total).unwrap_or(0))
    }

    /// One page of products matching a rendered filter clause.
    ///
    /// `order_by` must come from the sort whitelist (see
    /// `catalog::filter::Sort`); it is interpolated, not bound.
    pub async fn find_page(
        &self,
        clause: &str,
        binds: Map<String, Value>,
        order_by: &str,
        skip: i64,
        limit: i64,
    ) -> RepoResult<Vec<Product>> {
        let sql = format!(
            "SELECT * FROM product WHERE {clause} ORDER BY {order_by} LIMIT $limit START $skip"
        );
        let products: Vec<Product> = self
            .base
            .db()
            .query(sql)
            .bind(binds)
            .bind(("limit", limit))
            .bind(("skip", skip))
            .await?
            .take(0)?;
        Ok(products)
    }

    /// Delete the given products in one batch statement.
    ///
    /// Returns how many documents were actually removed; ids with no
    /// matching document simply do not count.
    pub async fn delete_many(&self, ids: &[String]) -> RepoResult<usize> {
        if ids.is_empty() {
            return Ok(0);
        }
        let things: Vec<Thing> = ids
            .iter()
            .map(|id| make_thing(PRODUCT_TABLE, strip_table_prefix(PRODUCT_TABLE, id)))
            .collect();
        let mut result = self
            .base
            .db()
            .query("DELETE product WHERE id IN $ids RETURN BEFORE")
            .bind(("ids", things))
            .await?;
        let removed: Vec<Value> = result.take(0)?;
        Ok(removed.len())
    }
}

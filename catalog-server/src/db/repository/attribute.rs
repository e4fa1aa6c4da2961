//! Attribute Repository
//!
//! Read-only lookup into the attribute catalog. Attributes are
//! maintained by an external admin system; this service only ever
//! fetches them, most importantly in id batches during product writes
//! and reads.

use super::{BaseRepository, RepoResult, make_thing, strip_table_prefix};
use crate::db::models::Attribute;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;
use surrealdb::sql::Thing;

const TABLE: &str = "attribute";

#[derive(Clone)]
pub struct AttributeRepository {
    base: BaseRepository,
}

impl AttributeRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find all active attributes
    pub async fn find_all(&self) -> RepoResult<Vec<Attribute>> {
        let attrs: Vec<Attribute> = self
            .base
            .db()
            .query("SELECT * FROM attribute WHERE is_active = true ORDER BY code")
            .await?
            .take(0)?;
        Ok(attrs)
    }

    /// Find attribute by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Attribute>> {
        let pure_id = strip_table_prefix(TABLE, id);
        let attr: Option<Attribute> = self.base.db().select((TABLE, pure_id)).await?;
        Ok(attr)
    }

    /// Batch-fetch attributes by id in a single query.
    ///
    /// Ids absent from the catalog are simply missing from the result,
    /// never an error.
    pub async fn find_by_ids(&self, ids: &[String]) -> RepoResult<Vec<Attribute>> {
        if ids.is_empty() {
            return Ok(vec![]);
        }
        let things: Vec<Thing> = ids
            .iter()
            .map(|id| make_thing(TABLE, strip_table_prefix(TABLE, id)))
            .collect();
        let attrs: Vec<Attribute> = self
            .base
            .db()
            .query("SELECT * FROM attribute WHERE id IN $ids")
            .bind(("ids", things))
            .await?
            .take(0)?;
        Ok(attrs)
    }
}

//! Database Module
//!
//! Embedded document store: connection bootstrap and schema
//! definitions (tables plus the unique slug index).

pub mod models;
pub mod oid;
pub mod repository;

use crate::utils::AppError;
use surrealdb::Surreal;
use surrealdb::engine::local::{Db, RocksDb};

/// Database service — owns the embedded store handle
#[derive(Clone)]
pub struct DbService {
    pub db: Surreal<Db>,
}

impl DbService {
    /// Open (or create) the store at the given path and apply schema.
    pub async fn new(data_dir: &str) -> Result<Self, AppError> {
        std::fs::create_dir_all(data_dir)
            .map_err(|e| AppError::database(format!("Failed to create {data_dir}: {e}")))?;

        let db: Surreal<Db> = Surreal::new::<RocksDb>(data_dir)
            .await
            .map_err(|e| AppError::database(format!("Failed to open store: {e}")))?;

        db.use_ns("catalog")
            .use_db("catalog")
            .await
            .map_err(|e| AppError::database(format!("Failed to select namespace: {e}")))?;

        define_schema(&db).await?;

        tracing::info!("Document store ready (RocksDB at {data_dir})");
        Ok(Self { db })
    }
}

/// Table and index definitions.
///
/// The unique index on `product.slug` is what turns a duplicate slug
/// into a distinguishable conflict at write time.
async fn define_schema(db: &Surreal<Db>) -> Result<(), AppError> {
    db.query(
        "DEFINE TABLE IF NOT EXISTS product SCHEMALESS;
         DEFINE INDEX IF NOT EXISTS product_slug ON product FIELDS slug UNIQUE;
         DEFINE TABLE IF NOT EXISTS attribute SCHEMALESS;
         DEFINE INDEX IF NOT EXISTS attribute_code ON attribute FIELDS code UNIQUE;",
    )
    .await
    .map_err(|e| AppError::database(format!("Failed to define schema: {e}")))?
    .check()
    .map_err(|e| AppError::database(format!("Failed to define schema: {e}")))?;
    Ok(())
}

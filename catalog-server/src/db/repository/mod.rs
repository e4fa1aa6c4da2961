//! Repository Module
//!
//! CRUD operations over the embedded document store.

pub mod attribute;
pub mod product;

// Re-exports
pub use attribute::AttributeRepository;
pub use product::ProductRepository;

use surrealdb::Surreal;
use surrealdb::engine::local::Db;
use surrealdb::sql::Thing;
use thiserror::Error;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<surrealdb::Error> for RepoError {
    fn from(err: surrealdb::Error) -> Self {
        let msg = err.to_string();
        // Unique-index violations surface as "already contains" from
        // the embedded engine; everything else is a plain store error.
        if msg.contains("already contains") {
            RepoError::Duplicate(msg)
        } else {
            RepoError::Database(msg)
        }
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;

// =============================================================================
// ID Convention: "table:id" record pointers over 24-hex keys
// =============================================================================
//
// Record keys are 24-hex tokens (see `db::oid`). Repositories accept
// both the bare key and the "table:id" form; `strip_table_prefix`
// reduces to the bare key and `make_thing` builds the record pointer.

/// Build a record pointer from a table name and a bare key.
pub fn make_thing(table: &str, id: &str) -> Thing {
    Thing::from((table, id))
}

/// Accept both "table:id" and bare "id" forms.
pub fn strip_table_prefix<'a>(table: &str, id: &'a str) -> &'a str {
    match id.split_once(':') {
        Some((tb, key)) if tb == table => key,
        _ => id,
    }
}

/// Base repository with database reference
#[derive(Clone)]
pub struct BaseRepository {
    db: Surreal<Db>,
}

impl BaseRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self { db }
    }

    pub fn db(&self) -> &Surreal<Db> {
        &self.db
    }
}

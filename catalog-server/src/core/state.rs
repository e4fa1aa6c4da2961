use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use crate::catalog::ProductService;
use crate::core::Config;
use crate::db::DbService;
use crate::db::repository::{AttributeRepository, ProductRepository};
use crate::utils::AppError;

/// Shared server state handed to every handler.
///
/// Holds the configuration and the store handle; repositories and
/// services are cheap and constructed per request from the cloned
/// handle.
#[derive(Clone)]
pub struct ServerState {
    pub config: Config,
    pub db: Surreal<Db>,
}

impl ServerState {
    /// Open the store, apply schema, and assemble the state.
    pub async fn initialize(config: &Config) -> Result<Self, AppError> {
        let db_service = DbService::new(&config.data_dir()).await?;
        Ok(Self {
            config: config.clone(),
            db: db_service.db,
        })
    }

    /// Product operations wired against the live store.
    pub fn product_service(&self) -> ProductService<AttributeRepository> {
        ProductService::new(
            ProductRepository::new(self.db.clone()),
            AttributeRepository::new(self.db.clone()),
        )
    }
}

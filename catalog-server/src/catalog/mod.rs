//! Catalog Domain
//!
//! Keeps a product's variants, their attribute references, and the
//! derived aggregate fields mutually consistent across writes, and
//! expands id references into full records on reads.
//!
//! # Modules
//!
//! - [`validator`] - candidate variant checks and normalization
//! - [`main_attribute`] - distinguishing-attribute resolution
//! - [`aggregate`] - derived fields recomputed before persist
//! - [`pricing`] - read-time effective price / discount
//! - [`projection`] - id reference expansion for responses
//! - [`filter`] - backend-neutral list predicates
//! - [`service`] - operation orchestration

pub mod aggregate;
pub mod error;
pub mod filter;
pub mod main_attribute;
pub mod pricing;
pub mod projection;
pub mod service;
pub mod validator;

pub use error::CatalogError;
pub use service::{DeleteOutcome, ProductPage, ProductService};

use crate::db::models::Attribute;
use crate::db::repository::{AttributeRepository, RepoResult};

/// Read-only lookup into the attribute catalog.
///
/// The catalog is maintained externally and can change between
/// requests; callers always batch-fetch a fresh snapshot. Missing ids
/// are simply absent from the result, never errors.
#[allow(async_fn_in_trait)]
pub trait AttributeCatalog {
    async fn find_by_ids(&self, ids: &[String]) -> RepoResult<Vec<Attribute>>;
}

impl AttributeCatalog for AttributeRepository {
    async fn find_by_ids(&self, ids: &[String]) -> RepoResult<Vec<Attribute>> {
        AttributeRepository::find_by_ids(self, ids).await
    }
}

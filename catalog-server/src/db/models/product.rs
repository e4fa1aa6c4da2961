//! Product Model
//!
//! A product is in exactly one of two modes:
//! - **simple**: `variants` is empty, `price` and `stock` are set
//!   directly and `total_stock` mirrors `stock`;
//! - **variant-bearing**: `variants` is non-empty, `main_attribute_id`
//!   names the attribute every variant varies along, `price`/`stock`
//!   are cleared and `total_stock` is the sum of variant stocks.
//!
//! `total_stock` is derived and recomputed before every persist;
//! effective price and discount percent are never stored at all.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use surrealdb::sql::Thing;

use super::serde_helpers;

pub type ProductId = Thing;

/// Product model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<ProductId>,
    pub title: String,
    /// Globally unique, normalized slug
    pub slug: String,
    pub description: Option<String>,
    pub brand: Option<String>,
    /// Record link to category
    pub category: Option<Thing>,
    /// Attribute every variant varies along; set iff variants exist
    pub main_attribute_id: Option<String>,
    #[serde(default)]
    pub image_url: String,
    /// Base price; only meaningful for simple products
    pub price: Option<f64>,
    pub sale_price: Option<f64>,
    pub offer_start: Option<DateTime<Utc>>,
    pub offer_end: Option<DateTime<Utc>>,
    #[serde(default = "default_currency")]
    pub currency: String,
    /// Directly managed stock; only meaningful for simple products
    pub stock: Option<i64>,
    /// Derived: `stock` when simple, sum of variant stocks otherwise
    #[serde(default)]
    pub total_stock: i64,
    #[serde(default)]
    pub variants: Vec<Variant>,
    #[serde(default = "default_true")]
    pub is_active: bool,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

fn default_true() -> bool {
    true
}

fn default_currency() -> String {
    "EUR".to_string()
}

/// One purchasable configuration of a product
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Variant {
    pub id: String,
    pub sku: Option<String>,
    pub price: f64,
    pub sale_price: Option<f64>,
    pub stock: i64,
    pub image_url: Option<String>,
    pub barcode: Option<String>,
    pub values: Vec<VariantPair>,
}

/// Stored attribute reference of a variant, always in list form
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VariantPair {
    pub attribute_id: String,
    pub attributes_value_id: Vec<String>,
    pub stock: i64,
    pub image_url: Option<String>,
}

/// One id or a list of ids, as accepted on the wire.
///
/// Normalized to a plain list at the validation boundary so that
/// downstream code only ever handles one shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ValueRef {
    Single(String),
    Multiple(Vec<String>),
}

impl ValueRef {
    pub fn into_list(self) -> Vec<String> {
        match self {
            ValueRef::Single(id) => vec![id],
            ValueRef::Multiple(ids) => ids,
        }
    }
}

// =============================================================================
// Write DTOs
// =============================================================================

/// Candidate variant as submitted by the caller
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VariantInput {
    pub sku: Option<String>,
    pub price: f64,
    pub sale_price: Option<f64>,
    pub stock: i64,
    pub image_url: Option<String>,
    pub barcode: Option<String>,
    #[serde(default)]
    pub values: Vec<VariantPairInput>,
}

/// Candidate attribute reference as submitted by the caller
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VariantPairInput {
    pub attribute_id: String,
    pub attributes_value_id: ValueRef,
    pub stock: i64,
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductCreate {
    pub title: String,
    /// Explicit slug; derived from `title` when absent
    pub slug: Option<String>,
    pub description: Option<String>,
    pub brand: Option<String>,
    /// Bare category id
    pub category: Option<String>,
    pub main_attribute_id: Option<String>,
    pub image_url: Option<String>,
    pub price: Option<f64>,
    pub sale_price: Option<f64>,
    pub offer_start: Option<DateTime<Utc>>,
    pub offer_end: Option<DateTime<Utc>>,
    pub currency: Option<String>,
    pub stock: Option<i64>,
    #[serde(default)]
    pub variants: Vec<VariantInput>,
    pub is_active: Option<bool>,
}

/// Sparse update: absent fields stay unchanged; explicit `null` on the
/// double-option fields clears them; a supplied `variants` list is a
/// full replacement.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProductUpdate {
    pub title: Option<String>,
    pub slug: Option<String>,
    #[serde(default, deserialize_with = "serde_helpers::nullable")]
    pub description: Option<Option<String>>,
    #[serde(default, deserialize_with = "serde_helpers::nullable")]
    pub brand: Option<Option<String>>,
    #[serde(default, deserialize_with = "serde_helpers::nullable")]
    pub category: Option<Option<String>>,
    pub main_attribute_id: Option<String>,
    pub image_url: Option<String>,
    pub price: Option<f64>,
    #[serde(default, deserialize_with = "serde_helpers::nullable")]
    pub sale_price: Option<Option<f64>>,
    #[serde(default, deserialize_with = "serde_helpers::nullable")]
    pub offer_start: Option<Option<DateTime<Utc>>>,
    #[serde(default, deserialize_with = "serde_helpers::nullable")]
    pub offer_end: Option<Option<DateTime<Utc>>>,
    pub currency: Option<String>,
    pub stock: Option<i64>,
    pub variants: Option<Vec<VariantInput>>,
    pub is_active: Option<bool>,
}

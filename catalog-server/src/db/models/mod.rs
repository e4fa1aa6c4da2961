//! Database Models
//!
//! Serde models for the document store. Attributes are read-only
//! catalog records; products embed their variants directly.

pub mod attribute;
pub mod product;
pub mod serde_helpers;

pub use attribute::{Attribute, AttributeId, AttributeKind, AttributeValue};
pub use product::{
    Product, ProductCreate, ProductId, ProductUpdate, ValueRef, Variant, VariantInput,
    VariantPair, VariantPairInput,
};

//! Typed failures for catalog writes
//!
//! Expected bad input never panics and never reaches the store; it is
//! reported through [`CatalogError`], with enough context to point at
//! the offending field, variant index, or id list.

use thiserror::Error;

use crate::utils::AppError;

/// Validation failure raised while checking a product write.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CatalogError {
    #[error("{field} is missing or malformed")]
    InvalidField { field: &'static str },

    #[error("a product without variants requires both price and stock")]
    SimpleFieldsRequired,

    #[error("variants must not be empty")]
    EmptyVariants,

    #[error("variant[{index}].{field} is invalid")]
    InvalidVariantField { index: usize, field: &'static str },

    #[error("variant[{index}] references a malformed attribute id: {id}")]
    MalformedAttributeId { index: usize, id: String },

    #[error("variant[{index}] references a malformed value id: {id}")]
    MalformedValueId { index: usize, id: String },

    /// Every missing id, not just the first
    #[error("unknown attributes: {}", .ids.join(", "))]
    UnknownAttributes { ids: Vec<String> },

    /// All offending value ids, grouped per attribute
    #[error("unknown attribute values: {}", describe_violations(.violations))]
    UnknownValues { violations: Vec<ValueViolation> },

    #[error("main attribute is required when variants use more than one attribute")]
    MainAttributeRequired,

    #[error("malformed main attribute id: {id}")]
    MalformedMainAttribute { id: String },

    #[error("main attribute {id} is not used by the variants")]
    MainAttributeUnused { id: String },

    #[error("variant[{index}] is missing a pair for the main attribute")]
    MainAttributeMissingOnVariant { index: usize },
}

/// Value ids that do not exist on their attribute.
#[derive(Debug, Clone, PartialEq)]
pub struct ValueViolation {
    pub attribute_id: String,
    pub value_ids: Vec<String>,
}

fn describe_violations(violations: &[ValueViolation]) -> String {
    violations
        .iter()
        .map(|v| format!("{} -> [{}]", v.attribute_id, v.value_ids.join(", ")))
        .collect::<Vec<_>>()
        .join("; ")
}

impl From<CatalogError> for AppError {
    fn from(err: CatalogError) -> Self {
        AppError::Validation(err.to_string())
    }
}

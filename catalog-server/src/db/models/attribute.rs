//! Attribute Model
//!
//! Attributes are managed by an external admin system and are
//! read-only here. Values are embedded directly in the attribute
//! record; value ids are unique within their owning attribute only,
//! not globally.

use serde::{Deserialize, Serialize};
use surrealdb::sql::Thing;

pub type AttributeId = Thing;

/// Attribute kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttributeKind {
    Text,
    Color,
    Size,
    Number,
    Select,
}

/// Attribute value (embedded in Attribute)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttributeValue {
    pub id: String,
    pub label: String,
    pub value: Option<String>,
    /// Free-form presentation data (e.g. a color swatch hex code)
    pub meta: Option<serde_json::Value>,
}

/// Attribute model (with embedded values)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Attribute {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<AttributeId>,
    pub name: String,
    /// Unique slug, e.g. "color"
    pub code: String,
    #[serde(rename = "type")]
    pub kind: AttributeKind,
    #[serde(default)]
    pub values: Vec<AttributeValue>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

fn default_true() -> bool {
    true
}

impl Attribute {
    /// Bare record key, without the table prefix.
    pub fn key(&self) -> Option<String> {
        self.id.as_ref().map(|t| t.id.to_raw())
    }
}

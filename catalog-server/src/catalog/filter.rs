//! Backend-neutral query predicates
//!
//! List filters are assembled as an explicit predicate tree and
//! rendered to the store's query language in one place, so the
//! construction logic — including the price-range OR across simple
//! and variant pricing — is testable without a database.

use serde::Deserialize;
use serde_json::{Map, Value, json};

use crate::db::oid;
use crate::db::repository::strip_table_prefix;

/// Query parameters accepted by the product list endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct ProductQuery {
    /// Case-insensitive substring match on title
    pub search: Option<String>,
    /// Bare category id
    pub category: Option<String>,
    pub is_active: Option<bool>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    /// Sort key, prefixed with '-' for descending (e.g. "-price")
    pub sort: Option<String>,
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}

fn default_limit() -> i64 {
    50
}

impl Default for ProductQuery {
    fn default() -> Self {
        Self {
            search: None,
            category: None,
            is_active: None,
            min_price: None,
            max_price: None,
            sort: None,
            limit: default_limit(),
            offset: 0,
        }
    }
}

/// Comparison operator on a scalar field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cmp {
    Eq,
    Gte,
    Lte,
}

/// One node of the predicate tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    /// Every child must hold; empty means "match all"
    All(Vec<Predicate>),
    /// At least one child must hold
    Any(Vec<Predicate>),
    /// Scalar comparison against a bound value
    Compare {
        field: &'static str,
        op: Cmp,
        value: Value,
    },
    /// Field is present (non-null)
    IsSet { field: &'static str },
    /// Equality against a record link, e.g. a category reference
    RecordEq {
        field: &'static str,
        table: &'static str,
        id: String,
    },
    /// Case-insensitive substring match on a text field
    TextContains { field: &'static str, needle: String },
    /// At least one variant whose price lies in the closed range;
    /// absent bounds leave that side open
    VariantPriceRange {
        min: Option<f64>,
        max: Option<f64>,
    },
}

/// Rendered form: a WHERE clause plus its bind values.
#[derive(Debug, Clone)]
pub struct RenderedFilter {
    pub clause: String,
    pub binds: Map<String, Value>,
}

impl Predicate {
    pub fn render(&self) -> RenderedFilter {
        let mut binds = Map::new();
        let clause = self.render_into(&mut binds);
        RenderedFilter { clause, binds }
    }

    fn render_into(&self, binds: &mut Map<String, Value>) -> String {
        match self {
            Predicate::All(children) if children.is_empty() => "true".to_string(),
            Predicate::All(children) => join_children(children, " AND ", binds),
            Predicate::Any(children) if children.is_empty() => "false".to_string(),
            Predicate::Any(children) => join_children(children, " OR ", binds),
            Predicate::Compare { field, op, value } => {
                let name = bind(binds, value.clone());
                let op = match op {
                    Cmp::Eq => "=",
                    Cmp::Gte => ">=",
                    Cmp::Lte => "<=",
                };
                format!("{field} {op} ${name}")
            }
            Predicate::IsSet { field } => format!("{field} != NONE"),
            Predicate::RecordEq { field, table, id } => {
                let table = bind(binds, json!(table));
                let id = bind(binds, json!(id));
                format!("{field} = type::thing(${table}, ${id})")
            }
            Predicate::TextContains { field, needle } => {
                let name = bind(binds, json!(needle.to_lowercase()));
                format!("string::lowercase({field}) CONTAINS ${name}")
            }
            Predicate::VariantPriceRange { min, max } => {
                let mut conditions = Vec::new();
                if let Some(min) = min {
                    let name = bind(binds, json!(min));
                    conditions.push(format!("price >= ${name}"));
                }
                if let Some(max) = max {
                    let name = bind(binds, json!(max));
                    conditions.push(format!("price <= ${name}"));
                }
                if conditions.is_empty() {
                    return "array::len(variants) > 0".to_string();
                }
                format!(
                    "array::len(variants[WHERE {}]) > 0",
                    conditions.join(" AND ")
                )
            }
        }
    }
}

fn join_children(children: &[Predicate], sep: &str, binds: &mut Map<String, Value>) -> String {
    children
        .iter()
        .map(|child| format!("({})", child.render_into(binds)))
        .collect::<Vec<_>>()
        .join(sep)
}

fn bind(binds: &mut Map<String, Value>, value: Value) -> String {
    let name = format!("p{}", binds.len());
    binds.insert(name.clone(), value);
    name
}

/// Build the list filter for the given query parameters.
///
/// A price range matches a product when either its direct price or
/// any of its variant prices falls inside the range.
pub fn build_product_filter(query: &ProductQuery) -> Predicate {
    let mut all = Vec::new();

    if let Some(search) = &query.search
        && !search.trim().is_empty()
    {
        all.push(Predicate::TextContains {
            field: "title",
            needle: search.trim().to_string(),
        });
    }

    if let Some(category) = &query.category {
        let key = strip_table_prefix("category", category);
        if oid::is_valid(key) {
            all.push(Predicate::RecordEq {
                field: "category",
                table: "category",
                id: key.to_string(),
            });
        }
    }

    if let Some(is_active) = query.is_active {
        all.push(Predicate::Compare {
            field: "is_active",
            op: Cmp::Eq,
            value: json!(is_active),
        });
    }

    if query.min_price.is_some() || query.max_price.is_some() {
        let mut simple = vec![Predicate::IsSet { field: "price" }];
        if let Some(min) = query.min_price {
            simple.push(Predicate::Compare {
                field: "price",
                op: Cmp::Gte,
                value: json!(min),
            });
        }
        if let Some(max) = query.max_price {
            simple.push(Predicate::Compare {
                field: "price",
                op: Cmp::Lte,
                value: json!(max),
            });
        }
        all.push(Predicate::Any(vec![
            Predicate::All(simple),
            Predicate::VariantPriceRange {
                min: query.min_price,
                max: query.max_price,
            },
        ]));
    }

    Predicate::All(all)
}

// =============================================================================
// Sort
// =============================================================================

/// Whitelisted sort keys; anything else falls back to creation time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    Title,
    Price,
    TotalStock,
    CreatedAt,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sort {
    pub key: SortKey,
    pub descending: bool,
}

impl Sort {
    /// Render for interpolation into ORDER BY. Keys are whitelisted,
    /// never taken from the raw query string.
    pub fn render(&self) -> String {
        let field = match self.key {
            SortKey::Title => "title",
            SortKey::Price => "price",
            SortKey::TotalStock => "total_stock",
            SortKey::CreatedAt => "created_at",
        };
        let direction = if self.descending { "DESC" } else { "ASC" };
        format!("{field} {direction}")
    }
}

/// Parse a "-price" style sort parameter; unknown keys and absence
/// fall back to newest-first.
pub fn parse_sort(raw: Option<&str>) -> Sort {
    let default = Sort {
        key: SortKey::CreatedAt,
        descending: true,
    };
    let Some(raw) = raw else {
        return default;
    };
    let (descending, name) = match raw.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, raw),
    };
    let key = match name {
        "title" => SortKey::Title,
        "price" => SortKey::Price,
        "total_stock" => SortKey::TotalStock,
        "created_at" => SortKey::CreatedAt,
        _ => return default,
    };
    Sort { key, descending }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_query_matches_all() {
        let rendered = build_product_filter(&ProductQuery::default()).render();
        assert_eq!(rendered.clause, "true");
        assert!(rendered.binds.is_empty());
    }

    #[test]
    fn search_is_lowercased_and_bound() {
        let query = ProductQuery {
            search: Some("  Socks ".to_string()),
            ..Default::default()
        };
        let rendered = build_product_filter(&query).render();
        assert!(rendered.clause.contains("string::lowercase(title) CONTAINS $p0"));
        assert_eq!(rendered.binds["p0"], json!("socks"));
    }

    #[test]
    fn malformed_category_is_dropped() {
        let query = ProductQuery {
            category: Some("nope".to_string()),
            ..Default::default()
        };
        let rendered = build_product_filter(&query).render();
        assert_eq!(rendered.clause, "true");
    }

    #[test]
    fn category_renders_as_record_pointer() {
        let query = ProductQuery {
            category: Some("aaaaaaaaaaaaaaaaaaaaaaaa".to_string()),
            ..Default::default()
        };
        let rendered = build_product_filter(&query).render();
        assert!(rendered.clause.contains("category = type::thing($p0, $p1)"));
        assert_eq!(rendered.binds["p0"], json!("category"));
        assert_eq!(rendered.binds["p1"], json!("aaaaaaaaaaaaaaaaaaaaaaaa"));
    }

    #[test]
    fn price_range_ors_simple_and_variant_pricing() {
        let query = ProductQuery {
            min_price: Some(5.0),
            max_price: Some(20.0),
            ..Default::default()
        };
        let predicate = build_product_filter(&query);
        let rendered = predicate.render();

        // One OR of the simple-price branch and the variant branch.
        assert!(rendered.clause.contains("price != NONE"));
        assert!(rendered.clause.contains(" OR "));
        assert!(rendered.clause.contains("array::len(variants[WHERE "));
        // Four bound values: min/max for each branch.
        assert_eq!(rendered.binds.len(), 4);
    }

    #[test]
    fn open_ended_price_range_binds_one_value_per_branch() {
        let query = ProductQuery {
            min_price: Some(5.0),
            ..Default::default()
        };
        let rendered = build_product_filter(&query).render();
        assert_eq!(rendered.binds.len(), 2);
        assert!(rendered.clause.contains("price >= $p1"));
    }

    #[test]
    fn filters_compose_with_and() {
        let query = ProductQuery {
            search: Some("sock".to_string()),
            is_active: Some(true),
            ..Default::default()
        };
        let rendered = build_product_filter(&query).render();
        assert!(rendered.clause.contains(" AND "));
        assert!(rendered.clause.contains("is_active = $p1"));
    }

    #[test]
    fn sort_parsing_whitelists_keys() {
        assert_eq!(
            parse_sort(Some("-price")),
            Sort {
                key: SortKey::Price,
                descending: true
            }
        );
        assert_eq!(
            parse_sort(Some("title")),
            Sort {
                key: SortKey::Title,
                descending: false
            }
        );
        // Unknown keys cannot reach the query string.
        assert_eq!(
            parse_sort(Some("evil; DROP TABLE product")),
            Sort {
                key: SortKey::CreatedAt,
                descending: true
            }
        );
        assert_eq!(parse_sort(None).render(), "created_at DESC");
    }
}

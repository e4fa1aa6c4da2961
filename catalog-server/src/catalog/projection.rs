//! Resolution Projector
//!
//! Expands stored attribute/value id references into full records for
//! read responses. Resolution is display-oriented: a dangling
//! reference yields a placeholder with null descriptive fields, never
//! an error — reads must not fail because the catalog moved on.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::catalog::pricing;
use crate::db::models::{Attribute, AttributeKind, AttributeValue, Product, Variant};

/// Attribute metadata attached to a resolved pair. All descriptive
/// fields are null when the attribute is unknown to the catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolvedAttribute {
    pub id: String,
    pub name: Option<String>,
    pub code: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<AttributeKind>,
    pub is_active: Option<bool>,
}

/// One resolved attribute value; descriptive fields are null when the
/// value id is unknown on its attribute.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolvedValue {
    pub id: String,
    pub label: Option<String>,
    pub value: Option<String>,
    pub meta: Option<serde_json::Value>,
}

/// A variant pair with its references expanded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolvedPair {
    pub attribute: ResolvedAttribute,
    pub values: Vec<ResolvedValue>,
    pub stock: i64,
    pub image_url: Option<String>,
}

/// Response-ready variant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VariantView {
    pub id: String,
    pub sku: Option<String>,
    pub price: f64,
    pub sale_price: Option<f64>,
    pub effective_price: f64,
    pub discount_percent: i64,
    pub stock: i64,
    pub image_url: Option<String>,
    pub barcode: Option<String>,
    pub values: Vec<ResolvedPair>,
}

/// Response-ready product.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductView {
    pub id: String,
    pub title: String,
    pub slug: String,
    pub description: Option<String>,
    pub brand: Option<String>,
    pub category: Option<String>,
    pub main_attribute_id: Option<String>,
    pub image_url: String,
    pub price: Option<f64>,
    pub sale_price: Option<f64>,
    pub offer_start: Option<DateTime<Utc>>,
    pub offer_end: Option<DateTime<Utc>>,
    pub currency: String,
    pub stock: Option<i64>,
    pub total_stock: i64,
    pub effective_price: Option<f64>,
    pub discount_percent: Option<i64>,
    pub variants: Vec<VariantView>,
    pub is_active: bool,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Distinct attribute ids referenced by the given products, in
/// first-use order. One pass over every variant pair.
pub fn referenced_attribute_ids(products: &[Product]) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    let mut out = Vec::new();
    for product in products {
        for variant in &product.variants {
            for pair in &variant.values {
                if seen.insert(pair.attribute_id.clone()) {
                    out.push(pair.attribute_id.clone());
                }
            }
        }
    }
    out
}

type AttrMap<'a> = HashMap<String, &'a Attribute>;
type ValueMap<'a> = HashMap<(String, &'a str), &'a AttributeValue>;

fn build_lookup_maps(attributes: &[Attribute]) -> (AttrMap<'_>, ValueMap<'_>) {
    let attr_by_id: AttrMap = attributes
        .iter()
        .filter_map(|attr| attr.key().map(|key| (key, attr)))
        .collect();
    let value_by_id: ValueMap = attributes
        .iter()
        .filter_map(|attr| attr.key().map(|key| (key, attr)))
        .flat_map(|(key, attr)| {
            attr.values
                .iter()
                .map(move |value| ((key.clone(), value.id.as_str()), value))
        })
        .collect();
    (attr_by_id, value_by_id)
}

/// Expand a batch of products against one catalog snapshot.
pub fn project_all(
    products: &[Product],
    attributes: &[Attribute],
    now: DateTime<Utc>,
) -> Vec<ProductView> {
    let (attr_by_id, value_by_id) = build_lookup_maps(attributes);
    products
        .iter()
        .map(|product| project_product(product, &attr_by_id, &value_by_id, now))
        .collect()
}

/// Expand a single product against one catalog snapshot.
pub fn project(product: &Product, attributes: &[Attribute], now: DateTime<Utc>) -> ProductView {
    let (attr_by_id, value_by_id) = build_lookup_maps(attributes);
    project_product(product, &attr_by_id, &value_by_id, now)
}

fn project_product(
    product: &Product,
    attr_by_id: &HashMap<String, &Attribute>,
    value_by_id: &HashMap<(String, &str), &AttributeValue>,
    now: DateTime<Utc>,
) -> ProductView {
    let effective_price = product.price.map(|price| {
        pricing::product_effective_price(
            price,
            product.sale_price,
            product.offer_start,
            product.offer_end,
            now,
        )
    });
    let discount_percent = product
        .price
        .zip(effective_price)
        .map(|(price, effective)| pricing::discount_percent(price, effective));

    ProductView {
        id: product
            .id
            .as_ref()
            .map(|t| t.id.to_raw())
            .unwrap_or_default(),
        title: product.title.clone(),
        slug: product.slug.clone(),
        description: product.description.clone(),
        brand: product.brand.clone(),
        category: product.category.as_ref().map(|t| t.id.to_raw()),
        main_attribute_id: product.main_attribute_id.clone(),
        image_url: product.image_url.clone(),
        price: product.price,
        sale_price: product.sale_price,
        offer_start: product.offer_start,
        offer_end: product.offer_end,
        currency: product.currency.clone(),
        stock: product.stock,
        total_stock: product.total_stock,
        effective_price,
        discount_percent,
        variants: product
            .variants
            .iter()
            .map(|variant| project_variant(variant, attr_by_id, value_by_id))
            .collect(),
        is_active: product.is_active,
        created_at: product.created_at,
        updated_at: product.updated_at,
    }
}

fn project_variant(
    variant: &Variant,
    attr_by_id: &HashMap<String, &Attribute>,
    value_by_id: &HashMap<(String, &str), &AttributeValue>,
) -> VariantView {
    let effective_price = pricing::variant_effective_price(variant.price, variant.sale_price);

    let values = variant
        .values
        .iter()
        .map(|pair| {
            let attribute = match attr_by_id.get(&pair.attribute_id) {
                Some(attr) => ResolvedAttribute {
                    id: pair.attribute_id.clone(),
                    name: Some(attr.name.clone()),
                    code: Some(attr.code.clone()),
                    kind: Some(attr.kind),
                    is_active: Some(attr.is_active),
                },
                None => placeholder_attribute(&pair.attribute_id),
            };
            let values = pair
                .attributes_value_id
                .iter()
                .map(|value_id| {
                    match value_by_id.get(&(pair.attribute_id.clone(), value_id.as_str())) {
                        Some(value) => ResolvedValue {
                            id: value_id.clone(),
                            label: Some(value.label.clone()),
                            value: value.value.clone(),
                            meta: value.meta.clone(),
                        },
                        None => placeholder_value(value_id),
                    }
                })
                .collect();
            ResolvedPair {
                attribute,
                values,
                stock: pair.stock,
                image_url: pair.image_url.clone(),
            }
        })
        .collect();

    VariantView {
        id: variant.id.clone(),
        sku: variant.sku.clone(),
        price: variant.price,
        sale_price: variant.sale_price,
        effective_price,
        discount_percent: pricing::discount_percent(variant.price, effective_price),
        stock: variant.stock,
        image_url: variant.image_url.clone(),
        barcode: variant.barcode.clone(),
        values,
    }
}

fn placeholder_attribute(id: &str) -> ResolvedAttribute {
    ResolvedAttribute {
        id: id.to_string(),
        name: None,
        code: None,
        kind: None,
        is_active: None,
    }
}

fn placeholder_value(id: &str) -> ResolvedValue {
    ResolvedValue {
        id: id.to_string(),
        label: None,
        value: None,
        meta: None,
    }
}

//! Variant Validator
//!
//! Checks a candidate variant list before anything touches the store.
//! Shape checks ([`normalize`]) fail fast on the first violation;
//! catalog-reference checks ([`check_catalog_refs`]) run against a
//! snapshot fetched in one batch and collect every missing attribute
//! id and every unknown value id before failing. No I/O happens here.

use std::collections::{HashMap, HashSet};

use crate::catalog::error::{CatalogError, ValueViolation};
use crate::db::models::{Attribute, Variant, VariantInput, VariantPair};
use crate::db::oid;
use crate::utils::validation::MAX_URL_LEN;

/// Shape-check candidate variants and reduce every attribute pair to
/// the list form. `next_id` supplies ids for the accepted variants.
pub fn normalize(
    inputs: &[VariantInput],
    mut next_id: impl FnMut() -> String,
) -> Result<Vec<Variant>, CatalogError> {
    if inputs.is_empty() {
        return Err(CatalogError::EmptyVariants);
    }

    let mut out = Vec::with_capacity(inputs.len());
    for (index, input) in inputs.iter().enumerate() {
        if !input.price.is_finite() || input.price < 0.0 {
            return Err(CatalogError::InvalidVariantField {
                index,
                field: "price",
            });
        }
        if let Some(sale) = input.sale_price
            && (!sale.is_finite() || sale < 0.0)
        {
            return Err(CatalogError::InvalidVariantField {
                index,
                field: "sale_price",
            });
        }
        if input.stock < 0 {
            return Err(CatalogError::InvalidVariantField {
                index,
                field: "stock",
            });
        }
        if input.values.is_empty() {
            return Err(CatalogError::InvalidVariantField {
                index,
                field: "values",
            });
        }

        let mut pairs = Vec::with_capacity(input.values.len());
        for pair in &input.values {
            if !oid::is_valid(&pair.attribute_id) {
                return Err(CatalogError::MalformedAttributeId {
                    index,
                    id: pair.attribute_id.clone(),
                });
            }
            let value_ids = pair.attributes_value_id.clone().into_list();
            if value_ids.is_empty() {
                return Err(CatalogError::InvalidVariantField {
                    index,
                    field: "attributes_value_id",
                });
            }
            for value_id in &value_ids {
                if !oid::is_valid(value_id) {
                    return Err(CatalogError::MalformedValueId {
                        index,
                        id: value_id.clone(),
                    });
                }
            }
            if pair.stock < 0 {
                return Err(CatalogError::InvalidVariantField {
                    index,
                    field: "values.stock",
                });
            }
            if let Some(url) = &pair.image_url
                && url.len() > MAX_URL_LEN
            {
                return Err(CatalogError::InvalidVariantField {
                    index,
                    field: "values.image_url",
                });
            }

            pairs.push(VariantPair {
                attribute_id: pair.attribute_id.clone(),
                attributes_value_id: value_ids,
                stock: pair.stock,
                image_url: pair.image_url.clone(),
            });
        }

        out.push(Variant {
            id: next_id(),
            sku: input.sku.clone(),
            price: input.price,
            sale_price: input.sale_price,
            stock: input.stock,
            image_url: input.image_url.clone(),
            barcode: input.barcode.clone(),
            values: pairs,
        });
    }
    Ok(out)
}

/// Distinct attribute ids referenced by the variants, in first-use order.
pub fn distinct_attribute_ids(variants: &[Variant]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for variant in variants {
        for pair in &variant.values {
            if seen.insert(pair.attribute_id.clone()) {
                out.push(pair.attribute_id.clone());
            }
        }
    }
    out
}

/// Check every attribute and value reference against a catalog snapshot.
///
/// Missing attribute ids are reported all at once; unknown value ids
/// are collected per attribute across all variants before failing.
pub fn check_catalog_refs(
    variants: &[Variant],
    attributes: &[Attribute],
) -> Result<(), CatalogError> {
    let by_id: HashMap<String, &Attribute> = attributes
        .iter()
        .filter_map(|attr| attr.key().map(|key| (key, attr)))
        .collect();

    let referenced = distinct_attribute_ids(variants);
    let missing: Vec<String> = referenced
        .iter()
        .filter(|id| !by_id.contains_key(*id))
        .cloned()
        .collect();
    if !missing.is_empty() {
        return Err(CatalogError::UnknownAttributes { ids: missing });
    }

    let mut violations: Vec<ValueViolation> = Vec::new();
    for attribute_id in &referenced {
        let attribute = by_id[attribute_id.as_str()];
        let known: HashSet<&str> = attribute.values.iter().map(|v| v.id.as_str()).collect();

        let mut bad: Vec<String> = Vec::new();
        for variant in variants {
            for pair in &variant.values {
                if &pair.attribute_id != attribute_id {
                    continue;
                }
                for value_id in &pair.attributes_value_id {
                    if !known.contains(value_id.as_str()) && !bad.contains(value_id) {
                        bad.push(value_id.clone());
                    }
                }
            }
        }
        if !bad.is_empty() {
            violations.push(ValueViolation {
                attribute_id: attribute_id.clone(),
                value_ids: bad,
            });
        }
    }
    if !violations.is_empty() {
        return Err(CatalogError::UnknownValues { violations });
    }
    Ok(())
}

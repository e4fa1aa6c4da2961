//! Main-Attribute Resolver
//!
//! Every variant-bearing product has exactly one distinguishing
//! attribute that all variants vary along; it drives downstream UI
//! grouping and must be unambiguous and universally present.

use crate::catalog::error::CatalogError;
use crate::catalog::validator::distinct_attribute_ids;
use crate::db::models::Variant;
use crate::db::oid;

/// Decide the product's main attribute.
///
/// One distinct attribute across all variants wins automatically; a
/// caller-supplied id is then only shape-checked. With two or more
/// distinct attributes the caller must name one, it must be among the
/// used ids, and every variant must carry a pair for it.
pub fn resolve(variants: &[Variant], supplied: Option<&str>) -> Result<String, CatalogError> {
    // Supplied ids are shape-checked even when inference ignores them.
    if let Some(id) = supplied
        && !oid::is_valid(id)
    {
        return Err(CatalogError::MalformedMainAttribute { id: id.to_string() });
    }

    let distinct = distinct_attribute_ids(variants);
    match distinct.len() {
        // Empty variant sets are rejected before resolution.
        0 => Err(CatalogError::EmptyVariants),
        1 => Ok(distinct[0].clone()),
        _ => {
            let id = supplied.ok_or(CatalogError::MainAttributeRequired)?;
            if !distinct.iter().any(|d| d == id) {
                return Err(CatalogError::MainAttributeUnused { id: id.to_string() });
            }
            for (index, variant) in variants.iter().enumerate() {
                if !variant.values.iter().any(|p| p.attribute_id == id) {
                    return Err(CatalogError::MainAttributeMissingOnVariant { index });
                }
            }
            Ok(id.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::models::VariantPair;

    const ATTR_COLOR: &str = "aaaaaaaaaaaaaaaaaaaaaaaa";
    const ATTR_SIZE: &str = "bbbbbbbbbbbbbbbbbbbbbbbb";
    const VAL: &str = "cccccccccccccccccccccc01";

    fn variant(attribute_ids: &[&str]) -> Variant {
        Variant {
            id: "dddddddddddddddddddddddd".to_string(),
            sku: None,
            price: 10.0,
            sale_price: None,
            stock: 1,
            image_url: None,
            barcode: None,
            values: attribute_ids
                .iter()
                .map(|id| VariantPair {
                    attribute_id: id.to_string(),
                    attributes_value_id: vec![VAL.to_string()],
                    stock: 1,
                    image_url: None,
                })
                .collect(),
        }
    }

    #[test]
    fn single_attribute_is_inferred() {
        let variants = [variant(&[ATTR_COLOR]), variant(&[ATTR_COLOR])];
        assert_eq!(resolve(&variants, None).unwrap(), ATTR_COLOR);
    }

    #[test]
    fn single_attribute_ignores_caller_choice_but_checks_shape() {
        let variants = [variant(&[ATTR_COLOR])];
        // A well-formed caller id loses against inference.
        assert_eq!(resolve(&variants, Some(ATTR_SIZE)).unwrap(), ATTR_COLOR);
        // A malformed one still fails.
        let err = resolve(&variants, Some("junk")).unwrap_err();
        assert_eq!(
            err,
            CatalogError::MalformedMainAttribute {
                id: "junk".to_string()
            }
        );
    }

    #[test]
    fn two_attributes_require_caller_choice() {
        let variants = [variant(&[ATTR_COLOR, ATTR_SIZE])];
        let err = resolve(&variants, None).unwrap_err();
        assert_eq!(err, CatalogError::MainAttributeRequired);
    }

    #[test]
    fn caller_choice_must_be_used_by_variants() {
        let variants = [variant(&[ATTR_COLOR, ATTR_SIZE])];
        let err = resolve(&variants, Some("eeeeeeeeeeeeeeeeeeeeeeee")).unwrap_err();
        assert_eq!(
            err,
            CatalogError::MainAttributeUnused {
                id: "eeeeeeeeeeeeeeeeeeeeeeee".to_string()
            }
        );
    }

    #[test]
    fn caller_choice_must_cover_every_variant() {
        let variants = [variant(&[ATTR_COLOR, ATTR_SIZE]), variant(&[ATTR_SIZE])];
        let err = resolve(&variants, Some(ATTR_COLOR)).unwrap_err();
        assert_eq!(err, CatalogError::MainAttributeMissingOnVariant { index: 1 });
    }

    #[test]
    fn valid_caller_choice_wins() {
        let variants = [
            variant(&[ATTR_COLOR, ATTR_SIZE]),
            variant(&[ATTR_COLOR, ATTR_SIZE]),
        ];
        assert_eq!(resolve(&variants, Some(ATTR_SIZE)).unwrap(), ATTR_SIZE);
    }
}

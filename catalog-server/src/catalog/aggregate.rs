//! Aggregate Maintainer
//!
//! Derived state recomputed before every persist so stored documents
//! are never stale. Read-time derivations (effective price, discount)
//! live in [`crate::catalog::pricing`] instead.

use crate::catalog::error::CatalogError;
use crate::db::models::Product;

/// Normalize a slug: trim, lowercase, collapse every run of
/// non-alphanumeric characters to a single hyphen, strip edge
/// hyphens. Idempotent.
pub fn slugify(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut pending_hyphen = false;
    for c in raw.trim().chars() {
        if c.is_alphanumeric() {
            if pending_hyphen && !out.is_empty() {
                out.push('-');
            }
            pending_hyphen = false;
            out.extend(c.to_lowercase());
        } else {
            pending_hyphen = true;
        }
    }
    out
}

/// Recompute the stock aggregate for the product's mode.
///
/// Simple products must carry both `price` and `stock` (a missing
/// value is a hard failure, not a default); variant-bearing products
/// get `price`/`stock` cleared and `total_stock` summed from the
/// variants.
pub fn apply_stock_totals(product: &mut Product) -> Result<(), CatalogError> {
    if product.variants.is_empty() {
        let price = product.price.ok_or(CatalogError::SimpleFieldsRequired)?;
        if !price.is_finite() || price < 0.0 {
            return Err(CatalogError::InvalidField { field: "price" });
        }
        if let Some(sale) = product.sale_price
            && (!sale.is_finite() || sale < 0.0)
        {
            return Err(CatalogError::InvalidField { field: "sale_price" });
        }
        let stock = product.stock.ok_or(CatalogError::SimpleFieldsRequired)?;
        if stock < 0 {
            return Err(CatalogError::InvalidField { field: "stock" });
        }
        product.total_stock = stock;
    } else {
        product.price = None;
        product.stock = None;
        product.total_stock = product.variants.iter().map(|v| v.stock).sum();
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::models::{Variant, VariantPair};

    fn base_product() -> Product {
        Product {
            id: None,
            title: "Crew Socks".to_string(),
            slug: "crew-socks".to_string(),
            description: None,
            brand: None,
            category: None,
            main_attribute_id: None,
            image_url: String::new(),
            price: Some(10.0),
            sale_price: None,
            offer_start: None,
            offer_end: None,
            currency: "EUR".to_string(),
            stock: Some(5),
            total_stock: 0,
            variants: vec![],
            is_active: true,
            created_at: None,
            updated_at: None,
        }
    }

    fn variant(stock: i64) -> Variant {
        Variant {
            id: "dddddddddddddddddddddddd".to_string(),
            sku: None,
            price: 10.0,
            sale_price: None,
            stock,
            image_url: None,
            barcode: None,
            values: vec![VariantPair {
                attribute_id: "aaaaaaaaaaaaaaaaaaaaaaaa".to_string(),
                attributes_value_id: vec!["cccccccccccccccccccccc01".to_string()],
                stock,
                image_url: None,
            }],
        }
    }

    #[test]
    fn slugify_collapses_and_lowercases() {
        assert_eq!(slugify("Crew Socks!!"), "crew-socks");
        assert_eq!(slugify("  Héllo -- World  "), "héllo-world");
        assert_eq!(slugify("A__B--C"), "a-b-c");
    }

    #[test]
    fn slugify_is_idempotent() {
        let once = slugify("Crew Socks!!");
        assert_eq!(slugify(&once), once);
    }

    #[test]
    fn slugify_strips_edge_hyphens() {
        assert_eq!(slugify("--socks--"), "socks");
        assert_eq!(slugify("!!!"), "");
    }

    #[test]
    fn simple_product_mirrors_stock() {
        let mut product = base_product();
        apply_stock_totals(&mut product).unwrap();
        assert_eq!(product.total_stock, 5);
        assert_eq!(product.stock, Some(5));
        assert_eq!(product.price, Some(10.0));
    }

    #[test]
    fn simple_product_requires_price_and_stock() {
        let mut product = base_product();
        product.stock = None;
        let err = apply_stock_totals(&mut product).unwrap_err();
        assert_eq!(err, CatalogError::SimpleFieldsRequired);

        let mut product = base_product();
        product.price = None;
        let err = apply_stock_totals(&mut product).unwrap_err();
        assert_eq!(err, CatalogError::SimpleFieldsRequired);
    }

    #[test]
    fn variant_product_sums_stock_and_clears_direct_fields() {
        let mut product = base_product();
        product.variants = vec![variant(3), variant(4)];
        apply_stock_totals(&mut product).unwrap();
        assert_eq!(product.total_stock, 7);
        assert_eq!(product.price, None);
        assert_eq!(product.stock, None);
    }
}

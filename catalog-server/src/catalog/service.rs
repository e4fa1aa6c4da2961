//! Product operations
//!
//! Every write runs the same pipeline: shape validation, one batched
//! catalog lookup, reference checks, main-attribute resolution,
//! aggregate recomputation, then a single store statement. Reads run
//! through the resolution projector. A request that fails anywhere in
//! validation performs no writes at all.

use chrono::Utc;

use crate::catalog::error::CatalogError;
use crate::catalog::filter::{self, ProductQuery};
use crate::catalog::projection::{self, ProductView};
use crate::catalog::{AttributeCatalog, aggregate, main_attribute, validator};
use crate::db::models::{Product, ProductCreate, ProductUpdate, Variant, VariantInput};
use crate::db::oid;
use crate::db::repository::{ProductRepository, make_thing, strip_table_prefix};
use crate::utils::validation::{
    MAX_NAME_LEN, MAX_NOTE_LEN, MAX_SHORT_TEXT_LEN, MAX_URL_LEN, validate_optional_text,
    validate_required_text,
};
use crate::utils::{AppError, AppResult};
use serde::Serialize;

const PRODUCT_TABLE: &str = "product";
const CATEGORY_TABLE: &str = "category";
const MAX_PAGE_SIZE: i64 = 200;

/// One page of projected products.
#[derive(Debug, Serialize)]
pub struct ProductPage {
    pub items: Vec<ProductView>,
    pub total: usize,
    pub limit: i64,
    pub offset: i64,
}

/// Outcome of a batch delete.
#[derive(Debug, Serialize)]
pub struct DeleteOutcome {
    /// Ids in the request, malformed ones included
    pub requested: usize,
    /// Documents actually removed
    pub deleted: usize,
}

pub struct ProductService<C> {
    products: ProductRepository,
    catalog: C,
}

impl<C: AttributeCatalog> ProductService<C> {
    pub fn new(products: ProductRepository, catalog: C) -> Self {
        Self { products, catalog }
    }

    /// Create a product; returns the resolved projection.
    pub async fn create(&self, data: ProductCreate) -> AppResult<ProductView> {
        validate_required_text(&data.title, "title", MAX_NAME_LEN)?;
        validate_optional_text(&data.description, "description", MAX_NOTE_LEN)?;
        validate_optional_text(&data.brand, "brand", MAX_SHORT_TEXT_LEN)?;
        validate_optional_text(&data.image_url, "image_url", MAX_URL_LEN)?;
        validate_optional_text(&data.currency, "currency", MAX_SHORT_TEXT_LEN)?;

        let slug = aggregate::slugify(data.slug.as_deref().unwrap_or(&data.title));
        if slug.is_empty() {
            return Err(CatalogError::InvalidField { field: "slug" }.into());
        }

        let category = parse_category(data.category.as_deref())?;

        let mut product = Product {
            id: None,
            title: data.title.trim().to_string(),
            slug,
            description: data.description,
            brand: data.brand,
            category,
            main_attribute_id: None,
            image_url: data.image_url.unwrap_or_default(),
            price: data.price,
            sale_price: data.sale_price,
            offer_start: data.offer_start,
            offer_end: data.offer_end,
            currency: data.currency.unwrap_or_else(|| "EUR".to_string()),
            stock: data.stock,
            total_stock: 0,
            variants: vec![],
            is_active: data.is_active.unwrap_or(true),
            created_at: None,
            updated_at: None,
        };

        if !data.variants.is_empty() {
            let (variants, main) = self
                .validate_variants(&data.variants, data.main_attribute_id.as_deref())
                .await?;
            product.main_attribute_id = Some(main);
            product.variants = variants;
        }

        aggregate::apply_stock_totals(&mut product)?;
        let now = Utc::now();
        product.created_at = Some(now);
        product.updated_at = Some(now);

        let id = oid::generate();
        let created = self.products.create(&id, product).await.map_err(|e| {
            match AppError::from(e) {
                AppError::Conflict(_) => {
                    AppError::conflict("A product with this slug already exists")
                }
                other => other,
            }
        })?;

        tracing::info!(product = %id, "Product created");
        self.project_one(created).await
    }

    /// Fetch one product with all attribute references resolved.
    pub async fn get(&self, id: &str) -> AppResult<ProductView> {
        let key = valid_key(id)?;
        let product = self
            .products
            .find_by_id(key)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Product {id} not found")))?;
        self.project_one(product).await
    }

    /// Filtered, sorted, paginated listing; every item is resolved
    /// against one shared catalog snapshot.
    pub async fn list(&self, query: &ProductQuery) -> AppResult<ProductPage> {
        let rendered = filter::build_product_filter(query).render();
        let sort = filter::parse_sort(query.sort.as_deref()).render();
        let limit = query.limit.clamp(1, MAX_PAGE_SIZE);
        let offset = query.offset.max(0);

        let total = self
            .products
            .count(&rendered.clause, rendered.binds.clone())
            .await?;
        let products = self
            .products
            .find_page(&rendered.clause, rendered.binds, &sort, offset, limit)
            .await?;

        let ids = projection::referenced_attribute_ids(&products);
        let attributes = self.catalog.find_by_ids(&ids).await?;
        let items = projection::project_all(&products, &attributes, Utc::now());

        Ok(ProductPage {
            items,
            total,
            limit,
            offset,
        })
    }

    /// Sparse update. Absent fields stay unchanged, explicit nulls
    /// clear, and a supplied variant list is a full replacement that
    /// goes through the complete validation pipeline again.
    pub async fn update(&self, id: &str, data: ProductUpdate) -> AppResult<ProductView> {
        let key = valid_key(id)?;
        let mut product = self
            .products
            .find_by_id(key)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Product {id} not found")))?;

        let mut title_changed = false;
        if let Some(title) = data.title {
            validate_required_text(&title, "title", MAX_NAME_LEN)?;
            title_changed = title.trim() != product.title;
            product.title = title.trim().to_string();
        }
        // Explicit slug always wins; otherwise a title change re-derives it.
        if let Some(slug) = data.slug {
            let slug = aggregate::slugify(&slug);
            if slug.is_empty() {
                return Err(CatalogError::InvalidField { field: "slug" }.into());
            }
            product.slug = slug;
        } else if title_changed {
            product.slug = aggregate::slugify(&product.title);
        }

        if let Some(description) = data.description {
            validate_optional_text(&description, "description", MAX_NOTE_LEN)?;
            product.description = description;
        }
        if let Some(brand) = data.brand {
            validate_optional_text(&brand, "brand", MAX_SHORT_TEXT_LEN)?;
            product.brand = brand;
        }
        if let Some(category) = data.category {
            product.category = parse_category(category.as_deref())?;
        }
        if let Some(image_url) = data.image_url {
            validate_optional_text(&Some(image_url.clone()), "image_url", MAX_URL_LEN)?;
            product.image_url = image_url;
        }
        if let Some(currency) = data.currency {
            validate_required_text(&currency, "currency", MAX_SHORT_TEXT_LEN)?;
            product.currency = currency;
        }
        if let Some(price) = data.price {
            product.price = Some(price);
        }
        if let Some(sale_price) = data.sale_price {
            product.sale_price = sale_price;
        }
        if let Some(offer_start) = data.offer_start {
            product.offer_start = offer_start;
        }
        if let Some(offer_end) = data.offer_end {
            product.offer_end = offer_end;
        }
        if let Some(stock) = data.stock {
            product.stock = Some(stock);
        }
        if let Some(is_active) = data.is_active {
            product.is_active = is_active;
        }

        if let Some(variant_inputs) = data.variants {
            // Full replacement; an explicitly empty list is a caller
            // error. The stored main attribute stands in when the
            // caller does not resend one.
            let supplied_main = data
                .main_attribute_id
                .as_deref()
                .or(product.main_attribute_id.as_deref());
            let (variants, main) = self
                .validate_variants(&variant_inputs, supplied_main)
                .await?;
            product.main_attribute_id = Some(main);
            product.variants = variants;
        } else if let Some(main) = data.main_attribute_id {
            if product.variants.is_empty() {
                return Err(CatalogError::InvalidField {
                    field: "main_attribute_id",
                }
                .into());
            }
            let main = main_attribute::resolve(&product.variants, Some(main.as_str()))?;
            product.main_attribute_id = Some(main);
        }

        aggregate::apply_stock_totals(&mut product)?;
        product.updated_at = Some(Utc::now());

        let saved = self.products.save(key, product).await.map_err(|e| {
            match AppError::from(e) {
                AppError::Conflict(_) => {
                    AppError::conflict("A product with this slug already exists")
                }
                other => other,
            }
        })?;

        tracing::info!(product = %key, "Product updated");
        self.project_one(saved).await
    }

    /// Batch delete. Malformed ids are dropped up front instead of
    /// failing the whole batch; the rest go down in one statement.
    pub async fn delete(&self, ids: &[String]) -> AppResult<DeleteOutcome> {
        let well_formed: Vec<String> = ids
            .iter()
            .map(|id| strip_table_prefix(PRODUCT_TABLE, id).to_string())
            .filter(|id| oid::is_valid(id))
            .collect();

        let dropped = ids.len() - well_formed.len();
        if dropped > 0 {
            tracing::warn!(dropped, "Ignoring malformed product ids in batch delete");
        }

        let deleted = if well_formed.is_empty() {
            0
        } else {
            self.products.delete_many(&well_formed).await?
        };

        tracing::info!(requested = ids.len(), deleted, "Batch delete finished");
        Ok(DeleteOutcome {
            requested: ids.len(),
            deleted,
        })
    }

    /// Shared write-side pipeline for candidate variants: shape
    /// checks, one batched catalog fetch, reference checks, then
    /// main-attribute resolution.
    async fn validate_variants(
        &self,
        inputs: &[VariantInput],
        supplied_main: Option<&str>,
    ) -> AppResult<(Vec<Variant>, String)> {
        let variants = validator::normalize(inputs, oid::generate)?;
        let ids = validator::distinct_attribute_ids(&variants);
        let attributes = self.catalog.find_by_ids(&ids).await?;
        validator::check_catalog_refs(&variants, &attributes)?;
        let main = main_attribute::resolve(&variants, supplied_main)?;
        Ok((variants, main))
    }

    async fn project_one(&self, product: Product) -> AppResult<ProductView> {
        let ids = projection::referenced_attribute_ids(std::slice::from_ref(&product));
        let attributes = self.catalog.find_by_ids(&ids).await?;
        Ok(projection::project(&product, &attributes, Utc::now()))
    }
}

fn parse_category(raw: Option<&str>) -> AppResult<Option<surrealdb::sql::Thing>> {
    match raw {
        None => Ok(None),
        Some(id) => {
            let key = strip_table_prefix(CATEGORY_TABLE, id);
            if !oid::is_valid(key) {
                return Err(CatalogError::InvalidField { field: "category" }.into());
            }
            Ok(Some(make_thing(CATEGORY_TABLE, key)))
        }
    }
}

/// Validate an id-shaped path parameter before it reaches the store.
fn valid_key(id: &str) -> AppResult<&str> {
    let key = strip_table_prefix(PRODUCT_TABLE, id);
    if !oid::is_valid(key) {
        return Err(AppError::validation(format!("Malformed product id: {id}")));
    }
    Ok(key)
}

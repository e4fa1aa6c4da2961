//! End-to-end product flow against an embedded store.
//!
//! Covers the write pipeline (validation, main-attribute resolution,
//! aggregates, slug uniqueness) and the read projection, including
//! dangling-reference placeholders.

use catalog_server::catalog::ProductService;
use catalog_server::catalog::filter::ProductQuery;
use catalog_server::db::models::{
    Attribute, AttributeKind, AttributeValue, ProductCreate, ProductUpdate, ValueRef,
    VariantInput, VariantPairInput,
};
use catalog_server::db::repository::{AttributeRepository, ProductRepository};
use catalog_server::db::{DbService, oid};
use catalog_server::utils::AppError;
use chrono::{Duration, Utc};
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

async fn open_store() -> (tempfile::TempDir, Surreal<Db>) {
    let tmp = tempfile::tempdir().unwrap();
    let service = DbService::new(tmp.path().to_str().unwrap()).await.unwrap();
    (tmp, service.db)
}

fn product_service(db: &Surreal<Db>) -> ProductService<AttributeRepository> {
    ProductService::new(
        ProductRepository::new(db.clone()),
        AttributeRepository::new(db.clone()),
    )
}

/// Insert an attribute under a fresh id; values are (id, label) pairs.
async fn seed_attribute(db: &Surreal<Db>, name: &str, code: &str, values: &[(&str, &str)]) -> String {
    let id = oid::generate();
    let attribute = Attribute {
        id: None,
        name: name.to_string(),
        code: code.to_string(),
        kind: AttributeKind::Select,
        values: values
            .iter()
            .map(|(value_id, label)| AttributeValue {
                id: value_id.to_string(),
                label: label.to_string(),
                value: None,
                meta: None,
            })
            .collect(),
        is_active: true,
    };
    let created: Option<Attribute> = db
        .create(("attribute", id.as_str()))
        .content(attribute)
        .await
        .unwrap();
    assert!(created.is_some());
    id
}

fn simple_create(title: &str, price: f64, stock: i64) -> ProductCreate {
    ProductCreate {
        title: title.to_string(),
        slug: None,
        description: None,
        brand: None,
        category: None,
        main_attribute_id: None,
        image_url: None,
        price: Some(price),
        sale_price: None,
        offer_start: None,
        offer_end: None,
        currency: None,
        stock: Some(stock),
        variants: vec![],
        is_active: None,
    }
}

fn variant(price: f64, stock: i64, pairs: Vec<VariantPairInput>) -> VariantInput {
    VariantInput {
        sku: None,
        price,
        sale_price: None,
        stock,
        image_url: None,
        barcode: None,
        values: pairs,
    }
}

fn pair(attribute_id: &str, value_id: &str, stock: i64) -> VariantPairInput {
    VariantPairInput {
        attribute_id: attribute_id.to_string(),
        attributes_value_id: ValueRef::Single(value_id.to_string()),
        stock,
        image_url: None,
    }
}

const VAL_RED: &str = "cccccccccccccccccccccc01";
const VAL_BLUE: &str = "cccccccccccccccccccccc02";
const VAL_S: &str = "cccccccccccccccccccccc03";
const VAL_M: &str = "cccccccccccccccccccccc04";

#[tokio::test]
async fn simple_product_mirrors_stock_and_normalizes_slug() {
    let (_tmp, db) = open_store().await;
    let service = product_service(&db);

    let view = service
        .create(simple_create("Crew Socks!!", 20.0, 5))
        .await
        .unwrap();

    assert_eq!(view.slug, "crew-socks");
    assert_eq!(view.total_stock, 5);
    assert_eq!(view.stock, Some(5));
    assert_eq!(view.effective_price, Some(20.0));
    assert_eq!(view.discount_percent, Some(0));
    assert!(view.main_attribute_id.is_none());
}

#[tokio::test]
async fn variant_product_infers_main_attribute_and_sums_stock() {
    let (_tmp, db) = open_store().await;
    let color = seed_attribute(&db, "Color", "color", &[(VAL_RED, "Red"), (VAL_BLUE, "Blue")]).await;
    let service = product_service(&db);

    let mut create = simple_create("Beanie", 0.0, 0);
    create.price = None;
    create.stock = None;
    create.variants = vec![
        variant(12.0, 3, vec![pair(&color, VAL_RED, 3)]),
        variant(12.0, 4, vec![pair(&color, VAL_BLUE, 4)]),
    ];

    let view = service.create(create).await.unwrap();

    assert_eq!(view.main_attribute_id.as_deref(), Some(color.as_str()));
    assert_eq!(view.total_stock, 7);
    assert_eq!(view.price, None);
    assert_eq!(view.stock, None);
    assert_eq!(view.variants.len(), 2);

    let resolved = &view.variants[0].values[0];
    assert_eq!(resolved.attribute.name.as_deref(), Some("Color"));
    assert_eq!(resolved.values[0].label.as_deref(), Some("Red"));
}

#[tokio::test]
async fn two_attributes_require_an_explicit_main_attribute() {
    let (_tmp, db) = open_store().await;
    let color = seed_attribute(&db, "Color", "color", &[(VAL_RED, "Red"), (VAL_BLUE, "Blue")]).await;
    let size = seed_attribute(&db, "Size", "size", &[(VAL_S, "S"), (VAL_M, "M")]).await;
    let service = product_service(&db);

    let mut create = simple_create("Tee", 0.0, 0);
    create.price = None;
    create.stock = None;
    create.variants = vec![
        variant(15.0, 2, vec![pair(&color, VAL_RED, 2), pair(&size, VAL_S, 2)]),
        variant(15.0, 1, vec![pair(&color, VAL_BLUE, 1), pair(&size, VAL_M, 1)]),
    ];

    // No main attribute supplied: a validation failure, not a crash.
    let err = service.create(create.clone()).await.unwrap_err();
    assert!(matches!(err, AppError::Validation(_)), "got {err:?}");

    // Naming one of the used attributes succeeds.
    create.main_attribute_id = Some(size.clone());
    create.slug = Some("tee-2".to_string());
    let view = service.create(create).await.unwrap();
    assert_eq!(view.main_attribute_id.as_deref(), Some(size.as_str()));
}

#[tokio::test]
async fn duplicate_slug_is_a_conflict_not_a_validation_failure() {
    let (_tmp, db) = open_store().await;
    let service = product_service(&db);

    service
        .create(simple_create("Crew Socks", 10.0, 1))
        .await
        .unwrap();
    let err = service
        .create(simple_create("Crew Socks", 12.0, 2))
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::Conflict(_)), "got {err:?}");
}

#[tokio::test]
async fn unknown_attribute_and_value_references_are_rejected() {
    let (_tmp, db) = open_store().await;
    let color = seed_attribute(&db, "Color", "color", &[(VAL_RED, "Red")]).await;
    let service = product_service(&db);

    // Well-formed but absent attribute id.
    let ghost = oid::generate();
    let mut create = simple_create("Cap", 0.0, 0);
    create.price = None;
    create.stock = None;
    create.variants = vec![variant(9.0, 1, vec![pair(&ghost, VAL_RED, 1)])];
    let err = service.create(create).await.unwrap_err();
    match err {
        AppError::Validation(msg) => assert!(msg.contains(&ghost), "missing id in: {msg}"),
        other => panic!("expected validation failure, got {other:?}"),
    }

    // Known attribute, unknown value id.
    let mut create = simple_create("Cap", 0.0, 0);
    create.price = None;
    create.stock = None;
    create.variants = vec![variant(9.0, 1, vec![pair(&color, VAL_BLUE, 1)])];
    let err = service.create(create).await.unwrap_err();
    match err {
        AppError::Validation(msg) => assert!(msg.contains(VAL_BLUE), "missing value in: {msg}"),
        other => panic!("expected validation failure, got {other:?}"),
    }
}

#[tokio::test]
async fn update_replaces_variants_wholesale_and_recomputes_totals() {
    let (_tmp, db) = open_store().await;
    let color = seed_attribute(&db, "Color", "color", &[(VAL_RED, "Red"), (VAL_BLUE, "Blue")]).await;
    let service = product_service(&db);

    let mut create = simple_create("Scarf", 0.0, 0);
    create.price = None;
    create.stock = None;
    create.variants = vec![
        variant(18.0, 3, vec![pair(&color, VAL_RED, 3)]),
        variant(18.0, 4, vec![pair(&color, VAL_BLUE, 4)]),
    ];
    let view = service.create(create).await.unwrap();
    assert_eq!(view.total_stock, 7);

    let update = ProductUpdate {
        variants: Some(vec![variant(18.0, 10, vec![pair(&color, VAL_RED, 10)])]),
        ..Default::default()
    };
    let view = service.update(&view.id, update).await.unwrap();

    assert_eq!(view.variants.len(), 1);
    assert_eq!(view.total_stock, 10);
    assert_eq!(view.main_attribute_id.as_deref(), Some(color.as_str()));
}

#[tokio::test]
async fn sparse_update_applies_only_present_fields() {
    let (_tmp, db) = open_store().await;
    let service = product_service(&db);

    let mut create = simple_create("Wool Hat", 25.0, 2);
    create.brand = Some("Acme".to_string());
    let view = service.create(create).await.unwrap();
    assert_eq!(view.slug, "wool-hat");

    // Title change re-derives the slug; explicit null clears the brand;
    // everything untouched stays put.
    let update = ProductUpdate {
        title: Some("Wool Cap".to_string()),
        brand: Some(None),
        ..Default::default()
    };
    let view = service.update(&view.id, update).await.unwrap();

    assert_eq!(view.title, "Wool Cap");
    assert_eq!(view.slug, "wool-cap");
    assert_eq!(view.brand, None);
    assert_eq!(view.price, Some(25.0));
    assert_eq!(view.total_stock, 2);

    // An explicit slug wins over the derived one.
    let update = ProductUpdate {
        title: Some("Warm Cap".to_string()),
        slug: Some("Classic Cap!".to_string()),
        ..Default::default()
    };
    let view = service.update(&view.id, update).await.unwrap();
    assert_eq!(view.slug, "classic-cap");
}

#[tokio::test]
async fn update_missing_product_is_not_found() {
    let (_tmp, db) = open_store().await;
    let service = product_service(&db);

    let err = service
        .update(&oid::generate(), ProductUpdate::default())
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)), "got {err:?}");
}

#[tokio::test]
async fn batch_delete_skips_malformed_ids_and_counts_removals() {
    let (_tmp, db) = open_store().await;
    let service = product_service(&db);

    let existing = service
        .create(simple_create("Gloves", 8.0, 1))
        .await
        .unwrap();
    let absent = oid::generate();

    let outcome = service
        .delete(&[existing.id.clone(), "bad-id".to_string(), absent])
        .await
        .unwrap();

    assert_eq!(outcome.requested, 3);
    assert_eq!(outcome.deleted, 1);

    let err = service.get(&existing.id).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)), "got {err:?}");
}

#[tokio::test]
async fn reads_survive_dangling_attribute_references() {
    let (_tmp, db) = open_store().await;
    let color = seed_attribute(&db, "Color", "color", &[(VAL_RED, "Red")]).await;
    let service = product_service(&db);

    let mut create = simple_create("Belt", 0.0, 0);
    create.price = None;
    create.stock = None;
    create.variants = vec![variant(30.0, 2, vec![pair(&color, VAL_RED, 2)])];
    let view = service.create(create).await.unwrap();

    // The catalog moves on underneath the stored product.
    let _: Option<Attribute> = db.delete(("attribute", color.as_str())).await.unwrap();

    let view = service.get(&view.id).await.unwrap();
    let resolved = &view.variants[0].values[0];
    assert_eq!(resolved.attribute.id, color);
    assert!(resolved.attribute.name.is_none());
    assert!(resolved.values[0].label.is_none());
}

#[tokio::test]
async fn effective_price_honors_the_offer_window() {
    let (_tmp, db) = open_store().await;
    let service = product_service(&db);
    let now = Utc::now();

    let mut create = simple_create("Mug", 20.0, 3);
    create.sale_price = Some(15.0);
    create.offer_start = Some(now - Duration::days(1));
    create.offer_end = Some(now + Duration::days(1));
    let view = service.create(create).await.unwrap();

    assert_eq!(view.effective_price, Some(15.0));
    assert_eq!(view.discount_percent, Some(25));

    // Close the window: back to the base price.
    let update = ProductUpdate {
        offer_end: Some(Some(now - Duration::hours(1))),
        ..Default::default()
    };
    let view = service.update(&view.id, update).await.unwrap();
    assert_eq!(view.effective_price, Some(20.0));
    assert_eq!(view.discount_percent, Some(0));
}

#[tokio::test]
async fn list_price_filter_spans_simple_and_variant_pricing() {
    let (_tmp, db) = open_store().await;
    let color = seed_attribute(&db, "Color", "color", &[(VAL_RED, "Red")]).await;
    let service = product_service(&db);

    service
        .create(simple_create("Cheap Pin", 10.0, 1))
        .await
        .unwrap();
    service
        .create(simple_create("Fancy Lamp", 100.0, 1))
        .await
        .unwrap();
    let mut create = simple_create("Mid Jacket", 0.0, 0);
    create.price = None;
    create.stock = None;
    create.variants = vec![variant(50.0, 2, vec![pair(&color, VAL_RED, 2)])];
    service.create(create).await.unwrap();

    let query = ProductQuery {
        min_price: Some(40.0),
        max_price: Some(60.0),
        ..Default::default()
    };
    let page = service.list(&query).await.unwrap();

    assert_eq!(page.total, 1);
    assert_eq!(page.items.len(), 1);
    assert_eq!(page.items[0].title, "Mid Jacket");
}

#[tokio::test]
async fn malformed_id_is_rejected_before_any_lookup() {
    let (_tmp, db) = open_store().await;
    let service = product_service(&db);

    let err = service.get("not-a-valid-id").await.unwrap_err();
    assert!(matches!(err, AppError::Validation(_)), "got {err:?}");
}

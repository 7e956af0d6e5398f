//! Product submission flows: payload encodings, local validation, and
//! variant drafts riding along with the product.

mod common;

use assert_matches::assert_matches;
use common::TestApp;
use rust_decimal_macros::dec;
use sprout_admin::client::{ImageUpload, ProductPayload};
use sprout_admin::errors::ServiceError;
use sprout_admin::events::Event;
use sprout_admin::models::{NewProduct, ProductOption};

fn rice(variants: Vec<sprout_admin::models::VariantDraft>) -> NewProduct {
    NewProduct {
        name: "Organic Rice".to_string(),
        description: Some("Stone-milled short grain".to_string()),
        price: dec!(4.50),
        unit: Some("kg".to_string()),
        is_active: true,
        variants,
    }
}

#[tokio::test]
async fn json_submission_creates_the_product() {
    let mut app = TestApp::new().await;
    let catalog = app.ctx.catalog_service();

    let created = catalog
        .create_product(ProductPayload::Json(rice(Vec::new())))
        .await
        .expect("create succeeds");

    assert_eq!(created.name, "Organic Rice");
    assert_eq!(created.slug, "organic-rice");
    assert!(app.state.last_images.read().unwrap().is_empty());

    let event = app.events.recv().await.expect("event emitted");
    assert_matches!(event, Event::ProductCreated { product_id } if product_id == created.id);
}

#[tokio::test]
async fn multipart_submission_carries_the_images() {
    let app = TestApp::new().await;
    let catalog = app.ctx.catalog_service();

    let payload = ProductPayload::Multipart {
        product: rice(Vec::new()),
        images: vec![
            ImageUpload {
                file_name: "rice-front.png".to_string(),
                content_type: "image/png".to_string(),
                bytes: vec![0x89, 0x50, 0x4e, 0x47],
            },
            ImageUpload {
                file_name: "rice-back.jpg".to_string(),
                content_type: "image/jpeg".to_string(),
                bytes: vec![0xff, 0xd8],
            },
        ],
    };

    let created = catalog.create_product(payload).await.expect("create succeeds");
    assert_eq!(created.slug, "organic-rice");
    assert_eq!(
        *app.state.last_images.read().unwrap(),
        vec!["rice-front.png".to_string(), "rice-back.jpg".to_string()]
    );
}

#[tokio::test]
async fn invalid_products_are_rejected_before_any_request() {
    let app = TestApp::new().await;
    let catalog = app.ctx.catalog_service();

    let mut product = rice(Vec::new());
    product.name.clear();

    let err = catalog
        .create_product(ProductPayload::Json(product))
        .await
        .unwrap_err();
    assert_matches!(err, ServiceError::ValidationError(_));
    assert!(
        app.state.products.read().unwrap().is_empty(),
        "nothing must reach the backend"
    );
}

#[tokio::test]
async fn generated_variants_ride_along_with_the_submission() {
    let mut app = TestApp::new().await;
    let catalog = app.ctx.catalog_service();

    let options = vec![ProductOption {
        name: "Weight".to_string(),
        values: vec!["250g".to_string(), "1kg".to_string()],
    }];
    let drafts = catalog
        .generate_variants("Organic Rice", &options)
        .await
        .expect("generation succeeds");
    assert_eq!(drafts.len(), 2);

    let event = app.events.recv().await.expect("generation announced");
    assert_matches!(
        event,
        Event::VariantsGenerated { ref product_slug, count: 2 } if product_slug == "organic-rice"
    );

    catalog
        .create_product(ProductPayload::Json(rice(drafts)))
        .await
        .expect("create succeeds");

    let submitted = app.state.last_new_product.read().unwrap().clone().unwrap();
    let skus: Vec<&str> = submitted.variants.iter().map(|v| v.sku.as_str()).collect();
    assert_eq!(skus, vec!["organic-rice-250g", "organic-rice-1kg"]);
    assert!(submitted.variants.iter().all(|v| v.quantity == 0 && v.is_active));
}

#[tokio::test]
async fn empty_option_axes_generate_nothing_and_announce_nothing() {
    let mut app = TestApp::new().await;
    let catalog = app.ctx.catalog_service();

    let options = vec![ProductOption {
        name: "Weight".to_string(),
        values: Vec::new(),
    }];
    let drafts = catalog
        .generate_variants("Organic Rice", &options)
        .await
        .unwrap();
    assert!(drafts.is_empty());
    assert_matches!(
        app.events.try_recv(),
        Err(tokio::sync::mpsc::error::TryRecvError::Empty)
    );
}

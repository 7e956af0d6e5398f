//! Test harness: an in-memory mock of the commerce backend plus a wired
//! [`AdminContext`] pointed at it.
#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use axum::extract::{FromRequest, Multipart, Path, Query, Request, State};
use axum::http::header::CONTENT_TYPE;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use chrono::Utc;
use rust_decimal_macros::dec;
use serde::Deserialize;
use serde_json::Value;
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use uuid::Uuid;

use sprout_admin::config::{AppConfig, BackendConfig, CacheConfig};
use sprout_admin::events::{Event, EventSender};
use sprout_admin::models::{
    CheckoutDetails, NewProduct, Order, OrderLine, OrderStatus, OrderTotals, PaymentInfo, Product,
    ShipmentStatus,
};
use sprout_admin::services::slugify;
use sprout_admin::{AdminContext, Page};

#[derive(Clone, Default)]
pub struct BackendState {
    pub orders: Arc<RwLock<HashMap<Uuid, Order>>>,
    pub products: Arc<RwLock<HashMap<Uuid, Product>>>,
    /// File names received with the last multipart product submission.
    pub last_images: Arc<RwLock<Vec<String>>>,
    /// The last product submission body, for asserting what went on the wire.
    pub last_new_product: Arc<RwLock<Option<NewProduct>>>,
}

pub struct TestApp {
    pub state: BackendState,
    pub ctx: AdminContext,
    pub events: mpsc::Receiver<Event>,
}

impl TestApp {
    pub async fn new() -> Self {
        let state = BackendState::default();
        let router = backend_router(state.clone());
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind mock backend");
        let addr = listener.local_addr().expect("mock backend addr");
        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("mock backend serve");
        });

        let config = AppConfig {
            backend: BackendConfig {
                base_url: format!("http://{addr}"),
                timeout_secs: 5,
            },
            cache: CacheConfig::default(),
            log_level: "info".to_string(),
            environment: "test".to_string(),
        };
        let (event_tx, event_rx) = mpsc::channel(64);
        let ctx = AdminContext::new(config, EventSender::new(event_tx)).expect("admin context");

        Self {
            state,
            ctx,
            events: event_rx,
        }
    }

    /// Inserts an order directly into the mock backend.
    pub fn seed_order(&self, status: OrderStatus, shipment: ShipmentStatus) -> Order {
        let order = sample_order(status, shipment);
        self.state
            .orders
            .write()
            .unwrap()
            .insert(order.id, order.clone());
        order
    }

    /// Reads an order's state straight from the mock store, bypassing the
    /// client and cache.
    pub fn backend_order(&self, id: Uuid) -> Option<Order> {
        self.state.orders.read().unwrap().get(&id).cloned()
    }

    /// Mutates an order behind the client's back, as another admin session
    /// would.
    pub fn tamper_order<F: FnOnce(&mut Order)>(&self, id: Uuid, f: F) {
        let mut orders = self.state.orders.write().unwrap();
        f(orders.get_mut(&id).expect("order to tamper with"));
    }
}

pub fn sample_order(status: OrderStatus, shipment: ShipmentStatus) -> Order {
    let now = Utc::now();
    Order {
        id: Uuid::new_v4(),
        status,
        shipment_status: shipment,
        lines: vec![OrderLine {
            product_id: Uuid::new_v4(),
            variant_id: Some(Uuid::new_v4()),
            name: "Organic Rice 1kg".to_string(),
            qty: 2,
            price: dec!(4.50),
        }],
        totals: OrderTotals {
            subtotal: dec!(9.00),
            shipping: dec!(2.00),
            tax: dec!(0.99),
            grand_total: dec!(11.99),
        },
        checkout: CheckoutDetails {
            customer_name: "Maya Green".to_string(),
            email: "maya@example.com".to_string(),
            phone: None,
            address: "12 Orchard Lane".to_string(),
            city: "Leafton".to_string(),
            postal_code: "0420".to_string(),
            note: None,
        },
        payment: PaymentInfo {
            method: "card".to_string(),
            reference: Some("pay_123".to_string()),
            paid: true,
        },
        created_at: now,
        updated_at: now,
    }
}

#[derive(Deserialize)]
struct ListParams {
    #[serde(default = "default_page")]
    page: u64,
    #[serde(default = "default_limit")]
    limit: u64,
}

fn default_page() -> u64 {
    1
}
fn default_limit() -> u64 {
    20
}

fn backend_router(state: BackendState) -> Router {
    Router::new()
        .route("/orders", get(list_orders))
        .route(
            "/orders/:id",
            get(get_order).patch(patch_order).delete(delete_order),
        )
        .route("/products", get(list_products).post(create_product))
        .with_state(state)
}

async fn list_orders(
    State(state): State<BackendState>,
    Query(params): Query<ListParams>,
) -> Json<Page<Order>> {
    let mut items: Vec<Order> = state.orders.read().unwrap().values().cloned().collect();
    items.sort_by_key(|order| order.created_at);
    let total = items.len() as u64;
    Json(Page {
        items,
        total,
        page: params.page,
        limit: params.limit,
    })
}

async fn get_order(
    State(state): State<BackendState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Order>, StatusCode> {
    state
        .orders
        .read()
        .unwrap()
        .get(&id)
        .cloned()
        .map(Json)
        .ok_or(StatusCode::NOT_FOUND)
}

async fn patch_order(
    State(state): State<BackendState>,
    Path(id): Path<Uuid>,
    Json(body): Json<Value>,
) -> Result<Json<Order>, StatusCode> {
    let mut orders = state.orders.write().unwrap();
    let order = orders.get_mut(&id).ok_or(StatusCode::NOT_FOUND)?;
    if let Some(status) = body.get("status") {
        order.status =
            serde_json::from_value(status.clone()).map_err(|_| StatusCode::BAD_REQUEST)?;
    }
    if let Some(stage) = body.get("shipment_status") {
        order.shipment_status =
            serde_json::from_value(stage.clone()).map_err(|_| StatusCode::BAD_REQUEST)?;
    }
    order.updated_at = Utc::now();
    Ok(Json(order.clone()))
}

async fn delete_order(
    State(state): State<BackendState>,
    Path(id): Path<Uuid>,
) -> StatusCode {
    match state.orders.write().unwrap().remove(&id) {
        Some(_) => StatusCode::NO_CONTENT,
        None => StatusCode::NOT_FOUND,
    }
}

async fn list_products(State(state): State<BackendState>) -> Json<Page<Product>> {
    let mut items: Vec<Product> = state.products.read().unwrap().values().cloned().collect();
    items.sort_by_key(|product| product.created_at);
    let total = items.len() as u64;
    Json(Page {
        items,
        total,
        page: 1,
        limit: 20,
    })
}

async fn create_product(
    State(state): State<BackendState>,
    request: Request,
) -> Result<(StatusCode, Json<Product>), StatusCode> {
    let content_type = request
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string();

    let new_product = if content_type.starts_with("multipart/form-data") {
        let mut multipart = Multipart::from_request(request, &())
            .await
            .map_err(|_| StatusCode::BAD_REQUEST)?;
        let mut product: Option<NewProduct> = None;
        let mut images = Vec::new();
        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|_| StatusCode::BAD_REQUEST)?
        {
            match field.name() {
                Some("product") => {
                    let bytes = field.bytes().await.map_err(|_| StatusCode::BAD_REQUEST)?;
                    product = Some(
                        serde_json::from_slice(&bytes).map_err(|_| StatusCode::BAD_REQUEST)?,
                    );
                }
                Some("images") => {
                    let name = field.file_name().unwrap_or("unnamed").to_string();
                    let _ = field.bytes().await.map_err(|_| StatusCode::BAD_REQUEST)?;
                    images.push(name);
                }
                _ => return Err(StatusCode::BAD_REQUEST),
            }
        }
        *state.last_images.write().unwrap() = images;
        product.ok_or(StatusCode::BAD_REQUEST)?
    } else {
        let bytes = axum::body::to_bytes(request.into_body(), usize::MAX)
            .await
            .map_err(|_| StatusCode::BAD_REQUEST)?;
        *state.last_images.write().unwrap() = Vec::new();
        serde_json::from_slice(&bytes).map_err(|_| StatusCode::BAD_REQUEST)?
    };

    *state.last_new_product.write().unwrap() = Some(new_product.clone());

    let now = Utc::now();
    let product = Product {
        id: Uuid::new_v4(),
        name: new_product.name.clone(),
        slug: slugify(&new_product.name),
        description: new_product.description.clone(),
        price: new_product.price,
        unit: new_product.unit.clone(),
        is_active: new_product.is_active,
        created_at: now,
        updated_at: now,
    };
    state
        .products
        .write()
        .unwrap()
        .insert(product.id, product.clone());
    Ok((StatusCode::CREATED, Json(product)))
}

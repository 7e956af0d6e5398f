use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};
use uuid::Uuid;

/// Commercial status of an order.
///
/// Set to `Pending` by the backend at creation. The exposed transitions are
/// one-directional: an order is confirmed or cancelled, never moved back to
/// pending, and nothing leads out of `Cancelled`. See
/// [`crate::services::order_policy`] for the transition table.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum OrderStatus {
    Pending,
    Confirmed,
    Cancelled,
}

/// Physical fulfillment label of an order.
///
/// An independent axis from [`OrderStatus`]: any stage may be set at any
/// time, in any order. This is a label, not a progression.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum ShipmentStatus {
    Placed,
    Pending,
    Processing,
    Delivered,
}

/// One purchased line of an order.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OrderLine {
    pub product_id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variant_id: Option<Uuid>,
    pub name: String,
    pub qty: i32,
    pub price: Decimal,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OrderTotals {
    pub subtotal: Decimal,
    pub shipping: Decimal,
    pub tax: Decimal,
    pub grand_total: Decimal,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CheckoutDetails {
    pub customer_name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub address: String,
    pub city: String,
    pub postal_code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PaymentInfo {
    pub method: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    pub paid: bool,
}

/// An order as returned by the commerce backend.
///
/// Created server-side; this crate only reads and mutates it through the
/// exposed lifecycle actions.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: Uuid,
    pub status: OrderStatus,
    pub shipment_status: ShipmentStatus,
    pub lines: Vec<OrderLine>,
    pub totals: OrderTotals,
    pub checkout: CheckoutDetails,
    pub payment: PaymentInfo,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

//! Domain types shared across services, commands, and the backend client.

pub mod order;
pub mod product;
pub mod variant;

pub use order::{
    CheckoutDetails, Order, OrderLine, OrderStatus, OrderTotals, PaymentInfo, ShipmentStatus,
};
pub use product::{NewProduct, Product, ProductOption};
pub use variant::{VariantAttribute, VariantDraft, WeightUnit};

use serde::{Deserialize, Serialize};

/// Outcome of asking the operator to confirm a destructive action.
///
/// Cancelling or deleting an order and regenerating a variant worksheet all
/// discard state that cannot be recovered, so callers collect an explicit
/// acknowledgement before dispatching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Acknowledgement {
    Accepted,
    Dismissed,
}

impl Acknowledgement {
    pub fn is_accepted(self) -> bool {
        matches!(self, Acknowledgement::Accepted)
    }
}

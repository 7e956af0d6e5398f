//! Request payload shapes owned by this side of the wire.

use serde::Serialize;

use crate::models::{NewProduct, OrderStatus, ShipmentStatus};

/// Partial update for an order. Exactly one field goes on the wire; the
/// caller picks the variant, so a status patch can never carry a stray
/// shipment field or vice versa.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum OrderPatch {
    Status { status: OrderStatus },
    Shipment { shipment_status: ShipmentStatus },
}

/// Body of an uploaded product image.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// Product creation payload. The caller chooses the encoding on a typed
/// field: plain JSON, or multipart when images ride along.
#[derive(Debug, Clone)]
pub enum ProductPayload {
    Json(NewProduct),
    Multipart {
        product: NewProduct,
        images: Vec<ImageUpload>,
    },
}

impl ProductPayload {
    pub fn product(&self) -> &NewProduct {
        match self {
            ProductPayload::Json(product) => product,
            ProductPayload::Multipart { product, .. } => product,
        }
    }
}

//! Domain events emitted by order actions and catalog operations.
//!
//! Events are fire-and-forget notifications over an mpsc channel; the
//! bundled processor logs them. Consumers that need more (audit trails,
//! webhooks) can replace the processor without touching the emitters.

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::info;
use uuid::Uuid;

use crate::models::ShipmentStatus;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Event {
    OrderConfirmed {
        order_id: Uuid,
    },
    OrderCancelled {
        order_id: Uuid,
    },
    OrderDeleted {
        order_id: Uuid,
    },
    ShipmentStatusChanged {
        order_id: Uuid,
        old: ShipmentStatus,
        new: ShipmentStatus,
    },
    ProductCreated {
        product_id: Uuid,
    },
    VariantsGenerated {
        product_slug: String,
        count: usize,
    },
}

#[derive(Debug, Clone)]
pub struct EventSender {
    sender: mpsc::Sender<Event>,
}

impl EventSender {
    pub fn new(sender: mpsc::Sender<Event>) -> Self {
        Self { sender }
    }

    /// Sends an event asynchronously.
    pub async fn send(&self, event: Event) -> Result<(), String> {
        self.sender
            .send(event)
            .await
            .map_err(|e| format!("Failed to send event: {}", e))
    }
}

/// Drains the event channel, logging each event. Spawn once at startup.
pub async fn process_events(mut receiver: mpsc::Receiver<Event>) {
    while let Some(event) = receiver.recv().await {
        match &event {
            Event::OrderConfirmed { order_id } => info!(%order_id, "order confirmed"),
            Event::OrderCancelled { order_id } => info!(%order_id, "order cancelled"),
            Event::OrderDeleted { order_id } => info!(%order_id, "order deleted"),
            Event::ShipmentStatusChanged { order_id, old, new } => {
                info!(%order_id, %old, %new, "shipment status changed")
            }
            Event::ProductCreated { product_id } => info!(%product_id, "product created"),
            Event::VariantsGenerated {
                product_slug,
                count,
            } => info!(%product_slug, count, "variants generated"),
        }
    }
}

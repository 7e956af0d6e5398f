use crate::{
    client::{ApiClient, OrderPatch},
    commands::Command,
    errors::ServiceError,
    events::{Event, EventSender},
    models::{OrderStatus, ShipmentStatus},
};
use lazy_static::lazy_static;
use prometheus::IntCounter;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info, instrument, warn};
use uuid::Uuid;
use validator::Validate;

lazy_static! {
    static ref SHIPMENT_STATUS_UPDATES: IntCounter = IntCounter::new(
        "shipment_status_updates_total",
        "Total number of shipment status updates"
    )
    .expect("metric can be created");
    static ref SHIPMENT_STATUS_FAILURES: IntCounter = IntCounter::new(
        "shipment_status_failures_total",
        "Total number of failed shipment status updates"
    )
    .expect("metric can be created");
}

/// Relabels an order's shipment stage. The stage is a free label: any
/// value may be set from any order status, in any sequence.
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct SetShipmentStatusCommand {
    pub order_id: Uuid,
    pub stage: ShipmentStatus,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SetShipmentStatusResult {
    pub id: Uuid,
    pub old_stage: ShipmentStatus,
    pub new_stage: ShipmentStatus,
}

#[async_trait::async_trait]
impl Command for SetShipmentStatusCommand {
    type Result = SetShipmentStatusResult;

    #[instrument(skip(self, api, event_sender), fields(order_id = %self.order_id, stage = %self.stage))]
    async fn execute(
        &self,
        api: Arc<ApiClient>,
        event_sender: Arc<EventSender>,
    ) -> Result<Self::Result, ServiceError> {
        let order = api.get_order(self.order_id).await.map_err(|e| {
            SHIPMENT_STATUS_FAILURES.inc();
            e
        })?;

        if self.stage == ShipmentStatus::Delivered && order.status == OrderStatus::Pending {
            warn!(
                order_id = %self.order_id,
                "marking a pending order as delivered"
            );
        }

        let old_stage = order.shipment_status;

        let updated = api
            .patch_order(
                self.order_id,
                OrderPatch::Shipment {
                    shipment_status: self.stage,
                },
            )
            .await
            .map_err(|e| {
                SHIPMENT_STATUS_FAILURES.inc();
                error!(order_id = %self.order_id, "failed to update shipment status: {}", e);
                e
            })?;

        info!(
            order_id = %self.order_id,
            old = %old_stage,
            new = %updated.shipment_status,
            "Shipment status updated"
        );

        event_sender
            .send(Event::ShipmentStatusChanged {
                order_id: self.order_id,
                old: old_stage,
                new: updated.shipment_status,
            })
            .await
            .map_err(|e| {
                SHIPMENT_STATUS_FAILURES.inc();
                ServiceError::EventError(e)
            })?;

        SHIPMENT_STATUS_UPDATES.inc();

        Ok(SetShipmentStatusResult {
            id: updated.id,
            old_stage,
            new_stage: updated.shipment_status,
        })
    }
}

use crate::{
    client::{ApiClient, OrderPatch},
    commands::Command,
    errors::ServiceError,
    events::{Event, EventSender},
    models::OrderStatus,
    services::order_policy::{transition, OrderAction},
};
use chrono::{DateTime, Utc};
use lazy_static::lazy_static;
use prometheus::IntCounter;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info, instrument};
use uuid::Uuid;
use validator::Validate;

lazy_static! {
    static ref ORDERS_CONFIRMED: IntCounter =
        IntCounter::new("orders_confirmed_total", "Total number of orders confirmed")
            .expect("metric can be created");
    static ref ORDER_CONFIRM_FAILURES: IntCounter = IntCounter::new(
        "order_confirm_failures_total",
        "Total number of failed order confirmations"
    )
    .expect("metric can be created");
}

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct ConfirmOrderCommand {
    pub order_id: Uuid,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ConfirmOrderResult {
    pub id: Uuid,
    pub status: OrderStatus,
    pub confirmed_at: DateTime<Utc>,
}

#[async_trait::async_trait]
impl Command for ConfirmOrderCommand {
    type Result = ConfirmOrderResult;

    #[instrument(skip(self, api, event_sender), fields(order_id = %self.order_id))]
    async fn execute(
        &self,
        api: Arc<ApiClient>,
        event_sender: Arc<EventSender>,
    ) -> Result<Self::Result, ServiceError> {
        // Always gate on a fresh fetch; a cached status may be stale.
        let order = api.get_order(self.order_id).await.map_err(|e| {
            ORDER_CONFIRM_FAILURES.inc();
            e
        })?;

        let next = transition(order.status, OrderAction::Confirm).map_err(|e| {
            ORDER_CONFIRM_FAILURES.inc();
            error!(order_id = %self.order_id, status = %order.status, "confirm rejected");
            ServiceError::from(e)
        })?;

        let updated = api
            .patch_order(self.order_id, OrderPatch::Status { status: next })
            .await
            .map_err(|e| {
                ORDER_CONFIRM_FAILURES.inc();
                error!(order_id = %self.order_id, "failed to confirm order: {}", e);
                e
            })?;

        info!(order_id = %self.order_id, "Order confirmed successfully");

        event_sender
            .send(Event::OrderConfirmed {
                order_id: self.order_id,
            })
            .await
            .map_err(|e| {
                ORDER_CONFIRM_FAILURES.inc();
                ServiceError::EventError(e)
            })?;

        ORDERS_CONFIRMED.inc();

        Ok(ConfirmOrderResult {
            id: updated.id,
            status: updated.status,
            confirmed_at: updated.updated_at,
        })
    }
}

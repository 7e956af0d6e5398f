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
    static ref ORDERS_CANCELLED: IntCounter =
        IntCounter::new("orders_cancelled_total", "Total number of orders cancelled")
            .expect("metric can be created");
    static ref ORDER_CANCEL_FAILURES: IntCounter = IntCounter::new(
        "order_cancel_failures_total",
        "Total number of failed order cancellations"
    )
    .expect("metric can be created");
}

/// Cancels a pending or confirmed order. Cancellation is terminal; the
/// caller is responsible for collecting the operator's acknowledgement
/// before dispatching this command.
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct CancelOrderCommand {
    pub order_id: Uuid,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CancelOrderResult {
    pub id: Uuid,
    pub status: OrderStatus,
    pub cancelled_at: DateTime<Utc>,
}

#[async_trait::async_trait]
impl Command for CancelOrderCommand {
    type Result = CancelOrderResult;

    #[instrument(skip(self, api, event_sender), fields(order_id = %self.order_id))]
    async fn execute(
        &self,
        api: Arc<ApiClient>,
        event_sender: Arc<EventSender>,
    ) -> Result<Self::Result, ServiceError> {
        let order = api.get_order(self.order_id).await.map_err(|e| {
            ORDER_CANCEL_FAILURES.inc();
            e
        })?;

        let next = transition(order.status, OrderAction::Cancel).map_err(|e| {
            ORDER_CANCEL_FAILURES.inc();
            error!(order_id = %self.order_id, status = %order.status, "cancel rejected");
            ServiceError::from(e)
        })?;

        let updated = api
            .patch_order(self.order_id, OrderPatch::Status { status: next })
            .await
            .map_err(|e| {
                ORDER_CANCEL_FAILURES.inc();
                error!(order_id = %self.order_id, "failed to cancel order: {}", e);
                e
            })?;

        info!(order_id = %self.order_id, "Order cancelled successfully");

        event_sender
            .send(Event::OrderCancelled {
                order_id: self.order_id,
            })
            .await
            .map_err(|e| {
                ORDER_CANCEL_FAILURES.inc();
                ServiceError::EventError(e)
            })?;

        ORDERS_CANCELLED.inc();

        Ok(CancelOrderResult {
            id: updated.id,
            status: updated.status,
            cancelled_at: updated.updated_at,
        })
    }
}

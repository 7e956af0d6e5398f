use crate::{
    client::ApiClient,
    commands::Command,
    errors::ServiceError,
    events::{Event, EventSender},
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
    static ref ORDERS_DELETED: IntCounter =
        IntCounter::new("orders_deleted_total", "Total number of orders deleted")
            .expect("metric can be created");
    static ref ORDER_DELETE_FAILURES: IntCounter = IntCounter::new(
        "order_delete_failures_total",
        "Total number of failed order deletions"
    )
    .expect("metric can be created");
}

/// Removes an order entirely. Permitted from any status and irreversible;
/// the caller is responsible for collecting the operator's acknowledgement
/// before dispatching, and must leave any detail view of the order after
/// success.
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct DeleteOrderCommand {
    pub order_id: Uuid,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DeleteOrderResult {
    pub id: Uuid,
    pub deleted_at: DateTime<Utc>,
}

#[async_trait::async_trait]
impl Command for DeleteOrderCommand {
    type Result = DeleteOrderResult;

    #[instrument(skip(self, api, event_sender), fields(order_id = %self.order_id))]
    async fn execute(
        &self,
        api: Arc<ApiClient>,
        event_sender: Arc<EventSender>,
    ) -> Result<Self::Result, ServiceError> {
        api.delete_order(self.order_id).await.map_err(|e| {
            ORDER_DELETE_FAILURES.inc();
            error!(order_id = %self.order_id, "failed to delete order: {}", e);
            e
        })?;

        info!(order_id = %self.order_id, "Order deleted");

        event_sender
            .send(Event::OrderDeleted {
                order_id: self.order_id,
            })
            .await
            .map_err(|e| {
                ORDER_DELETE_FAILURES.inc();
                ServiceError::EventError(e)
            })?;

        ORDERS_DELETED.inc();

        Ok(DeleteOrderResult {
            id: self.order_id,
            deleted_at: Utc::now(),
        })
    }
}

//! Order lifecycle actions: cached reads, gating, and mutation dispatch.

use std::sync::Arc;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use strum::Display;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::cache::{CacheLookup, QueryCache, QueryKey};
use crate::client::ApiClient;
use crate::commands::orders::{
    CancelOrderCommand, CancelOrderResult, ConfirmOrderCommand, ConfirmOrderResult,
    DeleteOrderCommand, DeleteOrderResult, SetShipmentStatusCommand, SetShipmentStatusResult,
};
use crate::commands::Command;
use crate::errors::ServiceError;
use crate::events::EventSender;
use crate::models::{Acknowledgement, Order, ShipmentStatus};
use crate::services::order_policy::{available_actions, OrderAction};
use crate::{ListQuery, Page};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
enum OrderActionKind {
    Confirm,
    Cancel,
    Shipment,
    Delete,
}

/// Outcome of an action gated on operator acknowledgement.
#[derive(Debug)]
pub enum ActionOutcome<T> {
    Completed(T),
    /// The operator dismissed the confirmation; nothing was dispatched.
    Aborted,
}

impl<T> ActionOutcome<T> {
    pub fn completed(self) -> Option<T> {
        match self {
            ActionOutcome::Completed(value) => Some(value),
            ActionOutcome::Aborted => None,
        }
    }
}

/// Service for reading orders and driving their lifecycle.
///
/// Reads go through the query cache; every successful mutation invalidates
/// the order's detail entry and the orders collection. A per-order
/// in-flight map rejects a second action while one is still being
/// dispatched, so a double-click cannot double-send.
#[derive(Clone)]
pub struct OrderActionService {
    api: Arc<ApiClient>,
    cache: Arc<QueryCache>,
    event_sender: Arc<EventSender>,
    in_flight: Arc<DashMap<Uuid, OrderActionKind>>,
}

impl OrderActionService {
    pub fn new(api: Arc<ApiClient>, cache: Arc<QueryCache>, event_sender: Arc<EventSender>) -> Self {
        Self {
            api,
            cache,
            event_sender,
            in_flight: Arc::new(DashMap::new()),
        }
    }

    /// Fetches one order, serving from cache when possible.
    #[instrument(skip(self), fields(order_id = %order_id))]
    pub async fn get_order(&self, order_id: Uuid) -> Result<Order, ServiceError> {
        let key = QueryKey::Order(order_id);
        if let CacheLookup::Hit(order) = self.cache.get::<Order>(&key).await {
            return Ok(order);
        }
        let order = self.api.get_order(order_id).await?;
        self.cache.put(&key, &order).await;
        Ok(order)
    }

    /// Lists orders. Only the default listing is cached; other pages
    /// always hit the backend.
    #[instrument(skip(self))]
    pub async fn list_orders(&self, query: ListQuery) -> Result<Page<Order>, ServiceError> {
        let cacheable = query == ListQuery::default();
        if cacheable {
            if let CacheLookup::Hit(page) = self.cache.get::<Page<Order>>(&QueryKey::Orders).await {
                return Ok(page);
            }
        }
        let page = self.api.list_orders(&query).await?;
        if cacheable {
            self.cache.put(&QueryKey::Orders, &page).await;
        }
        Ok(page)
    }

    /// Actions currently presentable for this order, from its cached or
    /// fetched status.
    pub async fn available_actions(
        &self,
        order_id: Uuid,
    ) -> Result<&'static [OrderAction], ServiceError> {
        let order = self.get_order(order_id).await?;
        Ok(available_actions(order.status))
    }

    /// Confirms a pending order.
    #[instrument(skip(self), fields(order_id = %order_id))]
    pub async fn confirm(&self, order_id: Uuid) -> Result<ConfirmOrderResult, ServiceError> {
        let _guard = self.begin(order_id, OrderActionKind::Confirm)?;
        let result = ConfirmOrderCommand { order_id }
            .execute(self.api.clone(), self.event_sender.clone())
            .await?;
        self.cache.invalidate_order(order_id).await;
        Ok(result)
    }

    /// Cancels an order that is not already cancelled. Requires the
    /// operator's acknowledgement; dismissed means nothing is dispatched.
    #[instrument(skip(self), fields(order_id = %order_id))]
    pub async fn cancel(
        &self,
        order_id: Uuid,
        ack: Acknowledgement,
    ) -> Result<ActionOutcome<CancelOrderResult>, ServiceError> {
        if !ack.is_accepted() {
            info!(%order_id, "cancellation dismissed by operator");
            return Ok(ActionOutcome::Aborted);
        }
        let _guard = self.begin(order_id, OrderActionKind::Cancel)?;
        let result = CancelOrderCommand { order_id }
            .execute(self.api.clone(), self.event_sender.clone())
            .await?;
        self.cache.invalidate_order(order_id).await;
        Ok(ActionOutcome::Completed(result))
    }

    /// Sets the shipment stage. No precondition on order status.
    #[instrument(skip(self), fields(order_id = %order_id, stage = %stage))]
    pub async fn set_shipment(
        &self,
        order_id: Uuid,
        stage: ShipmentStatus,
    ) -> Result<SetShipmentStatusResult, ServiceError> {
        let _guard = self.begin(order_id, OrderActionKind::Shipment)?;
        let result = SetShipmentStatusCommand { order_id, stage }
            .execute(self.api.clone(), self.event_sender.clone())
            .await?;
        self.cache.invalidate_order(order_id).await;
        Ok(result)
    }

    /// Deletes an order permanently, from any status. Requires the
    /// operator's acknowledgement. After completion the order no longer
    /// exists; a caller showing its detail view must navigate away.
    #[instrument(skip(self), fields(order_id = %order_id))]
    pub async fn delete(
        &self,
        order_id: Uuid,
        ack: Acknowledgement,
    ) -> Result<ActionOutcome<DeleteOrderResult>, ServiceError> {
        if !ack.is_accepted() {
            info!(%order_id, "deletion dismissed by operator");
            return Ok(ActionOutcome::Aborted);
        }
        let _guard = self.begin(order_id, OrderActionKind::Delete)?;
        let result = DeleteOrderCommand { order_id }
            .execute(self.api.clone(), self.event_sender.clone())
            .await?;
        self.cache.invalidate_order(order_id).await;
        Ok(ActionOutcome::Completed(result))
    }

    fn begin(
        &self,
        order_id: Uuid,
        kind: OrderActionKind,
    ) -> Result<InFlightGuard, ServiceError> {
        match self.in_flight.entry(order_id) {
            Entry::Occupied(existing) => Err(ServiceError::Conflict(format!(
                "{} already in flight for order {}",
                existing.get(),
                order_id
            ))),
            Entry::Vacant(slot) => {
                slot.insert(kind);
                Ok(InFlightGuard {
                    map: self.in_flight.clone(),
                    order_id,
                })
            }
        }
    }
}

/// Releases the in-flight slot on drop, success or failure.
struct InFlightGuard {
    map: Arc<DashMap<Uuid, OrderActionKind>>,
    order_id: Uuid,
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.map.remove(&self.order_id);
    }
}

//! Order lifecycle policy: which actions an order's status admits.
//!
//! The table is the single source of truth: commands re-check it before
//! dispatching and UIs derive their controls from [`available_actions`],
//! so an illegal transition can only ever be a rejected value, never a
//! sent request.

use strum::Display;

use crate::errors::ServiceError;
use crate::models::OrderStatus;

/// A status-changing action exposed on an order.
///
/// Deleting an order and relabelling its shipment are deliberately not
/// here: both are permitted from any status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum OrderAction {
    Confirm,
    Cancel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("cannot {action} an order that is {from}")]
pub struct TransitionError {
    pub from: OrderStatus,
    pub action: OrderAction,
}

impl From<TransitionError> for ServiceError {
    fn from(err: TransitionError) -> Self {
        ServiceError::InvalidStatus(err.to_string())
    }
}

/// The transition table. Everything not listed is rejected: nothing leads
/// out of `Cancelled`, and nothing returns to `Pending`.
pub fn transition(from: OrderStatus, action: OrderAction) -> Result<OrderStatus, TransitionError> {
    match (from, action) {
        (OrderStatus::Pending, OrderAction::Confirm) => Ok(OrderStatus::Confirmed),
        (OrderStatus::Pending, OrderAction::Cancel) => Ok(OrderStatus::Cancelled),
        (OrderStatus::Confirmed, OrderAction::Cancel) => Ok(OrderStatus::Cancelled),
        (from, action) => Err(TransitionError { from, action }),
    }
}

/// Actions currently worth presenting for an order in this status.
pub fn available_actions(status: OrderStatus) -> &'static [OrderAction] {
    match status {
        OrderStatus::Pending => &[OrderAction::Confirm, OrderAction::Cancel],
        OrderStatus::Confirmed => &[OrderAction::Cancel],
        OrderStatus::Cancelled => &[],
    }
}

pub fn can_confirm(status: OrderStatus) -> bool {
    transition(status, OrderAction::Confirm).is_ok()
}

pub fn can_cancel(status: OrderStatus) -> bool {
    transition(status, OrderAction::Cancel).is_ok()
}

pub mod cancel_order_command;
pub mod confirm_order_command;
pub mod delete_order_command;
pub mod set_shipment_status_command;

pub use cancel_order_command::{CancelOrderCommand, CancelOrderResult};
pub use confirm_order_command::{ConfirmOrderCommand, ConfirmOrderResult};
pub use delete_order_command::{DeleteOrderCommand, DeleteOrderResult};
pub use set_shipment_status_command::{SetShipmentStatusCommand, SetShipmentStatusResult};

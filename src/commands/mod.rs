use crate::{client::ApiClient, errors::ServiceError, events::EventSender};
use async_trait::async_trait;
use std::sync::Arc;

/// Command trait for implementing the Command Pattern.
///
/// Encapsulates all the logic needed to perform one backend mutation
/// into a single object that can be validated, executed, and produce
/// events.
#[async_trait]
pub trait Command: Send + Sync {
    /// The return type of the command when executed successfully
    type Result;

    /// Execute the command with the given dependencies
    ///
    /// # Arguments
    /// * `api` - Client for the commerce backend
    /// * `event_sender` - Channel to publish domain events
    async fn execute(
        &self,
        api: Arc<ApiClient>,
        event_sender: Arc<EventSender>,
    ) -> Result<Self::Result, ServiceError>;
}

pub mod orders;

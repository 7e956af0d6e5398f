//! Sprout Admin Core
//!
//! Headless admin engine for the Sprout organic grocery storefront:
//! catalog variant tooling, order lifecycle actions, and a typed client
//! for the commerce backend.
#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![allow(elided_lifetimes_in_paths)]
#![warn(clippy::all, clippy::perf, clippy::dbg_macro)]

pub mod cache;
pub mod client;
pub mod commands;
pub mod config;
pub mod errors;
pub mod events;
pub mod models;
pub mod services;

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::cache::{CacheBackend, InMemoryCache, QueryCache};
use crate::client::ApiClient;
use crate::config::AppConfig;
use crate::errors::ServiceError;
use crate::events::EventSender;
use crate::services::{CatalogService, OrderActionService};

/// Common query parameters for list endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListQuery {
    #[serde(default = "default_page")]
    pub page: u64,
    #[serde(default = "default_limit")]
    pub limit: u64,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            page: default_page(),
            limit: default_limit(),
        }
    }
}

fn default_page() -> u64 {
    1
}
fn default_limit() -> u64 {
    20
}

/// One page of a backend listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub page: u64,
    pub limit: u64,
}

/// Shared dependencies wired once at startup.
#[derive(Clone)]
pub struct AdminContext {
    pub config: AppConfig,
    pub api: Arc<ApiClient>,
    pub cache: Arc<QueryCache>,
    pub event_sender: Arc<EventSender>,
}

impl AdminContext {
    pub fn new(config: AppConfig, event_sender: EventSender) -> Result<Self, ServiceError> {
        let api = Arc::new(ApiClient::new(&config.backend)?);
        let backend: Arc<dyn CacheBackend> =
            Arc::new(InMemoryCache::with_capacity(config.cache.capacity));
        let cache = Arc::new(QueryCache::new(backend, &config.cache));
        Ok(Self {
            config,
            api,
            cache,
            event_sender: Arc::new(event_sender),
        })
    }

    pub fn order_service(&self) -> OrderActionService {
        OrderActionService::new(
            self.api.clone(),
            self.cache.clone(),
            self.event_sender.clone(),
        )
    }

    pub fn catalog_service(&self) -> CatalogService {
        CatalogService::new(
            self.api.clone(),
            self.cache.clone(),
            self.event_sender.clone(),
        )
    }
}

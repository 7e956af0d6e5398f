//! Typed query cache over a [`CacheBackend`].
//!
//! Mutations invalidate; reads either hit or fall through to the backend
//! API. A stale entry between a remote change and the next invalidation is
//! expected; consistency is eventual, keyed per resource.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};
use uuid::Uuid;

use super::{CacheBackend, CacheError};
use crate::config::CacheConfig;

/// Cache key for a backend query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryKey {
    /// The default orders listing.
    Orders,
    /// A single order detail.
    Order(Uuid),
    /// The default products listing.
    Products,
    /// A single product detail.
    Product(Uuid),
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryKey::Orders => write!(f, "orders"),
            QueryKey::Order(id) => write!(f, "orders:{id}"),
            QueryKey::Products => write!(f, "products"),
            QueryKey::Product(id) => write!(f, "products:{id}"),
        }
    }
}

/// Result of a cache probe.
#[derive(Debug, PartialEq)]
pub enum CacheLookup<T> {
    Hit(T),
    Miss,
}

impl<T> CacheLookup<T> {
    pub fn hit(self) -> Option<T> {
        match self {
            CacheLookup::Hit(value) => Some(value),
            CacheLookup::Miss => None,
        }
    }
}

/// JSON value cache with typed keys and per-resource invalidation.
#[derive(Clone)]
pub struct QueryCache {
    backend: Arc<dyn CacheBackend>,
    default_ttl: Option<Duration>,
    enabled: bool,
}

impl QueryCache {
    pub fn new(backend: Arc<dyn CacheBackend>, config: &CacheConfig) -> Self {
        Self {
            backend,
            default_ttl: config.default_ttl_secs.map(Duration::from_secs),
            enabled: config.enabled,
        }
    }

    /// Probes the cache. Deserialization failures and backend errors read
    /// as a miss; a corrupt entry is dropped.
    pub async fn get<T: DeserializeOwned>(&self, key: &QueryKey) -> CacheLookup<T> {
        if !self.enabled {
            return CacheLookup::Miss;
        }
        let raw = match self.backend.get(&key.to_string()).await {
            Ok(Some(raw)) => raw,
            Ok(None) => return CacheLookup::Miss,
            Err(e) => {
                warn!(%key, error = %e, "cache read failed");
                return CacheLookup::Miss;
            }
        };
        match serde_json::from_str(&raw) {
            Ok(value) => CacheLookup::Hit(value),
            Err(e) => {
                debug!(%key, error = %e, "dropping undecodable cache entry");
                let _ = self.backend.delete(&key.to_string()).await;
                CacheLookup::Miss
            }
        }
    }

    /// Stores a value under the key. Best-effort: failures are logged, not
    /// propagated, since the caller already holds the fresh value.
    pub async fn put<T: Serialize>(&self, key: &QueryKey, value: &T) {
        if !self.enabled {
            return;
        }
        let raw = match serde_json::to_string(value) {
            Ok(raw) => raw,
            Err(e) => {
                warn!(%key, error = %e, "cache encode failed");
                return;
            }
        };
        if let Err(e) = self.backend.set(&key.to_string(), &raw, self.default_ttl).await {
            warn!(%key, error = %e, "cache write failed");
        }
    }

    pub async fn invalidate(&self, key: &QueryKey) {
        if let Err(e) = self.backend.delete(&key.to_string()).await {
            warn!(%key, error = %e, "cache invalidation failed");
        }
    }

    /// Invalidates an order's detail entry and the orders collection.
    pub async fn invalidate_order(&self, order_id: Uuid) {
        self.invalidate(&QueryKey::Order(order_id)).await;
        self.invalidate(&QueryKey::Orders).await;
    }

    /// Invalidates a product's detail entry (if given) and the products
    /// collection.
    pub async fn invalidate_products(&self, product_id: Option<Uuid>) {
        if let Some(id) = product_id {
            self.invalidate(&QueryKey::Product(id)).await;
        }
        self.invalidate(&QueryKey::Products).await;
    }

    pub async fn clear(&self) -> Result<(), CacheError> {
        self.backend.clear().await
    }
}

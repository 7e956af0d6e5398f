//! Catalog operations: product submission and cached product reads.

use std::sync::Arc;

use tracing::{info, instrument};
use uuid::Uuid;
use validator::Validate;

use crate::cache::{CacheLookup, QueryCache, QueryKey};
use crate::client::{ApiClient, ProductPayload};
use crate::errors::ServiceError;
use crate::events::{Event, EventSender};
use crate::models::{Product, ProductOption, VariantDraft};
use crate::services::variants;
use crate::{ListQuery, Page};

#[derive(Clone)]
pub struct CatalogService {
    api: Arc<ApiClient>,
    cache: Arc<QueryCache>,
    event_sender: Arc<EventSender>,
}

impl CatalogService {
    pub fn new(api: Arc<ApiClient>, cache: Arc<QueryCache>, event_sender: Arc<EventSender>) -> Self {
        Self {
            api,
            cache,
            event_sender,
        }
    }

    /// Submits a new product. The payload variant decides the encoding:
    /// JSON, or multipart when images ride along.
    #[instrument(skip(self, payload), fields(product = %payload.product().name))]
    pub async fn create_product(&self, payload: ProductPayload) -> Result<Product, ServiceError> {
        payload.product().validate()?;

        let product = self.api.create_product(payload).await?;
        self.cache.invalidate_products(Some(product.id)).await;

        info!(product_id = %product.id, slug = %product.slug, "Product created");

        self.event_sender
            .send(Event::ProductCreated {
                product_id: product.id,
            })
            .await
            .map_err(ServiceError::EventError)?;

        Ok(product)
    }

    /// Fetches one product, serving from cache when possible.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn get_product(&self, product_id: Uuid) -> Result<Product, ServiceError> {
        let key = QueryKey::Product(product_id);
        if let CacheLookup::Hit(product) = self.cache.get::<Product>(&key).await {
            return Ok(product);
        }
        let product = self.api.get_product(product_id).await?;
        self.cache.put(&key, &product).await;
        Ok(product)
    }

    /// Lists products. Only the default listing is cached.
    #[instrument(skip(self))]
    pub async fn list_products(&self, query: ListQuery) -> Result<Page<Product>, ServiceError> {
        let cacheable = query == ListQuery::default();
        if cacheable {
            if let CacheLookup::Hit(page) =
                self.cache.get::<Page<Product>>(&QueryKey::Products).await
            {
                return Ok(page);
            }
        }
        let page = self.api.list_products(&query).await?;
        if cacheable {
            self.cache.put(&QueryKey::Products, &page).await;
        }
        Ok(page)
    }

    /// Expands options into variant drafts and announces the batch.
    #[instrument(skip(self, options), fields(product = %product_name))]
    pub async fn generate_variants(
        &self,
        product_name: &str,
        options: &[ProductOption],
    ) -> Result<Vec<VariantDraft>, ServiceError> {
        let drafts = variants::generate(product_name, options);
        if !drafts.is_empty() {
            self.event_sender
                .send(Event::VariantsGenerated {
                    product_slug: variants::slugify(product_name),
                    count: drafts.len(),
                })
                .await
                .map_err(ServiceError::EventError)?;
        }
        Ok(drafts)
    }
}

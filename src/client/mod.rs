//! Typed client for the commerce backend REST API.
//!
//! Owns request shaping only: which endpoint, which partial update, which
//! payload encoding. Response schemas belong to the backend and are
//! deserialized straight into the domain models. Every mutation is a
//! single call with no retry and no idempotency key.

use std::time::Duration;

use reqwest::{multipart, Response, StatusCode};
use tracing::instrument;
use url::Url;
use uuid::Uuid;

use crate::config::BackendConfig;
use crate::errors::ServiceError;
use crate::models::{Order, Product};
use crate::{ListQuery, Page};

pub mod payload;

pub use payload::{ImageUpload, OrderPatch, ProductPayload};

const ERROR_BODY_SNIPPET_LEN: usize = 200;

#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base: Url,
}

impl ApiClient {
    pub fn new(config: &BackendConfig) -> Result<Self, ServiceError> {
        let base = Url::parse(&config.base_url)
            .map_err(|e| ServiceError::ConfigError(format!("invalid backend base URL: {e}")))?;
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self { http, base })
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, ServiceError> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| ServiceError::ConfigError("backend base URL cannot be a base".into()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    #[instrument(skip(self))]
    pub async fn list_orders(&self, query: &ListQuery) -> Result<Page<Order>, ServiceError> {
        let url = self.endpoint(&["orders"])?;
        let response = self
            .http
            .get(url)
            .query(&[("page", query.page), ("limit", query.limit)])
            .send()
            .await?;
        Ok(check(response, "orders").await?.json().await?)
    }

    #[instrument(skip(self), fields(order_id = %order_id))]
    pub async fn get_order(&self, order_id: Uuid) -> Result<Order, ServiceError> {
        let url = self.endpoint(&["orders", &order_id.to_string()])?;
        let response = self.http.get(url).send().await?;
        Ok(check(response, "order").await?.json().await?)
    }

    /// Issues a partial update carrying exactly the field the patch names.
    #[instrument(skip(self), fields(order_id = %order_id))]
    pub async fn patch_order(
        &self,
        order_id: Uuid,
        patch: OrderPatch,
    ) -> Result<Order, ServiceError> {
        let url = self.endpoint(&["orders", &order_id.to_string()])?;
        let response = self.http.patch(url).json(&patch).send().await?;
        Ok(check(response, "order").await?.json().await?)
    }

    #[instrument(skip(self), fields(order_id = %order_id))]
    pub async fn delete_order(&self, order_id: Uuid) -> Result<(), ServiceError> {
        let url = self.endpoint(&["orders", &order_id.to_string()])?;
        let response = self.http.delete(url).send().await?;
        check(response, "order").await?;
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn list_products(&self, query: &ListQuery) -> Result<Page<Product>, ServiceError> {
        let url = self.endpoint(&["products"])?;
        let response = self
            .http
            .get(url)
            .query(&[("page", query.page), ("limit", query.limit)])
            .send()
            .await?;
        Ok(check(response, "products").await?.json().await?)
    }

    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn get_product(&self, product_id: Uuid) -> Result<Product, ServiceError> {
        let url = self.endpoint(&["products", &product_id.to_string()])?;
        let response = self.http.get(url).send().await?;
        Ok(check(response, "product").await?.json().await?)
    }

    /// Submits a product. JSON payloads post as `application/json`;
    /// multipart payloads carry a `product` JSON part plus one `images`
    /// part per upload.
    #[instrument(skip(self, payload), fields(product = %payload.product().name))]
    pub async fn create_product(&self, payload: ProductPayload) -> Result<Product, ServiceError> {
        let url = self.endpoint(&["products"])?;
        let response = match payload {
            ProductPayload::Json(product) => self.http.post(url).json(&product).send().await?,
            ProductPayload::Multipart { product, images } => {
                let mut form =
                    multipart::Form::new().text("product", serde_json::to_string(&product)?);
                for image in images {
                    let part = multipart::Part::bytes(image.bytes)
                        .file_name(image.file_name)
                        .mime_str(&image.content_type)?;
                    form = form.part("images", part);
                }
                self.http.post(url).multipart(form).send().await?
            }
        };
        Ok(check(response, "product").await?.json().await?)
    }
}

/// Maps a non-2xx response onto the error taxonomy, keeping a snippet of
/// the body for diagnostics.
async fn check(response: Response, entity: &str) -> Result<Response, ServiceError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    let message: String = body.chars().take(ERROR_BODY_SNIPPET_LEN).collect();
    Err(match status {
        StatusCode::NOT_FOUND => ServiceError::NotFound(format!("{entity}: {message}")),
        StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
            ServiceError::ValidationError(message)
        }
        StatusCode::CONFLICT => ServiceError::Conflict(message),
        _ => ServiceError::ExternalApiError {
            status: status.as_u16(),
            message,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base_url: &str) -> ApiClient {
        ApiClient::new(&BackendConfig {
            base_url: base_url.to_string(),
            timeout_secs: 5,
        })
        .unwrap()
    }

    #[test]
    fn endpoint_joins_segments_under_base_path() {
        let api = client("http://localhost:9000/api/v1");
        let url = api.endpoint(&["orders", "abc"]).unwrap();
        assert_eq!(url.as_str(), "http://localhost:9000/api/v1/orders/abc");
    }

    #[test]
    fn endpoint_tolerates_trailing_slash() {
        let api = client("http://localhost:9000/api/v1/");
        let url = api.endpoint(&["products"]).unwrap();
        assert_eq!(url.as_str(), "http://localhost:9000/api/v1/products");
    }

    #[test]
    fn rejects_invalid_base_url() {
        let result = ApiClient::new(&BackendConfig {
            base_url: "::definitely not a url::".into(),
            timeout_secs: 5,
        });
        assert!(result.is_err());
    }
}

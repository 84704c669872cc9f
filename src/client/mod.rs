//! HTTP client for the storefront API, used by the `storefront-cli` binary.
//!
//! Mirrors what the browser frontend did: fetch catalog and cart state,
//! compute totals locally ([`CartSummary`]) and keep the session token on
//! disk ([`SessionStore`]).

pub mod session_store;
pub mod summary;

pub use session_store::{SessionStore, StoredSession};
pub use summary::{CartSummary, SummaryLine};

use crate::{
    entities::{CartItemModel, CategoryModel, OrderModel, ProductModel},
    errors::ErrorResponse,
    services::orders::PlaceOrderInput,
    session::SessionId,
};
use reqwest::{Response, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use std::time::Duration;
use thiserror::Error;
use tracing::debug;
use url::Url;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8080";

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{status}: {message}")]
    Api { status: StatusCode, message: String },

    #[error("session file error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed session file: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid base URL {url}: {reason}")]
    InvalidBaseUrl { url: String, reason: String },
}

impl ClientError {
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Api { status, .. } => Some(*status),
            Self::Http(e) => e.status(),
            _ => None,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AddToCartBody {
    product_id: i32,
    quantity: i32,
}

#[derive(Serialize)]
struct UpdateQuantityBody {
    quantity: i32,
}

#[derive(Clone, Debug)]
pub struct StorefrontClient {
    base_url: Url,
    http: reqwest::Client,
}

impl StorefrontClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(15))
            .gzip(true)
            .build()?;
        Self::with_client(base_url, http)
    }

    pub fn with_client(base_url: impl Into<String>, http: reqwest::Client) -> Result<Self, ClientError> {
        let raw = base_url.into();
        let invalid = |reason: String| ClientError::InvalidBaseUrl {
            url: raw.clone(),
            reason,
        };
        let base_url = Url::parse(&raw).map_err(|e| invalid(e.to_string()))?;
        if base_url.cannot_be_a_base() {
            return Err(invalid("not a hierarchical URL".to_string()));
        }
        Ok(Self { base_url, http })
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_str()
    }

    /// Joins `segments` under `{base}/api`, percent-encoding each one so a
    /// session id is always exactly one path segment.
    fn url(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().push("api").extend(segments);
        }
        url
    }

    pub async fn list_products(&self) -> Result<Vec<ProductModel>, ClientError> {
        self.get(&["products"]).await
    }

    pub async fn list_products_by_category(
        &self,
        category_id: i32,
    ) -> Result<Vec<ProductModel>, ClientError> {
        let category_id = category_id.to_string();
        self.get(&["products", "category", category_id.as_str()]).await
    }

    pub async fn list_categories(&self) -> Result<Vec<CategoryModel>, ClientError> {
        self.get(&["categories"]).await
    }

    pub async fn list_cart(&self, session_id: &SessionId) -> Result<Vec<CartItemModel>, ClientError> {
        self.get(&["cart", session_id.as_str()]).await
    }

    pub async fn add_to_cart(
        &self,
        session_id: &SessionId,
        product_id: i32,
        quantity: i32,
    ) -> Result<CartItemModel, ClientError> {
        let response = self
            .http
            .post(self.url(&["cart", session_id.as_str()]))
            .json(&AddToCartBody {
                product_id,
                quantity,
            })
            .send()
            .await?;
        decode(response).await
    }

    pub async fn update_cart_item(
        &self,
        item_id: i32,
        quantity: i32,
    ) -> Result<CartItemModel, ClientError> {
        let response = self
            .http
            .put(self.url(&["cart", item_id.to_string().as_str()]))
            .json(&UpdateQuantityBody { quantity })
            .send()
            .await?;
        decode(response).await
    }

    pub async fn remove_cart_item(&self, item_id: i32) -> Result<(), ClientError> {
        let response = self
            .http
            .delete(self.url(&["cart", item_id.to_string().as_str()]))
            .send()
            .await?;
        ensure_success(response).await.map(|_| ())
    }

    pub async fn place_order(&self, input: &PlaceOrderInput) -> Result<OrderModel, ClientError> {
        let response = self
            .http
            .post(self.url(&["orders"]))
            .json(input)
            .send()
            .await?;
        decode(response).await
    }

    async fn get<T: DeserializeOwned>(&self, segments: &[&str]) -> Result<T, ClientError> {
        let url = self.url(segments);
        debug!(%url, "GET");
        let response = self.http.get(url).send().await?;
        decode(response).await
    }
}

async fn ensure_success(response: Response) -> Result<Response, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorResponse>(&body)
        .map(|err| err.message)
        .unwrap_or_else(|_| {
            if body.trim().is_empty() {
                status.canonical_reason().unwrap_or("request failed").to_string()
            } else {
                body
            }
        });
    Err(ClientError::Api { status, message })
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
    let response = ensure_success(response).await?;
    Ok(response.json::<T>().await?)
}

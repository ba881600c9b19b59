//! Remote cart service client.
//!
//! The remote service owns the authenticated user's cart; this module
//! holds the REST contract (`RemoteCartService`) and the production
//! HTTP implementation. Responses arrive in the API's standard
//! envelope `{data, message, success}`; every request carries the
//! bearer credential when one is present and is subject to a request
//! timeout, which surfaces as a transient failure.

use crate::error::{Result, SyncError};
use crate::session::SessionStore;
use reqwest::{Method, StatusCode};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use storefront_cart::{Cart, CartItem, ProductId};

/// Default per-request timeout for cart calls.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Remote cart service contract
///
/// One method per mutating intent plus the authoritative snapshot
/// fetch. Mutating calls return `Ok(())` on server confirmation; the
/// adapter refetches rather than mirroring response bodies.
#[allow(async_fn_in_trait)]
pub trait RemoteCartService: Send + Sync {
    /// `GET /cart` - the current server cart snapshot
    async fn fetch_cart(&self) -> Result<Cart>;

    /// `POST /cart/add` - add a quantity of a product
    async fn add_item(&self, product_id: ProductId, quantity: u32) -> Result<()>;

    /// `PUT /cart/update` - replace a product's quantity
    async fn update_item(&self, product_id: ProductId, quantity: i64) -> Result<()>;

    /// `DELETE /cart/remove/{product_id}` - drop a product from the cart
    async fn remove_item(&self, product_id: ProductId) -> Result<()>;

    /// `DELETE /cart/clear` - empty the cart
    async fn clear(&self) -> Result<()>;
}

/// Standard response envelope used by the storefront API
#[derive(Debug, Deserialize)]
struct ApiEnvelope<T> {
    data: Option<T>,
    #[serde(default)]
    message: String,
    #[serde(default)]
    success: bool,
}

/// Envelope shape decoded from error responses
#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    #[serde(default)]
    message: String,
}

/// Server cart snapshot as carried on the wire
#[derive(Debug, Deserialize)]
struct CartSnapshot {
    #[serde(default)]
    items: Vec<CartItem>,
    #[serde(default)]
    total: u64,
    #[serde(default, rename = "itemCount")]
    item_count: u32,
}

impl From<CartSnapshot> for Cart {
    fn from(snapshot: CartSnapshot) -> Self {
        // The server's totals are authoritative; server-side pricing
        // rules may not be reproducible client-side.
        Self {
            items: snapshot.items,
            total: snapshot.total,
            item_count: snapshot.item_count,
        }
    }
}

/// Body for the add/update mutations
#[derive(Debug, Serialize)]
struct MutateBody {
    product_id: u64,
    quantity: i64,
}

/// HTTP implementation of [`RemoteCartService`] over reqwest
pub struct HttpCartService {
    client: reqwest::Client,
    base_url: String,
    session: Arc<dyn SessionStore>,
}

impl HttpCartService {
    /// Create a client against the given API base URL
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::Transient`] if the underlying HTTP client
    /// cannot be constructed.
    pub fn new(base_url: impl Into<String>, session: Arc<dyn SessionStore>) -> Result<Self> {
        Self::with_timeout(base_url, session, DEFAULT_TIMEOUT)
    }

    /// Create a client with a custom per-request timeout
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::Transient`] if the underlying HTTP client
    /// cannot be constructed.
    pub fn with_timeout(
        base_url: impl Into<String>,
        session: Arc<dyn SessionStore>,
        timeout: Duration,
    ) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(Self::transport)?;

        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }

        Ok(Self {
            client,
            base_url,
            session,
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Build a request, attaching the bearer credential when present
    fn request(&self, method: Method, path: &str) -> reqwest::RequestBuilder {
        let mut request = self.client.request(method, self.endpoint(path));
        if let Some(token) = self.session.token() {
            request = request.bearer_auth(token);
        }
        request
    }

    fn transport(error: reqwest::Error) -> SyncError {
        SyncError::Transient {
            message: error.to_string(),
        }
    }

    /// Map a non-success status to the failure taxonomy
    fn classify_error_status(status: StatusCode, message: Option<String>) -> SyncError {
        if status == StatusCode::UNAUTHORIZED {
            SyncError::Unauthorized
        } else if status.is_client_error() {
            SyncError::Rejected {
                message: message
                    .unwrap_or_else(|| format!("request failed with status {status}")),
            }
        } else {
            SyncError::Transient {
                message: format!("server returned status {status}"),
            }
        }
    }

    /// Reject error responses, extracting the server message when one exists
    async fn check(response: reqwest::Response) -> Result<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let message = response
            .json::<ErrorEnvelope>()
            .await
            .ok()
            .map(|envelope| envelope.message)
            .filter(|message| !message.is_empty());

        Err(Self::classify_error_status(status, message))
    }

    /// Execute a mutating request, requiring server confirmation
    async fn confirm(&self, request: reqwest::RequestBuilder) -> Result<()> {
        let response = request.send().await.map_err(Self::transport)?;
        Self::check(response).await.map(|_| ())
    }
}

impl RemoteCartService for HttpCartService {
    #[tracing::instrument(skip(self))]
    async fn fetch_cart(&self) -> Result<Cart> {
        let response = self
            .request(Method::GET, "/cart")
            .send()
            .await
            .map_err(Self::transport)?;
        let response = Self::check(response).await?;

        let envelope: ApiEnvelope<CartSnapshot> =
            response.json().await.map_err(Self::transport)?;
        if !envelope.success {
            return Err(SyncError::Rejected {
                message: envelope.message,
            });
        }

        let snapshot = envelope.data.ok_or_else(|| SyncError::Transient {
            message: "cart response carried no data".to_string(),
        })?;
        Ok(snapshot.into())
    }

    #[tracing::instrument(skip(self), fields(product_id = %product_id))]
    async fn add_item(&self, product_id: ProductId, quantity: u32) -> Result<()> {
        self.confirm(self.request(Method::POST, "/cart/add").json(&MutateBody {
            product_id: product_id.get(),
            quantity: i64::from(quantity),
        }))
        .await
    }

    #[tracing::instrument(skip(self), fields(product_id = %product_id))]
    async fn update_item(&self, product_id: ProductId, quantity: i64) -> Result<()> {
        self.confirm(self.request(Method::PUT, "/cart/update").json(&MutateBody {
            product_id: product_id.get(),
            quantity,
        }))
        .await
    }

    #[tracing::instrument(skip(self), fields(product_id = %product_id))]
    async fn remove_item(&self, product_id: ProductId) -> Result<()> {
        let path = format!("/cart/remove/{product_id}");
        self.confirm(self.request(Method::DELETE, &path)).await
    }

    #[tracing::instrument(skip(self))]
    async fn clear(&self) -> Result<()> {
        self.confirm(self.request(Method::DELETE, "/cart/clear"))
            .await
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)] // Test code: fixtures decode cleanly

    use super::*;
    use crate::session::InMemorySessionStore;

    fn service() -> HttpCartService {
        HttpCartService::new(
            "https://api.example.test/api/",
            Arc::new(InMemorySessionStore::new()),
        )
        .unwrap()
    }

    #[test]
    fn endpoint_trims_trailing_slash() {
        let service = service();
        assert_eq!(
            service.endpoint("/cart/clear"),
            "https://api.example.test/api/cart/clear"
        );
    }

    #[test]
    fn status_classification_matches_taxonomy() {
        assert_eq!(
            HttpCartService::classify_error_status(StatusCode::UNAUTHORIZED, None),
            SyncError::Unauthorized
        );
        assert_eq!(
            HttpCartService::classify_error_status(
                StatusCode::UNPROCESSABLE_ENTITY,
                Some("stok tidak cukup".to_string())
            ),
            SyncError::Rejected {
                message: "stok tidak cukup".to_string()
            }
        );
        assert!(matches!(
            HttpCartService::classify_error_status(StatusCode::BAD_GATEWAY, None),
            SyncError::Transient { .. }
        ));
        assert!(matches!(
            HttpCartService::classify_error_status(StatusCode::NOT_FOUND, None),
            SyncError::Rejected { .. }
        ));
    }

    #[test]
    fn snapshot_envelope_decodes() {
        let json = r#"{
            "data": {
                "items": [
                    {
                        "id": 1715000000001,
                        "product": {
                            "id": 3,
                            "name": "Botol 600ml",
                            "description": "",
                            "harga": 950,
                            "category": "Botol",
                            "stock": 40
                        },
                        "quantity": 2
                    }
                ],
                "total": 1900,
                "itemCount": 2
            },
            "message": "OK",
            "success": true
        }"#;

        let envelope: ApiEnvelope<CartSnapshot> = serde_json::from_str(json).unwrap();
        assert!(envelope.success);

        let cart: Cart = envelope.data.unwrap().into();
        assert_eq!(cart.items.len(), 1);
        assert_eq!(cart.items[0].quantity, 2);
        assert_eq!(cart.total, 1900);
        assert_eq!(cart.item_count, 2);
    }

    #[test]
    fn empty_snapshot_decodes_to_empty_cart() {
        let json = r#"{"data": {}, "message": "OK", "success": true}"#;
        let envelope: ApiEnvelope<CartSnapshot> = serde_json::from_str(json).unwrap();
        let cart: Cart = envelope.data.unwrap().into();
        assert!(cart.is_empty());
        assert_eq!(cart.total, 0);
    }

    #[test]
    fn error_envelope_prefers_server_message() {
        let json = r#"{"message": "Jumlah melebihi stok", "success": false}"#;
        let envelope: ErrorEnvelope = serde_json::from_str(json).unwrap();
        assert_eq!(envelope.message, "Jumlah melebihi stok");
    }
}

//! TwoTap HTTP client.

use async_trait::async_trait;
use mockall::automock;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, info};

use crate::twotap::{
    config::TwoTapConfig,
    errors::TwoTapError,
    models::{CartRequest, CartStatus, ConfirmRequest, PurchaseRequest, PurchaseStatus},
};

/// HTTP client for the TwoTap cart and purchase API.
#[derive(Debug, Clone)]
pub struct TwoTapClient {
    config: TwoTapConfig,
    http: Client,
}

impl TwoTapClient {
    /// Create a new client from the given configuration.
    #[must_use]
    pub fn new(config: TwoTapConfig) -> Self {
        Self {
            config,
            http: Client::new(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.config.base_url.trim_end_matches('/'))
    }

    /// Attach the public token and, when configured, the test mode.
    fn public(&self, request: RequestBuilder) -> RequestBuilder {
        let request = request.query(&[("public_token", self.config.public_token.as_str())]);

        match &self.config.test_mode {
            Some(test_mode) => request.query(&[("test_mode", test_mode.as_str())]),
            None => request,
        }
    }

    async fn send<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        context: &str,
    ) -> Result<T, TwoTapError> {
        let response = request.send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();

            return Err(TwoTapError::UnexpectedResponse(format!(
                "{context} failed with status {status}: {text}"
            )));
        }

        let body: Value = response.json().await?;

        log_response(context, &body);

        Ok(serde_json::from_value(body)?)
    }
}

#[async_trait]
impl TwoTapApi for TwoTapClient {
    async fn create_cart(&self, request: CartRequest) -> Result<CartStatus, TwoTapError> {
        info!(products = ?request.products, "adding products to cart");

        let builder = self.public(self.http.post(self.url("/v1.0/cart"))).json(&request);

        self.send(builder, "added to cart").await
    }

    async fn cart_status(&self, cart_id: &str) -> Result<CartStatus, TwoTapError> {
        let builder = self
            .public(self.http.get(self.url("/v1.0/cart/status")))
            .query(&[("cart_id", cart_id)]);

        self.send(builder, "checked cart status").await
    }

    async fn create_purchase(
        &self,
        request: PurchaseRequest,
    ) -> Result<PurchaseStatus, TwoTapError> {
        info!(cart_id = %request.cart_id, "triggering purchase");

        let builder = self
            .public(self.http.post(self.url("/v1.0/purchase")))
            .json(&request);

        self.send(builder, "triggered purchase").await
    }

    async fn purchase_status(&self, purchase_id: &str) -> Result<PurchaseStatus, TwoTapError> {
        let builder = self
            .public(self.http.get(self.url("/v1.0/purchase/status")))
            .query(&[("purchase_id", purchase_id)]);

        self.send(builder, "checked purchase status").await
    }

    async fn confirm_purchase(&self, purchase_id: &str) -> Result<Value, TwoTapError> {
        info!(purchase_id, "confirming purchase");

        let builder = self
            .http
            .post(self.url("/v1.0/purchase/confirm"))
            .query(&[("private_token", self.config.private_token.expose())])
            .json(&ConfirmRequest {
                purchase_id: purchase_id.to_owned(),
            });

        self.send(builder, "confirmed purchase").await
    }
}

#[automock]
#[async_trait]
pub trait TwoTapApi: Send + Sync {
    /// Add products to a new cart.
    async fn create_cart(&self, request: CartRequest) -> Result<CartStatus, TwoTapError>;

    /// Fetch the status of a cart.
    async fn cart_status(&self, cart_id: &str) -> Result<CartStatus, TwoTapError>;

    /// Trigger a purchase for a processed cart.
    async fn create_purchase(&self, request: PurchaseRequest)
    -> Result<PurchaseStatus, TwoTapError>;

    /// Fetch the status of a purchase.
    async fn purchase_status(&self, purchase_id: &str) -> Result<PurchaseStatus, TwoTapError>;

    /// Confirm a purchase with the private token. Returns the API body as-is.
    async fn confirm_purchase(&self, purchase_id: &str) -> Result<Value, TwoTapError>;
}

fn log_response(context: &str, body: &Value) {
    let pretty = serde_json::to_string_pretty(body).unwrap_or_else(|_ignored| body.to_string());

    debug!(body = %pretty, "{context}");
}

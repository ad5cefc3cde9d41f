//! Purchases service.

use std::sync::Arc;

use async_trait::async_trait;
use mockall::automock;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::time::timeout_at;
use tracing::{info, warn};

use tapcart::{
    fields::FieldsInput,
    sites::{CartSite, CartSites},
    synthesis::{SynthesisError, synthesize_value, synthesize_with_profile},
};

use crate::{
    purchases::{
        config::{FlowMode, PurchasesConfig},
        errors::PurchasesServiceError,
        polling::poll_until_settled,
    },
    twotap::{
        TwoTapApi,
        models::{
            CartRequest, CartStatus, ConfirmSettings, PurchaseRequest, PurchaseStatus,
            StatusMessage,
        },
    },
};

/// Message reported when a cart could not be processed.
pub const FAILED: &str = "failed";

/// Where a purchase attempt ended up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurchaseOutcome {
    pub cart_id: String,
    pub purchase_id: Option<String>,
    pub message: String,
}

impl PurchaseOutcome {
    fn failed(cart_id: String) -> Self {
        Self {
            cart_id,
            purchase_id: None,
            message: FAILED.to_owned(),
        }
    }
}

#[derive(Clone)]
pub struct TwoTapPurchasesService {
    api: Arc<dyn TwoTapApi>,
    config: PurchasesConfig,
}

impl TwoTapPurchasesService {
    #[must_use]
    pub fn new(api: Arc<dyn TwoTapApi>, config: PurchasesConfig) -> Self {
        Self { api, config }
    }

    fn cart_sites(cart: &CartStatus) -> Result<CartSites, PurchasesServiceError> {
        let sites = cart
            .sites
            .clone()
            .ok_or_else(|| PurchasesServiceError::MissingSites {
                cart_id: cart.cart_id.clone(),
            })?;

        serde_json::from_value(sites)
            .map_err(|source| PurchasesServiceError::Synthesis(source.into()))
    }

    async fn trigger_purchase(
        &self,
        cart_id: &str,
        sites: &CartSites,
        products: Vec<String>,
        finished_url: Option<String>,
    ) -> Result<PurchaseStatus, PurchasesServiceError> {
        let fields_input = synthesize_with_profile(sites, &self.config.profile)?;
        let callbacks = &self.config.callbacks;

        let purchase = self
            .api
            .create_purchase(PurchaseRequest {
                cart_id: cart_id.to_owned(),
                fields_input,
                products,
                confirm: ConfirmSettings::sms(
                    &self.config.confirm_phone,
                    &callbacks.purchase_confirm,
                    &callbacks.purchase_finished,
                ),
                finished_url,
            })
            .await?;

        info!(cart_id, purchase_id = %purchase.purchase_id, "triggered purchase");

        Ok(purchase)
    }

    /// Cart polling, purchase creation and purchase polling share one deadline.
    async fn purchase_by_polling(
        &self,
        product_url: &str,
    ) -> Result<PurchaseOutcome, PurchasesServiceError> {
        let polling = &self.config.polling;

        let cart = self
            .api
            .create_cart(CartRequest {
                products: vec![product_url.to_owned()],
                finished_url: None,
            })
            .await?;

        let deadline = polling.deadline();
        let cart_id = cart.cart_id.clone();

        let cart = poll_until_settled(polling, deadline, "cart", &cart_id, cart, || {
            self.api.cart_status(&cart_id)
        })
        .await?;

        if !cart.is_done() {
            warn!(cart_id = %cart_id, message = %cart.message, "cart was not processed");

            return Ok(PurchaseOutcome::failed(cart_id));
        }

        let sites = Self::cart_sites(&cart)?;

        let purchase = timeout_at(
            deadline,
            self.trigger_purchase(&cart_id, &sites, vec![product_url.to_owned()], None),
        )
        .await
        .map_err(|_elapsed| PurchasesServiceError::TimedOut {
            what: "purchase",
            id: cart_id.clone(),
        })??;

        let purchase_id = purchase.purchase_id.clone();

        let purchase = poll_until_settled(
            polling,
            deadline,
            "purchase",
            &purchase_id,
            purchase,
            || self.api.purchase_status(&purchase_id),
        )
        .await?;

        info!(
            cart_id = %cart_id,
            purchase_id = %purchase_id,
            message = %purchase.message,
            "purchase settled"
        );

        Ok(PurchaseOutcome {
            cart_id,
            purchase_id: Some(purchase_id),
            message: purchase.message,
        })
    }

    async fn purchase_by_webhook(
        &self,
        product_url: &str,
    ) -> Result<PurchaseOutcome, PurchasesServiceError> {
        let cart = self
            .api
            .create_cart(CartRequest {
                products: vec![product_url.to_owned()],
                finished_url: Some(self.config.callbacks.cart_finished.clone()),
            })
            .await?;

        info!(cart_id = %cart.cart_id, "waiting for cart_finished callback");

        Ok(PurchaseOutcome {
            cart_id: cart.cart_id,
            purchase_id: None,
            message: cart.message,
        })
    }
}

#[async_trait]
impl PurchasesService for TwoTapPurchasesService {
    async fn purchase_product(
        &self,
        product_url: &str,
    ) -> Result<PurchaseOutcome, PurchasesServiceError> {
        match self.config.mode {
            FlowMode::Polling => self.purchase_by_polling(product_url).await,
            FlowMode::Webhook => self.purchase_by_webhook(product_url).await,
        }
    }

    async fn cart_finished(
        &self,
        cart: CartStatus,
    ) -> Result<PurchaseOutcome, PurchasesServiceError> {
        if !cart.is_done() {
            warn!(cart_id = %cart.cart_id, message = %cart.message, "cart was not processed");

            return Ok(PurchaseOutcome::failed(cart.cart_id));
        }

        let sites = Self::cart_sites(&cart)?;

        let mut products: Vec<String> = sites
            .values()
            .flat_map(CartSite::product_urls)
            .map(ToOwned::to_owned)
            .collect();

        if products.is_empty() {
            warn!(cart_id = %cart.cart_id, "cart has no product urls to purchase");

            return Ok(PurchaseOutcome::failed(cart.cart_id));
        }

        products.sort_unstable();

        let purchase = self
            .trigger_purchase(
                &cart.cart_id,
                &sites,
                products,
                Some(self.config.callbacks.purchase_finished.clone()),
            )
            .await?;

        Ok(PurchaseOutcome {
            cart_id: cart.cart_id,
            purchase_id: Some(purchase.purchase_id),
            message: purchase.message,
        })
    }

    async fn confirm_purchase(&self, purchase_id: &str) -> Result<Value, PurchasesServiceError> {
        let response = self.api.confirm_purchase(purchase_id).await?;

        info!(purchase_id, "confirmed purchase");

        Ok(response)
    }

    async fn purchase_finished(&self, purchase: PurchaseStatus) {
        let PurchaseStatus {
            purchase_id,
            message,
            description,
            extra,
        } = purchase;

        info!(
            purchase_id = %purchase_id,
            message = %message,
            description = description.as_deref().unwrap_or_default(),
            details = %serde_json::Value::Object(extra),
            "purchase finished"
        );
    }

    fn fields_input(&self, cart_sites: Value) -> Result<FieldsInput, SynthesisError> {
        synthesize_value(cart_sites, &self.config.profile)
    }
}

#[automock]
#[async_trait]
pub trait PurchasesService: Send + Sync {
    /// Add a product to a cart and, in polling mode, see the purchase through.
    async fn purchase_product(
        &self,
        product_url: &str,
    ) -> Result<PurchaseOutcome, PurchasesServiceError>;

    /// Trigger the purchase for a cart TwoTap reports as finished.
    async fn cart_finished(&self, cart: CartStatus)
    -> Result<PurchaseOutcome, PurchasesServiceError>;

    /// Confirm a purchase TwoTap asks us to confirm.
    async fn confirm_purchase(&self, purchase_id: &str) -> Result<Value, PurchasesServiceError>;

    /// Record a finished purchase.
    async fn purchase_finished(&self, purchase: PurchaseStatus);

    /// Build fields input for the given cart sites with the configured profile.
    fn fields_input(&self, cart_sites: Value) -> Result<FieldsInput, SynthesisError>;
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use serde_json::json;
    use testresult::TestResult;

    use tapcart::checkout::CheckoutProfile;

    use crate::{
        purchases::config::{CallbackUrls, PollSettings},
        twotap::{
            MockTwoTapApi, TwoTapError,
            models::{DONE, STILL_PROCESSING},
        },
    };

    use super::*;

    const PRODUCT_URL: &str = "https://shop.example/shirt";

    fn config(mode: FlowMode) -> PurchasesConfig {
        PurchasesConfig {
            mode,
            callbacks: CallbackUrls::from_base("https://me.example"),
            confirm_phone: "5555555555".to_owned(),
            polling: PollSettings {
                interval: Duration::from_secs(2),
                max_interval: Duration::from_secs(4),
                timeout: Duration::from_secs(30),
            },
            profile: CheckoutProfile::default(),
        }
    }

    fn service(api: MockTwoTapApi, mode: FlowMode) -> TwoTapPurchasesService {
        TwoTapPurchasesService::new(Arc::new(api), config(mode))
    }

    fn sites() -> Value {
        json!({
            "site1": {
                "add_to_cart": {
                    "p1": {
                        "url": PRODUCT_URL,
                        "required_fields": { "quantity": {}, "size": {} },
                        "required_field_values": { "size": [{ "value": "S" }, { "value": "L" }] }
                    }
                }
            }
        })
    }

    fn cart(message: &str, sites: Option<Value>) -> CartStatus {
        CartStatus {
            cart_id: "c1".to_owned(),
            message: message.to_owned(),
            description: None,
            sites,
            extra: serde_json::Map::new(),
        }
    }

    fn purchase(message: &str) -> PurchaseStatus {
        PurchaseStatus {
            purchase_id: "pu1".to_owned(),
            message: message.to_owned(),
            description: None,
            extra: serde_json::Map::new(),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn polling_flow_purchases_with_synthesized_fields() -> TestResult {
        let mut api = MockTwoTapApi::new();

        api.expect_create_cart()
            .once()
            .withf(|request| {
                request.products == vec![PRODUCT_URL.to_owned()] && request.finished_url.is_none()
            })
            .return_once(|_| Ok(cart(STILL_PROCESSING, None)));

        let mut cart_checks = 0;

        api.expect_cart_status()
            .times(2)
            .withf(|cart_id| cart_id == "c1")
            .returning(move |_| {
                cart_checks += 1;

                if cart_checks == 1 {
                    Ok(cart(STILL_PROCESSING, None))
                } else {
                    Ok(cart(DONE, Some(sites())))
                }
            });

        api.expect_create_purchase()
            .once()
            .withf(|request| {
                let product = request
                    .fields_input
                    .get("site1")
                    .and_then(|site| site.add_to_cart.get("p1"));

                request.cart_id == "c1"
                    && request.products == vec![PRODUCT_URL.to_owned()]
                    && request.finished_url.is_none()
                    && request.confirm.sms_confirm_url == "https://me.example/purchase_confirm"
                    && product.and_then(|fields| fields.get("size")) == Some(&json!("L"))
                    && product.and_then(|fields| fields.get("quantity")) == Some(&json!(1))
            })
            .return_once(|_| Ok(purchase(STILL_PROCESSING)));

        api.expect_purchase_status()
            .once()
            .withf(|purchase_id| purchase_id == "pu1")
            .return_once(|_| Ok(purchase(DONE)));

        api.expect_confirm_purchase().never();

        let outcome = service(api, FlowMode::Polling)
            .purchase_product(PRODUCT_URL)
            .await?;

        assert_eq!(
            outcome,
            PurchaseOutcome {
                cart_id: "c1".to_owned(),
                purchase_id: Some("pu1".to_owned()),
                message: DONE.to_owned(),
            }
        );

        Ok(())
    }

    #[tokio::test(start_paused = true)]
    async fn polling_flow_reports_failed_cart() -> TestResult {
        let mut api = MockTwoTapApi::new();

        api.expect_create_cart()
            .once()
            .return_once(|_| Ok(cart("has_failures", None)));

        api.expect_cart_status().never();
        api.expect_create_purchase().never();

        let outcome = service(api, FlowMode::Polling)
            .purchase_product(PRODUCT_URL)
            .await?;

        assert_eq!(outcome.message, FAILED);
        assert_eq!(outcome.purchase_id, None);

        Ok(())
    }

    #[tokio::test(start_paused = true)]
    async fn polling_flow_times_out() {
        let mut api = MockTwoTapApi::new();

        api.expect_create_cart()
            .once()
            .return_once(|_| Ok(cart(STILL_PROCESSING, None)));

        api.expect_cart_status()
            .returning(|_| Ok(cart(STILL_PROCESSING, None)));

        api.expect_create_purchase().never();

        let result = service(api, FlowMode::Polling)
            .purchase_product(PRODUCT_URL)
            .await;

        assert!(
            matches!(result, Err(PurchasesServiceError::TimedOut { what: "cart", .. })),
            "expected cart timeout, got {result:?}"
        );
    }

    #[tokio::test(start_paused = true)]
    async fn polling_flow_shares_one_deadline_between_cart_and_purchase() {
        let mut config = config(FlowMode::Polling);
        config.polling = PollSettings {
            interval: Duration::from_secs(10),
            max_interval: Duration::from_secs(10),
            timeout: Duration::from_secs(120),
        };

        let mut api = MockTwoTapApi::new();

        api.expect_create_cart()
            .once()
            .return_once(|_| Ok(cart(STILL_PROCESSING, None)));

        // The cart settles on the tenth check, 100s in.
        let mut cart_checks = 0;

        api.expect_cart_status().times(10).returning(move |_| {
            cart_checks += 1;

            if cart_checks < 10 {
                Ok(cart(STILL_PROCESSING, None))
            } else {
                Ok(cart(DONE, Some(sites())))
            }
        });

        api.expect_create_purchase()
            .once()
            .return_once(|_| Ok(purchase(STILL_PROCESSING)));

        api.expect_purchase_status()
            .returning(|_| Ok(purchase(STILL_PROCESSING)));

        let started = tokio::time::Instant::now();

        let result = TwoTapPurchasesService::new(Arc::new(api), config)
            .purchase_product(PRODUCT_URL)
            .await;

        let waited = started.elapsed();

        assert!(
            matches!(result, Err(PurchasesServiceError::TimedOut { what: "purchase", .. })),
            "expected purchase timeout, got {result:?}"
        );
        assert!(
            waited <= Duration::from_secs(121),
            "gave up after {waited:?}, past the 120s budget"
        );
    }

    #[tokio::test(start_paused = true)]
    async fn polling_flow_fails_on_missing_field_values() {
        let mut api = MockTwoTapApi::new();

        api.expect_create_cart().once().return_once(|_| {
            Ok(cart(
                DONE,
                Some(json!({
                    "site1": {
                        "add_to_cart": {
                            "p1": { "required_fields": { "color": {} }, "required_field_values": {} }
                        }
                    }
                })),
            ))
        });

        api.expect_create_purchase().never();

        let result = service(api, FlowMode::Polling)
            .purchase_product(PRODUCT_URL)
            .await;

        assert!(
            matches!(
                result,
                Err(PurchasesServiceError::Synthesis(
                    SynthesisError::MissingFieldValues { .. }
                ))
            ),
            "expected MissingFieldValues, got {result:?}"
        );
    }

    #[tokio::test]
    async fn done_cart_without_sites_is_an_error() {
        let mut api = MockTwoTapApi::new();

        api.expect_create_cart()
            .once()
            .return_once(|_| Ok(cart(DONE, None)));

        api.expect_create_purchase().never();

        let result = service(api, FlowMode::Polling)
            .purchase_product(PRODUCT_URL)
            .await;

        assert!(
            matches!(&result, Err(PurchasesServiceError::MissingSites { cart_id }) if cart_id == "c1"),
            "expected MissingSites, got {result:?}"
        );
    }

    #[tokio::test]
    async fn webhook_flow_returns_after_cart_creation() -> TestResult {
        let mut api = MockTwoTapApi::new();

        api.expect_create_cart()
            .once()
            .withf(|request| {
                request.finished_url.as_deref() == Some("https://me.example/cart_finished")
            })
            .return_once(|_| Ok(cart(STILL_PROCESSING, None)));

        api.expect_cart_status().never();
        api.expect_create_purchase().never();

        let outcome = service(api, FlowMode::Webhook)
            .purchase_product(PRODUCT_URL)
            .await?;

        assert_eq!(outcome.cart_id, "c1");
        assert_eq!(outcome.purchase_id, None);
        assert_eq!(outcome.message, STILL_PROCESSING);

        Ok(())
    }

    #[tokio::test]
    async fn cart_finished_triggers_purchase_with_finished_url() -> TestResult {
        let mut api = MockTwoTapApi::new();

        api.expect_create_purchase()
            .once()
            .withf(|request| {
                request.cart_id == "c1"
                    && request.products == vec![PRODUCT_URL.to_owned()]
                    && request.finished_url.as_deref()
                        == Some("https://me.example/purchase_finished")
            })
            .return_once(|_| Ok(purchase(STILL_PROCESSING)));

        api.expect_purchase_status().never();

        let outcome = service(api, FlowMode::Webhook)
            .cart_finished(cart(DONE, Some(sites())))
            .await?;

        assert_eq!(outcome.purchase_id.as_deref(), Some("pu1"));
        assert_eq!(outcome.message, STILL_PROCESSING);

        Ok(())
    }

    #[tokio::test]
    async fn cart_finished_without_product_urls_does_not_purchase() -> TestResult {
        let mut api = MockTwoTapApi::new();

        api.expect_create_purchase().never();

        let outcome = service(api, FlowMode::Webhook)
            .cart_finished(cart(
                DONE,
                Some(json!({
                    "site1": {
                        "add_to_cart": {
                            "p1": { "required_fields": { "quantity": {} } }
                        }
                    }
                })),
            ))
            .await?;

        assert_eq!(
            outcome,
            PurchaseOutcome {
                cart_id: "c1".to_owned(),
                purchase_id: None,
                message: FAILED.to_owned(),
            }
        );

        Ok(())
    }

    #[tokio::test]
    async fn cart_finished_with_failures_does_not_purchase() -> TestResult {
        let mut api = MockTwoTapApi::new();

        api.expect_create_purchase().never();

        let outcome = service(api, FlowMode::Webhook)
            .cart_finished(cart("has_failures", Some(sites())))
            .await?;

        assert_eq!(outcome.message, FAILED);

        Ok(())
    }

    #[tokio::test]
    async fn cart_finished_with_malformed_sites_fails() {
        let mut api = MockTwoTapApi::new();

        api.expect_create_purchase().never();

        let result = service(api, FlowMode::Webhook)
            .cart_finished(cart(DONE, Some(json!({ "site1": { "add_to_cart": [] } }))))
            .await;

        assert!(
            matches!(
                result,
                Err(PurchasesServiceError::Synthesis(SynthesisError::MalformedInput(_)))
            ),
            "expected MalformedInput, got {result:?}"
        );
    }

    #[tokio::test]
    async fn confirm_forwards_api_body() -> TestResult {
        let mut api = MockTwoTapApi::new();

        api.expect_confirm_purchase()
            .once()
            .withf(|purchase_id| purchase_id == "pu1")
            .return_once(|_| Ok(json!({ "message": "still_processing" })));

        let body = service(api, FlowMode::Polling)
            .confirm_purchase("pu1")
            .await?;

        assert_eq!(body, json!({ "message": "still_processing" }));

        Ok(())
    }

    #[tokio::test]
    async fn confirm_propagates_api_errors() {
        let mut api = MockTwoTapApi::new();

        api.expect_confirm_purchase()
            .once()
            .return_once(|_| Err(TwoTapError::UnexpectedResponse("403".to_owned())));

        let result = service(api, FlowMode::Polling).confirm_purchase("pu1").await;

        assert!(
            matches!(result, Err(PurchasesServiceError::Api(_))),
            "expected Api error, got {result:?}"
        );
    }

    #[test]
    fn fields_input_uses_configured_profile() -> TestResult {
        let mut config = config(FlowMode::Polling);
        config.profile.email = "buyer@example.com".to_owned();

        let service = TwoTapPurchasesService::new(Arc::new(MockTwoTapApi::new()), config);

        let fields_input = service.fields_input(sites())?;
        let site = fields_input.get("site1").ok_or("site missing")?;

        assert_eq!(site.noauth_checkout.email, "buyer@example.com");

        Ok(())
    }
}

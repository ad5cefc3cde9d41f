//! App Router

use salvo::Router;

use crate::{carts, fields_input, healthcheck, observability, purchases};

/// Every route the server exposes, without the middleware stack.
pub(crate) fn app_router() -> Router {
    Router::new()
        .push(Router::with_path("healthcheck").get(healthcheck::handler))
        .push(Router::with_path("metrics").get(observability::metrics_handler))
        .push(Router::with_path("purchase").post(purchases::create::handler))
        .push(Router::with_path("purchase_confirm").post(purchases::confirm::handler))
        .push(Router::with_path("purchase_finished").post(purchases::finished::handler))
        .push(Router::with_path("cart_finished").post(carts::finished::handler))
        .push(Router::with_path("fields_input").post(fields_input::handler))
}

#[cfg(test)]
mod tests {
    use salvo::{
        affix_state::inject,
        prelude::*,
        test::{ResponseExt, TestClient},
    };
    use serde_json::json;
    use testresult::TestResult;

    use tapcart_app::purchases::{MockPurchasesService, PurchaseOutcome};

    use crate::test_helpers::{state_with_purchases, strict_purchases_mock};

    use super::*;

    fn service_with(purchases: MockPurchasesService) -> Service {
        Service::new(
            Router::new()
                .hoop(inject(state_with_purchases(purchases)))
                .push(app_router()),
        )
    }

    fn service() -> Service {
        service_with(strict_purchases_mock())
    }

    #[tokio::test]
    async fn healthcheck_is_routed() -> TestResult {
        let body: serde_json::Value = TestClient::get("http://example.com/healthcheck")
            .send(&service())
            .await
            .take_json()
            .await?;

        assert_eq!(body.get("status"), Some(&json!("ok")));

        Ok(())
    }

    #[tokio::test]
    async fn metrics_are_routed() -> TestResult {
        let body = TestClient::get("http://example.com/metrics")
            .send(&service())
            .await
            .take_string()
            .await?;

        assert!(
            body.contains("tapcart_json_http_requests_in_flight"),
            "expected prometheus exposition"
        );

        Ok(())
    }

    #[tokio::test]
    async fn unknown_paths_are_not_found() {
        let res = TestClient::get("http://example.com/products")
            .send(&service())
            .await;

        assert_eq!(res.status_code, Some(StatusCode::NOT_FOUND));
    }

    #[tokio::test]
    async fn polled_purchase_is_counted_once_with_its_callback() -> TestResult {
        // Label unique to this test; the metrics registry is process-wide.
        const MESSAGE: &str = "done_via_polling";

        let mut purchases = MockPurchasesService::new();

        purchases.expect_purchase_product().once().return_once(|_| {
            Ok(PurchaseOutcome {
                cart_id: "c9".to_owned(),
                purchase_id: Some("pu9".to_owned()),
                message: MESSAGE.to_owned(),
            })
        });

        purchases
            .expect_purchase_finished()
            .once()
            .withf(|purchase| purchase.purchase_id == "pu9")
            .return_const(());

        let service = service_with(purchases);

        let purchase = TestClient::post("http://example.com/purchase")
            .json(&json!({ "product_url": "https://shop.example/shirt" }))
            .send(&service)
            .await;

        assert_eq!(purchase.status_code, Some(StatusCode::OK));

        let finished = TestClient::post("http://example.com/purchase_finished")
            .json(&json!({ "purchase_id": "pu9", "message": MESSAGE }))
            .send(&service)
            .await;

        assert_eq!(finished.status_code, Some(StatusCode::OK));

        let metrics = TestClient::get("http://example.com/metrics")
            .send(&service)
            .await
            .take_string()
            .await?;

        assert!(
            metrics.contains(&format!(
                "tapcart_json_purchase_outcomes_total{{message=\"{MESSAGE}\"}} 1\n"
            )),
            "expected a single count, got:\n{metrics}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn failed_cart_is_counted_by_the_purchase_request() -> TestResult {
        const MESSAGE: &str = "failed_before_purchase";

        let mut purchases = MockPurchasesService::new();

        purchases.expect_purchase_product().once().return_once(|_| {
            Ok(PurchaseOutcome {
                cart_id: "c10".to_owned(),
                purchase_id: None,
                message: MESSAGE.to_owned(),
            })
        });

        let service = service_with(purchases);

        let purchase = TestClient::post("http://example.com/purchase")
            .json(&json!({ "product_url": "https://shop.example/shirt" }))
            .send(&service)
            .await;

        assert_eq!(purchase.status_code, Some(StatusCode::OK));

        let metrics = TestClient::get("http://example.com/metrics")
            .send(&service)
            .await
            .take_string()
            .await?;

        assert!(
            metrics.contains(&format!(
                "tapcart_json_purchase_outcomes_total{{message=\"{MESSAGE}\"}} 1\n"
            )),
            "expected the failed cart to be counted, got:\n{metrics}"
        );

        Ok(())
    }
}

//! Purchase Confirm Callback

use salvo::prelude::*;
use serde_json::Value;
use tracing::warn;

use tapcart_app::twotap::models::ConfirmRequest;

use crate::{extensions::*, purchases::into_status_error};

/// SMS confirmation callback. TwoTap calls this once the shopper has agreed to
/// the purchase; the confirmation is forwarded with the private token and
/// TwoTap's answer is returned unchanged.
#[handler]
pub(crate) async fn handler(
    req: &mut Request,
    depot: &mut Depot,
) -> Result<Json<Value>, StatusError> {
    let state = depot.state()?;

    let confirm: ConfirmRequest = req.parse_json().await.map_err(|source| {
        warn!("invalid purchase_confirm payload: {source}");

        StatusError::bad_request().brief("Invalid purchase_confirm payload")
    })?;

    let response = state
        .purchases
        .confirm_purchase(&confirm.purchase_id)
        .await
        .map_err(into_status_error)?;

    Ok(Json(response))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use serde_json::json;
    use testresult::TestResult;

    use tapcart_app::purchases::MockPurchasesService;

    use crate::test_helpers::{purchases_service, strict_purchases_mock};

    use super::*;

    fn make_service(purchases: MockPurchasesService) -> Service {
        purchases_service(purchases, Router::with_path("purchase_confirm").post(handler))
    }

    #[tokio::test]
    async fn test_confirm_forwards_twotap_response() -> TestResult {
        let mut purchases = MockPurchasesService::new();

        purchases
            .expect_confirm_purchase()
            .once()
            .withf(|purchase_id| purchase_id == "58f0")
            .return_once(|_| Ok(json!({ "message": "still_processing" })));

        let mut res = TestClient::post("http://example.com/purchase_confirm")
            .json(&json!({ "purchase_id": "58f0" }))
            .send(&make_service(purchases))
            .await;

        let body: Value = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert_eq!(body, json!({ "message": "still_processing" }));

        Ok(())
    }

    #[tokio::test]
    async fn test_confirm_without_purchase_id_returns_400() {
        let res = TestClient::post("http://example.com/purchase_confirm")
            .json(&json!({ "message": "done" }))
            .send(&make_service(strict_purchases_mock()))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));
    }
}

//! Purchase Product Handler

use salvo::{
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};

use crate::{
    extensions::*,
    purchases::{PurchaseResponse, into_status_error, observe_settled},
};

/// Purchase Product Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct PurchaseProductRequest {
    /// Product page URL on a TwoTap-supported store
    #[serde(default)]
    pub product_url: Option<String>,
}

/// Purchase Product Handler
///
/// In polling mode this waits until TwoTap settles the purchase. In webhook
/// mode it returns as soon as the cart has been created.
#[endpoint(
    tags("purchases"),
    summary = "Purchase Product",
    responses(
        (status_code = StatusCode::OK, description = "Purchase outcome"),
        (status_code = StatusCode::BAD_REQUEST, description = "Missing product URL"),
        (status_code = StatusCode::UNPROCESSABLE_ENTITY, description = "Fields input could not be built"),
        (status_code = StatusCode::BAD_GATEWAY, description = "TwoTap request failed"),
        (status_code = StatusCode::GATEWAY_TIMEOUT, description = "TwoTap did not settle in time"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<PurchaseProductRequest>,
    depot: &mut Depot,
) -> Result<Json<PurchaseResponse>, StatusError> {
    let state = depot.state()?;

    let product_url = json
        .into_inner()
        .product_url
        .map(|url| url.trim().to_owned())
        .filter(|url| !url.is_empty())
        .ok_or_else(|| StatusError::bad_request().brief("Missing product_url"))?;

    let outcome = state
        .purchases
        .purchase_product(&product_url)
        .await
        .map_err(into_status_error)?;

    observe_settled(&outcome);

    Ok(Json(outcome.into()))
}

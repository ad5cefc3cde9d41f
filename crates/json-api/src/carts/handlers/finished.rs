//! Cart Finished Callback

use salvo::prelude::*;
use tracing::{info, warn};

use tapcart_app::twotap::models::CartStatus;

use crate::{
    extensions::*,
    purchases::{PurchaseResponse, into_status_error, observe_settled},
};

/// Webhook TwoTap calls once a cart has been processed. A `done` cart gets
/// its fields input synthesized and the purchase triggered.
#[handler]
pub(crate) async fn handler(
    req: &mut Request,
    depot: &mut Depot,
) -> Result<Json<PurchaseResponse>, StatusError> {
    let state = depot.state()?;

    let cart: CartStatus = req.parse_json().await.map_err(|source| {
        warn!("invalid cart_finished payload: {source}");

        StatusError::bad_request().brief("Invalid cart_finished payload")
    })?;

    info!(cart_id = %cart.cart_id, message = %cart.message, "cart finished");

    let outcome = state
        .purchases
        .cart_finished(cart)
        .await
        .map_err(into_status_error)?;

    observe_settled(&outcome);

    Ok(Json(outcome.into()))
}

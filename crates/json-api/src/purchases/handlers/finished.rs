//! Purchase Finished Callback

use salvo::prelude::*;
use tracing::warn;

use tapcart_app::twotap::models::PurchaseStatus;

use crate::{extensions::*, observability::observe_purchase_outcome};

/// Webhook TwoTap calls once a purchase has completed or failed.
#[handler]
pub(crate) async fn handler(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<(), StatusError> {
    let state = depot.state()?;

    let purchase: PurchaseStatus = req.parse_json().await.map_err(|source| {
        warn!("invalid purchase_finished payload: {source}");

        StatusError::bad_request().brief("Invalid purchase_finished payload")
    })?;

    observe_purchase_outcome(&purchase.message);

    state.purchases.purchase_finished(purchase).await;

    res.status_code(StatusCode::OK);

    Ok(())
}

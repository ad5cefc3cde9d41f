//! Fields Input Handler

use salvo::prelude::*;
use serde_json::Value;
use tracing::warn;

use tapcart::fields::FieldsInput;

use crate::{extensions::*, purchases::synthesis_status_error};

/// Build the TwoTap fields input for posted cart sites with the configured
/// checkout profile. Accepts either the `sites` object or a whole cart status.
#[handler]
pub(crate) async fn handler(
    req: &mut Request,
    depot: &mut Depot,
) -> Result<Json<FieldsInput>, StatusError> {
    let state = depot.state()?;

    let mut body: Value = req.parse_json().await.map_err(|source| {
        warn!("invalid fields_input payload: {source}");

        StatusError::bad_request().brief("Invalid JSON body")
    })?;

    let cart_sites = body.get_mut("sites").map(Value::take).unwrap_or(body);

    state
        .purchases
        .fields_input(cart_sites)
        .map(Json)
        .map_err(synthesis_status_error)
}

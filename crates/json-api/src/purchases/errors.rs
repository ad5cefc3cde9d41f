//! Purchase flow errors

use salvo::http::StatusError;
use tracing::{error, warn};

use tapcart::synthesis::SynthesisError;
use tapcart_app::purchases::PurchasesServiceError;

pub(crate) fn into_status_error(error: PurchasesServiceError) -> StatusError {
    match error {
        PurchasesServiceError::Synthesis(source) => synthesis_status_error(source),
        PurchasesServiceError::Api(source) => {
            error!("TwoTap request failed: {source}");

            StatusError::bad_gateway().brief("TwoTap request failed")
        }
        PurchasesServiceError::MissingSites { cart_id } => {
            error!(cart_id = %cart_id, "TwoTap finished a cart without sites");

            StatusError::bad_gateway().brief("TwoTap returned a cart without sites")
        }
        PurchasesServiceError::TimedOut { what, id } => {
            warn!(what, id = %id, "gave up waiting for TwoTap");

            StatusError::gateway_timeout().brief(format!("Timed out waiting for {what} {id}"))
        }
    }
}

/// Unusable cart sites are the caller's problem, not ours.
pub(crate) fn synthesis_status_error(error: SynthesisError) -> StatusError {
    warn!("could not build fields input: {error}");

    StatusError::unprocessable_entity().brief(error.to_string())
}

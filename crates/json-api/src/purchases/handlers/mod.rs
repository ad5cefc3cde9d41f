//! Purchase Handlers

pub(crate) mod confirm;
pub(crate) mod create;
pub(crate) mod finished;

use salvo::oapi::ToSchema;
use serde::{Deserialize, Serialize};

use tapcart_app::{purchases::PurchaseOutcome, twotap::models::STILL_PROCESSING};

use crate::observability::observe_purchase_outcome;

/// Purchase Outcome Response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub(crate) struct PurchaseResponse {
    /// TwoTap cart id
    pub cart_id: String,

    /// TwoTap purchase id, once a purchase has been triggered
    pub purchase_id: Option<String>,

    /// Last status message reported by TwoTap
    pub message: String,
}

impl From<PurchaseOutcome> for PurchaseResponse {
    fn from(outcome: PurchaseOutcome) -> Self {
        Self {
            cart_id: outcome.cart_id,
            purchase_id: outcome.purchase_id,
            message: outcome.message,
        }
    }
}

/// Count outcomes that never reach `purchase_finished`. Once TwoTap has a
/// purchase id it reports the result to that callback, which does the counting.
pub(crate) fn observe_settled(outcome: &PurchaseOutcome) {
    if outcome.purchase_id.is_none() && outcome.message != STILL_PROCESSING {
        observe_purchase_outcome(&outcome.message);
    }
}

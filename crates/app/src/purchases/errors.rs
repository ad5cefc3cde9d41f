//! Purchases service errors.

use thiserror::Error;

use tapcart::synthesis::SynthesisError;

use crate::twotap::TwoTapError;

#[derive(Debug, Error)]
pub enum PurchasesServiceError {
    #[error("TwoTap request failed")]
    Api(#[from] TwoTapError),

    #[error("could not build fields input")]
    Synthesis(#[from] SynthesisError),

    #[error("cart {cart_id} finished without sites")]
    MissingSites { cart_id: String },

    #[error("timed out waiting for {what} {id}")]
    TimedOut { what: &'static str, id: String },
}

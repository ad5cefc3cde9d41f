//! Shared handler state.

use std::sync::Arc;

use tapcart_app::{context::AppContext, purchases::PurchasesService};

#[derive(Clone)]
pub(crate) struct State {
    pub(crate) purchases: Arc<dyn PurchasesService>,
}

impl State {
    #[must_use]
    pub(crate) fn from_app_context(app: AppContext) -> Arc<Self> {
        Arc::new(Self {
            purchases: app.purchases,
        })
    }
}

//! App Context

use std::sync::Arc;

use crate::{
    purchases::{PurchasesConfig, PurchasesService, TwoTapPurchasesService},
    twotap::{TwoTapClient, TwoTapConfig},
};

#[derive(Clone)]
pub struct AppContext {
    pub purchases: Arc<dyn PurchasesService>,
}

impl AppContext {
    /// Build application context backed by the TwoTap API.
    #[must_use]
    pub fn from_config(twotap: TwoTapConfig, purchases: PurchasesConfig) -> Self {
        let api = Arc::new(TwoTapClient::new(twotap));

        Self {
            purchases: Arc::new(TwoTapPurchasesService::new(api, purchases)),
        }
    }
}

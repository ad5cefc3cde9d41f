//! Test helpers.

use std::sync::Arc;

use salvo::{affix_state::inject, prelude::*};

use tapcart_app::{context::AppContext, purchases::MockPurchasesService};

use crate::state::State;

/// Mock that fails the test on any call the test did not set up.
pub(crate) fn strict_purchases_mock() -> MockPurchasesService {
    let mut purchases = MockPurchasesService::new();

    purchases.expect_purchase_product().never();
    purchases.expect_cart_finished().never();
    purchases.expect_confirm_purchase().never();
    purchases.expect_purchase_finished().never();
    purchases.expect_fields_input().never();

    purchases
}

pub(crate) fn state_with_purchases(purchases: MockPurchasesService) -> Arc<State> {
    State::from_app_context(AppContext {
        purchases: Arc::new(purchases),
    })
}

pub(crate) fn purchases_service(purchases: MockPurchasesService, route: Router) -> Service {
    Service::new(
        Router::new()
            .hoop(inject(state_with_purchases(purchases)))
            .push(route),
    )
}

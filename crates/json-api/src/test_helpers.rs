//! Test helpers.

use std::sync::Arc;

use salvo::{affix_state::inject, prelude::*};

use bazaar_app::{
    context::AppContext,
    domain::{coupons::MockCouponsService, orders::MockOrdersService},
};

use crate::state::State;

fn state(coupons: MockCouponsService, orders: MockOrdersService) -> Arc<State> {
    State::from_app_context(AppContext {
        coupons: Arc::new(coupons),
        orders: Arc::new(orders),
    })
}

fn service(state: Arc<State>, route: Router) -> Service {
    Service::new(Router::new().hoop(inject(state)).push(route))
}

/// Serve `route` with `coupons`; any orders call fails the test.
pub(crate) fn coupons_service(coupons: MockCouponsService, route: Router) -> Service {
    service(state(coupons, MockOrdersService::new()), route)
}

/// Serve `route` with `orders`; any coupons call fails the test.
pub(crate) fn orders_service(orders: MockOrdersService, route: Router) -> Service {
    service(state(MockCouponsService::new(), orders), route)
}

//! App Router

use salvo::Router;

use crate::{coupons, orders};

pub(crate) fn app_router() -> Router {
    Router::new()
        .push(
            Router::with_path("coupons")
                .get(coupons::index::handler)
                .post(coupons::create::handler)
                .push(Router::with_path("validate").post(coupons::validate::handler))
                .push(
                    Router::with_path("{coupon}")
                        .get(coupons::get::handler)
                        .put(coupons::update::handler)
                        .delete(coupons::delete::handler),
                ),
        )
        .push(
            Router::with_path("orders")
                .get(orders::index::handler)
                .post(orders::create::handler)
                .push(
                    Router::with_path("{order}")
                        .get(orders::get::handler)
                        .patch(orders::update::handler)
                        .push(
                            Router::with_path("notes")
                                .get(orders::notes::index::handler)
                                .post(orders::notes::create::handler),
                        ),
                ),
        )
}

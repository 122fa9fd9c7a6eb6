//! Test context for service-level integration tests.

use bazaar::orders::StatusMachine;

use crate::{
    database::Db,
    domain::{coupons::PgCouponsService, orders::PgOrdersService},
    notifications::NotificationDispatcher,
};

use super::db::TestDb;

pub(crate) struct TestContext {
    pub db: TestDb,
    pub coupons: PgCouponsService,

    /// Permissive orders service that logs notifications.
    pub orders: PgOrdersService,
}

impl TestContext {
    pub async fn new() -> Self {
        let db = TestDb::new().await;
        let pool = Db::new(db.pool().clone());

        Self {
            coupons: PgCouponsService::new(pool.clone()),
            orders: PgOrdersService::new(
                pool,
                StatusMachine::default(),
                NotificationDispatcher::default(),
            ),
            db,
        }
    }

    /// An orders service over the same database with its own policy and
    /// notifier.
    pub fn orders_with(
        &self,
        machine: StatusMachine,
        notifications: NotificationDispatcher,
    ) -> PgOrdersService {
        PgOrdersService::new(Db::new(self.db.pool().clone()), machine, notifications)
    }
}

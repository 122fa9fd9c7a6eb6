//! Orders Service

use async_trait::async_trait;
use bazaar::{
    coupons::{Rejection, validate_coupon},
    orders::{
        NoteKind, NoteLedger, OrderLifecycle, OrderTotals, StatusMachine, TaggedNote, subtotal,
    },
};
use jiff::Timestamp;
use mockall::automock;
use rand::rngs::OsRng;
use rust_decimal::Decimal;
use rustc_hash::FxHashMap;
use sqlx::{Postgres, Transaction};
use tracing::{Span, info, warn};

use crate::{
    database::Db,
    domain::{
        coupons::{records::CouponUuid, repository::PgCouponsRepository},
        orders::{
            OrdersServiceError,
            data::{CustomerInfo, NewNote, NewOrder, OrderPatch},
            number::OrderNumber,
            records::{OrderRecord, OrderUpdate, OrderUuid},
            repositories::{notes::PgNotesRepository, orders::PgOrdersRepository},
        },
    },
    notifications::{NotificationDispatcher, OrderEvent},
};

/// Order numbers are random; collisions are retried this many times.
const ORDER_NUMBER_ATTEMPTS: usize = 5;

#[derive(Debug, Clone)]
pub struct PgOrdersService {
    db: Db,
    orders: PgOrdersRepository,
    notes: PgNotesRepository,
    coupons: PgCouponsRepository,
    machine: StatusMachine,
    notifications: NotificationDispatcher,
}

impl PgOrdersService {
    #[must_use]
    pub fn new(db: Db, machine: StatusMachine, notifications: NotificationDispatcher) -> Self {
        Self {
            db,
            orders: PgOrdersRepository::new(),
            notes: PgNotesRepository::new(),
            coupons: PgCouponsRepository::new(),
            machine,
            notifications,
        }
    }

    async fn load_notes(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: &mut OrderRecord,
    ) -> Result<(), OrdersServiceError> {
        let notes = self.notes.list_notes(tx, order.uuid).await?;

        order.lifecycle.notes = NoteLedger::from_notes(notes);

        Ok(())
    }

    /// Validate and redeem `order`'s coupon, returning its uuid and discount.
    async fn redeem_coupon(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: &NewOrder,
        subtotal: Decimal,
        now: Timestamp,
    ) -> Result<Option<(CouponUuid, Decimal)>, OrdersServiceError> {
        let Some(code) = &order.coupon_code else {
            return Ok(None);
        };

        let Some(record) = self.coupons.find_coupon_by_code(tx, code).await? else {
            return Err(Rejection::NotFound.into());
        };

        let summary = validate_coupon(Some(&record.coupon), subtotal, now).into_result()?;

        if self.coupons.redeem_coupon(tx, record.uuid).await? == 0 {
            return Err(Rejection::UsageLimitReached.into());
        }

        Ok(Some((record.uuid, summary.discount)))
    }
}

fn check_customer(customer: &CustomerInfo) -> Result<(), OrdersServiceError> {
    if customer.name.trim().is_empty() {
        return Err(OrdersServiceError::MissingCustomerDetail("name"));
    }

    if customer.email.trim().is_empty() {
        return Err(OrdersServiceError::MissingCustomerDetail("email"));
    }

    Ok(())
}

#[async_trait]
impl OrdersService for PgOrdersService {
    async fn list_orders(&self) -> Result<Vec<OrderRecord>, OrdersServiceError> {
        let mut tx = self.db.begin().await?;

        let mut orders = self.orders.list_orders(&mut tx).await?;

        let uuids: Vec<OrderUuid> = orders.iter().map(|order| order.uuid).collect();

        let mut notes: FxHashMap<OrderUuid, Vec<TaggedNote>> = FxHashMap::default();

        for (order, note) in self.notes.list_notes_for_orders(&mut tx, &uuids).await? {
            notes.entry(order).or_default().push(note);
        }

        tx.commit().await?;

        for order in &mut orders {
            if let Some(order_notes) = notes.remove(&order.uuid) {
                order.lifecycle.notes = NoteLedger::from_notes(order_notes);
            }
        }

        Ok(orders)
    }

    async fn get_order(&self, order: OrderUuid) -> Result<OrderRecord, OrdersServiceError> {
        let mut tx = self.db.begin().await?;

        let mut order = self.orders.get_order(&mut tx, order).await?;

        self.load_notes(&mut tx, &mut order).await?;

        tx.commit().await?;

        Ok(order)
    }

    #[tracing::instrument(
        name = "orders.service.create_order",
        skip(self, order),
        fields(
            order_uuid = %order.uuid,
            order_number = tracing::field::Empty,
            item_count = order.items.len(),
            coupon_code = tracing::field::Empty
        ),
        err
    )]
    async fn create_order(&self, order: NewOrder) -> Result<OrderRecord, OrdersServiceError> {
        check_customer(&order.customer)?;

        let subtotal = subtotal(&order.items)?;
        let now = Timestamp::now();
        let span = Span::current();

        if let Some(code) = &order.coupon_code {
            span.record("coupon_code", tracing::field::display(code));
        }

        let mut lifecycle = OrderLifecycle::default();

        if let Some(text) = &order.customer_note {
            lifecycle
                .notes
                .append(NoteKind::Customer, text, &order.customer.email, now)?;
        }

        let mut tx = self.db.begin().await?;

        let redemption = self.redeem_coupon(&mut tx, &order, subtotal, now).await?;
        let discount = redemption.map_or(Decimal::ZERO, |(_, discount)| discount);

        let mut record = OrderRecord {
            uuid: order.uuid,
            order_number: OrderNumber::generate(now, &mut OsRng),
            customer: order.customer,
            items: order.items,
            totals: OrderTotals::new(subtotal, discount),
            coupon_code: order.coupon_code,
            lifecycle,
            created_at: now,
            updated_at: now,
        };

        let coupon = redemption.map(|(coupon, _)| coupon);
        let mut attempts = 1;

        while !self.orders.create_order(&mut tx, &record, coupon).await? {
            if attempts == ORDER_NUMBER_ATTEMPTS {
                return Err(OrdersServiceError::OrderNumberExhausted);
            }

            attempts += 1;
            record.order_number = OrderNumber::generate(now, &mut OsRng);
        }

        for note in record.lifecycle.notes.customer() {
            self.notes
                .create_note(&mut tx, record.uuid, NoteKind::Customer, note)
                .await?;
        }

        tx.commit().await?;

        span.record("order_number", tracing::field::display(&record.order_number));

        info!(
            order_uuid = %record.uuid,
            total = %record.totals.total,
            "created order"
        );

        Ok(record)
    }

    #[tracing::instrument(
        name = "orders.service.update_order",
        skip(self, patch),
        fields(
            order_uuid = %order,
            order_status_changed = tracing::field::Empty,
            payment_status_changed = tracing::field::Empty
        ),
        err
    )]
    async fn update_order(
        &self,
        order: OrderUuid,
        patch: OrderPatch,
    ) -> Result<OrderUpdate, OrdersServiceError> {
        let now = Timestamp::now();

        let mut tx = self.db.begin().await?;

        let mut record = self.orders.lock_order(&mut tx, order).await?;

        self.load_notes(&mut tx, &mut record).await?;

        let applied =
            self.machine
                .apply(&mut record.lifecycle, patch.changes, &patch.updated_by, now)?;

        let change = applied.change;

        if change.unlisted_transition {
            warn!(
                order_uuid = %order,
                from = %change.previous_order_status,
                to = %record.lifecycle.status,
                "order moved outside the regular lifecycle"
            );
        }

        if change.has_changes() {
            self.orders
                .update_lifecycle(&mut tx, order, &record.lifecycle, now)
                .await?;

            record.updated_at = now;
        }

        if let Some(note) = &applied.admin_note {
            self.notes
                .create_note(&mut tx, order, NoteKind::Admin, note)
                .await?;
        }

        tx.commit().await?;

        let span = Span::current();

        span.record("order_status_changed", change.order_status_changed);
        span.record("payment_status_changed", change.payment_status_changed);

        self.notifications.dispatch(OrderEvent::new(&record, change));

        info!(order_uuid = %order, "updated order");

        Ok(OrderUpdate {
            order: record,
            change,
        })
    }

    #[tracing::instrument(
        name = "orders.service.add_note",
        skip(self, note),
        fields(order_uuid = %order, note_kind = %note.kind),
        err
    )]
    async fn add_note(
        &self,
        order: OrderUuid,
        note: NewNote,
    ) -> Result<TaggedNote, OrdersServiceError> {
        let mut ledger = NoteLedger::default();

        let created = ledger.append(note.kind, &note.text, &note.created_by, Timestamp::now())?;

        let mut tx = self.db.begin().await?;

        if !self.orders.order_exists(&mut tx, order).await? {
            return Err(OrdersServiceError::NotFound);
        }

        self.notes
            .create_note(&mut tx, order, note.kind, &created)
            .await?;

        tx.commit().await?;

        info!(order_uuid = %order, "added order note");

        Ok(TaggedNote {
            kind: note.kind,
            note: created,
        })
    }

    async fn list_notes(&self, order: OrderUuid) -> Result<Vec<TaggedNote>, OrdersServiceError> {
        let mut tx = self.db.begin().await?;

        if !self.orders.order_exists(&mut tx, order).await? {
            return Err(OrdersServiceError::NotFound);
        }

        let notes = self.notes.list_notes(&mut tx, order).await?;

        tx.commit().await?;

        Ok(NoteLedger::from_notes(notes).timeline())
    }
}

#[automock]
#[async_trait]
pub trait OrdersService: Send + Sync {
    /// Orders newest first, with their notes.
    async fn list_orders(&self) -> Result<Vec<OrderRecord>, OrdersServiceError>;

    /// Retrieve a single order with its notes.
    async fn get_order(&self, order: OrderUuid) -> Result<OrderRecord, OrdersServiceError>;

    /// Place an order, redeeming its coupon if one is given.
    async fn create_order(&self, order: NewOrder) -> Result<OrderRecord, OrdersServiceError>;

    /// Apply a status patch and notify the customer about what changed.
    async fn update_order(
        &self,
        order: OrderUuid,
        patch: OrderPatch,
    ) -> Result<OrderUpdate, OrdersServiceError>;

    /// Append an admin or customer note.
    async fn add_note(&self, order: OrderUuid, note: NewNote)
    -> Result<TaggedNote, OrdersServiceError>;

    /// All notes on an order, newest first.
    async fn list_notes(&self, order: OrderUuid) -> Result<Vec<TaggedNote>, OrdersServiceError>;
}

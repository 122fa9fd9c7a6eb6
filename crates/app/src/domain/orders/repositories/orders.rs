//! Orders Repository

use bazaar::{
    coupons::CouponCode,
    orders::{LineItem, OrderLifecycle, OrderStatus, OrderTotals, PaymentStatus, TrackingInfo},
};
use jiff::Timestamp;
use jiff_sqlx::Timestamp as SqlxTimestamp;
use rust_decimal::Decimal;
use sqlx::{
    FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as, query_scalar,
    types::Json,
};

use crate::domain::{
    coupons::records::CouponUuid,
    orders::{
        data::CustomerInfo,
        number::OrderNumber,
        records::{OrderRecord, OrderUuid},
    },
};

const LIST_ORDERS_SQL: &str = include_str!("../sql/list_orders.sql");
const GET_ORDER_SQL: &str = include_str!("../sql/get_order.sql");
const LOCK_ORDER_SQL: &str = include_str!("../sql/lock_order.sql");
const CREATE_ORDER_SQL: &str = include_str!("../sql/create_order.sql");
const UPDATE_ORDER_LIFECYCLE_SQL: &str = include_str!("../sql/update_order_lifecycle.sql");
const ORDER_EXISTS_SQL: &str = include_str!("../sql/order_exists.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgOrdersRepository;

impl PgOrdersRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    /// Orders newest first, without notes.
    pub(crate) async fn list_orders(
        &self,
        tx: &mut Transaction<'_, Postgres>,
    ) -> Result<Vec<OrderRecord>, sqlx::Error> {
        query_as::<Postgres, OrderRecord>(LIST_ORDERS_SQL)
            .fetch_all(&mut **tx)
            .await
    }

    /// A single order, without notes.
    pub(crate) async fn get_order(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
    ) -> Result<OrderRecord, sqlx::Error> {
        query_as::<Postgres, OrderRecord>(GET_ORDER_SQL)
            .bind(order.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    /// A single order, locked until `tx` ends.
    pub(crate) async fn lock_order(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
    ) -> Result<OrderRecord, sqlx::Error> {
        query_as::<Postgres, OrderRecord>(LOCK_ORDER_SQL)
            .bind(order.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn order_exists(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
    ) -> Result<bool, sqlx::Error> {
        query_scalar::<Postgres, bool>(ORDER_EXISTS_SQL)
            .bind(order.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    /// Insert `order`, returning `false` when its order number is taken.
    pub(crate) async fn create_order(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: &OrderRecord,
        coupon: Option<CouponUuid>,
    ) -> Result<bool, sqlx::Error> {
        let rows_affected = query(CREATE_ORDER_SQL)
            .bind(order.uuid.into_uuid())
            .bind(order.order_number.as_str())
            .bind(Json(&order.customer))
            .bind(Json(&order.items))
            .bind(order.totals.subtotal)
            .bind(order.totals.discount)
            .bind(order.totals.total)
            .bind(coupon.map(CouponUuid::into_uuid))
            .bind(order.coupon_code.as_ref().map(CouponCode::as_str))
            .bind(order.lifecycle.status.as_str())
            .bind(order.lifecycle.payment_status.as_str())
            .bind(order.lifecycle.tracking.as_ref().map(Json))
            .bind(SqlxTimestamp::from(order.created_at))
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected == 1)
    }

    pub(crate) async fn update_lifecycle(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
        lifecycle: &OrderLifecycle,
        updated_at: Timestamp,
    ) -> Result<(), sqlx::Error> {
        query(UPDATE_ORDER_LIFECYCLE_SQL)
            .bind(order.into_uuid())
            .bind(lifecycle.status.as_str())
            .bind(lifecycle.payment_status.as_str())
            .bind(lifecycle.tracking.as_ref().map(Json))
            .bind(SqlxTimestamp::from(updated_at))
            .execute(&mut **tx)
            .await?;

        Ok(())
    }
}

fn decode_error<E>(column: &str, error: E) -> sqlx::Error
where
    E: std::error::Error + Send + Sync + 'static,
{
    sqlx::Error::ColumnDecode {
        index: column.to_string(),
        source: Box::new(error),
    }
}

impl<'r> FromRow<'r, PgRow> for OrderRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let status = row
            .try_get::<String, _>("status")?
            .parse::<OrderStatus>()
            .map_err(|e| decode_error("status", e))?;

        let payment_status = row
            .try_get::<String, _>("payment_status")?
            .parse::<PaymentStatus>()
            .map_err(|e| decode_error("payment_status", e))?;

        let coupon_code = row
            .try_get::<Option<String>, _>("coupon_code")?
            .map(|code| CouponCode::parse(&code))
            .transpose()
            .map_err(|e| decode_error("coupon_code", e))?;

        let totals = OrderTotals {
            subtotal: row.try_get::<Decimal, _>("subtotal")?,
            discount: row.try_get::<Decimal, _>("discount")?,
            total: row.try_get::<Decimal, _>("total")?,
        };

        Ok(Self {
            uuid: OrderUuid::from_uuid(row.try_get("uuid")?),
            order_number: OrderNumber::from(row.try_get::<String, _>("order_number")?),
            customer: row.try_get::<Json<CustomerInfo>, _>("customer_info")?.0,
            items: row.try_get::<Json<Vec<LineItem>>, _>("items")?.0,
            totals,
            coupon_code,
            lifecycle: OrderLifecycle {
                status,
                payment_status,
                tracking: row
                    .try_get::<Option<Json<TrackingInfo>>, _>("tracking_info")?
                    .map(|tracking| tracking.0),
                ..OrderLifecycle::default()
            },
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}

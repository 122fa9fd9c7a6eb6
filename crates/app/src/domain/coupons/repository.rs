//! Coupons Repository

use bazaar::{
    coupons::{Coupon, CouponCode, CouponTerms},
    discounts::{DiscountTerms, DiscountType},
};
use jiff_sqlx::Timestamp as SqlxTimestamp;
use rust_decimal::Decimal;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as};

use crate::domain::coupons::{
    data::{CouponApplicability, CouponUpdate, NewCoupon},
    records::{CouponRecord, CouponUuid},
};

const LIST_COUPONS_SQL: &str = include_str!("sql/list_coupons.sql");
const GET_COUPON_SQL: &str = include_str!("sql/get_coupon.sql");
const FIND_COUPON_BY_CODE_SQL: &str = include_str!("sql/find_coupon_by_code.sql");
const CREATE_COUPON_SQL: &str = include_str!("sql/create_coupon.sql");
const UPDATE_COUPON_SQL: &str = include_str!("sql/update_coupon.sql");
const DELETE_COUPON_SQL: &str = include_str!("sql/delete_coupon.sql");
const REDEEM_COUPON_SQL: &str = include_str!("sql/redeem_coupon.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgCouponsRepository;

impl PgCouponsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn list_coupons(
        &self,
        tx: &mut Transaction<'_, Postgres>,
    ) -> Result<Vec<CouponRecord>, sqlx::Error> {
        query_as::<Postgres, CouponRecord>(LIST_COUPONS_SQL)
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn get_coupon(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        coupon: CouponUuid,
    ) -> Result<CouponRecord, sqlx::Error> {
        query_as::<Postgres, CouponRecord>(GET_COUPON_SQL)
            .bind(coupon.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn find_coupon_by_code(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        code: &CouponCode,
    ) -> Result<Option<CouponRecord>, sqlx::Error> {
        query_as::<Postgres, CouponRecord>(FIND_COUPON_BY_CODE_SQL)
            .bind(code.as_str())
            .fetch_optional(&mut **tx)
            .await
    }

    pub(crate) async fn create_coupon(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        coupon: &NewCoupon,
    ) -> Result<CouponRecord, sqlx::Error> {
        let terms = &coupon.terms;
        let applicability = &coupon.applicability;

        query_as::<Postgres, CouponRecord>(CREATE_COUPON_SQL)
            .bind(coupon.uuid.into_uuid())
            .bind(coupon.code.as_str())
            .bind(coupon.description.as_deref())
            .bind(terms.discount.discount_type.as_str())
            .bind(terms.discount.value)
            .bind(terms.discount.max_amount)
            .bind(terms.min_order_amount)
            .bind(encode_usage_limit(terms)?)
            .bind(encode_count(terms.usage_per_customer, "usage_per_customer")?)
            .bind(SqlxTimestamp::from(terms.starts_at))
            .bind(SqlxTimestamp::from(terms.ends_at))
            .bind(terms.is_active)
            .bind(applicability.applicable_categories.as_slice())
            .bind(applicability.excluded_categories.as_slice())
            .bind(applicability.applicable_products.as_slice())
            .bind(applicability.excluded_products.as_slice())
            .bind(applicability.restrict_to_new_customers)
            .bind(applicability.applicable_customers.as_slice())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn update_coupon(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        coupon: CouponUuid,
        update: &CouponUpdate,
    ) -> Result<CouponRecord, sqlx::Error> {
        let terms = &update.terms;
        let applicability = &update.applicability;

        query_as::<Postgres, CouponRecord>(UPDATE_COUPON_SQL)
            .bind(coupon.into_uuid())
            .bind(update.description.as_deref())
            .bind(terms.discount.discount_type.as_str())
            .bind(terms.discount.value)
            .bind(terms.discount.max_amount)
            .bind(terms.min_order_amount)
            .bind(encode_usage_limit(terms)?)
            .bind(encode_count(terms.usage_per_customer, "usage_per_customer")?)
            .bind(SqlxTimestamp::from(terms.starts_at))
            .bind(SqlxTimestamp::from(terms.ends_at))
            .bind(terms.is_active)
            .bind(applicability.applicable_categories.as_slice())
            .bind(applicability.excluded_categories.as_slice())
            .bind(applicability.applicable_products.as_slice())
            .bind(applicability.excluded_products.as_slice())
            .bind(applicability.restrict_to_new_customers)
            .bind(applicability.applicable_customers.as_slice())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn delete_coupon(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        coupon: CouponUuid,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(DELETE_COUPON_SQL)
            .bind(coupon.into_uuid())
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }

    /// Count one redemption unless the usage limit is already reached.
    ///
    /// Returns the number of rows updated; zero means no redemption was
    /// recorded.
    pub(crate) async fn redeem_coupon(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        coupon: CouponUuid,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(REDEEM_COUPON_SQL)
            .bind(coupon.into_uuid())
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }
}

fn encode_count(value: u32, column: &str) -> Result<i32, sqlx::Error> {
    i32::try_from(value).map_err(|e| sqlx::Error::ColumnDecode {
        index: column.to_string(),
        source: Box::new(e),
    })
}

fn encode_usage_limit(terms: &CouponTerms) -> Result<Option<i32>, sqlx::Error> {
    terms
        .usage_limit
        .map(|limit| encode_count(limit, "usage_limit"))
        .transpose()
}

fn decode_count(value: i32, column: &str) -> Result<u32, sqlx::Error> {
    u32::try_from(value).map_err(|e| sqlx::Error::ColumnDecode {
        index: column.to_string(),
        source: Box::new(e),
    })
}

impl<'r> FromRow<'r, PgRow> for CouponRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let code: String = row.try_get("code")?;

        let code = CouponCode::parse(&code).map_err(|e| sqlx::Error::ColumnDecode {
            index: "code".to_string(),
            source: Box::new(e),
        })?;

        let discount_type: String = row.try_get("discount_type")?;

        let discount_type =
            discount_type
                .parse::<DiscountType>()
                .map_err(|e| sqlx::Error::ColumnDecode {
                    index: "discount_type".to_string(),
                    source: Box::new(e),
                })?;

        let usage_limit = row
            .try_get::<Option<i32>, _>("usage_limit")?
            .map(|limit| decode_count(limit, "usage_limit"))
            .transpose()?;

        let terms = CouponTerms {
            discount: DiscountTerms {
                discount_type,
                value: row.try_get::<Decimal, _>("discount_value")?,
                max_amount: row.try_get::<Option<Decimal>, _>("max_discount_amount")?,
            },
            min_order_amount: row.try_get::<Decimal, _>("min_order_amount")?,
            usage_limit,
            usage_per_customer: decode_count(
                row.try_get("usage_per_customer")?,
                "usage_per_customer",
            )?,
            starts_at: row.try_get::<SqlxTimestamp, _>("starts_at")?.to_jiff(),
            ends_at: row.try_get::<SqlxTimestamp, _>("ends_at")?.to_jiff(),
            is_active: row.try_get("is_active")?,
        };

        Ok(Self {
            uuid: CouponUuid::from_uuid(row.try_get("uuid")?),
            description: row.try_get("description")?,
            coupon: Coupon {
                code,
                terms,
                current_usage: decode_count(row.try_get("current_usage")?, "current_usage")?,
            },
            applicability: CouponApplicability {
                applicable_categories: row.try_get("applicable_categories")?,
                excluded_categories: row.try_get("excluded_categories")?,
                applicable_products: row.try_get("applicable_products")?,
                excluded_products: row.try_get("excluded_products")?,
                restrict_to_new_customers: row.try_get("restrict_to_new_customers")?,
                applicable_customers: row.try_get("applicable_customers")?,
            },
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
            deleted_at: row
                .try_get::<Option<SqlxTimestamp>, _>("deleted_at")?
                .map(SqlxTimestamp::to_jiff),
        })
    }
}

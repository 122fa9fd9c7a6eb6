//! Coupons Service

use async_trait::async_trait;
use bazaar::coupons::{CouponCode, CouponValidation, validate_coupon};
use jiff::Timestamp;
use mockall::automock;
use rust_decimal::Decimal;
use tracing::{Span, info};

use crate::{
    database::Db,
    domain::coupons::{
        CouponsServiceError,
        data::{CouponUpdate, NewCoupon},
        records::{CouponRecord, CouponUuid},
        repository::PgCouponsRepository,
    },
};

#[derive(Debug, Clone)]
pub struct PgCouponsService {
    db: Db,
    repository: PgCouponsRepository,
}

impl PgCouponsService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgCouponsRepository::new(),
        }
    }
}

#[async_trait]
impl CouponsService for PgCouponsService {
    async fn list_coupons(&self) -> Result<Vec<CouponRecord>, CouponsServiceError> {
        let mut tx = self.db.begin().await?;

        let coupons = self.repository.list_coupons(&mut tx).await?;

        tx.commit().await?;

        Ok(coupons)
    }

    async fn get_coupon(&self, coupon: CouponUuid) -> Result<CouponRecord, CouponsServiceError> {
        let mut tx = self.db.begin().await?;

        let coupon = self.repository.get_coupon(&mut tx, coupon).await?;

        tx.commit().await?;

        Ok(coupon)
    }

    #[tracing::instrument(
        name = "coupons.service.create_coupon",
        skip(self, coupon),
        fields(
            coupon_uuid = %coupon.uuid,
            coupon_code = %coupon.code,
            discount_type = %coupon.terms.discount.discount_type
        ),
        err
    )]
    async fn create_coupon(&self, coupon: NewCoupon) -> Result<CouponRecord, CouponsServiceError> {
        coupon.terms.validate()?;

        let mut tx = self.db.begin().await?;

        let created = self.repository.create_coupon(&mut tx, &coupon).await?;

        tx.commit().await?;

        info!(coupon_uuid = %created.uuid, "created coupon");

        Ok(created)
    }

    #[tracing::instrument(
        name = "coupons.service.update_coupon",
        skip(self, update),
        fields(coupon_uuid = %coupon),
        err
    )]
    async fn update_coupon(
        &self,
        coupon: CouponUuid,
        update: CouponUpdate,
    ) -> Result<CouponRecord, CouponsServiceError> {
        update.terms.validate()?;

        let mut tx = self.db.begin().await?;

        let updated = self
            .repository
            .update_coupon(&mut tx, coupon, &update)
            .await?;

        tx.commit().await?;

        info!(coupon_uuid = %updated.uuid, "updated coupon");

        Ok(updated)
    }

    #[tracing::instrument(
        name = "coupons.service.delete_coupon",
        skip(self),
        fields(coupon_uuid = %coupon),
        err
    )]
    async fn delete_coupon(&self, coupon: CouponUuid) -> Result<(), CouponsServiceError> {
        let mut tx = self.db.begin().await?;

        let rows_affected = self.repository.delete_coupon(&mut tx, coupon).await?;

        if rows_affected == 0 {
            return Err(CouponsServiceError::NotFound);
        }

        tx.commit().await?;

        info!(coupon_uuid = %coupon, "deleted coupon");

        Ok(())
    }

    #[tracing::instrument(
        name = "coupons.service.validate_coupon",
        skip(self, code, subtotal),
        fields(
            coupon_code = %code,
            order_subtotal = %subtotal,
            accepted = tracing::field::Empty
        ),
        err
    )]
    async fn validate_coupon(
        &self,
        code: CouponCode,
        subtotal: Decimal,
    ) -> Result<CouponValidation, CouponsServiceError> {
        if subtotal < Decimal::ZERO {
            return Err(CouponsServiceError::InvalidSubtotal);
        }

        let mut tx = self.db.begin().await?;

        let coupon = self.repository.find_coupon_by_code(&mut tx, &code).await?;

        tx.commit().await?;

        let validation = validate_coupon(
            coupon.as_ref().map(|record| &record.coupon),
            subtotal,
            Timestamp::now(),
        );

        Span::current().record("accepted", validation.is_accepted());

        Ok(validation)
    }
}

#[automock]
#[async_trait]
pub trait CouponsService: Send + Sync {
    /// Coupons that are not deleted, newest first.
    async fn list_coupons(&self) -> Result<Vec<CouponRecord>, CouponsServiceError>;

    /// Retrieve a single coupon that is not deleted.
    async fn get_coupon(&self, coupon: CouponUuid) -> Result<CouponRecord, CouponsServiceError>;

    /// Create a coupon after checking its terms.
    async fn create_coupon(&self, coupon: NewCoupon) -> Result<CouponRecord, CouponsServiceError>;

    /// Replace a coupon's editable fields.
    async fn update_coupon(
        &self,
        coupon: CouponUuid,
        update: CouponUpdate,
    ) -> Result<CouponRecord, CouponsServiceError>;

    /// Soft delete a coupon, reserving its code.
    async fn delete_coupon(&self, coupon: CouponUuid) -> Result<(), CouponsServiceError>;

    /// Check whether `code` applies to an order with the given subtotal.
    ///
    /// Rejections are returned as [`CouponValidation::Rejected`], not errors.
    async fn validate_coupon(
        &self,
        code: CouponCode,
        subtotal: Decimal,
    ) -> Result<CouponValidation, CouponsServiceError>;
}

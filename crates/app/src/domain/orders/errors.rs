//! Orders service errors.

use bazaar::{
    coupons::Rejection,
    orders::{NoteError, PricingError, TransitionError},
};
use sqlx::{
    Error,
    error::{DatabaseError, ErrorKind},
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum OrdersServiceError {
    #[error("order already exists")]
    AlreadyExists,

    #[error("order not found")]
    NotFound,

    #[error("related resource not found")]
    InvalidReference,

    #[error("missing required data")]
    MissingRequiredData,

    #[error("invalid data")]
    InvalidData,

    #[error("customer {0} is required")]
    MissingCustomerDetail(&'static str),

    #[error(transparent)]
    InvalidOrder(#[from] PricingError),

    #[error(transparent)]
    InvalidNote(#[from] NoteError),

    #[error(transparent)]
    CouponRejected(#[from] Rejection),

    #[error(transparent)]
    InvalidTransition(#[from] TransitionError),

    #[error("could not allocate a unique order number")]
    OrderNumberExhausted,

    #[error("storage error")]
    Sql(#[source] Error),
}

impl From<Error> for OrdersServiceError {
    fn from(error: Error) -> Self {
        if matches!(error, Error::RowNotFound) {
            return Self::NotFound;
        }

        match error.as_database_error().map(DatabaseError::kind) {
            Some(ErrorKind::UniqueViolation) => Self::AlreadyExists,
            Some(ErrorKind::ForeignKeyViolation) => Self::InvalidReference,
            Some(ErrorKind::NotNullViolation) => Self::MissingRequiredData,
            Some(ErrorKind::CheckViolation) => Self::InvalidData,
            Some(ErrorKind::Other | _) | None => Self::Sql(error),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejection_message_is_preserved() {
        let error = OrdersServiceError::from(Rejection::UsageLimitReached);

        assert_eq!(error.to_string(), "Coupon usage limit reached");
    }
}

//! Bazaar
//!
//! Coupon validation, discount calculation and order lifecycle rules for the
//! Bazaar storefront. Everything in this crate is pure: callers supply the
//! current time and any stored state, and persist whatever comes back.

pub mod coupons;
pub mod discounts;
pub mod orders;

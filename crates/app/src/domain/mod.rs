//! Bazaar Domain Concerns

pub mod coupons;
pub mod orders;

//! Coupon, order and notification services backed by `PostgreSQL`.

pub mod context;
pub mod database;
pub mod domain;
pub mod notifications;

#[cfg(test)]
mod test;

mod uuids;
